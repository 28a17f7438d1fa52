//! Entity models and their queries.

pub mod question;
pub mod question_follow;
pub mod question_like;
pub mod reply;
pub mod thread;
pub mod user;

pub use question::Question;
pub use question_follow::QuestionFollow;
pub use question_like::QuestionLike;
pub use reply::Reply;
pub use thread::ReplyThread;
pub use user::User;
