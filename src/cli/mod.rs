//! CLI commands for aaq.

mod output;

use crate::config::StoreConfig;
use crate::core::{Question, ReplyThread, User};
use crate::db::{Connection, DbPath, Schema};
use crate::error::Error;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use output::{Format, QuestionDetail, UserDetail};

#[derive(Parser)]
#[command(name = "aaq")]
#[command(about = "Browse and edit a Q&A database")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides AAQ_DB)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the schema in a new database
    Init {
        /// Also load the demo data set
        #[arg(long)]
        seed: bool,
    },

    /// List all users
    Users,

    /// Show a user with their questions, follows and likes
    User {
        /// User ID
        id: i64,
    },

    /// List all questions
    Questions,

    /// Show a question with its author, likes, followers and replies
    Question {
        /// Question ID
        id: i64,
    },

    /// Print the reply tree of a question
    Thread {
        /// Question ID
        question_id: i64,
    },

    /// Questions with the most likes
    MostLiked {
        /// How many to show
        #[arg(short, default_value_t = 5)]
        n: usize,
    },

    /// Questions with the most followers
    MostFollowed {
        /// How many to show
        #[arg(short, default_value_t = 5)]
        n: usize,
    },

    /// Create a user
    AddUser { fname: String, lname: String },

    /// Ask a question as an existing user
    Ask {
        /// Author user ID
        author_id: i64,
        title: String,
        body: String,
    },
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = StoreConfig::from_env()?.with_path(cli.db.map(DbPath::new));
    let format = if cli.json { Format::Json } else { Format::Text };

    match cli.command {
        Commands::Init { seed } => cmd_init(&config, seed),
        Commands::Users => {
            let mut conn = open_initialized(&config)?;
            format.users(&User::find_all(&mut conn)?)
        }
        Commands::User { id } => cmd_user(&config, format, id),
        Commands::Questions => {
            let mut conn = open_initialized(&config)?;
            format.questions(&Question::find_all(&mut conn)?)
        }
        Commands::Question { id } => cmd_question(&config, format, id),
        Commands::Thread { question_id } => {
            let mut conn = open_initialized(&config)?;
            let thread = ReplyThread::load(&mut conn, question_id)?;
            format.thread(&thread)
        }
        Commands::MostLiked { n } => {
            let mut conn = open_initialized(&config)?;
            format.questions(&Question::most_liked(&mut conn, n)?)
        }
        Commands::MostFollowed { n } => {
            let mut conn = open_initialized(&config)?;
            format.questions(&Question::most_followed(&mut conn, n)?)
        }
        Commands::AddUser { fname, lname } => {
            let mut conn = open_initialized(&config)?;
            let mut user = User::new(fname, lname);
            user.create(&mut conn)?;
            format.created(&user, user.id)
        }
        Commands::Ask {
            author_id,
            title,
            body,
        } => {
            let mut conn = open_initialized(&config)?;
            if User::find_by_id(&mut conn, author_id)?.is_none() {
                bail!("User #{author_id} not found");
            }
            let mut question = Question::new(title, body, author_id);
            question.create(&mut conn)?;
            format.created(&question, question.id)
        }
    }
}

fn open_initialized(config: &StoreConfig) -> Result<Connection> {
    if !config.path.exists() {
        return Err(Error::NotInitialized.into());
    }
    let mut conn = Connection::open_with(config)?;
    if !Schema::is_initialized(&mut conn) {
        return Err(Error::NotInitialized.into());
    }
    Ok(conn)
}

fn cmd_init(config: &StoreConfig, seed: bool) -> Result<()> {
    let mut conn = Connection::open_with(config)?;
    Schema::init(&mut conn)?;
    if seed {
        Schema::seed(&mut conn)?;
    }
    conn.close()?;

    println!("Initialized {}", config.path.as_path().display());
    Ok(())
}

fn cmd_user(config: &StoreConfig, format: Format, id: i64) -> Result<()> {
    let mut conn = open_initialized(config)?;
    let Some(user) = User::find_by_id(&mut conn, id)? else {
        bail!("User #{id} not found");
    };

    let detail = UserDetail {
        questions: user.authored_questions(&mut conn)?.unwrap_or_default(),
        replies: user.authored_replies(&mut conn)?.map_or(0, |r| r.len()),
        followed: user.followed_questions(&mut conn)?,
        liked: user.liked_questions(&mut conn)?,
        user,
    };
    format.user(&detail)
}

fn cmd_question(config: &StoreConfig, format: Format, id: i64) -> Result<()> {
    let mut conn = open_initialized(config)?;
    let Some(question) = Question::find_by_id(&mut conn, id)? else {
        bail!("Question #{id} not found");
    };

    let detail = QuestionDetail {
        author: question.author(&mut conn)?,
        num_likes: question.num_likes(&mut conn)?,
        followers: question.followers(&mut conn)?,
        replies: question.replies(&mut conn)?.unwrap_or_default(),
        question,
    };
    format.question(&detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["aaq", "most-liked", "-n", "2", "--json", "--db", "x.db"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        assert!(matches!(cli.command, Commands::MostLiked { n: 2 }));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["aaq", "most-followed"]).unwrap();
        assert!(!cli.json);
        assert!(matches!(cli.command, Commands::MostFollowed { n: 5 }));
    }

    #[test]
    fn test_open_uninitialized_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::default().with_path(Some(DbPath::new(dir.path().join("none.db"))));

        let err = open_initialized(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_init_then_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StoreConfig::default().with_path(Some(DbPath::new(dir.path().join("q.db"))));

        cmd_init(&config, true).unwrap();
        let mut conn = open_initialized(&config).unwrap();
        assert_eq!(User::find_all(&mut conn).unwrap().len(), 4);

        let again = cmd_init(&config, false).err().unwrap();
        assert!(matches!(
            again.downcast_ref::<Error>(),
            Some(Error::AlreadyInitialized)
        ));
    }
}
