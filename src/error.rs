//! Error types for the aaq data-access layer.

/// Result type alias for aaq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the aaq data-access layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error.
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// `create` called on an entity that already carries an id.
    #[error("{0} is already in the database")]
    AlreadyPersisted(String),

    /// `update` called on an entity that has no id yet.
    #[error("{0} has not been created")]
    NotPersisted(String),

    /// Authorship query on a user that has no id.
    #[error("{0} is not an author")]
    NotAnAuthor(String),

    /// Schema already present.
    #[error("Database is already initialized")]
    AlreadyInitialized,

    /// Schema missing.
    #[error("Database is not initialized. Run `aaq init` first")]
    NotInitialized,

    /// Bad configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Format a list of ids as a comma-separated string with # prefix.
pub fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ids() {
        assert_eq!(format_ids(&[1, 2, 3]), "#1, #2, #3");
        assert_eq!(format_ids(&[42]), "#42");
        assert_eq!(format_ids(&[]), "");
    }

    #[test]
    fn test_lifecycle_messages() {
        let err = Error::AlreadyPersisted("User #3".to_string());
        assert_eq!(err.to_string(), "User #3 is already in the database");

        let err = Error::NotPersisted("Question \"Why?\"".to_string());
        assert_eq!(err.to_string(), "Question \"Why?\" has not been created");

        let err = Error::NotAnAuthor("User \"Ada Lovelace\"".to_string());
        assert_eq!(err.to_string(), "User \"Ada Lovelace\" is not an author");
    }
}
