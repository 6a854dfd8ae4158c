use thiserror::Error;

/// Main authentication adapter error type
#[derive(Debug, Error)]
pub enum AuthError {
  /// The pending signup cookie was not sent with the request. The placeholder
  /// user must be registered before the OAuth callback runs, so retrying the
  /// same request cannot succeed.
  #[error("User id not found on cookies")]
  PendingUserIdMissing,

  #[error("Username already taken")]
  UsernameTaken,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      sqlx::Error::Io(e) => RepositoryError::ConnectionFailed(e.to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl AuthError {
  /// Returns true when the store reported a missing record
  pub fn is_not_found(&self) -> bool {
    matches!(self, AuthError::Repository(RepositoryError::NotFound))
  }

  /// Returns true when the store rejected a write on a unique constraint
  pub fn is_duplicate_key(&self) -> bool {
    matches!(self, AuthError::Repository(RepositoryError::DuplicateKey(_)))
  }
}
