use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::domain::auth::entities::{Session, User};
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::SessionRepository;

/// Database row structure for sessions table
#[derive(Debug, FromRow)]
struct SessionRow {
  id: String,
  session_token: String,
  user_id: String,
  expires: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      id: row.id,
      session_token: row.session_token,
      user_id: row.user_id,
      expires: row.expires,
    }
  }
}

/// Session joined with its owning user
#[derive(Debug, FromRow)]
struct SessionUserRow {
  id: String,
  session_token: String,
  user_id: String,
  expires: DateTime<Utc>,
  user_name: String,
  user_email: Option<String>,
  user_avatar_url: Option<String>,
  user_username: String,
  user_created_at: DateTime<Utc>,
}

impl From<SessionUserRow> for (Session, User) {
  fn from(row: SessionUserRow) -> Self {
    let user = User {
      id: row.user_id.clone(),
      name: row.user_name,
      email: row.user_email,
      avatar_url: row.user_avatar_url,
      username: row.user_username,
      created_at: row.user_created_at,
    };
    let session = Session {
      id: row.id,
      session_token: row.session_token,
      user_id: row.user_id,
      expires: row.expires,
    };
    (session, user)
  }
}

/// PostgreSQL implementation of the SessionRepository trait
pub struct PostgresSessionRepository {
  pool: PgPool,
}

impl PostgresSessionRepository {
  /// Creates a new PostgresSessionRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
  /// Creates a new session in the database
  async fn create(
    &self,
    session_token: &str,
    user_id: &str,
    expires: DateTime<Utc>,
  ) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            INSERT INTO sessions (session_token, user_id, expires)
            VALUES ($1, $2, $3)
            RETURNING id, session_token, user_id, expires
            "#,
    )
    .bind(session_token)
    .bind(user_id)
    .bind(expires)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create session: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    Ok(row.into())
  }

  /// Finds a session and its user in a single joined query
  async fn find_with_user(&self, session_token: &str) -> Result<Option<(Session, User)>, AuthError> {
    let row = sqlx::query_as::<_, SessionUserRow>(
      r#"
            SELECT
                s.id, s.session_token, s.user_id, s.expires,
                u.name AS user_name,
                u.email AS user_email,
                u.avatar_url AS user_avatar_url,
                u.username AS user_username,
                u.created_at AS user_created_at
            FROM sessions s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.session_token = $1
            "#,
    )
    .bind(session_token)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find session by token: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    Ok(row.map(Into::into))
  }

  /// Updates expiry and owner; `None` keeps the stored value
  async fn update(
    &self,
    session_token: &str,
    user_id: Option<&str>,
    expires: Option<DateTime<Utc>>,
  ) -> Result<Session, AuthError> {
    let row = sqlx::query_as::<_, SessionRow>(
      r#"
            UPDATE sessions
            SET
                user_id = COALESCE($2, user_id),
                expires = COALESCE($3, expires)
            WHERE session_token = $1
            RETURNING id, session_token, user_id, expires
            "#,
    )
    .bind(session_token)
    .bind(user_id)
    .bind(expires)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update session: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    match row {
      Some(row) => Ok(row.into()),
      None => {
        tracing::warn!("Session not found for update");
        Err(AuthError::Repository(RepositoryError::NotFound))
      }
    }
  }

  /// Deletes a specific session
  async fn delete(&self, session_token: &str) -> Result<(), AuthError> {
    let result = sqlx::query(
      r#"
            DELETE FROM sessions
            WHERE session_token = $1
            "#,
    )
    .bind(session_token)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to delete session: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    if result.rows_affected() == 0 {
      tracing::warn!("Session not found for deletion");
      return Err(AuthError::Repository(RepositoryError::NotFound));
    }

    Ok(())
  }
}
