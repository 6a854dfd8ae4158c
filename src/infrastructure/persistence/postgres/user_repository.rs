use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
  pub(super) id: String,
  pub(super) name: String,
  pub(super) email: Option<String>,
  pub(super) avatar_url: Option<String>,
  pub(super) username: String,
  pub(super) created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User {
      id: row.id,
      name: row.name,
      email: row.email,
      avatar_url: row.avatar_url,
      username: row.username,
      created_at: row.created_at,
    }
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, name, email, avatar_url, username, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, avatar_url, username, created_at
            "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.avatar_url)
    .bind(&user.username)
    .bind(user.created_at)
    .fetch_one(&self.pool)
    .await?;

    Ok(result.into())
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, name, email, avatar_url, username, created_at
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await;

    match result {
      Ok(Some(row)) => Ok(Some(row.into())),
      Ok(None) => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, name, email, avatar_url, username, created_at
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await;

    match result {
      Ok(Some(row)) => Ok(Some(row.into())),
      Ok(None) => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, name, email, avatar_url, username, created_at
            FROM users
            WHERE username = $1
            "#,
    )
    .bind(username)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn update_profile(
    &self,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
    avatar_url: Option<&str>,
  ) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                avatar_url = COALESCE($4, avatar_url)
            WHERE id = $1
            RETURNING id, name, email, avatar_url, username, created_at
            "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(avatar_url)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(row) => Ok(row.into()),
      Err(sqlx::Error::RowNotFound) => {
        tracing::warn!("User {} not found for profile update", id);
        Err(AuthError::Repository(RepositoryError::NotFound))
      }
      Err(e) => {
        tracing::error!("Failed to update user {}: {}", id, e);
        Err(e.into())
      }
    }
  }
}
