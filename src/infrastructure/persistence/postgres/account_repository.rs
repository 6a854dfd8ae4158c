use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::user_repository::UserRow;
use crate::domain::auth::{
  entities::{Account, AdapterAccount, ProviderAccountKey, User},
  errors::{AuthError, RepositoryError},
  ports::AccountRepository,
};

/// Database row structure for accounts table
#[derive(Debug, FromRow)]
struct AccountRow {
  id: String,
  user_id: String,
  #[sqlx(rename = "type")]
  account_type: String,
  provider: String,
  provider_account_id: String,
  refresh_token: Option<String>,
  access_token: Option<String>,
  expires_at: Option<i32>,
  token_type: Option<String>,
  scope: Option<String>,
  id_token: Option<String>,
  session_state: Option<String>,
}

impl From<AccountRow> for Account {
  fn from(row: AccountRow) -> Self {
    Account {
      id: row.id,
      user_id: row.user_id,
      account_type: row.account_type,
      provider: row.provider,
      provider_account_id: row.provider_account_id,
      refresh_token: row.refresh_token,
      access_token: row.access_token,
      expires_at: row.expires_at,
      token_type: row.token_type,
      scope: row.scope,
      id_token: row.id_token,
      session_state: row.session_state,
    }
  }
}

/// PostgreSQL implementation of the AccountRepository trait
pub struct PostgresAccountRepository {
  pool: PgPool,
}

impl PostgresAccountRepository {
  /// Creates a new PostgresAccountRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
  /// Links a provider account; fails on a duplicate (provider, provider_account_id)
  async fn create(&self, account: AdapterAccount) -> Result<Account, AuthError> {
    let row = sqlx::query_as::<_, AccountRow>(
      r#"
            INSERT INTO accounts (
                user_id, type, provider, provider_account_id, refresh_token, access_token,
                expires_at, token_type, scope, id_token, session_state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, user_id, type, provider, provider_account_id, refresh_token,
                access_token, expires_at, token_type, scope, id_token, session_state
            "#,
    )
    .bind(&account.user_id)
    .bind(&account.account_type)
    .bind(&account.provider)
    .bind(&account.provider_account_id)
    .bind(&account.refresh_token)
    .bind(&account.access_token)
    .bind(account.expires_at)
    .bind(&account.token_type)
    .bind(&account.scope)
    .bind(&account.id_token)
    .bind(&account.session_state)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!(
        "Failed to link {} account {}: {}",
        account.provider,
        account.provider_account_id,
        e
      );
      AuthError::Repository(RepositoryError::from(e))
    })?;

    Ok(row.into())
  }

  /// Finds the owning user of an account in a single joined query
  async fn find_user_by_key(&self, key: &ProviderAccountKey) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT u.id, u.name, u.email, u.avatar_url, u.username, u.created_at
            FROM accounts a
            INNER JOIN users u ON u.id = a.user_id
            WHERE a.provider = $1 AND a.provider_account_id = $2
            "#,
    )
    .bind(&key.provider)
    .bind(&key.provider_account_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by account: {}", e);
      AuthError::Repository(RepositoryError::from(e))
    })?;

    Ok(row.map(Into::into))
  }
}
