use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::domain::auth::{
  entities::{Account, AdapterAccount, ProviderAccountKey, Session, User},
  errors::{AuthError, RepositoryError},
  ports::{AccountRepository, SessionRepository, UserRepository},
};

#[derive(Debug, Default)]
struct Tables {
  users: HashMap<String, User>,
  accounts: HashMap<ProviderAccountKey, Account>,
  sessions: HashMap<String, Session>,
}

impl Tables {
  fn require_user(&self, user_id: &str) -> Result<(), AuthError> {
    if self.users.contains_key(user_id) {
      Ok(())
    } else {
      Err(AuthError::Repository(RepositoryError::DatabaseError(
        format!("foreign key violation: user {} does not exist", user_id),
      )))
    }
  }

  fn email_taken(&self, email: &str, except_id: &str) -> bool {
    self
      .users
      .values()
      .any(|u| u.id != except_id && u.email.as_deref() == Some(email))
  }
}

/// In-process store implementing every auth repository port
///
/// Enforces the same uniqueness and foreign key rules as the relational
/// schema so adapter behavior matches the Postgres repositories. Clones share
/// the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, Tables> {
    self.tables.lock().unwrap_or_else(|e| e.into_inner())
  }

  /// Number of linked accounts
  pub fn account_count(&self) -> usize {
    self.lock().accounts.len()
  }
}

#[async_trait]
impl UserRepository for MemoryStore {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let mut tables = self.lock();

    if tables.users.contains_key(&user.id) {
      return Err(RepositoryError::DuplicateKey(format!("users.id {}", user.id)).into());
    }
    if tables.users.values().any(|u| u.username == user.username) {
      return Err(RepositoryError::DuplicateKey(format!("users.username {}", user.username)).into());
    }
    if let Some(email) = user.email.as_deref() {
      if tables.email_taken(email, &user.id) {
        return Err(RepositoryError::DuplicateKey(format!("users.email {}", email)).into());
      }
    }

    tables.users.insert(user.id.clone(), user.clone());
    Ok(user)
  }

  async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError> {
    Ok(self.lock().users.get(id).cloned())
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
    let tables = self.lock();
    Ok(
      tables
        .users
        .values()
        .find(|u| u.email.as_deref() == Some(email))
        .cloned(),
    )
  }

  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
    let tables = self.lock();
    Ok(
      tables
        .users
        .values()
        .find(|u| u.username == username)
        .cloned(),
    )
  }

  async fn update_profile(
    &self,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
    avatar_url: Option<&str>,
  ) -> Result<User, AuthError> {
    let mut tables = self.lock();

    if !tables.users.contains_key(id) {
      return Err(RepositoryError::NotFound.into());
    }
    if let Some(email) = email {
      if tables.email_taken(email, id) {
        return Err(RepositoryError::DuplicateKey(format!("users.email {}", email)).into());
      }
    }

    let user = tables
      .users
      .get_mut(id)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

    if let Some(name) = name {
      user.name = name.to_string();
    }
    if let Some(email) = email {
      user.email = Some(email.to_string());
    }
    if let Some(avatar_url) = avatar_url {
      user.avatar_url = Some(avatar_url.to_string());
    }

    Ok(user.clone())
  }
}

#[async_trait]
impl AccountRepository for MemoryStore {
  async fn create(&self, account: AdapterAccount) -> Result<Account, AuthError> {
    let mut tables = self.lock();
    tables.require_user(&account.user_id)?;

    let key = account.key();
    if tables.accounts.contains_key(&key) {
      return Err(
        RepositoryError::DuplicateKey(format!(
          "accounts ({}, {})",
          key.provider, key.provider_account_id
        ))
        .into(),
      );
    }

    let row = Account {
      id: Uuid::new_v4().to_string(),
      user_id: account.user_id,
      account_type: account.account_type,
      provider: account.provider,
      provider_account_id: account.provider_account_id,
      refresh_token: account.refresh_token,
      access_token: account.access_token,
      expires_at: account.expires_at,
      token_type: account.token_type,
      scope: account.scope,
      id_token: account.id_token,
      session_state: account.session_state,
    };
    tables.accounts.insert(key, row.clone());

    Ok(row)
  }

  async fn find_user_by_key(&self, key: &ProviderAccountKey) -> Result<Option<User>, AuthError> {
    let tables = self.lock();
    Ok(
      tables
        .accounts
        .get(key)
        .and_then(|account| tables.users.get(&account.user_id))
        .cloned(),
    )
  }
}

#[async_trait]
impl SessionRepository for MemoryStore {
  async fn create(
    &self,
    session_token: &str,
    user_id: &str,
    expires: DateTime<Utc>,
  ) -> Result<Session, AuthError> {
    let mut tables = self.lock();
    tables.require_user(user_id)?;

    if tables.sessions.contains_key(session_token) {
      return Err(RepositoryError::DuplicateKey("sessions.session_token".to_string()).into());
    }

    let session = Session {
      id: Uuid::new_v4().to_string(),
      session_token: session_token.to_string(),
      user_id: user_id.to_string(),
      expires,
    };
    tables
      .sessions
      .insert(session_token.to_string(), session.clone());

    Ok(session)
  }

  async fn find_with_user(&self, session_token: &str) -> Result<Option<(Session, User)>, AuthError> {
    let tables = self.lock();
    Ok(tables.sessions.get(session_token).and_then(|session| {
      tables
        .users
        .get(&session.user_id)
        .map(|user| (session.clone(), user.clone()))
    }))
  }

  async fn update(
    &self,
    session_token: &str,
    user_id: Option<&str>,
    expires: Option<DateTime<Utc>>,
  ) -> Result<Session, AuthError> {
    let mut tables = self.lock();
    if let Some(user_id) = user_id {
      tables.require_user(user_id)?;
    }

    let session = tables
      .sessions
      .get_mut(session_token)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

    if let Some(user_id) = user_id {
      session.user_id = user_id.to_string();
    }
    if let Some(expires) = expires {
      session.expires = expires;
    }

    Ok(session.clone())
  }

  async fn delete(&self, session_token: &str) -> Result<(), AuthError> {
    match self.lock().sessions.remove(session_token) {
      Some(_) => Ok(()),
      None => Err(AuthError::Repository(RepositoryError::NotFound)),
    }
  }
}
