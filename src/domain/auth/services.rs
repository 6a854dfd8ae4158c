use async_trait::async_trait;
use std::sync::Arc;

use super::entities::{
  AdapterAccount, AdapterSession, AdapterUser, NewAdapterUser, ProviderAccountKey,
  SessionAndUser, UpdateAdapterSession, UpdateAdapterUser,
};
use super::errors::AuthError;
use super::ports::{AccountRepository, AuthAdapter, CookieStore, SessionRepository, UserRepository};

/// Cookie carrying the id of the placeholder user during OAuth signup
pub const PENDING_USER_COOKIE: &str = "@ignitecall:userId";

/// Path every signup cookie is scoped to
pub const COOKIE_PATH: &str = "/";

/// Store ports the adapter translates onto
#[derive(Clone)]
pub struct AuthStore {
  pub users: Arc<dyn UserRepository>,
  pub accounts: Arc<dyn AccountRepository>,
  pub sessions: Arc<dyn SessionRepository>,
}

impl AuthStore {
  pub fn new(
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<dyn SessionRepository>,
  ) -> Self {
    Self {
      users,
      accounts,
      sessions,
    }
  }
}

/// `AuthAdapter` implementation over the injected store ports
///
/// One adapter is built per request, because finalizing a signup needs that
/// request's cookies.
pub struct StoreAuthAdapter<C> {
  store: AuthStore,
  cookies: C,
  pending_user_cookie: String,
}

impl<C: CookieStore> StoreAuthAdapter<C> {
  /// Creates an adapter reading the default pending signup cookie
  pub fn new(store: AuthStore, cookies: C) -> Self {
    Self::with_pending_cookie(store, cookies, PENDING_USER_COOKIE)
  }

  /// Creates an adapter reading a custom pending signup cookie name
  pub fn with_pending_cookie(store: AuthStore, cookies: C, name: impl Into<String>) -> Self {
    Self {
      store,
      cookies,
      pending_user_cookie: name.into(),
    }
  }

  /// Returns the cookie store, e.g. to flush removals onto a response
  pub fn cookies(&self) -> &C {
    &self.cookies
  }
}

#[async_trait]
impl<C: CookieStore> AuthAdapter for StoreAuthAdapter<C> {
  async fn create_user(&self, user: NewAdapterUser) -> Result<AdapterUser, AuthError> {
    let user_id = self
      .cookies
      .get(&self.pending_user_cookie)
      .filter(|id| !id.is_empty())
      .ok_or(AuthError::PendingUserIdMissing)?;

    let finalized = self
      .store
      .users
      .update_profile(
        &user_id,
        Some(&user.name),
        Some(&user.email),
        user.avatar_url.as_deref(),
      )
      .await?;

    self.cookies.remove(&self.pending_user_cookie, COOKIE_PATH);
    tracing::info!("Finalized signup for user {}", finalized.id);

    Ok(finalized.into())
  }

  async fn get_user(&self, id: &str) -> Result<Option<AdapterUser>, AuthError> {
    let user = self.store.users.find_by_id(id).await?;
    Ok(user.map(Into::into))
  }

  async fn get_user_by_email(&self, email: &str) -> Result<Option<AdapterUser>, AuthError> {
    let user = self.store.users.find_by_email(email).await?;
    Ok(user.map(Into::into))
  }

  async fn get_user_by_account(
    &self,
    key: &ProviderAccountKey,
  ) -> Result<Option<AdapterUser>, AuthError> {
    let user = self.store.accounts.find_user_by_key(key).await?;
    Ok(user.map(Into::into))
  }

  async fn update_user(&self, user: UpdateAdapterUser) -> Result<AdapterUser, AuthError> {
    let updated = self
      .store
      .users
      .update_profile(
        &user.id,
        user.name.as_deref(),
        user.email.as_deref(),
        user.avatar_url.as_deref(),
      )
      .await?;

    Ok(updated.into())
  }

  async fn link_account(&self, account: AdapterAccount) -> Result<(), AuthError> {
    let linked = self.store.accounts.create(account).await?;
    tracing::debug!(
      "Linked {} account {} to user {}",
      linked.provider,
      linked.provider_account_id,
      linked.user_id
    );
    Ok(())
  }

  async fn create_session(&self, session: AdapterSession) -> Result<AdapterSession, AuthError> {
    let created = self
      .store
      .sessions
      .create(&session.session_token, &session.user_id, session.expires)
      .await?;

    Ok(created.into())
  }

  async fn get_session_and_user(
    &self,
    session_token: &str,
  ) -> Result<Option<SessionAndUser>, AuthError> {
    let found = self.store.sessions.find_with_user(session_token).await?;
    Ok(found.map(Into::into))
  }

  async fn update_session(
    &self,
    session: UpdateAdapterSession,
  ) -> Result<AdapterSession, AuthError> {
    let updated = self
      .store
      .sessions
      .update(
        &session.session_token,
        session.user_id.as_deref(),
        session.expires,
      )
      .await?;

    Ok(updated.into())
  }

  async fn delete_session(&self, session_token: &str) -> Result<(), AuthError> {
    self.store.sessions.delete(session_token).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::User;
  use crate::domain::auth::errors::RepositoryError;
  use crate::infrastructure::persistence::memory::MemoryStore;
  use chrono::{Duration, DurationRound, Utc};
  use std::collections::HashMap;
  use std::sync::Mutex;

  /// Cookie store backed by a map, recording every removal
  #[derive(Default)]
  struct RecordingCookies {
    values: HashMap<String, String>,
    removed: Mutex<Vec<(String, String)>>,
  }

  impl RecordingCookies {
    fn with(name: &str, value: &str) -> Self {
      let mut values = HashMap::new();
      values.insert(name.to_string(), value.to_string());
      Self {
        values,
        removed: Mutex::new(Vec::new()),
      }
    }

    fn removed(&self) -> Vec<(String, String)> {
      self.removed.lock().unwrap().clone()
    }
  }

  impl CookieStore for RecordingCookies {
    fn get(&self, name: &str) -> Option<String> {
      self.values.get(name).cloned()
    }

    fn remove(&self, name: &str, path: &str) {
      self
        .removed
        .lock()
        .unwrap()
        .push((name.to_string(), path.to_string()));
    }
  }

  fn store(memory: &MemoryStore) -> AuthStore {
    let memory = Arc::new(memory.clone());
    AuthStore::new(memory.clone(), memory.clone(), memory)
  }

  async fn seed_user(memory: &MemoryStore, id: &str, username: &str) -> User {
    UserRepository::create(
      memory,
      User::placeholder(
        id.to_string(),
        "Placeholder".to_string(),
        username.to_string(),
      ),
    )
    .await
    .unwrap()
  }

  fn github_account(user_id: &str, provider_account_id: &str) -> AdapterAccount {
    AdapterAccount {
      user_id: user_id.to_string(),
      account_type: "oauth".to_string(),
      provider: "github".to_string(),
      provider_account_id: provider_account_id.to_string(),
      refresh_token: None,
      access_token: Some("gho_token".to_string()),
      expires_at: Some(1_700_000_000),
      token_type: Some("bearer".to_string()),
      scope: Some("read:user".to_string()),
      id_token: None,
      session_state: None,
    }
  }

  fn expiry(hours: i64) -> chrono::DateTime<Utc> {
    (Utc::now() + Duration::hours(hours))
      .duration_trunc(Duration::seconds(1))
      .unwrap()
  }

  #[tokio::test]
  async fn test_create_user_without_cookie_fails_without_writing() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    let result = adapter
      .create_user(NewAdapterUser {
        name: "Diego".to_string(),
        email: "diego@example.com".to_string(),
        avatar_url: None,
      })
      .await;

    assert!(matches!(result, Err(AuthError::PendingUserIdMissing)));
    assert!(adapter.cookies().removed().is_empty());
    let untouched = adapter.get_user("u1").await.unwrap().unwrap();
    assert_eq!(untouched.name, "Placeholder");
    assert_eq!(untouched.email, "");
  }

  #[tokio::test]
  async fn test_create_user_finalizes_placeholder_and_clears_cookie() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::new(
      store(&memory),
      RecordingCookies::with(PENDING_USER_COOKIE, "u1"),
    );

    let user = adapter
      .create_user(NewAdapterUser {
        name: "Diego Fernandes".to_string(),
        email: "diego@example.com".to_string(),
        avatar_url: Some("https://avatars.example.com/diego.png".to_string()),
      })
      .await
      .unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Diego Fernandes");
    assert_eq!(user.email, "diego@example.com");
    assert_eq!(user.avatar_url, "https://avatars.example.com/diego.png");
    assert_eq!(user.username, "diego");
    assert!(user.email_verified.is_none());
    assert_eq!(
      adapter.cookies().removed(),
      vec![(PENDING_USER_COOKIE.to_string(), "/".to_string())]
    );
  }

  #[tokio::test]
  async fn test_create_user_for_unknown_placeholder_keeps_cookie() {
    let memory = MemoryStore::new();
    let adapter = StoreAuthAdapter::new(
      store(&memory),
      RecordingCookies::with(PENDING_USER_COOKIE, "missing"),
    );

    let result = adapter
      .create_user(NewAdapterUser {
        name: "Diego".to_string(),
        email: "diego@example.com".to_string(),
        avatar_url: None,
      })
      .await;

    assert!(result.unwrap_err().is_not_found());
    assert!(adapter.cookies().removed().is_empty());
  }

  #[tokio::test]
  async fn test_custom_pending_cookie_name() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::with_pending_cookie(
      store(&memory),
      RecordingCookies::with("signup", "u1"),
      "signup",
    );

    adapter
      .create_user(NewAdapterUser {
        name: "Diego".to_string(),
        email: "diego@example.com".to_string(),
        avatar_url: None,
      })
      .await
      .unwrap();

    assert_eq!(adapter.cookies().removed()[0].0, "signup");
  }

  #[tokio::test]
  async fn test_lookups_return_none_for_unknown_keys() {
    let memory = MemoryStore::new();
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    assert!(adapter.get_user("nope").await.unwrap().is_none());
    assert!(
      adapter
        .get_user_by_email("nope@example.com")
        .await
        .unwrap()
        .is_none()
    );
    assert!(
      adapter
        .get_user_by_account(&ProviderAccountKey::new("github", "404"))
        .await
        .unwrap()
        .is_none()
    );
    assert!(adapter.get_session_and_user("nope").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_get_user_by_email() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    adapter
      .update_user(UpdateAdapterUser {
        id: "u1".to_string(),
        email: Some("diego@example.com".to_string()),
        ..Default::default()
      })
      .await
      .unwrap();

    let user = adapter
      .get_user_by_email("diego@example.com")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Placeholder");
  }

  #[tokio::test]
  async fn test_update_user_missing_id_is_not_found() {
    let memory = MemoryStore::new();
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    let err = adapter
      .update_user(UpdateAdapterUser {
        id: "ghost".to_string(),
        name: Some("Ghost".to_string()),
        ..Default::default()
      })
      .await
      .unwrap_err();

    assert!(matches!(
      err,
      AuthError::Repository(RepositoryError::NotFound)
    ));
  }

  #[tokio::test]
  async fn test_link_account_and_lookup_owner() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    adapter
      .link_account(github_account("u1", "12345"))
      .await
      .unwrap();

    let owner = adapter
      .get_user_by_account(&ProviderAccountKey::new("github", "12345"))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(owner.id, "u1");
    assert!(owner.email_verified.is_none());

    let other_provider = adapter
      .get_user_by_account(&ProviderAccountKey::new("google", "12345"))
      .await
      .unwrap();
    assert!(other_provider.is_none());
  }

  #[tokio::test]
  async fn test_link_duplicate_account_fails() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    seed_user(&memory, "u2", "mayk").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    adapter
      .link_account(github_account("u1", "12345"))
      .await
      .unwrap();
    let err = adapter
      .link_account(github_account("u2", "12345"))
      .await
      .unwrap_err();

    assert!(err.is_duplicate_key());
    assert_eq!(memory.account_count(), 1);
    let owner = adapter
      .get_user_by_account(&ProviderAccountKey::new("github", "12345"))
      .await
      .unwrap()
      .unwrap();
    assert_eq!(owner.id, "u1");
  }

  #[tokio::test]
  async fn test_session_round_trip() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    seed_user(&memory, "u2", "mayk").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());
    let expires = expiry(24);

    let created = adapter
      .create_session(AdapterSession {
        session_token: "token-1".to_string(),
        user_id: "u1".to_string(),
        expires,
      })
      .await
      .unwrap();
    assert_eq!(created.session_token, "token-1");

    let found = adapter
      .get_session_and_user("token-1")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.session, created);
    assert_eq!(found.user.id, "u1");

    let new_expires = expiry(48);
    let updated = adapter
      .update_session(UpdateAdapterSession {
        session_token: "token-1".to_string(),
        user_id: Some("u2".to_string()),
        expires: Some(new_expires),
      })
      .await
      .unwrap();
    assert_eq!(updated.user_id, "u2");
    assert_eq!(updated.expires, new_expires);

    let found = adapter
      .get_session_and_user("token-1")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(found.session.user_id, "u2");
    assert_eq!(found.session.expires, new_expires);
    assert_eq!(found.user.username, "mayk");

    adapter.delete_session("token-1").await.unwrap();
    assert!(adapter.get_session_and_user("token-1").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_update_session_keeps_unset_fields() {
    let memory = MemoryStore::new();
    seed_user(&memory, "u1", "diego").await;
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());
    let expires = expiry(1);

    adapter
      .create_session(AdapterSession {
        session_token: "token-1".to_string(),
        user_id: "u1".to_string(),
        expires,
      })
      .await
      .unwrap();

    let new_expires = expiry(2);
    let updated = adapter
      .update_session(UpdateAdapterSession {
        session_token: "token-1".to_string(),
        user_id: None,
        expires: Some(new_expires),
      })
      .await
      .unwrap();

    assert_eq!(updated.user_id, "u1");
    assert_eq!(updated.expires, new_expires);
  }

  #[tokio::test]
  async fn test_delete_missing_session_reports_store_error() {
    let memory = MemoryStore::new();
    let adapter = StoreAuthAdapter::new(store(&memory), RecordingCookies::default());

    let err = adapter.delete_session("ghost").await.unwrap_err();
    assert!(err.is_not_found());
  }
}
