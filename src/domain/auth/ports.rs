use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::entities::{
  Account, AdapterAccount, AdapterSession, AdapterUser, NewAdapterUser, ProviderAccountKey,
  Session, SessionAndUser, UpdateAdapterSession, UpdateAdapterUser, User,
};
use super::errors::AuthError;

/// Repository trait for user persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
  /// Inserts a new user row
  async fn create(&self, user: User) -> Result<User, AuthError>;

  /// Finds a user by their unique identifier
  async fn find_by_id(&self, id: &str) -> Result<Option<User>, AuthError>;

  /// Finds a user by their email address
  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

  /// Finds a user by their username
  async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

  /// Overwrites name, email and avatar of an existing user.
  /// `None` leaves the stored value untouched.
  async fn update_profile(
    &self,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
    avatar_url: Option<&str>,
  ) -> Result<User, AuthError>;
}

/// Repository trait for linked provider accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
  /// Inserts a new account row
  async fn create(&self, account: AdapterAccount) -> Result<Account, AuthError>;

  /// Finds the user owning the account identified by `key`
  async fn find_user_by_key(&self, key: &ProviderAccountKey) -> Result<Option<User>, AuthError>;
}

/// Repository trait for session persistence operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
  /// Creates a new session
  async fn create(
    &self,
    session_token: &str,
    user_id: &str,
    expires: DateTime<Utc>,
  ) -> Result<Session, AuthError>;

  /// Finds a session and its owning user by token
  async fn find_with_user(&self, session_token: &str) -> Result<Option<(Session, User)>, AuthError>;

  /// Updates expiry and/or owner of the session with the given token
  async fn update(
    &self,
    session_token: &str,
    user_id: Option<&str>,
    expires: Option<DateTime<Utc>>,
  ) -> Result<Session, AuthError>;

  /// Deletes the session with the given token
  async fn delete(&self, session_token: &str) -> Result<(), AuthError>;
}

/// Request-scoped cookie access
///
/// Reads come from the incoming request, removals are applied to the
/// outgoing response.
pub trait CookieStore: Send + Sync {
  /// Returns the value of the named cookie, if sent
  fn get(&self, name: &str) -> Option<String>;

  /// Expires the named cookie on the response, scoped to `path`
  fn remove(&self, name: &str, path: &str);
}

/// Storage contract required by the authentication framework
#[async_trait]
pub trait AuthAdapter: Send + Sync {
  /// Finalizes the placeholder user referenced by the pending signup cookie
  async fn create_user(&self, user: NewAdapterUser) -> Result<AdapterUser, AuthError>;

  async fn get_user(&self, id: &str) -> Result<Option<AdapterUser>, AuthError>;

  async fn get_user_by_email(&self, email: &str) -> Result<Option<AdapterUser>, AuthError>;

  async fn get_user_by_account(
    &self,
    key: &ProviderAccountKey,
  ) -> Result<Option<AdapterUser>, AuthError>;

  async fn update_user(&self, user: UpdateAdapterUser) -> Result<AdapterUser, AuthError>;

  async fn link_account(&self, account: AdapterAccount) -> Result<(), AuthError>;

  async fn create_session(&self, session: AdapterSession) -> Result<AdapterSession, AuthError>;

  async fn get_session_and_user(
    &self,
    session_token: &str,
  ) -> Result<Option<SessionAndUser>, AuthError>;

  async fn update_session(
    &self,
    session: UpdateAdapterSession,
  ) -> Result<AdapterSession, AuthError>;

  async fn delete_session(&self, session_token: &str) -> Result<(), AuthError>;
}
