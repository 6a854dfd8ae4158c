use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Unique identifier for the user
  pub id: String,
  /// Display name
  pub name: String,
  /// User's email address, unset until signup is finalized
  pub email: Option<String>,
  /// Profile picture URL, unset until signup is finalized
  pub avatar_url: Option<String>,
  /// Public handle chosen during signup (unique)
  pub username: String,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Creates a placeholder user that still awaits OAuth finalization
  pub fn placeholder(id: String, name: String, username: String) -> Self {
    Self {
      id,
      name,
      email: None,
      avatar_url: None,
      username,
      created_at: Utc::now(),
    }
  }
}

/// Linked external-provider identity as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub id: String,
  pub user_id: String,
  pub account_type: String,
  pub provider: String,
  pub provider_account_id: String,
  pub refresh_token: Option<String>,
  pub access_token: Option<String>,
  pub expires_at: Option<i32>,
  pub token_type: Option<String>,
  pub scope: Option<String>,
  pub id_token: Option<String>,
  pub session_state: Option<String>,
}

/// Session row as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub id: String,
  pub session_token: String,
  pub user_id: String,
  pub expires: DateTime<Utc>,
}

/// Composite key identifying an account at its provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAccountKey {
  pub provider: String,
  pub provider_account_id: String,
}

impl ProviderAccountKey {
  pub fn new(provider: impl Into<String>, provider_account_id: impl Into<String>) -> Self {
    Self {
      provider: provider.into(),
      provider_account_id: provider_account_id.into(),
    }
  }
}

// ============================================================================
// Framework-facing shapes
// ============================================================================

/// User shape handed back to the authentication framework
///
/// Email and avatar are always present here even though the underlying
/// columns are nullable. `email_verified` is never populated because email
/// verification is not part of this signup flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterUser {
  pub id: String,
  pub name: String,
  pub email: String,
  #[serde(rename = "avatar_url")]
  pub avatar_url: String,
  pub username: String,
  pub email_verified: Option<DateTime<Utc>>,
}

impl From<User> for AdapterUser {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name,
      email: user.email.unwrap_or_default(),
      avatar_url: user.avatar_url.unwrap_or_default(),
      username: user.username,
      email_verified: None,
    }
  }
}

/// Profile data the framework supplies when an OAuth signup completes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewAdapterUser {
  pub name: String,
  pub email: String,
  pub avatar_url: Option<String>,
}

/// Partial profile update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateAdapterUser {
  pub id: String,
  pub name: Option<String>,
  pub email: Option<String>,
  pub avatar_url: Option<String>,
}

/// OAuth account data copied verbatim into the accounts table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdapterAccount {
  pub user_id: String,
  pub account_type: String,
  pub provider: String,
  pub provider_account_id: String,
  pub refresh_token: Option<String>,
  pub access_token: Option<String>,
  pub expires_at: Option<i32>,
  pub token_type: Option<String>,
  pub scope: Option<String>,
  pub id_token: Option<String>,
  pub session_state: Option<String>,
}

impl AdapterAccount {
  pub fn key(&self) -> ProviderAccountKey {
    ProviderAccountKey::new(&self.provider, &self.provider_account_id)
  }
}

/// Session shape exchanged with the authentication framework
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterSession {
  pub session_token: String,
  pub user_id: String,
  pub expires: DateTime<Utc>,
}

impl AdapterSession {
  /// Checks if the session has expired
  pub fn is_expired(&self) -> bool {
    self.expires <= Utc::now()
  }
}

impl From<Session> for AdapterSession {
  fn from(session: Session) -> Self {
    Self {
      session_token: session.session_token,
      user_id: session.user_id,
      expires: session.expires,
    }
  }
}

/// Session update keyed by token; `None` fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAdapterSession {
  pub session_token: String,
  pub user_id: Option<String>,
  pub expires: Option<DateTime<Utc>>,
}

/// A session together with the user owning it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionAndUser {
  pub session: AdapterSession,
  pub user: AdapterUser,
}

impl From<(Session, User)> for SessionAndUser {
  fn from((session, user): (Session, User)) -> Self {
    Self {
      session: session.into(),
      user: user.into(),
    }
  }
}
