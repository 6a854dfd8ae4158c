use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::auth::entities::User;

lazy_static! {
  /// Usernames may only contain letters and hyphens
  static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z-]+$").expect("valid username regex");
}

/// Request starting a signup: creates the placeholder user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserRequest {
  /// Display name
  #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
  pub name: String,

  /// Public handle, letters and hyphens only
  #[validate(
    length(min = 3, message = "Username must have at least 3 characters"),
    regex(
      path = *USERNAME_REGEX,
      message = "Username may only contain letters and hyphens"
    )
  )]
  pub username: String,
}

/// Placeholder user returned after signup started
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserResponse {
  pub id: String,
  pub name: String,
  pub username: String,
  pub created_at: DateTime<Utc>,
}

impl From<User> for RegisterUserResponse {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name,
      username: user.username,
      created_at: user.created_at,
    }
  }
}

/// Standard success response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  /// Success message
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
