pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use entities::{
  Account, AdapterAccount, AdapterSession, AdapterUser, NewAdapterUser, ProviderAccountKey,
  Session, SessionAndUser, UpdateAdapterSession, UpdateAdapterUser, User,
};
pub use errors::{AuthError, RepositoryError};
pub use ports::{AccountRepository, AuthAdapter, CookieStore, SessionRepository, UserRepository};
pub use services::{AuthStore, COOKIE_PATH, PENDING_USER_COOKIE, StoreAuthAdapter};
