pub mod account_repository;
pub mod session_repository;
pub mod user_repository;

pub use account_repository::PostgresAccountRepository;
pub use session_repository::PostgresSessionRepository;
pub use user_repository::PostgresUserRepository;
