pub mod cookies;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use cookies::RequestCookies;
pub use dtos::{ErrorResponse, RegisterUserRequest, RegisterUserResponse, SuccessResponse};
pub use errors::{ApiError, AuthErrorKind};
pub use handlers::session::{delete_session_handler, get_session_handler};
pub use handlers::users::{finalize_user_handler, register_user_handler};
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{configure_session_routes, configure_user_routes, health_check};
