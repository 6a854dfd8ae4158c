use actix_web::{HttpResponse, web};

use super::handlers::session::{delete_session_handler, get_session_handler};
use super::handlers::users::{finalize_user_handler, register_user_handler};

/// Configure signup routes
///
/// # Routes
///
/// - POST /api/users - Register a placeholder user and set the pending user cookie
///
/// Expects `web::Data<AuthStore>` and `web::Data<CookieConfig>` as app data.
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(web::scope("/api/users").route("", web::post().to(register_user_handler)));
}

/// Configure authentication routes
///
/// # Routes
///
/// - POST /api/auth/user - Finalize the pending signup with the provider profile
/// - GET /api/auth/session - Current session and user
/// - DELETE /api/auth/session - Sign out
pub fn configure_session_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/auth")
      .route("/user", web::post().to(finalize_user_handler))
      .route("/session", web::get().to(get_session_handler))
      .route("/session", web::delete().to(delete_session_handler)),
  );
}

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
