use actix_web::{HttpRequest, HttpResponse, web};

use super::request_adapter;
use crate::adapters::http::{
  dtos::SuccessResponse,
  errors::{ApiError, AuthErrorKind},
};
use crate::domain::auth::{
  ports::{AuthAdapter, CookieStore},
  services::{AuthStore, COOKIE_PATH},
};
use crate::infrastructure::config::CookieConfig;

/// Extract session token from the session cookie
fn extract_session_token(req: &HttpRequest, cookies: &CookieConfig) -> Result<String, ApiError> {
  req
    .cookie(&cookies.session_cookie)
    .map(|c| c.value().to_string())
    .filter(|token| !token.is_empty())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidSession))
}

/// Handler returning the current session and its user
///
/// GET /api/auth/session
/// Response: SessionAndUser (JSON), or 401 when the session is missing or expired
pub async fn get_session_handler(
  req: HttpRequest,
  store: web::Data<AuthStore>,
  cookies: web::Data<CookieConfig>,
) -> Result<HttpResponse, ApiError> {
  let token = extract_session_token(&req, &cookies)?;
  let adapter = request_adapter(&req, &store, &cookies);

  match adapter.get_session_and_user(&token).await? {
    Some(found) if !found.session.is_expired() => Ok(HttpResponse::Ok().json(found)),
    Some(found) => {
      tracing::debug!("Session for user {} expired", found.session.user_id);
      if let Err(e) = adapter.delete_session(&token).await {
        tracing::warn!("Failed to delete expired session: {}", e);
      }
      Err(ApiError::Auth(AuthErrorKind::InvalidSession))
    }
    None => Err(ApiError::Auth(AuthErrorKind::InvalidSession)),
  }
}

/// Handler ending the current session
///
/// DELETE /api/auth/session
/// Response: SuccessResponse (JSON); the session cookie is expired
pub async fn delete_session_handler(
  req: HttpRequest,
  store: web::Data<AuthStore>,
  cookies: web::Data<CookieConfig>,
) -> Result<HttpResponse, ApiError> {
  let token = extract_session_token(&req, &cookies)?;
  let adapter = request_adapter(&req, &store, &cookies);

  adapter.delete_session(&token).await.map_err(|e| {
    if e.is_not_found() {
      ApiError::Auth(AuthErrorKind::InvalidSession)
    } else {
      e.into()
    }
  })?;

  adapter.cookies().remove(&cookies.session_cookie, COOKIE_PATH);

  let mut response = HttpResponse::Ok();
  adapter.cookies().apply(&mut response);
  Ok(response.json(SuccessResponse {
    message: "Signed out".to_string(),
  }))
}
