pub mod session;
pub mod users;

use actix_web::{HttpRequest, web};

use crate::adapters::http::cookies::RequestCookies;
use crate::domain::auth::services::{AuthStore, StoreAuthAdapter};
use crate::infrastructure::config::CookieConfig;

/// Builds the auth adapter for the current request
pub fn request_adapter(
  req: &HttpRequest,
  store: &web::Data<AuthStore>,
  cookies: &web::Data<CookieConfig>,
) -> StoreAuthAdapter<RequestCookies> {
  StoreAuthAdapter::with_pending_cookie(
    store.get_ref().clone(),
    RequestCookies::from_request(req),
    cookies.pending_user_cookie.clone(),
  )
}
