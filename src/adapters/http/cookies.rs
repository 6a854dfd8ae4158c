use actix_web::{HttpRequest, HttpResponseBuilder, cookie::Cookie};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::auth::ports::CookieStore;

/// Cookie store scoped to a single actix-web request
///
/// The request's cookies are captured up front so the store can cross await
/// points; removals are queued and written with [`RequestCookies::apply`].
#[derive(Debug, Default)]
pub struct RequestCookies {
  values: HashMap<String, String>,
  removals: Mutex<Vec<Cookie<'static>>>,
}

impl RequestCookies {
  /// Captures the cookies sent with `req`
  pub fn from_request(req: &HttpRequest) -> Self {
    let values = match req.cookies() {
      Ok(cookies) => cookies
        .iter()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect(),
      Err(e) => {
        tracing::warn!("Failed to parse request cookies: {}", e);
        HashMap::new()
      }
    };

    Self {
      values,
      removals: Mutex::new(Vec::new()),
    }
  }

  /// Cookies queued for removal so far
  pub fn removals(&self) -> Vec<Cookie<'static>> {
    self
      .removals
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .clone()
  }

  /// Writes queued removals onto the response
  pub fn apply(&self, response: &mut HttpResponseBuilder) {
    for cookie in self.removals() {
      response.cookie(cookie);
    }
  }
}

impl CookieStore for RequestCookies {
  fn get(&self, name: &str) -> Option<String> {
    self.values.get(name).cloned()
  }

  fn remove(&self, name: &str, path: &str) {
    let mut cookie = Cookie::build(name.to_string(), "")
      .path(path.to_string())
      .finish();
    cookie.make_removal();

    self
      .removals
      .lock()
      .unwrap_or_else(|e| e.into_inner())
      .push(cookie);
  }
}
