use actix_web::{HttpRequest, HttpResponse, cookie::Cookie, cookie::SameSite, web};
use uuid::Uuid;
use validator::Validate;

use super::request_adapter;
use crate::adapters::http::{
  dtos::{RegisterUserRequest, RegisterUserResponse},
  errors::ApiError,
  middleware::RequestIdExt,
};
use crate::domain::auth::{
  entities::{NewAdapterUser, User},
  errors::AuthError,
  ports::AuthAdapter,
  services::{AuthStore, COOKIE_PATH},
};
use crate::infrastructure::config::CookieConfig;

/// Handler starting a signup
///
/// POST /api/users
/// Body: RegisterUserRequest (JSON)
/// Response: RegisterUserResponse (JSON) with status 201 and the pending user cookie
pub async fn register_user_handler(
  request: web::Json<RegisterUserRequest>,
  store: web::Data<AuthStore>,
  cookies: web::Data<CookieConfig>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let username = request.username.to_lowercase();
  if store.users.find_by_username(&username).await?.is_some() {
    return Err(AuthError::UsernameTaken.into());
  }

  let placeholder = User::placeholder(Uuid::new_v4().to_string(), request.name.clone(), username);
  let created = match store.users.create(placeholder).await {
    Ok(user) => user,
    // Lost a race with a concurrent signup for the same username
    Err(e) if e.is_duplicate_key() => return Err(AuthError::UsernameTaken.into()),
    Err(e) => return Err(e.into()),
  };

  tracing::info!("Registered placeholder user {}", created.id);

  let cookie = Cookie::build(cookies.pending_user_cookie.clone(), created.id.clone())
    .path(COOKIE_PATH)
    .same_site(SameSite::Lax)
    .max_age(actix_web::cookie::time::Duration::days(
      cookies.pending_user_max_age_days,
    ))
    .finish();

  Ok(
    HttpResponse::Created()
      .cookie(cookie)
      .json(RegisterUserResponse::from(created)),
  )
}

/// Handler finalizing a signup with the OAuth provider's profile
///
/// POST /api/auth/user
/// Body: NewAdapterUser (JSON)
/// Response: AdapterUser (JSON); the pending user cookie is cleared
pub async fn finalize_user_handler(
  req: HttpRequest,
  profile: web::Json<NewAdapterUser>,
  store: web::Data<AuthStore>,
  cookies: web::Data<CookieConfig>,
) -> Result<HttpResponse, ApiError> {
  tracing::debug!(request_id = ?req.request_id(), "Finalizing pending signup");
  let adapter = request_adapter(&req, &store, &cookies);
  let user = adapter.create_user(profile.into_inner()).await?;

  let mut response = HttpResponse::Ok();
  adapter.cookies().apply(&mut response);
  Ok(response.json(user))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::routes::{configure_session_routes, configure_user_routes};
  use crate::domain::auth::ports::UserRepository;
  use crate::infrastructure::persistence::MemoryStore;
  use actix_web::{App, http::StatusCode, test};
  use serde_json::{Value, json};
  use std::sync::Arc;

  fn memory_store() -> (MemoryStore, AuthStore) {
    let memory = MemoryStore::new();
    let shared = Arc::new(memory.clone());
    (memory, AuthStore::new(shared.clone(), shared.clone(), shared))
  }

  #[actix_web::test]
  async fn test_register_sets_pending_cookie() {
    let (memory, store) = memory_store();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_user_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({ "name": "Diego Fernandes", "username": "Diego" }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let cookie = resp
      .response()
      .cookies()
      .find(|c| c.name() == "@ignitecall:userId")
      .expect("pending user cookie")
      .into_owned();
    assert_eq!(cookie.path(), Some("/"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["username"], "diego");
    assert_eq!(body["id"], cookie.value());

    let stored = memory.find_by_username("diego").await.unwrap().unwrap();
    assert_eq!(stored.id, cookie.value());
    assert!(stored.email.is_none());
  }

  #[actix_web::test]
  async fn test_register_rejects_taken_username() {
    let (memory, store) = memory_store();
    UserRepository::create(
      &memory,
      User::placeholder("u1".to_string(), "Diego".to_string(), "diego".to_string()),
    )
    .await
    .unwrap();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_user_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({ "name": "Other Diego", "username": "diego" }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(resp.response().cookies().next().is_none());
  }

  #[actix_web::test]
  async fn test_register_validates_input() {
    let (_memory, store) = memory_store();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_user_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/users")
      .set_json(json!({ "name": "Di", "username": "d_1" }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[actix_web::test]
  async fn test_finalize_without_cookie() {
    let (_memory, store) = memory_store();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_session_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/auth/user")
      .set_json(json!({ "name": "Diego", "email": "diego@example.com", "avatar_url": null }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "pending_user_missing");
  }

  #[actix_web::test]
  async fn test_finalize_clears_pending_cookie() {
    let (memory, store) = memory_store();
    UserRepository::create(
      &memory,
      User::placeholder("u1".to_string(), "Diego".to_string(), "diego".to_string()),
    )
    .await
    .unwrap();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_session_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/auth/user")
      .cookie(Cookie::new("@ignitecall:userId", "u1"))
      .set_json(json!({
        "name": "Diego Fernandes",
        "email": "diego@example.com",
        "avatar_url": "https://avatars.example.com/diego.png"
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
      .response()
      .cookies()
      .find(|c| c.name() == "@ignitecall:userId")
      .expect("removal cookie")
      .into_owned();
    assert_eq!(removal.value(), "");
    assert_eq!(removal.path(), Some("/"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], "u1");
    assert_eq!(body["email"], "diego@example.com");
    assert!(body["emailVerified"].is_null());
  }

  #[actix_web::test]
  async fn test_finalize_with_taken_email_conflicts() {
    let (memory, store) = memory_store();
    for (id, username) in [("u1", "diego"), ("u2", "mayk")] {
      UserRepository::create(
        &memory,
        User::placeholder(id.to_string(), "Placeholder".to_string(), username.to_string()),
      )
      .await
      .unwrap();
    }
    memory
      .update_profile("u1", None, Some("taken@example.com"), None)
      .await
      .unwrap();
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(store))
        .app_data(web::Data::new(CookieConfig::default()))
        .configure(configure_session_routes),
    )
    .await;

    let req = test::TestRequest::post()
      .uri("/api/auth/user")
      .cookie(Cookie::new("@ignitecall:userId", "u2"))
      .set_json(json!({ "name": "Mayk", "email": "taken@example.com", "avatar_url": null }))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert!(
      resp
        .response()
        .cookies()
        .all(|c| c.name() != "@ignitecall:userId")
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "email_taken");

    let unchanged = memory.find_by_id("u2").await.unwrap().unwrap();
    assert!(unchanged.email.is_none());
  }
}
