mod common;

use common::{spawn_app, LOGIN_PATH, ME_PATH, REFRESH_PATH, VERIFY_PATH};
use estate_admin::services::MultipartForm;
use estate_admin::session::SessionState;
use estate_core::ApiError;
use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

fn profile_body() -> serde_json::Value {
    json!({
        "id": 7,
        "email": "admin@example.com",
        "username": "admin",
        "first_name": "Asha",
        "last_name": "Rao",
        "phone_number": "9999999999"
    })
}

#[tokio::test]
async fn test_login_persists_tokens_and_returns_profile() {
    let app = spawn_app(None, None).await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({"email": "admin@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1"
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME_PATH))
        .and(header("Authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&app.server)
        .await;

    let profile = app
        .state
        .auth
        .login("admin@example.com", "secret")
        .await
        .unwrap();

    assert_eq!(profile.id, 7);
    assert_eq!(profile.name(), "Asha Rao");
    assert_eq!(profile.extra["phone_number"], "9999999999");
    assert_eq!(app.access_token().await.as_deref(), Some("a1"));
    assert_eq!(app.refresh_token().await.as_deref(), Some("r1"));
    assert_eq!(app.state.session.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_login_with_bad_credentials_persists_nothing() {
    let app = spawn_app(None, None).await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(0)
        .mount(&app.server)
        .await;

    let err = app
        .state
        .auth
        .login("admin@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Authentication(ref msg) if msg == "No active account found with the given credentials"
    ));
    assert!(app.access_token().await.is_none());
    assert!(app.refresh_token().await.is_none());
}

#[tokio::test]
async fn test_login_profile_failure_persists_nothing() {
    let app = spawn_app(None, None).await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1"
        })))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path(ME_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.server)
        .await;

    let err = app
        .state
        .auth
        .login("admin@example.com", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Upstream { .. }));
    assert!(app.access_token().await.is_none());
    assert!(app.refresh_token().await.is_none());
}

#[tokio::test]
async fn test_login_validates_before_network() {
    let app = spawn_app(None, None).await;

    let err = app.state.auth.login("not-an-email", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = app.state.auth.login("admin@example.com", "").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn test_valid_token_is_authenticated_without_refresh() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .and(body_json(json!({"token": "a1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a2"})))
        .expect(0)
        .mount(&app.server)
        .await;

    assert!(app.state.auth.is_authenticated().await.unwrap());
    assert_eq!(app.access_token().await.as_deref(), Some("a1"));
}

#[tokio::test]
async fn test_expired_token_with_valid_refresh_is_authenticated() {
    let app = spawn_app(Some("expired"), Some("r1")).await;

    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refresh": "r1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a2"})))
        .expect(1)
        .mount(&app.server)
        .await;

    assert!(app.state.auth.is_authenticated().await.unwrap());
    assert_eq!(app.access_token().await.as_deref(), Some("a2"));
    assert_eq!(app.refresh_token().await.as_deref(), Some("r1"));
}

#[tokio::test]
async fn test_both_tokens_invalid_is_logged_out() {
    let app = spawn_app(Some("expired"), Some("stale")).await;

    Mock::given(method("POST"))
        .and(path(VERIFY_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.server)
        .await;

    assert!(!app.state.auth.is_authenticated().await.unwrap());
    assert!(app.access_token().await.is_none());
    assert!(app.refresh_token().await.is_none());
    assert_eq!(app.state.session.state(), SessionState::LoggedOut);
}

#[tokio::test]
async fn test_logout_clears_tokens_without_network() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    app.state.auth.logout().await.unwrap();

    assert!(app.access_token().await.is_none());
    assert!(app.refresh_token().await.is_none());
    assert_eq!(app.state.session.state(), SessionState::LoggedOut);
    assert!(!app.state.auth.is_authenticated().await.unwrap());
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn test_refresh_without_refresh_token_clears_access() {
    let app = spawn_app(Some("a1"), None).await;

    let renewed = app.state.auth.refresh().await.unwrap();

    assert!(renewed.is_none());
    assert!(app.access_token().await.is_none());
    assert_eq!(app.request_count().await, 0);
}

#[tokio::test]
async fn test_refresh_returns_new_token_and_stores_rotation() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a2",
            "refresh": "r2"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let renewed = app.state.auth.refresh().await.unwrap().unwrap();

    assert_eq!(renewed.expose_secret(), "a2");
    assert_eq!(app.access_token().await.as_deref(), Some("a2"));
    assert_eq!(app.refresh_token().await.as_deref(), Some("r2"));
}

#[tokio::test]
async fn test_change_password_posts_both_fields() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("POST"))
        .and(path("/auth/users/set_password/"))
        .and(header("Authorization", "Bearer a1"))
        .and(body_json(json!({
            "current_password": "old-pass",
            "new_password": "new-pass"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&app.server)
        .await;

    let result = app
        .state
        .auth
        .change_password("old-pass", "new-pass")
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn test_update_profile_sends_multipart() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("PATCH"))
        .and(path(ME_PATH))
        .and(header("Authorization", "Bearer a1"))
        .and(|request: &Request| {
            let body = String::from_utf8_lossy(&request.body);
            body.contains("name=\"first_name\"")
                && body.contains("Meera")
                && body.contains("filename=\"avatar.png\"")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "email": "admin@example.com",
            "first_name": "Meera"
        })))
        .expect(1)
        .mount(&app.server)
        .await;

    let form = MultipartForm::new()
        .text("first_name", "Meera")
        .file("profile_image", "avatar.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47]);
    let profile = app.state.auth.update_profile(form).await.unwrap();

    assert_eq!(profile.first_name.as_deref(), Some("Meera"));
}

#[tokio::test]
async fn test_profile_uses_bearer_token() {
    let app = spawn_app(Some("a1"), Some("r1")).await;

    Mock::given(method("GET"))
        .and(path(ME_PATH))
        .and(header("Authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .expect(1)
        .mount(&app.server)
        .await;

    let profile = app.state.auth.profile().await.unwrap();
    assert_eq!(profile.initials(), "AR");
}
