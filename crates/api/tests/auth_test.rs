//! Router tests for login, the session guard and admin-only routes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use common::{RecordingErp, jwt, post_json, router, send, token};
use painel_core::auth::hash_password;
use painel_core::reports::ExclusionSet;
use painel_db::entities::users;

fn account(password: &str) -> users::Model {
    let now = Utc::now().fixed_offset();
    users::Model {
        id: 7,
        nome: "Maria".to_string(),
        nome_empresa: "Acme".to_string(),
        cpf: "00000000000".to_string(),
        cnpj: Some("11222333000181".to_string()),
        codi_emp: serde_json::json!([101, 102]),
        celular: "11999990000".to_string(),
        email: "maria@acme.com".to_string(),
        password_hash: hash_password(password).unwrap(),
        is_admin: false,
        created_at: now,
        updated_at: now,
    }
}

fn db_with(results: Vec<Vec<users::Model>>) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(results)
        .into_connection()
}

#[tokio::test]
async fn test_login_issues_token_and_cookie() {
    let app = router(
        db_with(vec![vec![account("s3cret!")]]),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let (response, body) = send(
        app,
        post_json(
            "/login",
            None,
            r#"{"email": "  Maria@ACME.com ", "password": "s3cret!"}"#,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let token = body["access_token"].as_str().unwrap();
    let claims = jwt().validate_token(token).unwrap();
    assert_eq!(claims.sub, 7);
    assert_eq!(claims.codi_emp, vec![101, 102]);
    assert!(!claims.is_admin);

    assert_eq!(body["user"]["email"], "maria@acme.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = router(
        db_with(vec![vec![account("s3cret!")]]),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let (response, body) = send(
        app,
        post_json("/login", None, r#"{"email": "maria@acme.com", "password": "nope"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_login_unknown_email_looks_like_wrong_password() {
    let app = router(
        db_with(vec![vec![]]),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let (response, body) = send(
        app,
        post_json("/login", None, r#"{"email": "ghost@acme.com", "password": "x"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_login_requires_both_fields() {
    let app = router(
        DatabaseConnection::default(),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let (response, body) = send(app, post_json("/login", None, r#"{"email": "a@b.com"}"#)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_company_account_cannot_manage_users() {
    let app = router(
        DatabaseConnection::default(),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let request = Request::get("/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(false, vec![101])))
        .body(Body::empty())
        .unwrap();
    let (response, body) = send(app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_admin_lists_users() {
    let app = router(
        db_with(vec![vec![account("s3cret!")]]),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let request = Request::get("/users")
        .header(header::AUTHORIZATION, format!("Bearer {}", token(true, vec![])))
        .body(Body::empty())
        .unwrap();
    let (response, body) = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "maria@acme.com");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let app = router(
        DatabaseConnection::default(),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let request = Request::get("/empresas")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (response, body) = send(app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = router(
        DatabaseConnection::default(),
        RecordingErp::with_rows(vec![]),
        ExclusionSet::default(),
    );

    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (response, body) = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
