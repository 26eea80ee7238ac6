//! Shared fixtures for router tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use tower::ServiceExt;

use painel_api::{AppState, create_router};
use painel_core::reports::{ErpError, ErpQuery, ErpRow, ErpSource, ExclusionSet};
use painel_shared::{Claims, JwtConfig, JwtService};

pub const SECRET: &str = "router-test-secret";

/// Fake ERP: records queries, answers with canned rows or a canned error.
#[derive(Default)]
pub struct RecordingErp {
    rows: Mutex<Vec<ErpRow>>,
    fail_with: Mutex<Option<ErpError>>,
    queries: Mutex<Vec<ErpQuery>>,
}

impl RecordingErp {
    pub fn with_rows(rows: Vec<ErpRow>) -> Arc<Self> {
        let erp = Self::default();
        *erp.rows.lock().unwrap() = rows;
        Arc::new(erp)
    }

    pub fn failing(err: ErpError) -> Arc<Self> {
        let erp = Self::default();
        *erp.fail_with.lock().unwrap() = Some(err);
        Arc::new(erp)
    }

    pub fn queries(&self) -> Vec<ErpQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErpSource for RecordingErp {
    async fn query(&self, query: &ErpQuery) -> Result<Vec<ErpRow>, ErpError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}

pub fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        access_token_expires_secs: 3600,
    })
}

pub fn router(db: DatabaseConnection, erp: Arc<RecordingErp>, exclusions: ExclusionSet) -> Router {
    create_router(AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt()),
        erp,
        exclusions: Arc::new(exclusions),
    })
}

pub fn token(is_admin: bool, codes: Vec<i32>) -> String {
    jwt()
        .encode_claims(&Claims::new(
            1,
            "user@acme.com",
            is_admin,
            codes,
            Utc::now() + Duration::hours(1),
        ))
        .unwrap()
}

pub fn expired_token() -> String {
    jwt()
        .encode_claims(&Claims::new(
            1,
            "user@acme.com",
            false,
            vec![101],
            Utc::now() - Duration::hours(2),
        ))
        .unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn send(router: Router, request: Request<Body>) -> (Response<Body>, serde_json::Value) {
    let response = router.oneshot(request).await.unwrap();
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (Response::from_parts(parts, Body::empty()), json)
}
