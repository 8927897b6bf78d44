//! Common test utilities for integration tests
//!
//! The router runs in-process over a `MemoryStore`, so these tests need no
//! database. Users are inserted straight into the store and get a freshly
//! minted access token; the auth tests go through `/v1/auth/register`
//! instead.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use budgetboard_api::app::{build_router, AppState};
use budgetboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use budgetboard_shared::auth::jwt::{create_token, Claims, TokenType};
use budgetboard_shared::db::memory::MemoryStore;
use budgetboard_shared::db::store::Store;
use budgetboard_shared::models::user::NewUser;
use serde_json::Value;
use std::sync::Arc;
use tower::Service as _;

pub const SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and its store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<dyn Store>,
    pub config: Config,
}

/// Status and parsed JSON body (`Null` for an empty body)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestContext {
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: SECRET.to_string(),
            },
        };

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let app = build_router(AppState::new(store.clone(), config.clone()));

        Self { app, store, config }
    }

    /// Inserts a user and returns its id and an access token
    pub async fn user(&self, username: &str) -> (i64, String) {
        let user = self
            .store
            .insert_user(&NewUser {
                username: username.to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
            })
            .await
            .expect("insert user");
        let token = create_token(&Claims::new(user.id, TokenType::Access), SECRET).expect("token");
        (user.id, token)
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Some(token), None).await
    }

    /// Creates a board through the API and returns its id
    pub async fn board(&self, token: &str, name: &str) -> i64 {
        let response = self
            .post("/v1/boards", token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
