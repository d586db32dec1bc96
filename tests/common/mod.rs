#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use storefront_catalog::auth::jwt::sign_token;
use storefront_catalog::routes::build_app;
use storefront_catalog::state::AppState;
use storefront_catalog::store::MemoryProductStore;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryProductStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryProductStore::new());
        let app = build_app(AppState::new(store.clone(), SECRET));
        Self { app, store }
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        match body {
            Some(body) => self.send_raw(method, uri, token, "application/json", body.to_string()).await,
            None => self.dispatch(authorized(method, uri, token).body(Body::empty()).unwrap()).await,
        }
    }

    /// Sends `body` verbatim with the given content type.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: &str,
        body: impl Into<String>,
    ) -> (StatusCode, Value) {
        let request = authorized(method, uri, token)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.into()))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    /// Creates a product as admin and returns its id.
    pub async fn create_product(&self, name: &str, category: i64, price: f64) -> i64 {
        let (status, body) = self
            .send(Method::POST, "/api/products", Some(&admin_token()), Some(product_body(name, category, price)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn add_review(&self, product_id: i64, token: &str, rating: i32) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/products/{product_id}/reviews"),
            Some(token),
            Some(json!({ "rating": rating, "comment": format!("{rating} stars") })),
        )
        .await
    }
}

fn authorized(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn token(user_id: i64, role: &str, username: &str) -> String {
    sign_token(user_id, role, username, SECRET, Duration::minutes(10)).unwrap()
}

pub fn admin_token() -> String {
    token(1, "admin", "root")
}

pub fn product_body(name: &str, category: i64, price: f64) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "brand": "Acme",
        "category": category,
        "price": price,
        "quantity": 10,
    })
}

pub fn ids(products: &Value) -> Vec<i64> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect()
}
