#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{header, HeaderMap, Method, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;
use voyage_api::{app, AppState, Repositories};
use voyage_payment::{ChapaClient, GatewaySettings, PaymentFlowController};
use voyage_shared::BookingConfirmationEmail;
use voyage_store::app_config::CorsConfig;
use voyage_store::{ChannelEmailQueue, MemoryStore};

pub const SECRET: &str = "CHASECK_TEST-integration";
pub const CALLBACK_URL: &str = "http://127.0.0.1:8000/api/verify-payment/";

/// Local stand-in for the Chapa API with switchable replies.
#[derive(Clone)]
pub struct ChapaStub {
    initialize_reply: Arc<Mutex<(StatusCode, Value)>>,
    verify_reply: Arc<Mutex<(StatusCode, Value)>>,
    initialized: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    verified: Arc<Mutex<Vec<String>>>,
}

impl Default for ChapaStub {
    fn default() -> Self {
        Self {
            initialize_reply: Arc::new(Mutex::new((
                StatusCode::OK,
                json!({
                    "message": "Hosted Link",
                    "status": "success",
                    "data": {"checkout_url": "https://checkout.chapa.co/checkout/payment/test"}
                }),
            ))),
            verify_reply: Arc::new(Mutex::new((StatusCode::OK, settled("success")))),
            initialized: Arc::default(),
            verified: Arc::default(),
        }
    }
}

impl ChapaStub {
    pub fn reply_to_initialize(&self, status: StatusCode, body: Value) {
        *self.initialize_reply.lock().unwrap() = (status, body);
    }

    pub fn reply_to_verify(&self, status: StatusCode, body: Value) {
        *self.verify_reply.lock().unwrap() = (status, body);
    }

    /// `(Authorization header, JSON body)` per initialize call.
    pub fn initialize_calls(&self) -> Vec<(Option<String>, Value)> {
        self.initialized.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> Vec<String> {
        self.verified.lock().unwrap().clone()
    }
}

/// Verify body whose `data.status` is `status`.
pub fn settled(status: &str) -> Value {
    json!({
        "message": "Payment details",
        "status": "success",
        "data": {"status": status, "currency": "ETB"}
    })
}

async fn initialize_handler(
    State(stub): State<ChapaStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    stub.initialized.lock().unwrap().push((auth, body));
    let (status, reply) = stub.initialize_reply.lock().unwrap().clone();
    (status, Json(reply))
}

async fn verify_handler(
    State(stub): State<ChapaStub>,
    Path(tx_ref): Path<String>,
) -> (StatusCode, Json<Value>) {
    stub.verified.lock().unwrap().push(tx_ref);
    let (status, reply) = stub.verify_reply.lock().unwrap().clone();
    (status, Json(reply))
}

async fn start_chapa_stub() -> (String, ChapaStub) {
    let stub = ChapaStub::default();
    let router = Router::new()
        .route("/v1/transaction/initialize", post(initialize_handler))
        .route("/v1/transaction/verify/{tx_ref}", get(verify_handler))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}/v1", addr), stub)
}

async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

pub fn allow_all_cors() -> CorsConfig {
    CorsConfig { allow_all_origins: true, allowed_origins: vec![] }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub emails: UnboundedReceiver<BookingConfirmationEmail>,
    pub chapa: ChapaStub,
}

pub struct Seeded {
    pub user_id: i64,
    pub listing_id: i64,
    pub booking_id: i64,
}

pub async fn spawn_app() -> TestApp {
    build(Some(SECRET), false, allow_all_cors()).await
}

pub async fn spawn_app_without_secret() -> TestApp {
    build(None, false, allow_all_cors()).await
}

pub async fn spawn_app_with_gateway_down() -> TestApp {
    build(Some(SECRET), true, allow_all_cors()).await
}

pub async fn spawn_app_with_cors(cors: CorsConfig) -> TestApp {
    build(Some(SECRET), false, cors).await
}

async fn build(secret: Option<&str>, gateway_down: bool, cors: CorsConfig) -> TestApp {
    let (stub_url, chapa) = start_chapa_stub().await;
    let base_url = if gateway_down { closed_port_url().await } else { stub_url };

    let store = MemoryStore::new();
    let repos = Repositories::memory(store.clone());
    let (queue, emails) = ChannelEmailQueue::channel();

    let gateway = ChapaClient::new(&base_url, Duration::from_secs(5)).unwrap();
    let payments = PaymentFlowController::new(
        Arc::new(gateway),
        repos.bookings.clone(),
        repos.payments.clone(),
        GatewaySettings {
            secret_key: secret.map(String::from),
            callback_url: CALLBACK_URL.to_string(),
        },
    );

    let state = AppState::new(repos, Arc::new(queue), payments);
    TestApp { router: app(state, &cors), store, emails, chapa }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn create_user(&self, email: &str, first_name: &str, last_name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/users/",
                json!({"email": email, "first_name": first_name, "last_name": last_name}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_listing(&self, price_per_night: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/listings/",
                json!({
                    "title": "Rock-hewn church guesthouse",
                    "description": "Two rooms overlooking Bete Giyorgis",
                    "location": "Lalibela",
                    "price_per_night": price_per_night
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    pub async fn create_booking(&self, user_id: i64, listing_id: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/bookings/",
                json!({
                    "user_id": user_id,
                    "listing_id": listing_id,
                    "destination": "Lalibela",
                    "date": "2026-12-24",
                    "price": "150.00"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_i64().unwrap()
    }

    /// Guest with a full name, a 150.00 listing and one booking of it.
    pub async fn seed_booking(&self) -> Seeded {
        let user_id = self.create_user("guest@example.com", "Abebe", "Bikila").await;
        let listing_id = self.create_listing("150.00").await;
        let booking_id = self.create_booking(user_id, listing_id).await;
        Seeded { user_id, listing_id, booking_id }
    }
}
