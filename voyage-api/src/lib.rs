use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use voyage_store::app_config::CorsConfig;

pub mod bookings;
pub mod error;
pub mod extract;
pub mod listings;
pub mod mailer;
pub mod payments;
pub mod reviews;
pub mod state;
pub mod users;
pub mod worker;

pub use state::{AppState, Repositories};

pub fn app(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(users::routes())
        .merge(listings::routes())
        .merge(bookings::routes())
        .merge(reviews::routes())
        .merge(payments::routes())
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT]);

    if config.allow_all_origins {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
