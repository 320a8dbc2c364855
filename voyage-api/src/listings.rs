use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::info;
use voyage_core::listing::{Listing, ListingInput};
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/listings/", get(list_listings).post(create_listing))
        .route(
            "/api/listings/{id}/",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
}

fn not_found() -> AppError {
    AppError::NotFoundError("Listing not found".to_string())
}

async fn list_listings(State(state): State<AppState>) -> Result<Json<Vec<Listing>>, AppError> {
    Ok(Json(state.listings.list_listings().await?))
}

async fn create_listing(
    State(state): State<AppState>,
    AppJson(req): AppJson<ListingInput>,
) -> Result<(StatusCode, Json<Listing>), AppError> {
    req.validate()?;
    let listing = state.listings.create_listing(&req).await?;
    info!("Created listing {} ({})", listing.id, listing.title);
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Listing>, AppError> {
    state.listings.get_listing(id).await?.map(Json).ok_or_else(not_found)
}

async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<ListingInput>,
) -> Result<Json<Listing>, AppError> {
    req.validate()?;
    state.listings.update_listing(id, &req).await?.map(Json).ok_or_else(not_found)
}

/// Removes the listing together with its bookings and reviews.
async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.listings.delete_listing(id).await? {
        info!("Deleted listing {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
