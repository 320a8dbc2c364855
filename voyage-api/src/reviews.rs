use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use voyage_core::review::{Review, ReviewInput};
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews/", get(list_reviews).post(create_review))
        .route(
            "/api/reviews/{id}/",
            get(get_review).put(update_review).delete(delete_review),
        )
}

fn not_found() -> AppError {
    AppError::NotFoundError("Review not found".to_string())
}

/// Rating range plus both referenced rows must exist.
async fn check_review(state: &AppState, req: &ReviewInput) -> Result<(), AppError> {
    req.validate()?;
    if state.listings.get_listing(req.listing_id).await?.is_none() {
        return Err(AppError::ValidationError(format!("listing {} does not exist", req.listing_id)));
    }
    if state.users.get_user(req.user_id).await?.is_none() {
        return Err(AppError::ValidationError(format!("user {} does not exist", req.user_id)));
    }
    Ok(())
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, AppError> {
    Ok(Json(state.reviews.list_reviews().await?))
}

async fn create_review(
    State(state): State<AppState>,
    AppJson(req): AppJson<ReviewInput>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    check_review(&state, &req).await?;
    let review = state.reviews.create_review(&req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>, AppError> {
    state.reviews.get_review(id).await?.map(Json).ok_or_else(not_found)
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<ReviewInput>,
) -> Result<Json<Review>, AppError> {
    check_review(&state, &req).await?;
    state.reviews.update_review(id, &req).await?.map(Json).ok_or_else(not_found)
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.reviews.delete_review(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
