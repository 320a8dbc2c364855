use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::{info, warn};
use voyage_core::booking::{Booking, NewBooking};
use voyage_shared::BookingConfirmationEmail;
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings/", get(list_bookings).post(create_booking))
        .route("/api/bookings/{id}/", get(get_booking).delete(delete_booking))
}

fn not_found() -> AppError {
    AppError::NotFoundError("Booking not found".to_string())
}

async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_bookings().await?))
}

/// Persists the booking, then queues the confirmation email for the guest.
///
/// The booking stands even if the queue is down; the failure is only logged.
async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewBooking>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    req.validate()?;

    let user = state
        .users
        .get_user(req.user_id)
        .await?
        .ok_or_else(|| AppError::ValidationError(format!("user {} does not exist", req.user_id)))?;
    if state.listings.get_listing(req.listing_id).await?.is_none() {
        return Err(AppError::ValidationError(format!("listing {} does not exist", req.listing_id)));
    }

    let booking = state.bookings.create_booking(&req).await?;
    info!("Booking {} created for listing {}", booking.id, booking.listing_id);

    let job = BookingConfirmationEmail::new(user.email, booking.confirmation_details());
    let recipient = job.recipient.email_hint();
    match state.email_queue.enqueue(job).await {
        Ok(()) => info!("Queued confirmation email for booking {} to {}", booking.id, recipient),
        Err(e) => warn!("Could not queue confirmation email for booking {}: {}", booking.id, e),
    }

    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    state.bookings.get_booking(id).await?.map(Json).ok_or_else(not_found)
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.bookings.delete_booking(id).await? {
        info!("Deleted booking {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
