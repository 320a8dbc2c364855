use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::info;
use voyage_core::user::{NewUser, User};
use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/", get(list_users).post(create_user))
        .route("/api/users/{id}/", get(get_user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list_users().await?))
}

async fn create_user(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewUser>,
) -> Result<(StatusCode, Json<User>), AppError> {
    req.validate()?;
    let user = state.users.create_user(&req).await?;
    info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    state
        .users
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))
}
