//! Bet CRUD and resolution endpoints. All handlers operate on the
//! authenticated user's rows only.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use journal_core::Bet;
use serde::Deserialize;

use crate::auth::AuthedUser;
use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct CreateBetRequest {
    pub statement: String,
    pub probability: f64,
}

#[derive(Deserialize)]
pub struct UpdateBetRequest {
    pub statement: String,
    pub probability: f64,
}

#[derive(Deserialize)]
pub struct ResolveBetRequest {
    pub outcome: bool,
}

pub fn bet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bets", get(list_bets).post(create_bet))
        .route(
            "/api/bets/:id",
            get(get_bet).put(update_bet).delete(delete_bet),
        )
        .route("/api/bets/:id/resolve", post(resolve_bet))
}

async fn list_bets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<Vec<Bet>>>, AppError> {
    let bets = state.bets.list(&user.user_id).await?;
    Ok(Json(ApiResponse::success(bets)))
}

async fn create_bet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<CreateBetRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = state
        .bets
        .create(&user.user_id, &req.statement, req.probability)
        .await?;
    Ok(Json(ApiResponse::success(serde_json::json!({ "id": id }))))
}

async fn get_bet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let bet = state
        .bets
        .get(&user.user_id, id)
        .await?
        .ok_or_else(|| journal_core::DomainError::NotFound(format!("Bet not found: {}", id)))?;
    Ok(Json(ApiResponse::success(bet)))
}

async fn update_bet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBetRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    state
        .bets
        .update(&user.user_id, id, &req.statement, req.probability)
        .await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "message": "Bet updated" }),
    )))
}

async fn resolve_bet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
    Json(req): Json<ResolveBetRequest>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let bet = state.bets.resolve(&user.user_id, id, req.outcome).await?;
    Ok(Json(ApiResponse::success(bet)))
}

async fn delete_bet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    state.bets.delete(&user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "message": "Bet deleted" }),
    )))
}
