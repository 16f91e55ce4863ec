//! Journal entry CRUD endpoints, owner-scoped like the bet routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use journal_core::{Entry, EntryKind};
use serde::Deserialize;

use crate::auth::AuthedUser;
use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    pub kind: EntryKind,
    pub text: String,
}

#[derive(Deserialize)]
pub struct UpdateEntryRequest {
    pub kind: EntryKind,
    pub text: String,
}

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/api/entries", get(list_entries).post(create_entry))
        .route(
            "/api/entries/:id",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

async fn list_entries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<Vec<Entry>>>, AppError> {
    let entries = state.entries.list(&user.user_id).await?;
    Ok(Json(ApiResponse::success(entries)))
}

async fn create_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = state
        .entries
        .create(&user.user_id, req.kind, &req.text)
        .await?;
    Ok(Json(ApiResponse::success(serde_json::json!({ "id": id }))))
}

async fn get_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Entry>>, AppError> {
    let entry = state
        .entries
        .get(&user.user_id, id)
        .await?
        .ok_or_else(|| journal_core::DomainError::NotFound(format!("Entry not found: {}", id)))?;
    Ok(Json(ApiResponse::success(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    state
        .entries
        .update(&user.user_id, id, req.kind, &req.text)
        .await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "message": "Entry updated" }),
    )))
}

async fn delete_entry(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    state.entries.delete(&user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        serde_json::json!({ "message": "Entry deleted" }),
    )))
}
