//! HTTP surface for the journaling and prediction-tracking service.
//!
//! Thin axum layer over the owner-scoped stores: routes validate and
//! dispatch, the stores enforce per-user isolation, and the analyzer
//! crates do the (small) actual computation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Json, Router};
use journal_core::DomainError;
use journal_store::{BetStore, EntryStore, JournalDb};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub mod auth;
pub mod bet_routes;
pub mod brute_force;
pub mod dashboard_routes;
pub mod entry_routes;
pub mod request_id;

use brute_force::BruteForceGuard;

#[derive(Clone)]
pub struct AppState {
    pub bets: Arc<BetStore>,
    pub entries: Arc<EntryStore>,
    pub brute_force_guard: Arc<BruteForceGuard>,
}

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error type for handlers. Domain errors map to client-facing status
/// codes; everything else is a 500 with the detail kept in the logs.
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0.downcast_ref::<DomainError>() {
            Some(DomainError::InvalidInput(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            Some(DomainError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg.clone()),
            Some(DomainError::Conflict(msg)) => (StatusCode::CONFLICT, msg.clone()),
            Some(DomainError::DatabaseError(_)) | None => {
                tracing::error!("Internal error: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn app(state: AppState) -> Router {
    Router::new()
        .merge(bet_routes::bet_routes())
        .merge(entry_routes::entry_routes())
        .merge(dashboard_routes::dashboard_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id::request_id_middleware))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:foresight.db".to_string());
    let db = JournalDb::new(&database_url).await?;

    let state = AppState {
        bets: Arc::new(BetStore::new(db.clone())),
        entries: Arc::new(EntryStore::new(db)),
        brute_force_guard: Arc::new(BruteForceGuard::new()),
    };

    // Periodic sweep of stale brute-force records
    let guard = state.brute_force_guard.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            guard.cleanup();
        }
    });

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
