//! Dashboard aggregation: one round trip returning the calibration report,
//! the word-frequency chart data, and the most recent bets.

use axum::{extract::State, routing::get, Extension, Json, Router};
use calibration_metrics::{calibration_report, CalibrationReport};
use chrono::{Duration, Utc};
use journal_core::Bet;
use serde::Serialize;
use text_frequency::{top_words, word_frequency, WordCount, DEFAULT_TOP_N};

use crate::auth::AuthedUser;
use crate::{ApiResponse, AppError, AppState};

/// Word frequency runs over entries from this many recent days.
const WORD_WINDOW_DAYS: i64 = 7;

/// How many bets the dashboard lists.
const RECENT_BETS: usize = 10;

#[derive(Serialize)]
pub struct DashboardResponse {
    pub calibration: CalibrationReport,
    pub assessment: String,
    pub top_words: Vec<WordCount>,
    pub recent_bets: Vec<Bet>,
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/api/dashboard", get(get_dashboard))
}

async fn get_dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<ApiResponse<DashboardResponse>>, AppError> {
    let bets = state.bets.list(&user.user_id).await?;

    let cutoff = Utc::now() - Duration::days(WORD_WINDOW_DAYS);
    let entries = state.entries.list_since(&user.user_id, cutoff).await?;

    let calibration = calibration_report(&bets);
    let assessment = calibration.assessment();

    let all_text = entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let frequency = word_frequency(&all_text);
    let top_words = top_words(&frequency, DEFAULT_TOP_N);

    let recent_bets: Vec<Bet> = bets.into_iter().take(RECENT_BETS).collect();

    Ok(Json(ApiResponse::success(DashboardResponse {
        calibration,
        assessment,
        top_words,
        recent_bets,
    })))
}
