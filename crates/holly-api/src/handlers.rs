//! Route handler functions for all API endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use holly_core::{find_next_holiday, lookup_holiday, remaining_holidays, weekday_name_of};
use holly_core::{Clock, HolidayRecord, RemainingHolidays};
use holly_dialog::{ConversationSummary, TurnReply};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

/// Request body for POST /api/messages.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    /// Omit to start a new conversation.
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HolidaysResponse {
    pub label: String,
    pub holidays: Vec<HolidayRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NextHolidayResponse {
    pub name: String,
    /// `YYYY-MM-DD` of the resolved occurrence.
    pub date: String,
    pub weekday: String,
    pub wrapped: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub holidays: usize,
    pub conversations: usize,
}

// =============================================================================
// Messaging
// =============================================================================

/// POST /api/messages - handle one user utterance.
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    let reply = state.bot.handle_message(&req.text, req.conversation_id)?;
    tracing::debug!(
        conversation = %reply.conversation_id,
        intent = %reply.intent,
        replies = reply.replies.len(),
        "Message handled"
    );
    Ok(Json(reply))
}

/// GET /api/conversations
pub async fn list_conversations(State(state): State<AppState>) -> Json<Vec<ConversationSummary>> {
    Json(state.bot.conversations().list())
}

/// GET /api/conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationSummary>, ApiError> {
    Ok(Json(state.bot.conversations().get(id)?))
}

/// DELETE /api/conversations/{id}
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.bot.conversations().remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Holiday catalog
// =============================================================================

/// GET /api/holidays - the whole catalog in order.
pub async fn list_holidays(State(state): State<AppState>) -> Json<HolidaysResponse> {
    Json(HolidaysResponse {
        label: state.config.catalog.label.clone(),
        holidays: state.bot.catalog().all_holidays().to_vec(),
    })
}

/// GET /api/holidays/next
pub async fn next_holiday(
    State(state): State<AppState>,
) -> Result<Json<NextHolidayResponse>, ApiError> {
    let today = state.bot.router().clock().today();
    let next = find_next_holiday(state.bot.catalog(), today)
        .ok_or_else(|| ApiError::NotFound("no upcoming holiday".to_string()))?;
    Ok(Json(NextHolidayResponse {
        name: next.record.name.clone(),
        date: next.date.format("%Y-%m-%d").to_string(),
        weekday: weekday_name_of(next.date).to_string(),
        wrapped: next.wrapped,
    }))
}

/// GET /api/holidays/remaining
pub async fn remaining(State(state): State<AppState>) -> Json<RemainingHolidays> {
    let today = state.bot.router().clock().today();
    Json(remaining_holidays(state.bot.catalog(), today))
}

/// GET /api/holidays/{name} - case-insensitive lookup.
pub async fn get_holiday(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<HolidayRecord>, ApiError> {
    lookup_holiday(state.bot.catalog(), &name)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("holiday '{}' not found", name)))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        holidays: state.bot.catalog().len(),
        conversations: state.bot.conversations().len(),
    })
}
