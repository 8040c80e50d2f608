//! Webhook routing. The events endpoint acks before any unfurl work
//! happens; jobs go through the bounded queue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::debug;

use crate::queue::UnfurlJob;
use crate::slack::{EventEnvelope, SlackEvent};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/slack/events", post(slack_events))
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn slack_events(
    State(state): State<AppState>,
    Json(envelope): Json<EventEnvelope>,
) -> Response {
    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { team_id, event } => {
            if let SlackEvent::LinkShared(event) = event {
                debug!(
                    channel = %event.channel,
                    links = event.links.len(),
                    "link_shared event received"
                );
                state.enqueue(UnfurlJob {
                    team_id,
                    channel: event.channel,
                    message_ts: event.message_ts,
                    links: event.links.into_iter().map(|link| link.url).collect(),
                });
            }
            StatusCode::OK.into_response()
        }
        EventEnvelope::Other(_) => StatusCode::OK.into_response(),
    }
}
