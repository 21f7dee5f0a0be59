//! Telegram webhook ingestion.
//!
//! The webhook route answers `200 OK` for every request: unsupported updates,
//! filtered chats, unparseable bodies and failed inserts are logged and dropped.
//! Telegram redelivers any update answered with another status.

use axum::{body::Bytes, extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::platform::telegram::Update;
use crate::post::TelegramPost;
use crate::server::AppState;
use crate::store::PostStore;

/// Per-process ingest policy, copied out of the config at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSettings {
    /// Only this chat is stored when set.
    pub allowed_chat_id: Option<i64>,
    /// Fall back to `update.message` when there is no channel post.
    pub accept_direct_messages: bool,
}

/// What happened to one update. Never surfaced to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Neither a channel post nor an accepted message.
    NoMessage,
    /// Chat does not match the allowed chat id.
    Filtered { chat_id: i64 },
    Stored { chat_id: i64, message_id: i64 },
    InsertFailed { chat_id: i64, message_id: i64 },
}

/// Map one update to a post and insert it. Insert errors are logged, not returned.
pub async fn ingest(
    store: &dyn PostStore,
    settings: &IngestSettings,
    update: &Update,
) -> IngestOutcome {
    let msg = match update.candidate_message(settings.accept_direct_messages) {
        Some(msg) => msg,
        None => {
            debug!(update_id = update.update_id, "Ignoring update without a channel post");
            return IngestOutcome::NoMessage;
        }
    };

    let chat_id = msg.chat.id;
    let message_id = msg.message_id;

    if let Some(allowed) = settings.allowed_chat_id {
        if chat_id != allowed {
            debug!(chat_id, allowed, "Ignoring post from non-allowed chat");
            return IngestOutcome::Filtered { chat_id };
        }
    }

    let post = TelegramPost::from_message(msg);

    match store.insert(&post).await {
        Ok(()) => {
            info!(
                chat_id,
                message_id,
                media_type = %post.media_type,
                "Saved post {} from chat {}",
                message_id,
                chat_id
            );
            IngestOutcome::Stored {
                chat_id,
                message_id,
            }
        }
        Err(e) => {
            error!(chat_id, message_id, "Supabase insert failed: {:#}", e);
            IngestOutcome::InsertFailed {
                chat_id,
                message_id,
            }
        }
    }
}

/// `POST /telegram/webhook`
pub async fn telegram_webhook(State(state): State<AppState>, body: Bytes) -> StatusCode {
    debug!("Telegram webhook payload: {}", String::from_utf8_lossy(&body));

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Dropping unparseable webhook body ({} bytes): {}", body.len(), e);
            return StatusCode::OK;
        }
    };

    let outcome = ingest(&*state.store, &state.settings, &update).await;
    debug!("Webhook handled: {:?}", outcome);
    StatusCode::OK
}

/// `GET /`
pub async fn liveness() -> &'static str {
    "Telegram channel → Supabase bot is running"
}

/// `GET /test-insert`, mounted only when enabled in the config.
pub async fn test_insert(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let probe = TelegramPost::connectivity_probe();

    match state.store.insert(&probe).await {
        Ok(()) => {
            info!("Test insert succeeded");
            Ok(Json(json!({ "ok": true })))
        }
        Err(e) => {
            error!("Test insert failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ok": false, "error": format!("{:#}", e) })),
            ))
        }
    }
}
