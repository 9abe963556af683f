//! # Chat Handler
//!
//! `POST /chat`: validate the request, apply the per-IP rate limit, record
//! the prompt for lead capture, then ask the assistant for a reply on the
//! visitor's thread.

use std::sync::Arc;

use axum::extract::{Json, State};
use shared::dto::chat::{ChatRequest, ChatResponse};
use shared::utils::normalize_message;
use tracing::{error, info, instrument, warn};

use crate::assistant::Assistant;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::leads::LeadBook;
use crate::rate_limit::RateLimiter;
use crate::threads::{ThreadRegistry, Turn};


#[instrument(
    skip_all,
    fields(user_ip = %req.user_ip, thread_id = ?req.thread_id)
)]
pub async fn chat(
    State(config): State<Arc<Config>>,
    State(assistant): State<Arc<dyn Assistant>>,
    State(threads): State<Arc<ThreadRegistry>>,
    State(leads): State<Arc<LeadBook>>,
    State(limiter): State<Arc<RateLimiter>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let user_ip = req.user_ip.trim();
    if user_ip.is_empty() {
        warn!("[CHAT] Missing user IP");
        return Err(AppError::InvalidInput(
            "User IP address is required.".to_string(),
        ));
    }

    let Some(message) = normalize_message(&req.message) else {
        warn!("[CHAT] Empty message");
        return Err(AppError::InvalidInput("Message must not be empty.".to_string()));
    };

    if !limiter.check(user_ip).await {
        return Err(AppError::RateLimited(user_ip.to_string()));
    }

    info!("[CHAT] Received chat request from {}", user_ip);
    leads.record(user_ip, &message).await;

    let thread_id = threads.resolve(req.thread_id.as_deref()).await;

    let history_len = config.assistant.context_window.saturating_sub(1);
    let mut turns = threads.recent(&thread_id, history_len).await;
    turns.push(Turn::user(message.as_str()));

    let reply = match assistant.reply(&turns).await {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => {
            warn!(thread_id = %thread_id, "[CHAT] Assistant returned an empty reply");
            return Err(AppError::unavailable());
        }
        Err(e) => {
            error!(thread_id = %thread_id, "[CHAT] Assistant failed: {}", e);
            return Err(AppError::unavailable());
        }
    };

    // Only completed exchanges are stored
    threads
        .append(&thread_id, [Turn::user(message), Turn::assistant(reply.as_str())])
        .await;

    info!(thread_id = %thread_id, "[CHAT] Reply sent");
    Ok(Json(ChatResponse {
        assistant_response: reply,
        thread_id: Some(thread_id),
    }))
}
