//! Seams between the controller and the browser.
//!
//! The controller only talks to these traits; `services` and `state::chat`
//! provide the browser implementations and tests provide in-memory ones.

use async_trait::async_trait;
use shared::dto::chat::{ChatRequest, ChatResponse};

use crate::error::Result;
use crate::state::Sender;

/// Backend chat endpoint
#[async_trait(?Send)]
pub trait ChatTransport {
    async fn post_message(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Public IP lookup
#[async_trait(?Send)]
pub trait IpResolver {
    async fn resolve(&self) -> Result<String>;
}

/// Where the backend thread id lives between page loads of the same tab
pub trait ThreadStore {
    fn load(&self) -> Option<String>;
    fn save(&self, thread_id: &str);
}

/// Conversion tracking fired on send-button activation
pub trait Analytics {
    fn track_lead(&self);
}

/// Everything the controller renders
pub trait ChatView {
    fn append_message(&self, sender: Sender, text: &str);
    fn append_error(&self, text: &str);
    fn show_loader(&self, cycle: u64);
    fn remove_loader(&self, cycle: u64);
    fn set_send_enabled(&self, enabled: bool);
    fn scroll_to_bottom(&self);
    fn set_consent_visible(&self, visible: bool);
    /// Bottom padding on the chat container, 0 to reset
    fn set_keyboard_padding(&self, px: u32);
    /// Scroll the chat container's end into view
    fn reveal_container(&self);
}
