//! Values the widget and the backend must agree on.

/// Path of the chat endpoint, relative to the page origin.
pub const CHAT_PATH: &str = "/chat";

/// First message sent on a fresh session when the page carries no `prompt_message`.
///
/// The backend skips lead extraction for this exact text.
pub const DEFAULT_GREETING: &str = "Hello Samm, I need help with my renovation project.";
