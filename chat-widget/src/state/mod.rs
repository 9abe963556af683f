//! Widget state: the pure transcript model and its reactive wrapper

pub mod chat;
pub mod transcript;

pub use chat::{provide_chat_context, use_chat_context, ChatContext};
pub use transcript::{ChatEntry, EntryKind, Sender};
