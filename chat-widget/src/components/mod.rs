//! UI Components

pub mod chat_window;
pub mod consent_modal;
pub mod message_entry;

pub use chat_window::ChatWindow;
pub use consent_modal::ConsentModal;
pub use message_entry::MessageEntry;
