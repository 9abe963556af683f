//! # Data Transfer Objects (DTOs)
//!
//! ## Module Organization
//!
//! - [`chat`] - `/chat` request, response and error body
//! - [`lookup`] - third-party IP lookup response
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /chat
//! Content-Type: application/json
//!
//! {
//!   "message": "Need a quote",
//!   "user_ip": "203.0.113.7",
//!   "threadId": "0b1c5b8e-58a4-4a3e-9d6f-0a9e4f1d2c3b"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "assistant_response": "Happy to help! What room are you renovating?",
//!   "thread_id": "0b1c5b8e-58a4-4a3e-9d6f-0a9e4f1d2c3b"
//! }
//! ```

pub mod chat;
pub mod lookup;

pub use chat::*;
pub use lookup::*;
