//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the chat widget (WASM) and the chat backend.
//! All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::chat`]**: The `/chat` request/response pair and the error body
//!   - **[`dto::lookup`]**: The IP lookup payload consumed by the widget
//! - **[`constants`]**: Values both sides must agree on (endpoint path, default greeting)
//! - **[`utils`]**: Shared helpers for message normalization
//!
//! ## Wire Format
//!
//! - Field names are **snake_case**, except the thread id on the request which the widget
//!   has always sent as `threadId`
//! - Optional fields are omitted from JSON when `None`
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::chat::ChatRequest;
//!
//! let request = ChatRequest::new("Need a quote", "1.2.3.4", None);
//! let json = serde_json::to_value(&request).unwrap();
//! assert_eq!(json["message"], "Need a quote");
//! assert!(json.get("threadId").is_none());
//! ```

pub mod constants;
pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
