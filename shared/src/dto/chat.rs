//! # Chat Data Transfer Objects
//!
//! Request and response structures for the `POST /chat` endpoint.

use serde::{Deserialize, Serialize};

/// Message sent by the widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_ip: String,
    /// Present only once the backend has handed out a thread
    #[serde(
        rename = "threadId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, user_ip: impl Into<String>, thread_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            user_ip: user_ip.into(),
            thread_id,
        }
    }
}

/// Assistant reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub assistant_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Error body returned with every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
