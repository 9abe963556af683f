//! # HTTP Handlers

pub mod chat;
