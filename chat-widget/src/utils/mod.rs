//! Helpers with no reactive state

pub mod constants;
pub mod url;
pub mod user_agent;
