//! Browser implementations of the controller ports

pub mod analytics;
pub mod api;
pub mod storage;

pub use analytics::PixelAnalytics;
pub use api::{HttpChatTransport, IpInfoResolver};
pub use storage::SessionThreadStore;
