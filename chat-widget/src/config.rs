//! Widget configuration

use crate::utils::constants::{
    CHAT_PATH, DEFAULT_GREETING, FALLBACK_IP, IP_LOOKUP_URL, KEYBOARD_OFFSET_PX,
    SEND_FAILED_MESSAGE,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Backend chat endpoint, relative to the page origin
    pub chat_endpoint: String,
    pub ip_lookup_url: String,
    pub fallback_ip: String,
    /// First message of a fresh session without `prompt_message`
    pub default_greeting: String,
    pub keyboard_offset_px: u32,
    /// Shown in the transcript when a send cycle fails
    pub send_failed_message: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            chat_endpoint: CHAT_PATH.to_string(),
            ip_lookup_url: IP_LOOKUP_URL.to_string(),
            fallback_ip: FALLBACK_IP.to_string(),
            default_greeting: DEFAULT_GREETING.to_string(),
            keyboard_offset_px: KEYBOARD_OFFSET_PX,
            send_failed_message: SEND_FAILED_MESSAGE.to_string(),
        }
    }
}
