//! Application constants

pub use shared::constants::{CHAT_PATH, DEFAULT_GREETING};

pub const IP_LOOKUP_URL: &str = "https://ipinfo.io/json";

/// Used for every request when the lookup fails
pub const FALLBACK_IP: &str = "1.2.3.4";

/// Session storage key holding the backend thread id
pub const THREAD_ID_KEY: &str = "threadId";

/// Query parameter carrying a pre-filled first message
pub const PROMPT_PARAM: &str = "prompt_message";

pub const ASSISTANT_NAME: &str = "samm";
pub const ASSISTANT_AVATAR: &str = "images/samm_dp.png";
pub const USER_NAME: &str = "user";
pub const USER_AVATAR: &str = "images/user_dp.png";

/// Approximate on-screen keyboard height in the Facebook in-app browser.
/// Not measured; the webview doesn't report it.
pub const KEYBOARD_OFFSET_PX: u32 = 400;

/// Class added to `<body>` when the in-app browser is detected
pub const IN_APP_BODY_CLASS: &str = "facebook-in-app";

pub const SEND_FAILED_MESSAGE: &str =
    "Sorry, something went wrong while reaching Samm. Please try again.";

// DOM ids other scripts and the stylesheet rely on
pub const USER_INPUT_ID: &str = "user-input";
pub const SEND_BUTTON_ID: &str = "send-button";
pub const CHAT_HISTORY_ID: &str = "chat-history";
pub const CHAT_CONTAINER_ID: &str = "chat-container";
pub const CONSENT_MODAL_ID: &str = "chatConsentModal";
pub const AGREE_BUTTON_ID: &str = "agreeButton";
