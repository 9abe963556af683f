//! User agent inspection

/// Markers the Facebook in-app browser puts in its user agent
const IN_APP_MARKERS: &[&str] = &["fban", "fbav"];

/// True when the page runs inside the Facebook/Messenger in-app browser.
///
/// That webview lets the on-screen keyboard cover the input, which is why the
/// widget asks for consent first and pads the chat container on focus.
pub fn is_in_app_browser(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    IN_APP_MARKERS.iter().any(|marker| ua.contains(marker))
}

/// Read `navigator.userAgent`, empty when unavailable
pub fn current_user_agent() -> String {
    web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default()
}
