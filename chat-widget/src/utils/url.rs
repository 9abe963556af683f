//! URL utility functions for reading query parameters

use web_sys::window;

/// Get a query parameter from the current page URL
pub fn get_query_param(key: &str) -> Option<String> {
    let search = window()?.location().search().ok()?;
    parse_query_param(&search, key)
}

/// Find `key` in a `location.search` string.
///
/// Decodes like `URLSearchParams`: `+` is a space, then percent-decoding.
/// The first occurrence wins; a bare key yields an empty string.
pub fn parse_query_param(search: &str, key: &str) -> Option<String> {
    // Remove leading '?' if present
    let query_string = search.strip_prefix('?').unwrap_or(search);
    if query_string.is_empty() {
        return None;
    }

    for pair in query_string.split('&') {
        let (param_key, param_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        if decode_component(param_key) == key {
            return Some(decode_component(param_value));
        }
    }

    None
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plus_decodes_to_space() {
        assert_eq!(
            parse_query_param("?prompt_message=Need+a+quote", "prompt_message"),
            Some("Need a quote".to_string())
        );
    }

    #[test]
    fn test_percent_encoding_and_other_params() {
        let search = "?utm_source=fb&prompt_message=Deck%20%26%20patio%3F&x=1";
        assert_eq!(
            parse_query_param(search, "prompt_message"),
            Some("Deck & patio?".to_string())
        );
        assert_eq!(parse_query_param(search, "x"), Some("1".to_string()));
    }

    #[test]
    fn test_missing_param() {
        assert_eq!(parse_query_param("", "prompt_message"), None);
        assert_eq!(parse_query_param("?", "prompt_message"), None);
        assert_eq!(parse_query_param("?other=1", "prompt_message"), None);
    }

    #[test]
    fn test_bare_key_is_empty_value() {
        assert_eq!(
            parse_query_param("?prompt_message", "prompt_message"),
            Some(String::new())
        );
    }
}
