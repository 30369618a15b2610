//! Credential lookup.
//!
//! The API key only ever comes from the process environment; it is read once
//! at startup and handed to the generation client.

/// Environment variables consulted in order.
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// First non-blank value among [`API_KEY_VARS`] according to `lookup`.
pub fn resolve_api_key<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub fn api_key_from_env() -> Option<String> {
    resolve_api_key(|name| std::env::var(name).ok())
}
