use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

fn default_chat_limit() -> u32 {
    150
}

fn default_analysis_limit() -> u32 {
    100
}

fn default_draft_limit() -> u32 {
    200
}

/// Maximum output tokens requested per operation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OutputLimits {
    #[serde(default = "default_chat_limit")]
    pub chat_max_output_tokens: u32,
    #[serde(default = "default_analysis_limit")]
    pub analysis_max_output_tokens: u32,
    #[serde(default = "default_draft_limit")]
    pub draft_max_output_tokens: u32,
}

impl Default for OutputLimits {
    fn default() -> Self {
        Self {
            chat_max_output_tokens: default_chat_limit(),
            analysis_max_output_tokens: default_analysis_limit(),
            draft_max_output_tokens: default_draft_limit(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Model id, e.g. "gemini-2.5-flash"
    pub model: Option<String>,
    /// API root the model methods are appended to
    pub base_url: Option<String>,
    /// Site profile TOML replacing the built-in one
    pub profile: Option<PathBuf>,
    #[serde(default)]
    pub limits: OutputLimits,
}

/// Keys accepted by `folio set` / `folio unset`.
pub const CONFIG_KEYS: [&str; 6] = [
    "model",
    "base-url",
    "profile",
    "chat-max-output-tokens",
    "analysis-max-output-tokens",
    "draft-max-output-tokens",
];

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

fn parse_limit(key: &str, value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(format!("{key} must be a positive integer, got '{value}'")),
        Ok(limit) => Ok(limit),
    }
}

impl Config {
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("a value is required for {key}"));
        }
        match key {
            "model" => self.model = Some(value.to_string()),
            "base-url" => self.base_url = Some(value.to_string()),
            "profile" => self.profile = Some(PathBuf::from(value)),
            "chat-max-output-tokens" => {
                self.limits.chat_max_output_tokens = parse_limit(key, value)?
            }
            "analysis-max-output-tokens" => {
                self.limits.analysis_max_output_tokens = parse_limit(key, value)?
            }
            "draft-max-output-tokens" => {
                self.limits.draft_max_output_tokens = parse_limit(key, value)?
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        let defaults = OutputLimits::default();
        match key {
            "model" => self.model = None,
            "base-url" => self.base_url = None,
            "profile" => self.profile = None,
            "chat-max-output-tokens" => {
                self.limits.chat_max_output_tokens = defaults.chat_max_output_tokens
            }
            "analysis-max-output-tokens" => {
                self.limits.analysis_max_output_tokens = defaults.analysis_max_output_tokens
            }
            "draft-max-output-tokens" => {
                self.limits.draft_max_output_tokens = defaults.draft_max_output_tokens
            }
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// `key: value` lines describing the effective settings.
    pub fn describe(&self) -> Vec<String> {
        let marker = |set: bool| if set { "" } else { " (default)" };
        vec![
            format!("model: {}{}", self.effective_model(), marker(self.model.is_some())),
            format!(
                "base-url: {}{}",
                self.effective_base_url(),
                marker(self.base_url.is_some())
            ),
            match &self.profile {
                Some(path) => format!("profile: {}", path_display(path)),
                None => "profile: built-in".to_string(),
            },
            format!("chat-max-output-tokens: {}", self.limits.chat_max_output_tokens),
            format!(
                "analysis-max-output-tokens: {}",
                self.limits.analysis_max_output_tokens
            ),
            format!("draft-max-output-tokens: {}", self.limits.draft_max_output_tokens),
        ]
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "unknown config key '{key}' (expected one of: {})",
        CONFIG_KEYS.join(", ")
    )
}
