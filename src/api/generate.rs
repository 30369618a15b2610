use std::fmt;

use crate::api::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::url::model_method_url;

/// Transport-level failure of a single `generateContent` call.
#[derive(Debug)]
pub enum ApiCallError {
    /// The request never produced an HTTP response (DNS, connect, TLS, body decode).
    Transport(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: u16, summary: String },
}

impl fmt::Display for ApiCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiCallError::Transport(err) => write!(f, "transport error: {err}"),
            ApiCallError::Status { status, summary } => {
                write!(f, "API request failed with status {status}: {summary}")
            }
        }
    }
}

impl std::error::Error for ApiCallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiCallError::Transport(err) => Some(err),
            ApiCallError::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiCallError {
    fn from(err: reqwest::Error) -> Self {
        ApiCallError::Transport(err)
    }
}

pub async fn generate_content(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    request: &GenerateContentRequest,
) -> Result<GenerateContentResponse, ApiCallError> {
    let url = model_method_url(base_url, model, "generateContent");
    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "<no body>".to_string());
        return Err(ApiCallError::Status {
            status,
            summary: summarize_error_body(&error_text),
        });
    }

    Ok(response.json::<GenerateContentResponse>().await?)
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        })
}

/// One-line summary of an error body, preferring the JSON `error.message` field.
pub fn summarize_error_body(error_text: &str) -> String {
    let trimmed = error_text.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let text = serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .and_then(|value| extract_error_summary(&value))
        .unwrap_or_else(|| trimmed.to_string());

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
