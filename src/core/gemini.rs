use async_trait::async_trait;

use crate::api::generate::{generate_content, ApiCallError};
use crate::api::{Content, GenerateContentRequest, GenerationConfig};
use crate::core::generation::{FailureReason, GenerationBackend, GenerationRequest};
use crate::core::message::Speaker;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// `generateContent` backend over HTTPS.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Translate a request into the wire payload.
///
/// The service rejects conversations that open with a model turn, so any
/// leading assistant turns (the greeting) are left out of the history.
pub fn build_request_body(request: &GenerationRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .skip_while(|turn| turn.speaker == Speaker::Assistant)
        .map(|turn| Content::text(Some(turn.speaker.to_api_role()), turn.text.clone()))
        .collect();
    contents.push(Content::text(
        Some(Speaker::User.to_api_role()),
        request.prompt_text.clone(),
    ));

    GenerateContentRequest {
        system_instruction: request
            .system_instruction
            .as_ref()
            .map(|instruction| Content::text(None, instruction.clone())),
        contents,
        generation_config: GenerationConfig {
            max_output_tokens: request.max_output_tokens,
        },
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, FailureReason> {
        let body = build_request_body(request);
        let response = generate_content(&self.client, &self.base_url, api_key, &self.model, &body)
            .await
            .map_err(|err| match err {
                ApiCallError::Transport(source) => FailureReason::Transport(source.to_string()),
                ApiCallError::Status { status, summary } => FailureReason::Api { status, summary },
            })?;

        response.text().ok_or(FailureReason::EmptyResponse)
    }
}
