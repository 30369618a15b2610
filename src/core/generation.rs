//! Generation client: the single boundary between widgets and the remote model.
//!
//! The three operations never panic and never surface transport errors as
//! anything but a [`GenerationFailure`], whose `Display` is the fixed fallback
//! text the widgets render. Callers that need to tell real content from a
//! failure match on the `Result` instead of comparing strings.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::config::data::OutputLimits;
use crate::core::message::ConversationTurn;
use crate::core::prompt::{analysis_prompt, draft_prompt, AnalysisMode, Tone};

pub const CHAT_MISSING_KEY: &str = "API Key is missing. Please check configuration.";
pub const MISSING_KEY: &str = "API Key missing.";
pub const CHAT_FAILED: &str = "Connection error.";
pub const CHAT_EMPTY: &str = "Thinking...";
pub const ANALYSIS_FAILED: &str = "Could not analyze.";
pub const ANALYSIS_EMPTY: &str = "Analysis failed.";
pub const DRAFT_FAILED: &str = "Could not draft message.";
/// An empty draft still replaces the message field.
pub const DRAFT_EMPTY: &str = "";
pub const CANCELLED: &str = "Request cancelled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Chat,
    Analysis,
    Draft,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Chat => "chat",
            RequestKind::Analysis => "analysis",
            RequestKind::Draft => "draft",
        }
    }
}

/// A single call to the remote model. Built per operation, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: RequestKind,
    /// Only multi-turn chat carries a system instruction and history.
    pub system_instruction: Option<String>,
    pub history: Vec<ConversationTurn>,
    pub prompt_text: String,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    MissingCredential,
    Transport(String),
    Api { status: u16, summary: String },
    /// The call succeeded but the model returned no text.
    EmptyResponse,
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::MissingCredential => f.write_str("no API credential configured"),
            FailureReason::Transport(detail) => write!(f, "transport failure: {detail}"),
            FailureReason::Api { status, summary } => write!(f, "API error {status}: {summary}"),
            FailureReason::EmptyResponse => f.write_str("model returned no text"),
            FailureReason::Cancelled => f.write_str("request cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: RequestKind,
    pub reason: FailureReason,
}

impl GenerationFailure {
    pub fn new(kind: RequestKind, reason: FailureReason) -> Self {
        Self { kind, reason }
    }

    /// User-facing text shown in place of a model answer.
    pub fn fallback_text(&self) -> &'static str {
        match (&self.reason, self.kind) {
            (FailureReason::Cancelled, _) => CANCELLED,
            (FailureReason::MissingCredential, RequestKind::Chat) => CHAT_MISSING_KEY,
            (FailureReason::MissingCredential, _) => MISSING_KEY,
            (FailureReason::EmptyResponse, RequestKind::Chat) => CHAT_EMPTY,
            (FailureReason::EmptyResponse, RequestKind::Analysis) => ANALYSIS_EMPTY,
            (FailureReason::EmptyResponse, RequestKind::Draft) => DRAFT_EMPTY,
            (_, RequestKind::Chat) => CHAT_FAILED,
            (_, RequestKind::Analysis) => ANALYSIS_FAILED,
            (_, RequestKind::Draft) => DRAFT_FAILED,
        }
    }
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fallback_text())
    }
}

impl std::error::Error for GenerationFailure {}

pub type GenerationResult = Result<String, GenerationFailure>;

/// Text a widget renders for a settled request, success or not.
pub fn display_text(result: &GenerationResult) -> &str {
    match result {
        Ok(text) => text,
        Err(failure) => failure.fallback_text(),
    }
}

/// Remote text-completion service.
///
/// Implementations return the generated text, or `FailureReason::EmptyResponse`
/// when the service answered without any.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, FailureReason>;
}

/// Explicitly constructed client shared by all widgets.
#[derive(Clone)]
pub struct GenerationClient {
    backend: Arc<dyn GenerationBackend>,
    api_key: Option<String>,
    limits: OutputLimits,
}

impl GenerationClient {
    /// Blank credentials are treated as absent.
    pub fn new(
        api_key: Option<String>,
        backend: Arc<dyn GenerationBackend>,
        limits: OutputLimits,
    ) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self {
            backend,
            api_key,
            limits,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn limits(&self) -> &OutputLimits {
        &self.limits
    }

    /// Continue the profile chat. `context` is the full system instruction.
    pub async fn converse(
        &self,
        user_text: &str,
        prior_turns: &[ConversationTurn],
        context: &str,
    ) -> GenerationResult {
        self.execute(GenerationRequest {
            kind: RequestKind::Chat,
            system_instruction: Some(context.to_string()),
            history: prior_turns.to_vec(),
            prompt_text: user_text.to_string(),
            max_output_tokens: self.limits.chat_max_output_tokens,
        })
        .await
    }

    pub async fn analyze(&self, subject: &str, details: &str, mode: AnalysisMode) -> GenerationResult {
        self.execute(GenerationRequest {
            kind: RequestKind::Analysis,
            system_instruction: None,
            history: Vec::new(),
            prompt_text: analysis_prompt(subject, details, mode),
            max_output_tokens: self.limits.analysis_max_output_tokens,
        })
        .await
    }

    pub async fn draft(&self, topic: &str, tone: Tone) -> GenerationResult {
        self.execute(GenerationRequest {
            kind: RequestKind::Draft,
            system_instruction: None,
            history: Vec::new(),
            prompt_text: draft_prompt(topic, tone),
            max_output_tokens: self.limits.draft_max_output_tokens,
        })
        .await
    }

    async fn execute(&self, request: GenerationRequest) -> GenerationResult {
        let kind = request.kind;
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(kind = kind.as_str(), "Skipping generation: no credential");
            return Err(GenerationFailure::new(kind, FailureReason::MissingCredential));
        };

        debug!(
            kind = kind.as_str(),
            history = request.history.len(),
            max_output_tokens = request.max_output_tokens,
            "Dispatching generation request"
        );

        self.backend
            .generate(api_key, &request)
            .await
            .map_err(|reason| {
                warn!(kind = kind.as_str(), %reason, "Generation failed");
                GenerationFailure::new(kind, reason)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::ScriptedBackend;

    fn client_with(backend: &Arc<ScriptedBackend>, key: Option<&str>) -> GenerationClient {
        GenerationClient::new(
            key.map(str::to_string),
            backend.clone(),
            OutputLimits::default(),
        )
    }

    #[tokio::test]
    async fn converse_without_credential_skips_backend() {
        let backend = ScriptedBackend::replying("unused");
        let client = client_with(&backend, None);

        let result = client.converse("Who are you?", &[], "ctx").await;

        let failure = result.unwrap_err();
        assert_eq!(failure.reason, FailureReason::MissingCredential);
        assert_eq!(
            failure.to_string(),
            "API Key is missing. Please check configuration."
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_credential_counts_as_missing() {
        let backend = ScriptedBackend::replying("unused");
        let client = client_with(&backend, Some("   "));

        assert!(!client.has_credential());
        let failure = client.draft("hello", Tone::Casual).await.unwrap_err();
        assert_eq!(failure.fallback_text(), "API Key missing.");
        let failure = client
            .analyze("Robot", "details", AnalysisMode::Technical)
            .await
            .unwrap_err();
        assert_eq!(failure.fallback_text(), "API Key missing.");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn converse_sends_instruction_history_and_limit() {
        let backend = ScriptedBackend::replying("Ask away!");
        let client = client_with(&backend, Some("key"));
        let prior = vec![
            ConversationTurn::assistant("Hi!"),
            ConversationTurn::user("Skills?"),
            ConversationTurn::assistant("Rust."),
        ];

        let result = client.converse("Projects?", &prior, "system text").await;

        assert_eq!(result.as_deref(), Ok("Ask away!"));
        let request = backend.last_request().expect("request recorded");
        assert_eq!(request.kind, RequestKind::Chat);
        assert_eq!(request.system_instruction.as_deref(), Some("system text"));
        assert_eq!(request.history, prior);
        assert_eq!(request.prompt_text, "Projects?");
        assert_eq!(request.max_output_tokens, 150);
        assert_eq!(backend.last_api_key().as_deref(), Some("key"));
    }

    #[tokio::test]
    async fn transport_failures_map_to_operation_fallbacks() {
        let backend = ScriptedBackend::failing(FailureReason::Transport("refused".into()));
        let client = client_with(&backend, Some("key"));

        let chat = client.converse("hi", &[], "ctx").await.unwrap_err();
        let analysis = client
            .analyze("Robot", "details", AnalysisMode::Marketing)
            .await
            .unwrap_err();
        let draft = client.draft("collab", Tone::Friendly).await.unwrap_err();

        assert_eq!(chat.to_string(), "Connection error.");
        assert_eq!(analysis.to_string(), "Could not analyze.");
        assert_eq!(draft.to_string(), "Could not draft message.");
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_responses_use_operation_placeholders() {
        let backend = ScriptedBackend::failing(FailureReason::EmptyResponse);
        let client = client_with(&backend, Some("key"));

        let chat = client.converse("hi", &[], "ctx").await.unwrap_err();
        let analysis = client
            .analyze("Robot", "details", AnalysisMode::Technical)
            .await
            .unwrap_err();
        let draft = client.draft("collab", Tone::Friendly).await.unwrap_err();

        assert_eq!(chat.fallback_text(), "Thinking...");
        assert_eq!(analysis.fallback_text(), "Analysis failed.");
        assert_eq!(draft.fallback_text(), "");
    }

    #[tokio::test]
    async fn single_shot_operations_use_templates_and_limits() {
        let backend = ScriptedBackend::replying("ok");
        let client = client_with(&backend, Some("key"));

        client
            .analyze("Robot", "Follows lines", AnalysisMode::Marketing)
            .await
            .expect("analysis");
        let request = backend.last_request().expect("analysis request");
        assert_eq!(request.kind, RequestKind::Analysis);
        assert!(request.system_instruction.is_none());
        assert!(request.history.is_empty());
        assert_eq!(
            request.prompt_text,
            analysis_prompt("Robot", "Follows lines", AnalysisMode::Marketing)
        );
        assert_eq!(request.max_output_tokens, 100);

        client.draft("Internship", Tone::Urgent).await.expect("draft");
        let request = backend.last_request().expect("draft request");
        assert_eq!(request.kind, RequestKind::Draft);
        assert_eq!(request.prompt_text, draft_prompt("Internship", Tone::Urgent));
        assert_eq!(request.max_output_tokens, 200);
    }

    #[test]
    fn display_text_renders_success_and_failure_alike() {
        let ok: GenerationResult = Ok("answer".into());
        let err: GenerationResult = Err(GenerationFailure::new(
            RequestKind::Analysis,
            FailureReason::Api {
                status: 500,
                summary: "boom".into(),
            },
        ));
        assert_eq!(display_text(&ok), "answer");
        assert_eq!(display_text(&err), "Could not analyze.");
    }
}
