//! Runs widget submissions on background tasks and reports back over a channel.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::generation::{GenerationClient, GenerationResult};
use crate::core::widgets::{AnalysisSubmission, ChatSubmission, DraftSubmission};

/// Work produced by a widget submission.
#[derive(Debug, Clone)]
pub enum RequestCommand {
    Chat {
        submission: ChatSubmission,
        /// System instruction for the chat persona
        context: String,
    },
    Analysis(AnalysisSubmission),
    Draft(DraftSubmission),
}

impl RequestCommand {
    pub fn request_id(&self) -> u64 {
        match self {
            RequestCommand::Chat { submission, .. } => submission.ticket.request_id,
            RequestCommand::Analysis(submission) => submission.ticket.request_id,
            RequestCommand::Draft(submission) => submission.ticket.request_id,
        }
    }

    fn cancel_token(&self) -> CancellationToken {
        match self {
            RequestCommand::Chat { submission, .. } => submission.ticket.cancel_token.clone(),
            RequestCommand::Analysis(submission) => submission.ticket.cancel_token.clone(),
            RequestCommand::Draft(submission) => submission.ticket.cancel_token.clone(),
        }
    }
}

/// A settled request, addressed to the widget that issued it.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    ChatSettled {
        request_id: u64,
        result: GenerationResult,
    },
    AnalysisSettled {
        project_id: String,
        request_id: u64,
        result: GenerationResult,
    },
    DraftSettled {
        request_id: u64,
        result: GenerationResult,
    },
}

impl WidgetEvent {
    pub fn result(&self) -> &GenerationResult {
        match self {
            WidgetEvent::ChatSettled { result, .. }
            | WidgetEvent::AnalysisSettled { result, .. }
            | WidgetEvent::DraftSettled { result, .. } => result,
        }
    }
}

/// `None` when the token fires before the operation finishes.
pub async fn run_cancellable<F, T>(token: &CancellationToken, operation: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = operation => Some(result),
    }
}

pub async fn execute(client: &GenerationClient, command: RequestCommand) -> Option<WidgetEvent> {
    let token = command.cancel_token();
    let request_id = command.request_id();

    let event = match command {
        RequestCommand::Chat {
            submission,
            context,
        } => {
            let reply = client.converse(&submission.user_text, &submission.prior_turns, &context);
            WidgetEvent::ChatSettled {
                request_id,
                result: run_cancellable(&token, reply).await?,
            }
        }
        RequestCommand::Analysis(submission) => {
            let analysis =
                client.analyze(&submission.subject, &submission.details, submission.mode);
            WidgetEvent::AnalysisSettled {
                project_id: submission.project_id.clone(),
                request_id,
                result: run_cancellable(&token, analysis).await?,
            }
        }
        RequestCommand::Draft(submission) => {
            let draft = client.draft(&submission.topic, submission.tone);
            WidgetEvent::DraftSettled {
                request_id,
                result: run_cancellable(&token, draft).await?,
            }
        }
    };
    Some(event)
}

#[derive(Clone)]
pub struct RequestService {
    client: GenerationClient,
    tx: mpsc::UnboundedSender<WidgetEvent>,
}

impl RequestService {
    pub fn new(client: GenerationClient) -> (Self, mpsc::UnboundedReceiver<WidgetEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { client, tx }, rx)
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub fn spawn(&self, command: RequestCommand) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let request_id = command.request_id();
            match execute(&client, command).await {
                Some(event) => {
                    let _ = tx.send(event);
                }
                None => debug!(request_id, "Request cancelled before it settled"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OutputLimits;
    use crate::core::prompt::{AnalysisMode, Tone};
    use crate::core::widgets::{ContactDrafter, ProjectAnalyzer};
    use crate::core::profile::load_builtin_profile;
    use crate::utils::test_utils::ScriptedBackend;
    use std::time::Duration;

    fn service_with(backend: &std::sync::Arc<ScriptedBackend>) -> (RequestService, mpsc::UnboundedReceiver<WidgetEvent>) {
        let client = GenerationClient::new(
            Some("key".to_string()),
            backend.clone(),
            OutputLimits::default(),
        );
        RequestService::new(client)
    }

    #[tokio::test]
    async fn run_cancellable_returns_none_when_cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let result = run_cancellable(&token, async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            1
        })
        .await;

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn spawned_analysis_reports_back_with_project_and_id() {
        let backend = ScriptedBackend::replying("- Detectron2");
        let (service, mut rx) = service_with(&backend);
        let mut analyzer = ProjectAnalyzer::new(&load_builtin_profile().projects[0]);
        let submission = analyzer.submit(AnalysisMode::Technical).expect("submission");
        let request_id = submission.ticket.request_id;

        service.spawn(RequestCommand::Analysis(submission));

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("event timeout")
            .expect("event missing");
        match event {
            WidgetEvent::AnalysisSettled {
                project_id,
                request_id: settled_id,
                result,
            } => {
                assert_eq!(project_id, "1");
                assert_eq!(settled_id, request_id);
                assert_eq!(result.as_deref(), Ok("- Detectron2"));
            }
            other => panic!("expected analysis event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_request_sends_nothing() {
        let backend = ScriptedBackend::gated("too late");
        let (service, mut rx) = service_with(&backend);
        let mut drafter = ContactDrafter::new();
        drafter.set_topic("Collab");
        drafter.set_tone(Tone::Casual);
        let submission = drafter.submit().expect("submission");
        let token = submission.ticket.cancel_token.clone();

        service.spawn(RequestCommand::Draft(submission));
        backend.wait_for_calls(1).await;
        drafter.unmount();
        assert!(token.is_cancelled());
        backend.release();

        let outcome = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(outcome.is_err(), "no event expected after cancellation");
    }
}
