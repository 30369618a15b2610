use crate::core::generation::{display_text, GenerationFailure, GenerationResult};
use crate::core::message::ConversationTurn;
use crate::core::widgets::{RequestLifecycle, RequestPhase, RequestTicket};

/// What the dispatcher needs to run one chat turn.
#[derive(Debug, Clone)]
pub struct ChatSubmission {
    pub ticket: RequestTicket,
    pub user_text: String,
    pub prior_turns: Vec<ConversationTurn>,
}

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatView {
    pub turns: Vec<ConversationTurn>,
    /// Message waiting for its reply, shown under the transcript.
    pub pending_user_text: Option<String>,
    pub input: String,
    pub is_loading: bool,
    pub can_submit: bool,
    pub last_reply_failed: bool,
}

#[derive(Debug)]
pub struct ChatController {
    turns: Vec<ConversationTurn>,
    input: String,
    pending_user_text: Option<String>,
    last_failure: Option<GenerationFailure>,
    scroll_to_latest: bool,
    lifecycle: RequestLifecycle,
}

impl ChatController {
    /// Start a session whose transcript opens with the assistant greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self::with_turns(vec![ConversationTurn::assistant(greeting)])
    }

    pub fn with_turns(turns: Vec<ConversationTurn>) -> Self {
        Self {
            turns,
            input: String::new(),
            pending_user_text: None,
            last_failure: None,
            scroll_to_latest: false,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn phase(&self) -> RequestPhase {
        self.lifecycle.phase()
    }

    pub fn last_failure(&self) -> Option<&GenerationFailure> {
        self.last_failure.as_ref()
    }

    /// Send the current input. No-op on blank input or while a reply is pending.
    pub fn submit(&mut self) -> Option<ChatSubmission> {
        if self.input.trim().is_empty() {
            return None;
        }
        let ticket = self.lifecycle.begin()?;

        let user_text = std::mem::take(&mut self.input);
        self.pending_user_text = Some(user_text.clone());

        Some(ChatSubmission {
            ticket,
            user_text,
            prior_turns: self.turns.clone(),
        })
    }

    /// Record the reply for `request_id`: appends the user turn then the
    /// assistant turn. Returns false when the result was discarded.
    pub fn settle(&mut self, request_id: u64, result: GenerationResult) -> bool {
        if !self.lifecycle.accept(request_id, result.is_ok()) {
            return false;
        }

        let user_text = self.pending_user_text.take().unwrap_or_default();
        self.turns.push(ConversationTurn::user(user_text));
        self.turns
            .push(ConversationTurn::assistant(display_text(&result)));
        self.last_failure = result.err();
        self.scroll_to_latest = true;
        true
    }

    /// One-shot flag asking the view to scroll to the newest turn.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_latest)
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
        self.pending_user_text = None;
    }

    pub fn view(&self) -> ChatView {
        let is_loading = self.lifecycle.is_pending();
        ChatView {
            turns: self.turns.clone(),
            pending_user_text: self.pending_user_text.clone(),
            input: self.input.clone(),
            is_loading,
            can_submit: !is_loading && self.lifecycle.is_mounted() && !self.input.trim().is_empty(),
            last_reply_failed: self.last_failure.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::{FailureReason, GenerationFailure, RequestKind};

    fn prior_turns() -> Vec<ConversationTurn> {
        vec![
            ConversationTurn::assistant("Hi! Ask me anything!"),
            ConversationTurn::user("Where do you study?"),
            ConversationTurn::assistant("CityU HK."),
        ]
    }

    #[test]
    fn blank_input_is_a_noop() {
        let mut chat = ChatController::with_turns(prior_turns());
        chat.set_input("   ");

        assert!(chat.submit().is_none());
        assert_eq!(chat.phase(), RequestPhase::Idle);
        assert_eq!(chat.input(), "   ");
        assert_eq!(chat.turns(), prior_turns().as_slice());
    }

    #[test]
    fn settled_reply_appends_user_then_assistant() {
        let mut chat = ChatController::with_turns(prior_turns());
        chat.set_input("Favourite language?");

        let submission = chat.submit().expect("submission");
        assert_eq!(submission.user_text, "Favourite language?");
        assert_eq!(submission.prior_turns, prior_turns());
        assert_eq!(chat.input(), "");
        assert!(chat.view().is_loading);
        assert_eq!(chat.turns().len(), 3);

        assert!(chat.settle(submission.ticket.request_id, Ok("Python!".into())));

        let mut expected = prior_turns();
        expected.push(ConversationTurn::user("Favourite language?"));
        expected.push(ConversationTurn::assistant("Python!"));
        assert_eq!(chat.turns(), expected.as_slice());
        assert_eq!(chat.phase(), RequestPhase::Succeeded);
        assert!(chat.take_scroll_request());
        assert!(!chat.take_scroll_request());
    }

    #[test]
    fn resubmission_while_pending_is_rejected() {
        let mut chat = ChatController::new("Hi!");
        chat.set_input("first");
        let submission = chat.submit().expect("submission");

        chat.set_input("second");
        assert!(chat.submit().is_none());
        assert!(!chat.view().can_submit);
        assert_eq!(chat.input(), "second");

        chat.settle(submission.ticket.request_id, Ok("reply".into()));
        assert!(chat.view().can_submit);
        assert!(chat.submit().is_some());
    }

    #[test]
    fn failure_renders_fallback_and_stays_usable() {
        let mut chat = ChatController::new("Hi!");
        chat.set_input("hello");
        let submission = chat.submit().expect("submission");

        let failure = GenerationFailure::new(
            RequestKind::Chat,
            FailureReason::Transport("reset".into()),
        );
        assert!(chat.settle(submission.ticket.request_id, Err(failure)));

        let view = chat.view();
        assert_eq!(view.turns.last().map(|t| t.text.as_str()), Some("Connection error."));
        assert!(view.last_reply_failed);
        assert_eq!(chat.phase(), RequestPhase::Failed);

        chat.set_input("again");
        assert!(chat.submit().is_some());
    }

    #[test]
    fn late_result_after_unmount_is_discarded() {
        let mut chat = ChatController::new("Hi!");
        chat.set_input("hello");
        let submission = chat.submit().expect("submission");

        chat.unmount();

        assert!(submission.ticket.cancel_token.is_cancelled());
        assert!(!chat.settle(submission.ticket.request_id, Ok("late".into())));
        assert_eq!(chat.turns().len(), 1);
    }
}
