use crate::core::generation::{display_text, GenerationFailure, GenerationResult};
use crate::core::prompt::Tone;
use crate::core::widgets::{RequestLifecycle, RequestPhase, RequestTicket};

#[derive(Debug, Clone)]
pub struct DraftSubmission {
    pub ticket: RequestTicket,
    pub topic: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrafterView {
    pub name: String,
    pub email: String,
    pub topic: String,
    pub tone: Tone,
    pub message: String,
    pub is_drafting: bool,
    pub can_draft: bool,
    pub last_draft_failed: bool,
}

/// Contact form with the AI drafting sidebar.
#[derive(Debug, Default)]
pub struct ContactDrafter {
    name: String,
    email: String,
    topic: String,
    tone: Tone,
    message: String,
    last_failure: Option<GenerationFailure>,
    lifecycle: RequestLifecycle,
}

impl ContactDrafter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn phase(&self) -> RequestPhase {
        self.lifecycle.phase()
    }

    /// Ask for a draft of the current topic. No-op on blank topic or while drafting.
    pub fn submit(&mut self) -> Option<DraftSubmission> {
        if self.topic.trim().is_empty() {
            return None;
        }
        let ticket = self.lifecycle.begin()?;

        Some(DraftSubmission {
            ticket,
            topic: self.topic.clone(),
            tone: self.tone,
        })
    }

    /// The returned text replaces the message field wholesale.
    pub fn settle(&mut self, request_id: u64, result: GenerationResult) -> bool {
        if !self.lifecycle.accept(request_id, result.is_ok()) {
            return false;
        }
        self.message = display_text(&result).to_string();
        self.last_failure = result.err();
        true
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn view(&self) -> DrafterView {
        let is_drafting = self.lifecycle.is_pending();
        DrafterView {
            name: self.name.clone(),
            email: self.email.clone(),
            topic: self.topic.clone(),
            tone: self.tone,
            message: self.message.clone(),
            is_drafting,
            can_draft: !is_drafting && self.lifecycle.is_mounted() && !self.topic.trim().is_empty(),
            last_draft_failed: self.last_failure.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generation::{FailureReason, RequestKind};

    #[test]
    fn blank_topic_is_a_noop() {
        let mut drafter = ContactDrafter::new();
        drafter.set_topic("  ");

        assert!(drafter.submit().is_none());
        assert_eq!(drafter.phase(), RequestPhase::Idle);
        assert!(!drafter.view().can_draft);
    }

    #[test]
    fn draft_overwrites_existing_message() {
        let mut drafter = ContactDrafter::new();
        drafter.set_message("Old hand-written text");
        drafter.set_topic("Summer internship");
        drafter.set_tone(Tone::Friendly);

        let submission = drafter.submit().expect("submission");
        assert_eq!(submission.tone, Tone::Friendly);
        assert!(drafter.submit().is_none());

        assert!(drafter.settle(submission.ticket.request_id, Ok("Hi Yorick!".into())));
        assert_eq!(drafter.message(), "Hi Yorick!");
    }

    #[test]
    fn transport_failure_writes_fallback_and_allows_retry() {
        let mut drafter = ContactDrafter::new();
        drafter.set_topic("Collab");
        let submission = drafter.submit().expect("submission");

        let failure = GenerationFailure::new(
            RequestKind::Draft,
            FailureReason::Transport("dns".into()),
        );
        assert!(drafter.settle(submission.ticket.request_id, Err(failure)));

        assert_eq!(drafter.message(), "Could not draft message.");
        assert!(drafter.view().last_draft_failed);
        assert_eq!(drafter.phase(), RequestPhase::Failed);
        assert!(drafter.submit().is_some());
    }

    #[test]
    fn clear_message_empties_field() {
        let mut drafter = ContactDrafter::new();
        drafter.set_message("draft");
        drafter.clear_message();
        assert_eq!(drafter.message(), "");
    }

    #[test]
    fn empty_reply_overwrites_message_with_nothing() {
        let mut drafter = ContactDrafter::new();
        drafter.set_message("Hand-written intro");
        drafter.set_topic("Internship");
        let submission = drafter.submit().expect("submission");

        let empty = GenerationFailure::new(RequestKind::Draft, FailureReason::EmptyResponse);
        assert!(drafter.settle(submission.ticket.request_id, Err(empty)));

        assert_eq!(drafter.message(), "");
        assert!(drafter.submit().is_some());
    }
}
