//! Widget controllers: the chat box, per-project analyzers and the contact drafter.
//!
//! Each controller is plain state plus synchronous transitions. Submitting
//! returns a request description carrying a [`RequestTicket`]; whoever runs
//! the request reports back with `settle(request_id, result)`. Results for a
//! request that is no longer current, or for an unmounted widget, are dropped.

pub mod analyzer;
pub mod chat;
pub mod drafter;

pub use analyzer::{AnalysisSubmission, AnalyzerView, ProjectAnalyzer};
pub use chat::{ChatController, ChatSubmission, ChatView};
pub use drafter::{ContactDrafter, DraftSubmission, DrafterView};

use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle for one issued request.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub request_id: u64,
    pub cancel_token: CancellationToken,
}

/// Where a widget is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl RequestPhase {
    pub fn is_pending(self) -> bool {
        self == RequestPhase::Pending
    }
}

/// At most one outstanding request per widget, with stale-result rejection.
#[derive(Debug)]
pub struct RequestLifecycle {
    phase: RequestPhase,
    current_request_id: u64,
    cancel_token: Option<CancellationToken>,
    mounted: bool,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self {
            phase: RequestPhase::Idle,
            current_request_id: 0,
            cancel_token: None,
            mounted: true,
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase.is_pending()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn current_request_id(&self) -> u64 {
        self.current_request_id
    }

    /// Issue a new ticket. Refused while a request is in flight or after unmount.
    pub fn begin(&mut self) -> Option<RequestTicket> {
        if self.is_pending() || !self.mounted {
            return None;
        }

        self.current_request_id += 1;
        let token = CancellationToken::new();
        self.cancel_token = Some(token.clone());
        self.phase = RequestPhase::Pending;

        Some(RequestTicket {
            request_id: self.current_request_id,
            cancel_token: token,
        })
    }

    /// Accept the outcome of `request_id` if it is still the one in flight.
    pub fn accept(&mut self, request_id: u64, succeeded: bool) -> bool {
        if !self.mounted || !self.is_pending() || request_id != self.current_request_id {
            debug!(
                request_id,
                current = self.current_request_id,
                mounted = self.mounted,
                "Discarding stale result"
            );
            return false;
        }

        self.cancel_token = None;
        self.phase = if succeeded {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Failed
        };
        true
    }

    /// Abandon the in-flight request, if any, and return to idle.
    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if self.is_pending() {
            self.phase = RequestPhase::Idle;
        }
    }

    /// Back to idle once a settled result has been dismissed.
    pub fn reset(&mut self) {
        self.cancel();
        self.phase = RequestPhase::Idle;
    }

    /// The widget left the page: cancel and refuse everything afterwards.
    pub fn unmount(&mut self) {
        self.cancel();
        self.mounted = false;
    }
}
