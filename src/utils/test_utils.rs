use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use crate::core::generation::{FailureReason, GenerationBackend, GenerationRequest};

/// Backend double that replays canned outcomes and records every call.
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<String, FailureReason>>>,
    fallback: Result<String, FailureReason>,
    requests: Mutex<Vec<(String, GenerationRequest)>>,
    calls: AtomicUsize,
    call_notify: Notify,
    gate: Option<Semaphore>,
}

impl ScriptedBackend {
    fn build(
        outcomes: Vec<Result<String, FailureReason>>,
        fallback: Result<String, FailureReason>,
        gated: bool,
    ) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            call_notify: Notify::new(),
            gate: gated.then(|| Semaphore::new(0)),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::build(Vec::new(), Ok(text.to_string()), false)
    }

    pub fn failing(reason: FailureReason) -> Arc<Self> {
        Self::build(Vec::new(), Err(reason), false)
    }

    /// Outcomes are served in order; the last one repeats.
    pub fn scripted(outcomes: Vec<Result<String, FailureReason>>) -> Arc<Self> {
        let fallback = outcomes
            .last()
            .cloned()
            .unwrap_or(Err(FailureReason::EmptyResponse));
        Self::build(outcomes, fallback, false)
    }

    /// Every call blocks until [`ScriptedBackend::release`].
    pub fn gated(text: &str) -> Arc<Self> {
        Self::build(Vec::new(), Ok(text.to_string()), true)
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn wait_for_calls(&self, expected: usize) {
        loop {
            let notified = self.call_notify.notified();
            if self.call_count() >= expected {
                return;
            }
            notified.await;
        }
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        let requests = self.requests.lock().expect("requests lock");
        requests.last().map(|(_, request)| request.clone())
    }

    pub fn last_api_key(&self) -> Option<String> {
        let requests = self.requests.lock().expect("requests lock");
        requests.last().map(|(key, _)| key.clone())
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, FailureReason> {
        self.requests
            .lock()
            .expect("requests lock")
            .push((api_key.to_string(), request.clone()));
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_notify.notify_waiters();

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }

        let next = self.outcomes.lock().expect("outcomes lock").pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
