use crate::core::generation::{display_text, GenerationResult};
use crate::core::profile::ProjectRecord;
use crate::core::prompt::AnalysisMode;
use crate::core::widgets::{RequestLifecycle, RequestPhase, RequestTicket};

pub const ANALYSIS_PENDING_TITLE: &str = "Thinking...";

#[derive(Debug, Clone)]
pub struct AnalysisSubmission {
    pub ticket: RequestTicket,
    pub project_id: String,
    pub subject: String,
    pub details: String,
    pub mode: AnalysisMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerView {
    pub project_id: String,
    pub title: String,
    pub pane_open: bool,
    pub pane_title: Option<&'static str>,
    pub body: Option<String>,
    pub is_loading: bool,
    pub failed: bool,
}

/// Analysis pane attached to one project card.
#[derive(Debug)]
pub struct ProjectAnalyzer {
    project_id: String,
    title: String,
    details: String,
    mode: Option<AnalysisMode>,
    result: Option<GenerationResult>,
    lifecycle: RequestLifecycle,
}

impl ProjectAnalyzer {
    pub fn new(project: &ProjectRecord) -> Self {
        Self {
            project_id: project.id.clone(),
            title: project.title.clone(),
            details: project.analysis_details().to_string(),
            mode: None,
            result: None,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn mode(&self) -> Option<AnalysisMode> {
        self.mode
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn phase(&self) -> RequestPhase {
        self.lifecycle.phase()
    }

    /// Request an analysis in `mode`, discarding whatever the pane showed before.
    ///
    /// Title and details are fixed at construction, so the blank-input guard
    /// only trips for a custom profile with an empty project entry.
    pub fn submit(&mut self, mode: AnalysisMode) -> Option<AnalysisSubmission> {
        if self.title.trim().is_empty() && self.details.trim().is_empty() {
            return None;
        }
        let ticket = self.lifecycle.begin()?;

        self.mode = Some(mode);
        self.result = None;

        Some(AnalysisSubmission {
            ticket,
            project_id: self.project_id.clone(),
            subject: self.title.clone(),
            details: self.details.clone(),
            mode,
        })
    }

    pub fn settle(&mut self, request_id: u64, result: GenerationResult) -> bool {
        if !self.lifecycle.accept(request_id, result.is_ok()) {
            return false;
        }
        self.result = Some(result);
        true
    }

    /// Dismiss the pane; an analysis still in flight is abandoned.
    pub fn close(&mut self) {
        self.lifecycle.reset();
        self.mode = None;
        self.result = None;
    }

    pub fn unmount(&mut self) {
        self.lifecycle.unmount();
    }

    pub fn view(&self) -> AnalyzerView {
        let is_loading = self.lifecycle.is_pending();
        let pane_title = if is_loading {
            Some(ANALYSIS_PENDING_TITLE)
        } else {
            self.result
                .as_ref()
                .and(self.mode)
                .map(AnalysisMode::pane_title)
        };

        AnalyzerView {
            project_id: self.project_id.clone(),
            title: self.title.clone(),
            pane_open: is_loading || self.result.is_some(),
            pane_title,
            body: self.result.as_ref().map(|r| display_text(r).to_string()),
            is_loading,
            failed: matches!(self.result, Some(Err(_))),
        }
    }
}
