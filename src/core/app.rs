//! Page-level state: the profile and the widgets rendered from it.

use crate::core::dispatch::{RequestCommand, WidgetEvent};
use crate::core::profile::SiteProfile;
use crate::core::prompt::{chat_greeting, chat_system_instruction, AnalysisMode, Tone};
use crate::core::widgets::{ChatController, ContactDrafter, ProjectAnalyzer};

pub struct App {
    profile: SiteProfile,
    chat_context: String,
    pub chat: ChatController,
    pub analyzers: Vec<ProjectAnalyzer>,
    pub drafter: ContactDrafter,
}

impl App {
    pub fn new(profile: SiteProfile) -> Self {
        let chat_context = chat_system_instruction(&profile);
        let chat = ChatController::new(chat_greeting(&profile));
        let analyzers = profile.projects.iter().map(ProjectAnalyzer::new).collect();

        Self {
            profile,
            chat_context,
            chat,
            analyzers,
            drafter: ContactDrafter::new(),
        }
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn analyzer(&self, id_or_title: &str) -> Option<&ProjectAnalyzer> {
        let project_id = self.profile.find_project(id_or_title)?.id.as_str();
        self.analyzers.iter().find(|a| a.project_id() == project_id)
    }

    pub fn analyzer_mut(&mut self, id_or_title: &str) -> Option<&mut ProjectAnalyzer> {
        let project_id = self.profile.find_project(id_or_title)?.id.clone();
        self.analyzers
            .iter_mut()
            .find(|a| a.project_id() == project_id)
    }

    pub fn submit_chat(&mut self, text: &str) -> Option<RequestCommand> {
        self.chat.set_input(text);
        let submission = self.chat.submit()?;
        Some(RequestCommand::Chat {
            submission,
            context: self.chat_context.clone(),
        })
    }

    /// `Err` names an unknown project; `Ok(None)` means the analyzer is busy.
    pub fn submit_analysis(
        &mut self,
        id_or_title: &str,
        mode: AnalysisMode,
    ) -> Result<Option<RequestCommand>, String> {
        let analyzer = self
            .analyzer_mut(id_or_title)
            .ok_or_else(|| format!("unknown project '{}'", id_or_title.trim()))?;
        Ok(analyzer.submit(mode).map(RequestCommand::Analysis))
    }

    pub fn submit_draft(&mut self, topic: &str, tone: Tone) -> Option<RequestCommand> {
        self.drafter.set_topic(topic);
        self.drafter.set_tone(tone);
        self.drafter.submit().map(RequestCommand::Draft)
    }

    /// Route a settled request to its widget. Returns false when it was discarded.
    pub fn apply_event(&mut self, event: WidgetEvent) -> bool {
        match event {
            WidgetEvent::ChatSettled { request_id, result } => self.chat.settle(request_id, result),
            WidgetEvent::AnalysisSettled {
                project_id,
                request_id,
                result,
            } => self
                .analyzers
                .iter_mut()
                .find(|a| a.project_id() == project_id)
                .is_some_and(|analyzer| analyzer.settle(request_id, result)),
            WidgetEvent::DraftSettled { request_id, result } => {
                self.drafter.settle(request_id, result)
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.chat.phase().is_pending()
            || self.drafter.phase().is_pending()
            || self.analyzers.iter().any(|a| a.phase().is_pending())
    }

    /// Tear the page down; requests still in flight are cancelled.
    pub fn unmount(&mut self) {
        self.chat.unmount();
        for analyzer in &mut self.analyzers {
            analyzer.unmount();
        }
        self.drafter.unmount();
    }
}
