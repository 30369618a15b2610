//! Non-interactive `ask`, `analyze` and `draft` subcommands.

use std::error::Error;

use crate::cli::render::render_analyzer;
use crate::core::app::App;
use crate::core::dispatch::execute;
use crate::core::generation::GenerationClient;
use crate::core::prompt::{AnalysisMode, Tone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShot {
    Ask(String),
    Analyze { project: String, mode: AnalysisMode },
    Draft { topic: String, tone: Tone },
}

/// Run a single request through the matching widget and return the lines to
/// print, plus whether the request succeeded.
pub async fn run_oneshot(
    app: &mut App,
    client: &GenerationClient,
    request: OneShot,
) -> Result<(Vec<String>, bool), Box<dyn Error>> {
    let command = match &request {
        OneShot::Ask(text) => app.submit_chat(text).ok_or("nothing to ask")?,
        OneShot::Analyze { project, mode } => app
            .submit_analysis(project, *mode)?
            .ok_or("analysis already in progress")?,
        OneShot::Draft { topic, tone } => app
            .submit_draft(topic, *tone)
            .ok_or("a draft topic is required")?,
    };

    let event = execute(client, command)
        .await
        .ok_or("request was cancelled")?;
    let succeeded = event.result().is_ok();
    app.apply_event(event);

    let lines = match &request {
        OneShot::Ask(_) => app
            .chat
            .turns()
            .last()
            .map(|turn| vec![turn.text.clone()])
            .unwrap_or_default(),
        OneShot::Analyze { project, .. } => app
            .analyzer(project)
            .map(|analyzer| render_analyzer(&analyzer.view()))
            .unwrap_or_default(),
        OneShot::Draft { .. } => app
            .drafter
            .message()
            .lines()
            .map(str::to_string)
            .collect(),
    };
    Ok((lines, succeeded))
}
