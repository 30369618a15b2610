//! Interactive line-based session hosting all three widgets.

use std::error::Error;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::render::{
    render_analyzer, render_chat, render_drafter, render_profile, render_projects, render_turn,
};
use crate::commands::{help_text, process_input, CommandResult};
use crate::core::app::App;
use crate::core::dispatch::{RequestService, WidgetEvent};

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub enum SessionFlow {
    Continue,
    Quit,
}

/// Apply one line of user input. Spawns at most one request.
pub fn handle_input(app: &mut App, service: &RequestService, input: &str) -> SessionFlow {
    match process_input(input) {
        CommandResult::ProcessAsMessage(text) => {
            if text.trim().is_empty() {
                return SessionFlow::Continue;
            }
            match app.submit_chat(&text) {
                Some(command) => service.spawn(command),
                None => println!("Still waiting for the previous reply."),
            }
        }
        CommandResult::Projects => print_lines(&render_projects(app.profile())),
        CommandResult::Analyze { project, mode } => match app.submit_analysis(&project, mode) {
            Ok(Some(command)) => {
                if let Some(analyzer) = app.analyzer(&project) {
                    print_lines(&render_analyzer(&analyzer.view()));
                }
                service.spawn(command);
            }
            Ok(None) => println!("That project is already being analyzed."),
            Err(err) => println!("{err}"),
        },
        CommandResult::CloseAnalysis { project } => match app.analyzer_mut(&project) {
            Some(analyzer) => analyzer.close(),
            None => println!("unknown project '{project}'"),
        },
        CommandResult::Draft { tone, topic } => {
            let tone = tone.unwrap_or_else(|| app.drafter.tone());
            match app.submit_draft(&topic, tone) {
                Some(command) => {
                    println!("Drafting a {} message about \"{}\"...", tone, topic.trim());
                    service.spawn(command);
                }
                None => println!("A draft is already being written."),
            }
        }
        CommandResult::SetTone(tone) => {
            app.drafter.set_tone(tone);
            println!("Tone: {tone}");
        }
        CommandResult::ShowMessage => print_lines(&render_drafter(&app.drafter.view())),
        CommandResult::ClearMessage => app.drafter.clear_message(),
        CommandResult::Profile => print_lines(&render_profile(app.profile())),
        CommandResult::Help => print!("{}", help_text()),
        CommandResult::Quit => return SessionFlow::Quit,
        CommandResult::Usage(message) => println!("{message}"),
    }
    SessionFlow::Continue
}

/// Apply a settled request and print what changed.
pub fn handle_event(app: &mut App, event: WidgetEvent) {
    let analyzed_project = match &event {
        WidgetEvent::AnalysisSettled { project_id, .. } => Some(project_id.clone()),
        _ => None,
    };
    let is_chat = matches!(event, WidgetEvent::ChatSettled { .. });

    if !app.apply_event(event) {
        return;
    }

    if is_chat {
        if app.chat.take_scroll_request() {
            if let Some(turn) = app.chat.turns().last() {
                println!("{}", render_turn(turn));
            }
        }
    } else if let Some(project_id) = analyzed_project {
        if let Some(analyzer) = app.analyzer(&project_id) {
            print_lines(&render_analyzer(&analyzer.view()));
        }
    } else {
        print_lines(&render_drafter(&app.drafter.view()));
    }
}

pub async fn run_session(
    mut app: App,
    service: RequestService,
    mut events: mpsc::UnboundedReceiver<WidgetEvent>,
) -> Result<(), Box<dyn Error>> {
    print_lines(&render_chat(&app.chat.view()));
    println!("(type /help for commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        if !stdin_open && !app.has_pending() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => {
                        if let SessionFlow::Quit = handle_input(&mut app, &service, &line) {
                            break;
                        }
                    }
                    None => {
                        debug!("stdin closed; waiting for outstanding requests");
                        stdin_open = false;
                    }
                }
            }
            Some(event) = events.recv() => handle_event(&mut app, event),
        }
    }

    app.unmount();
    Ok(())
}
