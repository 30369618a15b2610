//! Slash commands understood by the interactive session.

use crate::core::prompt::{AnalysisMode, Tone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Plain text for the chat widget.
    ProcessAsMessage(String),
    Projects,
    Analyze {
        project: String,
        mode: AnalysisMode,
    },
    CloseAnalysis {
        project: String,
    },
    /// `tone` is `None` when the drafter's current tone should be kept.
    Draft {
        tone: Option<Tone>,
        topic: String,
    },
    SetTone(Tone),
    ShowMessage,
    ClearMessage,
    Profile,
    Help,
    Quit,
    Usage(String),
}

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandUsage] = &[
    CommandUsage {
        syntax: "/projects",
        description: "List the project catalog",
    },
    CommandUsage {
        syntax: "/analyze <project> [technical|marketing]",
        description: "Analyze a project (technical by default)",
    },
    CommandUsage {
        syntax: "/close <project>",
        description: "Dismiss a project's analysis pane",
    },
    CommandUsage {
        syntax: "/draft [tone] <topic>",
        description: "Draft a contact message about a topic",
    },
    CommandUsage {
        syntax: "/tone <professional|casual|urgent|friendly>",
        description: "Set the drafting tone",
    },
    CommandUsage {
        syntax: "/message",
        description: "Show the contact form",
    },
    CommandUsage {
        syntax: "/clear",
        description: "Clear the contact message",
    },
    CommandUsage {
        syntax: "/profile",
        description: "Show the site profile",
    },
    CommandUsage {
        syntax: "/help",
        description: "Show this help",
    },
    CommandUsage {
        syntax: "/quit",
        description: "Leave the session",
    },
];

pub fn help_text() -> String {
    let mut help = String::from("Type a message to chat with the assistant.\n\nCommands:\n");
    for usage in COMMANDS {
        help.push_str(&format!("  {:<46} {}\n", usage.syntax, usage.description));
    }
    help
}

pub fn process_input(input: &str) -> CommandResult {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return CommandResult::ProcessAsMessage(input.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    match command_name.to_ascii_lowercase().as_str() {
        "projects" => CommandResult::Projects,
        "analyze" => parse_analyze(args),
        "close" if args.is_empty() => CommandResult::Usage("Usage: /close <project>".into()),
        "close" => CommandResult::CloseAnalysis {
            project: args.to_string(),
        },
        "draft" => parse_draft(args),
        "tone" => match args.parse::<Tone>() {
            Ok(tone) => CommandResult::SetTone(tone),
            Err(err) => CommandResult::Usage(err),
        },
        "message" => CommandResult::ShowMessage,
        "clear" => CommandResult::ClearMessage,
        "profile" => CommandResult::Profile,
        "help" => CommandResult::Help,
        "quit" | "exit" => CommandResult::Quit,
        _ => CommandResult::ProcessAsMessage(input.to_string()),
    }
}

fn parse_analyze(args: &str) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Usage("Usage: /analyze <project> [technical|marketing]".into());
    }

    if let Some((project, last)) = args.rsplit_once(char::is_whitespace) {
        if let Ok(mode) = last.parse::<AnalysisMode>() {
            return CommandResult::Analyze {
                project: project.trim().to_string(),
                mode,
            };
        }
    }

    CommandResult::Analyze {
        project: args.to_string(),
        mode: AnalysisMode::Technical,
    }
}

fn parse_draft(args: &str) -> CommandResult {
    let (first, rest) = args
        .split_once(char::is_whitespace)
        .unwrap_or((args, ""));

    let (tone, topic) = match first.parse::<Tone>() {
        Ok(tone) => (Some(tone), rest.trim()),
        Err(_) => (None, args),
    };

    if topic.is_empty() {
        return CommandResult::Usage("Usage: /draft [tone] <topic>".into());
    }
    CommandResult::Draft {
        tone,
        topic: topic.to_string(),
    }
}
