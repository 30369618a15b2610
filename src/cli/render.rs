//! Plain-text rendering of widget views.

use crate::core::message::{ConversationTurn, Speaker};
use crate::core::profile::SiteProfile;
use crate::core::widgets::{AnalyzerView, ChatView, DrafterView};

pub fn render_turn(turn: &ConversationTurn) -> String {
    let prefix = match turn.speaker {
        Speaker::User => "You",
        Speaker::Assistant => "Assistant",
    };
    format!("{prefix}: {}", turn.text.trim_end())
}

pub fn render_chat(view: &ChatView) -> Vec<String> {
    let mut lines: Vec<String> = view.turns.iter().map(render_turn).collect();
    if let Some(pending) = &view.pending_user_text {
        lines.push(render_turn(&ConversationTurn::user(pending.clone())));
    }
    if view.is_loading {
        lines.push("Assistant is typing...".to_string());
    }
    lines
}

/// Empty when the pane is closed.
pub fn render_analyzer(view: &AnalyzerView) -> Vec<String> {
    if !view.pane_open {
        return Vec::new();
    }

    let mut lines = vec![format!(
        "[{}] {}",
        view.pane_title.unwrap_or_default(),
        view.title
    )];
    if let Some(body) = &view.body {
        lines.extend(body.lines().map(|line| format!("  {line}")));
    }
    lines
}

pub fn render_drafter(view: &DrafterView) -> Vec<String> {
    let field = |value: &str| {
        if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };

    let mut lines = vec![
        format!("Name: {}", field(&view.name)),
        format!("Email: {}", field(&view.email)),
        format!("Topic: {}", field(&view.topic)),
        format!("Tone: {}", view.tone),
    ];
    if view.is_drafting {
        lines.push("Message: (drafting...)".to_string());
    } else if view.message.is_empty() {
        lines.push("Message: (empty)".to_string());
    } else {
        lines.push("Message:".to_string());
        lines.extend(view.message.lines().map(|line| format!("  {line}")));
    }
    lines
}

pub fn render_projects(profile: &SiteProfile) -> Vec<String> {
    profile
        .projects
        .iter()
        .map(|project| {
            let tags = if project.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", project.tags.join(", "))
            };
            format!(
                "{:>3}  {}{} - {}",
                project.id, project.title, tags, project.short_description
            )
        })
        .collect()
}

pub fn render_profile(profile: &SiteProfile) -> Vec<String> {
    let mut lines = vec![
        profile.name.clone(),
        profile.role.clone(),
        profile.hero_subtitle.clone(),
        String::new(),
    ];
    lines.extend(profile.introduction.iter().cloned());
    if !profile.skills.is_empty() {
        lines.push(String::new());
        lines.push(format!("Core stack: {}", profile.skills.join(", ")));
    }
    lines.push(String::new());
    lines.push(format!("Email: {}", profile.email));
    lines.push(format!("GitHub: {}", profile.github));
    if let Some(cv) = &profile.cv_link {
        lines.push(format!("CV: {cv}"));
    }
    if !profile.sections.is_empty() {
        let sections: Vec<&str> = profile.sections.iter().map(|s| s.label.as_str()).collect();
        lines.push(format!("Sections: {}", sections.join(" | ")));
    }
    lines
}
