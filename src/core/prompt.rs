//! Prompt assembly for the three generation tasks.
//!
//! Everything here is pure: the same profile and inputs always produce the
//! same strings.

use std::fmt;
use std::str::FromStr;

use crate::core::profile::SiteProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    Technical,
    Marketing,
}

impl AnalysisMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Technical => "technical",
            AnalysisMode::Marketing => "marketing",
        }
    }

    /// Title shown above a settled analysis.
    pub fn pane_title(self) -> &'static str {
        match self {
            AnalysisMode::Technical => "Technical Analysis",
            AnalysisMode::Marketing => "Marketing Pitch",
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" | "tech" => Ok(AnalysisMode::Technical),
            "marketing" | "pitch" => Ok(AnalysisMode::Marketing),
            other => Err(format!(
                "unknown analysis mode '{other}' (expected technical or marketing)"
            )),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Urgent,
    Friendly,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Professional, Tone::Casual, Tone::Urgent, Tone::Friendly];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Urgent => "Urgent",
            Tone::Friendly => "Friendly",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                format!(
                    "unknown tone '{needle}' (expected one of: {})",
                    Tone::ALL.map(Tone::label).join(", ")
                )
            })
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// System instruction for the profile chat: persona, résumé context and answer rules.
pub fn chat_system_instruction(profile: &SiteProfile) -> String {
    let first_name = profile.first_name();
    format!(
        "You are {first_name}'s AI Assistant.\n\
Context:\n{context}\n\n\
Rules:\n\
1. Answer strictly based on the context.\n\
2. Be extremely concise (max 2 sentences).\n\
3. Be friendly and witty.\n\
4. If unknown, say \"I'm not sure, ask {first_name} directly!\"",
        context = profile.resume_context(),
    )
}

/// Opening assistant turn shown before the visitor types anything.
pub fn chat_greeting(profile: &SiteProfile) -> String {
    format!(
        "Hi! I'm {}'s AI Assistant. Ask me anything!",
        profile.first_name()
    )
}

pub fn analysis_prompt(title: &str, details: &str, mode: AnalysisMode) -> String {
    match mode {
        AnalysisMode::Technical => format!(
            "Analyze project \"{title}\": \"{details}\".\n\
List 3 key technical challenges/stack choices in bullet points.\n\
Keep it extremely concise (max 10 words per bullet)."
        ),
        AnalysisMode::Marketing => format!(
            "Write a high-energy 1-sentence marketing pitch (max 20 words) with emojis for \"{title}\": \"{details}\"."
        ),
    }
}

pub fn draft_prompt(topic: &str, tone: Tone) -> String {
    format!(
        "Draft a very short contact message body (max 50 words) about \"{}\". Tone: {}. No subject line.",
        topic.trim(),
        tone.label()
    )
}
