//! Static site content: owner profile, navigation sections and project catalog.
//!
//! The built-in profile is embedded from `builtin_profile.toml` at build time.
//! A replacement file with the same shape can be pointed to from the config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavSection {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    /// Longer name used in the chat context; the card title otherwise
    #[serde(default)]
    pub context_title: Option<String>,
    /// Label shown in parentheses after the project in the chat context
    pub category: Option<String>,
    pub short_description: String,
    pub long_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_ref: String,
}

impl ProjectRecord {
    /// Text handed to the analyzer: long description, else the short one.
    pub fn analysis_details(&self) -> &str {
        self.long_description
            .as_deref()
            .filter(|details| !details.trim().is_empty())
            .unwrap_or(&self.short_description)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteProfile {
    pub name: String,
    pub role: String,
    pub hero_subtitle: String,
    pub education: String,
    pub email: String,
    pub github: String,
    pub cv_link: Option<String>,
    pub profile_image: Option<String>,
    #[serde(default)]
    pub introduction: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub sections: Vec<NavSection>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

#[derive(Debug)]
pub enum ProfileError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Read { path, source } => {
                write!(f, "Failed to read profile at {}: {}", path_display(path), source)
            }
            ProfileError::Parse { path, source } => {
                write!(f, "Failed to parse profile at {}: {}", path_display(path), source)
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::Read { source, .. } => Some(source),
            ProfileError::Parse { source, .. } => Some(source),
        }
    }
}

/// Load the profile compiled into the binary
pub fn load_builtin_profile() -> SiteProfile {
    const PROFILE_CONTENT: &str = include_str!("../builtin_profile.toml");

    toml::from_str(PROFILE_CONTENT).expect("Failed to parse builtin_profile.toml")
}

impl SiteProfile {
    pub fn load_from_path(path: &Path) -> Result<Self, ProfileError> {
        let contents = fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ProfileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Custom profile when a path is configured, the built-in one otherwise.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(load_builtin_profile()),
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Find a project by exact id or case-insensitive title.
    pub fn find_project(&self, id_or_title: &str) -> Option<&ProjectRecord> {
        let needle = id_or_title.trim();
        self.projects
            .iter()
            .find(|p| p.id == needle)
            .or_else(|| {
                self.projects
                    .iter()
                    .find(|p| p.title.eq_ignore_ascii_case(needle))
            })
    }

    /// Résumé block embedded in the chat assistant's system instruction.
    pub fn resume_context(&self) -> String {
        let projects = self
            .projects
            .iter()
            .map(|p| {
                let title = p.context_title.as_deref().unwrap_or(&p.title);
                match &p.category {
                    Some(category) => format!("{title} ({category})"),
                    None => title.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut lines = vec![
            format!("Name: {}", self.name),
            format!("Role: {}", self.role),
            format!("Education: {}", self.education),
            format!("Skills: {}.", self.skills.join(", ")),
            format!("Background: {}", self.hero_subtitle),
        ];
        if !projects.is_empty() {
            lines.push(format!("Projects: {projects}."));
        }
        if !self.interests.is_empty() {
            lines.push(format!("Interests: {}.", self.interests.join(", ")));
        }
        lines.push(format!("Contact: {}", self.email));
        lines.push(format!("Github: {}", self.github));
        lines.join("\n")
    }
}
