pub mod app;
pub mod config;
pub mod dispatch;
pub mod gemini;
pub mod generation;
pub mod message;
pub mod profile;
pub mod prompt;
pub mod widgets;
