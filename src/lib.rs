//! Folio is the request layer behind a one-page portfolio: a profile chat,
//! per-project AI analysis and an AI-assisted contact drafter.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the site profile, prompt assembly, the generation client
//!   and the widget controllers with their request lifecycles.
//! - [`api`] defines the `generateContent` payloads and the HTTP call.
//! - [`commands`] parses slash commands typed into the interactive session.
//! - [`cli`] is the terminal host that renders widget views and drives
//!   submissions.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
pub mod utils;
