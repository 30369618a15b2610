//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, wires the generation client and
//! runs the requested command.

pub mod oneshot;
pub mod render;
pub mod session;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::cli::oneshot::{run_oneshot, OneShot};
use crate::cli::render::{render_profile, render_projects};
use crate::cli::session::run_session;
use crate::core::app::App;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::core::dispatch::RequestService;
use crate::core::gemini::GeminiBackend;
use crate::core::generation::GenerationClient;
use crate::core::profile::SiteProfile;
use crate::core::prompt::{AnalysisMode, Tone};
use crate::logging;
use crate::utils::auth::{api_key_from_env, API_KEY_VARS};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    " for ",
    env!("VERGEN_CARGO_TARGET_TRIPLE"),
    ")"
);

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "An AI assistant for a personal portfolio site")]
#[command(
    long_about = "Folio answers questions about a portfolio owner, analyzes their projects and \
drafts contact messages, using a Gemini model.\n\n\
Authentication:\n\
  API_KEY           API key for the generation service\n\
  GEMINI_API_KEY    Used when API_KEY is not set\n\n\
Logging:\n\
  FOLIO_LOG         tracing filter directive, e.g. folio=debug\n\n\
Interactive commands:\n\
  /projects         List the project catalog\n\
  /analyze          Analyze a project\n\
  /draft            Draft a contact message\n\
  /help             Show all commands"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use instead of the configured one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Site profile TOML to use instead of the configured one
    #[arg(short = 'p', long, global = true, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive session (default)
    Chat,
    /// Ask the assistant a single question
    Ask {
        #[arg(required = true, trailing_var_arg = true)]
        question: Vec<String>,
    },
    /// Analyze one project by id or title
    Analyze {
        project: String,
        #[arg(long, default_value_t = AnalysisMode::Technical)]
        mode: AnalysisMode,
    },
    /// Draft a contact message about a topic
    Draft {
        #[arg(required = true, trailing_var_arg = true)]
        topic: Vec<String>,
        #[arg(long, default_value_t = Tone::Professional)]
        tone: Tone,
    },
    /// List the project catalog
    Projects,
    /// Show the site profile
    Profile,
    /// Show the effective configuration
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Reset a configuration value to its default
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config_path = Config::resolve_path(args.config.as_deref())?;
    debug!(path = %path_display(&config_path), "Using config file");

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Config => {
            let config = Config::load_from_path(&config_path)?;
            println!("Config file: {}", path_display(&config_path));
            for line in config.describe() {
                println!("  {line}");
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = Config::load_from_path(&config_path)?;
            let value = value.join(" ");
            if let Err(message) = config.set_value(&key, &value) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save_to_path(&config_path)?;
            println!("✅ Set {key} to: {}", value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load_from_path(&config_path)?;
            if let Err(message) = config.unset_value(&key) {
                eprintln!("❌ {message}");
                std::process::exit(1);
            }
            config.save_to_path(&config_path)?;
            println!("✅ Unset {key}");
            Ok(())
        }
        command => {
            let config = Config::load_from_path(&config_path)?;
            let profile = load_profile(args.profile.as_deref(), &config)?;
            let client = build_client(&config, args.model.as_deref());
            run_with_profile(command, profile, client).await
        }
    }
}

fn load_profile(explicit: Option<&Path>, config: &Config) -> Result<SiteProfile, Box<dyn Error>> {
    let path = explicit.or(config.profile.as_deref());
    if let Some(path) = path {
        debug!(path = %path_display(path), "Loading site profile");
    }
    Ok(SiteProfile::resolve(path)?)
}

fn build_client(config: &Config, model_override: Option<&str>) -> GenerationClient {
    let model = model_override
        .filter(|model| !model.trim().is_empty())
        .unwrap_or_else(|| config.effective_model());
    let backend = GeminiBackend::new(config.effective_base_url(), model);
    GenerationClient::new(api_key_from_env(), Arc::new(backend), config.limits.clone())
}

async fn run_with_profile(
    command: Commands,
    profile: SiteProfile,
    client: GenerationClient,
) -> Result<(), Box<dyn Error>> {
    let request = match command {
        Commands::Projects => {
            for line in render_projects(&profile) {
                println!("{line}");
            }
            return Ok(());
        }
        Commands::Profile => {
            for line in render_profile(&profile) {
                println!("{line}");
            }
            return Ok(());
        }
        Commands::Ask { question } => OneShot::Ask(question.join(" ")),
        Commands::Analyze { project, mode } => OneShot::Analyze { project, mode },
        Commands::Draft { topic, tone } => OneShot::Draft {
            topic: topic.join(" "),
            tone,
        },
        _ => {
            if !client.has_credential() {
                eprintln!(
                    "⚠️  No API key found. Set {} to talk to the model.",
                    API_KEY_VARS.join(" or ")
                );
            }
            let app = App::new(profile);
            let (service, events) = RequestService::new(client);
            return run_session(app, service, events).await;
        }
    };

    let mut app = App::new(profile);
    let (lines, succeeded) = run_oneshot(&mut app, &client, request).await?;
    for line in lines {
        println!("{line}");
    }
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
