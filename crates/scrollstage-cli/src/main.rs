use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollstage_core::{Scene, StageConfig};

mod commands;

#[derive(Parser)]
#[command(name = "scrollstage")]
#[command(author, version, about = "Scroll-synchronized choreography engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/scrollstage/config.toml)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Scene file, TOML or JSON (defaults to the built-in landing page)
    #[arg(short = 's', long, global = true)]
    scene: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the scene in the terminal
    Preview,
    /// Run the engine headless and print one JSON frame per line
    Simulate {
        /// Number of frames to run
        #[arg(short = 'n', long, default_value_t = 180)]
        frames: u64,
        /// Input script steps, `FRAME:KIND:VALUE` with KIND one of
        /// wheel, touch, scroll-to, jump-to (default: scroll to the bottom)
        #[arg(short = 'i', long = "input")]
        inputs: Vec<String>,
        /// Pace frames in real time instead of as fast as possible
        #[arg(long)]
        realtime: bool,
        /// Only print frames that carry boundary events
        #[arg(long)]
        events_only: bool,
    },
    /// Show or initialise configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Inspect the scene
    Scene {
        #[command(subcommand)]
        action: SceneAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default configuration path
    Path,
    /// Write the default configuration if none exists
    Init,
}

#[derive(Subcommand)]
enum SceneAction {
    /// Print the scene
    Show {
        #[arg(short, long, value_enum, default_value_t = SceneFormat::Toml)]
        format: SceneFormat,
    },
    /// Resolve every trigger against the layout and report problems
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SceneFormat {
    Toml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => StageConfig::load_from(path)?,
        None => StageConfig::load()?,
    };

    // Initialize logging; stdout carries simulation output, logs go to
    // stderr, and the preview owns the terminal so it defaults to warnings
    let default_level = match cli.command {
        Some(Commands::Preview) | None => "warn".to_string(),
        _ => config.general.log_level.clone(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let scene = match &cli.scene {
        Some(path) => Scene::load_from(path)?,
        None => Scene::landing_page(),
    };

    match cli.command {
        Some(Commands::Preview) | None => commands::preview::run(&config, scene).await,
        Some(Commands::Simulate {
            frames,
            inputs,
            realtime,
            events_only,
        }) => {
            let options = commands::simulate::SimulateOptions::parse(frames, &inputs, realtime, events_only)?;
            commands::simulate::run(&config, &scene, options).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Init => commands::config::init(),
        },
        Some(Commands::Scene { action }) => match action {
            SceneAction::Show { format } => commands::scene::show(&scene, format),
            SceneAction::Check => commands::scene::check(&config, &scene),
        },
    }
}
