use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trident_core::{Identity, Rejection, SequenceResult};
use trident_models::artifacts;

mod app;
mod config;
mod menu;
mod report;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(
    name = "trident",
    version,
    about = "Three-tier authentication demo: face, then voice, then a product recommendation"
)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all three tiers on a face image and a voice recording
    Run {
        /// Path to the face image
        #[arg(long)]
        face: PathBuf,
        /// Path to the voice recording
        #[arg(long)]
        voice: PathBuf,
    },
    /// Tier 1 only: recognise a face image
    Face {
        /// Path to the face image
        image: PathBuf,
    },
    /// Tier 2 only: check a voice recording against a claimed user
    Voice {
        /// Path to the voice recording
        recording: PathBuf,
        /// User the recording should belong to
        #[arg(short, long)]
        claim: String,
    },
    /// Walk through an unknown person being turned away
    SimulateUnauthorized,
    /// Show tiers, model status and data sources
    Info,
    /// List sample images and recordings in the data directory
    Artifacts,
    /// Interactive menu (default)
    Menu,
}

#[derive(Serialize)]
struct ArtifactListing {
    images: Vec<PathBuf>,
    audio: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("reading TRIDENT_* configuration")?;
    let mut app = App::init(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let passed = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Run { face, voice } => {
            let result = app.sequencer.run_full_sequence(&face, &voice)?;
            if cli.json {
                report::json(&mut out, &result)?;
            } else {
                report::sequence(&mut out, &face, &voice, &result)?;
            }
            result.is_completed()
        }
        Commands::Face { image } => {
            let verdict = app.sequencer.run_stage1(&image)?;
            if cli.json {
                report::json(&mut out, &verdict)?;
            } else {
                report::stage1(&mut out, &image, &verdict)?;
            }
            verdict.is_accepted()
        }
        Commands::Voice { recording, claim } => {
            let claimed = Identity::new(claim).context("--claim must not be blank")?;
            let verdict = app.sequencer.run_stage2(&recording, &claimed)?;
            if cli.json {
                report::json(&mut out, &verdict)?;
            } else {
                report::stage2(&mut out, &recording, &verdict)?;
            }
            verdict.is_accepted()
        }
        Commands::SimulateUnauthorized => {
            tracing::info!("simulating unauthorized attempt");
            let result = SequenceResult::Stage1Failed {
                reason: Rejection::ResolutionRejected,
            };
            if cli.json {
                report::json(&mut out, &result)?;
            } else {
                report::unauthorized(&mut out)?;
            }
            // The attempt was blocked, which is the expected result of the walkthrough.
            true
        }
        Commands::Info => {
            let info = app.system_info();
            if cli.json {
                report::json(&mut out, &info)?;
            } else {
                report::system_info(&mut out, &info)?;
            }
            true
        }
        Commands::Artifacts => {
            let listing = ArtifactListing {
                images: artifacts::list_images(&app.config.data_dir)?,
                audio: artifacts::list_audio(&app.config.data_dir)?,
            };
            if cli.json {
                report::json(&mut out, &listing)?;
            } else {
                report::artifacts(&mut out, &listing.images, &listing.audio)?;
            }
            true
        }
        Commands::Menu => {
            let stdin = io::stdin();
            menu::run(&mut app, stdin.lock(), &mut out)?;
            true
        }
    };

    out.flush()?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
