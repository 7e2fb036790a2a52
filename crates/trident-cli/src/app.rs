use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use trident_core::{ConfirmationPolicy, Sequencer};
use trident_models::{build_backends, BackendKind, ModelInventory, ModelStatus, Tier};

/// Everything a command needs: configuration, model inventory and the sequencer.
pub struct App {
    pub config: Config,
    pub inventory: ModelInventory,
    pub sequencer: Sequencer,
}

impl App {
    /// Discover models and assemble backends. Fails fast on bad configuration.
    pub fn init(config: Config) -> Result<Self> {
        let inventory = ModelInventory::discover(&config.model_dir);
        let backends = build_backends(
            config.backend,
            &inventory,
            config.roster()?,
            config.catalog()?,
            config.mock_seed,
        )
        .context("assembling tier backends")?;

        tracing::info!(
            backend = %config.backend,
            policy = ?config.policy,
            model_dir = %config.model_dir.display(),
            "system ready"
        );

        let sequencer = Sequencer::new(backends, config.policy);
        Ok(Self {
            config,
            inventory,
            sequencer,
        })
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            version: env!("CARGO_PKG_VERSION"),
            backend: self.config.backend,
            policy: self.sequencer.policy(),
            models: self
                .inventory
                .entries()
                .iter()
                .map(|(tier, status)| ModelEntry {
                    tier: *tier,
                    label: tier.label(),
                    present: matches!(status, ModelStatus::Present(_)),
                })
                .collect(),
            model_dir: self.config.model_dir.clone(),
            model_dir_exists: self.inventory.dir_exists,
            images_dir: self.config.data_dir.join("images"),
            audio_dir: self.config.data_dir.join("audio"),
            customer_data: self.config.customer_data_path(),
            authenticated: self
                .sequencer
                .session()
                .identity()
                .map(|id| id.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    pub tier: Tier,
    pub label: &'static str,
    /// A model file exists. The mock backend never loads it.
    pub present: bool,
}

#[derive(Debug, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub backend: BackendKind,
    pub policy: ConfirmationPolicy,
    pub models: Vec<ModelEntry>,
    pub model_dir: PathBuf,
    pub model_dir_exists: bool,
    pub images_dir: PathBuf,
    pub audio_dir: PathBuf,
    pub customer_data: PathBuf,
    pub authenticated: Option<String>,
}
