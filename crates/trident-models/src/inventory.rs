//! Trained model discovery and backend assembly.

use crate::catalog::Catalog;
use crate::error::ModelError;
use crate::mock::{MockFaceResolver, MockRecommender, MockVoiceConfirmer};
use crate::roster::Roster;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use trident_core::Backends;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Face,
    Voice,
    Product,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Face, Tier::Voice, Tier::Product];

    /// File name a trained model for this tier is expected under.
    pub fn model_file(self) -> &'static str {
        match self {
            Tier::Face => "face_recognition_model.pkl",
            Tier::Voice => "voice_verification_model.pkl",
            Tier::Product => "product_recommendation_model.pkl",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Face => "Facial Recognition Model",
            Tier::Voice => "Voice Verification Model",
            Tier::Product => "Product Recommendation Model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum ModelStatus {
    Missing,
    Present(PathBuf),
}

/// Which trained model files exist in the model directory.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInventory {
    pub dir: PathBuf,
    pub dir_exists: bool,
    pub face: ModelStatus,
    pub voice: ModelStatus,
    pub product: ModelStatus,
}

impl ModelInventory {
    pub fn discover(dir: &Path) -> Self {
        let dir_exists = dir.is_dir();
        let probe = |tier: Tier| {
            let path = dir.join(tier.model_file());
            if dir_exists && path.is_file() {
                ModelStatus::Present(path)
            } else {
                ModelStatus::Missing
            }
        };

        let inventory = Self {
            dir: dir.to_path_buf(),
            dir_exists,
            face: probe(Tier::Face),
            voice: probe(Tier::Voice),
            product: probe(Tier::Product),
        };

        if !dir_exists {
            tracing::warn!(dir = %dir.display(), "model directory not found");
        }
        for (tier, status) in inventory.entries() {
            tracing::debug!(tier = ?tier, status = ?status, "model discovery");
        }
        inventory
    }

    pub fn status(&self, tier: Tier) -> &ModelStatus {
        match tier {
            Tier::Face => &self.face,
            Tier::Voice => &self.voice,
            Tier::Product => &self.product,
        }
    }

    pub fn entries(&self) -> [(Tier, &ModelStatus); 3] {
        Tier::ALL.map(|t| (t, self.status(t)))
    }

    pub fn any_present(&self) -> bool {
        self.entries()
            .iter()
            .any(|(_, s)| matches!(s, ModelStatus::Present(_)))
    }
}

/// Which implementation backs the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Mock,
    Trained,
}

impl FromStr for BackendKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "trained" => Ok(BackendKind::Trained),
            other => Err(ModelError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Mock => "mock",
            BackendKind::Trained => "trained",
        })
    }
}

/// Assemble the tier backends.
///
/// Trained models cannot be executed, so asking for them fails immediately.
/// With the mock backend any trained model files found are reported and ignored.
pub fn build_backends(
    kind: BackendKind,
    inventory: &ModelInventory,
    roster: Roster,
    catalog: Catalog,
    seed: Option<u64>,
) -> Result<Backends, ModelError> {
    match kind {
        BackendKind::Trained => {
            let present: Vec<String> = inventory
                .entries()
                .iter()
                .filter_map(|(_, s)| match s {
                    ModelStatus::Present(p) => Some(p.display().to_string()),
                    ModelStatus::Missing => None,
                })
                .collect();
            let detail = if present.is_empty() {
                format!("no model files in {}", inventory.dir.display())
            } else {
                present.join(", ")
            };
            Err(ModelError::InferenceUnavailable(detail))
        }
        BackendKind::Mock => {
            for (tier, status) in inventory.entries() {
                if let ModelStatus::Present(path) = status {
                    tracing::warn!(
                        tier = ?tier,
                        path = %path.display(),
                        "trained model found but not loadable; using mock"
                    );
                }
            }
            tracing::info!(users = roster.users().len(), seeded = seed.is_some(), "mock backends ready");
            Ok(Backends::new(
                MockFaceResolver::new(roster.clone(), seed),
                MockVoiceConfirmer::new(roster, seed),
                MockRecommender::new(catalog, seed),
            ))
        }
    }
}
