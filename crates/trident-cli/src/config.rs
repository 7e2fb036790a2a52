use anyhow::{Context, Result};
use std::path::PathBuf;
use trident_core::ConfirmationPolicy;
use trident_models::{BackendKind, Catalog, Roster};

/// CLI configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory searched for trained model files.
    pub model_dir: PathBuf,
    /// Directory holding `images/` and `audio/` samples.
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    /// Replacement for the embedded roster.
    pub roster_path: Option<PathBuf>,
    /// Replacement for the embedded catalog.
    pub catalog_path: Option<PathBuf>,
    /// Seed for the mock backends; entropy when unset.
    pub mock_seed: Option<u64>,
    pub policy: ConfirmationPolicy,
}

impl Config {
    /// Load configuration from `TRIDENT_*` environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend = match var("TRIDENT_BACKEND") {
            Some(v) => v.parse::<BackendKind>().context("TRIDENT_BACKEND")?,
            None => BackendKind::default(),
        };

        let mock_seed = match var("TRIDENT_MOCK_SEED") {
            Some(v) => Some(
                v.trim()
                    .parse::<u64>()
                    .with_context(|| format!("TRIDENT_MOCK_SEED must be an unsigned integer, got '{v}'"))?,
            ),
            None => None,
        };

        let policy = match var("TRIDENT_STRICT_CONFIRMATION") {
            Some(v) if v.trim() == "0" => ConfirmationPolicy::Lenient,
            _ => ConfirmationPolicy::Strict,
        };

        Ok(Self {
            model_dir: var("TRIDENT_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
            data_dir: var("TRIDENT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            backend,
            roster_path: var("TRIDENT_ROSTER").map(PathBuf::from),
            catalog_path: var("TRIDENT_CATALOG").map(PathBuf::from),
            mock_seed,
            policy,
        })
    }

    pub fn roster(&self) -> Result<Roster> {
        match &self.roster_path {
            Some(path) => Roster::load(path).context("loading roster"),
            None => Ok(Roster::embedded().clone()),
        }
    }

    pub fn catalog(&self) -> Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path).context("loading catalog"),
            None => Catalog::embedded().context("embedded catalog"),
        }
    }

    /// Path to the merged customer dataset (listed, not read).
    pub fn customer_data_path(&self) -> PathBuf {
        self.data_dir.join("processed").join("merged_customer_data.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.backend, BackendKind::Mock);
        assert_eq!(config.policy, ConfirmationPolicy::Strict);
        assert!(config.mock_seed.is_none());
        assert!(config.roster_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TRIDENT_MODEL_DIR", "/opt/models"),
            ("TRIDENT_BACKEND", "trained"),
            ("TRIDENT_MOCK_SEED", "42"),
            ("TRIDENT_STRICT_CONFIRMATION", "0"),
        ]))
        .unwrap();
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.backend, BackendKind::Trained);
        assert_eq!(config.mock_seed, Some(42));
        assert_eq!(config.policy, ConfirmationPolicy::Lenient);
    }

    #[test]
    fn test_bad_seed_is_an_error() {
        let err = Config::from_lookup(lookup(&[("TRIDENT_MOCK_SEED", "soon")])).unwrap_err();
        assert!(err.to_string().contains("TRIDENT_MOCK_SEED"), "{err}");
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        assert!(Config::from_lookup(lookup(&[("TRIDENT_BACKEND", "onnx")])).is_err());
    }

    #[test]
    fn test_customer_data_path() {
        let config = Config::from_lookup(lookup(&[("TRIDENT_DATA_DIR", "/srv/data")])).unwrap();
        assert_eq!(
            config.customer_data_path(),
            PathBuf::from("/srv/data/processed/merged_customer_data.csv")
        );
    }
}
