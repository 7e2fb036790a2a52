//! Known-user roster.
//!
//! The default roster is embedded at compile time from `contrib/roster.toml`;
//! a replacement can be loaded from any TOML file of the same shape.

use crate::error::ModelError;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;
use trident_core::Identity;

const EMBEDDED_ROSTER: &str = include_str!("../../../contrib/roster.toml");

static DEFAULT_ROSTER: OnceLock<Roster> = OnceLock::new();

#[derive(Debug, Clone, Deserialize)]
pub struct RosterUser {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Roster {
    #[serde(rename = "user", default)]
    users: Vec<RosterUser>,
}

impl Roster {
    /// The roster compiled into the binary.
    pub fn embedded() -> &'static Roster {
        DEFAULT_ROSTER.get_or_init(|| match Roster::from_toml(EMBEDDED_ROSTER) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "embedded roster is invalid; no users known");
                Roster { users: Vec::new() }
            }
        })
    }

    /// Parse and validate a roster document.
    pub fn from_toml(src: &str) -> Result<Self, ModelError> {
        let roster: Roster =
            toml::from_str(src).map_err(|e| ModelError::Roster(e.to_string()))?;
        roster.validate()?;
        Ok(roster)
    }

    /// Load a roster from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let src = std::fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        let roster: Roster = toml::from_str(&src).map_err(|source| ModelError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        roster.validate()?;
        tracing::debug!(path = %path.display(), users = roster.users.len(), "roster loaded");
        Ok(roster)
    }

    pub fn users(&self) -> &[RosterUser] {
        &self.users
    }

    /// First user, in roster order, whose lower-cased name occurs in `haystack`.
    ///
    /// `haystack` is expected to be lower-cased already.
    pub fn find_in(&self, haystack: &str) -> Option<Identity> {
        self.users
            .iter()
            .find(|u| haystack.contains(&u.name.to_lowercase()))
            .and_then(|u| Identity::new(u.name.as_str()))
    }

    fn validate(&self) -> Result<(), ModelError> {
        if let Some(pos) = self.users.iter().position(|u| u.name.trim().is_empty()) {
            return Err(ModelError::Roster(format!("user #{} has a blank name", pos + 1)));
        }
        Ok(())
    }
}
