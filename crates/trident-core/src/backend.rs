//! Pluggable collaborators consumed by the sequencer.
//!
//! Each tier is a trait so that mocks, trained models, or deterministic
//! test stand-ins can be swapped in through [`Backends`].

use crate::types::{Identity, Match, Recommendation};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{backend} backend failed: {message}")]
    Failed {
        backend: &'static str,
        message: String,
    },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    pub fn failed(backend: &'static str, message: impl Into<String>) -> Self {
        BackendError::Failed {
            backend,
            message: message.into(),
        }
    }
}

/// Maps an artifact reference to "does it exist".
pub trait ArtifactProbe {
    fn exists(&self, artifact: &Path) -> bool;
}

/// Filesystem-backed probe.
pub struct FsProbe;

impl ArtifactProbe for FsProbe {
    fn exists(&self, artifact: &Path) -> bool {
        artifact.exists()
    }
}

/// Stage 1: resolve an artifact to a claimed identity.
///
/// `Ok(None)` is an expected rejection; `Err` is reserved for backend faults.
pub trait IdentityResolver {
    fn resolve(&self, artifact: &Path) -> Result<Option<Match>, BackendError>;
}

/// Stage 2: check an artifact against a claimed identity.
///
/// Implementations may return a match for a different identity than
/// `claimed`; the sequencer's confirmation policy decides whether that counts.
pub trait IdentityConfirmer {
    fn confirm(&self, artifact: &Path, claimed: &Identity) -> Result<Option<Match>, BackendError>;
}

/// Stage 3: derive an auxiliary result for an authenticated identity.
pub trait Recommender {
    fn recommend(&self, identity: &Identity) -> Result<Option<Recommendation>, BackendError>;
}

/// The dependency bundle handed to the sequencer at construction.
pub struct Backends {
    pub probe: Box<dyn ArtifactProbe>,
    pub resolver: Box<dyn IdentityResolver>,
    pub confirmer: Box<dyn IdentityConfirmer>,
    pub recommender: Box<dyn Recommender>,
}

impl Backends {
    /// Bundle the three tier backends with the filesystem probe.
    pub fn new(
        resolver: impl IdentityResolver + 'static,
        confirmer: impl IdentityConfirmer + 'static,
        recommender: impl Recommender + 'static,
    ) -> Self {
        Self {
            probe: Box::new(FsProbe),
            resolver: Box::new(resolver),
            confirmer: Box::new(confirmer),
            recommender: Box::new(recommender),
        }
    }

    /// Replace the artifact probe.
    pub fn with_probe(mut self, probe: impl ArtifactProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }
}
