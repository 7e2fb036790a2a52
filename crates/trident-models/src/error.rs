use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid roster: {0}")]
    Roster(String),
    #[error("invalid catalog: {0}")]
    Catalog(String),
    #[error("bad TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown backend kind '{0}' (expected 'mock' or 'trained')")]
    UnknownBackend(String),
    #[error("no inference backend for trained models ({0}); use the mock backend")]
    InferenceUnavailable(String),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }
}
