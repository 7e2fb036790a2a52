//! trident-models — Tier backends for the trident sequencer.
//!
//! Ships the mock face, voice and product backends used by the demo, the
//! roster and catalog data they draw from, and discovery of trained model
//! files on disk.

pub mod artifacts;
pub mod catalog;
pub mod error;
pub mod inventory;
pub mod mock;
pub mod roster;

pub use catalog::Catalog;
pub use error::ModelError;
pub use inventory::{build_backends, BackendKind, ModelInventory, ModelStatus, Tier};
pub use mock::{MockFaceResolver, MockRecommender, MockVoiceConfirmer};
pub use roster::Roster;
