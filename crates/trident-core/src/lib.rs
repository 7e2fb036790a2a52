//! trident-core — Tiered verification sequencer.
//!
//! Resolves a claimed identity from a face artifact, confirms it against a
//! voice artifact, then derives a product recommendation for the
//! authenticated user. The tier implementations are injected as [`Backends`].

pub mod backend;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod types;

pub use backend::{
    ArtifactProbe, BackendError, Backends, FsProbe, IdentityConfirmer, IdentityResolver,
    Recommender,
};
pub use sequencer::{ConfirmationPolicy, SequenceError, Sequencer};
pub use session::{AuthenticatedUser, Session};
pub use state::{SequenceState, StageEvent};
pub use types::{
    Confidence, Identity, Match, Recommendation, Rejection, SequenceResult, StageThreeOutcome,
    Verification,
};
