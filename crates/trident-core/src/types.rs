use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Username asserted by Stage 1 and confirmed by Stage 2. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Build an identity from a label. Returns `None` for blank labels.
    pub fn new(label: impl Into<String>) -> Option<Self> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used when matching claims against confirmations.
    pub fn same_user(&self, other: &Identity) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Probability in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f32);

impl Confidence {
    pub const ZERO: Confidence = Confidence(0.0);

    /// Clamp `value` into [0, 1]. NaN maps to zero.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Confidence {
    /// Renders as a percentage with two decimals, e.g. `93.41%`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.0)
    }
}

/// A backend's positive answer: which identity, and how sure it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub identity: Identity,
    pub confidence: Confidence,
}

impl Match {
    pub fn new(identity: Identity, confidence: f32) -> Self {
        Self {
            identity,
            confidence: Confidence::new(confidence),
        }
    }
}

/// Why a stage refused to pass. All kinds are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// The referenced input does not exist.
    ArtifactNotFound { artifact: PathBuf },
    /// Stage 1 found no matching identity.
    ResolutionRejected,
    /// Stage 2 could not confirm the claimed identity.
    ConfirmationRejected {
        claimed: Identity,
        /// A different identity the confirmer recognised, if any.
        observed: Option<Identity>,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::ArtifactNotFound { artifact } => {
                write!(f, "artifact not found: {}", artifact.display())
            }
            Rejection::ResolutionRejected => f.write_str("no matching identity"),
            Rejection::ConfirmationRejected { claimed, observed: None } => {
                write!(f, "could not confirm {claimed}")
            }
            Rejection::ConfirmationRejected {
                claimed,
                observed: Some(other),
            } => write!(f, "could not confirm {claimed} (sample matched {other})"),
        }
    }
}

/// Outcome of Stage 1 or Stage 2.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verification {
    Accepted {
        identity: Identity,
        confidence: Confidence,
    },
    Rejected { reason: Rejection },
}

impl Verification {
    pub fn accepted(m: Match) -> Self {
        Verification::Accepted {
            identity: m.identity,
            confidence: m.confidence,
        }
    }

    pub fn rejected(reason: Rejection) -> Self {
        Verification::Rejected { reason }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verification::Accepted { .. })
    }
}

/// Stage 3 output for an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub category: String,
    pub confidence: Confidence,
    /// Profile facts shown next to the recommendation, in display order.
    pub details: IndexMap<String, String>,
}

/// Stage 3 never gates authentication; both variants end the sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageThreeOutcome {
    Recommended(Recommendation),
    Unavailable { reason: String },
}

/// Final result of a full three-stage run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SequenceResult {
    Stage1Failed {
        reason: Rejection,
    },
    Stage2Failed {
        claimed: Identity,
        face_confidence: Confidence,
        reason: Rejection,
    },
    Completed {
        identity: Identity,
        face_confidence: Confidence,
        /// Identity Stage 2 matched. Differs from `identity` only under a lenient policy.
        voice_identity: Identity,
        voice_confidence: Confidence,
        outcome: StageThreeOutcome,
    },
}

impl SequenceResult {
    pub fn is_completed(&self) -> bool {
        matches!(self, SequenceResult::Completed { .. })
    }

    /// 1-based tier at which the sequence stopped, if it was rejected.
    pub fn failed_tier(&self) -> Option<u8> {
        match self {
            SequenceResult::Stage1Failed { .. } => Some(1),
            SequenceResult::Stage2Failed { .. } => Some(2),
            SequenceResult::Completed { .. } => None,
        }
    }
}
