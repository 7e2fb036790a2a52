//! Sequence state machine.
//!
//! ```text
//! Idle ──stage1 accept──▶ Stage1Passed ──stage2 accept──▶ Authenticated
//!   │                          │                               │
//!   └──stage1 reject──▶ Terminated ◀──stage2 reject──┘  stage3 done
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceState {
    Idle,
    Stage1Passed,
    Authenticated,
    Terminated,
}

/// Inputs that drive the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    Stage1Accepted,
    Stage1Rejected,
    Stage2Accepted,
    Stage2Rejected,
    /// Stage 3 finished, whatever it produced.
    Stage3Finished,
}

impl SequenceState {
    /// Apply `event`. Returns `None` if the transition is not allowed.
    pub fn next(self, event: StageEvent) -> Option<SequenceState> {
        use SequenceState::*;
        use StageEvent::*;

        match (self, event) {
            (Idle, Stage1Accepted) => Some(Stage1Passed),
            (Idle, Stage1Rejected) => Some(Terminated),
            (Stage1Passed, Stage2Accepted) => Some(Authenticated),
            (Stage1Passed, Stage2Rejected) => Some(Terminated),
            (Authenticated, Stage3Finished) => Some(Terminated),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == SequenceState::Terminated
    }
}

impl fmt::Display for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequenceState::Idle => "idle",
            SequenceState::Stage1Passed => "stage1-passed",
            SequenceState::Authenticated => "authenticated",
            SequenceState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
