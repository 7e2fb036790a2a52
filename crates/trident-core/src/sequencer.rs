//! Tiered verification sequencer.
//!
//! Runs face resolution, voice confirmation and recommendation in strict
//! order, stopping at the first rejection. Expected rejections come back as
//! values; only backend faults and contract violations are `Err`.

use crate::backend::{BackendError, Backends};
use crate::session::{AuthenticatedUser, Session};
use crate::state::{SequenceState, StageEvent};
use crate::types::{
    Identity, Match, Rejection, SequenceResult, StageThreeOutcome, Verification,
};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("{0} is not the authenticated user")]
    NotAuthenticated(Identity),
    #[error("illegal transition from {from} on {event:?}")]
    IllegalTransition {
        from: SequenceState,
        event: StageEvent,
    },
}

/// How Stage 2 treats a confirmer that recognises someone other than the claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationPolicy {
    /// Only a confirmation of the claimed identity passes.
    #[default]
    Strict,
    /// Any identity the confirmer accepts passes. The session still holds the claim.
    Lenient,
}

pub struct Sequencer {
    backends: Backends,
    policy: ConfirmationPolicy,
    session: Session,
    state: SequenceState,
    /// Identity accepted by the most recent Stage 1, awaiting Stage 2.
    pending_claim: Option<Identity>,
    attempt: Uuid,
}

impl Sequencer {
    pub fn new(backends: Backends, policy: ConfirmationPolicy) -> Self {
        Self {
            backends,
            policy,
            session: Session::new(),
            state: SequenceState::Idle,
            pending_claim: None,
            attempt: Uuid::new_v4(),
        }
    }

    pub fn policy(&self) -> ConfirmationPolicy {
        self.policy
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Explicitly end the current authentication, if any.
    pub fn logout(&mut self) -> Option<AuthenticatedUser> {
        let user = self.session.clear();
        if let Some(u) = &user {
            tracing::info!(identity = %u.identity, attempt = %u.attempt, "logged out");
        }
        self.pending_claim = None;
        self.state = SequenceState::Idle;
        user
    }

    /// Stage 1: resolve `artifact` to a claimed identity.
    ///
    /// Starts a new attempt, which ends any previous authentication.
    pub fn run_stage1(&mut self, artifact: &Path) -> Result<Verification, SequenceError> {
        self.attempt = Uuid::new_v4();
        self.state = SequenceState::Idle;
        self.pending_claim = None;
        if let Some(prev) = self.session.clear() {
            tracing::debug!(identity = %prev.identity, "new stage 1 attempt cleared session");
        }

        if !self.backends.probe.exists(artifact) {
            tracing::warn!(stage = 1, artifact = %artifact.display(), "artifact not found");
            self.transition(StageEvent::Stage1Rejected)?;
            return Ok(Verification::rejected(Rejection::ArtifactNotFound {
                artifact: artifact.to_path_buf(),
            }));
        }

        let resolved = match self.backends.resolver.resolve(artifact) {
            Ok(r) => r,
            Err(e) => return Err(self.abort(e)),
        };

        match resolved {
            Some(m) => {
                tracing::info!(
                    stage = 1,
                    identity = %m.identity,
                    confidence = m.confidence.value(),
                    "identity resolved"
                );
                self.transition(StageEvent::Stage1Accepted)?;
                self.pending_claim = Some(m.identity.clone());
                Ok(Verification::accepted(m))
            }
            None => {
                tracing::info!(stage = 1, "no matching identity");
                self.transition(StageEvent::Stage1Rejected)?;
                Ok(Verification::rejected(Rejection::ResolutionRejected))
            }
        }
    }

    /// Stage 2: confirm `artifact` against `claimed`.
    ///
    /// Only a call that follows an accepted Stage 1 for the same claim can
    /// authenticate. Any other call is a standalone check: an acceptance
    /// changes nothing, a rejection or fault still ends the attempt.
    pub fn run_stage2(
        &mut self,
        artifact: &Path,
        claimed: &Identity,
    ) -> Result<Verification, SequenceError> {
        let in_sequence = self.state == SequenceState::Stage1Passed
            && self.pending_claim.as_ref() == Some(claimed);

        let verification = if !self.backends.probe.exists(artifact) {
            tracing::warn!(stage = 2, artifact = %artifact.display(), "artifact not found");
            Verification::rejected(Rejection::ArtifactNotFound {
                artifact: artifact.to_path_buf(),
            })
        } else {
            match self.backends.confirmer.confirm(artifact, claimed) {
                Ok(confirmed) => self.judge_confirmation(claimed, confirmed),
                Err(e) => return Err(self.abort(e)),
            }
        };

        if !in_sequence {
            tracing::debug!(stage = 2, claimed = %claimed, "standalone confirmation");
            if !verification.is_accepted() {
                self.end_attempt();
            }
            return Ok(verification);
        }

        self.pending_claim = None;
        if verification.is_accepted() {
            self.transition(StageEvent::Stage2Accepted)?;
            let user = self.session.authenticate(claimed.clone(), self.attempt);
            tracing::info!(identity = %user.identity, attempt = %user.attempt, "authenticated");
        } else {
            self.transition(StageEvent::Stage2Rejected)?;
            self.session.clear();
        }
        Ok(verification)
    }

    /// Stage 3: produce a recommendation for the authenticated `identity`.
    ///
    /// Refuses any identity the session does not currently hold, and runs at
    /// most once per authentication.
    pub fn run_stage3(&mut self, identity: &Identity) -> Result<StageThreeOutcome, SequenceError> {
        if !self.session.holds(identity) {
            return Err(SequenceError::NotAuthenticated(identity.clone()));
        }
        self.transition(StageEvent::Stage3Finished)?;

        let outcome = match self.backends.recommender.recommend(identity) {
            Ok(Some(rec)) => {
                tracing::info!(
                    stage = 3,
                    identity = %identity,
                    category = %rec.category,
                    confidence = rec.confidence.value(),
                    "recommendation generated"
                );
                StageThreeOutcome::Recommended(rec)
            }
            Ok(None) => StageThreeOutcome::Unavailable {
                reason: "no recommendation for this profile".to_string(),
            },
            // Stage 3 faults are reported, never escalated.
            Err(e) => {
                tracing::warn!(stage = 3, error = %e, "recommendation failed");
                StageThreeOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        Ok(outcome)
    }

    /// Run all three stages, stopping at the first rejection.
    pub fn run_full_sequence(
        &mut self,
        face: &Path,
        voice: &Path,
    ) -> Result<SequenceResult, SequenceError> {
        let span = tracing::info_span!(
            "sequence",
            attempt = tracing::field::Empty,
            face = %face.display(),
            voice = %voice.display()
        );
        let _guard = span.enter();

        let stage1 = self.run_stage1(face)?;
        span.record("attempt", tracing::field::display(self.attempt));

        let (claimed, face_confidence) = match stage1 {
            Verification::Accepted {
                identity,
                confidence,
            } => (identity, confidence),
            Verification::Rejected { reason } => {
                tracing::info!(tier = 1, reason = %reason, "authentication failed");
                return Ok(SequenceResult::Stage1Failed { reason });
            }
        };

        let (voice_identity, voice_confidence) = match self.run_stage2(voice, &claimed)? {
            Verification::Accepted {
                identity,
                confidence,
            } => (identity, confidence),
            Verification::Rejected { reason } => {
                tracing::info!(tier = 2, reason = %reason, "authentication failed");
                return Ok(SequenceResult::Stage2Failed {
                    claimed,
                    face_confidence,
                    reason,
                });
            }
        };

        let outcome = self.run_stage3(&claimed)?;
        Ok(SequenceResult::Completed {
            identity: claimed,
            face_confidence,
            voice_identity,
            voice_confidence,
            outcome,
        })
    }

    fn judge_confirmation(
        &self,
        claimed: &Identity,
        confirmed: Option<Match>,
    ) -> Verification {
        match confirmed {
            None => Verification::rejected(Rejection::ConfirmationRejected {
                claimed: claimed.clone(),
                observed: None,
            }),
            Some(m) if m.identity.same_user(claimed) => Verification::Accepted {
                identity: claimed.clone(),
                confidence: m.confidence,
            },
            Some(m) => match self.policy {
                ConfirmationPolicy::Strict => {
                    tracing::warn!(
                        stage = 2,
                        claimed = %claimed,
                        observed = %m.identity,
                        "confirmation matched a different identity"
                    );
                    Verification::rejected(Rejection::ConfirmationRejected {
                        claimed: claimed.clone(),
                        observed: Some(m.identity),
                    })
                }
                ConfirmationPolicy::Lenient => {
                    tracing::warn!(
                        stage = 2,
                        claimed = %claimed,
                        observed = %m.identity,
                        "lenient policy accepting a different identity"
                    );
                    Verification::accepted(m)
                }
            },
        }
    }

    fn transition(&mut self, event: StageEvent) -> Result<(), SequenceError> {
        let next = self
            .state
            .next(event)
            .ok_or(SequenceError::IllegalTransition {
                from: self.state,
                event,
            })?;
        tracing::trace!(from = %self.state, to = %next, "state transition");
        self.state = next;
        Ok(())
    }

    /// Backend faults end the attempt: nothing stays authenticated.
    fn abort(&mut self, err: BackendError) -> SequenceError {
        tracing::error!(error = %err, "backend failure; sequence aborted");
        self.end_attempt();
        err.into()
    }

    fn end_attempt(&mut self) {
        if let Some(prev) = self.session.clear() {
            tracing::info!(identity = %prev.identity, "session cleared by failed stage");
        }
        self.pending_claim = None;
        self.state = SequenceState::Terminated;
    }
}
