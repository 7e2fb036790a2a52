//! Text and JSON rendering of stage results.

use crate::app::SystemInfo;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use trident_core::{Identity, Rejection, SequenceResult, StageThreeOutcome, Verification};

const RULE: &str = "======================================================================";

#[derive(Serialize)]
struct JsonOut<'a, T: Serialize> {
    ok: bool,
    data: &'a T,
}

pub fn json<T: Serialize>(out: &mut impl Write, data: &T) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&JsonOut { ok: true, data })?)?;
    Ok(())
}

pub fn banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "\n{RULE}\n{title}\n{RULE}")
}

fn display_name(artifact: &Path) -> String {
    artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| artifact.display().to_string())
}

pub fn stage1(out: &mut impl Write, artifact: &Path, verdict: &Verification) -> io::Result<()> {
    banner(out, "TIER 1: FACE RECOGNITION")?;
    if let Verification::Rejected {
        reason: Rejection::ArtifactNotFound { artifact },
    } = verdict
    {
        return writeln!(out, "Error: image not found at {}", artifact.display());
    }

    writeln!(out, "\nProcessing face image: {}", display_name(artifact))?;
    match verdict {
        Verification::Accepted {
            identity,
            confidence,
        } => {
            writeln!(out, "\nFace recognized: {identity}")?;
            writeln!(out, "Confidence: {confidence}")
        }
        Verification::Rejected { .. } => {
            writeln!(out, "\nFace not recognized")?;
            writeln!(out, "ACCESS DENIED")
        }
    }
}

pub fn stage2(out: &mut impl Write, artifact: &Path, verdict: &Verification) -> io::Result<()> {
    banner(out, "TIER 2: VOICE VERIFICATION")?;
    if let Verification::Rejected {
        reason: Rejection::ArtifactNotFound { artifact },
    } = verdict
    {
        return writeln!(out, "Error: audio file not found at {}", artifact.display());
    }

    writeln!(out, "\nProcessing voice recording: {}", display_name(artifact))?;
    match verdict {
        Verification::Accepted {
            identity,
            confidence,
        } => {
            writeln!(out, "\nVoice verified: {identity}")?;
            writeln!(out, "Confidence: {confidence}")
        }
        Verification::Rejected { reason } => {
            writeln!(out, "\nVoice verification failed")?;
            if let Rejection::ConfirmationRejected {
                observed: Some(other),
                ..
            } = reason
            {
                writeln!(out, "Recording matched {other}, not the recognised face")?;
            }
            writeln!(out, "ACCESS DENIED")
        }
    }
}

pub fn stage3(out: &mut impl Write, identity: &Identity, outcome: &StageThreeOutcome) -> io::Result<()> {
    banner(out, "TIER 3: PRODUCT RECOMMENDATION")?;
    writeln!(out, "\nGenerating personalized recommendations for {identity}...")?;
    match outcome {
        StageThreeOutcome::Recommended(rec) => {
            writeln!(out, "\nRECOMMENDATION GENERATED\n{RULE}")?;
            writeln!(out, "\nRecommended Product Category: {}", rec.category)?;
            writeln!(out, "Confidence: {}", rec.confidence)?;
            if !rec.details.is_empty() {
                writeln!(out, "\nBased on your profile:")?;
                for (label, value) in &rec.details {
                    writeln!(out, "  - {label}: {value}")?;
                }
            }
            Ok(())
        }
        StageThreeOutcome::Unavailable { reason } => {
            writeln!(out, "\nUnable to generate recommendation: {reason}")
        }
    }
}

pub fn failed(out: &mut impl Write, tier: u8) -> io::Result<()> {
    writeln!(out, "\nAuthentication failed at Tier {tier}")
}

pub fn complete(out: &mut impl Write, identity: &Identity) -> io::Result<()> {
    banner(out, "AUTHENTICATION COMPLETE")?;
    writeln!(out, "\nWelcome, {identity}!")
}

/// Render a full run from its final result.
pub fn sequence(
    out: &mut impl Write,
    face: &Path,
    voice: &Path,
    result: &SequenceResult,
) -> io::Result<()> {
    banner(out, "STARTING AUTHENTICATION SEQUENCE")?;
    match result {
        SequenceResult::Stage1Failed { reason } => {
            stage1(out, face, &Verification::rejected(reason.clone()))?;
            failed(out, 1)
        }
        SequenceResult::Stage2Failed {
            claimed,
            face_confidence,
            reason,
        } => {
            let face_verdict = Verification::Accepted {
                identity: claimed.clone(),
                confidence: *face_confidence,
            };
            stage1(out, face, &face_verdict)?;
            stage2(out, voice, &Verification::rejected(reason.clone()))?;
            failed(out, 2)
        }
        SequenceResult::Completed {
            identity,
            face_confidence,
            voice_identity,
            voice_confidence,
            outcome,
        } => {
            stage1(
                out,
                face,
                &Verification::Accepted {
                    identity: identity.clone(),
                    confidence: *face_confidence,
                },
            )?;
            stage2(
                out,
                voice,
                &Verification::Accepted {
                    identity: voice_identity.clone(),
                    confidence: *voice_confidence,
                },
            )?;
            stage3(out, identity, outcome)?;
            complete(out, identity)
        }
    }
}

/// Scripted walkthrough of an unknown person being stopped at Tier 1.
pub fn unauthorized(out: &mut impl Write) -> io::Result<()> {
    banner(out, "SIMULATING UNAUTHORIZED ACCESS ATTEMPT")?;
    writeln!(out, "\nScenario: Unknown person attempting to access the system")?;
    banner(out, "TIER 1: FACE RECOGNITION")?;
    writeln!(out, "\nProcessing unknown face image...")?;
    writeln!(out, "\nFace not in database")?;
    writeln!(out, "ACCESS DENIED AT TIER 1")?;
    banner(out, "UNAUTHORIZED ACCESS BLOCKED")
}

pub fn system_info(out: &mut impl Write, info: &SystemInfo) -> io::Result<()> {
    banner(out, "SYSTEM INFORMATION")?;
    writeln!(out, "\nVersion: {}", info.version)?;
    writeln!(out, "Backend: {}", info.backend)?;
    writeln!(out, "Confirmation policy: {:?}", info.policy)?;

    writeln!(out, "\nSystem Architecture:")?;
    for (n, model) in info.models.iter().enumerate() {
        writeln!(out, "  - Tier {}: {}", n + 1, model.label)?;
    }

    writeln!(out, "\nModel Status ({}):", info.model_dir.display())?;
    if !info.model_dir_exists {
        writeln!(out, "  - Model directory not found, using mock models")?;
    }
    for model in &info.models {
        let status = if model.present { "Found" } else { "Not Available" };
        writeln!(out, "  - {}: {status}", model.label)?;
    }

    writeln!(out, "\nData Sources:")?;
    writeln!(out, "  - Facial Images: {}", info.images_dir.display())?;
    writeln!(out, "  - Voice Recordings: {}", info.audio_dir.display())?;
    writeln!(out, "  - Customer Data: {}", info.customer_data.display())?;

    if let Some(user) = &info.authenticated {
        writeln!(out, "\nSigned in as: {user}")?;
    }
    Ok(())
}

pub fn artifacts(out: &mut impl Write, images: &[PathBuf], audio: &[PathBuf]) -> io::Result<()> {
    banner(out, "AVAILABLE SAMPLES")?;
    for (title, paths) in [("Face images", images), ("Voice recordings", audio)] {
        writeln!(out, "\n{title}:")?;
        if paths.is_empty() {
            writeln!(out, "  (none)")?;
        }
        for p in paths {
            writeln!(out, "  - {}", p.display())?;
        }
    }
    Ok(())
}

pub fn menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{RULE}\nTRIDENT MULTIMODAL AUTHENTICATION\n{RULE}")?;
    writeln!(out, "\nThree-Tier Security System:")?;
    writeln!(out, "  Tier 1: Facial Recognition")?;
    writeln!(out, "  Tier 2: Voice Verification")?;
    writeln!(out, "  Tier 3: Product Recommendation")?;
    writeln!(out, "\nMain Menu:")?;
    writeln!(out, "  1. Authorized User Authentication")?;
    writeln!(out, "  2. Simulate Unauthorized Attempt")?;
    writeln!(out, "  3. System Information")?;
    writeln!(out, "  4. Exit")
}
