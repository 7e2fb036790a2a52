use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn touch(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"sample").unwrap();
        path
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("trident").unwrap();
        cmd.env_clear()
            .env("TRIDENT_MODEL_DIR", self.root().join("models"))
            .env("TRIDENT_DATA_DIR", self.root().join("data"))
            .env("TRIDENT_MOCK_SEED", "7");
        cmd
    }
}

#[test]
fn run_completes_for_known_user() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/mitali_01.jpg");
    let voice = ws.touch("data/audio/mitali_hello.wav");

    ws.cmd()
        .arg("run")
        .arg("--face")
        .arg(&face)
        .arg("--voice")
        .arg(&voice)
        .assert()
        .success()
        .stdout(contains("Face recognized: Mitali"))
        .stdout(contains("RECOMMENDATION GENERATED"))
        .stdout(contains("AUTHENTICATION COMPLETE"))
        .stdout(contains("Welcome, Mitali!"));
}

#[test]
fn run_missing_face_fails_at_tier1() {
    let ws = Workspace::new();
    let voice = ws.touch("data/audio/mitali.wav");

    ws.cmd()
        .args(["run", "--face"])
        .arg(ws.root().join("nope.jpg"))
        .arg("--voice")
        .arg(&voice)
        .assert()
        .code(1)
        .stdout(contains("Error: image not found"))
        .stdout(contains("Authentication failed at Tier 1"))
        .stdout(contains("TIER 2").not());
}

#[test]
fn run_voice_of_other_user_fails_at_tier2() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/liliane.png");
    let voice = ws.touch("data/audio/mwai.wav");

    ws.cmd()
        .arg("run")
        .arg("--face")
        .arg(&face)
        .arg("--voice")
        .arg(&voice)
        .assert()
        .code(1)
        .stdout(contains("Voice verification failed"))
        .stdout(contains("Authentication failed at Tier 2"))
        .stdout(contains("TIER 3").not());
}

#[test]
fn lenient_policy_accepts_other_known_voice() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/liliane.png");
    let voice = ws.touch("data/audio/mwai.wav");

    ws.cmd()
        .env("TRIDENT_STRICT_CONFIRMATION", "0")
        .arg("run")
        .arg("--face")
        .arg(&face)
        .arg("--voice")
        .arg(&voice)
        .assert()
        .success()
        .stdout(contains("Face recognized: Liliane"))
        .stdout(contains("Voice verified: Mwai"))
        .stdout(contains("Welcome, Liliane!"));
}

#[test]
fn run_json_is_parseable() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/mwai.jpg");
    let voice = ws.touch("data/audio/mwai.flac");

    let output = ws
        .cmd()
        .arg("--json")
        .arg("run")
        .arg("--face")
        .arg(&face)
        .arg("--voice")
        .arg(&voice)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(value["data"]["result"], "completed");
    assert_eq!(value["data"]["identity"], "Mwai");
    assert_eq!(value["data"]["outcome"]["status"], "recommended");
}

#[test]
fn seeded_runs_are_reproducible() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/blessing.jpg");
    let voice = ws.touch("data/audio/blessing.wav");

    let run = || {
        ws.cmd()
            .arg("--json")
            .arg("run")
            .arg("--face")
            .arg(&face)
            .arg("--voice")
            .arg(&voice)
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn face_command_rejects_unknown() {
    let ws = Workspace::new();
    let face = ws.touch("data/images/stranger.jpg");

    ws.cmd()
        .arg("face")
        .arg(&face)
        .assert()
        .code(1)
        .stdout(contains("Face not recognized"))
        .stdout(contains("ACCESS DENIED"));
}

#[test]
fn voice_command_checks_claim() {
    let ws = Workspace::new();
    let voice = ws.touch("data/audio/blessing_take2.m4a");

    ws.cmd()
        .arg("voice")
        .arg(&voice)
        .args(["--claim", "Blessing"])
        .assert()
        .success()
        .stdout(contains("Voice verified: Blessing"));
}

#[test]
fn simulate_unauthorized_is_blocked() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("simulate-unauthorized")
        .assert()
        .success()
        .stdout(contains("ACCESS DENIED AT TIER 1"))
        .stdout(contains("UNAUTHORIZED ACCESS BLOCKED"));
}

#[test]
fn info_reports_model_status() {
    let ws = Workspace::new();
    ws.touch("models/face_recognition_model.pkl");

    let output = ws.cmd().args(["--json", "info"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let models = value["data"]["models"].as_array().unwrap();
    assert_eq!(models.len(), 3);
    assert_eq!(models[0]["tier"], "face");
    assert_eq!(models[0]["present"], true);
    assert_eq!(models[1]["present"], false);
    assert_eq!(value["data"]["backend"], "mock");
}

#[test]
fn artifacts_lists_samples() {
    let ws = Workspace::new();
    ws.touch("data/images/mitali.jpg");
    ws.touch("data/audio/mitali.wav");
    ws.touch("data/audio/readme.txt");

    ws.cmd()
        .arg("artifacts")
        .assert()
        .success()
        .stdout(contains("mitali.jpg"))
        .stdout(contains("mitali.wav"))
        .stdout(contains("readme.txt").not());
}

#[test]
fn trained_backend_fails_fast() {
    let ws = Workspace::new();
    ws.cmd()
        .env("TRIDENT_BACKEND", "trained")
        .arg("info")
        .assert()
        .failure()
        .stderr(contains("no inference backend"));
}

#[test]
fn menu_exits_on_choice_four() {
    let ws = Workspace::new();
    ws.cmd()
        .write_stdin("4\n")
        .assert()
        .success()
        .stdout(contains("Main Menu:"))
        .stdout(contains("Goodbye!"));
}
