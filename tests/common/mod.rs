use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    tmp: TempDir,
    pub home: PathBuf,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            tmp,
            home,
            cargo_home,
            rustup_home,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("pase");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Run a command expected to fail; the `--json` error envelope still
    /// goes to stdout.
    pub fn run_json_err(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error envelope")
    }

    /// Store a signed-in session with an unverified fixture token.
    pub fn write_session(&self, exp: i64) {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(
            json!({"sub": 1, "name": "Ana Torres", "rol": "admin", "exp": exp})
                .to_string()
                .as_bytes(),
        );
        let token = format!("{header}.{payload}.fixture");

        let dir = self.home.join(".config/pase");
        fs::create_dir_all(&dir).expect("create config dir");
        fs::write(
            dir.join("session.json"),
            json!({"token": token, "server": "http://localhost:3000"}).to_string(),
        )
        .expect("write session fixture");
    }

    /// Write a key trace file and return its path.
    pub fn write_trace(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.tmp.path().join(name);
        fs::write(&path, contents).expect("write trace fixture");
        path
    }
}

/// Exp far enough in the future for any test run.
pub const FAR_FUTURE: i64 = 4102444800;
