//! End-to-end provisioning against a stand-in keygen script

#![cfg(unix)]
#![allow(clippy::expect_used)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Accepts `--help`, writes `<path>` and `<path>.pub` for `-f <path>`, and
/// refuses to overwrite. Algorithms listed in `REJECT` exit 1.
const FAKE_KEYGEN: &str = r#"#!/bin/sh
case "$1" in
  --help|-V) exit 0 ;;
esac
alg=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    -t) alg="$2"; shift 2 ;;
    -b|-N) shift 2 ;;
    -f) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
for r in $REJECT; do
  [ "$r" = "$alg" ] && exit 1
done
[ -e "$out" ] && exit 1
printf 'PRIVATE KEY\n' > "$out"
printf 'ssh-%s AAAAfake krown@test\n' "$alg" > "$out.pub"
"#;

struct Env {
    home: TempDir,
    keygen: PathBuf,
}

impl Env {
    fn new() -> Self {
        let home = tempfile::tempdir().expect("tempdir");
        let bin = home.path().join("bin");
        std::fs::create_dir(&bin).expect("mkdir");
        let keygen = bin.join("fake-keygen");
        std::fs::write(&keygen, FAKE_KEYGEN).expect("write");
        std::fs::set_permissions(&keygen, std::fs::Permissions::from_mode(0o755)).expect("chmod");
        Self { home, keygen }
    }

    fn ssh(&self, name: &str) -> PathBuf {
        self.home.path().join(".ssh").join(name)
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("krown-auth"));
        cmd.env("NO_COLOR", "1")
            .env("HOME", self.home.path())
            .env("KROWN_AUTH_CONFIG", self.home.path().join("absent.yaml"))
            .env("KROWN_AUTH_KEYGEN", &self.keygen)
            .env_remove("REJECT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn prepare_json(&self, reject: &str) -> serde_json::Value {
        let output = self
            .cmd()
            .env("REJECT", reject)
            .arg("--json")
            .output()
            .expect("run");
        assert_eq!(output.status.code(), Some(0), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).expect("json")
    }
}

fn mode_of(path: &Path) -> u32 {
    std::fs::metadata(path).expect("metadata").permissions().mode() & 0o777
}

#[test]
fn test_prepare_fresh_home_creates_ed25519_pair() {
    let env = Env::new();
    let value = env.prepare_json("");

    assert_eq!(value["key_type"], "ed25519");
    assert_eq!(value["public_key"], "ssh-ed25519 AAAAfake krown@test");
    assert_eq!(
        value["public_key_path"].as_str(),
        Some(env.ssh("id_ed25519.pub").to_str().expect("utf-8"))
    );
    assert_eq!(mode_of(&env.home.path().join(".ssh")), 0o700);
    assert_eq!(mode_of(&env.ssh("id_ed25519")), 0o600);
    assert_eq!(mode_of(&env.ssh("id_ed25519.pub")), 0o644);
    assert!(!env.ssh("id_rsa").exists());
}

#[test]
fn test_prepare_is_idempotent() {
    let env = Env::new();
    let first = env.prepare_json("");
    let before = std::fs::read(env.ssh("id_ed25519")).expect("read");

    let second = env.prepare_json("");
    assert_eq!(first, second);
    assert_eq!(std::fs::read(env.ssh("id_ed25519")).expect("read"), before);
}

#[test]
fn test_prepare_falls_back_to_rsa_when_ed25519_is_rejected() {
    let env = Env::new();
    let value = env.prepare_json("ed25519");

    assert_eq!(value["key_type"], "rsa-4096");
    assert_eq!(value["public_key"], "ssh-rsa AAAAfake krown@test");
    assert!(env.ssh("id_rsa.pub").exists());
    assert!(!env.ssh("id_ed25519").exists());
}

#[test]
fn test_prepare_fails_when_every_algorithm_is_rejected() {
    let env = Env::new();
    let output = env
        .cmd()
        .env("REJECT", "ed25519 rsa")
        .arg("--json")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["code"], "key_gen");
}

#[test]
fn test_prepare_regenerates_empty_public_key() {
    let env = Env::new();
    env.prepare_json("");
    std::fs::write(env.ssh("id_ed25519.pub"), b"").expect("truncate");

    let value = env.prepare_json("");
    assert_eq!(value["key_type"], "ed25519");
    assert_eq!(value["public_key"], "ssh-ed25519 AAAAfake krown@test");
}

#[test]
fn test_prepare_repairs_loose_permissions() {
    let env = Env::new();
    env.prepare_json("");
    std::fs::set_permissions(env.home.path().join(".ssh"), std::fs::Permissions::from_mode(0o755))
        .expect("chmod");
    std::fs::set_permissions(env.ssh("id_ed25519"), std::fs::Permissions::from_mode(0o644))
        .expect("chmod");

    env.prepare_json("");
    assert_eq!(mode_of(&env.home.path().join(".ssh")), 0o700);
    assert_eq!(mode_of(&env.ssh("id_ed25519")), 0o600);
}

#[test]
fn test_prepare_human_output_shows_path_and_key() {
    let env = Env::new();
    env.cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Public key path:"))
        .stdout(predicate::str::contains("id_ed25519.pub"))
        .stdout(predicate::str::contains("Private key path:"))
        .stdout(predicate::str::contains("ssh-ed25519 AAAAfake krown@test"))
        .stdout(predicate::str::contains("ready for Krown"));
}

#[test]
fn test_prepare_quiet_prints_nothing_on_success() {
    let env = Env::new();
    env.cmd()
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_prepare_config_file_selects_keygen() {
    let env = Env::new();
    let config = env.home.path().join("config.yaml");
    std::fs::write(&config, format!("keygen: {}\n", env.keygen.display())).expect("write");

    env.cmd()
        .env_remove("KROWN_AUTH_KEYGEN")
        .env("KROWN_AUTH_CONFIG", &config)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"key_type\": \"ed25519\""));
}

#[test]
fn test_prepare_keeps_key_with_non_utf8_comment() {
    let env = Env::new();
    env.prepare_json("");
    let private_before = std::fs::read(env.ssh("id_ed25519")).expect("read");
    std::fs::write(env.ssh("id_ed25519.pub"), b"ssh-ed25519 AAAAfake ren\xe9@test\n")
        .expect("write");

    let value = env.prepare_json("");
    assert_eq!(value["key_type"], "ed25519");
    assert_eq!(value["public_key"], "ssh-ed25519 AAAAfake ren\u{fffd}@test");
    assert_eq!(std::fs::read(env.ssh("id_ed25519")).expect("read"), private_before);
}
