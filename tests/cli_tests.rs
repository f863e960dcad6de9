//! Command-line tests driving the `romcheck` binary on small fixtures.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ABC_CRC: &str = "352441c2";
const ABC_SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
const HELLO_CRC: &str = "3610a686";

fn romcheck() -> Command {
    Command::cargo_bin("romcheck").unwrap()
}

fn write_catalog(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("catalog.json");
    let json = format!(
        r#"{{
  "version": "1.0.0",
  "games": [
    {{ "name": "good", "description": "Everything present",
       "roms": [ {{ "name": "a.bin", "size": 3, "crc": "{ABC_CRC}" }} ] }},
    {{ "name": "demo", "description": "Renamed file",
       "roms": [
         {{ "name": "a.bin", "size": 3, "crc": "{ABC_CRC}" }},
         {{ "name": "b.bin", "size": 5, "crc": "{HELLO_CRC}" }}
       ] }},
    {{ "name": "absent",
       "roms": [ {{ "name": "x.bin", "size": 3, "crc": "{ABC_CRC}" }} ] }}
  ]
}}"#
    );
    fs::write(&path, json).unwrap();
    path
}

fn write_roms(dir: &Path) -> std::path::PathBuf {
    let roms = dir.join("roms");
    fs::create_dir_all(roms.join("good")).unwrap();
    fs::create_dir_all(roms.join("demo")).unwrap();
    fs::write(roms.join("good/a.bin"), b"abc").unwrap();
    fs::write(roms.join("demo/a.bin"), b"abc").unwrap();
    fs::write(roms.join("demo/wrong.bin"), b"hello").unwrap();
    roms
}

#[test]
fn test_hash_prints_all_digests() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("abc.bin");
    fs::write(&file, b"abc").unwrap();

    romcheck()
        .arg("hash")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("size 3"))
        .stdout(predicate::str::contains(format!("crc32={ABC_CRC}")))
        .stdout(predicate::str::contains(format!("sha1={ABC_SHA1}")));
}

#[test]
fn test_hash_only_requested_kind() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("abc.bin");
    fs::write(&file, b"abc").unwrap();

    romcheck()
        .args(["hash", "--crc"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(ABC_CRC))
        .stdout(predicate::str::contains("md5=").not());
}

#[test]
fn test_hash_skips_header() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("headered.bin");
    fs::write(&file, b"XXXXabc").unwrap();

    romcheck()
        .args(["hash", "--crc", "--skip-header", "4"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("size 3 crc32={ABC_CRC}")));
}

#[test]
fn test_hash_json_output() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("abc.bin");
    fs::write(&file, b"abc").unwrap();

    let output = romcheck()
        .args(["--format", "json", "hash", "--sha1"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["size"], 3);
    assert_eq!(value[0]["sha1"], ABC_SHA1);
    assert!(value[0].get("crc").is_none());
}

#[test]
fn test_hash_missing_file_fails() {
    romcheck()
        .args(["hash", "/nonexistent/file.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_catalog_list_and_filter() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    romcheck()
        .args(["catalog", "list", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 games"))
        .stdout(predicate::str::contains("Renamed file"));

    romcheck()
        .args(["catalog", "list", "--filter", "DEM", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 games"))
        .stdout(predicate::str::contains("good").not());
}

#[test]
fn test_catalog_show() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    romcheck()
        .args(["catalog", "show", "demo", "--catalog"])
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("b.bin"))
        .stdout(predicate::str::contains(HELLO_CRC));

    romcheck()
        .args(["catalog", "show", "nope", "--catalog"])
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Game 'nope' not found"));
}

#[test]
fn test_check_reports_each_game() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let roms = write_roms(dir.path());

    romcheck()
        .arg("check")
        .arg("--catalog")
        .arg(&catalog)
        .arg("--roms")
        .arg(&roms)
        .assert()
        .success()
        .stdout(predicate::str::contains("game good: correct"))
        .stdout(predicate::str::contains("In game demo:"))
        .stdout(predicate::str::contains("wrong name (wrong.bin)"))
        .stdout(predicate::str::contains("game absent: not a single rom found"));
}

#[test]
fn test_check_only_problems_json() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let roms = write_roms(dir.path());

    let output = romcheck()
        .args(["check", "--only-problems", "--format", "json", "--catalog"])
        .arg(&catalog)
        .arg("--roms")
        .arg(&roms)
        .arg("good")
        .arg("demo")
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["game"], "demo");
}

#[test]
fn test_check_unknown_game_fails() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());

    romcheck()
        .args(["check", "--roms", "roms", "--catalog"])
        .arg(&catalog)
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in catalog"));
}

#[test]
fn test_history_record_then_lookup() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("seen.db");
    let pacman = dir.path().join("pacman");
    fs::create_dir_all(&pacman).unwrap();
    fs::write(pacman.join("pacman.6e"), b"abc").unwrap();

    romcheck()
        .args(["history", "record", "--history"])
        .arg(&history)
        .arg(&pacman)
        .assert()
        .success();

    romcheck()
        .args(["history", "lookup", ABC_CRC, "--history"])
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("pacman/pacman.6e (size 3)"));

    romcheck()
        .args(["history", "lookup", HELLO_CRC, "--history"])
        .arg(&history)
        .assert()
        .success()
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn test_check_uses_history_for_missing_rom() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let roms = write_roms(dir.path());
    let history = dir.path().join("seen.db");

    romcheck()
        .args(["history", "record", "--history"])
        .arg(&history)
        .arg(roms.join("good"))
        .assert()
        .success();

    romcheck()
        .args(["check", "--catalog"])
        .arg(&catalog)
        .arg("--roms")
        .arg(&roms)
        .arg("--history")
        .arg(&history)
        .arg("absent")
        .assert()
        .success()
        .stdout(predicate::str::contains("in 'good' as 'a.bin'"));
}

#[test]
fn test_history_rejects_bad_game_name() {
    let dir = TempDir::new().unwrap();
    let roms = write_roms(dir.path());

    romcheck()
        .args(["history", "record", "--game", "../escape", "--history"])
        .arg(dir.path().join("seen.db"))
        .arg(roms.join("good"))
        .assert()
        .failure();
}

#[test]
fn test_hash_identifies_catalog_roms() {
    let dir = TempDir::new().unwrap();
    let catalog = write_catalog(dir.path());
    let file = dir.path().join("dump.bin");
    fs::write(&file, b"hello").unwrap();
    let other = dir.path().join("other.bin");
    fs::write(&other, b"xyz").unwrap();

    romcheck()
        .args(["hash", "--catalog"])
        .arg(&catalog)
        .arg(&file)
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("= demo/b.bin"))
        .stdout(predicate::str::contains("not in catalog"));
}

#[test]
fn test_hash_undoes_byte_swap() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("plain.bin");
    let swapped = dir.path().join("swapped.bin");
    fs::write(&plain, b"abcd").unwrap();
    fs::write(&swapped, b"badc").unwrap();

    let digests = |args: &[&str], file: &Path| -> serde_json::Value {
        let output = romcheck()
            .args(["--format", "json", "hash", "--crc"])
            .args(args)
            .arg(file)
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        value[0]["crc"].clone()
    };

    let expected = digests(&[], &plain);
    assert_eq!(digests(&["--swap", "byte"], &swapped), expected);
    assert_ne!(digests(&[], &swapped), expected);
}
