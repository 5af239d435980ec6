//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn divider_cli() -> Command {
    cargo_bin_cmd!("divider-calc")
}

/// Writes an INI file holding `values` in the [Resistors] section.
fn drawer(values: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[Resistors]\nvalues = {}", values).unwrap();
    file
}

#[test]
fn test_cli_help() {
    divider_cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-current"));
}

#[test]
fn test_cli_best_pair_from_config() {
    let config = drawer("470, 0.220, 1, 2.2, 5.6");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "5", "--vout", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("R1: 1K\nR2: 2K2"))
        .stdout(predicate::str::contains("Actual output voltage: 3.438 V"))
        .stdout(predicate::str::contains("=== Suggested Resistors for Exact Output ==="))
        .stdout(predicate::str::contains("Vout: 2.500 V (R1: 220R, R2: 220R"))
        .stdout(predicate::str::contains("Warning: Input voltage exceeds"))
        .stderr(predicate::str::contains("exceeds").not());
}

#[test]
fn test_cli_no_warning_at_adc_voltage() {
    let config = drawer("1, 2.2");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "3.3", "--vout", "1.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning").not());
}

#[test]
fn test_cli_series_with_buy_hint() {
    divider_cli()
        .args(["--series", "e3", "--buy-series", "e24"])
        .args(["--vin", "3.3", "--vout", "1.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nearest standard"))
        .stdout(predicate::str::contains("more combinations."));
}

#[test]
fn test_cli_rejects_vout_above_vin() {
    let config = drawer("1, 2.2");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "3", "--vout", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Desired output voltage must be between"));
}

#[test]
fn test_cli_current_limit_too_low() {
    let config = drawer("1, 2.2");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "5", "--vout", "2", "--max-current", "0.01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("current limit"));
}

#[test]
fn test_cli_missing_section() {
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[Capacitors]\nvalues = 1").unwrap();

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "5", "--vout", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no [Resistors] section"));
}

#[test]
fn test_cli_empty_resistor_list() {
    let config = drawer("");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "5", "--vout", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No resistors available"));
}

#[test]
fn test_cli_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();

    divider_cli()
        .arg("--config")
        .arg(dir.path().join("resistors.ini"))
        .args(["--vin", "5", "--vout", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_cli_interactive_reprompt() {
    let config = drawer("1, 1.5");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .write_stdin("five\n5\n6\n\n5\n3\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a valid number."))
        .stdout(predicate::str::contains("Desired output voltage must be between"))
        .stdout(predicate::str::contains("R2 also in stock"));
}

#[test]
fn test_cli_interactive_closed_input() {
    let config = drawer("1, 1.5");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .write_stdin("5\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input closed"));
}

#[test]
fn test_cli_zero_output() {
    let config = drawer("1, 2.2");

    divider_cli()
        .arg("--config")
        .arg(config.path())
        .args(["--vin", "3", "--vout", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No achievable voltages at or below 0 V"));
}
