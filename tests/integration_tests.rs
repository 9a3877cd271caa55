//! Integration tests for the bomq CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a bomq command isolated from the caller's environment
fn bomq() -> Command {
    let mut cmd = Command::cargo_bin("bomq").unwrap();
    cmd.env_remove("BOMQ_LABOR_RATE")
        .env_remove("BOMQ_CURRENCY")
        .env_remove("BOMQ_CUSTOMER")
        .env_remove("RUST_LOG");
    cmd
}

/// Project seeded with the default catalog
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    bomq().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Empty project with C1 (2.00), C2 (0.50) and A1 = [C1 x1, C2 x2]
fn setup_small_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    bomq()
        .current_dir(tmp.path())
        .args(["init", "--empty"])
        .assert()
        .success();

    assert_eq!(create_component(tmp.path(), "C1", "2.00"), "1");
    assert_eq!(create_component(tmp.path(), "C2", "0.50"), "2");

    bomq()
        .current_dir(tmp.path())
        .args(["-q", "asm", "new", "--name", "A1", "--line", "1=1", "--line", "2=2"])
        .assert()
        .success()
        .stdout("1\n");
    tmp
}

fn create_component(dir: &Path, name: &str, price: &str) -> String {
    let output = bomq()
        .current_dir(dir)
        .args(["-q", "cmp", "new", "--name", name, "--price", price])
        .output()
        .unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stdout_lines(dir: &Path, args: &[&str]) -> Vec<String> {
    let output = bomq().current_dir(dir).args(args).output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect()
}

// ============================================================================
// Init / Reset
// ============================================================================

#[test]
fn test_init_creates_project() {
    let tmp = TempDir::new().unwrap();

    bomq()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized bomq project"));

    assert!(tmp.path().join(".bomq").is_dir());
    assert!(tmp.path().join(".bomq/config.yaml").is_file());
    assert!(tmp.path().join(".bomq/catalog.db").is_file());
    assert!(tmp.path().join(".bomq/selections").is_dir());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();

    bomq()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_seeds_default_catalog() {
    let tmp = setup_test_project();

    assert_eq!(stdout_lines(tmp.path(), &["cmp", "list", "-f", "id"]).len(), 41);
    assert_eq!(stdout_lines(tmp.path(), &["asm", "list", "-f", "id"]).len(), 11);
}

#[test]
fn test_init_empty_has_no_catalog() {
    let tmp = TempDir::new().unwrap();
    bomq()
        .current_dir(tmp.path())
        .args(["init", "--empty"])
        .assert()
        .success();

    assert!(stdout_lines(tmp.path(), &["cmp", "list", "-f", "id"]).is_empty());
}

#[test]
fn test_command_outside_project_fails() {
    let tmp = TempDir::new().unwrap();

    bomq()
        .current_dir(tmp.path())
        .args(["cmp", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a bomq project"));
}

#[test]
fn test_reset_requires_confirmation() {
    let tmp = setup_test_project();

    bomq()
        .current_dir(tmp.path())
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_reset_restores_default_catalog() {
    let tmp = setup_test_project();
    create_component(tmp.path(), "Extra part", "1.25");
    assert_eq!(stdout_lines(tmp.path(), &["cmp", "list", "-f", "id"]).len(), 42);

    bomq()
        .current_dir(tmp.path())
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog reset"));

    let ids = stdout_lines(tmp.path(), &["cmp", "list", "-f", "id"]);
    assert_eq!(ids.len(), 41);
    assert_eq!(ids[0], "1");
}

// ============================================================================
// Components and assemblies
// ============================================================================

#[test]
fn test_cmp_new_and_list() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["cmp", "list", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id,name,unit_price"))
        .stdout(predicate::str::contains("1,C1,2\n"))
        .stdout(predicate::str::contains("2,C2,0.5\n"));
}

#[test]
fn test_cmp_new_rejects_negative_price() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["cmp", "new", "--name", "Bad", "--price", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unit_price"));

    assert_eq!(stdout_lines(tmp.path(), &["cmp", "list", "-f", "id"]).len(), 2);
}

#[test]
fn test_cmp_show_lists_assemblies_using_it() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["cmp", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.50 KRW"))
        .stdout(predicate::str::contains("A1 (1)"));
}

#[test]
fn test_cmp_show_unknown_id() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["cmp", "show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("component 99 not found"));
}

#[test]
fn test_asm_show_prints_bom_and_unit_cost() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["asm", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C1 (1)"))
        .stdout(predicate::str::contains("C2 (2)"))
        .stdout(predicate::str::contains("3.00 KRW"));
}

#[test]
fn test_asm_new_with_unknown_component_is_rejected() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["asm", "new", "--name", "Broken", "--line", "1=1", "--line", "99=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("integrity"));

    assert_eq!(stdout_lines(tmp.path(), &["asm", "list", "-f", "id"]).len(), 1);
}

#[test]
fn test_asm_new_with_empty_bom() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["-q", "asm", "new", "--name", "Placeholder"])
        .assert()
        .success()
        .stdout("2\n");

    bomq()
        .current_dir(tmp.path())
        .args(["asm", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Empty bill of materials"));
}

// ============================================================================
// Quotations
// ============================================================================

#[test]
fn test_quote_worked_example_csv() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args([
            "quote", "build", "--pick", "1=3", "--headcount", "2", "--labor-rate", "10", "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Quotation"))
        .stdout(predicate::str::contains("1,A1,3,ea,3.00 KRW,9.00 KRW,"))
        .stdout(predicate::str::contains("2,Labor,2,person,10.00 KRW,20.00 KRW,"))
        .stdout(predicate::str::contains("1,C1,3,ea,2.00 KRW,6.00 KRW"))
        .stdout(predicate::str::contains("2,C2,6,ea,0.50 KRW,3.00 KRW"))
        .stdout(predicate::str::contains("Material total,9.00 KRW"))
        .stdout(predicate::str::contains("Labor total,20.00 KRW"))
        .stdout(predicate::str::contains("Grand total,29.00 KRW"));
}

#[test]
fn test_quote_override_changes_detail_not_summary() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args([
            "quote",
            "build",
            "--pick",
            "1=3",
            "--override",
            "2=10",
            "--headcount",
            "2",
            "--labor-rate",
            "10",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,A1,3,ea,3.00 KRW,9.00 KRW,"))
        .stdout(predicate::str::contains("2,C2,10,ea,0.50 KRW,5.00 KRW"))
        .stdout(predicate::str::contains("Material total,11.00 KRW"))
        .stdout(predicate::str::contains("Grand total,31.00 KRW"));
}

#[test]
fn test_quote_drop_removes_component() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args([
            "quote", "build", "--pick", "1=3", "--drop", "2", "--labor-rate", "10", "-f", "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(",C2,").not())
        .stdout(predicate::str::contains("Material total,6.00 KRW"));
}

#[test]
fn test_quote_extra_line_and_excluded_extra() {
    let tmp = setup_small_catalog();
    assert_eq!(create_component(tmp.path(), "Cable", "1.50"), "3");

    bomq()
        .current_dir(tmp.path())
        .args([
            "quote",
            "build",
            "--extra",
            "3=2",
            "--exclude-extra",
            "1=5",
            "--labor-rate",
            "0",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,Cable,2,ea,1.50 KRW,3.00 KRW"))
        .stdout(predicate::str::contains(",C1,").not())
        .stdout(predicate::str::contains("Grand total,3.00 KRW"));
}

#[test]
fn test_quote_json_output() {
    let tmp = setup_small_catalog();

    let output = bomq()
        .current_dir(tmp.path())
        .args([
            "quote", "build", "--pick", "1=3", "--headcount", "2", "--labor-rate", "10", "-f",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let grand: rust_decimal::Decimal = json["grand_total"].as_str().unwrap().parse().unwrap();
    assert_eq!(grand, rust_decimal::Decimal::from(29));
    assert_eq!(json["component_lines"].as_array().unwrap().len(), 2);
    assert_eq!(json["assembly_lines"][0]["name"], "A1");
}

#[test]
fn test_quote_markdown_is_default() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1=1", "--customer", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Quotation"))
        .stdout(predicate::str::contains("**Customer:** Acme"))
        .stdout(predicate::str::contains("## Detail"));
}

#[test]
fn test_quote_output_file_uses_extension() {
    let tmp = setup_small_catalog();
    let out = tmp.path().join("quote.csv");

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1=1", "--labor-rate", "10", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Quotation written to"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("Grand total,3.00 KRW"));
}

#[test]
fn test_quote_from_selection_file() {
    let tmp = setup_small_catalog();
    fs::write(
        tmp.path().join(".bomq/selections/job.yaml"),
        "assembly_picks:\n  1: 3\noverrides:\n  2:\n    quantity: 10\nheadcount: 2\n",
    )
    .unwrap();

    bomq()
        .current_dir(tmp.path())
        .args([
            "quote",
            "build",
            "--selection",
            "job.yaml",
            "--labor-rate",
            "10",
            "-f",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grand total,31.00 KRW"));
}

#[test]
fn test_quote_selection_file_with_typo_fails() {
    let tmp = setup_small_catalog();
    let path = tmp.path().join("bad.yaml");
    fs::write(&path, "assembly_pick:\n  1: 3\n").unwrap();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--selection"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("assembly_pick"));
}

#[test]
fn test_quote_rejects_negative_headcount() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1=1", "--headcount=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("headcount"));
}

#[test]
fn test_quote_rejects_unknown_assembly() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "7=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown assembly 7"));
}

#[test]
fn test_quote_rejects_bad_pick_syntax() {
    let tmp = setup_small_catalog();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1:3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected ID=VALUE"));
}

#[test]
fn test_quote_labor_rate_from_project_config() {
    let tmp = setup_small_catalog();
    fs::write(
        tmp.path().join(".bomq/config.yaml"),
        "labor_rate: 5\ncurrency: USD\n",
    )
    .unwrap();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1=1", "--headcount", "2", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Labor total,10.00 USD"))
        .stdout(predicate::str::contains("Grand total,13.00 USD"));
}

#[test]
fn test_quote_default_catalog_builds() {
    let tmp = setup_test_project();

    bomq()
        .current_dir(tmp.path())
        .args(["quote", "build", "--pick", "1=2", "--pick", "3=1", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Grand total,"));
}

#[test]
fn test_quote_template_prints_yaml() {
    bomq()
        .args(["quote", "template"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assembly_picks:"))
        .stdout(predicate::str::contains("headcount:"));
}

#[test]
fn test_completions_bash() {
    bomq()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bomq"));
}
