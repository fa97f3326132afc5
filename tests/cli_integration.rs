//! CLI integration tests for gear
//!
//! These tests drive the binary from initialization through registering,
//! lending and returning items, ensuring commands work together correctly.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the gear binary
fn gear_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("gear"));
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory and initialize an inventory
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    gear_cmd().arg("init").arg(dir.path()).assert().success();
    dir
}

/// Run a command in the project and parse its JSON output
fn json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = gear_cmd()
        .current_dir(dir)
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(stdout.trim()).unwrap()
}

fn add_item(dir: &Path, model: &str, tag: &str) {
    gear_cmd()
        .current_dir(dir)
        .args(["item", "add", model, "--tag", tag])
        .assert()
        .success();
}

fn data_file(dir: &Path) -> String {
    fs::read_to_string(dir.join(".gear/inventory.csv")).unwrap()
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    gear_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized gear inventory"));

    assert!(dir.path().join(".gear").is_dir());
    assert!(dir.path().join(".gear/config.toml").is_file());
    assert!(dir.path().join(".gear/inventory.csv").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    gear_cmd().arg("init").arg(dir.path()).assert().success();
    gear_cmd().arg("init").arg(dir.path()).assert().success();
}

#[test]
fn test_commands_outside_project_fail() {
    let dir = TempDir::new().unwrap();

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a gear project"));
}

// =============================================================================
// Item Tests
// =============================================================================

#[test]
fn test_add_without_tag_generates_id() {
    let dir = setup_project();

    let item = json(dir.path(), &["item", "add", "Guitar"]);

    let tag = item["resource_tag"].as_str().unwrap();
    assert!(tag.starts_with("ID-"), "unexpected tag {}", tag);
    assert_eq!(tag.len(), 7);
    assert!(tag[3..].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(item["status"], "Tillgänglig");

    let list = json(dir.path(), &["item", "list"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn test_add_with_fields_is_persisted() {
    let dir = setup_project();

    gear_cmd()
        .current_dir(dir.path())
        .args([
            "item",
            "add",
            "Stratocaster",
            "--tag",
            "G1",
            "--manufacturer",
            "Fender",
            "--type",
            "Guitar",
            "--color",
            "Sunburst",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Stratocaster [G1]"));

    let content = data_file(dir.path());
    assert!(content.starts_with("Enhetsfoto,Modell,Tillverkare,Typ,Färg,Resurstagg"));
    assert!(content.contains(",Stratocaster,Fender,Guitar,Sunburst,G1,"));
}

#[test]
fn test_add_duplicate_tag_fails() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    let before = data_file(dir.path());

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "add", "Telecaster", "--tag", "G1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in use"));

    assert_eq!(data_file(dir.path()), before);
}

#[test]
fn test_show_unknown_item_fails() {
    let dir = setup_project();

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "show", "X9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item not found: X9"));
}

#[test]
fn test_loan_and_return() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    let loaned = json(
        dir.path(),
        &["item", "loan", "G1", "--holder", "Alice", "--date", "2024-01-10"],
    );
    assert_eq!(loaned["status"], "Utlånad");
    assert_eq!(loaned["current_holder"], "Alice");
    assert_eq!(loaned["loan_date"], "2024-01-10");

    let returned = json(dir.path(), &["item", "return", "G1"]);
    assert_eq!(returned["status"], "Tillgänglig");
    assert!(returned.get("current_holder").is_none());
    assert!(returned.get("loan_date").is_none());
}

#[test]
fn test_return_available_item_fails() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "return", "G1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot return G1"));
}

#[test]
fn test_loan_requires_holder_text() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "loan", "G1", "--holder", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("holder name is required"));
}

#[test]
fn test_edit_and_status_override() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    json(dir.path(), &["item", "loan", "G1", "--holder", "Alice"]);

    let edited = json(
        dir.path(),
        &["item", "edit", "G1", "--color", "Black", "--status", "service"],
    );
    assert_eq!(edited["color"], "Black");
    assert_eq!(edited["status"], "Service");
    assert!(edited.get("current_holder").is_none());

    let available = json(dir.path(), &["item", "available", "G1"]);
    assert_eq!(available["status"], "Tillgänglig");
}

#[test]
fn test_edit_without_changes_fails() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "edit", "G1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_delete_frees_tag() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "delete", "G1"])
        .assert()
        .success();

    add_item(dir.path(), "Telecaster", "G1");
    let item = json(dir.path(), &["item", "show", "G1"]);
    assert_eq!(item["model"], "Telecaster");
}

#[test]
fn test_piped_table_has_no_color_codes() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b").not())
        .stdout(predicate::str::is_match(r"(?m)^G1\s{9}available\s+Stratocaster").unwrap());

    gear_cmd()
        .current_dir(dir.path())
        .env("NO_COLOR", "1")
        .args(["item", "show", "G1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b").not());
}

#[test]
fn test_list_filters_by_status() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "SM58", "M1");
    json(dir.path(), &["item", "service", "M1"]);

    let list = json(dir.path(), &["item", "list", "--status", "service"]);
    let items = list.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["resource_tag"], "M1");
}

// =============================================================================
// Cart Tests
// =============================================================================

#[test]
fn test_cart_commit_loans_everything() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "Precision Bass", "G2");

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1", "G2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 item(s) in cart"));

    let result = json(
        dir.path(),
        &["cart", "commit", "--holder", "Alice", "--date", "2024-01-10"],
    );
    assert_eq!(result["loaned"], serde_json::json!(["G1", "G2"]));

    for tag in ["G1", "G2"] {
        let item = json(dir.path(), &["item", "show", tag]);
        assert_eq!(item["status"], "Utlånad");
        assert_eq!(item["current_holder"], "Alice");
        assert_eq!(item["loan_date"], "2024-01-10");
    }

    assert!(!dir.path().join(".gear/cart.json").exists());
    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cart is empty"));
}

#[test]
fn test_cart_rejects_unavailable_and_duplicates() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "SM58", "M1");
    json(dir.path(), &["item", "service", "M1"]);

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "M1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("M1 is not available"));

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1"])
        .assert()
        .success();

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already in the cart"));
}

#[test]
fn test_cart_conflict_changes_nothing() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "Precision Bass", "G2");

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1", "G2"])
        .assert()
        .success();

    json(dir.path(), &["item", "service", "G2"]);
    let before = data_file(dir.path());

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "commit", "--holder", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No longer available: G2"))
        .stderr(predicate::str::contains("Hint:"));

    assert_eq!(data_file(dir.path()), before);
    let cart = json(dir.path(), &["cart", "list"]);
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cart_commit_empty_fails() {
    let dir = setup_project();

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "commit", "--holder", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("The cart is empty"));
}

#[test]
fn test_cart_remove_and_clear() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "Precision Bass", "G2");
    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1", "G2"])
        .assert()
        .success();

    let removed = json(dir.path(), &["cart", "remove", "G1"]);
    assert_eq!(removed["removed"], true);
    assert_eq!(removed["staged"], 1);

    let missing = json(dir.path(), &["cart", "remove", "G1"]);
    assert_eq!(missing["removed"], false);

    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 item(s)"));
}

#[test]
fn test_deleting_staged_item_unstages_it() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    gear_cmd()
        .current_dir(dir.path())
        .args(["cart", "add", "G1"])
        .assert()
        .success();

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "delete", "G1"])
        .assert()
        .success();

    assert!(!dir.path().join(".gear/cart.json").exists());
}

// =============================================================================
// Query Tests
// =============================================================================

#[test]
fn test_search_is_case_insensitive() {
    let dir = setup_project();
    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "add", "Stratocaster", "--tag", "G1", "--manufacturer", "Fender"])
        .assert()
        .success();
    add_item(dir.path(), "SM58", "M1");

    let found = json(dir.path(), &["search", "fender"]);
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["resource_tag"], "G1");

    let all = json(dir.path(), &["search"]);
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[test]
fn test_status_overview() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    add_item(dir.path(), "SM58", "M1");
    json(dir.path(), &["item", "loan", "G1", "--holder", "Alice"]);

    let status = json(dir.path(), &["status"]);
    assert_eq!(status["total"], 2);
    assert_eq!(status["counts"]["loaned"], 1);
    assert_eq!(status["counts"]["available"], 1);
    assert_eq!(status["loans"]["Alice"], serde_json::json!(["G1"]));
}

#[test]
fn test_export_writes_dated_backup() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");
    let backups = dir.path().join("out");

    let result = json(
        dir.path(),
        &["export", "--dir", backups.to_str().unwrap()],
    );

    let path = result["path"].as_str().unwrap();
    let name = Path::new(path).file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("inventarie_backup_"));
    assert!(name.ends_with(".csv"));
    assert_eq!(fs::read_to_string(path).unwrap(), data_file(dir.path()));
}

#[test]
fn test_export_to_stdout() {
    let dir = setup_project();
    add_item(dir.path(), "Stratocaster", "G1");

    gear_cmd()
        .current_dir(dir.path())
        .args(["export", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resurstagg"))
        .stdout(predicate::str::contains("G1"));
}

#[test]
fn test_corrupt_data_file_reports_storage_error() {
    let dir = setup_project();
    fs::write(
        dir.path().join(".gear/inventory.csv"),
        "Resurstagg,Modell,Status\nG1,Stratocaster,Utlånad\n",
    )
    .unwrap();

    gear_cmd()
        .current_dir(dir.path())
        .args(["item", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Storage error"))
        .stderr(predicate::str::contains("invalid rows"))
        .stderr(predicate::str::contains("try again").not());
}
