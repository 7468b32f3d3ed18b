use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fintrack(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_DATA_DIR", data_dir.path())
        .env_remove("FINTRACK_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn seed(data_dir: &TempDir) {
    fintrack(data_dir)
        .args(["income", "add", "Job", "50000", "--date", "2024-01-05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added income: Job"));
    fintrack(data_dir)
        .args(["expense", "add", "Rent", "12000", "--date", "2024-01-10"])
        .assert()
        .success();
    fintrack(data_dir)
        .args(["expense", "add", "Food", "500", "--date", "2024-02-03"])
        .assert()
        .success();
}

#[test]
fn test_add_and_list() {
    let data_dir = TempDir::new().unwrap();
    seed(&data_dir);

    fintrack(&data_dir)
        .args(["income", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Job"))
        .stdout(predicate::str::contains("50000.00"));

    fintrack(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Food"));

    assert!(data_dir.path().join("data/fintrack-guest.json").exists());
}

#[test]
fn test_users_are_isolated_from_guest() {
    let data_dir = TempDir::new().unwrap();
    seed(&data_dir);

    fintrack(&data_dir)
        .args(["--user", "alice", "income", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No incomes recorded."));
}

#[test]
fn test_blank_required_field_rejected() {
    let data_dir = TempDir::new().unwrap();

    fintrack(&data_dir)
        .args(["expense", "add", " ", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category cannot be empty"));
}

#[test]
fn test_loose_date_rejected() {
    let data_dir = TempDir::new().unwrap();

    fintrack(&data_dir)
        .args(["income", "add", "Job", "100", "--date", "2024-1-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a YYYY-MM-DD date"));
}

#[test]
fn test_export_dry_run_writes_nothing() {
    let data_dir = TempDir::new().unwrap();
    seed(&data_dir);

    fintrack(&data_dir)
        .args(["export", "--month", "2024-01", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fintrack-itr-2024-01.xlsx"))
        .stdout(predicate::str::contains("Rows:            2"))
        .stdout(predicate::str::contains("38000.00"))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!data_dir.path().join("exports").exists());
}

#[test]
fn test_export_writes_workbook() {
    let data_dir = TempDir::new().unwrap();
    seed(&data_dir);
    let out = TempDir::new().unwrap();

    fintrack(&data_dir)
        .args(["export", "--variant", "gst", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let path = out.path().join("fintrack-gst-all.xlsx");
    let bytes = std::fs::read(path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_invalid_export_month() {
    let data_dir = TempDir::new().unwrap();

    fintrack(&data_dir)
        .args(["export", "--month", "2024-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month"));
}

#[test]
fn test_update_delete_and_audit() {
    let data_dir = TempDir::new().unwrap();

    fintrack(&data_dir)
        .args(["saving", "add", "Emergency", "1000"])
        .assert()
        .success();

    let blob = std::fs::read_to_string(data_dir.path().join("data/fintrack-guest.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let id = value["savings"][0]["id"].as_str().unwrap().to_string();

    fintrack(&data_dir)
        .args(["saving", "update", &id[..8], "--amount", "2500"])
        .assert()
        .success();
    fintrack(&data_dir)
        .args(["saving", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2500.00"));

    fintrack(&data_dir)
        .args(["saving", "delete", &id])
        .assert()
        .success();
    fintrack(&data_dir)
        .args(["saving", "delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    fintrack(&data_dir)
        .args(["audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE"))
        .stdout(predicate::str::contains("UPDATE"))
        .stdout(predicate::str::contains("DELETE"));
}

#[test]
fn test_attachment_can_be_cleared() {
    let data_dir = TempDir::new().unwrap();
    let invoice = data_dir.path().join("invoice.pdf");
    std::fs::write(&invoice, b"%PDF").unwrap();

    fintrack(&data_dir)
        .args(["income", "add", "Consulting", "900", "--date", "2024-01-20", "--attach"])
        .arg(&invoice)
        .assert()
        .success();

    let records = data_dir.path().join("data/fintrack-guest.json");
    let blob: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&records).unwrap()).unwrap();
    assert!(blob["incomes"][0]["invoiceUrl"].is_string());
    let id = blob["incomes"][0]["id"].as_str().unwrap().to_string();

    fintrack(&data_dir)
        .args(["income", "update", &id, "--clear-attachment"])
        .assert()
        .success();

    let blob: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&records).unwrap()).unwrap();
    assert!(blob["incomes"][0].get("invoiceUrl").is_none());
    assert_eq!(blob["incomes"][0]["amount"], 900.0);
}

#[test]
fn test_profile_and_dashboard() {
    let data_dir = TempDir::new().unwrap();
    seed(&data_dir);

    fintrack(&data_dir)
        .args(["profile", "set", "--name", "Asha", "--email", "asha@example.com"])
        .assert()
        .success();
    fintrack(&data_dir)
        .args(["profile", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("asha@example.com"));

    fintrack(&data_dir)
        .args(["dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expenses by category"))
        .stdout(predicate::str::contains("Rent"));
}
