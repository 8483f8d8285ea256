use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONTRACT: &str = r#"{
  "contract": {
    "id": "moc-1",
    "contract_number": "MOC-001",
    "description": "Heat exchanger retubing",
    "contract_value": "13708.00",
    "project_type": "Turnaround"
  },
  "invoices": [
    {
      "id": "MOC-001-INV-001",
      "contract_id": "moc-1",
      "invoice_number": "MOC-001-INV-001",
      "invoice_date": "2024-01-10",
      "amount": "13708.00",
      "vat": "2056.20",
      "retention": "1370.80",
      "payable": "14393.40",
      "status": "PAID",
      "receipt_date": "2024-02-20"
    }
  ]
}"#;

const OTHER_CONTRACT: &str = r#"{
  "contract": {
    "id": "moc-2",
    "contract_number": "MOC-002",
    "contract_value": "20000",
    "project_type": "Non-TA"
  },
  "invoices": []
}"#;

const INVOICE: &str = r#"{
  "id": "MOC-001-INV-002",
  "contract_id": "moc-1",
  "invoice_number": "MOC-001-INV-002",
  "invoice_date": "2024-03-01",
  "amount": "1000.00",
  "vat": "150.00",
  "retention": "100.00",
  "payable": "1050.00",
  "status": "FINANCE"
}"#;

const SUPPLIER: &str = r#"{
  "supplier": { "id": "sup-1", "name": "Gulf Fabrication" },
  "purchase_orders": [
    {
      "po_number": "PO-1",
      "supplier_id": "sup-1",
      "value": "86956.52",
      "value_with_vat": "100000",
      "local_value": "86956.52",
      "local_value_with_vat": "100000"
    }
  ],
  "records": [
    { "invoice_number": "S-2", "certified_date": "2024-03-01", "payment_type": "Progress", "po_number": "PO-1", "payable": "20000" },
    { "invoice_number": "S-1", "certified_date": "2024-01-15", "payment_type": "Advance", "po_number": "PO-1", "payable": "30000" }
  ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A workspace with a default config file so tests never read the user's config.
fn workspace() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "config.json", "{}");
    (dir, config)
}

fn moctrack(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("moctrack").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn rollup_reports_received_and_outstanding() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "moc-1.json", CONTRACT);

    moctrack(&config)
        .arg("rollup")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""total_received": "14393.40""#))
        .stdout(predicate::str::contains(r#""contract_value_with_vat": "15764.20""#))
        .stdout(predicate::str::contains(r#""balance_outstanding": "1370.80""#));
}

#[test]
fn rollup_csv_lists_invoice_rows() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "moc-1.json", CONTRACT);

    moctrack(&config)
        .args(["rollup", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("contract_number,invoice_number"))
        .stdout(predicate::str::contains("MOC-001,MOC-001-INV-001,2024-01-10,13708.00"));
}

#[test]
fn status_to_paid_requires_receipt_date() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "invoice.json", INVOICE);

    moctrack(&config)
        .args(["status", "--to", "PAID"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("receipt date is required"));
}

#[test]
fn status_to_paid_sets_receipt_date() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "invoice.json", INVOICE);

    moctrack(&config)
        .args(["status", "--to", "paid", "--receipt-date", "2024-04-02"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": "PAID""#))
        .stdout(predicate::str::contains(r#""receipt_date": "2024-04-02""#));
}

#[test]
fn status_rejects_unknown_status() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "invoice.json", INVOICE);

    moctrack(&config)
        .args(["status", "--to", "APPROVED"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown invoice status"));
}

#[test]
fn status_amount_edit_in_place() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "invoice.json", INVOICE);

    moctrack(&config)
        .args(["status", "--amount", "2000", "--in-place"])
        .arg(&input)
        .assert()
        .success();

    let updated = fs::read_to_string(&input).unwrap();
    assert!(updated.contains(r#""payable": "2100.00""#));
    assert!(updated.contains(r#""status": "FINANCE""#));
}

#[test]
fn issue_continues_contract_sequence() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "moc-1.json", CONTRACT);

    moctrack(&config)
        .args(["issue", "--amount", "500", "--date", "2024-05-01"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""invoice_number": "MOC-001-INV-002""#))
        .stdout(predicate::str::contains(r#""status": "PMD""#))
        .stdout(predicate::str::contains(r#""payable": "525.00""#));
}

#[test]
fn statement_csv_has_running_balance() {
    let (dir, config) = workspace();
    let input = write(dir.path(), "supplier.json", SUPPLIER);

    moctrack(&config)
        .args(["statement", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(",Opening balance,,,,100000.00,0.00,100000.00"))
        .stdout(predicate::str::contains("2024-01-15,Invoice S-1,S-1,Advance,PO-1,0.00,30000.00,70000.00"))
        .stdout(predicate::str::contains("2024-03-01,Invoice S-2,S-2,Progress,PO-1,0.00,20000.00,50000.00"));
}

#[test]
fn portfolio_filters_by_project_type() {
    let (dir, config) = workspace();
    let contracts = dir.path().join("contracts");
    fs::create_dir(&contracts).unwrap();
    write(&contracts, "moc-1.json", CONTRACT);
    write(&contracts, "moc-2.json", OTHER_CONTRACT);
    let pattern = format!("{}/*.json", contracts.display());

    moctrack(&config)
        .args(["portfolio", "--type", "Turnaround"])
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""contract_count": 1"#))
        .stdout(predicate::str::contains(r#""collected": "14393.40""#));

    moctrack(&config)
        .args(["portfolio", "--type", "Overall", "--format", "csv", "--vat", "exclusive"])
        .arg(&pattern)
        .assert()
        .success()
        .stdout(predicate::str::contains("awarded,33708.00"));
}

#[test]
fn config_init_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("moctrack").join("config.json");

    Command::cargo_bin("moctrack")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();

    Command::cargo_bin("moctrack")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rates.vat_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.15"));

    Command::cargo_bin("moctrack")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rates.vat_rate", "5%"])
        .assert()
        .success();

    Command::cargo_bin("moctrack")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rates.vat_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.05"));
}
