use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

const CONFIG: &str = r#"{
    "authorize_timeout_ms": 1000,
    "methods": [
        {"tag": "creditcard", "impl": "credit_card",
         "credit_limit": {"minor": 5000, "currency": "usd"}, "latency_ms": 1}
    ],
    "adjustments": [
        {"tag": "vat", "impl": "tax", "priority": 20, "rate": "0.08"}
    ]
}"#;

const ORDERS: &str = r#"[
    {
        "customer": "alice",
        "method": "creditcard",
        "items": [
            {"sku": "A", "quantity": 2, "unit_price": {"minor": 500, "currency": "usd"}}
        ]
    },
    {
        "customer": "bob",
        "method": "creditcard",
        "items": [
            {"sku": "B", "quantity": 1, "unit_price": {"minor": 999900, "currency": "usd"}}
        ]
    }
]"#;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("config.json");
    let orders_path = dir.path().join("orders.json");
    fs::write(&config_path, CONFIG)?;
    fs::write(&orders_path, ORDERS)?;

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(&config_path).arg(&orders_path);

    cmd.assert()
        .success()
        // Alice: 1000 + 8% tax.
        .stdout(predicate::str::contains("paid 10.80 USD"))
        // Bob is over the card limit.
        .stdout(predicate::str::contains("failed (insufficient funds)"))
        .stdout(predicate::str::contains("receipt "));

    Ok(())
}

#[test]
fn test_cli_rejects_empty_method_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("config.json");
    let orders_path = dir.path().join("orders.json");
    fs::write(&config_path, r#"{"methods": []}"#)?;
    fs::write(&orders_path, "[]")?;

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(&config_path).arg(&orders_path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no payment methods registered"));

    Ok(())
}
