//! Status command - move an invoice through its lifecycle or edit its amounts.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use moctrack_core::models::invoice::{Invoice, InvoiceStatus};
use moctrack_core::status::{apply_change, InvoiceChange};

use super::{load_config, read_json, write_output};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Invoice file (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Target status (PMD, PMT, FINANCE, PAID)
    #[arg(long = "to")]
    status: Option<String>,

    /// Receipt date, required when moving to PAID (YYYY-MM-DD)
    #[arg(long)]
    receipt_date: Option<NaiveDate>,

    /// New base amount; VAT, retention and payable are re-derived
    #[arg(long)]
    amount: Option<Decimal>,

    /// Explicit VAT amount
    #[arg(long)]
    vat: Option<Decimal>,

    /// Explicit retention amount
    #[arg(long)]
    retention: Option<Decimal>,

    /// Output file (default: stdout)
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Overwrite the input file with the result
    #[arg(long)]
    in_place: bool,
}

pub async fn run(args: StatusArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let invoice: Invoice = read_json(&args.input)?;

    let status = args
        .status
        .as_deref()
        .map(str::parse::<InvoiceStatus>)
        .transpose()?;

    let change = InvoiceChange {
        amount: args.amount,
        vat: args.vat,
        retention: args.retention,
        status,
        receipt_date: args.receipt_date,
    };

    if change.is_empty() {
        anyhow::bail!("Nothing to change: pass --to, --amount, --vat or --retention");
    }

    let updated = apply_change(&invoice, &change, &config.rates)?;

    info!(
        "Invoice {}: {} -> {}, payable {}",
        updated.invoice_number, invoice.status, updated.status, updated.payable
    );

    let output = serde_json::to_string_pretty(&updated)?;

    if args.in_place {
        fs::write(&args.input, &output)?;
        println!(
            "{} Updated {}",
            style("✓").green(),
            args.input.display()
        );
        Ok(())
    } else {
        write_output(args.output.as_ref(), &output)
    }
}
