//! Issue command - raise a new invoice against a contract.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use moctrack_core::models::contract::ContractSnapshot;
use moctrack_core::status::issue_invoice;

use super::{load_config, read_json, write_output};

/// Arguments for the issue command.
#[derive(Args)]
pub struct IssueArgs {
    /// Contract snapshot file (JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Base amount, VAT-exclusive
    #[arg(long)]
    amount: Decimal,

    /// Invoice date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    /// Output file for the new invoice (default: stdout)
    #[arg(short, long, conflicts_with = "append")]
    output: Option<PathBuf>,

    /// Append the invoice to the snapshot file instead of printing it
    #[arg(long)]
    append: bool,
}

pub async fn run(args: IssueArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut snapshot: ContractSnapshot = read_json(&args.input)?;

    let invoice = issue_invoice(
        &snapshot.contract,
        &snapshot.invoices,
        args.amount,
        args.date,
        &config.rates,
    )?;

    info!(
        "Issued {} for {} (payable {})",
        invoice.invoice_number, invoice.amount, invoice.payable
    );

    if args.append {
        let number = invoice.invoice_number.clone();
        snapshot.invoices.push(invoice);
        fs::write(&args.input, serde_json::to_string_pretty(&snapshot)?)?;
        println!(
            "{} Added {} to {}",
            style("✓").green(),
            number,
            args.input.display()
        );
        Ok(())
    } else {
        write_output(args.output.as_ref(), &serde_json::to_string_pretty(&invoice)?)
    }
}
