//! Rollup command - summarize one contract and its invoices.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use moctrack_core::models::contract::ContractSnapshot;
use moctrack_core::models::invoice::InvoiceStatus;
use moctrack_core::rollup::ContractRollup;

use super::{format_amount, load_config, read_json, write_output, OutputFormat};

/// Arguments for the rollup command.
#[derive(Args)]
pub struct RollupArgs {
    /// Contract snapshot file (contract plus invoices, JSON)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: RollupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let snapshot: ContractSnapshot = read_json(&args.input)?;

    info!(
        "Rolling up contract {} ({} invoices)",
        snapshot.contract.contract_number,
        snapshot.invoices.len()
    );

    let rollup = ContractRollup::from_snapshot(&snapshot, &config.rates);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&rollup)?,
        OutputFormat::Csv => format_rollup_csv(&rollup)?,
        OutputFormat::Text => format_rollup_text(&rollup),
    };

    write_output(args.output.as_ref(), &output)
}

/// Invoice rows in date order, for spreadsheet export.
fn format_rollup_csv(rollup: &ContractRollup) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "contract_number",
        "invoice_number",
        "invoice_date",
        "amount",
        "vat",
        "retention",
        "payable",
        "status",
        "receipt_date",
    ])?;

    for invoice in &rollup.rows {
        wtr.write_record([
            &rollup.contract_number,
            &invoice.invoice_number,
            &invoice.invoice_date.to_string(),
            &invoice.amount.to_string(),
            &invoice.vat.to_string(),
            &invoice.retention.to_string(),
            &invoice.payable.to_string(),
            &invoice.status.to_string(),
            &invoice.receipt_date.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_rollup_text(rollup: &ContractRollup) -> String {
    let mut output = String::new();

    output.push_str(&format!("Contract: {}\n", rollup.contract_number));
    if !rollup.project_type.is_empty() {
        output.push_str(&format!("Type: {}\n", rollup.project_type));
    }
    output.push('\n');

    output.push_str(&format!("  Contract value:        {}\n", format_amount(rollup.contract_value)));
    output.push_str(&format!("  Contract value (VAT):  {}\n", format_amount(rollup.contract_value_with_vat)));
    output.push_str(&format!("  Submitted:             {}\n", format_amount(rollup.total_submitted)));
    output.push_str(&format!("  Submitted (VAT):       {}\n", format_amount(rollup.total_submitted_with_vat)));
    output.push_str(&format!("  Received:              {}\n", format_amount(rollup.total_received)));
    output.push_str(&format!("  Balance outstanding:   {}\n", format_amount(rollup.balance_outstanding)));
    output.push_str(&format!("  Submitted %:           {}%\n", rollup.submitted_percentage));
    output.push('\n');

    output.push_str("By status (incl. VAT):\n");
    for status in InvoiceStatus::ALL {
        output.push_str(&format!(
            "  {:<20} {}\n",
            status.desk(),
            format_amount(rollup.total_under_status.get(status))
        ));
    }

    if !rollup.rows.is_empty() {
        output.push_str("\nInvoices:\n");
        for invoice in &rollup.rows {
            output.push_str(&format!(
                "  {}  {:<20} {:>15}  {}\n",
                invoice.invoice_date,
                invoice.invoice_number,
                format_amount(invoice.payable),
                invoice.status
            ));
        }
    }

    if rollup.skipped_invoices > 0 {
        output.push_str(&format!(
            "\n{} malformed invoice(s) skipped\n",
            rollup.skipped_invoices
        ));
    }

    output
}
