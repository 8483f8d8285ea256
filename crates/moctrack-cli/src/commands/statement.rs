//! Statement command - supplier statement of account.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use moctrack_core::ledger::Statement;
use moctrack_core::models::supplier::SupplierSnapshot;

use super::{format_amount, read_json, write_output, OutputFormat};

/// Arguments for the statement command.
#[derive(Args)]
pub struct StatementArgs {
    /// Supplier snapshot file (supplier, purchase orders, certified records)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: StatementArgs) -> anyhow::Result<()> {
    let snapshot: SupplierSnapshot = read_json(&args.input)?;
    let statement = Statement::for_supplier(&snapshot);

    info!(
        "Statement for {}: {} records, balance {}",
        snapshot.supplier.name,
        statement.record_count(),
        statement.balance_remaining
    );

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&statement)?,
        OutputFormat::Csv => format_statement_csv(&statement)?,
        OutputFormat::Text => format_statement_text(&statement),
    };

    write_output(args.output.as_ref(), &output)
}

fn format_statement_csv(statement: &Statement) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "description",
        "invoice_number",
        "payment_type",
        "po_number",
        "credit",
        "debit",
        "balance",
    ])?;

    for row in &statement.rows {
        wtr.write_record([
            &row.date.map(|d| d.to_string()).unwrap_or_default(),
            &row.description,
            &row.invoice_number.clone().unwrap_or_default(),
            &row.payment_type.clone().unwrap_or_default(),
            &row.po_number.clone().unwrap_or_default(),
            &row.credit.to_string(),
            &row.debit.to_string(),
            &row.balance.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_statement_text(statement: &Statement) -> String {
    let mut output = String::new();

    if let Some(name) = &statement.supplier_name {
        output.push_str(&format!("Supplier: {}\n", name));
    }
    if !statement.distinct_po_numbers.is_empty() {
        output.push_str(&format!("POs: {}\n", statement.distinct_po_numbers.join(", ")));
    }
    output.push('\n');

    for row in &statement.rows {
        output.push_str(&format!(
            "  {:<10}  {:<24} {:>15} {:>15} {:>15}\n",
            row.date.map(|d| d.to_string()).unwrap_or_default(),
            row.description,
            format_amount(row.credit),
            format_amount(row.debit),
            format_amount(row.balance)
        ));
    }

    output.push('\n');
    output.push_str(&format!("  Total PO value:     {}\n", format_amount(statement.total_po_value)));
    output.push_str(&format!("  Total certified:    {}\n", format_amount(statement.total_certified)));
    output.push_str(&format!("  Balance remaining:  {}\n", format_amount(statement.balance_remaining)));

    output
}
