//! Portfolio command - dashboard headline figures across many contracts.

use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use serde::Deserialize;
use tracing::{debug, warn};

use moctrack_core::models::contract::ContractSnapshot;
use moctrack_core::models::invoice::InvoiceStatus;
use moctrack_core::rollup::{aggregate, PortfolioQuery, PortfolioSummary, UnitMode, VatMode};

use super::{format_amount, load_config, read_json, write_output, OutputFormat};

/// Arguments for the portfolio command.
#[derive(Args)]
pub struct PortfolioArgs {
    /// Contract snapshot files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Project type to filter on ("Overall" for all)
    #[arg(short = 't', long = "type")]
    project_type: Option<String>,

    /// VAT basis for headline values
    #[arg(long, value_enum)]
    vat: Option<VatArg>,

    /// Display units for text output
    #[arg(long, value_enum)]
    units: Option<UnitArg>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum VatArg {
    Inclusive,
    Exclusive,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum UnitArg {
    Full,
    Millions,
}

/// A snapshot file holds one contract or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Many(Vec<ContractSnapshot>),
    One(ContractSnapshot),
}

pub async fn run(args: PortfolioArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let mut contracts = Vec::new();
    for path in &files {
        match read_json::<SnapshotFile>(path) {
            Ok(SnapshotFile::Many(many)) => contracts.extend(many),
            Ok(SnapshotFile::One(one)) => contracts.push(one),
            Err(e) if args.continue_on_error => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
            Err(e) => return Err(e),
        }
    }
    debug!("Loaded {} contracts from {} files", contracts.len(), files.len());

    let project_type = args
        .project_type
        .filter(|t| !t.eq_ignore_ascii_case(&config.reporting.overall_label));

    let query = PortfolioQuery {
        project_type,
        vat_mode: match args.vat {
            Some(VatArg::Inclusive) => VatMode::Inclusive,
            Some(VatArg::Exclusive) => VatMode::Exclusive,
            None => config.reporting.vat_mode,
        },
        unit_mode: match args.units {
            Some(UnitArg::Full) => UnitMode::Full,
            Some(UnitArg::Millions) => UnitMode::Millions,
            None => config.reporting.unit_mode,
        },
    };

    let summary = aggregate(&contracts, &query, &config.rates);

    if summary.skipped_invoices > 0 {
        eprintln!(
            "{} {} malformed invoice(s) skipped",
            style("⚠").yellow(),
            summary.skipped_invoices
        );
    }

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&summary)?,
        OutputFormat::Csv => format_summary_csv(&summary)?,
        OutputFormat::Text => format_summary_text(&summary, &config.reporting.overall_label),
    };

    write_output(args.output.as_ref(), &output)
}

fn headline_metrics(summary: &PortfolioSummary) -> Vec<(String, rust_decimal::Decimal)> {
    let mut metrics = vec![
        ("awarded".to_string(), summary.awarded_value()),
        ("submitted".to_string(), summary.submitted_value()),
        ("collected".to_string(), summary.collected),
        ("retention_held".to_string(), summary.retention_held),
    ];
    for status in [InvoiceStatus::Finance, InvoiceStatus::Pmd, InvoiceStatus::Pmt] {
        metrics.push((
            format!("under_{}", status.code().to_lowercase()),
            summary.status_value(status),
        ));
    }
    metrics
}

fn format_summary_csv(summary: &PortfolioSummary) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["metric", "value"])?;
    for (name, value) in headline_metrics(summary) {
        wtr.write_record([name, value.to_string()])?;
    }
    wtr.write_record([
        "collection_percentage".to_string(),
        summary.collection_percentage.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_summary_text(summary: &PortfolioSummary, overall_label: &str) -> String {
    let mut output = String::new();
    let units = summary.unit_mode;

    output.push_str(&format!(
        "Portfolio: {} ({} contracts, {} invoices)\n",
        summary.project_type.as_deref().unwrap_or(overall_label),
        summary.contract_count,
        summary.invoice_count
    ));
    output.push_str(&format!(
        "Basis: {}\n\n",
        match summary.vat_mode {
            VatMode::Inclusive => "incl. VAT",
            VatMode::Exclusive => "excl. VAT",
        }
    ));

    for (name, value) in headline_metrics(summary) {
        output.push_str(&format!(
            "  {:<16} {}{}\n",
            name,
            format_amount(units.scale(value)),
            units.suffix()
        ));
    }
    output.push_str(&format!(
        "  {:<16} {}%\n",
        "collection", summary.collection_percentage
    ));

    if !summary.project_types.is_empty() {
        output.push_str(&format!(
            "\nProject types: {}\n",
            summary.project_types.join(", ")
        ));
    }

    output
}
