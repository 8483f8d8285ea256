//! Subcommands and the helpers they share.

pub mod config;
pub mod issue;
pub mod portfolio;
pub mod rollup;
pub mod statement;
pub mod status;

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::debug;

use moctrack_core::models::config::MocConfig;
use moctrack_core::round2;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Load the configuration from an explicit path, the default path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MocConfig> {
    if let Some(path) = config_path {
        return Ok(MocConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(MocConfig::from_file(&default_path)?)
    } else {
        Ok(MocConfig::default())
    }
}

/// Read and deserialize a JSON snapshot file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
}

/// Write output to a file, or stdout when no file is given.
pub fn write_output(output: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Format an amount with thousands separators (1,234,567.89).
pub fn format_amount(amount: Decimal) -> String {
    let s = round2(amount).to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (integer_part, decimal_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, decimal_part)
}
