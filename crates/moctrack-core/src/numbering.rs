//! Contract-scoped invoice numbering.
//!
//! Invoice numbers take the form `<contract number>-INV-<sequence>`, with the
//! sequence zero-padded to three digits.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::NumberingError;

lazy_static! {
    pub static ref INVOICE_SEQUENCE: Regex = Regex::new(
        r"(?i)^\s*(.+?)-INV-(\d+)\s*$"
    ).unwrap();
}

const SEQUENCE_WIDTH: usize = 3;

/// Split an invoice number into its contract prefix and sequence.
pub fn parse_sequence(invoice_number: &str) -> Result<(String, u32), NumberingError> {
    let caps = INVOICE_SEQUENCE
        .captures(invoice_number)
        .ok_or_else(|| NumberingError::MissingSequence(invoice_number.to_string()))?;

    let sequence = caps[2]
        .parse::<u32>()
        .map_err(|_| NumberingError::MissingSequence(invoice_number.to_string()))?;

    Ok((caps[1].to_string(), sequence))
}

/// Format an invoice number for a contract and sequence.
pub fn format_invoice_number(contract_number: &str, sequence: u32) -> String {
    format!(
        "{}-INV-{:0width$}",
        contract_number.trim(),
        sequence,
        width = SEQUENCE_WIDTH
    )
}

/// Next invoice number for a contract given the numbers already issued.
///
/// Numbers belonging to other contracts or without a sequence are ignored.
pub fn next_invoice_number<'a, I>(contract_number: &str, existing: I) -> Result<String, NumberingError>
where
    I: IntoIterator<Item = &'a str>,
{
    let contract_number = contract_number.trim();
    if contract_number.is_empty() {
        return Err(NumberingError::EmptyContractNumber);
    }

    let last = existing
        .into_iter()
        .filter_map(|n| parse_sequence(n).ok())
        .filter(|(prefix, _)| prefix.eq_ignore_ascii_case(contract_number))
        .map(|(_, seq)| seq)
        .max()
        .unwrap_or(0);

    Ok(format_invoice_number(contract_number, last + 1))
}
