//! Monetary derivation: VAT, retention and payable from a base amount.
//!
//! Every figure is rounded half-up to two decimal places exactly once.
//! The derived values are meant to be computed at the write boundary
//! (issue, edit, status change) and stored; readers use the stored fields.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of decimal places money is stored with.
pub const DECIMAL_PLACES: u32 = 2;

/// Rate parameters for VAT and retention, as fractions (0.15 = 15%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rates {
    /// VAT rate applied on top of the base amount.
    pub vat_rate: Decimal,

    /// Retention withheld from the base amount.
    pub retention_rate: Decimal,
}

impl Default for Rates {
    fn default() -> Self {
        Self {
            vat_rate: Decimal::new(15, 2),
            retention_rate: Decimal::new(10, 2),
        }
    }
}

impl Rates {
    pub fn new(vat_rate: Decimal, retention_rate: Decimal) -> Self {
        Self {
            vat_rate,
            retention_rate,
        }
    }

    /// Parse a rate given either as a percentage ("15%") or a fraction ("0.15").
    pub fn parse_rate(s: &str) -> Result<Decimal, ValidationError> {
        let s = s.trim();
        let invalid = || ValidationError::InvalidRate(s.to_string());

        let rate = match s.strip_suffix('%') {
            Some(pct) => Decimal::from_str(pct.trim()).map_err(|_| invalid())? / Decimal::ONE_HUNDRED,
            None => Decimal::from_str(s).map_err(|_| invalid())?,
        };

        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(invalid());
        }
        Ok(rate.normalize())
    }
}

/// The derived monetary fields of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub amount: Decimal,
    pub vat: Decimal,
    pub retention: Decimal,
    pub payable: Decimal,
}

/// Round half-up to two decimal places, always carrying a scale of two.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// Derive VAT, retention and payable for a base amount.
///
/// VAT, retention and payable are all computed from the unrounded input; only
/// the stored `amount` is rounded. Since `vat` and `retention` carry exactly two
/// places, `payable == amount + vat - retention` still holds whenever the
/// payable is non-negative.
pub fn derive(raw: Decimal, rates: &Rates) -> Result<Derivation, ValidationError> {
    if raw.is_sign_negative() && !raw.is_zero() {
        return Err(ValidationError::NegativeAmount {
            field: "amount",
            value: raw,
        });
    }

    let vat = round2(raw * rates.vat_rate);
    let retention = round2(raw * rates.retention_rate);

    Ok(Derivation {
        amount: round2(raw),
        vat,
        retention,
        payable: round2(raw + vat - retention),
    })
}

/// Payable for already-rounded parts.
pub fn payable_of(amount: Decimal, vat: Decimal, retention: Decimal) -> Decimal {
    round2(amount + vat - retention)
}

/// VAT-inclusive uplift of a value, used for contract values which carry no stored VAT.
pub fn with_vat(amount: Decimal, vat_rate: Decimal) -> Decimal {
    round2(amount * (Decimal::ONE + vat_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_derive_contract_scenario() {
        let d = derive(dec("13708.00"), &Rates::default()).unwrap();

        assert_eq!(d.vat, dec("2056.20"));
        assert_eq!(d.retention, dec("1370.80"));
        assert_eq!(d.payable, dec("14393.40"));
    }

    #[test]
    fn test_derive_rounds_half_up() {
        // 0.30 * 0.15 = 0.045; banker's rounding would give 0.04
        let d = derive(dec("0.30"), &Rates::default()).unwrap();

        assert_eq!(d.vat, dec("0.05"));
        assert_eq!(d.retention, dec("0.03"));
        assert_eq!(d.payable, dec("0.32"));
    }

    #[test]
    fn test_derive_payable_formula_holds() {
        let rates = Rates::default();
        for raw in [
            "0", "0.01", "1.99", "333.33", "1234.56", "98765.43", "1000000",
            "0.034", "1.005", "12.3456", "0.005", "7.777", "99.995",
        ] {
            let amount = dec(raw);
            let d = derive(amount, &rates).unwrap();
            let expected = round2(
                amount + round2(amount * dec("0.15")) - round2(amount * dec("0.10")),
            );
            assert_eq!(d.payable, expected, "amount {}", raw);
            assert_eq!(d.payable, d.amount + d.vat - d.retention);
        }
    }

    #[test]
    fn test_derive_uses_unrounded_amount() {
        // 0.034 * 0.15 = 0.0051 -> 0.01; rounding the amount first would lose it
        let d = derive(dec("0.034"), &Rates::default()).unwrap();

        assert_eq!(d.amount, dec("0.03"));
        assert_eq!(d.vat, dec("0.01"));
        assert_eq!(d.retention, dec("0.00"));
        assert_eq!(d.payable, dec("0.04"));
    }

    #[test]
    fn test_derive_sub_cent_sweep() {
        let rates = Rates::default();
        for i in 0..20_000i64 {
            let amount = Decimal::new(i, 3);
            let d = derive(amount, &rates).unwrap();
            let expected = round2(
                amount + round2(amount * dec("0.15")) - round2(amount * dec("0.10")),
            );
            assert_eq!(d.payable, expected, "amount {}", amount);
            assert_eq!(d.payable, d.amount + d.vat - d.retention, "amount {}", amount);
        }
    }

    #[test]
    fn test_derive_fixed_scale() {
        let d = derive(dec("100"), &Rates::default()).unwrap();

        assert_eq!(d.amount.scale(), 2);
        assert_eq!(d.vat.scale(), 2);
        assert_eq!(d.payable.to_string(), "105.00");
    }

    #[test]
    fn test_derive_rejects_negative_amount() {
        let err = derive(dec("-1.00"), &Rates::default()).unwrap_err();

        assert_eq!(
            err,
            ValidationError::NegativeAmount {
                field: "amount",
                value: dec("-1.00"),
            }
        );
    }

    #[test]
    fn test_derive_custom_rates() {
        let rates = Rates::new(dec("0.05"), Decimal::ZERO);
        let d = derive(dec("200.00"), &rates).unwrap();

        assert_eq!(d.vat, dec("10.00"));
        assert_eq!(d.retention, Decimal::ZERO);
        assert_eq!(d.payable, dec("210.00"));
    }

    #[test]
    fn test_with_vat() {
        assert_eq!(with_vat(dec("13708.00"), dec("0.15")), dec("15764.20"));
        assert_eq!(with_vat(Decimal::ZERO, dec("0.15")), Decimal::ZERO);
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(Rates::parse_rate("15%").unwrap(), dec("0.15"));
        assert_eq!(Rates::parse_rate(" 0.10 ").unwrap(), dec("0.1"));
        assert_eq!(Rates::parse_rate("7.5 %").unwrap(), dec("0.075"));
        assert!(Rates::parse_rate("abc").is_err());
        assert!(Rates::parse_rate("-5%").is_err());
    }
}
