//! Product streams, measurement units, and period basis.
//!
//! Every numeric field crossing the engine boundary is paired with a [`Unit`]
//! so downstream consumers never have to guess a scale, and every period
//! sequence declares its [`PeriodBasis`] so discounting uses the right time
//! exponent.
//!
//! # Examples
//!
//! ```
//! use fiscal_core::types::{PeriodBasis, Product, Unit};
//!
//! assert_eq!(Product::Gas.code(), "gas");
//! assert_eq!(Unit::UsdPerBoe.symbol(), "$/boe");
//! assert_eq!(PeriodBasis::Monthly.periods_per_year(), 12.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Product stream produced by an upstream asset.
///
/// Designed for static dispatch (enum-based); the set is closed because the
/// fiscal mechanics only distinguish these three streams.
///
/// # Examples
///
/// ```
/// use fiscal_core::types::Product;
///
/// assert_eq!(Product::Oil.code(), "oil");
/// let ngl: Product = "ngl".parse().unwrap();
/// assert_eq!(ngl, Product::Ngl);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    /// Crude oil, measured in barrels
    Oil,
    /// Natural gas, measured in mcf
    Gas,
    /// Natural gas liquids, measured in barrels
    Ngl,
}

impl Product {
    /// All product streams, in canonical order.
    pub const ALL: [Product; 3] = [Product::Oil, Product::Gas, Product::Ngl];

    /// Returns the lowercase code used in the external contract.
    pub fn code(&self) -> &'static str {
        match self {
            Product::Oil => "oil",
            Product::Gas => "gas",
            Product::Ngl => "ngl",
        }
    }

    /// Returns true if this stream is measured in mcf rather than barrels.
    ///
    /// Gas volumes must be divided by a gas-to-boe factor before being added
    /// to liquid volumes.
    pub fn is_gas(&self) -> bool {
        matches!(self, Product::Gas)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Product {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "oil" => Ok(Product::Oil),
            "gas" => Ok(Product::Gas),
            "ngl" => Ok(Product::Ngl),
            other => Err(EngineError::UnknownProduct(other.to_string())),
        }
    }
}

/// Measurement unit attached to a numeric output field.
///
/// The engine emits raw `f64` values; the unit tag travels with each value in
/// the response so consumers never have to guess scale or currency.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Millions of US dollars
    UsdMm,
    /// US dollars per barrel
    UsdPerBbl,
    /// US dollars per barrel of oil equivalent
    UsdPerBoe,
    /// Percentage (0–100 scale)
    Pct,
    /// Dimensionless fraction (0–1 scale)
    Fraction,
    /// Barrels of oil equivalent per day
    Boepd,
    /// Thousands of barrels of oil equivalent
    Mboe,
    /// Period count on the declared basis
    Periods,
    /// Calendar years
    Years,
}

impl Unit {
    /// Returns the display symbol for this unit.
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::UsdMm => "$mm",
            Unit::UsdPerBbl => "$/bbl",
            Unit::UsdPerBoe => "$/boe",
            Unit::Pct => "%",
            Unit::Fraction => "x",
            Unit::Boepd => "boepd",
            Unit::Mboe => "mboe",
            Unit::Periods => "periods",
            Unit::Years => "years",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Time basis of a period sequence.
///
/// Discounting raises `(1 + r)` to `t / periods_per_year` so that annual
/// discount rates apply correctly to monthly series.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodBasis {
    /// One period per calendar month
    Monthly,
    /// One period per calendar year
    Annual,
}

impl PeriodBasis {
    /// Number of periods per year on this basis.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            PeriodBasis::Monthly => 12.0,
            PeriodBasis::Annual => 1.0,
        }
    }

    /// Converts a period index to a time in years.
    ///
    /// Period 0 is time zero; cash flows are assumed to land at the end of
    /// each period, so period `t` discounts over `(t + 1)` periods.
    pub fn years_at(&self, period: usize) -> f64 {
        (period as f64 + 1.0) / self.periods_per_year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_roundtrip() {
        for p in Product::ALL {
            let parsed: Product = p.code().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn test_product_parse_case_insensitive() {
        let p: Product = "OIL".parse().unwrap();
        assert_eq!(p, Product::Oil);
    }

    #[test]
    fn test_product_parse_unknown() {
        let r: Result<Product, _> = "condensate".parse();
        assert!(r.is_err());
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(Unit::UsdMm.symbol(), "$mm");
        assert_eq!(Unit::Pct.symbol(), "%");
        assert_eq!(format!("{}", Unit::UsdPerBoe), "$/boe");
    }

    #[test]
    fn test_period_basis_years() {
        assert_eq!(PeriodBasis::Annual.years_at(0), 1.0);
        assert_eq!(PeriodBasis::Annual.years_at(4), 5.0);
        assert!((PeriodBasis::Monthly.years_at(11) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_serde_rename() {
        let json = serde_json::to_string(&Product::Ngl).unwrap();
        assert_eq!(json, "\"ngl\"");
        let unit: Unit = serde_json::from_str("\"usd_mm\"").unwrap();
        assert_eq!(unit, Unit::UsdMm);
    }
}
