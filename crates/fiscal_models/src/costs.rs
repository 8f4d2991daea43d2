//! Operating and capital cost structures.
//!
//! Costs are plain period-indexed data; the recoverability tags only matter
//! under production-sharing regimes, where they feed the cost-oil pool.

use serde::{Deserialize, Serialize};

/// Per-period operating cost components ($mm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingCost {
    /// Period index this entry covers
    pub period: usize,
    /// Lifting cost
    pub lifting: f64,
    /// General & administrative
    pub ga: f64,
    /// Transport and processing
    pub transport: f64,
    /// Workover spend
    pub workover: f64,
    /// Whether these costs enter the PSC cost-recovery pool
    pub cost_recoverable: bool,
}

impl OperatingCost {
    /// Total operating cost for the period.
    pub fn total(&self) -> f64 {
        self.lifting + self.ga + self.transport + self.workover
    }
}

/// Category of a capital item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapitalKind {
    /// Development capex (drilling, facilities)
    Development,
    /// Acquisition cost
    Acquisition,
    /// Abandonment / asset-retirement obligation
    Abandonment,
}

/// A single capital item ($mm) landing in one period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapitalItem {
    /// Period the spend lands in
    pub period: usize,
    /// Amount in $mm
    pub amount: f64,
    /// Category
    pub kind: CapitalKind,
    /// Whether this item enters the PSC cost-recovery pool
    pub cost_recoverable: bool,
}

/// The full cost structure of an evaluation: operating components plus
/// capital items, each taggable as cost-recoverable.
///
/// # Example
///
/// ```
/// use fiscal_models::costs::{CapitalItem, CapitalKind, CostStructure, OperatingCost};
///
/// let costs = CostStructure::new(
///     vec![OperatingCost { period: 0, lifting: 1.2, ga: 0.3, transport: 0.2,
///                          workover: 0.0, cost_recoverable: true }],
///     vec![CapitalItem { period: 0, amount: 10.0, kind: CapitalKind::Development,
///                        cost_recoverable: true }],
/// );
/// assert!((costs.opex_for(0) - 1.7).abs() < 1e-12);
/// assert!((costs.capex_for(0) - 10.0).abs() < 1e-12);
/// assert_eq!(costs.opex_for(1), 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostStructure {
    opex: Vec<OperatingCost>,
    capital: Vec<CapitalItem>,
}

impl CostStructure {
    /// Creates a cost structure from operating and capital entries.
    pub fn new(opex: Vec<OperatingCost>, capital: Vec<CapitalItem>) -> Self {
        Self { opex, capital }
    }

    /// Operating entries.
    pub fn opex(&self) -> &[OperatingCost] {
        &self.opex
    }

    /// Capital entries.
    pub fn capital(&self) -> &[CapitalItem] {
        &self.capital
    }

    /// Total operating cost landing in `period`.
    pub fn opex_for(&self, period: usize) -> f64 {
        self.opex
            .iter()
            .filter(|o| o.period == period)
            .map(OperatingCost::total)
            .sum()
    }

    /// Total capital spend landing in `period`.
    pub fn capex_for(&self, period: usize) -> f64 {
        self.capital
            .iter()
            .filter(|c| c.period == period)
            .map(|c| c.amount)
            .sum()
    }

    /// Cost-recoverable spend (opex + capital) landing in `period`.
    ///
    /// Only meaningful under PSC; other regimes ignore the tags.
    pub fn recoverable_for(&self, period: usize) -> f64 {
        let opex: f64 = self
            .opex
            .iter()
            .filter(|o| o.period == period && o.cost_recoverable)
            .map(OperatingCost::total)
            .sum();
        let capex: f64 = self
            .capital
            .iter()
            .filter(|c| c.period == period && c.cost_recoverable)
            .map(|c| c.amount)
            .sum();
        opex + capex
    }

    /// Total capital spend of a given kind over the whole structure.
    pub fn total_capital_of(&self, kind: CapitalKind) -> f64 {
        self.capital
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.amount)
            .sum()
    }

    /// Returns a copy with operating and capital amounts scaled by the given
    /// factors; used by sensitivity perturbations.
    pub fn scaled(&self, opex_factor: f64, capex_factor: f64) -> Self {
        Self {
            opex: self
                .opex
                .iter()
                .map(|o| OperatingCost {
                    lifting: o.lifting * opex_factor,
                    ga: o.ga * opex_factor,
                    transport: o.transport * opex_factor,
                    workover: o.workover * opex_factor,
                    ..*o
                })
                .collect(),
            capital: self
                .capital
                .iter()
                .map(|c| CapitalItem {
                    amount: c.amount * capex_factor,
                    ..*c
                })
                .collect(),
        }
    }
}
