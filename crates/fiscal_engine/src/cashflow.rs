//! Post-fiscal cash-flow outputs.

use serde::Serialize;

use fiscal_core::audit::Audited;

/// One period of post-fiscal cash flow, every component audited.
///
/// Regime-specific components are `Option`: cost recovery and profit split
/// only exist under PSC / service contracts, depreciation and RRT only under
/// concessionary terms. Amounts are $mm.
#[derive(Clone, Debug, Serialize)]
pub struct CashFlowPeriod {
    /// Period index
    pub index: usize,
    /// Gross revenue
    pub gross_revenue: Audited,
    /// Royalty (or the government's FTP-equivalent off-take under PSC)
    pub royalty: Audited,
    /// First tranche petroleum (PSC only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ftp: Option<Audited>,
    /// Cost recovered this period (PSC cost oil / service-contract recovery)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_recovered: Option<Audited>,
    /// Unrecovered cost pool carried to the next period, after this period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_carry_forward: Option<Audited>,
    /// Contractor share of profit oil (PSC only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor_profit_oil: Option<Audited>,
    /// Government share of profit oil (PSC only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_profit_oil: Option<Audited>,
    /// Operating costs
    pub opex: Audited,
    /// Capital spend landing this period
    pub capex: Audited,
    /// Depreciation taken this period (concessionary only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depreciation: Option<Audited>,
    /// Income tax
    pub tax: Audited,
    /// Resource rent tax (concessionary with RRT only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrt: Option<Audited>,
    /// Total government take this period: royalty + FTP + government profit
    /// oil + tax + RRT
    pub government_take: Audited,
    /// Contractor net cash flow
    pub net_cash_flow: Audited,
}

/// Extracts the undiscounted net-cash-flow series.
pub fn net_series(periods: &[CashFlowPeriod]) -> Vec<f64> {
    periods.iter().map(|p| p.net_cash_flow.value).collect()
}

/// Extracts the net-cash-flow series paired with each period's own index.
///
/// Valuation discounts by the period index, not the slice position. A
/// series that starts mid-horizon keeps its timing through this pairing.
pub fn indexed_net_series(periods: &[CashFlowPeriod]) -> Vec<(usize, f64)> {
    periods
        .iter()
        .map(|p| (p.index, p.net_cash_flow.value))
        .collect()
}

/// Total gross revenue over the run ($mm).
pub fn gross_total(periods: &[CashFlowPeriod]) -> f64 {
    periods.iter().map(|p| p.gross_revenue.value).sum()
}

/// Total government take over the run ($mm).
pub fn government_take_total(periods: &[CashFlowPeriod]) -> f64 {
    periods.iter().map(|p| p.government_take.value).sum()
}

/// Government take as a fraction of pre-take value.
///
/// Pre-take value is gross revenue less costs actually spent; zero or
/// negative pre-take value yields `None` rather than a meaningless ratio.
pub fn government_take_fraction(periods: &[CashFlowPeriod]) -> Option<f64> {
    let pre_take: f64 = periods
        .iter()
        .map(|p| p.gross_revenue.value - p.opex.value - p.capex.value)
        .sum();
    if pre_take <= 0.0 {
        None
    } else {
        Some(government_take_total(periods) / pre_take)
    }
}
