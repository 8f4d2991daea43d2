//! Per-run fiscal state.

/// The carry-forward ledger threaded through one regime run.
///
/// Created fresh per scenario, moved through the fold one period at a time
/// in strict period order, and discarded at end of run. Never shared across
/// scenarios or regimes: a sensitivity case builds its own.
///
/// Fields are balances *after* the most recently folded period; the fold
/// reads them as the prior-period balances before writing the new ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FiscalState {
    /// Unrecovered cost pool carried into the next period ($mm, never
    /// negative). PSC cost oil and service-contract recovery draw this down;
    /// regime-specific uplift accrues on it.
    pub cost_carry_forward: f64,

    /// Cumulative contractor receipts to date: cost oil plus contractor
    /// profit oil, all folded periods ($mm). R-Factor numerator.
    pub cum_receipts: f64,

    /// Cumulative expenditures to date: opex plus capex, all folded periods
    /// ($mm). R-Factor denominator.
    pub cum_expenditures: f64,

    /// Undeducted augmented-cost balance for resource rent tax ($mm, never
    /// negative). Carries forward with the RRT uplift compounding.
    pub rrt_undeducted: f64,

    /// Concessionary loss carry-forward, stored as a positive magnitude
    /// ($mm). Only accrues when the regime is not ring-fenced.
    pub loss_carry_forward: f64,

    /// Contractor cash position per folded period, in order ($mm): receipts
    /// less expenditures actually spent. Input to the rate-of-return tier
    /// check.
    pub contractor_cash_flows: Vec<f64>,

    /// Highest rate-of-return tier crossed so far. Monotone: the fold may
    /// advance it, never move it back.
    pub ror_tier: usize,
}

impl FiscalState {
    /// A fresh state for a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cumulative receipts over cumulative expenditures (the R-Factor),
    /// with R treated as 0 while cumulative expenditure is zero.
    pub fn r_factor(&self) -> f64 {
        if self.cum_expenditures <= 0.0 {
            0.0
        } else {
            self.cum_receipts / self.cum_expenditures
        }
    }

    /// Cumulative undiscounted contractor net cash flow of folded periods.
    pub fn cum_net_cash_flow(&self) -> f64 {
        self.contractor_cash_flows.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_r_factor_zero_guard() {
        let state = FiscalState::new();
        assert_eq!(state.r_factor(), 0.0);

        let state = FiscalState {
            cum_receipts: 12.0,
            ..FiscalState::new()
        };
        // Receipts with no expenditure still guard the division
        assert_eq!(state.r_factor(), 0.0);
    }

    #[test]
    fn test_r_factor_ratio() {
        let state = FiscalState {
            cum_receipts: 12.0,
            cum_expenditures: 10.0,
            ..FiscalState::new()
        };
        assert_relative_eq!(state.r_factor(), 1.2);
    }

    #[test]
    fn test_cum_net_cash_flow() {
        let state = FiscalState {
            contractor_cash_flows: vec![-10.0, 4.0, 5.0],
            ..FiscalState::new()
        };
        assert_relative_eq!(state.cum_net_cash_flow(), -1.0);
    }
}
