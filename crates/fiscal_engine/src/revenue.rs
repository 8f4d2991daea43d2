//! Gross revenue: production × realised price.

use std::collections::BTreeMap;

use fiscal_core::audit::{AuditTrail, Audited};
use fiscal_core::types::{EngineError, Product, Unit};
use fiscal_models::deck::PriceDeck;
use fiscal_models::production::ProductionProfile;

/// Revenue for one period, per product and in total, all audited.
///
/// Amounts are in $mm (volumes are per-period units, prices $/unit).
#[derive(Clone, Debug)]
pub struct PeriodRevenue {
    /// Period index
    pub index: usize,
    /// Gross revenue by product, $mm
    pub by_product: BTreeMap<Product, Audited>,
    /// Total gross revenue, $mm
    pub total: Audited,
    /// Total production, boe
    pub volume_boe: f64,
    /// Revenue-weighted realised price, $/boe (0 when no volume)
    pub realised_price_boe: f64,
}

/// Computes gross revenue for every profile period.
///
/// Pure: `gross[product] = volume × (deck_price − differential)`. Deck
/// coverage is validated up front, so a missing (period, product) pair
/// aborts before period 0 is computed. The engine never extrapolates the
/// last known price to fill a gap.
pub fn gross_revenue(
    profile: &ProductionProfile,
    deck: &PriceDeck,
    trail: &mut AuditTrail,
) -> Result<Vec<PeriodRevenue>, EngineError> {
    deck.validate_coverage(profile)?;

    let mut revenue = Vec::with_capacity(profile.len());
    for period in &profile.periods {
        let mut by_product = BTreeMap::new();
        let mut total = 0.0;
        let mut parents = Vec::new();

        for (product, volume) in period.volumes.iter() {
            if volume <= 0.0 {
                continue;
            }
            let entry = deck.entry(period.index, product)?;
            let net_price = entry.net_price();
            let amount_mm = volume * net_price / 1e6;
            let audited = trail.derive(
                &format!(
                    "gross_revenue[{product}] = volume * (price - differential), period {}",
                    period.index
                ),
                amount_mm,
                Unit::UsdMm,
                &[
                    ("volume", volume),
                    ("price", entry.price),
                    ("differential", entry.differential),
                ],
                &[],
            );
            total += amount_mm;
            parents.push(audited.id);
            by_product.insert(product, audited);
        }

        let volume_boe = period.volumes.total_boe();
        let total = trail.derive(
            &format!("gross_revenue = sum over products, period {}", period.index),
            total,
            Unit::UsdMm,
            &by_product
                .iter()
                .map(|(p, a)| (p.code(), a.value))
                .collect::<Vec<_>>(),
            &parents,
        );
        let realised_price_boe = if volume_boe > 0.0 {
            total.value * 1e6 / volume_boe
        } else {
            0.0
        };

        revenue.push(PeriodRevenue {
            index: period.index,
            by_product,
            total,
            volume_boe,
            realised_price_boe,
        });
    }
    Ok(revenue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fiscal_core::types::{PeriodBasis, ProductVolumes};
    use fiscal_models::production::{PeriodKind, ProductionPeriod, ProductionProfileBuilder};

    fn profile_two_products() -> ProductionProfile {
        let series = vec![ProductionPeriod {
            index: 0,
            volumes: ProductVolumes::new()
                .with(Product::Oil, 100_000.0)
                .with(Product::Gas, 300_000.0),
            kind: PeriodKind::Forecast,
        }];
        ProductionProfileBuilder::new(PeriodBasis::Annual)
            .from_series(series)
            .unwrap()
    }

    #[test]
    fn test_revenue_with_differential() {
        let profile = profile_two_products();
        let deck = PriceDeck::flat(
            &[(Product::Oil, 70.0, 2.0), (Product::Gas, 3.0, 0.5)],
            1,
        )
        .unwrap();

        let mut trail = AuditTrail::new();
        let revenue = gross_revenue(&profile, &deck, &mut trail).unwrap();

        // oil: 100,000 * 68 = 6.8mm; gas: 300,000 * 2.5 = 0.75mm
        assert_relative_eq!(revenue[0].by_product[&Product::Oil].value, 6.8);
        assert_relative_eq!(revenue[0].by_product[&Product::Gas].value, 0.75);
        assert_relative_eq!(revenue[0].total.value, 7.55);
        assert_relative_eq!(revenue[0].volume_boe, 150_000.0);
    }

    #[test]
    fn test_gap_aborts_before_any_period() {
        let profile = profile_two_products();
        let deck = PriceDeck::flat(&[(Product::Oil, 70.0, 0.0)], 1).unwrap();

        let mut trail = AuditTrail::new();
        let result = gross_revenue(&profile, &deck, &mut trail);
        assert!(matches!(result, Err(EngineError::PriceDeck(_))));
        // Fail-fast: nothing was computed
        assert!(trail.is_empty());
    }

    #[test]
    fn test_total_audit_links_products() {
        let profile = profile_two_products();
        let deck = PriceDeck::flat(
            &[(Product::Oil, 70.0, 0.0), (Product::Gas, 3.0, 0.0)],
            1,
        )
        .unwrap();

        let mut trail = AuditTrail::new();
        let revenue = gross_revenue(&profile, &deck, &mut trail).unwrap();
        let lineage = trail.lineage(revenue[0].total.id);
        // Total plus one record per product
        assert_eq!(lineage.len(), 3);
    }

    #[test]
    fn test_realised_price_weighted() {
        let profile = profile_two_products();
        let deck = PriceDeck::flat(
            &[(Product::Oil, 70.0, 0.0), (Product::Gas, 3.0, 0.0)],
            1,
        )
        .unwrap();

        let mut trail = AuditTrail::new();
        let revenue = gross_revenue(&profile, &deck, &mut trail).unwrap();
        // (100,000*70 + 300,000*3) / 150,000 boe = 52.67 $/boe
        assert_relative_eq!(
            revenue[0].realised_price_boe,
            (7_000_000.0 + 900_000.0) / 150_000.0
        );
    }
}
