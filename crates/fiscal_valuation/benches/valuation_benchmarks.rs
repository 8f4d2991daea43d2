//! Criterion benchmarks for the valuation pipeline.
//!
//! Benchmarks cover:
//! - NPV reduction over long monthly series
//! - IRR bracket-and-polish solves
//! - Full single-scenario evaluation (profile → fold → valuation)
//! - Parallel sensitivity sweeps at varying case counts

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use std::collections::BTreeMap;

use fiscal_core::math::solvers::SolverConfig;
use fiscal_core::types::{PeriodBasis, Product};
use fiscal_models::costs::{CapitalItem, CapitalKind, CostStructure, OperatingCost};
use fiscal_models::deck::PriceDeck;
use fiscal_models::production::DeclineCurve;
use fiscal_models::regimes::{
    FiscalRegimeDefinition, ProductionSharing, ProfitSplitMechanism, SplitTable,
};
use fiscal_valuation::evaluator::{ProductionInput, ProductionSource};
use fiscal_valuation::irr::internal_rate_of_return;
use fiscal_valuation::valuation::{npv, PriceBasis, Pv10Basis, ValuationRequest};
use fiscal_valuation::{evaluate, EvaluationRequest, SensitivityRequest, SensitivityVariable};

/// Synthetic development-shaped flow series: outlay, ramp, long decline.
fn synthetic_flows(n: usize) -> Vec<(usize, f64)> {
    (0..n)
        .map(|t| {
            let flow = if t == 0 {
                -250.0
            } else {
                40.0 * (-0.015 * t as f64).exp()
            };
            (t, flow)
        })
        .collect()
}

fn psc_request(horizon: usize) -> EvaluationRequest {
    let mut curves = BTreeMap::new();
    curves.insert(
        Product::Oil,
        DeclineCurve::hyperbolic(30_000.0, 0.012, 0.8).unwrap(),
    );
    curves.insert(Product::Gas, DeclineCurve::exponential(60_000.0, 0.010).unwrap());

    EvaluationRequest {
        production: ProductionInput {
            basis: PeriodBasis::Monthly,
            source: ProductionSource::DeclineCurves { curves },
            economic_limit_boe: Some(3_000.0),
            max_periods: Some(horizon),
            gas_boe_factor: None,
        },
        price_deck: PriceDeck::flat(&[(Product::Oil, 72.0, 1.5), (Product::Gas, 3.2, 0.2)], horizon)
            .unwrap(),
        cost_structure: CostStructure::new(
            (0..horizon)
                .map(|period| OperatingCost {
                    period,
                    lifting: 0.35,
                    ga: 0.05,
                    transport: 0.04,
                    workover: 0.0,
                    cost_recoverable: true,
                })
                .collect(),
            vec![CapitalItem {
                period: 0,
                amount: 180.0,
                kind: CapitalKind::Development,
                cost_recoverable: true,
            }],
        ),
        fiscal_regime: FiscalRegimeDefinition::ProductionSharing(ProductionSharing {
            royalty_pct: 0.10,
            ftp_pct: 0.05,
            cost_ceiling_pct: 0.60,
            carry_forward_uplift_pct: 0.0,
            split: ProfitSplitMechanism::RFactor {
                table: SplitTable::Stairstep(vec![(0.0, 0.60), (1.0, 0.50), (1.5, 0.40)]),
            },
            tax_rate: 0.25,
        }),
        valuation_request: ValuationRequest {
            discount_rates: vec![0.08, 0.10, 0.12, 0.15],
            pv10: Pv10Basis {
                price_basis: PriceBasis::ForwardCurve,
                in_scope: (0..horizon.min(120)).collect(),
            },
            enterprise_value: Some(400.0),
        },
        sensitivity_request: Vec::new(),
        thresholds: None,
    }
}

fn bench_npv(c: &mut Criterion) {
    let mut group = c.benchmark_group("npv");
    for n in [120, 360, 600] {
        let flows = synthetic_flows(n);
        group.bench_with_input(BenchmarkId::new("monthly", n), &flows, |b, flows| {
            b.iter(|| npv(black_box(flows), black_box(0.10), PeriodBasis::Monthly));
        });
    }
    group.finish();
}

fn bench_irr(c: &mut Criterion) {
    let mut group = c.benchmark_group("irr");
    for n in [120, 360, 600] {
        let flows = synthetic_flows(n);
        group.bench_with_input(BenchmarkId::new("brent", n), &flows, |b, flows| {
            b.iter(|| {
                internal_rate_of_return(
                    black_box(flows),
                    PeriodBasis::Monthly,
                    SolverConfig::default(),
                )
            });
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for horizon in [120, 360] {
        let request = psc_request(horizon);
        group.bench_with_input(
            BenchmarkId::new("psc_single", horizon),
            &request,
            |b, request| {
                b.iter(|| evaluate(black_box(request)).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_sensitivity_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sensitivity_sweep");
    group.sample_size(10);

    for deltas_per_variable in [2, 4] {
        let deltas: Vec<f64> = (1..=deltas_per_variable / 2)
            .flat_map(|i| {
                let d = 0.1 * i as f64;
                [d, -d]
            })
            .collect();
        let mut request = psc_request(240);
        request.sensitivity_request = [
            SensitivityVariable::OilPrice,
            SensitivityVariable::GasPrice,
            SensitivityVariable::ProductionVolume,
            SensitivityVariable::Opex,
            SensitivityVariable::Capex,
            SensitivityVariable::DeclineRate,
        ]
        .into_iter()
        .map(|variable| SensitivityRequest {
            variable,
            deltas: deltas.clone(),
        })
        .collect();
        let cases = 6 * deltas_per_variable + 1;

        group.bench_with_input(
            BenchmarkId::new("cases", cases),
            &request,
            |b, request| {
                b.iter(|| evaluate(black_box(request)).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_npv,
    bench_irr,
    bench_evaluate,
    bench_sensitivity_sweep
);
criterion_main!(benches);
