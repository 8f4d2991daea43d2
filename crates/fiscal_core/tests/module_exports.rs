//! Integration tests for module exports.
//!
//! Verify that all public modules and types are accessible via absolute
//! paths, and that the math layer composes across module boundaries.

/// Test that math modules are accessible via absolute path.
#[test]
fn test_math_module_exports() {
    use fiscal_core::math::integrate::adaptive_simpson;
    use fiscal_core::math::interpolate::LinearInterpolator;
    use fiscal_core::math::solvers::{BrentSolver, SolverConfig};

    let solver = BrentSolver::new(SolverConfig::<f64>::default());
    let root = solver.find_root(|x| x - 1.0, 0.0, 2.0).unwrap();
    assert!((root - 1.0).abs() < 1e-10);

    let interp = LinearInterpolator::<f64>::new(&[0.0, 1.0], &[0.0, 2.0]).unwrap();
    assert!((interp.eval(0.5) - 1.0).abs() < 1e-12);

    let area = adaptive_simpson(|x: f64| x, 0.0, 2.0, 1e-10);
    assert!((area - 2.0).abs() < 1e-9);
}

/// Test that value types are accessible via absolute path.
#[test]
fn test_types_module_exports() {
    use fiscal_core::types::error::{DeckError, EngineError};
    use fiscal_core::types::{PeriodBasis, Product, ProductVolumes, Unit};

    let v = ProductVolumes::new().with(Product::Oil, 10.0);
    assert_eq!(v.get(Product::Oil), 10.0);
    assert_eq!(Unit::Boepd.symbol(), "boepd");
    assert_eq!(PeriodBasis::Annual.periods_per_year(), 1.0);

    let err: EngineError = DeckError::Gap {
        period: 0,
        product: Product::Gas,
    }
    .into();
    assert!(matches!(err, EngineError::PriceDeck(_)));
}

/// Test the audit arena across a realistic derivation chain.
#[test]
fn test_audit_module_exports() {
    use fiscal_core::audit::{AuditTrail, Audited};
    use fiscal_core::types::Unit;

    let mut trail = AuditTrail::new();
    let q = trail.input("volume", 365_000.0, Unit::Mboe, None);
    let p = trail.input("price", 70.0, Unit::UsdPerBbl, None);
    let rev: Audited = trail.derive(
        "gross_revenue = volume * price",
        q.value * p.value / 1e6,
        Unit::UsdMm,
        &[("volume", q.value), ("price", p.value)],
        &[q.id, p.id],
    );

    assert!((rev.value - 25.55).abs() < 1e-9);
    assert_eq!(trail.lineage(rev.id).len(), 3);
}
