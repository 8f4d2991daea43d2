//! Audit trail: provenance for every computed value.
//!
//! Nothing the engine computes may escape without its provenance: every
//! value produced is wrapped with its formula name, the exact inputs
//! consumed, and optional external source citations. The design is an
//! arena of [`AuditRecord`]s owned by a per-evaluation [`AuditTrail`];
//! computed values travel as [`Audited`] handles holding the value and the
//! id of their record. Derived records reference their parents by id, so:
//!
//! - composition is associative: deriving `c` from `b` from `a` yields the
//!   same lineage regardless of grouping;
//! - backward traversal from any headline number reaches every raw input it
//!   depended on ([`AuditTrail::lineage`]);
//! - no reference cycles or `Rc` webs: ids are plain indices, and a trail
//!   serialises flat into the response contract.
//!
//! One `AuditTrail` per evaluation run. Sensitivity cases each build their
//! own; trails are never shared across cases or regimes.
//!
//! # Example
//!
//! ```
//! use fiscal_core::audit::AuditTrail;
//! use fiscal_core::types::Unit;
//!
//! let mut trail = AuditTrail::new();
//! let volume = trail.input("volume_boe", 1_000.0, Unit::Mboe, None);
//! let price = trail.input("oil_price", 70.0, Unit::UsdPerBbl, None);
//!
//! let revenue = trail.derive(
//!     "gross_revenue = volume * price",
//!     volume.value * price.value,
//!     Unit::UsdMm,
//!     &[("volume_boe", volume.value), ("oil_price", price.value)],
//!     &[volume.id, price.id],
//! );
//!
//! // Full backward traversal from the headline number
//! let lineage = trail.lineage(revenue.id);
//! assert_eq!(lineage.len(), 3);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::Unit;

/// Identity of a record within one [`AuditTrail`].
///
/// Ids are only meaningful relative to the trail that issued them; they are
/// assigned densely from zero in creation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditId(pub usize);

/// Provenance record for a single computed value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The value produced
    pub value: f64,
    /// Unit of the value
    pub unit: Unit,
    /// Formula name, e.g. `"royalty = gross_revenue * royalty_rate"`.
    ///
    /// For PSC split selections this names the threshold band used, so
    /// stair-step vs interpolation and which bracket was selected are
    /// reproducible from the record alone.
    pub formula: String,
    /// Named scalar inputs consumed by the formula
    pub inputs: BTreeMap<String, f64>,
    /// Records this value was derived from, by id
    pub parents: Vec<AuditId>,
    /// External source citation (document reference), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_citation: Option<String>,
}

/// A value paired with the id of its audit record.
///
/// Public engine functions return `Audited` rather than bare floats, which
/// guarantees provenance at the type level.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Audited<T = f64> {
    /// The computed value
    pub value: T,
    /// Id of the record describing how it was computed
    pub id: AuditId,
}

/// Arena of audit records for one evaluation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    records: Vec<AuditRecord>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw input value (a leaf of the provenance graph).
    pub fn input(
        &mut self,
        name: &str,
        value: f64,
        unit: Unit,
        source_citation: Option<String>,
    ) -> Audited {
        let mut inputs = BTreeMap::new();
        inputs.insert(name.to_string(), value);
        self.push(AuditRecord {
            value,
            unit,
            formula: format!("input:{name}"),
            inputs,
            parents: Vec::new(),
            source_citation,
        })
    }

    /// Records a derived value with its formula, inputs, and parent records.
    pub fn derive(
        &mut self,
        formula: &str,
        value: f64,
        unit: Unit,
        inputs: &[(&str, f64)],
        parents: &[AuditId],
    ) -> Audited {
        self.push(AuditRecord {
            value,
            unit,
            formula: formula.to_string(),
            inputs: inputs
                .iter()
                .map(|(name, v)| (name.to_string(), *v))
                .collect(),
            parents: parents.to_vec(),
            source_citation: None,
        })
    }

    fn push(&mut self, record: AuditRecord) -> Audited {
        let id = AuditId(self.records.len());
        let value = record.value;
        self.records.push(record);
        Audited { value, id }
    }

    /// Returns the record for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different trail. Ids never cross trail
    /// boundaries in correct usage, so this is a logic error, not a
    /// recoverable condition.
    pub fn record(&self, id: AuditId) -> &AuditRecord {
        &self.records[id.0]
    }

    /// All records, in creation order.
    pub fn records(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Number of records in the trail.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records have been created.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full backward traversal: every record `id` transitively depends on,
    /// including itself, deduplicated, in ascending id order.
    ///
    /// Parents always have smaller ids than children (the arena is
    /// append-only), so ascending id order is a valid evaluation order.
    pub fn lineage(&self, id: AuditId) -> Vec<AuditId> {
        let mut seen = vec![false; self.records.len()];
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if seen[cur.0] {
                continue;
            }
            seen[cur.0] = true;
            stack.extend(self.records[cur.0].parents.iter().copied());
        }
        seen.iter()
            .enumerate()
            .filter_map(|(i, s)| s.then_some(AuditId(i)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_record() {
        let mut trail = AuditTrail::new();
        let a = trail.input("qi", 1000.0, Unit::Boepd, Some("VDR doc 12, p.4".into()));

        let record = trail.record(a.id);
        assert_eq!(record.value, 1000.0);
        assert_eq!(record.formula, "input:qi");
        assert_eq!(record.inputs["qi"], 1000.0);
        assert!(record.parents.is_empty());
        assert_eq!(record.source_citation.as_deref(), Some("VDR doc 12, p.4"));
    }

    #[test]
    fn test_derive_links_parents() {
        let mut trail = AuditTrail::new();
        let a = trail.input("a", 2.0, Unit::UsdMm, None);
        let b = trail.input("b", 3.0, Unit::UsdMm, None);
        let c = trail.derive(
            "c = a + b",
            5.0,
            Unit::UsdMm,
            &[("a", 2.0), ("b", 3.0)],
            &[a.id, b.id],
        );

        let record = trail.record(c.id);
        assert_eq!(record.parents, vec![a.id, b.id]);
        assert_eq!(record.inputs.len(), 2);
    }

    #[test]
    fn test_lineage_transitive() {
        let mut trail = AuditTrail::new();
        let a = trail.input("a", 1.0, Unit::UsdMm, None);
        let b = trail.derive("b = a * 2", 2.0, Unit::UsdMm, &[("a", 1.0)], &[a.id]);
        let _unrelated = trail.input("x", 9.0, Unit::UsdMm, None);
        let c = trail.derive("c = b * 2", 4.0, Unit::UsdMm, &[("b", 2.0)], &[b.id]);

        let lineage = trail.lineage(c.id);
        assert_eq!(lineage, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_lineage_diamond_dedup() {
        // a feeds both b and c, which both feed d: a appears once
        let mut trail = AuditTrail::new();
        let a = trail.input("a", 1.0, Unit::UsdMm, None);
        let b = trail.derive("b", 2.0, Unit::UsdMm, &[], &[a.id]);
        let c = trail.derive("c", 3.0, Unit::UsdMm, &[], &[a.id]);
        let d = trail.derive("d", 5.0, Unit::UsdMm, &[], &[b.id, c.id]);

        let lineage = trail.lineage(d.id);
        assert_eq!(lineage.len(), 4);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut trail = AuditTrail::new();
        let a = trail.input("price", 70.0, Unit::UsdPerBbl, None);
        trail.derive("x = price", 70.0, Unit::UsdPerBbl, &[("price", 70.0)], &[a.id]);

        let json = serde_json::to_string(&trail).unwrap();
        let back: AuditTrail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trail);
    }
}
