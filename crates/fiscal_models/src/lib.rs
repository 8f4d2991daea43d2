//! # fiscal_models: Domain Data for the Upstream Fiscal & Valuation Engine
//!
//! ## Layer 2 (Domain Data) Role
//!
//! This crate provides the validated input model the engine computes over:
//! - Decline curves and the production profile builder (`production`)
//! - Price decks with strict, gap-detecting lookup (`deck`)
//! - Operating and capital cost structures (`costs`)
//! - Fiscal regime definitions: concessionary, production sharing, and
//!   service contracts (`regimes`)
//!
//! ## Design Principles
//!
//! - **Enum-based regimes** for static dispatch: the three regime families
//!   share almost no behaviour, so a closed tagged enum keeps each family's
//!   period-stepping logic auditable in one place (no trait objects).
//! - **Validated constructors**: every type rejects invalid parameters at
//!   construction (`Result`-returning `new`), so Layer 3 folds never
//!   re-validate mid-run.
//! - **Immutable after construction**: all inputs are plain data, freely
//!   shared across parallel sensitivity cases.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod costs;
pub mod deck;
pub mod production;
pub mod regimes;
