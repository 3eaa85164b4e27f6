//! Stacked-series construction.
//!
//! - grouping + cumulative-band stacking (`stack`)
//! - yearly aggregates for axis sizing (`yearly_totals`, `max_yearly_total`)

pub mod stack;

pub use stack::*;
