//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized call observations (`Observation`)
//! - the shared category ordering (`CategoryOrder`)
//! - stacked output shapes (`StackedBand`, `DateStack`, `StackedSeries`)
//! - input schema configuration (`TableSchema`, `TableShape`)
//! - the portable series export schema (`SeriesFile`)

pub mod types;

pub use types::*;
