//! `call-bands` library crate.
//!
//! The binary (`cb`) is a thin wrapper around this library so that:
//!
//! - the load/stack pipeline is testable without spawning processes
//! - modules are reusable (e.g., a future renderer front-end, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
pub mod series;
