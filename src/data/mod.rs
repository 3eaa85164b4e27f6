//! Built-in dataset presets.

pub mod presets;

pub use presets::*;
