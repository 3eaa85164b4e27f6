//! Shared "stack pipeline" logic used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> normalize -> stack -> yearly aggregates
//!
//! Commands can then focus on presentation (summary vs totals vs exports).

use crate::domain::LoadConfig;
use crate::error::AppError;
use crate::io::ingest::{self, IngestedData};
use crate::series::{self, StackOutput};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub output: StackOutput,
    pub yearly_totals: Vec<(i32, u64)>,
    pub max_yearly_total: u64,
}

/// Execute the full load/stack pipeline and return the computed outputs.
pub fn run_stack(config: &LoadConfig) -> Result<RunOutput, AppError> {
    let ingest = ingest::load_observations(config)?;

    let output = series::stack(&ingest.observations, &config.order, config.unknown)?;

    let yearly_totals = series::yearly_totals(&ingest.observations);
    let max_yearly_total = series::max_yearly_total(&ingest.observations);

    Ok(RunOutput {
        ingest,
        output,
        yearly_totals,
        max_yearly_total,
    })
}
