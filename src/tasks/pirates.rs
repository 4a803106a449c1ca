use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::scenario::ScenarioConfig;
use crate::solvers::evolve;
use crate::state::{JsonSnapshotWriter, SimulationState};

/// ==============================================================================================
/// ===================================== Experiment Runner ======================================
/// ==============================================================================================

/// Run one pirates / ships / police scenario and persist snapshots as JSON.
///     Inputs:
///         - `config`: scenario parameters (validated here)
///         - `output_path`: snapshot directory (`saving_NNNN.json`)
///     Returns the final state.
pub fn run(config: &ScenarioConfig, output_path: &Path) -> Result<SimulationState> {
    let scenario = config.build().context("building scenario")?;

    let pb = ProgressBar::new(scenario.schedule.num_steps() as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("progress bar template")?
            .progress_chars("=>-"),
    );
    pb.set_message(format!("t_max {}", config.t_max));

    let mut writer = JsonSnapshotWriter::new();
    let final_state = evolve(
        scenario.initial,
        &scenario.params,
        &scenario.schedule,
        output_path,
        &mut writer,
        scenario.check_finite,
        Some(&pb),
    )
    .with_context(|| format!("evolving scenario into {}", output_path.display()))?;
    pb.finish_with_message("done");

    tracing::info!(
        snapshots = writer.written().len(),
        time = final_state.time,
        "run finished"
    );
    Ok(final_state)
}
