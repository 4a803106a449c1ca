/// ==============================================================================================
/// ===================================== Top-Level Evolve =======================================
/// ==============================================================================================

use std::path::Path;

use indicatif::ProgressBar;

use super::coupled::{one_step_evolution, EvolutionParams};
use crate::error::{EvolutionError, Result};
use crate::grid::TimeSchedule;
use crate::state::{SimulationState, SnapshotSink};

/// Snapshot label for the `print_number`-th save: `saving_0001`, `saving_0002`, ...
#[inline]
pub fn snapshot_name(print_number: usize) -> String {
    format!("saving_{print_number:04}")
}

/// Integrate the coupled system over `schedule` and persist at print steps.
///     Pipeline per step:
///         one_step_evolution -> (finiteness check) -> stamp time -> (persist).
/// Inputs:
///     - `initial`: state at `schedule.times[0]`
///     - `sink`: persistence collaborator, only ever handed read-only views
///     - `check_finite`: abort with `NumericalDivergence` on NaN / infinity
/// The first error aborts the run; nothing is retried.
pub fn evolve<S: SnapshotSink>(
    initial: SimulationState,          // initial state (consumed)
    params: &EvolutionParams,          // immutable run parameters
    schedule: &TimeSchedule,           // time points + print flags
    output_path: &Path,                // snapshot directory
    sink: &mut S,                      // persistence
    check_finite: bool,                // post-step NaN guard
    progress: Option<&ProgressBar>,    // optional progress bar
) -> Result<SimulationState> {
    if (schedule.dt - params.dt).abs() > f64::EPSILON * params.dt.abs().max(1.0) {
        return Err(EvolutionError::InvalidConfig(format!(
            "schedule step {} differs from evolution step {}",
            schedule.dt, params.dt
        )));
    }

    let mut current = initial;
    let mut print_number = 1;

    for k in 1..schedule.times.len() {
        let mut next = one_step_evolution(&current, params)?;
        next.time = schedule.times[k];

        if check_finite {
            if let Some(what) = next.first_non_finite() {
                tracing::warn!(step = k, time = next.time, what, "non-finite state");
                return Err(EvolutionError::NumericalDivergence {
                    step: k,
                    time: next.time,
                    what,
                });
            }
        }

        tracing::debug!(
            step = k,
            time = next.time,
            pirate_mass = next.pirate_mass(params.mesh.cell_area()),
            ship_mass = next.ship_mass(params.mesh.cell_area()),
            "step"
        );

        if schedule.printing.get(k).copied().unwrap_or(false) {
            let name = snapshot_name(print_number);
            sink.save(
                output_path,
                &name,
                next.time,
                &next.pirates,
                &next.ships,
                &next.police,
            )?;
            tracing::info!(name = %name, time = next.time, "snapshot saved");
            print_number += 1;
        }

        current = next;

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    Ok(current)
}
