use crate::error::{EvolutionError, Result};

/// Fixed-step time schedule.
///     - `times[k] = k · dt`, `k = 0..=n_steps`
///     - `printing[k]`: persist the state reached at `times[k]`
#[derive(Clone, Debug)]
pub struct TimeSchedule {
    pub times: Vec<f64>,
    pub dt: f64,
    pub printing: Vec<bool>,
}

impl TimeSchedule {
    /// Cover `[0, t_max]` with steps of `dt`; print every `print_every` steps and at the end.
    pub fn new(t_max: f64, dt: f64, print_every: usize) -> Result<Self> {
        if !(t_max > 0.0) || !(dt > 0.0) {
            return Err(EvolutionError::InvalidConfig(format!(
                "time horizon and step must be positive: t_max = {t_max}, dt = {dt}"
            )));
        }
        if print_every == 0 {
            return Err(EvolutionError::InvalidConfig(
                "print_every must be >= 1".into(),
            ));
        }

        // Guard against 10.0 / 0.1 landing a hair above an integer.
        let n_steps = ((t_max / dt) - 1e-9).ceil().max(1.0) as usize;
        let times = (0..=n_steps).map(|k| k as f64 * dt).collect();
        let printing = (0..=n_steps)
            .map(|k| k > 0 && (k % print_every == 0 || k == n_steps))
            .collect();

        Ok(Self { times, dt, printing })
    }

    /// Number of steps the driver will take.
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.times.len().saturating_sub(1)
    }
}
