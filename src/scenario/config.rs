/// ==============================================================================================
/// =================================== Scenario Configuration ===================================
/// ==============================================================================================

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::functions::{cut_off_c, kappa, mathcal_k, ships_speed, uniform_drift};
use crate::error::{EvolutionError, Result};
use crate::grid::{Mesh, TimeSchedule};
use crate::solvers::EvolutionParams;
use crate::state::{PolicePosition, SimulationState};

/// Largest admissible `dt · (characteristic speed) / min(dx, dy)`.
pub const CFL_LIMIT: f64 = 1.0;

/// Initial pirate density rho(0, x, y).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialPirates {
    /// rho = x · y
    Product,
    /// rho = value
    Uniform { value: f64 },
}

/// Initial ship density A(0, x, y).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialShips {
    /// Sum of indicators of closed boxes `[x_lo, x_hi] × [y_lo, y_hi]`.
    Boxes { boxes: Vec<[f64; 4]> },
    /// A = value
    Uniform { value: f64 },
}

impl InitialPirates {
    fn sample(&self, mesh: &Mesh) -> Array2<f64> {
        match self {
            Self::Product => mesh.field_from_fn(|x, y| x * y),
            Self::Uniform { value } => Array2::from_elem(mesh.dim(), *value),
        }
    }
}

impl InitialShips {
    fn sample(&self, mesh: &Mesh) -> Array2<f64> {
        match self {
            Self::Boxes { boxes } => mesh.field_from_fn(|x, y| {
                boxes
                    .iter()
                    .filter(|[x_lo, x_hi, y_lo, y_hi]| {
                        *x_lo <= x && x <= *x_hi && *y_lo <= y && y <= *y_hi
                    })
                    .count() as f64
            }),
            Self::Uniform { value } => Array2::from_elem(mesh.dim(), *value),
        }
    }
}

/// Scenario parameters (JSON). Missing fields fall back to the reference scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    // Domain (x_1, x_2) × (y_1, y_2) and nodes per axis.
    pub x_1: f64,
    pub x_2: f64,
    pub y_1: f64,
    pub y_2: f64,
    pub n_x: usize,
    pub n_y: usize,

    // Time.
    pub t_max: f64,
    pub dt: Option<f64>,
    pub cfl: f64,
    pub print_every: usize,

    // Pirates.
    pub initial_pirates: InitialPirates,
    pub kappa_eps: f64,
    pub kappa_v_max: f64,
    pub kernel_radius: f64,
    pub a: Vec<f64>,

    // Ships.
    pub initial_ships: InitialShips,
    pub ships_a_max: f64,
    pub ships_v_max: f64,
    pub drift: (f64, f64),

    // Police.
    pub police: Vec<PolicePosition>,
    pub cut_off_radius: f64,

    pub check_finite: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            x_1: 0.0,
            x_2: 10.0,
            y_1: 0.0,
            y_2: 20.0,
            n_x: 200,
            n_y: 100,
            t_max: 10.0,
            dt: None,
            cfl: 0.4,
            print_every: 10,
            initial_pirates: InitialPirates::Product,
            kappa_eps: 0.2,
            kappa_v_max: 1.0,
            kernel_radius: 0.5,
            a: vec![1.0, 1.5, 2.0],
            initial_ships: InitialShips::Boxes {
                boxes: vec![[2.0, 4.0, 2.0, 4.0], [2.0, 4.0, 8.0, 12.0]],
            },
            ships_a_max: 1.0,
            ships_v_max: 1.0,
            drift: (1.0, 0.0),
            police: vec![
                PolicePosition::new(5.0, 11.0),
                PolicePosition::new(2.0, 10.0),
                PolicePosition::new(7.0, 10.0),
            ],
            cut_off_radius: 0.4,
            check_finite: true,
        }
    }
}

/// Everything a run needs, built once from a validated config.
pub struct Scenario {
    pub params: EvolutionParams,
    pub schedule: TimeSchedule,
    pub initial: SimulationState,
    pub check_finite: bool,
}

impl ScenarioConfig {
    /// Read a JSON config; absent keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| EvolutionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| EvolutionError::Serialization {
            path: path.to_path_buf(),
            source,
        })
    }

    #[inline]
    fn spacings(&self) -> (f64, f64) {
        (
            (self.x_2 - self.x_1) / (self.n_x.max(2) - 1) as f64,
            (self.y_2 - self.y_1) / (self.n_y.max(2) - 1) as f64,
        )
    }

    /// Known characteristic speed: ship drift transport plus the kappa bound.
    #[inline]
    fn characteristic_speed(&self) -> f64 {
        let drift = (self.drift.0 * self.drift.0 + self.drift.1 * self.drift.1).sqrt();
        self.ships_v_max.abs() * drift + self.kappa_v_max.abs()
    }

    /// Time step: the explicit `dt`, or `cfl · min(dx, dy) / speed`.
    pub fn time_step(&self) -> f64 {
        if let Some(dt) = self.dt {
            return dt;
        }
        let (dx, dy) = self.spacings();
        let h = dx.min(dy);
        let speed = self.characteristic_speed();
        if speed > 0.0 { self.cfl * h / speed } else { self.cfl * h }
    }

    /// Reject inconsistent or unstable configurations before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(EvolutionError::InvalidConfig(msg)) };

        if !(self.x_2 > self.x_1) || !(self.y_2 > self.y_1) {
            return invalid(format!(
                "domain bounds must be increasing: x [{}, {}], y [{}, {}]",
                self.x_1, self.x_2, self.y_1, self.y_2
            ));
        }
        if self.n_x < 2 || self.n_y < 2 {
            return Err(EvolutionError::DegenerateMesh {
                rows: self.n_y,
                cols: self.n_x,
            });
        }
        if !(self.t_max > 0.0) {
            return invalid(format!("t_max must be positive, got {}", self.t_max));
        }
        if let Some(dt) = self.dt {
            if !(dt > 0.0) || !dt.is_finite() {
                return invalid(format!("dt must be positive and finite, got {dt}"));
            }
        }
        if !(self.cfl > 0.0 && self.cfl <= CFL_LIMIT) {
            return invalid(format!("cfl must lie in (0, {CFL_LIMIT}], got {}", self.cfl));
        }
        if self.print_every == 0 {
            return invalid("print_every must be >= 1".into());
        }
        if self.a.len() != self.police.len() {
            return Err(EvolutionError::LengthMismatch {
                what: "coefficient vector a",
                expected: self.police.len(),
                found: self.a.len(),
            });
        }
        if !(self.kernel_radius > 0.0) || !(self.cut_off_radius > 0.0) {
            return invalid(format!(
                "radii must be positive: kernel {}, cut-off {}",
                self.kernel_radius, self.cut_off_radius
            ));
        }
        if !(self.ships_a_max > 0.0) {
            return invalid(format!("ships_a_max must be positive, got {}", self.ships_a_max));
        }
        if !(self.kappa_eps < 1.0) {
            return invalid(format!("kappa_eps must be < 1, got {}", self.kappa_eps));
        }

        let (dx, dy) = self.spacings();
        let courant = self.time_step() * self.characteristic_speed() / dx.min(dy);
        if courant > CFL_LIMIT {
            return invalid(format!(
                "unstable time step: dt = {}, dx = {dx}, dy = {dy} gives Courant number {courant:.3} > {CFL_LIMIT}",
                self.time_step()
            ));
        }

        Ok(())
    }

    /// Validate, then build mesh, schedule, parameters and initial state.
    pub fn build(&self) -> Result<Scenario> {
        if let Err(err) = self.validate() {
            tracing::warn!(%err, "rejected scenario configuration");
            return Err(err);
        }

        let mesh = Mesh::uniform(self.x_1, self.x_2, self.n_x, self.y_1, self.y_2, self.n_y)?;
        let dt = self.time_step();
        let schedule = TimeSchedule::new(self.t_max, dt, self.print_every)?;

        let kernel = mathcal_k(&mesh.x, &mesh.y, self.kernel_radius);
        let (nu_x, nu_y) = uniform_drift(mesh.dim(), self.drift);

        let initial = SimulationState::from_arrays(
            schedule.times[0],
            self.initial_pirates.sample(&mesh),
            self.initial_ships.sample(&mesh),
            self.police.clone(),
        )?;

        tracing::info!(
            n_x = self.n_x,
            n_y = self.n_y,
            dx = mesh.dx,
            dy = mesh.dy,
            dt,
            steps = schedule.num_steps(),
            police = self.police.len(),
            "scenario built"
        );

        let params = EvolutionParams::new(
            mesh,
            kernel,
            cut_off_c(self.cut_off_radius),
            kappa(self.kappa_eps, self.kappa_v_max),
            self.a.clone(),
            ships_speed(self.ships_a_max, self.ships_v_max),
            nu_x,
            nu_y,
            dt,
        )?;

        Ok(Scenario {
            params,
            schedule,
            initial,
            check_finite: self.check_finite,
        })
    }
}
