/// ==============================================================================================
/// ================================= Joint Simulation State =====================================
/// ==============================================================================================

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_shape, Result};

/// Position of one police vessel. Identity is the index in the owning `Vec`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicePosition {
    pub x: f64,
    pub y: f64,
}

impl PolicePosition {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PolicePosition {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Complete state at one time instant.
///     - `pirates`: rho, pirate density (mesh shape)
///     - `ships`:   A, ship density (mesh shape)
///     - `police`:  M positions, M fixed for the whole run
///     - `step` / `time`: bookkeeping only, never read by the evolution operator
/// A step never mutates a state in place; it builds the next one.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub step: usize,
    pub time: f64,
    pub pirates: Array2<f64>,
    pub ships: Array2<f64>,
    pub police: Vec<PolicePosition>,
}

impl SimulationState {
    /// Build the state at `time`, checking that both densities share one shape.
    pub fn from_arrays(
        time: f64,
        pirates: Array2<f64>,
        ships: Array2<f64>,
        police: Vec<PolicePosition>,
    ) -> Result<Self> {
        ensure_shape("ship density", pirates.dim(), ships.dim())?;
        Ok(Self {
            step: 0,
            time,
            pirates,
            ships,
            police,
        })
    }

    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        self.pirates.dim()
    }

    #[inline]
    pub fn num_police(&self) -> usize {
        self.police.len()
    }

    /// Discrete integral of the pirate density.
    #[inline]
    pub fn pirate_mass(&self, cell_area: f64) -> f64 {
        cell_area * self.pirates.sum()
    }

    /// Discrete integral of the ship density.
    #[inline]
    pub fn ship_mass(&self, cell_area: f64) -> f64 {
        cell_area * self.ships.sum()
    }

    /// Name of the first component holding a NaN / infinity, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        if self.pirates.iter().any(|v| !v.is_finite()) {
            return Some("pirate density");
        }
        if self.ships.iter().any(|v| !v.is_finite()) {
            return Some("ship density");
        }
        if self
            .police
            .iter()
            .any(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Some("police position");
        }
        None
    }
}
