//! Coupled pirates / ships / police dynamics on a 2D mesh.
//!
//! - pirates: nonlinear parabolic PDE, explicit Euler
//! - ships: transport PDE with density-dependent speed, first-order upwind
//! - police: overdamped agents, forward Euler
//!
//! [`solvers::one_step_evolution`] advances the joint state by one step;
//! [`solvers::evolve`] drives it over a [`grid::TimeSchedule`].

pub mod error;
pub mod examples;
pub mod grid;
pub mod scenario;
pub mod solvers;
pub mod state;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use error::{EvolutionError, Result};
