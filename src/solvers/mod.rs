pub mod coupled;
pub mod evolve;
pub mod hyperbolic;
pub mod ode;
pub mod operators;
pub mod parabolic;

pub use coupled::{one_step_evolution, CutOffFn, EvolutionParams, PointwiseFn};
pub use evolve::{evolve, snapshot_name};
pub use hyperbolic::one_step_hyperbolic;
pub use ode::ode;
pub use operators::{convolve_same, gradient};
pub use parabolic::one_step_parabolic;
