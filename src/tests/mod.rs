mod config;
mod operators;

use ndarray::Array2;

use crate::grid::Mesh;
use crate::solvers::{CutOffFn, EvolutionParams, PointwiseFn};

/// Cut-off that vanishes everywhere (decouples police and pirate-induced velocity).
pub(crate) fn zero_cut_off() -> Box<CutOffFn> {
    Box::new(|x: &Array2<f64>, _y: &Array2<f64>| Array2::zeros(x.dim()))
}

pub(crate) fn constant(value: f64) -> Box<PointwiseFn> {
    Box::new(move |_: f64| value)
}

/// Parameters on `mesh` with zero drift.
pub(crate) fn params_on(
    mesh: Mesh,
    kernel: Array2<f64>,
    cut_off: Box<CutOffFn>,
    kappa: Box<PointwiseFn>,
    a: Vec<f64>,
    dt: f64,
) -> EvolutionParams {
    let dim = mesh.dim();
    EvolutionParams::new(
        mesh,
        kernel,
        cut_off,
        kappa,
        a,
        constant(1.0),
        Array2::zeros(dim),
        Array2::zeros(dim),
        dt,
    )
    .expect("params")
}
