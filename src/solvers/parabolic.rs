use ndarray::{Array2, Zip};

use crate::error::{ensure_shape, Result};
use crate::grid::Mesh;

/// One explicit Euler step of the pirate equation:
///     rho_new = rho + dt · (flux_divergence + source)
/// Notes:
///     - No stability check; `dt` is assumed to satisfy the configured bound.
///     - Every array must have the mesh's shape.
pub fn one_step_parabolic(
    density: &Array2<f64>,         // rho at t
    mesh: &Mesh,                   // shape reference
    flux_divergence: &Array2<f64>, // -div(kappa · grad · rho)
    source: &Array2<f64>,          // -f (police suppression)
    dt: f64,                       // step size
) -> Result<Array2<f64>> {
    let dim = mesh.dim();
    ensure_shape("pirate density", dim, density.dim())?;
    ensure_shape("flux divergence", dim, flux_divergence.dim())?;
    ensure_shape("pirate source", dim, source.dim())?;

    Ok(Zip::from(density)
        .and(flux_divergence)
        .and(source)
        .map_collect(|&rho, &div, &f| rho + dt * (div + f)))
}
