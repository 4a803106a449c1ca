/// ==============================================================================================
/// ================================ Upwind Transport (Ship Field) ===============================
/// ==============================================================================================

use ndarray::{Array2, Zip};

use crate::error::{ensure_shape, Result};

/// Donor-cell face flux: upwind on the sign of the face velocity.
#[inline]
fn upwind_flux(v_face: f64, q_left: f64, q_right: f64) -> f64 {
    v_face.max(0.0) * q_left + v_face.min(0.0) * q_right
}

/// One explicit upwind step of the ship equation:
///     A_new = A - dt · div( speed(A) · v · A )
///     Discretization:
///         - q = speed(A) · A at cell centres
///         - face velocity = mean of the two adjacent cell velocities
///         - face flux     = max(v_f, 0) · q_left + min(v_f, 0) · q_right
///         - boundaries are transmissive (ghost cell copies the boundary cell)
/// Notes:
///     - Conservative: interior face fluxes cancel pairwise.
///     - Zero velocity everywhere leaves `density` unchanged.
///     - No CFL check; `dt` is assumed to satisfy the configured bound.
pub fn one_step_hyperbolic(
    density: &Array2<f64>,                        // A at t
    speed: &(dyn Fn(f64) -> f64 + Send + Sync),   // ship speed as a function of A
    vel_x: &Array2<f64>,                          // velocity, x component
    vel_y: &Array2<f64>,                          // velocity, y component
    dx: f64,                                      // column spacing
    dy: f64,                                      // row spacing
    dt: f64,                                      // step size
) -> Result<Array2<f64>> {
    let dim = density.dim();
    ensure_shape("ship velocity x", dim, vel_x.dim())?;
    ensure_shape("ship velocity y", dim, vel_y.dim())?;

    let (rows, cols) = dim;
    if rows == 0 || cols == 0 {
        return Ok(density.clone());
    }
    let q = density.mapv(|a| speed(a) * a);

    // Face i sits between cells i - 1 and i (clamped at the ends).
    let flux_x = Array2::from_shape_fn((rows, cols + 1), |(j, i)| {
        let l = i.saturating_sub(1);
        let r = i.min(cols - 1);
        let v_face = 0.5 * (vel_x[(j, l)] + vel_x[(j, r)]);
        upwind_flux(v_face, q[(j, l)], q[(j, r)])
    });
    let flux_y = Array2::from_shape_fn((rows + 1, cols), |(j, i)| {
        let b = j.saturating_sub(1);
        let t = j.min(rows - 1);
        let v_face = 0.5 * (vel_y[(b, i)] + vel_y[(t, i)]);
        upwind_flux(v_face, q[(b, i)], q[(t, i)])
    });

    Ok(Zip::indexed(density).map_collect(|(j, i), &a| {
        let dfx = (flux_x[(j, i + 1)] - flux_x[(j, i)]) / dx;
        let dfy = (flux_y[(j + 1, i)] - flux_y[(j, i)]) / dy;
        a - dt * (dfx + dfy)
    }))
}
