/// ==============================================================================================
/// ================================ Coupled One-Step Evolution ==================================
/// ==============================================================================================

use ndarray::{Array2, Zip};
use rayon::prelude::*;

use super::hyperbolic::one_step_hyperbolic;
use super::ode::ode;
use super::operators::{convolve_same, gradient};
use super::parabolic::one_step_parabolic;
use crate::error::{ensure_shape, EvolutionError, Result};
use crate::grid::Mesh;
use crate::state::{PolicePosition, SimulationState};

/// Scalar-to-scalar model function (kappa, ship speed), applied pointwise.
pub type PointwiseFn = dyn Fn(f64) -> f64 + Send + Sync;

/// Cut-off evaluated on whole coordinate arrays: `C(X, Y)` with `X`, `Y` mesh-shaped.
///     Array-level so that a cut-off may normalize over the grid it is evaluated on.
pub type CutOffFn = dyn Fn(&Array2<f64>, &Array2<f64>) -> Array2<f64> + Send + Sync;

/// Immutable scenario parameters for one run.
///     Layout:
///         - `mesh`:        coordinates and spacings
///         - `kernel`:      mathcal_K sampled on a grid (convolution weights)
///         - `cut_off`:     C, used for police source, ship velocity and police forces
///         - `kappa`:       normalization in the pirate flux
///         - `a`:           per-vessel source coefficients (len M)
///         - `ships_speed`: speed of ships as a function of their density
///         - `nu_x`/`nu_y`: geometric drift of ships (mesh shape)
///         - `dt`:          time step
pub struct EvolutionParams {
    pub mesh: Mesh,
    pub kernel: Array2<f64>,
    pub cut_off: Box<CutOffFn>,
    pub kappa: Box<PointwiseFn>,
    pub a: Vec<f64>,
    pub ships_speed: Box<PointwiseFn>,
    pub nu_x: Array2<f64>,
    pub nu_y: Array2<f64>,
    pub dt: f64,
}

impl EvolutionParams {
    /// Bundle the run parameters, checking drift shapes and the step size once.
    pub fn new(
        mesh: Mesh,
        kernel: Array2<f64>,
        cut_off: Box<CutOffFn>,
        kappa: Box<PointwiseFn>,
        a: Vec<f64>,
        ships_speed: Box<PointwiseFn>,
        nu_x: Array2<f64>,
        nu_y: Array2<f64>,
        dt: f64,
    ) -> Result<Self> {
        ensure_shape("drift nu_x", mesh.dim(), nu_x.dim())?;
        ensure_shape("drift nu_y", mesh.dim(), nu_y.dim())?;
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(EvolutionError::InvalidConfig(format!(
                "time step must be positive and finite, got {dt}"
            )));
        }

        Ok(Self {
            mesh,
            kernel,
            cut_off,
            kappa,
            a,
            ships_speed,
            nu_x,
            nu_y,
            dt,
        })
    }

    /// Evaluate the cut-off and reject a result that does not match the mesh.
    #[inline]
    fn cut_off_at(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<Array2<f64>> {
        let c = (self.cut_off)(x, y);
        ensure_shape("cut-off output", self.mesh.dim(), c.dim())?;
        Ok(c)
    }

    /// `C(xx - x_i, yy - y_i)`: cut-off centred on a police vessel.
    #[inline]
    fn cut_off_around(&self, p: PolicePosition) -> Result<Array2<f64>> {
        self.cut_off_at(
            &self.mesh.xx.mapv(|x| x - p.x),
            &self.mesh.yy.mapv(|y| y - p.y),
        )
    }
}

/// Preconditions of a step: every array on the mesh, one coefficient per vessel.
fn check_preconditions(state: &SimulationState, params: &EvolutionParams) -> Result<()> {
    let dim = state.pirates.dim();
    ensure_shape("ship density", dim, state.ships.dim())?;
    ensure_shape("x-mesh", dim, params.mesh.xx.dim())?;
    ensure_shape("y-mesh", dim, params.mesh.yy.dim())?;
    ensure_shape("drift nu_x", dim, params.nu_x.dim())?;
    ensure_shape("drift nu_y", dim, params.nu_y.dim())?;

    let (rows, cols) = dim;
    if rows < 2 || cols < 2 {
        return Err(EvolutionError::DegenerateMesh { rows, cols });
    }

    if params.a.len() != state.police.len() {
        return Err(EvolutionError::LengthMismatch {
            what: "coefficient vector a",
            expected: state.police.len(),
            found: params.a.len(),
        });
    }
    Ok(())
}

/// Pirate equation right-hand side, flux part:
///     -div( kappa(|grad K*A|) · grad(K*A) · rho )
fn pirate_flux_divergence(state: &SimulationState, params: &EvolutionParams) -> Array2<f64> {
    let (dx, dy) = (params.mesh.dx, params.mesh.dy);
    let cell_area = params.mesh.cell_area();

    let potential = convolve_same(state.ships.view(), params.kernel.view()).mapv(|v| cell_area * v);
    let (grad_y, grad_x) = gradient(potential.view(), dy, dx);

    let kappa = &params.kappa;
    let weight = Zip::from(&grad_x)
        .and(&grad_y)
        .and(&state.pirates)
        .map_collect(|&gx, &gy, &rho| kappa((gx * gx + gy * gy).sqrt()) * rho);
    let flux_x = Zip::from(&weight).and(&grad_x).map_collect(|&w, &g| w * g);
    let flux_y = Zip::from(&weight).and(&grad_y).map_collect(|&w, &g| w * g);

    // Each flux component is differentiated with a full gradient and only its own
    // axis is kept. Kept as-is; the scheme is due a numerical review.
    let (_, div1) = gradient(flux_x.view(), dy, dx);
    let (div2, _) = gradient(flux_y.view(), dy, dx);

    Zip::from(&div1).and(&div2).map_collect(|&d1, &d2| -d1 - d2)
}

/// Per-vessel force on police vessel `p`:
///     F1: density-weighted attraction  dx·dy · Σ C(d - X) · rho · A · (X - d)
///     F2: cohesion                     Σ_k d_k - M · d
///     F3: control, reserved (always zero)
fn police_force(
    p: PolicePosition,
    state: &SimulationState,
    params: &EvolutionParams,
    police_sum: (f64, f64),
) -> Result<(f64, f64)> {
    let mesh = &params.mesh;
    let m = state.police.len() as f64;

    let c = params.cut_off_at(&mesh.xx.mapv(|x| p.x - x), &mesh.yy.mapv(|y| p.y - y))?;
    let (mut sx, mut sy) = (0.0, 0.0);
    Zip::from(&c)
        .and(&state.pirates)
        .and(&state.ships)
        .and(&mesh.xx)
        .and(&mesh.yy)
        .for_each(|&c, &rho, &a, &x, &y| {
            let w = c * rho * a;
            sx += w * (x - p.x);
            sy += w * (y - p.y);
        });
    let f1 = (mesh.cell_area() * sx, mesh.cell_area() * sy);

    let f2 = (police_sum.0 - m * p.x, police_sum.1 - m * p.y);

    let f3 = (0.0, 0.0);

    Ok((f1.0 + f2.0 + f3.0, f1.1 + f2.1 + f3.1))
}

/// Ship velocity field `(vel_x, vel_y)`:
///     I1 = -dx·dy · ( rho * (X·C(X, Y)), rho * (Y·C(X, Y)) )     pirate repulsion
///     I2 = Σ_i C(X - d_i) · (d_i - X)                              police repulsion
///     vel = I1 + I2 + nu
/// `around_police[i]` is the cut-off centred on vessel `i`.
pub(crate) fn ship_velocity(
    state: &SimulationState,
    params: &EvolutionParams,
    around_police: &[Array2<f64>],
) -> Result<(Array2<f64>, Array2<f64>)> {
    let mesh = &params.mesh;
    let cell_area = mesh.cell_area();

    let c0 = params.cut_off_at(&mesh.xx, &mesh.yy)?;
    let kernel_x = Zip::from(&mesh.xx).and(&c0).map_collect(|&x, &c| x * c);
    let kernel_y = Zip::from(&mesh.yy).and(&c0).map_collect(|&y, &c| y * c);
    let i1_x = convolve_same(state.pirates.view(), kernel_x.view()).mapv(|v| -cell_area * v);
    let i1_y = convolve_same(state.pirates.view(), kernel_y.view()).mapv(|v| -cell_area * v);

    let mut i2_x = mesh.zeros();
    let mut i2_y = mesh.zeros();
    for (p, c) in state.police.iter().zip(around_police) {
        Zip::from(&mut i2_x)
            .and(&mut i2_y)
            .and(c)
            .and(&mesh.xx)
            .and(&mesh.yy)
            .for_each(|ix, iy, &c, &x, &y| {
                *ix += c * (p.x - x);
                *iy += c * (p.y - y);
            });
    }

    let vel_x = Zip::from(&i1_x)
        .and(&i2_x)
        .and(&params.nu_x)
        .map_collect(|&a, &b, &nu| a + b + nu);
    let vel_y = Zip::from(&i1_y)
        .and(&i2_y)
        .and(&params.nu_y)
        .map_collect(|&a, &b, &nu| a + b + nu);

    Ok((vel_x, vel_y))
}

/// Advance the joint state `(rho, A, d)` by one step of `params.dt`.
///     Pipeline:
///         (1) aggregate police sums (once, O(M))
///         (2) pirate flux divergence + police source -> parabolic step
///         (3) ship velocity (pirate repulsion + police repulsion + drift) -> upwind step
///         (4) per-vessel forces -> forward Euler
/// Notes:
///     - Reads only from `state`; returns a fresh state (step + 1, time + dt).
///     - The pirate / ship updates and the per-vessel forces run in parallel but
///       each result is a fixed sequential reduction, so outputs are bit-identical
///       across runs and thread counts.
pub fn one_step_evolution(
    state: &SimulationState,
    params: &EvolutionParams,
) -> Result<SimulationState> {
    check_preconditions(state, params)?;

    let mesh = &params.mesh;
    let dt = params.dt;

    // (1) Aggregate sums reused by every vessel.
    let police_sum = state
        .police
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));

    // Cut-offs centred on each vessel: shared by the pirate source and ship velocity.
    let around_police = state
        .police
        .iter()
        .map(|&p| params.cut_off_around(p))
        .collect::<Result<Vec<_>>>()?;

    let (pirates_new, ships_new) = rayon::join(
        // (2) Pirates.
        || -> Result<Array2<f64>> {
            let div = pirate_flux_divergence(state, params);

            let mut f = mesh.zeros();
            for (a_i, c) in params.a.iter().zip(&around_police) {
                Zip::from(&mut f).and(c).for_each(|f, &c| *f += a_i * c);
            }
            let source = f.mapv(|v| -v);

            one_step_parabolic(&state.pirates, mesh, &div, &source, dt)
        },
        // (3) Ships.
        || -> Result<Array2<f64>> {
            let (vel_x, vel_y) = ship_velocity(state, params, &around_police)?;

            one_step_hyperbolic(
                &state.ships,
                &*params.ships_speed,
                &vel_x,
                &vel_y,
                mesh.dx,
                mesh.dy,
                dt,
            )
        },
    );

    // (4) Police, in index order.
    let police_new = state
        .police
        .par_iter()
        .map(|&p| -> Result<PolicePosition> {
            let (fx, fy) = police_force(p, state, params, police_sum)?;
            Ok(ode(fx, fy, p, dt))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SimulationState {
        step: state.step + 1,
        time: state.time + dt,
        pirates: pirates_new?,
        ships: ships_new?,
        police: police_new,
    })
}
