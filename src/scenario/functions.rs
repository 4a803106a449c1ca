/// ==============================================================================================
/// ================================ Reference Model Functions ===================================
/// ==============================================================================================

use ndarray::{Array1, Array2, Zip};

use crate::solvers::{CutOffFn, PointwiseFn};

/// Normalizers below this value are treated as "support not resolved" and skipped.
pub const CUT_OFF_MIN_NORMALIZER: f64 = 0.3;

/// Compact paraboloid bump `(r² - x² - y²)` on the open disc of radius `r`, zero outside.
#[inline]
fn bump(x: f64, y: f64, radius: f64) -> f64 {
    let r2 = radius * radius;
    let s = x * x + y * y;
    if s < r2 { r2 - s } else { 0.0 }
}

/// Composite trapezoidal rule of samples `vals` over nodes `t`.
#[inline]
fn trapz(vals: &[f64], t: &[f64]) -> f64 {
    vals.windows(2)
        .zip(t.windows(2))
        .map(|(v, s)| 0.5 * (s[1] - s[0]) * (v[0] + v[1]))
        .sum()
}

/// numpy `trapz(trapz(k, x), y)`: integrate every row along `x`, then the result along `y`.
fn trapz_2d(k: &Array2<f64>, x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let x = x.to_vec();
    let rows: Vec<f64> = k.rows().into_iter().map(|row| trapz(&row.to_vec(), &x)).collect();
    trapz(&rows, &y.to_vec())
}

/// Standard mollifier on the grid spanned by the axes `x`, `y`:
///     k = (r² - x² - y²)_+, normalized by its trapezoidal integral.
/// A bump that misses every node (zero integral) is returned unnormalized.
pub fn std_mollifier(x: &Array1<f64>, y: &Array1<f64>, radius: f64) -> Array2<f64> {
    let k = Array2::from_shape_fn((y.len(), x.len()), |(j, i)| bump(x[i], y[j], radius));
    let c = trapz_2d(&k, x, y);
    if c > 0.0 { k.mapv(|v| v / c) } else { k }
}

/// Kernel mathcal_K of the pirate equation.
#[inline]
pub fn mathcal_k(x: &Array1<f64>, y: &Array1<f64>, radius: f64) -> Array2<f64> {
    std_mollifier(x, y, radius)
}

/// Cut-off C evaluated on coordinate arrays.
///     C = (r² - x² - y²) on x² + y² < r², normalized by Σ C · Δx · Δy
///     where Δx, Δy are read off the argument arrays; normalizers below
///     `CUT_OFF_MIN_NORMALIZER` leave the values raw.
pub fn cut_off_c(radius: f64) -> Box<CutOffFn> {
    Box::new(move |x: &Array2<f64>, y: &Array2<f64>| {
        let k = Zip::from(x).and(y).map_collect(|&x, &y| bump(x, y, radius));

        let (rows, cols) = x.dim();
        let step_x = if cols > 1 { x[(0, 1)] - x[(0, 0)] } else { 0.0 };
        let step_y = if rows > 1 { y[(1, 0)] - y[(0, 0)] } else { 0.0 };
        let c = k.sum() * step_x * step_y;

        if c < CUT_OFF_MIN_NORMALIZER { k } else { k.mapv(|v| v / c) }
    })
}

/// Normalization kappa of the pirate flux:
///     kappa(s) = v_max · (s - eps) / (1 - eps) on eps < s < 1, zero elsewhere.
pub fn kappa(eps: f64, v_max: f64) -> Box<PointwiseFn> {
    Box::new(move |s: f64| {
        if s > eps && s < 1.0 {
            v_max * (s - eps) / (1.0 - eps)
        } else {
            0.0
        }
    })
}

/// Speed of ships: `v_max - A / A_max`.
pub fn ships_speed(a_max: f64, v_max: f64) -> Box<PointwiseFn> {
    Box::new(move |a: f64| v_max - a / a_max)
}

/// Constant geometric drift `(nu_x, nu_y)` on a grid of `dim`.
pub fn uniform_drift(dim: (usize, usize), nu: (f64, f64)) -> (Array2<f64>, Array2<f64>) {
    (Array2::from_elem(dim, nu.0), Array2::from_elem(dim, nu.1))
}
