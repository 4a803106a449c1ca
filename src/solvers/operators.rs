/// ==============================================================================================
/// ================================== Discrete Field Operators ==================================
/// ==============================================================================================

use ndarray::{Array2, ArrayView2, Axis, Zip};

/// 2-D convolution in "same" mode.
///     Output shape = `input` shape; the full convolution
///         full[n, m] = Σ_{p,q} input[n - p, m - q] · kernel[p, q]
///     is cropped at offset `((kr - 1) / 2, (kc - 1) / 2)`, zero fill outside `input`.
/// Notes:
///     - Zero kernel taps are skipped (cut-offs have compact support).
///     - Output rows are computed in parallel; each entry is an independent
///       sequential sum, so the result does not depend on the thread count.
pub fn convolve_same(input: ArrayView2<f64>, kernel: ArrayView2<f64>) -> Array2<f64> {
    let (rows, cols) = input.dim();
    let (kr, kc) = kernel.dim();
    let r0 = kr.saturating_sub(1) / 2;
    let c0 = kc.saturating_sub(1) / 2;

    let taps: Vec<(isize, isize, f64)> = kernel
        .indexed_iter()
        .filter(|(_, w)| **w != 0.0)
        .map(|((p, q), &w)| (r0 as isize - p as isize, c0 as isize - q as isize, w))
        .collect();

    let mut out = Array2::zeros((rows, cols));
    Zip::indexed(&mut out).par_for_each(|(n, m), o| {
        let mut acc = 0.0;
        for &(dp, dq, w) in &taps {
            let k = n as isize + dp;
            let l = m as isize + dq;
            if k < 0 || l < 0 || k as usize >= rows || l as usize >= cols {
                continue;
            }
            acc += input[(k as usize, l as usize)] * w;
        }
        *o = acc;
    });
    out
}

/// Centered-difference gradient, returned as `(d/d row, d/d col)`.
///     - interior: (f[k+1] - f[k-1]) / (2h)
///     - edges:    first-order one-sided differences
///     - `h_rows` is the spacing along axis 0 (y), `h_cols` along axis 1 (x)
/// An axis with fewer than 2 points has a zero derivative.
pub fn gradient(f: ArrayView2<f64>, h_rows: f64, h_cols: f64) -> (Array2<f64>, Array2<f64>) {
    (
        derivative_along(f, Axis(0), h_rows),
        derivative_along(f, Axis(1), h_cols),
    )
}

fn derivative_along(f: ArrayView2<f64>, axis: Axis, h: f64) -> Array2<f64> {
    let n = f.len_of(axis);
    let mut out = Array2::zeros(f.dim());
    if n < 2 {
        return out;
    }

    for k in 0..n {
        let (lo, hi, denom) = if k == 0 {
            (0, 1, h)
        } else if k == n - 1 {
            (n - 2, n - 1, h)
        } else {
            (k - 1, k + 1, 2.0 * h)
        };
        Zip::from(out.index_axis_mut(axis, k))
            .and(f.index_axis(axis, hi))
            .and(f.index_axis(axis, lo))
            .for_each(|o, &a, &b| *o = (a - b) / denom);
    }
    out
}
