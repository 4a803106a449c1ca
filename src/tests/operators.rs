use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};

use crate::solvers::{convolve_same, gradient};

#[test]
fn convolve_same_with_centered_delta_is_identity() {
    let input = Array2::from_shape_fn((4, 5), |(j, i)| (3 * j + i) as f64);
    let mut kernel = Array2::<f64>::zeros((3, 3));
    kernel[(1, 1)] = 1.0;

    let out = convolve_same(input.view(), kernel.view());
    assert_eq!(out, input);
}

#[test]
fn convolve_same_box_filter_counts_neighbours() {
    // Ones convolved with a 3×3 box: 4 at corners, 6 on edges, 9 inside.
    let input = Array2::<f64>::ones((3, 3));
    let kernel = Array2::<f64>::ones((3, 3));

    let out = convolve_same(input.view(), kernel.view());
    let expected = array![[4.0, 6.0, 4.0], [6.0, 9.0, 6.0], [4.0, 6.0, 4.0]];
    assert_eq!(out, expected);
}

#[test]
fn convolve_same_even_kernel_is_cropped_at_origin() {
    // Even kernels have offset (kr - 1) / 2 = 0: a delta at (0, 0) reproduces the kernel.
    let input = array![[1.0, 0.0], [0.0, 0.0]];
    let kernel = array![[1.0, 2.0], [3.0, 4.0]];

    let out = convolve_same(input.view(), kernel.view());
    assert_eq!(out, kernel);
}

#[test]
fn convolve_same_off_centre_tap_shifts_input() {
    // A tap one column right of centre moves every value one column right.
    let input = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
    let mut kernel = Array2::<f64>::zeros((3, 3));
    kernel[(1, 2)] = 1.0;

    let out = convolve_same(input.view(), kernel.view());
    assert_eq!(out[(1, 2)], 1.0);
    assert_eq!(out.sum(), 1.0);
}

#[test]
fn gradient_uses_centered_interior_and_one_sided_edges() {
    // f = x² sampled at x = 0, 1, 2, 3 (two identical rows).
    let f = array![[0.0, 1.0, 4.0, 9.0], [0.0, 1.0, 4.0, 9.0]];

    let (d_rows, d_cols) = gradient(f.view(), 1.0, 1.0);
    assert_eq!(d_cols.row(0).to_vec(), vec![1.0, 2.0, 4.0, 5.0]);
    assert_eq!(d_cols.row(1).to_vec(), vec![1.0, 2.0, 4.0, 5.0]);
    assert!(d_rows.iter().all(|&v| v == 0.0));
}

#[test]
fn gradient_respects_axis_spacing_order() {
    // f = 2·y + 3·x on a grid with dy = 0.5 (rows), dx = 0.25 (cols).
    let (dy, dx) = (0.5, 0.25);
    let f = Array2::from_shape_fn((5, 4), |(j, i)| 2.0 * (j as f64 * dy) + 3.0 * (i as f64 * dx));

    let (d_rows, d_cols) = gradient(f.view(), dy, dx);
    for &v in d_rows.iter() {
        assert_abs_diff_eq!(v, 2.0, epsilon = 1e-12);
    }
    for &v in d_cols.iter() {
        assert_abs_diff_eq!(v, 3.0, epsilon = 1e-12);
    }
}
