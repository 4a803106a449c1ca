/// ==============================================================================================
/// ===================================== Rectangular Mesh =======================================
/// ==============================================================================================

use ndarray::{Array1, Array2};

use crate::error::{ensure_shape, EvolutionError, Result};

/// Fixed rectangular mesh.
///     Layout (numpy `meshgrid` convention):
///         - rows index `y`, columns index `x`
///         - `xx[(j, i)] = x[i]`, `yy[(j, i)] = y[j]`, shape `(n_y, n_x)`
///         - `dx`, `dy`: uniform spacings (> 0)
#[derive(Clone, Debug)]
pub struct Mesh {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub xx: Array2<f64>,
    pub yy: Array2<f64>,
    pub dx: f64,
    pub dy: f64,
}

impl Mesh {
    /// Node-based uniform mesh on `[x_1, x_2] × [y_1, y_2]` with `n_x × n_y` points.
    pub fn uniform(x_1: f64, x_2: f64, n_x: usize, y_1: f64, y_2: f64, n_y: usize) -> Result<Self> {
        if n_x < 2 || n_y < 2 {
            return Err(EvolutionError::DegenerateMesh { rows: n_y, cols: n_x });
        }
        if !(x_2 > x_1) || !(y_2 > y_1) {
            return Err(EvolutionError::InvalidConfig(format!(
                "mesh bounds must be increasing: x [{x_1}, {x_2}], y [{y_1}, {y_2}]"
            )));
        }

        let dx = (x_2 - x_1) / (n_x - 1) as f64;
        let dy = (y_2 - y_1) / (n_y - 1) as f64;
        let x = Array1::from_shape_fn(n_x, |i| x_1 + i as f64 * dx);
        let y = Array1::from_shape_fn(n_y, |j| y_1 + j as f64 * dy);
        let xx = Array2::from_shape_fn((n_y, n_x), |(_, i)| x[i]);
        let yy = Array2::from_shape_fn((n_y, n_x), |(j, _)| y[j]);

        Ok(Self { x, y, xx, yy, dx, dy })
    }

    /// Wrap caller-built coordinate arrays.
    ///     - `xx`, `yy` must share one shape with at least 2 points per axis
    ///     - the 1-D axes are read back from the first row / column
    pub fn from_arrays(xx: Array2<f64>, yy: Array2<f64>, dx: f64, dy: f64) -> Result<Self> {
        ensure_shape("y-mesh", xx.dim(), yy.dim())?;
        let (rows, cols) = xx.dim();
        if rows < 2 || cols < 2 {
            return Err(EvolutionError::DegenerateMesh { rows, cols });
        }
        if !(dx > 0.0) || !(dy > 0.0) {
            return Err(EvolutionError::InvalidConfig(format!(
                "mesh spacings must be positive: dx = {dx}, dy = {dy}"
            )));
        }

        let x = xx.row(0).to_owned();
        let y = yy.column(0).to_owned();
        Ok(Self { x, y, xx, yy, dx, dy })
    }

    /// `(rows, cols) = (n_y, n_x)`.
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        self.xx.dim()
    }

    /// Area of one cell, the quadrature weight of every discrete integral.
    #[inline]
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dy
    }

    /// Zero field with the mesh's shape.
    #[inline]
    pub fn zeros(&self) -> Array2<f64> {
        Array2::zeros(self.dim())
    }

    /// Evaluate `f(x, y)` at every mesh node.
    pub fn field_from_fn<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(f64, f64) -> f64,
    {
        Array2::from_shape_fn(self.dim(), |(j, i)| f(self.x[i], self.y[j]))
    }
}
