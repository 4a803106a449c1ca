use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of the coupled evolution.
///     - shape / length mismatches are precondition violations (never broadcast)
///     - `NumericalDivergence` is raised by the driver's post-step finiteness check
///     - `Io` / `Serialization` come from the snapshot writer
#[derive(Error, Debug)]
pub enum EvolutionError {
    #[error("shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("length mismatch for {what}: expected {expected}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("degenerate mesh {rows}x{cols}: every axis needs at least 2 points")]
    DegenerateMesh { rows: usize, cols: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("numerical divergence at step {step} (t = {time}): non-finite {what}")]
    NumericalDivergence {
        step: usize,
        time: f64,
        what: &'static str,
    },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error on {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Fail fast unless `found` has exactly the `expected` shape.
#[inline]
pub(crate) fn ensure_shape(
    what: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected != found {
        return Err(EvolutionError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
