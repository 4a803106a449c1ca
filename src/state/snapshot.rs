/// ==============================================================================================
/// ===================================== Snapshot Persistence ===================================
/// ==============================================================================================

use ndarray::Array2;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::PolicePosition;
use crate::error::{EvolutionError, Result};

/// Persistence collaborator called by the driver at print steps.
///     The evolution itself never depends on the storage format.
pub trait SnapshotSink {
    fn save(
        &mut self,
        output_path: &Path,
        name: &str,
        time: f64,
        pirates: &Array2<f64>,
        ships: &Array2<f64>,
        police: &[PolicePosition],
    ) -> Result<()>;
}

/// Labelled snapshot payload (zero-copy references into the state).
#[derive(Clone, Serialize)]
pub struct SnapshotRecord<'a> {
    pub name: &'a str,
    pub time: f64,
    pub pirates: &'a Array2<f64>,
    pub ships: &'a Array2<f64>,
    pub police: &'a [PolicePosition],
}

/// Writes every snapshot to `{output_path}/{name}.json` (pretty-printed).
#[derive(Clone, Debug, Default)]
pub struct JsonSnapshotWriter {
    written: Vec<PathBuf>,
}

impl JsonSnapshotWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files written so far, in order.
    #[inline]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SnapshotSink for JsonSnapshotWriter {
    fn save(
        &mut self,
        output_path: &Path,
        name: &str,
        time: f64,
        pirates: &Array2<f64>,
        ships: &Array2<f64>,
        police: &[PolicePosition],
    ) -> Result<()> {
        create_dir_all(output_path).map_err(|source| EvolutionError::Io {
            path: output_path.to_path_buf(),
            source,
        })?;

        let file_path = output_path.join(format!("{name}.json"));
        let record = SnapshotRecord {
            name,
            time,
            pirates,
            ships,
            police,
        };
        let json = serde_json::to_string_pretty(&record).map_err(|source| {
            EvolutionError::Serialization {
                path: file_path.clone(),
                source,
            }
        })?;

        let mut file = File::create(&file_path).map_err(|source| EvolutionError::Io {
            path: file_path.clone(),
            source,
        })?;
        file.write_all(json.as_bytes())
            .map_err(|source| EvolutionError::Io {
                path: file_path.clone(),
                source,
            })?;

        tracing::debug!(path = %file_path.display(), time, "snapshot written");
        self.written.push(file_path);
        Ok(())
    }
}
