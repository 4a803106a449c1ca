pub mod simulation_state;
pub mod snapshot;

pub use simulation_state::{PolicePosition, SimulationState};
pub use snapshot::{JsonSnapshotWriter, SnapshotRecord, SnapshotSink};
