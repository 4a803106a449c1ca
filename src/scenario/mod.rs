pub mod config;
pub mod functions;

pub use config::{InitialPirates, InitialShips, Scenario, ScenarioConfig, CFL_LIMIT};
