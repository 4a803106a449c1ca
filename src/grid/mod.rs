pub mod mesh;
pub mod schedule;

pub use mesh::Mesh;
pub use schedule::TimeSchedule;
