use crate::state::PolicePosition;

/// Forward-Euler step of an overdamped police vessel: `d + dt · F`.
#[inline]
pub fn ode(force_x: f64, force_y: f64, position: PolicePosition, dt: f64) -> PolicePosition {
    PolicePosition {
        x: position.x + dt * force_x,
        y: position.y + dt * force_y,
    }
}
