//! Asteroid Arena - an Asteroids-style arena simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity lifecycle, pooling, physics stepping, collisions, rounds)
//! - `tuning`: Data-driven game balance
//! - `error`: Error taxonomy shared by the simulation

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{Result, SimError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Body-space "forward" for every entity. Screen Y grows downward.
    pub const UP_DIRECTION: Vec2 = Vec2::NEG_Y;

    /// Collision categories
    pub const CATEGORY_SHIP: u16 = 1 << 0;
    pub const CATEGORY_HAZARD: u16 = 1 << 1;
    pub const CATEGORY_PROJECTILE: u16 = 1 << 2;
    pub const CATEGORY_NONE: u16 = 0;
    pub const CATEGORY_ALL: u16 = u16::MAX;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Direction an entity with the given rotation is facing
#[inline]
pub fn look_direction(rotation: f32) -> Vec2 {
    Vec2::from_angle(rotation).rotate(consts::UP_DIRECTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(2.5 * PI) - FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);

        // Odd multiples of π land on the seam; either end is the same heading
        let seam = normalize_angle(3.0 * PI);
        assert!((-PI..PI).contains(&seam));
        assert!(seam.abs() > PI - 1e-5);
    }

    #[test]
    fn test_look_direction() {
        let up = look_direction(0.0);
        assert!((up - Vec2::NEG_Y).length() < 1e-6);

        // Positive rotation turns clockwise on screen: up -> right
        let right = look_direction(FRAC_PI_2);
        assert!((right - Vec2::X).length() < 1e-5);
    }
}
