//! Barrage - bullet-hell hazard simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, beams, collision, balancing)
//! - `event`: Authored spawn events and level documents
//! - `config`: Level defaults and engine tuning
//! - `render`: Read-only draw snapshots for the rendering collaborator

pub mod config;
pub mod error;
pub mod event;
pub mod render;
pub mod sim;

pub use config::{EngineTuning, LevelConfig};
pub use error::LoadError;
pub use event::{Level, SpawnEvent};
pub use sim::{BulletEngine, FrameReport, ResetReport};

use glam::Vec2;

/// Playfield and tuning constants
pub mod consts {
    use glam::Vec2;

    /// Virtual playfield dimensions (normalized spawn positions scale to these)
    pub const PLAYFIELD_WIDTH: f32 = 1280.0;
    pub const PLAYFIELD_HEIGHT: f32 = 720.0;
    pub const PLAYFIELD_CENTER: Vec2 = Vec2::new(640.0, 360.0);

    /// Projectiles outside these bounds are recycled
    pub const RECYCLE_MIN_X: f32 = -180.0;
    pub const RECYCLE_MAX_X: f32 = 1460.0;
    pub const RECYCLE_MIN_Y: f32 = -180.0;
    pub const RECYCLE_MAX_Y: f32 = 900.0;

    /// Minimum projectile speed after clamping
    pub const MIN_SPEED: f32 = 0.1;

    /// Hazards closer than this count toward the danger budget
    pub const NEAR_HAZARD_PX: f32 = 140.0;
    /// Reported clearance when nothing is on the field
    pub const NO_HAZARD_CLEARANCE: f32 = 9999.0;

    /// Squared length below which a vector is treated as zero
    pub const EPSILON_SQ: f32 = 0.0001;
}

/// Wrap an angle to [-π, π]
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if angle > -PI && angle <= PI {
        return angle;
    }
    angle %= TAU;
    if angle <= -PI {
        angle += TAU;
    } else if angle > PI {
        angle -= TAU;
    }
    angle
}

/// Rotate a vector counter-clockwise (in y-down space: clockwise on screen)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Normalize, returning zero for near-zero vectors
#[inline]
pub fn safe_normalize(v: Vec2) -> Vec2 {
    if v.length_squared() < consts::EPSILON_SQ {
        Vec2::ZERO
    } else {
        v.normalize()
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Turn `current` toward `target` by at most `max_radians`
pub fn rotate_towards(current: Vec2, target: Vec2, max_radians: f32) -> Vec2 {
    if current.length_squared() < consts::EPSILON_SQ {
        return target;
    }
    if target.length_squared() < consts::EPSILON_SQ {
        return current;
    }

    let current = current.normalize();
    let target = target.normalize();
    let current_angle = current.y.atan2(current.x);
    let target_angle = target.y.atan2(target.x);
    let delta = wrap_angle(target_angle - current_angle);
    let next = current_angle + delta.clamp(-max_radians, max_radians);
    heading(next)
}

/// Hermite smoothstep on [0, 1]
#[inline]
pub fn smoothstep01(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-FRAC_PI_2) + FRAC_PI_2).abs() < 1e-6);
        assert!(wrap_angle(2.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::X, FRAC_PI_2);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_towards_is_capped() {
        let turned = rotate_towards(Vec2::X, Vec2::Y, 0.1);
        let angle = turned.y.atan2(turned.x);
        assert!((angle - 0.1).abs() < 1e-5);

        // Within the cap snaps onto the target
        let turned = rotate_towards(Vec2::X, heading(0.05), 0.1);
        assert!((turned.y.atan2(turned.x) - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_safe_normalize_zero() {
        assert_eq!(safe_normalize(Vec2::new(0.001, 0.0)), Vec2::ZERO);
        assert!((safe_normalize(Vec2::new(3.0, 4.0)).length() - 1.0).abs() < 1e-6);
    }
}
