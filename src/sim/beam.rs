//! Laser beams: a telegraph window followed by a lethal active window
//!
//! Ages are kept in milliseconds so phase boundaries land on exact authored
//! values.

use std::f32::consts::TAU;

use glam::Vec2;

use super::geometry::BeamSeed;
use super::motion::{self, MotionKind, tuning};
use crate::consts::EPSILON_SQ;
use crate::event::Rgba;
use crate::{rotate, rotate_towards, safe_normalize};

/// Lifecycle phase of a beam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamPhase {
    Telegraph,
    Active,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Beam {
    pub base_origin: Vec2,
    pub base_direction: Vec2,
    pub origin: Vec2,
    pub direction: Vec2,
    pub start: Vec2,
    pub end: Vec2,
    pub length: f32,
    pub width: f32,
    pub telegraph_ms: f32,
    pub active_ms: f32,
    pub age_ms: f32,
    pub kind: MotionKind,
    pub amp: f32,
    pub freq: f32,
    pub phase: f32,
    pub fill: Rgba,
    pub outline: Rgba,
}

impl Beam {
    pub fn new(seed: &BeamSeed, phase: f32, fill: Rgba, outline: Rgba) -> Self {
        let end = seed.origin + seed.direction * seed.length;
        Self {
            base_origin: seed.origin,
            base_direction: seed.direction,
            origin: seed.origin,
            direction: seed.direction,
            start: seed.origin,
            end,
            length: seed.length,
            width: seed.width,
            telegraph_ms: seed.telegraph_ms,
            active_ms: seed.active_ms,
            age_ms: 0.0,
            kind: seed.profile.kind,
            amp: seed.profile.amp,
            freq: seed.profile.freq,
            phase,
            fill,
            outline,
        }
    }

    pub fn phase_at(&self) -> BeamPhase {
        if self.age_ms > self.telegraph_ms + self.active_ms {
            BeamPhase::Expired
        } else if self.age_ms >= self.telegraph_ms {
            BeamPhase::Active
        } else {
            BeamPhase::Telegraph
        }
    }

    /// Lethal only inside [telegraph, telegraph + active], inclusive
    pub fn is_active(&self) -> bool {
        self.phase_at() == BeamPhase::Active
    }

    pub fn is_expired(&self) -> bool {
        self.phase_at() == BeamPhase::Expired
    }

    /// Advance by `dt_ms`, moving the origin and steering the direction
    pub fn advance(&mut self, dt_ms: f32, target: Vec2) {
        self.age_ms += dt_ms;
        let t = self.age_ms / 1000.0;

        self.origin = self.base_origin + self.origin_offset(t);
        self.direction = self.steer(target, dt_ms / 1000.0);
        self.start = self.origin;
        self.end = self.origin + self.direction * self.length;
    }

    fn origin_offset(&self, t: f32) -> Vec2 {
        let dir = self.base_direction;
        let perp = Vec2::new(-dir.y, dir.x);
        let w = (t * self.freq + self.phase) * TAU;
        let a = self.amp;

        match self.kind {
            MotionKind::LateralSweepRight => Vec2::new((24.0 + a * 0.85) * t, 0.0),
            MotionKind::LateralSweepLeft => Vec2::new(-(24.0 + a * 0.85) * t, 0.0),
            MotionKind::SinusoidalPathDeviation => perp * (w.sin() * a.max(6.0)),
            MotionKind::UniformOutwardDrift => dir * ((a * 0.9).max(8.0) * t),
            MotionKind::DelayedAccelerationRamp => {
                dir * motion::delayed_ramp_distance((a * 0.9).max(8.0), t)
            }
            MotionKind::ExpandingSpiralConversion => {
                rotate(dir, 0.55 * t * t) * ((a * 0.5).max(7.0) * t)
            }
            MotionKind::PulsedVelocityModulation => {
                dir * (motion::pulsed_distance(a.max(8.0), t, self.freq, self.phase) * 0.12)
            }
            _ => Vec2::ZERO,
        }
    }

    fn steer(&self, target: Vec2, dt: f32) -> Vec2 {
        let direction = if self.direction.length_squared() < EPSILON_SQ {
            self.base_direction
        } else {
            self.direction
        };
        if self.kind != MotionKind::MouseTrack {
            return safe_normalize(direction);
        }

        let to_target = target - self.origin;
        if to_target.length_squared() < EPSILON_SQ {
            return safe_normalize(direction);
        }

        // Deliberately laggy so a tracking beam stays dodgeable
        let desired = safe_normalize(to_target);
        let aim = safe_normalize(direction.lerp(desired, tuning::BEAM_AIM_BLEND));
        let max_turn = ((tuning::BEAM_TURN_RATE + self.amp * tuning::BEAM_TURN_PER_AMP) * dt)
            .max(tuning::BEAM_MIN_TURN);
        safe_normalize(rotate_towards(direction, aim, max_turn))
    }

    /// Telegraph progress in [0, 1]
    pub fn telegraph_progress(&self) -> f32 {
        (self.age_ms / self.telegraph_ms.max(1.0)).clamp(0.0, 1.0)
    }

    /// Two warning pulses during the telegraph, then fire
    pub fn telegraph_pulse(&self) -> f32 {
        let t = self.telegraph_progress();
        pulse01(t, 0.33, 0.085).max(pulse01(t, 0.67, 0.085))
    }

    /// Brightness through the active window, 1.0 fading to 0.75
    pub fn active_fade(&self) -> f32 {
        let active_t = ((self.age_ms - self.telegraph_ms) / self.active_ms.max(1.0)).clamp(0.0, 1.0);
        1.0 - active_t * 0.25
    }
}

/// Triangular pulse centered on `center`
pub fn pulse01(t: f32, center: f32, half_width: f32) -> f32 {
    let d = (t - center).abs();
    if d >= half_width {
        0.0
    } else {
        1.0 - d / half_width
    }
}

/// All live beams
#[derive(Debug, Default)]
pub struct BeamField {
    beams: Vec<Beam>,
}

impl BeamField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, beam: Beam) {
        self.beams.push(beam);
    }

    /// Advance every beam and drop the ones past their active window.
    /// Returns how many were removed.
    pub fn update(&mut self, dt_ms: f32, target: Vec2) -> usize {
        let before = self.beams.len();
        for beam in &mut self.beams {
            beam.advance(dt_ms, target);
        }
        self.beams.retain(|b| !b.is_expired());
        before - self.beams.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beam> {
        self.beams.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &Beam> {
        self.beams.iter().filter(|b| b.is_active())
    }

    pub fn len(&self) -> usize {
        self.beams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beams.is_empty()
    }

    pub fn clear(&mut self) {
        self.beams.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::MotionProfile;

    fn seed(profile: MotionProfile) -> BeamSeed {
        BeamSeed {
            origin: Vec2::new(640.0, 100.0),
            direction: Vec2::Y,
            length: 1700.0,
            width: 22.0,
            telegraph_ms: 900.0,
            active_ms: 550.0,
            profile,
        }
    }

    fn beam(profile: MotionProfile) -> Beam {
        Beam::new(&seed(profile), 0.0, Rgba::DEFAULT_FILL, Rgba::BLACK)
    }

    #[test]
    fn test_phase_boundaries() {
        let target = Vec2::ZERO;
        let mut b = beam(MotionProfile::NONE);

        b.advance(899.0, target);
        assert_eq!(b.phase_at(), BeamPhase::Telegraph);
        b.advance(1.0, target);
        assert!(b.is_active());
        b.advance(549.0, target);
        assert!(b.is_active());
        b.advance(1.0, target);
        // 1450 is the inclusive end
        assert!(b.is_active());
        b.advance(1.0, target);
        assert!(b.is_expired());
    }

    #[test]
    fn test_field_removes_expired() {
        let mut field = BeamField::new();
        field.push(beam(MotionProfile::NONE));
        assert_eq!(field.update(1449.0, Vec2::ZERO), 0);
        assert_eq!(field.active().count(), 1);
        assert_eq!(field.update(2.0, Vec2::ZERO), 1);
        assert!(field.is_empty());
    }

    #[test]
    fn test_segment_follows_direction() {
        let mut b = beam(MotionProfile::NONE);
        b.advance(16.0, Vec2::ZERO);
        assert_eq!(b.start, Vec2::new(640.0, 100.0));
        assert!((b.end - Vec2::new(640.0, 1800.0)).length() < 1e-3);
    }

    #[test]
    fn test_lateral_sweep_moves_origin() {
        let mut b = beam(MotionProfile::new(MotionKind::LateralSweepLeft, 20.0, 1.0));
        b.advance(1000.0, Vec2::ZERO);
        assert!((b.origin.x - (640.0 - 41.0)).abs() < 1e-3);
        assert_eq!(b.origin.y, 100.0);
    }

    #[test]
    fn test_tracking_turn_is_capped() {
        let mut b = beam(MotionProfile::new(MotionKind::MouseTrack, 0.0, 1.0));
        // Target straight to the right of the origin
        let target = Vec2::new(1240.0, 100.0);
        b.advance(100.0, target);
        let turned = b.direction.y.atan2(b.direction.x);
        let start = std::f32::consts::FRAC_PI_2;
        assert!((start - turned) <= tuning::BEAM_MIN_TURN.max(0.2375 * 0.1) + 1e-5);
        assert!(turned < start);
    }

    #[test]
    fn test_telegraph_pulses() {
        assert_eq!(pulse01(0.0, 0.33, 0.085), 0.0);
        assert!((pulse01(0.33, 0.33, 0.085) - 1.0).abs() < 1e-6);

        let mut b = beam(MotionProfile::NONE);
        b.advance(297.0, Vec2::ZERO);
        assert!(b.telegraph_pulse() > 0.9);
        b.advance(1000.0, Vec2::ZERO);
        assert!(b.active_fade() < 1.0 && b.active_fade() > 0.75);
    }
}
