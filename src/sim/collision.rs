//! Target hit tests and the per-frame danger budget
//!
//! Projectiles are circles, active beams are capsules around their segment.
//! Touching counts as a hit: every test is `distance² <= radius²`.

use glam::Vec2;

use super::beam::Beam;
use super::projectile::Projectile;
use crate::consts::{EPSILON_SQ, NEAR_HAZARD_PX, NO_HAZARD_CLEARANCE};

/// Squared distance from `p` to the segment `a..b`
pub fn distance_sq_point_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let denom = ab.length_squared();
    if denom < EPSILON_SQ {
        return p.distance_squared(a);
    }

    let t = ((p - a).dot(ab) / denom).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// Circle-vs-circle overlap with the target
#[inline]
pub fn projectile_hits(projectile: &Projectile, target: Vec2, target_radius: f32) -> bool {
    let r = projectile.hit_radius() + target_radius;
    projectile.position.distance_squared(target) <= r * r
}

/// Capsule-vs-circle overlap; telegraphing beams never hit
#[inline]
pub fn beam_hits(beam: &Beam, target: Vec2, target_radius: f32) -> bool {
    if !beam.is_active() {
        return false;
    }
    let r = target_radius + beam.width * 0.5;
    distance_sq_point_to_segment(target, beam.start, beam.end) <= r * r
}

/// True when any projectile or active beam touches the target circle
pub fn check_hit<'a>(
    projectiles: impl IntoIterator<Item = &'a Projectile>,
    beams: impl IntoIterator<Item = &'a Beam>,
    target: Vec2,
    target_radius: f32,
) -> bool {
    projectiles
        .into_iter()
        .any(|p| projectile_hits(p, target, target_radius))
        || beams
            .into_iter()
            .any(|b| beam_hits(b, target, target_radius))
}

/// How crowded the space around the target is this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DangerBudget {
    /// Hazards whose surface is within `NEAR_HAZARD_PX` of the target center
    pub near_count: usize,
    /// Smallest surface distance; negative when overlapping
    pub min_clearance: f32,
}

impl Default for DangerBudget {
    fn default() -> Self {
        Self {
            near_count: 0,
            min_clearance: NO_HAZARD_CLEARANCE,
        }
    }
}

impl DangerBudget {
    fn observe(&mut self, clearance: f32) {
        self.min_clearance = self.min_clearance.min(clearance);
        if clearance <= NEAR_HAZARD_PX {
            self.near_count += 1;
        }
    }

    pub fn measure<'a>(
        projectiles: impl IntoIterator<Item = &'a Projectile>,
        beams: impl IntoIterator<Item = &'a Beam>,
        target: Vec2,
    ) -> Self {
        let mut budget = Self::default();
        for p in projectiles {
            budget.observe(target.distance(p.position) - p.hit_radius());
        }
        for b in beams.into_iter().filter(|b| b.is_active()) {
            let d = distance_sq_point_to_segment(target, b.start, b.end).sqrt();
            budget.observe(d - b.width * 0.5);
        }
        budget
    }
}
