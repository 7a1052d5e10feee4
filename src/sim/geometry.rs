//! Spawn geometry expansion
//!
//! Turns one balanced event into the launch points and headings of its
//! projectiles, or into a single beam descriptor for laser patterns.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::motion::{MotionKind, MotionProfile};
use crate::config::EngineTuning;
use crate::consts::EPSILON_SQ;
use crate::event::SpawnEvent;
use crate::{heading, safe_normalize};

/// Patterns whose name doubles as their default motion
pub const MOVING_PATTERNS: [&str; 31] = [
    "left_drift",
    "right_drift",
    "left_right_drift",
    "uniform_outward_drift",
    "delayed_acceleration_ramp",
    "rotational_field_spin",
    "counter_rotation_shear",
    "sinusoidal_path_deviation",
    "expanding_spiral_conversion",
    "inward_gravity_pull",
    "elastic_repulsion_field",
    "angular_phase_offset_drift",
    "vertical_compression_field",
    "lateral_sweep_translation",
    "orbit_anchor_conversion",
    "pulsed_velocity_modulation",
    "sector_based_speed_variation",
    "randomized_micro_drift",
    "zigzag_vector_flip",
    "deceleration_freeze",
    "radial_explosion_burst",
    "expanding_radius_lock",
    "rotational_acceleration_ramp",
    "mirror_axis_reflection",
    "expanding_orbital_ringing",
    "delayed_homing_adjustment",
    "staggered_time_offset_release",
    "elliptical_orbit_drift",
    "fountain_arc",
    "mouse_track",
    "shoot_at_mouse",
];

/// Default wall span (px)
pub const DEFAULT_WALL_WIDTH: f32 = 900.0;

/// Projectile arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    Radial,
    Fan,
    Wall,
    Spiral,
}

impl Formation {
    /// Pick a formation from substrings of the pattern name
    pub fn from_key(key: &str) -> Self {
        if key.contains("wall") {
            Formation::Wall
        } else if key.contains("fan") || key.contains("arc") {
            Formation::Fan
        } else if key.contains("spiral") || key.contains("helix") || key.contains("vortex") {
            Formation::Spiral
        } else {
            Formation::Radial
        }
    }
}

/// Pattern family of a normalized pattern key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Fan aimed at the target (or an explicit direction)
    Aimed,
    /// Plain density-scaled ring
    Radial,
    /// Static ring of a fixed base size
    Ring(u32),
    /// One projectile straight down
    Single,
    Laser,
    /// Named motion pattern
    Moving(Formation),
    /// Unrecognized name, classified by substring
    Legacy(Formation),
}

impl Pattern {
    pub fn classify(key: &str) -> Self {
        match key {
            "aimed" => Pattern::Aimed,
            "radial" => Pattern::Radial,
            "ring_8" => Pattern::Ring(8),
            "ring_12" => Pattern::Ring(12),
            "ring_16" => Pattern::Ring(16),
            "ring_32" => Pattern::Ring(32),
            "static_single" => Pattern::Single,
            k if k.contains("laser") => Pattern::Laser,
            k if MOVING_PATTERNS.contains(&k) => Pattern::Moving(Formation::from_key(k)),
            k => Pattern::Legacy(Formation::from_key(k)),
        }
    }
}

/// Launch point and heading of one projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSeed {
    pub position: Vec2,
    pub angle: f32,
    /// Formation center used by orbital motions
    pub orbit_center: Vec2,
}

/// Projectiles produced by one event
#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    pub seeds: Vec<ProjectileSeed>,
    pub profile: MotionProfile,
    pub speed: f32,
    pub ring_expand_distance: f32,
}

/// Beam produced by a laser event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSeed {
    pub origin: Vec2,
    pub direction: Vec2,
    pub length: f32,
    pub width: f32,
    pub telegraph_ms: f32,
    pub active_ms: f32,
    pub profile: MotionProfile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnPlan {
    Volley(Volley),
    Beam(BeamSeed),
}

/// Base heading for a pattern: explicit override, name suffix, aim, or down
pub fn base_direction(key: &str, origin: Vec2, target: Vec2, override_deg: Option<f32>) -> f32 {
    if let Some(deg) = override_deg {
        return deg.to_radians();
    }
    if key.ends_with("_left") {
        return PI;
    }
    if key.ends_with("_right") {
        return 0.0;
    }
    if key.starts_with("aimed") {
        let to = target - origin;
        if to.length_squared() > 0.001 {
            return to.y.atan2(to.x);
        }
    }
    FRAC_PI_2
}

/// N headings evenly spaced over a full turn
pub fn radial(origin: Vec2, count: u32) -> Vec<ProjectileSeed> {
    let n = count.max(1);
    (0..n)
        .map(|i| ProjectileSeed {
            position: origin,
            angle: TAU * i as f32 / n as f32,
            orbit_center: origin,
        })
        .collect()
}

/// N headings evenly spaced across `spread`, centered on `center_angle`
pub fn fan(origin: Vec2, center_angle: f32, spread: f32, count: u32) -> Vec<ProjectileSeed> {
    (0..count)
        .map(|i| {
            let t = if count <= 1 {
                0.5
            } else {
                i as f32 / (count - 1) as f32
            };
            ProjectileSeed {
                position: origin,
                angle: center_angle - spread * 0.5 + spread * t,
                orbit_center: origin,
            }
        })
        .collect()
}

/// N points along a line perpendicular to `angle`, all sharing that heading
pub fn wall(origin: Vec2, angle: f32, count: u32, width: f32) -> Vec<ProjectileSeed> {
    let d = heading(angle);
    let across = Vec2::new(-d.y, d.x);
    (0..count)
        .map(|i| {
            let t = if count <= 1 {
                0.5
            } else {
                i as f32 / (count - 1) as f32
            };
            ProjectileSeed {
                position: origin + across * ((t - 0.5) * width),
                angle,
                orbit_center: origin,
            }
        })
        .collect()
}

/// Expands events into seeds; carries the spiral phase between events
#[derive(Debug, Clone, Default)]
pub struct SpawnGeometry {
    phase_seed: f32,
}

impl SpawnGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.phase_seed = 0.0;
    }

    pub fn phase_seed(&self) -> f32 {
        self.phase_seed
    }

    /// Headings offset by the running phase seed; each call advances it 17°
    pub fn spiral(&mut self, origin: Vec2, count: u32, step_deg: Option<f32>) -> Vec<ProjectileSeed> {
        let step = step_deg
            .unwrap_or(11.0 + (count % 9) as f32)
            .to_radians();
        let seeds = (0..count)
            .map(|i| ProjectileSeed {
                position: origin,
                angle: self.phase_seed + i as f32 * step,
                orbit_center: origin,
            })
            .collect();
        self.phase_seed += 17f32.to_radians();
        seeds
    }

    /// Expand a balanced event against the target position at spawn time
    pub fn expand(&mut self, event: &SpawnEvent, target: Vec2, tuning: &EngineTuning) -> SpawnPlan {
        let key = event.pattern_key();
        let pattern = Pattern::classify(&key);
        let origin = event.origin();
        let count = event.clamped_count();
        let dir = base_direction(&key, origin, target, event.direction_deg);

        let explicit_profile = || match event.motion_key() {
            Some(name) => MotionProfile::resolve(&name, event.intensity()),
            None => MotionProfile::NONE,
        };

        let (seeds, profile) = match pattern {
            Pattern::Aimed => {
                let angle = match event.direction_deg {
                    Some(deg) => deg.to_radians(),
                    None => {
                        let to = match target - origin {
                            v if v.length_squared() < 0.001 => Vec2::Y,
                            v => v.normalize(),
                        };
                        to.y.atan2(to.x)
                    }
                };
                let spread = event.spread_deg.unwrap_or(30.0).to_radians();
                (fan(origin, angle, spread, count.max(4)), MotionProfile::NONE)
            }
            Pattern::Radial => {
                let n = tuning.scale_ring_count(count.max(10));
                (radial(origin, n), MotionProfile::NONE)
            }
            Pattern::Ring(base) => (radial(origin, tuning.scale_ring_count(base)), explicit_profile()),
            Pattern::Single => (
                vec![ProjectileSeed {
                    position: origin,
                    angle: FRAC_PI_2,
                    orbit_center: origin,
                }],
                explicit_profile(),
            ),
            Pattern::Laser => return SpawnPlan::Beam(beam_seed(event, origin, dir, target, explicit_profile())),
            Pattern::Moving(formation) => {
                let name = event.motion_key().unwrap_or_else(|| key.clone());
                let profile = MotionProfile::resolve(&name, event.intensity());
                let seeds = match formation {
                    Formation::Wall => wall(origin, dir, count.max(10), wall_width(event)),
                    Formation::Fan => fan(origin, dir, spread(event), count.max(6)),
                    Formation::Spiral => self.spiral(origin, count.max(10), event.angle_step_deg),
                    Formation::Radial => radial(origin, tuning.scale_ring_count(count.max(3))),
                };
                (seeds, profile)
            }
            Pattern::Legacy(formation) => match formation {
                Formation::Wall => (
                    wall(origin, dir, count.max(10), wall_width(event)),
                    MotionProfile::NONE,
                ),
                Formation::Fan => (fan(origin, dir, spread(event), count.max(6)), MotionProfile::NONE),
                Formation::Spiral => (
                    self.spiral(origin, count.max(16), event.angle_step_deg),
                    MotionProfile::new(MotionKind::Spiral, 22.0, 1.35),
                ),
                Formation::Radial => (
                    radial(origin, tuning.scale_ring_count(count.max(10))),
                    MotionProfile::NONE,
                ),
            },
        };

        SpawnPlan::Volley(Volley {
            seeds,
            profile,
            speed: event.clamped_speed(),
            ring_expand_distance: event.ring_expand_distance.unwrap_or(0.0),
        })
    }
}

fn spread(event: &SpawnEvent) -> f32 {
    event.spread_deg.unwrap_or(60.0).to_radians()
}

fn wall_width(event: &SpawnEvent) -> f32 {
    event.wall_width.unwrap_or(DEFAULT_WALL_WIDTH)
}

fn beam_seed(event: &SpawnEvent, origin: Vec2, angle: f32, target: Vec2, profile: MotionProfile) -> BeamSeed {
    // Beams never arc
    let profile = if profile.kind == MotionKind::FountainArc {
        MotionProfile::new(MotionKind::None, profile.amp, profile.freq)
    } else {
        profile
    };

    let mut direction = heading(angle);
    if profile.kind == MotionKind::MouseAimDirection {
        let to_target = target - origin;
        if to_target.length_squared() > EPSILON_SQ {
            direction = safe_normalize(to_target);
        }
    }

    BeamSeed {
        origin,
        direction: safe_normalize(direction),
        length: event.laser_length.unwrap_or(1700.0).clamp(100.0, 2600.0),
        width: event.laser_width.unwrap_or(22.0).clamp(4.0, 220.0),
        telegraph_ms: event.telegraph_ms.unwrap_or(900).clamp(50, 5000) as f32,
        active_ms: event.laser_duration_ms.unwrap_or(550).clamp(50, 4000) as f32,
        profile,
    }
}
