//! Motion profiles and closed-form trajectories
//!
//! Every analytic motion is a pure function of projectile age and the
//! parameters fixed at launch. Nothing here reads previous-frame state, so
//! replaying the same ages yields the same positions bit for bit.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYFIELD_CENTER, PLAYFIELD_HEIGHT};
use crate::{rotate, safe_normalize, smoothstep01};

/// Designer-tunable timing constants. Changing them changes feel, not structure.
pub mod tuning {
    /// Delayed ramp: slow hold window, then quadratic ramp window (seconds)
    pub const RAMP_DELAY_SECS: f32 = 0.30;
    pub const RAMP_WINDOW_SECS: f32 = 0.70;
    /// Hold speed as a fraction of base speed during the ramp delay
    pub const RAMP_HOLD_FRACTION: f32 = 0.06;

    /// Mouse track: formation hold, minimum seek, seek cap (seconds)
    pub const TRACK_START_DELAY_SECS: f32 = 0.30;
    pub const TRACK_MIN_SECS: f32 = 0.22;
    pub const TRACK_MAX_SECS: f32 = 0.9;
    pub const TRACK_TURN_RATE: f32 = 3.2;
    pub const TRACK_TURN_PER_AMP: f32 = 0.02;
    pub const TRACK_MIN_TURN: f32 = 0.04;
    pub const TRACK_AIM_BLEND: f32 = 0.28;

    /// Shoot-at-mouse: heading held this long before the one-shot aim
    pub const AIM_EXPAND_SECS: f32 = 0.30;

    /// Beam tracking: heavy lag and a low turn cap keep beams escapable
    pub const BEAM_AIM_BLEND: f32 = 0.09;
    pub const BEAM_TURN_RATE: f32 = 0.2375;
    pub const BEAM_TURN_PER_AMP: f32 = 0.004;
    pub const BEAM_MIN_TURN: f32 = 0.01;

    /// Burst and homing kick in after this delay (seconds)
    pub const BURST_DELAY_SECS: f32 = 0.62;
    pub const HOMING_DELAY_SECS: f32 = 0.62;

    /// Fountain: default outward expand phase before the arc (seconds)
    pub const FOUNTAIN_EXPAND_SECS: f32 = 0.22;

    /// Legacy accel kind: constant acceleration along heading (px/s²)
    pub const LEGACY_ACCEL: f32 = 28.0;
}

/// Named trajectory families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MotionKind {
    #[default]
    None,
    UniformOutwardDrift,
    DelayedAccelerationRamp,
    RotationalFieldSpin,
    CounterRotationShear,
    SinusoidalPathDeviation,
    ExpandingSpiralConversion,
    InwardGravityPull,
    ElasticRepulsionField,
    AngularPhaseOffsetDrift,
    VerticalCompressionField,
    LateralSweepRight,
    LateralSweepLeft,
    OrbitAnchorConversion,
    PulsedVelocityModulation,
    SectorBasedSpeedVariation,
    RandomizedMicroDrift,
    ZigzagVectorFlip,
    DecelerationFreeze,
    RadialExplosionBurst,
    ExpandingRadiusLock,
    RotationalAccelerationRamp,
    MirrorAxisReflection,
    ExpandingOrbitalRinging,
    DelayedHomingAdjustment,
    StaggeredTimeOffsetRelease,
    EllipticalOrbitDrift,
    FountainArc,
    MouseTrack,
    MouseAimDirection,
    // Legacy base-plus-offset variants
    Sine,
    Arc,
    Rotate,
    Spiral,
    Accel,
    StaticRotate,
    StaticPulse,
    StaticExpand,
}

/// How a motion kind computes position each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Closed-form position as a function of age
    Absolute,
    /// `spawn + heading * speed * age + offset(age)`
    BaseOffset,
    /// Steered from latched heading toward the live target
    TargetReactive,
}

impl MotionKind {
    pub fn strategy(self) -> Strategy {
        use MotionKind::*;
        match self {
            None | Sine | Arc | Rotate | Spiral | Accel | StaticRotate | StaticPulse
            | StaticExpand => Strategy::BaseOffset,
            MouseTrack | MouseAimDirection => Strategy::TargetReactive,
            _ => Strategy::Absolute,
        }
    }

    /// Visual spin rate for this kind (shape-independent part)
    pub fn spins(self) -> bool {
        matches!(self, MotionKind::Rotate | MotionKind::StaticRotate)
    }
}

/// Motion kind plus its two tuning numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    pub kind: MotionKind,
    pub amp: f32,
    pub freq: f32,
}

impl MotionProfile {
    pub const NONE: MotionProfile = MotionProfile::new(MotionKind::None, 0.0, 1.0);

    pub const fn new(kind: MotionKind, amp: f32, freq: f32) -> Self {
        Self { kind, amp, freq }
    }

    /// Resolve a motion name and intensity into a profile
    ///
    /// Blank or `none` resolves to no motion; unrecognized names fall back to
    /// outward drift so authored content still moves.
    pub fn resolve(name: &str, intensity: f32) -> Self {
        use MotionKind::*;

        let key = crate::event::normalize_name(name);
        let i = intensity.clamp(0.0, 3.0);
        if key.is_empty() || key == "none" {
            return Self::NONE;
        }

        let (kind, amp, freq) = match key.as_str() {
            "left_drift" => (LateralSweepLeft, 18.0, 1.0),
            "right_drift" => (LateralSweepRight, 18.0, 1.0),
            "left_right_drift" => (SinusoidalPathDeviation, 24.0, 1.05),
            "uniform_outward_drift" => (UniformOutwardDrift, 10.0, 1.0),
            "delayed_acceleration_ramp" => (DelayedAccelerationRamp, 10.0, 1.0),
            "rotational_field_spin" => (RotationalFieldSpin, 22.0, 0.9),
            "counter_rotation_shear" => (CounterRotationShear, 24.0, 0.9),
            "sinusoidal_path_deviation" => (SinusoidalPathDeviation, 20.0, 1.2),
            "expanding_spiral_conversion" => (ExpandingSpiralConversion, 18.0, 1.0),
            "inward_gravity_pull" => (InwardGravityPull, 26.0, 1.0),
            "elastic_repulsion_field" => (ElasticRepulsionField, 22.0, 1.0),
            "angular_phase_offset_drift" => (AngularPhaseOffsetDrift, 18.0, 1.0),
            "vertical_compression_field" => (VerticalCompressionField, 16.0, 1.0),
            "lateral_sweep_translation" => (LateralSweepRight, 18.0, 1.0),
            "orbit_anchor_conversion" => (OrbitAnchorConversion, 30.0, 0.85),
            "pulsed_velocity_modulation" => (PulsedVelocityModulation, 20.0, 1.2),
            "sector_based_speed_variation" => (SectorBasedSpeedVariation, 24.0, 1.0),
            "randomized_micro_drift" => (RandomizedMicroDrift, 10.0, 1.35),
            "zigzag_vector_flip" => (ZigzagVectorFlip, 16.0, 1.0),
            "deceleration_freeze" => (DecelerationFreeze, 18.0, 1.0),
            "radial_explosion_burst" => (RadialExplosionBurst, 34.0, 1.0),
            "expanding_radius_lock" => (ExpandingRadiusLock, 24.0, 1.0),
            "rotational_acceleration_ramp" => (RotationalAccelerationRamp, 24.0, 1.15),
            "mirror_axis_reflection" => (MirrorAxisReflection, 16.0, 1.0),
            "expanding_orbital_ringing" => (ExpandingOrbitalRinging, 24.0, 0.95),
            "delayed_homing_adjustment" => (DelayedHomingAdjustment, 20.0, 1.0),
            "staggered_time_offset_release" => (StaggeredTimeOffsetRelease, 14.0, 1.0),
            "elliptical_orbit_drift" => (EllipticalOrbitDrift, 24.0, 0.9),
            "fountain_arc" => (FountainArc, 28.0, 1.0),
            "mouse_track" => (MouseTrack, 24.0, 1.0),
            // One-shot aim has no amplitude
            "shoot_at_mouse" => return Self::new(MouseAimDirection, 0.0, 1.0),
            "sine" => (Sine, 22.0, 1.0),
            "arc" => (Arc, 60.0, 1.0),
            "rotate" => (Rotate, 18.0, 0.8),
            "spiral" => (Spiral, 22.0, 1.35),
            "accel" => (Accel, 0.0, 1.0),
            "static_rotate" => (StaticRotate, 20.0, 0.6),
            "static_pulse" => (StaticPulse, 20.0, 1.0),
            "static_expand" => (StaticExpand, 20.0, 0.8),
            _ => (UniformOutwardDrift, 10.0, 1.0),
        };

        Self::new(kind, amp * i, freq)
    }
}

/// Parameters fixed when a projectile launches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub spawn: Vec2,
    /// Initial heading (unit)
    pub direction: Vec2,
    pub base_speed: f32,
    /// Reference center of the formation
    pub orbit_center: Vec2,
    /// `spawn - orbit_center`
    pub from_center: Vec2,
    /// Unit vector away from the center, or the heading when spawned on it
    pub outward: Vec2,
    /// Unit vector toward the playfield center
    pub home_direction: Vec2,
    /// ±1 by initial angle octant
    pub sector_sign: f32,
    /// Per-projectile noise in [0, 1)
    pub local_noise: f32,
    pub amp: f32,
    pub freq: f32,
    pub phase: f32,
    pub ring_expand_distance: f32,
}

impl Launch {
    pub fn new(spawn: Vec2, angle: f32, base_speed: f32, orbit_center: Vec2) -> Self {
        let direction = crate::heading(angle);
        let from_center = spawn - orbit_center;
        let outward = match safe_normalize(from_center) {
            v if v == Vec2::ZERO => direction,
            v => v,
        };
        let home_direction = match safe_normalize(PLAYFIELD_CENTER - spawn) {
            v if v == Vec2::ZERO => direction,
            v => v,
        };

        Self {
            spawn,
            direction,
            base_speed,
            orbit_center,
            from_center,
            outward,
            home_direction,
            sector_sign: sector_sign(angle),
            local_noise: 0.0,
            amp: 0.0,
            freq: 1.0,
            phase: 0.0,
            ring_expand_distance: 0.0,
        }
    }

    pub fn with_profile(mut self, profile: MotionProfile) -> Self {
        self.amp = profile.amp;
        self.freq = profile.freq;
        self
    }

    #[inline]
    fn perp(&self) -> Vec2 {
        Vec2::new(-self.direction.y, self.direction.x)
    }

    #[inline]
    fn linear(&self, t: f32) -> Vec2 {
        self.spawn + self.direction * (self.base_speed * t)
    }

    #[inline]
    fn wave(&self, t: f32) -> f32 {
        (t * self.freq + self.phase) * TAU
    }
}

/// +1 for even octants of the launch angle, -1 for odd
pub fn sector_sign(angle: f32) -> f32 {
    let octant = (((angle + std::f32::consts::PI) / TAU) * 8.0).floor() as i32;
    if octant % 2 == 0 { 1.0 } else { -1.0 }
}

/// Position at age `t`, or `None` for target-reactive kinds
pub fn evaluate(kind: MotionKind, t: f32, l: &Launch) -> Option<Vec2> {
    use MotionKind::*;

    let pos = match kind {
        MouseTrack | MouseAimDirection => return Option::None,

        UniformOutwardDrift => l.spawn + l.outward * (l.base_speed * t),
        DelayedAccelerationRamp => l.spawn + l.outward * delayed_ramp_distance(l.base_speed, t),
        RotationalFieldSpin => {
            l.orbit_center
                + rotate(l.from_center, l.freq * t * TAU * 0.25)
                + l.outward * (l.base_speed * 0.58 * t)
        }
        CounterRotationShear => {
            l.orbit_center
                + rotate(l.from_center, l.sector_sign * l.freq * t * TAU * 0.27)
                + l.outward * (l.base_speed * 0.52 * t)
        }
        SinusoidalPathDeviation => l.linear(t) + l.perp() * (l.wave(t).sin() * l.amp),
        ExpandingSpiralConversion => {
            l.spawn + rotate(l.direction, (0.45 + l.freq * 0.55) * t * t) * (l.base_speed * t)
        }
        InwardGravityPull => {
            let lin = l.linear(t);
            lin + (l.orbit_center - lin) * (1.0 - (-(0.42 + l.amp * 0.010) * t).exp())
        }
        ElasticRepulsionField => l.linear(t) + l.outward * elastic_displacement(t, l.amp),
        AngularPhaseOffsetDrift => {
            l.spawn + rotate(l.direction, (t / 0.22).floor() * 0.08) * (l.base_speed * t)
        }
        VerticalCompressionField => l.linear(t) + compression_offset(t, l.spawn.y, l.direction),
        LateralSweepRight => l.linear(t) + Vec2::new((24.0 + l.amp * 0.85) * t, 0.0),
        LateralSweepLeft => l.linear(t) - Vec2::new((24.0 + l.amp * 0.85) * t, 0.0),
        OrbitAnchorConversion => anchor_position(t, l),
        PulsedVelocityModulation => {
            l.spawn + l.direction * pulsed_distance(l.base_speed, t, l.freq, l.phase)
        }
        SectorBasedSpeedVariation => {
            let mul = if l.sector_sign > 0.0 { 1.28 } else { 0.74 };
            l.spawn + l.direction * (l.base_speed * mul * t)
        }
        RandomizedMicroDrift => {
            l.spawn + rotate(l.direction, micro_drift_angle(t, l.local_noise)) * (l.base_speed * t)
        }
        ZigzagVectorFlip => l.spawn + zigzag_direction(t, l.direction) * (l.base_speed * t),
        DecelerationFreeze => {
            l.spawn + l.direction * freeze_distance(l.base_speed, t, l.local_noise)
        }
        RadialExplosionBurst => l.linear(t) + burst_offset(t, l),
        ExpandingRadiusLock => radius_lock_position(t, l),
        RotationalAccelerationRamp => rotation_ramp_position(t, l),
        MirrorAxisReflection => mirror_position(t, l),
        ExpandingOrbitalRinging => orbital_ringing_position(t, l),
        DelayedHomingAdjustment => delayed_homing_position(t, l),
        StaggeredTimeOffsetRelease => stagger_release_position(t, l),
        EllipticalOrbitDrift => elliptical_drift_position(t, l),
        FountainArc => fountain_position(t, l),

        None | Sine | Arc | Rotate | Spiral | Accel | StaticRotate | StaticPulse
        | StaticExpand => base_position(kind, t, l) + base_offset(kind, t, l),
    };
    Some(pos)
}

/// Straight-line base for the offset kinds (legacy accel adds a constant push)
fn base_position(kind: MotionKind, t: f32, l: &Launch) -> Vec2 {
    let accel = if kind == MotionKind::Accel {
        l.direction * tuning::LEGACY_ACCEL
    } else {
        Vec2::ZERO
    };
    l.linear(t) + 0.5 * accel * t * t
}

fn base_offset(kind: MotionKind, t: f32, l: &Launch) -> Vec2 {
    let w = l.wave(t);
    let a = l.amp;
    let circle = Vec2::new(w.cos(), w.sin());
    match kind {
        MotionKind::Sine => Vec2::new(w.sin() * a, 0.0),
        MotionKind::Arc => Vec2::new(t * a * 0.35, -a * t * (1.0 - 0.45 * t)),
        MotionKind::Rotate => circle * a,
        MotionKind::Spiral => circle * (a * (0.2 + t * 0.35)),
        MotionKind::StaticRotate => circle * (a * 0.45),
        MotionKind::StaticPulse => Vec2::new(w.sin() * (a * 0.45), (w * 0.5).cos() * (a * 0.22)),
        MotionKind::StaticExpand => Vec2::new(w.sin() * (a * 0.3), 0.0),
        _ => Vec2::ZERO,
    }
}

/// Slow hold, quadratic ramp, then full speed
pub fn delayed_ramp_distance(base_speed: f32, t: f32) -> f32 {
    use tuning::{RAMP_DELAY_SECS as DELAY, RAMP_HOLD_FRACTION, RAMP_WINDOW_SECS as RAMP};

    let hold = base_speed * RAMP_HOLD_FRACTION;
    if t <= DELAY {
        return hold * t;
    }

    let u = t - DELAY;
    if u <= RAMP {
        return hold * DELAY + hold * u + (base_speed - hold) * (u * u) / (2.0 * RAMP);
    }

    hold * DELAY + hold * RAMP + (base_speed - hold) * RAMP * 0.5 + base_speed * (u - RAMP)
}

/// Distance under a 0.62..1.40x sinusoidal speed multiplier
pub fn pulsed_distance(base_speed: f32, t: f32, freq: f32, phase: f32) -> f32 {
    let pulse = 0.5 + 0.5 * ((t * (0.7 + freq * 0.35) + phase) * TAU).sin();
    base_speed * (0.62 + pulse * 0.78) * t
}

fn elastic_displacement(t: f32, amp: f32) -> f32 {
    let in_phase = smoothstep01(t / 0.85);
    let out_phase = smoothstep01((t - 0.85) / 0.95);
    out_phase * out_phase * (amp * 2.25) - in_phase * (amp * 1.15)
}

fn compression_offset(t: f32, spawn_y: f32, dir: Vec2) -> Vec2 {
    // Projectiles spawned higher up get squeezed harder
    let upper = 1.0 + (1.0 - (spawn_y / PLAYFIELD_HEIGHT).clamp(0.0, 1.0)) * 1.1;
    let down = 56.0 * upper * t * t;
    let sign = if dir.x.abs() < 0.01 { 1.0 } else { dir.x.signum() };
    Vec2::new(down * 0.11 * sign, down)
}

fn anchor_position(t: f32, l: &Launch) -> Vec2 {
    let amp = 26.0 + l.amp * 1.2;
    let speed = 0.5 + l.freq * 0.35;
    let ang = t * TAU * speed + l.phase;

    let anchor = match (l.local_noise * 3.0).floor() as i32 % 3 {
        0 => l.orbit_center + Vec2::new(ang.cos(), ang.sin()) * amp,
        1 => l.orbit_center + Vec2::new(ang.sin() * (amp * 1.5), 0.0),
        // figure eight
        _ => {
            l.orbit_center
                + Vec2::new(ang.sin() * (amp * 1.3), (ang * 2.0).sin() * (amp * 0.7))
        }
    };

    anchor + rotate(l.from_center, ang * 0.65)
}

fn micro_drift_angle(t: f32, noise: f32) -> f32 {
    let n1 = ((t * 3.7 + noise * 11.3) * TAU).sin();
    let n2 = ((t * 6.1 + noise * 17.9) * TAU).sin() * 0.5;
    (n1 + n2) * 0.5 * 0.22
}

fn zigzag_direction(t: f32, direction: Vec2) -> Vec2 {
    const INTERVAL: f32 = 0.20;
    const FLIP_ANGLE: f32 = 0.44;
    let step = (t / INTERVAL).floor() as i32;
    let sign = if step & 1 == 0 { -1.0 } else { 1.0 };
    rotate(direction, sign * FLIP_ANGLE)
}

fn freeze_distance(base_speed: f32, t: f32, seed: f32) -> f32 {
    const FREEZE_END: f32 = 1.55;
    const RESUME_AFTER: f32 = 3.8;

    let jitter = 1.0 + (seed - 0.5) * 0.08;
    let slow_t = (t / FREEZE_END).clamp(0.0, 1.0);
    let mut distance = base_speed * jitter * (t - 0.5 * (slow_t * t));
    if t > RESUME_AFTER {
        distance += base_speed * 0.08 * (t - RESUME_AFTER);
    }
    distance.max(0.0)
}

fn burst_offset(t: f32, l: &Launch) -> Vec2 {
    if t <= tuning::BURST_DELAY_SECS {
        return Vec2::ZERO;
    }
    let dt = t - tuning::BURST_DELAY_SECS;
    let burst_dir = safe_normalize(l.direction + rotate(l.direction, (l.local_noise - 0.5) * 0.46));
    burst_dir * (l.base_speed * (1.85 + l.amp * 0.03) * dt)
}

fn radius_lock_position(t: f32, l: &Launch) -> Vec2 {
    let radius =
        l.from_center.length() + l.base_speed * 0.35 * t + (8.0 + l.amp * 0.22) * t * t;
    l.orbit_center + l.outward * radius
}

fn rotation_ramp_position(t: f32, l: &Launch) -> Vec2 {
    let base_angle = l.from_center.y.atan2(l.from_center.x);
    let radius = (l.from_center.length() + l.base_speed * 0.08 * t).max(24.0);
    let omega0 = 0.35;
    let alpha = 1.45 + l.freq * 0.55;
    let angle = base_angle + omega0 * t + 0.5 * alpha * t * t;
    l.orbit_center + crate::heading(angle) * radius
}

fn mirror_position(t: f32, l: &Launch) -> Vec2 {
    let axis_x = PLAYFIELD_CENTER.x;
    let x_raw = l.spawn.x + l.direction.x * l.base_speed * t;
    let folded = (x_raw - axis_x).abs();
    let x = if l.spawn.x < axis_x {
        axis_x - folded
    } else {
        axis_x + folded
    };
    Vec2::new(x, l.spawn.y + l.direction.y * l.base_speed * t)
}

fn orbital_ringing_position(t: f32, l: &Launch) -> Vec2 {
    let base_radius = l.from_center.length().max(20.0);
    let step = (t / 0.34).floor();
    let radius = base_radius + step * (8.0 + l.amp * 0.32);
    let base_angle = l.from_center.y.atan2(l.from_center.x);
    let omega = (0.65 + l.freq * 0.25) * TAU;
    l.orbit_center + crate::heading(base_angle + omega * t) * radius
}

fn delayed_homing_position(t: f32, l: &Launch) -> Vec2 {
    let delay = tuning::HOMING_DELAY_SECS;
    let pre = l.spawn + l.direction * (l.base_speed * t.min(delay));
    if t <= delay {
        return pre;
    }

    // Partial correction toward center, 22% of the way
    let dot = l.direction.dot(l.home_direction).clamp(-1.0, 1.0);
    let cross = l.direction.perp_dot(l.home_direction);
    let ang = dot.acos() * 0.22;
    let signed = if cross < 0.0 { -ang } else { ang };
    pre + rotate(l.direction, signed) * (l.base_speed * (t - delay))
}

fn stagger_release_position(t: f32, l: &Launch) -> Vec2 {
    let band = ((l.local_noise * 4.0).floor() / 4.0) * 0.36;
    let sector = if l.sector_sign > 0.0 { 0.06 } else { 0.18 };
    let delay = band + sector;
    if t <= delay {
        return l.spawn;
    }
    l.spawn + l.direction * (l.base_speed * (t - delay))
}

fn elliptical_drift_position(t: f32, l: &Launch) -> Vec2 {
    let base_angle = l.from_center.y.atan2(l.from_center.x);
    let theta = base_angle + (0.7 + l.freq * 0.2) * TAU * t;
    let r = l.from_center.length();
    let rx = (r * 0.9).max(20.0) + t * (12.0 + l.amp * 0.35);
    let ry = (r * 0.55).max(12.0) + t * (7.0 + l.amp * 0.22);
    let local = Vec2::new(theta.cos() * rx, theta.sin() * ry);
    l.orbit_center + rotate(local, 0.22 * t)
}

fn fountain_position(t: f32, l: &Launch) -> Vec2 {
    let outward = if l.direction.length_squared() < crate::consts::EPSILON_SQ {
        Vec2::Y
    } else {
        safe_normalize(l.direction)
    };
    let expand_speed = (120.0 + l.amp * 1.2).max(l.base_speed * 0.45);
    let configured = l.ring_expand_distance.max(0.0);
    let expand_distance = if configured > 0.01 {
        configured
    } else {
        expand_speed * tuning::FOUNTAIN_EXPAND_SECS
    };
    let expand_secs = (expand_distance / expand_speed.max(1.0)).max(0.01);

    // Keep the ring shape until the arc begins
    if t <= expand_secs {
        return l.spawn + outward * (expand_speed * t);
    }

    let u = t - expand_secs;
    let spread_base = l.spawn + outward * expand_distance;
    let keep_spread = outward * (l.base_speed * 0.55 * u);
    let launch_up = -(240.0 + l.amp * 1.8);
    let gravity = 520.0 + l.amp * 2.4;
    spread_base + keep_spread + Vec2::new(0.0, launch_up * u + 0.5 * gravity * u * u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const CENTER: Vec2 = Vec2::new(640.0, 360.0);

    fn launch(angle: f32, speed: f32, profile: MotionProfile) -> Launch {
        Launch::new(CENTER, angle, speed, CENTER).with_profile(profile)
    }

    #[test]
    fn test_resolve_known_and_fallback() {
        let p = MotionProfile::resolve("Mouse Track", 2.0);
        assert_eq!(p.kind, MotionKind::MouseTrack);
        assert_eq!(p.amp, 48.0);

        let p = MotionProfile::resolve("definitely_not_a_motion", 1.0);
        assert_eq!(p.kind, MotionKind::UniformOutwardDrift);
        assert_eq!(p.amp, 10.0);

        assert_eq!(MotionProfile::resolve("  ", 1.0), MotionProfile::NONE);
        assert_eq!(MotionProfile::resolve("none", 1.0), MotionProfile::NONE);
    }

    #[test]
    fn test_resolve_clamps_intensity() {
        let p = MotionProfile::resolve("fountain_arc", 10.0);
        assert_eq!(p.amp, 28.0 * 3.0);
        let p = MotionProfile::resolve("fountain_arc", -1.0);
        assert_eq!(p.amp, 0.0);
        let p = MotionProfile::resolve("shoot_at_mouse", 3.0);
        assert_eq!(p.amp, 0.0);
    }

    #[test]
    fn test_strategy_classification() {
        assert_eq!(MotionKind::None.strategy(), Strategy::BaseOffset);
        assert_eq!(MotionKind::Spiral.strategy(), Strategy::BaseOffset);
        assert_eq!(MotionKind::FountainArc.strategy(), Strategy::Absolute);
        assert_eq!(MotionKind::MouseTrack.strategy(), Strategy::TargetReactive);
        assert!(evaluate(MotionKind::MouseAimDirection, 1.0, &launch(0.0, 100.0, MotionProfile::NONE)).is_none());
    }

    #[test]
    fn test_sector_sign_alternates_by_octant() {
        // -π lands at octant 0
        assert_eq!(sector_sign(-std::f32::consts::PI + 0.01), 1.0);
        assert_eq!(sector_sign(-std::f32::consts::PI + TAU / 8.0 + 0.01), -1.0);
    }

    #[test]
    fn test_none_is_straight_line() {
        let l = launch(0.3, 240.0, MotionProfile::NONE);
        let p = evaluate(MotionKind::None, 1.5, &l).unwrap();
        assert!(((p - CENTER).length() - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_outward_drift_on_center_uses_heading() {
        let l = launch(FRAC_PI_2, 100.0, MotionProfile::resolve("uniform_outward_drift", 1.0));
        let p = evaluate(MotionKind::UniformOutwardDrift, 2.0, &l).unwrap();
        assert!((p - (CENTER + Vec2::new(0.0, 200.0))).length() < 1e-3);
    }

    #[test]
    fn test_sinusoidal_starts_on_spawn() {
        let l = launch(0.0, 100.0, MotionProfile::resolve("sinusoidal_path_deviation", 1.0));
        let p = evaluate(MotionKind::SinusoidalPathDeviation, 0.0, &l).unwrap();
        assert!((p - CENTER).length() < 1e-4);

        // Quarter period: full perpendicular deviation
        let quarter = 0.25 / l.freq;
        let p = evaluate(MotionKind::SinusoidalPathDeviation, quarter, &l).unwrap();
        assert!((p.y - CENTER.y - l.amp).abs() < 1e-3);
    }

    #[test]
    fn test_delayed_ramp_is_continuous() {
        let speed = 300.0;
        let eps = 1e-4;
        for edge in [0.30_f32, 1.0] {
            let before = delayed_ramp_distance(speed, edge - eps);
            let after = delayed_ramp_distance(speed, edge + eps);
            assert!((after - before).abs() < 0.1, "jump at {edge}");
        }
        // Hold speed during the delay window
        assert!((delayed_ramp_distance(speed, 0.2) - speed * 0.06 * 0.2).abs() < 1e-4);
        // Full speed afterwards
        let slope = (delayed_ramp_distance(speed, 2.0) - delayed_ramp_distance(speed, 1.5)) / 0.5;
        assert!((slope - speed).abs() < 0.01);
    }

    #[test]
    fn test_pulsed_distance_bounds() {
        for i in 1..50 {
            let t = i as f32 * 0.1;
            let d = pulsed_distance(100.0, t, 1.2, 0.3);
            assert!(d >= 100.0 * 0.62 * t - 1e-3);
            assert!(d <= 100.0 * 1.40 * t + 1e-3);
        }
    }

    #[test]
    fn test_stagger_holds_at_spawn() {
        let mut l = launch(0.1, 200.0, MotionProfile::resolve("staggered_time_offset_release", 1.0));
        l.local_noise = 0.9;
        l.sector_sign = -1.0;
        // delay = 0.27 + 0.18
        assert_eq!(evaluate(MotionKind::StaggeredTimeOffsetRelease, 0.4, &l), Some(CENTER));
        let p = evaluate(MotionKind::StaggeredTimeOffsetRelease, 1.45, &l).unwrap();
        assert!(((p - CENTER).length() - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_mirror_never_crosses_axis() {
        let mut l = launch(0.0, 300.0, MotionProfile::resolve("mirror_axis_reflection", 1.0));
        l.spawn = Vec2::new(500.0, 300.0);
        for i in 0..40 {
            let p = evaluate(MotionKind::MirrorAxisReflection, i as f32 * 0.1, &l).unwrap();
            assert!(p.x <= 640.0 + 1e-3);
        }
    }

    #[test]
    fn test_fountain_expands_then_falls() {
        let l = launch(0.0, 200.0, MotionProfile::resolve("fountain_arc", 1.0));
        let early = evaluate(MotionKind::FountainArc, 0.1, &l).unwrap();
        assert!((early.y - CENTER.y).abs() < 1e-4);
        assert!(early.x > CENTER.x);

        // Gravity wins eventually
        let late = evaluate(MotionKind::FountainArc, 3.0, &l).unwrap();
        assert!(late.y > CENTER.y);
    }

    #[test]
    fn test_zigzag_alternates() {
        let a = zigzag_direction(0.1, Vec2::X);
        let b = zigzag_direction(0.3, Vec2::X);
        assert!(a.y < 0.0);
        assert!(b.y > 0.0);
    }

    #[test]
    fn test_every_analytic_kind_is_pure() {
        use MotionKind::*;
        let kinds = [
            None, UniformOutwardDrift, DelayedAccelerationRamp, RotationalFieldSpin,
            CounterRotationShear, SinusoidalPathDeviation, ExpandingSpiralConversion,
            InwardGravityPull, ElasticRepulsionField, AngularPhaseOffsetDrift,
            VerticalCompressionField, LateralSweepRight, LateralSweepLeft,
            OrbitAnchorConversion, PulsedVelocityModulation, SectorBasedSpeedVariation,
            RandomizedMicroDrift, ZigzagVectorFlip, DecelerationFreeze, RadialExplosionBurst,
            ExpandingRadiusLock, RotationalAccelerationRamp, MirrorAxisReflection,
            ExpandingOrbitalRinging, DelayedHomingAdjustment, StaggeredTimeOffsetRelease,
            EllipticalOrbitDrift, FountainArc, Sine, Arc, Rotate, Spiral, Accel,
            StaticRotate, StaticPulse, StaticExpand,
        ];
        let mut l = Launch::new(Vec2::new(300.0, 200.0), 0.7, 180.0, CENTER);
        l.amp = 20.0;
        l.phase = 1.3;
        l.local_noise = 0.42;
        for kind in kinds {
            let a = evaluate(kind, 1.234, &l).unwrap();
            let b = evaluate(kind, 1.234, &l).unwrap();
            assert_eq!(a.to_array(), b.to_array(), "{kind:?}");
            assert!(a.is_finite(), "{kind:?}");
        }
    }
}
