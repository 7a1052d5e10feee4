//! Authored spawn events and level documents
//!
//! Field names follow the beatmap's camelCase JSON. Only the fields the
//! hazard engine consumes are modeled; everything else in the document is
//! ignored on load.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{EngineTuning, LevelConfig};
use crate::consts::{MIN_SPEED, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::error::LoadError;

/// A timed projectile or beam burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnEvent {
    pub time_ms: i32,
    pub pattern: String,
    pub count: i32,
    pub speed: f32,

    // === Geometry ===
    pub spread_deg: Option<f32>,
    pub angle_step_deg: Option<f32>,
    pub direction_deg: Option<f32>,
    pub wall_width: Option<f32>,
    pub ring_expand_distance: Option<f32>,
    /// Normalized spawn position (0..1 across the playfield)
    pub x: Option<f32>,
    pub y: Option<f32>,

    // === Motion ===
    pub motion_pattern: Option<String>,
    pub movement_intensity: Option<f32>,
    /// Finite projectile lifetime; absent or 0 means unbounded
    pub life_ms: Option<i32>,

    // === Laser ===
    pub telegraph_ms: Option<i32>,
    pub laser_duration_ms: Option<i32>,
    pub laser_width: Option<f32>,
    pub laser_length: Option<f32>,

    // === Style (opaque to the simulation) ===
    pub bullet_type: Option<String>,
    pub bullet_size: Option<f32>,
    pub radius: Option<f32>,
    pub color: Option<String>,
    pub outline_color: Option<String>,
    pub glow_color: Option<String>,
    pub glow_intensity: Option<f32>,
    pub outline_thickness: Option<f32>,
}

impl Default for SpawnEvent {
    fn default() -> Self {
        Self {
            time_ms: 0,
            pattern: "radial".to_string(),
            count: 1,
            speed: 250.0,
            spread_deg: None,
            angle_step_deg: None,
            direction_deg: None,
            wall_width: None,
            ring_expand_distance: None,
            x: None,
            y: None,
            motion_pattern: None,
            movement_intensity: None,
            life_ms: None,
            telegraph_ms: None,
            laser_duration_ms: None,
            laser_width: None,
            laser_length: None,
            bullet_type: None,
            bullet_size: None,
            radius: None,
            color: None,
            outline_color: None,
            glow_color: None,
            glow_intensity: None,
            outline_thickness: None,
        }
    }
}

/// Lowercase, trim, and underscore a pattern or motion name
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

impl SpawnEvent {
    pub fn new(time_ms: i32, pattern: &str, count: i32, speed: f32) -> Self {
        Self {
            time_ms,
            pattern: pattern.to_string(),
            count,
            speed,
            ..Default::default()
        }
    }

    /// Normalized pattern name with legacy aliases resolved
    pub fn pattern_key(&self) -> String {
        let key = normalize_name(&self.pattern);
        match key.as_str() {
            "rottodriftfan" => "rot_drift_fan".to_string(),
            "static_ring" => "ring_12".to_string(),
            _ => key,
        }
    }

    /// Normalized motion name, `None` when absent or blank
    pub fn motion_key(&self) -> Option<String> {
        self.motion_pattern
            .as_deref()
            .map(normalize_name)
            .filter(|m| !m.is_empty())
    }

    /// Spawn point in playfield coordinates
    pub fn origin(&self) -> Vec2 {
        Vec2::new(
            self.x.unwrap_or(0.5) * PLAYFIELD_WIDTH,
            self.y.unwrap_or(0.5) * PLAYFIELD_HEIGHT,
        )
    }

    /// Count clamped to at least one
    pub fn clamped_count(&self) -> u32 {
        self.count.max(1) as u32
    }

    /// Speed clamped to the positive floor
    pub fn clamped_speed(&self) -> f32 {
        self.speed.max(MIN_SPEED)
    }

    /// Projectile radius, falling back to the engine default
    pub fn projectile_radius(&self, default_radius: f32) -> f32 {
        self.bullet_size.or(self.radius).unwrap_or(default_radius)
    }

    pub fn intensity(&self) -> f32 {
        self.movement_intensity.unwrap_or(1.0)
    }

    /// Finite life in seconds (0 = unbounded)
    pub fn life_secs(&self) -> f32 {
        self.life_ms.map(|ms| ms.max(0) as f32 / 1000.0).unwrap_or(0.0)
    }

    /// Clamp authored fields the way the level loader does
    pub fn normalize(&mut self) {
        self.count = self.count.max(1);
        self.speed = self.speed.max(MIN_SPEED);

        self.bullet_size = self.bullet_size.map(|v| v.clamp(2.0, 64.0));
        self.radius = self.radius.map(|v| v.clamp(2.0, 40.0));
        self.outline_thickness = self.outline_thickness.map(|v| v.clamp(0.5, 8.0));
        self.glow_intensity = self.glow_intensity.map(|v| v.clamp(0.0, 2.0));

        self.spread_deg = self.spread_deg.map(|v| v.clamp(1.0, 360.0));
        self.angle_step_deg = self.angle_step_deg.map(|v| v.clamp(-180.0, 180.0));
        self.direction_deg = self.direction_deg.map(|v| v.clamp(-720.0, 720.0));
        self.movement_intensity = self.movement_intensity.map(|v| v.clamp(0.0, 3.0));

        self.telegraph_ms = self.telegraph_ms.map(|v| v.clamp(50, 5000));
        self.laser_duration_ms = self.laser_duration_ms.map(|v| v.clamp(50, 4000));
        self.laser_width = self.laser_width.map(|v| v.clamp(4.0, 220.0));
        self.laser_length = self.laser_length.map(|v| v.clamp(100.0, 2600.0));

        self.x = self.x.map(|v| v.clamp(0.0, 1.0));
        self.y = self.y.map(|v| v.clamp(0.0, 1.0));

        let pattern = self.pattern.trim().to_lowercase();
        self.pattern = if pattern.is_empty() {
            "radial".to_string()
        } else {
            pattern
        };
    }
}

/// A level document: global defaults plus the bullet timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Level {
    #[serde(flatten)]
    pub config: LevelConfig,
    pub bullets: Vec<SpawnEvent>,
}

impl Level {
    pub fn new(config: LevelConfig, bullets: Vec<SpawnEvent>) -> Self {
        Self { config, bullets }
    }

    /// Parse a level from JSON and normalize it
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let mut level: Level = serde_json::from_str(json)?;
        level.normalize()?;
        Ok(level)
    }

    /// Read and parse a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Clamp globals and events into their supported ranges
    ///
    /// A negative event time is the only hard error. Blank patterns become
    /// `radial`; every other out-of-range value is clamped.
    pub fn normalize(&mut self) -> Result<(), LoadError> {
        self.config.normalize();
        for (index, event) in self.bullets.iter_mut().enumerate() {
            if event.time_ms < 0 {
                return Err(LoadError::NegativeTime {
                    index,
                    time_ms: event.time_ms,
                });
            }
            event.normalize();
        }
        Ok(())
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const DEFAULT_FILL: Rgba = Rgba::rgb(235, 40, 50);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        match s.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Per-channel linear blend
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Normalized float color for GPU buffers
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Projectile silhouette (opaque to collision, which is always circular)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum BulletShape {
    #[default]
    Orb,
    Rice,
    Kunai,
    Butterfly,
    Star,
    Arrowhead,
    Droplet,
    Crystal,
    Diamond,
    Petal,
    FlameShard,
    CrossShard,
    Crescent,
    HeartShard,
    HexShard,
}

impl BulletShape {
    pub fn from_name(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return BulletShape::Orb;
        };
        match raw.trim().to_lowercase().as_str() {
            "rice" => BulletShape::Rice,
            "kunai" => BulletShape::Kunai,
            "butterfly" => BulletShape::Butterfly,
            "star" => BulletShape::Star,
            "arrow" | "arrowhead" => BulletShape::Arrowhead,
            "droplet" => BulletShape::Droplet,
            "crystal" | "crystal_shard" => BulletShape::Crystal,
            "diamond" => BulletShape::Diamond,
            "petal" => BulletShape::Petal,
            "flame_shard" => BulletShape::FlameShard,
            "cross_shard" => BulletShape::CrossShard,
            "crescent" => BulletShape::Crescent,
            "heart_shard" => BulletShape::HeartShard,
            "hex_shard" => BulletShape::HexShard,
            _ => BulletShape::Orb,
        }
    }
}

/// Resolved visual style for one event's projectiles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub radius: f32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub glow: Rgba,
    pub glow_intensity: f32,
    pub outline_thickness: f32,
    pub shape: BulletShape,
}

impl Style {
    pub fn resolve(event: &SpawnEvent, config: &LevelConfig, tuning: &EngineTuning) -> Self {
        let fill = event
            .color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or(Rgba::DEFAULT_FILL);
        let outline = event
            .outline_color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or(Rgba::BLACK);
        let glow = event
            .glow_color
            .as_deref()
            .and_then(Rgba::parse)
            .unwrap_or_else(|| fill.lerp(Rgba::WHITE, 0.35));

        Self {
            radius: event.projectile_radius(tuning.default_bullet_radius),
            fill,
            outline,
            glow,
            glow_intensity: event.glow_intensity.unwrap_or(0.12),
            outline_thickness: event
                .outline_thickness
                .unwrap_or(config.bullet_outline_thickness),
            shape: BulletShape::from_name(event.bullet_type.as_deref()),
        }
    }
}
