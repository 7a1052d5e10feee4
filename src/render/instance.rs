//! Per-instance draw data for the hazard renderer
//!
//! Layouts are `#[repr(C)]` with explicit field offsets so a GPU consumer can
//! upload a slice with `bytemuck::cast_slice` and no repacking.

use bytemuck::{Pod, Zeroable};

use crate::sim::{Beam, BeamPhase, Projectile, SpawnCountdown, SpawnWarning};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ProjectileInstance {
    pub position: [f32; 2],     // offset 0
    pub radius: f32,            // offset 8, unscaled
    pub rotation: f32,          // offset 12
    pub outline_thickness: f32, // offset 16
    pub glow_intensity: f32,    // offset 20
    pub shape: u32,             // offset 24
    pub scale: f32,             // offset 28, drawn radius = radius * scale
    pub fill: [f32; 4],         // offset 32
    pub outline: [f32; 4],      // offset 48
    pub glow: [f32; 4],         // offset 64
}

impl From<&Projectile> for ProjectileInstance {
    fn from(p: &Projectile) -> Self {
        Self {
            position: p.position.to_array(),
            radius: p.style.radius,
            rotation: p.rotation,
            outline_thickness: p.style.outline_thickness,
            glow_intensity: p.style.glow_intensity,
            shape: p.style.shape as u32,
            scale: p.scale,
            fill: p.style.fill.to_f32(),
            outline: p.style.outline.to_f32(),
            glow: p.style.glow.to_f32(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BeamInstance {
    pub start: [f32; 2],  // offset 0
    pub end: [f32; 2],    // offset 8
    pub width: f32,       // offset 16
    pub active: u32,      // offset 20, 0 = telegraph
    pub alpha: f32,       // offset 24
    pub pulse: f32,       // offset 28
    pub fill: [f32; 4],   // offset 32
    pub outline: [f32; 4], // offset 48
}

impl From<&Beam> for BeamInstance {
    fn from(b: &Beam) -> Self {
        let (active, alpha, pulse) = match b.phase_at() {
            BeamPhase::Active => (1, b.active_fade(), 0.0),
            BeamPhase::Telegraph | BeamPhase::Expired => {
                let pulse = b.telegraph_pulse();
                (0, 0.14 + b.telegraph_progress() * 0.22 + pulse * 0.42, pulse)
            }
        };
        Self {
            start: b.start.to_array(),
            end: b.end.to_array(),
            width: b.width,
            active,
            alpha,
            pulse,
            fill: b.fill.to_f32(),
            outline: b.outline.to_f32(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WarningInstance {
    pub position: [f32; 2],
    pub radius: f32,
    pub alpha: f32,
}

impl WarningInstance {
    pub fn at(warning: &SpawnWarning, timeline_ms: i32, base_alpha: f32) -> Option<Self> {
        let alpha = warning.alpha_at(timeline_ms, base_alpha)?;
        Some(Self {
            position: warning.position.to_array(),
            radius: warning.radius_at(timeline_ms),
            alpha,
        })
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CountdownLabel {
    pub position: [f32; 2],
    pub digit: u32,
    pub alpha: f32,
}

impl CountdownLabel {
    pub fn at(countdown: &SpawnCountdown, timeline_ms: i32, lead_ms: i32) -> Option<Self> {
        let (digit, alpha) = countdown.number_at(timeline_ms, lead_ms)?;
        // Centers a two-scale glyph on the spawn point
        let position = countdown.position + glam::Vec2::new(-7.0, -13.0);
        Some(Self {
            position: position.to_array(),
            digit,
            alpha,
        })
    }
}
