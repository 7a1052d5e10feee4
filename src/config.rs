//! Level defaults and engine tuning
//!
//! `LevelConfig` arrives with the level document; `EngineTuning` is owned by
//! the host (difficulty sliders, replay seed).

use serde::{Deserialize, Serialize};

/// Global defaults supplied by the level document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelConfig {
    /// Player hitbox radius used by balancing and collision queries
    pub cursor_hitbox_radius: f32,
    /// Extra clearance required on top of the hitbox diameter
    pub wave_safety_margin: f32,
    /// Shrink wave patterns until their lane gap is dodgeable
    pub auto_balance_waves: bool,
    /// Outline thickness for events that don't set one
    pub bullet_outline_thickness: f32,

    // === Center spawn warnings ===
    /// Events spawning within this distance of the playfield center get a warning marker
    pub center_warning_radius: f32,
    /// How long before the spawn the warning appears
    pub center_warning_lead_ms: i32,
    /// Peak warning alpha
    pub center_warning_alpha: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            cursor_hitbox_radius: 4.0,
            wave_safety_margin: 8.0,
            auto_balance_waves: true,
            bullet_outline_thickness: 2.0,

            center_warning_radius: 120.0,
            center_warning_lead_ms: 350,
            center_warning_alpha: 0.35,
        }
    }
}

impl LevelConfig {
    /// Clamp the document's globals into their supported ranges
    pub fn normalize(&mut self) {
        self.cursor_hitbox_radius = self.cursor_hitbox_radius.clamp(2.0, 12.0);
        self.wave_safety_margin = self.wave_safety_margin.clamp(0.0, 40.0);
        self.bullet_outline_thickness = self.bullet_outline_thickness.clamp(0.5, 6.0);
        self.center_warning_radius = self.center_warning_radius.clamp(0.0, 500.0);
        self.center_warning_lead_ms = self.center_warning_lead_ms.clamp(0, 2000);
        self.center_warning_alpha = self.center_warning_alpha.clamp(0.05, 1.0);
    }

    /// Lane gap every wave pattern must leave open
    pub fn required_gap(&self) -> f32 {
        self.cursor_hitbox_radius * 2.0 + self.wave_safety_margin
    }
}

/// Host-side tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Projectile radius for events that don't set one
    pub default_bullet_radius: f32,
    /// Countdown digits show within this window before a spawn
    pub spawn_countdown_lead_ms: i32,
    /// Uniform multiplier on ring counts (difficulty)
    pub ring_density_scale: f32,
    /// Replay seed for per-projectile noise and phases
    pub seed: u64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            default_bullet_radius: 10.0,
            spawn_countdown_lead_ms: 3000,
            ring_density_scale: 1.0,
            seed: 99,
        }
    }
}

impl EngineTuning {
    /// Density scale clamped to its supported range
    pub fn effective_density(&self) -> f32 {
        self.ring_density_scale.clamp(0.25, 3.0)
    }

    /// Apply the density scale to a ring's base count
    pub fn scale_ring_count(&self, base_count: u32) -> u32 {
        ((base_count as f32 * self.effective_density()).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_config_defaults_from_partial_json() {
        let cfg: LevelConfig = serde_json::from_str(r#"{"cursorHitboxRadius": 6.0}"#).unwrap();
        assert_eq!(cfg.cursor_hitbox_radius, 6.0);
        assert_eq!(cfg.wave_safety_margin, 8.0);
        assert!(cfg.auto_balance_waves);
        assert_eq!(cfg.required_gap(), 20.0);
    }

    #[test]
    fn test_scale_ring_count() {
        let mut tuning = EngineTuning::default();
        assert_eq!(tuning.scale_ring_count(12), 12);

        tuning.ring_density_scale = 0.5;
        assert_eq!(tuning.scale_ring_count(12), 6);

        // Clamped to 0.25
        tuning.ring_density_scale = 0.0;
        assert_eq!(tuning.scale_ring_count(8), 2);

        // Clamped to 3.0
        tuning.ring_density_scale = 10.0;
        assert_eq!(tuning.scale_ring_count(10), 30);
    }
}
