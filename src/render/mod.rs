//! Read-only draw snapshots
//!
//! The engine never draws. Each frame the host captures a `FrameSnapshot`
//! and hands its instance slices to whatever renderer it runs.

pub mod instance;

pub use instance::{BeamInstance, CountdownLabel, ProjectileInstance, WarningInstance};

use crate::sim::BulletEngine;

/// Everything visible at one timeline position
#[derive(Debug, Default, Clone)]
pub struct FrameSnapshot {
    pub timeline_ms: i32,
    pub projectiles: Vec<ProjectileInstance>,
    pub beams: Vec<BeamInstance>,
    pub warnings: Vec<WarningInstance>,
    pub countdowns: Vec<CountdownLabel>,
}

impl FrameSnapshot {
    pub fn capture(engine: &BulletEngine, timeline_ms: i32) -> Self {
        let mut snapshot = Self::default();
        snapshot.refill(engine, timeline_ms);
        snapshot
    }

    /// Rebuild in place, keeping the buffers' allocations
    pub fn refill(&mut self, engine: &BulletEngine, timeline_ms: i32) {
        self.timeline_ms = timeline_ms;

        self.projectiles.clear();
        self.projectiles
            .extend(engine.projectiles().map(ProjectileInstance::from));

        self.beams.clear();
        self.beams.extend(engine.beams().map(BeamInstance::from));

        let alpha = engine.config().center_warning_alpha;
        self.warnings.clear();
        self.warnings.extend(
            engine
                .warnings()
                .iter()
                .filter_map(|w| WarningInstance::at(w, timeline_ms, alpha)),
        );

        let lead = engine.tuning().spawn_countdown_lead_ms;
        self.countdowns.clear();
        self.countdowns.extend(
            engine
                .countdowns()
                .iter()
                .filter_map(|c| CountdownLabel::at(c, timeline_ms, lead)),
        );
    }

    pub fn projectile_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.projectiles)
    }

    pub fn beam_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.beams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use crate::consts::PLAYFIELD_CENTER;
    use crate::event::{Level, SpawnEvent};

    #[test]
    fn test_instance_layouts() {
        assert_eq!(std::mem::size_of::<ProjectileInstance>(), 80);
        assert_eq!(std::mem::size_of::<BeamInstance>(), 64);
        assert_eq!(std::mem::size_of::<WarningInstance>(), 16);
        assert_eq!(std::mem::size_of::<CountdownLabel>(), 16);
    }

    #[test]
    fn test_capture_frame() {
        let mut laser = SpawnEvent::new(0, "laser_static", 1, 100.0);
        laser.x = Some(0.2);
        let events = vec![
            SpawnEvent::new(0, "ring_8", 1, 100.0),
            laser,
            SpawnEvent::new(2000, "radial", 10, 100.0),
        ];
        let mut engine = BulletEngine::default();
        engine.reset(&Level::new(LevelConfig::default(), events));
        engine.update(0.016, 0, PLAYFIELD_CENTER);

        let snapshot = FrameSnapshot::capture(&engine, 0);
        assert_eq!(snapshot.projectiles.len(), 8);
        assert_eq!(snapshot.beams.len(), 1);
        assert_eq!(snapshot.beams[0].active, 0);
        assert_eq!(snapshot.projectile_bytes().len(), 8 * 80);
        // Only the 2000 ms event is still ahead, 2 s out
        assert_eq!(snapshot.countdowns.len(), 1);
        assert_eq!(snapshot.countdowns[0].digit, 2);
        // The centered ring is at its spawn moment; the laser is off-center
        assert_eq!(snapshot.warnings.len(), 1);

        let first = &snapshot.projectiles[0];
        assert_eq!(first.radius, 10.0);
        assert_eq!(first.scale, 1.0);

        let later = FrameSnapshot::capture(&engine, 1700);
        assert_eq!(later.warnings.len(), 1);
        assert_eq!(later.warnings[0].position, PLAYFIELD_CENTER.to_array());
    }

    #[test]
    fn test_projectile_scale_is_separate_from_radius() {
        let mut engine = BulletEngine::default();
        let mut evt = SpawnEvent::new(0, "static_single", 1, 100.0);
        evt.bullet_size = Some(12.0);
        engine.spawn_immediate(&evt, PLAYFIELD_CENTER);

        let mut projectile = engine.projectiles().next().cloned().unwrap();
        projectile.scale = 1.5;
        let instance = ProjectileInstance::from(&projectile);
        assert_eq!(instance.radius, 12.0);
        assert_eq!(instance.scale, 1.5);
        assert_eq!(projectile.hit_radius(), 18.0);

        let bytes = bytemuck::bytes_of(&instance);
        assert_eq!(bytes[28..32], 1.5f32.to_ne_bytes());
    }
}
