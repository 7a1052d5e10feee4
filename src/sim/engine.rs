//! The hazard engine: scheduling, spawning, stepping and queries
//!
//! One `BulletEngine` owns every live projectile and beam. The host drives it
//! with `update` once per frame and pulls hit tests and snapshots in between.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::balance::{BalanceOutcome, balance};
use super::beam::{Beam, BeamField};
use super::collision::{self, DangerBudget};
use super::geometry::{SpawnGeometry, SpawnPlan, Volley};
use super::motion::{Launch, MotionKind};
use super::projectile::{Projectile, ProjectilePool};
use super::schedule::{Markers, Scheduler, SpawnCountdown, SpawnWarning};
use crate::config::{EngineTuning, LevelConfig};
use crate::consts::EPSILON_SQ;
use crate::event::{Level, SpawnEvent, Style};

/// Summary of a `reset`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub events: usize,
    /// Events whose count auto-balance reduced
    pub thinned: usize,
    pub potentially_impossible: usize,
    pub warnings: usize,
    pub countdowns: usize,
}

/// What happened during one `update`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    pub events_dispatched: usize,
    pub projectiles_spawned: usize,
    pub beams_spawned: usize,
    pub projectiles_recycled: usize,
    pub beams_removed: usize,
    pub active_projectiles: usize,
    pub active_beams: usize,
    pub danger: DangerBudget,
}

impl FrameReport {
    /// Live projectiles plus beams in any phase
    pub fn active_hazards(&self) -> usize {
        self.active_projectiles + self.active_beams
    }
}

/// Point-in-time counters for tooling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    pub potentially_impossible_events: usize,
    pub active_hazards: usize,
    pub near_hazards: usize,
    pub min_clearance: f32,
    pub events_dispatched: usize,
    pub events_remaining: usize,
    pub pool_capacity: usize,
}

#[derive(Debug)]
pub struct BulletEngine {
    tuning: EngineTuning,
    config: LevelConfig,
    scheduler: Scheduler,
    markers: Markers,
    geometry: SpawnGeometry,
    projectiles: ProjectilePool,
    beams: BeamField,
    rng: Pcg32,
    potentially_impossible: usize,
    danger: DangerBudget,
}

impl BulletEngine {
    pub fn new(tuning: EngineTuning) -> Self {
        let rng = Pcg32::seed_from_u64(tuning.seed);
        Self {
            tuning,
            config: LevelConfig::default(),
            scheduler: Scheduler::default(),
            markers: Markers::default(),
            geometry: SpawnGeometry::new(),
            projectiles: ProjectilePool::new(),
            beams: BeamField::new(),
            rng,
            potentially_impossible: 0,
            danger: DangerBudget::default(),
        }
    }

    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    /// Tuning changes apply to events spawned from now on
    pub fn tuning_mut(&mut self) -> &mut EngineTuning {
        &mut self.tuning
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Balance and schedule a level, then clear all runtime state
    pub fn reset(&mut self, level: &Level) -> ResetReport {
        self.config = level.config.clone();

        let mut report = ResetReport::default();
        let balanced: Vec<SpawnEvent> = level
            .bullets
            .iter()
            .map(|evt| {
                let (evt, outcome) = balance(evt, &self.config, &self.tuning);
                report.thinned += usize::from(outcome.thinned());
                report.potentially_impossible += usize::from(outcome.potentially_impossible);
                evt
            })
            .collect();

        self.scheduler = Scheduler::new(balanced);
        self.markers = Markers::build(self.scheduler.events(), &self.config);
        self.potentially_impossible = report.potentially_impossible;
        self.clear_runtime();

        report.events = self.scheduler.events().len();
        report.warnings = self.markers.warnings.len();
        report.countdowns = self.markers.countdowns.len();

        log::info!(
            "Level reset: {} events, {} thinned, {} potentially impossible",
            report.events,
            report.thinned,
            report.potentially_impossible
        );
        report
    }

    /// Drop every live hazard and rewind the schedule; replaying afterwards
    /// reproduces the same frames
    pub fn clear_runtime(&mut self) {
        self.projectiles.clear();
        self.beams.clear();
        self.geometry.reset();
        self.scheduler.rewind();
        self.rng = Pcg32::seed_from_u64(self.tuning.seed);
        self.danger = DangerBudget::default();
    }

    /// Advance one frame: dispatch due events, then step beams and projectiles
    ///
    /// `timeline_ms` must not decrease between calls without a `reset` or
    /// `clear_runtime`.
    pub fn update(&mut self, dt: f32, timeline_ms: i32, target: Vec2) -> FrameReport {
        let mut report = FrameReport::default();

        for i in self.scheduler.take_due(timeline_ms) {
            let event = self.scheduler.events()[i].clone();
            log::debug!(
                "Dispatch {} at {} ms (count {})",
                event.pattern,
                event.time_ms,
                event.count
            );
            let (projectiles, beams) = self.spawn(&event, target);
            report.events_dispatched += 1;
            report.projectiles_spawned += projectiles;
            report.beams_spawned += beams;
        }

        report.beams_removed = self.beams.update(dt * 1000.0, target);
        report.projectiles_recycled = self.projectiles.step_all(|p| {
            p.advance(dt, target);
            !(p.is_out_of_bounds() || p.is_expired())
        });
        if report.projectiles_recycled > 0 {
            log::trace!("Recycled {} projectiles", report.projectiles_recycled);
        }

        self.danger = DangerBudget::measure(self.projectiles.iter(), self.beams.iter(), target);

        report.active_projectiles = self.projectiles.len();
        report.active_beams = self.beams.len();
        report.danger = self.danger;
        report
    }

    /// True when any projectile or active beam touches the target circle
    pub fn check_hit(&self, target: Vec2, target_radius: f32) -> bool {
        collision::check_hit(self.projectiles.iter(), self.beams.iter(), target, target_radius)
    }

    /// Hit test with the level's hitbox radius
    pub fn check_target_hit(&self, target: Vec2) -> bool {
        self.check_hit(target, self.config.cursor_hitbox_radius)
    }

    /// Balance and spawn one event now, outside the schedule
    pub fn spawn_immediate(&mut self, event: &SpawnEvent, target: Vec2) -> BalanceOutcome {
        let (balanced, outcome) = balance(event, &self.config, &self.tuning);
        if outcome.potentially_impossible {
            self.potentially_impossible += 1;
        }
        self.spawn(&balanced, target);
        outcome
    }

    /// Returns (projectiles, beams) created
    fn spawn(&mut self, event: &SpawnEvent, target: Vec2) -> (usize, usize) {
        let style = Style::resolve(event, &self.config, &self.tuning);
        match self.geometry.expand(event, target, &self.tuning) {
            SpawnPlan::Beam(seed) => {
                let phase = self.rng.random::<f32>() * TAU;
                self.beams.push(Beam::new(&seed, phase, style.fill, style.outline));
                (0, 1)
            }
            SpawnPlan::Volley(volley) => {
                let life = event.life_secs();
                self.launch_volley(&volley, style, life, target);
                (volley.seeds.len(), 0)
            }
        }
    }

    fn launch_volley(&mut self, volley: &Volley, style: Style, life: f32, target: Vec2) {
        let kind = volley.profile.kind;
        for seed in &volley.seeds {
            let mut launch = Launch::new(seed.position, seed.angle, volley.speed, seed.orbit_center)
                .with_profile(volley.profile);
            launch.ring_expand_distance = volley.ring_expand_distance;
            launch.local_noise = self.rng.random::<f32>();
            // Side-to-side waves always start on the placed spawn point
            launch.phase = if kind == MotionKind::SinusoidalPathDeviation {
                0.0
            } else {
                self.rng.random::<f32>() * TAU
            };

            let mut aim = launch.direction;
            if kind == MotionKind::MouseAimDirection {
                let to_target = target - seed.position;
                if to_target.length_squared() > EPSILON_SQ {
                    aim = to_target.normalize();
                }
            }

            let projectile = Projectile::new(launch, kind, seed.angle, aim, style).with_life(life);
            self.projectiles.checkout(projectile);
        }
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn beams(&self) -> impl Iterator<Item = &Beam> {
        self.beams.iter()
    }

    pub fn warnings(&self) -> &[SpawnWarning] {
        &self.markers.warnings
    }

    pub fn countdowns(&self) -> &[SpawnCountdown] {
        &self.markers.countdowns
    }

    /// Balanced events in dispatch order
    pub fn events(&self) -> &[SpawnEvent] {
        self.scheduler.events()
    }

    pub fn active_hazards(&self) -> usize {
        self.projectiles.len() + self.beams.len()
    }

    pub fn potentially_impossible_events(&self) -> usize {
        self.potentially_impossible
    }

    pub fn danger(&self) -> DangerBudget {
        self.danger
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            potentially_impossible_events: self.potentially_impossible,
            active_hazards: self.active_hazards(),
            near_hazards: self.danger.near_count,
            min_clearance: self.danger.min_clearance,
            events_dispatched: self.scheduler.dispatched(),
            events_remaining: self.scheduler.remaining(),
            pool_capacity: self.projectiles.capacity(),
        }
    }

    /// FNV-1a over every hazard's position bits, for replay comparisons
    pub fn signature(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0100_0000_01b3;

        let mut hash = OFFSET;
        let mut mix = |v: f32| {
            for byte in v.to_bits().to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(PRIME);
            }
        };
        for p in self.projectiles.iter() {
            mix(p.position.x);
            mix(p.position.y);
        }
        for b in self.beams.iter() {
            mix(b.start.x);
            mix(b.start.y);
            mix(b.end.x);
            mix(b.end.y);
        }
        hash
    }
}

impl Default for BulletEngine {
    fn default() -> Self {
        Self::new(EngineTuning::default())
    }
}
