//! Runtime projectiles and their slot pool
//!
//! Projectiles live in a generation-checked slot array. Recycled slots go on
//! a free list and are reused by the next spawn, so steady-state play never
//! grows the arena.

use glam::Vec2;

use super::motion::{self, Launch, MotionKind, Strategy, tuning};
use crate::consts::{EPSILON_SQ, RECYCLE_MAX_X, RECYCLE_MAX_Y, RECYCLE_MIN_X, RECYCLE_MIN_Y};
use crate::event::{BulletShape, Style};
use crate::{rotate_towards, safe_normalize};

/// One-shot latch for the target-reactive motions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackLatch {
    /// Still allowed to steer; `tracked_secs` counts time spent steering
    Seeking { tracked_secs: f32 },
    /// Heading is frozen for the rest of the projectile's life
    Locked,
}

impl Default for TrackLatch {
    fn default() -> Self {
        TrackLatch::Seeking { tracked_secs: 0.0 }
    }
}

/// Decide the next latch state for a mouse-tracking projectile
///
/// Returns the new latch and whether the projectile may steer this tick.
pub fn next_track_latch(
    latch: TrackLatch,
    age: f32,
    dt: f32,
    to_target: Vec2,
    heading: Vec2,
) -> (TrackLatch, bool) {
    let TrackLatch::Seeking { tracked_secs } = latch else {
        return (TrackLatch::Locked, false);
    };

    // Let the formation settle before seeking
    if age < tuning::TRACK_START_DELAY_SECS {
        return (latch, false);
    }

    let tracked_secs = tracked_secs + dt;
    let passed = to_target.dot(heading) <= 0.0;
    if (tracked_secs >= tuning::TRACK_MIN_SECS && passed) || tracked_secs >= tuning::TRACK_MAX_SECS {
        return (TrackLatch::Locked, false);
    }

    (TrackLatch::Seeking { tracked_secs }, true)
}

/// A live projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub launch: Launch,
    pub kind: MotionKind,
    pub position: Vec2,
    /// Current heading; only the target-reactive kinds ever change it
    pub heading: Vec2,
    /// Heading toward the target as seen at spawn (shoot-at-mouse)
    pub aim_direction: Vec2,
    pub age: f32,
    /// Finite lifetime in seconds, 0 = unbounded
    pub life: f32,
    pub latch: TrackLatch,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub scale: f32,
    pub style: Style,
}

impl Projectile {
    pub fn new(launch: Launch, kind: MotionKind, angle: f32, aim_direction: Vec2, style: Style) -> Self {
        let rotation = if kind == MotionKind::FountainArc {
            std::f32::consts::FRAC_PI_2
        } else {
            angle
        };
        let rotation_speed = if kind.spins() && style.shape != BulletShape::Kunai {
            2.0
        } else {
            0.0
        };

        Self {
            launch,
            kind,
            position: launch.spawn,
            heading: launch.direction,
            aim_direction,
            age: 0.0,
            life: 0.0,
            latch: TrackLatch::default(),
            rotation,
            rotation_speed,
            scale: 1.0,
            style,
        }
    }

    pub fn with_life(mut self, life: f32) -> Self {
        self.life = life.max(0.0);
        self
    }

    /// Collision radius after visual scaling
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.style.radius * self.scale
    }

    /// Advance by `dt` seconds against the current target position
    pub fn advance(&mut self, dt: f32, target: Vec2) {
        self.age += dt;
        self.position = match self.kind.strategy() {
            Strategy::Absolute | Strategy::BaseOffset => {
                motion::evaluate(self.kind, self.age, &self.launch).unwrap_or(self.position)
            }
            Strategy::TargetReactive => self.steer(dt, target),
        };
        self.scale = 1.0;
        self.rotation += self.rotation_speed * dt;
    }

    fn steer(&mut self, dt: f32, target: Vec2) -> Vec2 {
        match self.kind {
            MotionKind::MouseTrack => {
                let to_target = target - self.position;
                let (latch, steering) =
                    next_track_latch(self.latch, self.age, dt, to_target, self.heading);
                self.latch = latch;
                if steering {
                    self.heading = self.seek_heading(to_target, dt);
                }
            }
            MotionKind::MouseAimDirection => {
                if self.latch != TrackLatch::Locked && self.age >= tuning::AIM_EXPAND_SECS {
                    let aim = if self.aim_direction.length_squared() > EPSILON_SQ {
                        self.aim_direction
                    } else {
                        self.heading
                    };
                    self.heading = safe_normalize(aim);
                    self.latch = TrackLatch::Locked;
                }
            }
            _ => {}
        }
        self.position + self.heading * (self.launch.base_speed * dt)
    }

    fn seek_heading(&self, to_target: Vec2, dt: f32) -> Vec2 {
        let desired = match safe_normalize(to_target) {
            v if v == Vec2::ZERO => self.heading,
            v => v,
        };
        let blended = safe_normalize(self.heading.lerp(desired, tuning::TRACK_AIM_BLEND));
        let max_turn = ((tuning::TRACK_TURN_RATE + self.launch.amp * tuning::TRACK_TURN_PER_AMP)
            * dt)
            .max(tuning::TRACK_MIN_TURN);
        let turned = rotate_towards(self.heading, blended, max_turn);
        if turned.length_squared() < EPSILON_SQ {
            self.heading
        } else {
            turned
        }
    }

    /// Outside the playfield plus margin
    pub fn is_out_of_bounds(&self) -> bool {
        let p = self.position;
        p.x < RECYCLE_MIN_X || p.x > RECYCLE_MAX_X || p.y < RECYCLE_MIN_Y || p.y > RECYCLE_MAX_Y
    }

    pub fn is_expired(&self) -> bool {
        self.life > 0.0 && self.age >= self.life
    }
}

/// Stable handle to a pooled projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileId {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    projectile: Option<Projectile>,
}

/// Slot arena with a free list
#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    /// Live slot indices in spawn order (modulo swap-removal)
    live: Vec<u32>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a projectile, reusing a recycled slot when one is free
    pub fn checkout(&mut self, projectile: Projectile) -> ProjectileId {
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index as usize].projectile = Some(projectile);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    projectile: Some(projectile),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.live.push(index);
        ProjectileId {
            index,
            generation: self.slots[index as usize].generation,
        }
    }

    /// Recycle the projectile at position `i` of the live list
    fn recycle_at(&mut self, i: usize) {
        let index = self.live.swap_remove(i);
        let slot = &mut self.slots[index as usize];
        slot.projectile = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
    }

    /// Run `step` on every live projectile, recycling those it rejects
    ///
    /// Iterates the live list back to front so swap-removal never skips an
    /// element. Returns the number recycled.
    pub fn step_all<F>(&mut self, mut step: F) -> usize
    where
        F: FnMut(&mut Projectile) -> bool,
    {
        let mut recycled = 0;
        for i in (0..self.live.len()).rev() {
            let index = self.live[i] as usize;
            let keep = match self.slots[index].projectile.as_mut() {
                Some(p) => step(p),
                None => false,
            };
            if !keep {
                self.recycle_at(i);
                recycled += 1;
            }
        }
        recycled
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.projectile.as_ref())
    }

    /// Live projectiles in iteration order
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live
            .iter()
            .filter_map(|&i| self.slots[i as usize].projectile.as_ref())
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Total slots ever allocated (live + free)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Recycle everything, keeping the slots for reuse
    pub fn clear(&mut self) {
        while !self.live.is_empty() {
            self.recycle_at(self.live.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineTuning, LevelConfig};
    use crate::event::SpawnEvent;
    use crate::sim::motion::MotionProfile;

    fn style() -> Style {
        Style::resolve(&SpawnEvent::default(), &LevelConfig::default(), &EngineTuning::default())
    }

    fn projectile(kind: MotionKind, spawn: Vec2, angle: f32, speed: f32) -> Projectile {
        let profile = MotionProfile::new(kind, 24.0, 1.0);
        let launch = Launch::new(spawn, angle, speed, spawn).with_profile(profile);
        Projectile::new(launch, kind, angle, launch.direction, style())
    }

    #[test]
    fn test_latch_holds_during_formation() {
        let (latch, steer) = next_track_latch(TrackLatch::default(), 0.1, 0.016, Vec2::X, Vec2::X);
        assert_eq!(latch, TrackLatch::Seeking { tracked_secs: 0.0 });
        assert!(!steer);
    }

    #[test]
    fn test_latch_locks_when_target_passed() {
        let seeking = TrackLatch::Seeking { tracked_secs: 0.3 };
        // Target behind the heading
        let (latch, steer) = next_track_latch(seeking, 1.0, 0.016, -Vec2::X, Vec2::X);
        assert_eq!(latch, TrackLatch::Locked);
        assert!(!steer);

        // Too early to lock on a pass
        let early = TrackLatch::Seeking { tracked_secs: 0.0 };
        let (latch, steer) = next_track_latch(early, 1.0, 0.016, -Vec2::X, Vec2::X);
        assert!(matches!(latch, TrackLatch::Seeking { .. }));
        assert!(steer);
    }

    #[test]
    fn test_latch_locks_after_max_duration() {
        let seeking = TrackLatch::Seeking { tracked_secs: 0.89 };
        let (latch, _) = next_track_latch(seeking, 2.0, 0.02, Vec2::X, Vec2::X);
        assert_eq!(latch, TrackLatch::Locked);
        // Locked stays locked
        let (latch, steer) = next_track_latch(TrackLatch::Locked, 3.0, 0.02, Vec2::X, Vec2::X);
        assert_eq!(latch, TrackLatch::Locked);
        assert!(!steer);
    }

    #[test]
    fn test_mouse_track_turns_toward_target() {
        let mut p = projectile(MotionKind::MouseTrack, Vec2::new(100.0, 100.0), 0.0, 200.0);
        let target = Vec2::new(100.0, 600.0);
        for _ in 0..30 {
            p.advance(0.016, target);
        }
        assert!(p.heading.y > 0.0, "should have turned downward");
        assert!((p.heading.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_aim_locks_once() {
        let spawn = Vec2::new(200.0, 200.0);
        let launch = Launch::new(spawn, 0.0, 100.0, spawn);
        let mut p = Projectile::new(launch, MotionKind::MouseAimDirection, 0.0, Vec2::Y, style());

        for _ in 0..10 {
            p.advance(0.02, Vec2::ZERO);
        }
        assert_eq!(p.heading, Vec2::X);
        assert!(matches!(p.latch, TrackLatch::Seeking { .. }));

        for _ in 0..10 {
            p.advance(0.02, Vec2::ZERO);
        }
        assert_eq!(p.latch, TrackLatch::Locked);
        assert_eq!(p.heading, Vec2::Y);
    }

    #[test]
    fn test_spin_only_for_rotate_kinds() {
        let p = projectile(MotionKind::Rotate, Vec2::ZERO, 0.0, 10.0);
        assert_eq!(p.rotation_speed, 2.0);
        let p = projectile(MotionKind::None, Vec2::ZERO, 0.0, 10.0);
        assert_eq!(p.rotation_speed, 0.0);
        let p = projectile(MotionKind::FountainArc, Vec2::ZERO, 0.0, 10.0);
        assert_eq!(p.rotation, std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_finite_life_expires() {
        let mut p = projectile(MotionKind::None, Vec2::new(640.0, 360.0), 0.0, 10.0).with_life(0.5);
        p.advance(0.25, Vec2::ZERO);
        assert!(!p.is_expired());
        p.advance(0.25, Vec2::ZERO);
        assert!(p.is_expired());
    }

    #[test]
    fn test_pool_reuses_slots() {
        let mut pool = ProjectilePool::new();
        let a = pool.checkout(projectile(MotionKind::None, Vec2::ZERO, 0.0, 1.0));
        let _b = pool.checkout(projectile(MotionKind::None, Vec2::ZERO, 0.0, 1.0));
        assert_eq!(pool.len(), 2);

        // Reject everything
        let recycled = pool.step_all(|_| false);
        assert_eq!(recycled, 2);
        assert!(pool.is_empty());
        assert!(pool.get(a).is_none(), "stale handle must not resolve");

        pool.checkout(projectile(MotionKind::None, Vec2::ZERO, 0.0, 1.0));
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_pool_step_recycles_selectively() {
        let mut pool = ProjectilePool::new();
        for i in 0..5 {
            pool.checkout(projectile(MotionKind::None, Vec2::new(i as f32, 0.0), 0.0, 1.0));
        }
        let recycled = pool.step_all(|p| p.position.x as i32 % 2 == 0);
        assert_eq!(recycled, 2);
        let mut xs: Vec<i32> = pool.iter().map(|p| p.position.x as i32).collect();
        xs.sort();
        assert_eq!(xs, vec![0, 2, 4]);
    }
}
