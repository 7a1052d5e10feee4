//! Deterministic hazard simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Positions are closed-form functions of age wherever possible
//! - Seeded RNG only, re-seeded on reset
//! - Stable iteration order
//! - No rendering or platform dependencies

pub mod balance;
pub mod beam;
pub mod collision;
pub mod engine;
pub mod geometry;
pub mod motion;
pub mod projectile;
pub mod schedule;

pub use balance::{BalanceOutcome, balance, is_wave_pattern, lane_gap};
pub use beam::{Beam, BeamField, BeamPhase};
pub use collision::{DangerBudget, check_hit, distance_sq_point_to_segment};
pub use engine::{BulletEngine, Diagnostics, FrameReport, ResetReport};
pub use geometry::{Formation, Pattern, SpawnGeometry, SpawnPlan};
pub use motion::{Launch, MotionKind, MotionProfile, Strategy};
pub use projectile::{Projectile, ProjectileId, ProjectilePool, TrackLatch};
pub use schedule::{Scheduler, SpawnCountdown, SpawnWarning};
