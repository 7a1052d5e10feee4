//! Auto-balance and readability policy
//!
//! Runs over every event before it reaches the scheduler: readability rules
//! always apply, then wave patterns are thinned until a target of the
//! configured size fits between neighbouring projectiles.

use std::f32::consts::TAU;

use crate::config::{EngineTuning, LevelConfig};
use crate::event::SpawnEvent;

/// Hard ceiling for ring and radial counts
pub const MAX_RING_COUNT: i32 = 64;
/// Auto-balance never thins below this
pub const MIN_BALANCED_COUNT: i32 = 3;
/// Reference radius (px) for fan arc spacing
pub const FAN_REFERENCE_RADIUS: f32 = 320.0;
/// Reference radius (px) for ring circumference spacing
pub const RING_REFERENCE_RADIUS: f32 = 220.0;
/// Reference span (px) for walls without an explicit width
pub const WALL_REFERENCE_WIDTH: f32 = 900.0;

const LASER_MIN_TELEGRAPH_MS: i32 = 450;
const TRACKING_LASER_MIN_TELEGRAPH_MS: i32 = 700;
const DENSE_LASER_MIN_TELEGRAPH_MS: i32 = 800;
const DENSE_LASER_COUNT: i32 = 20;

/// What the policy did to one event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceOutcome {
    pub original_count: i32,
    pub count: i32,
    /// Adjacent gap after balancing (px)
    pub gap: f32,
    pub required_gap: f32,
    /// Pattern is subject to gap balancing
    pub wave: bool,
    /// Wave event whose gap is still too small at its final count
    pub potentially_impossible: bool,
}

impl BalanceOutcome {
    pub fn thinned(&self) -> bool {
        self.count < self.original_count
    }
}

/// Ring, fan, wall, spiral, wave and grid families plus plain radial
pub fn is_wave_pattern(pattern_key: &str) -> bool {
    ["ring", "fan", "wall", "spiral", "wave", "grid"]
        .iter()
        .any(|k| pattern_key.contains(k))
        || pattern_key == "radial"
}

/// Span shared out between lanes, and whether its ends are open
///
/// Walls and fans split their span into `count - 1` lanes; rings wrap
/// around into `count`.
fn lane_span(key: &str, event: &SpawnEvent) -> (f32, bool) {
    let (span, open) = if key.contains("wall") {
        (event.wall_width.unwrap_or(WALL_REFERENCE_WIDTH), true)
    } else if key.contains("fan") || key.contains("arc") {
        let spread = event.spread_deg.unwrap_or(60.0).to_radians();
        (spread * FAN_REFERENCE_RADIUS, true)
    } else {
        (TAU * RING_REFERENCE_RADIUS, false)
    };
    (span.max(0.0), open)
}

fn gap_at(span: f32, open: bool, count: i32, diameter: f32) -> f32 {
    let count = count.max(1);
    let lanes = if open { (count - 1).max(1) } else { count };
    span / lanes as f32 - diameter
}

/// Worst-case distance between adjacent projectile surfaces
pub fn lane_gap(event: &SpawnEvent, default_radius: f32) -> f32 {
    let (span, open) = lane_span(&event.pattern_key(), event);
    gap_at(span, open, event.count, event.projectile_radius(default_radius) * 2.0)
}

/// Largest count not above the authored one that leaves `required_gap`,
/// or the floor when none does
fn thinned_count(key: &str, event: &SpawnEvent, default_radius: f32, required_gap: f32) -> i32 {
    let count = event.count;
    if count <= MIN_BALANCED_COUNT {
        return count;
    }

    let (span, open) = lane_span(key, event);
    let diameter = event.projectile_radius(default_radius) * 2.0;
    let fits = |c: i32| gap_at(span, open, c, diameter) >= required_gap;

    // Solve span / lanes >= pitch directly, then settle float rounding
    let pitch = f64::from(required_gap + diameter);
    let mut best = if pitch > 0.0 {
        let lanes = (f64::from(span) / pitch).floor();
        let estimate = if open { lanes + 1.0 } else { lanes };
        (estimate as i32).clamp(MIN_BALANCED_COUNT, count)
    } else {
        count
    };
    while best > MIN_BALANCED_COUNT && !fits(best) {
        best -= 1;
    }
    while best < count && fits(best + 1) {
        best += 1;
    }
    best
}

/// Telegraph floors for lasers and the ring count ceiling
pub fn apply_readability(event: &mut SpawnEvent) {
    let key = event.pattern_key();
    enforce_readability(event, &key);
}

fn enforce_readability(event: &mut SpawnEvent, key: &str) {
    if key.contains("laser") {
        let tracks = event
            .motion_pattern
            .as_deref()
            .is_some_and(|m| m.to_lowercase().contains("mouse"));
        let mut min_telegraph = if tracks {
            TRACKING_LASER_MIN_TELEGRAPH_MS
        } else {
            LASER_MIN_TELEGRAPH_MS
        };
        if event.count >= DENSE_LASER_COUNT {
            min_telegraph = min_telegraph.max(DENSE_LASER_MIN_TELEGRAPH_MS);
        }
        event.telegraph_ms = Some(event.telegraph_ms.unwrap_or(0).max(min_telegraph));
    }

    if (key.contains("ring") || key == "radial") && event.count > MAX_RING_COUNT {
        event.count = MAX_RING_COUNT;
    }
}

/// Apply readability rules, then thin wave patterns when enabled.
/// The authored event is left untouched.
pub fn balance(event: &SpawnEvent, config: &LevelConfig, tuning: &EngineTuning) -> (SpawnEvent, BalanceOutcome) {
    let key = event.pattern_key();
    let mut balanced = event.clone();
    let original_count = balanced.count;
    enforce_readability(&mut balanced, &key);

    let required_gap = config.required_gap();
    let wave = is_wave_pattern(&key);
    let radius = tuning.default_bullet_radius;

    if wave && config.auto_balance_waves {
        balanced.count = thinned_count(&key, &balanced, radius, required_gap);
    }

    let (span, open) = lane_span(&key, &balanced);
    let gap = gap_at(span, open, balanced.count, balanced.projectile_radius(radius) * 2.0);
    let potentially_impossible = wave && gap < required_gap;
    if potentially_impossible {
        log::warn!(
            "event at {} ms ({}) leaves a {:.1}px gap, {:.1}px needed",
            balanced.time_ms,
            balanced.pattern,
            gap,
            required_gap
        );
    } else if balanced.count < original_count {
        log::debug!(
            "event at {} ms ({}) thinned from {} to {}",
            balanced.time_ms,
            balanced.pattern,
            original_count,
            balanced.count
        );
    }

    let outcome = BalanceOutcome {
        original_count,
        count: balanced.count,
        gap,
        required_gap,
        wave,
        potentially_impossible,
    };
    (balanced, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> LevelConfig {
        LevelConfig::default()
    }

    #[test]
    fn test_wave_classification() {
        assert!(is_wave_pattern("ring_12"));
        assert!(is_wave_pattern("radial"));
        assert!(is_wave_pattern("wall_left"));
        assert!(is_wave_pattern("expanding_spiral_conversion"));
        assert!(!is_wave_pattern("aimed"));
        assert!(!is_wave_pattern("laser_static"));
        assert!(!is_wave_pattern("radial_explosion_burst"));
    }

    #[test]
    fn test_ring_gap() {
        // 2π·220/20 - 20 ≈ 49.1
        let evt = SpawnEvent::new(0, "radial", 20, 200.0);
        let gap = lane_gap(&evt, 10.0);
        assert!((gap - (TAU * 220.0 / 20.0 - 20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_dense_ring_is_thinned() {
        let evt = SpawnEvent::new(0, "radial", 60, 200.0);
        let (balanced, outcome) = balance(&evt, &config(), &EngineTuning::default());
        assert!(outcome.thinned());
        assert!(outcome.gap >= outcome.required_gap);
        assert!(!outcome.potentially_impossible);
        // One more would break the gap
        let mut denser = balanced.clone();
        denser.count += 1;
        assert!(lane_gap(&denser, 10.0) < outcome.required_gap);
        assert_eq!(evt.count, 60);
    }

    #[test]
    fn test_disabled_balance_still_flags() {
        let mut cfg = config();
        cfg.auto_balance_waves = false;
        let evt = SpawnEvent::new(0, "ring_12", 60, 200.0);
        let (balanced, outcome) = balance(&evt, &cfg, &EngineTuning::default());
        assert_eq!(balanced.count, 60);
        assert!(outcome.potentially_impossible);
    }

    #[test]
    fn test_floor_of_three() {
        let mut evt = SpawnEvent::new(0, "fan", 40, 200.0);
        evt.spread_deg = Some(5.0);
        let (balanced, outcome) = balance(&evt, &config(), &EngineTuning::default());
        assert_eq!(balanced.count, MIN_BALANCED_COUNT);
        assert!(outcome.potentially_impossible);
    }

    #[test]
    fn test_ring_cap() {
        let mut cfg = config();
        cfg.auto_balance_waves = false;
        let evt = SpawnEvent::new(0, "ring_32", 500, 200.0);
        let (balanced, _) = balance(&evt, &cfg, &EngineTuning::default());
        assert_eq!(balanced.count, MAX_RING_COUNT);
    }

    #[test]
    fn test_laser_telegraph_floors() {
        let mut evt = SpawnEvent::new(0, "laser_static", 1, 100.0);
        apply_readability(&mut evt);
        assert_eq!(evt.telegraph_ms, Some(450));

        let mut tracking = SpawnEvent::new(0, "laser_static", 1, 100.0);
        tracking.motion_pattern = Some("Mouse Track".to_string());
        tracking.telegraph_ms = Some(300);
        apply_readability(&mut tracking);
        assert_eq!(tracking.telegraph_ms, Some(700));

        let mut dense = SpawnEvent::new(0, "laser_static", 25, 100.0);
        dense.telegraph_ms = Some(1200);
        apply_readability(&mut dense);
        assert_eq!(dense.telegraph_ms, Some(1200));
        dense.telegraph_ms = Some(100);
        apply_readability(&mut dense);
        assert_eq!(dense.telegraph_ms, Some(800));
    }

    /// One-at-a-time thinning, the slow reference for `thinned_count`
    fn thin_stepwise(evt: &SpawnEvent, required_gap: f32) -> i32 {
        let mut evt = evt.clone();
        while evt.count > MIN_BALANCED_COUNT && lane_gap(&evt, 10.0) < required_gap {
            evt.count -= 1;
        }
        evt.count
    }

    #[test]
    fn test_huge_counts_thin_in_closed_form() {
        let tuning = EngineTuning::default();

        // 900 / (20 + 20) = 22.5 -> 22 lanes, 23 projectiles
        let wall = SpawnEvent::new(0, "wall", i32::MAX, 200.0);
        let (balanced, outcome) = balance(&wall, &config(), &tuning);
        assert_eq!(balanced.count, 23);
        assert!(!outcome.potentially_impossible);
        assert_eq!(outcome.original_count, i32::MAX);

        // 60 degrees at 320 px ≈ 335 px -> 8 lanes, 9 projectiles
        let fan = SpawnEvent::new(0, "fan", i32::MAX, 200.0);
        assert_eq!(balance(&fan, &config(), &tuning).0.count, 9);

        // 2π·220 ≈ 1382 px wraps into 34 gaps
        let spiral = SpawnEvent::new(0, "spiral_burst", i32::MAX, 200.0);
        assert_eq!(balance(&spiral, &config(), &tuning).0.count, 34);

        let mut cramped = SpawnEvent::new(0, "wall", i32::MAX, 200.0);
        cramped.wall_width = Some(10.0);
        let (balanced, outcome) = balance(&cramped, &config(), &tuning);
        assert_eq!(balanced.count, MIN_BALANCED_COUNT);
        assert!(outcome.potentially_impossible);
    }

    proptest! {
        #[test]
        fn prop_closed_form_matches_stepwise_thinning(
            count in 1i32..400,
            pattern in prop::sample::select(vec!["radial", "fan", "wall", "spiral_burst", "arc_wave"]),
            size in 2.0f32..30.0,
            spread in 1.0f32..360.0,
            width in 50.0f32..2000.0,
        ) {
            let mut evt = SpawnEvent::new(0, pattern, count, 200.0);
            evt.bullet_size = Some(size);
            evt.spread_deg = Some(spread);
            evt.wall_width = Some(width);
            let required = LevelConfig::default().required_gap();
            let key = evt.pattern_key();
            prop_assert_eq!(thinned_count(&key, &evt, 10.0, required), thin_stepwise(&evt, required));
        }

        #[test]
        fn prop_balanced_waves_clear_or_are_flagged(
            count in 1i32..200,
            pattern in prop::sample::select(vec!["radial", "ring_16", "fan", "wall", "spiral_burst"]),
            size in 2.0f32..30.0,
            spread in 5.0f32..180.0,
        ) {
            let mut evt = SpawnEvent::new(0, pattern, count, 200.0);
            evt.bullet_size = Some(size);
            evt.spread_deg = Some(spread);
            let (balanced, outcome) = balance(&evt, &LevelConfig::default(), &EngineTuning::default());
            prop_assert!(outcome.wave);
            prop_assert!(balanced.count <= evt.count);
            prop_assert!(
                outcome.gap >= outcome.required_gap
                    || (outcome.potentially_impossible && balanced.count <= MIN_BALANCED_COUNT)
            );
        }
    }
}
