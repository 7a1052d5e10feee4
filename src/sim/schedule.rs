//! Event scheduler and pre-spawn markers
//!
//! The scheduler is a cursor over time-sorted, already balanced events. Each
//! event is handed out exactly once as the timeline passes it. Seeking
//! backward requires a reset and replay from zero.

use std::ops::Range;

use glam::Vec2;

use crate::config::LevelConfig;
use crate::consts::{EPSILON_SQ, PLAYFIELD_CENTER};
use crate::event::SpawnEvent;

/// Fade-out after the spawn moment (ms)
pub const WARNING_FADE_MS: i32 = 120;
/// Base radius of the warning disc (px)
pub const WARNING_RADIUS: f32 = 22.0;

#[derive(Debug, Default)]
pub struct Scheduler {
    events: Vec<SpawnEvent>,
    cursor: usize,
}

impl Scheduler {
    /// Takes ownership of balanced events; equal times keep authored order
    pub fn new(mut events: Vec<SpawnEvent>) -> Self {
        events.sort_by_key(|e| e.time_ms);
        Self { events, cursor: 0 }
    }

    pub fn events(&self) -> &[SpawnEvent] {
        &self.events
    }

    /// Indices of events that became due at `timeline_ms`; advances the cursor
    pub fn take_due(&mut self, timeline_ms: i32) -> Range<usize> {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time_ms <= timeline_ms {
            self.cursor += 1;
        }
        start..self.cursor
    }

    /// Rewind to the first event
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn dispatched(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.events.len()
    }
}

/// Whether a spawn point is close enough to the center to deserve a warning
pub fn should_warn(origin: Vec2, radius: f32) -> bool {
    origin.distance_squared(PLAYFIELD_CENTER) < EPSILON_SQ || origin.distance(PLAYFIELD_CENTER) <= radius
}

/// Warning disc shown before an event spawns near the center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnWarning {
    pub position: Vec2,
    pub start_ms: i32,
    pub spawn_ms: i32,
}

impl SpawnWarning {
    /// Brightness at `timeline_ms`, `None` outside the visible window
    pub fn alpha_at(&self, timeline_ms: i32, base_alpha: f32) -> Option<f32> {
        if timeline_ms < self.start_ms || timeline_ms > self.spawn_ms + WARNING_FADE_MS {
            return None;
        }
        if timeline_ms <= self.spawn_ms {
            let lead = (self.spawn_ms - self.start_ms).max(1) as f32;
            let t = ((timeline_ms - self.start_ms) as f32 / lead).clamp(0.0, 1.0);
            Some(base_alpha * (0.35 + t * 0.65))
        } else {
            let fade = ((timeline_ms - self.spawn_ms) as f32 / WARNING_FADE_MS as f32).clamp(0.0, 1.0);
            Some(base_alpha * (1.0 - fade))
        }
    }

    /// Slightly breathing disc radius
    pub fn radius_at(&self, timeline_ms: i32) -> f32 {
        WARNING_RADIUS * (1.0 + 0.08 * (timeline_ms as f32 * 0.015).sin())
    }
}

/// 3-2-1 countdown shown at every spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnCountdown {
    pub position: Vec2,
    pub spawn_ms: i32,
}

impl SpawnCountdown {
    /// Digit and alpha at `timeline_ms`; the lead window is at least one second
    pub fn number_at(&self, timeline_ms: i32, lead_ms: i32) -> Option<(u32, f32)> {
        if timeline_ms >= self.spawn_ms {
            return None;
        }
        let lead = lead_ms.max(1000);
        let remaining = self.spawn_ms - timeline_ms;
        if remaining > lead {
            return None;
        }

        let number = (remaining as f32 / 1000.0).ceil() as u32;
        if !(1..=3).contains(&number) {
            return None;
        }
        let fade = (remaining as f32 / lead as f32).clamp(0.0, 1.0);
        Some((number, 0.16 + fade * 0.36))
    }
}

/// Markers derived from balanced events at reset
#[derive(Debug, Default)]
pub struct Markers {
    pub warnings: Vec<SpawnWarning>,
    pub countdowns: Vec<SpawnCountdown>,
}

impl Markers {
    pub fn build(events: &[SpawnEvent], config: &LevelConfig) -> Self {
        let mut markers = Self::default();
        for evt in events {
            let origin = evt.origin();
            markers.countdowns.push(SpawnCountdown {
                position: origin,
                spawn_ms: evt.time_ms,
            });
            if should_warn(origin, config.center_warning_radius) {
                markers.warnings.push(SpawnWarning {
                    position: origin,
                    start_ms: evt.time_ms - config.center_warning_lead_ms,
                    spawn_ms: evt.time_ms,
                });
            }
        }
        markers
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
        self.countdowns.clear();
    }
}
