//! Tick timing configuration

use serde::{Deserialize, Serialize};

/// Fixed simulation tick rate and the derived per-tick duration
///
/// The tick rate is clamped to a minimum of 1 so the derived delta is never
/// a division by zero.
///
/// # Example
///
/// ```
/// use glide_core::TickTiming;
///
/// let timing = TickTiming::new(20);
/// assert_eq!(timing.tick_rate(), 20);
/// assert!((timing.tick_delta() - 0.05).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickTiming {
    /// Simulation ticks per second, always >= 1
    tick_rate: u16,
}

impl TickTiming {
    /// Create a timing configuration with the given tick rate
    ///
    /// A rate of 0 is clamped to 1.
    pub fn new(tick_rate: u16) -> Self {
        Self {
            tick_rate: tick_rate.max(1),
        }
    }

    /// Ticks per second
    pub fn tick_rate(&self) -> u16 {
        self.tick_rate
    }

    /// Seconds per tick
    pub fn tick_delta(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Set the tick rate, clamped to a minimum of 1
    pub fn set_tick_rate(&mut self, tick_rate: u16) {
        self.tick_rate = tick_rate.max(1);
    }
}

impl Default for TickTiming {
    /// 30 ticks per second
    fn default() -> Self {
        Self { tick_rate: 30 }
    }
}
