//! Latency-adaptive interpolation depth estimation
//!
//! Converts a round-trip-time measurement into a target buffer depth in
//! ticks. A small hysteresis window keeps single-tick RTT noise from
//! nudging the depth back and forth, which would read as visible speed
//! changes on screen.

use crate::{AdaptiveLevel, TickTiming};
use serde::{Deserialize, Serialize};

/// Estimates how many ticks of buffer to hold back, given measured RTT
///
/// # Example
///
/// ```
/// use glide_core::{AdaptiveInterpolationEstimator, AdaptiveLevel, TickTiming};
///
/// let timing = TickTiming::new(20); // 50 ms ticks
/// let mut estimator = AdaptiveInterpolationEstimator::new();
///
/// // 100 ms RTT: ceil(100/50) + 1 = 3 rtt ticks, +2 for the level.
/// let depth = estimator.update(100, &timing, AdaptiveLevel::VeryLow, 2);
/// assert_eq!(depth, 5);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AdaptiveInterpolationEstimator {
    /// Last committed depth; 0 until the first update
    current: u8,
}

impl AdaptiveInterpolationEstimator {
    /// Create an estimator with no committed depth yet
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Last committed interpolation depth in ticks
    pub fn current(&self) -> u8 {
        self.current.max(1)
    }

    /// Recompute the depth from a new RTT sample
    ///
    /// With `AdaptiveLevel::Off` the flat `interpolation_ticks` value is
    /// committed unchanged. Otherwise the RTT is converted to ticks
    /// (`ceil(rtt / tick_delta) + 1`), the adaptive level is added, and the
    /// result is clamped to `[1, min(tick_rate, 255)]`. The new value is
    /// only committed when it differs from the current one by more than a
    /// single tick.
    pub fn update(
        &mut self,
        rtt_ms: i64,
        timing: &TickTiming,
        level: AdaptiveLevel,
        interpolation_ticks: u8,
    ) -> u8 {
        if !level.is_adaptive() {
            self.current = interpolation_ticks.max(1);
            return self.current;
        }

        let tick_delta_ms = timing.tick_delta() as f64 * 1000.0;
        let rtt_ticks = (rtt_ms.max(0) as f64 / tick_delta_ms).ceil() as u32 + 1;
        let raw = (rtt_ticks + level.as_ticks() as u32).clamp(1, timing.tick_rate().min(255) as u32)
            as u8;

        if self.current == 0 {
            self.current = raw;
        } else {
            let difference = (raw as i16 - self.current as i16).abs();
            if difference > 1 {
                self.current = raw;
            }
        }

        self.current
    }

    /// Forget the committed depth so the next update commits unconditionally
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_returns_flat_value() {
        let timing = TickTiming::new(30);
        let mut estimator = AdaptiveInterpolationEstimator::new();
        assert_eq!(estimator.update(500, &timing, AdaptiveLevel::Off, 4), 4);
        // Flat value of zero still floors at one tick.
        assert_eq!(estimator.update(500, &timing, AdaptiveLevel::Off, 0), 1);
    }

    #[test]
    fn test_output_clamped_to_tick_rate() {
        let timing = TickTiming::new(10);
        let mut estimator = AdaptiveInterpolationEstimator::new();

        // Huge RTT can never exceed the tick rate.
        let depth = estimator.update(10_000, &timing, AdaptiveLevel::VeryHigh, 2);
        assert_eq!(depth, 10);

        // Zero RTT still yields at least one tick.
        estimator.reset();
        let depth = estimator.update(0, &timing, AdaptiveLevel::Minimal, 2);
        assert!(depth >= 1);
    }

    #[test]
    fn test_clamp_holds_across_inputs() {
        let mut estimator = AdaptiveInterpolationEstimator::new();
        for tick_rate in [1u16, 10, 30, 128, 400] {
            let timing = TickTiming::new(tick_rate);
            for rtt in [0i64, 15, 80, 250, 2_000, 60_000] {
                estimator.reset();
                let depth = estimator.update(rtt, &timing, AdaptiveLevel::High, 2);
                assert!(depth >= 1);
                assert!(depth as u32 <= (timing.tick_rate() as u32).min(255));
            }
        }
    }

    #[test]
    fn test_hysteresis_ignores_single_tick_noise() {
        let timing = TickTiming::new(20); // 50 ms ticks
        let mut estimator = AdaptiveInterpolationEstimator::new();

        let depth = estimator.update(100, &timing, AdaptiveLevel::Minimal, 2);
        // 51..100 ms all round to 3 rtt ticks + 1 level.
        assert_eq!(depth, 4);

        // One tick more (101..150 ms) is within the hysteresis window.
        assert_eq!(estimator.update(140, &timing, AdaptiveLevel::Minimal, 2), 4);

        // Two ticks more commits.
        assert_eq!(estimator.update(190, &timing, AdaptiveLevel::Minimal, 2), 6);
    }
}
