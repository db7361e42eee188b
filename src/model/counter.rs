//! Animated stats counters

use super::analytics::TableStats;

/// Frames an animation takes to reach its target
pub const COUNTER_STEPS: u32 = 50;

/// A counter that counts up from zero to a target over a fixed number of ticks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CounterAnimation {
    target: f64,
    step: u32,
}

impl CounterAnimation {
    /// Start from zero, or land on the target at once when `animate` is off
    pub fn start(target: f64, animate: bool) -> Self {
        Self {
            target,
            step: if animate { 0 } else { COUNTER_STEPS },
        }
    }

    /// Advance one frame. Returns whether the value changed.
    pub fn tick(&mut self) -> bool {
        if self.is_running() {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.step < COUNTER_STEPS
    }

    /// Current displayed value, floored while running
    pub fn value(&self) -> f64 {
        if self.is_running() {
            (self.target * self.step as f64 / COUNTER_STEPS as f64).floor()
        } else {
            self.target
        }
    }

    #[cfg(test)]
    pub fn target(&self) -> f64 {
        self.target
    }
}

/// One counter per stats card
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsCounters {
    pub total: CounterAnimation,
    pub available: CounterAnimation,
    pub sold: CounterAnimation,
    pub failed: CounterAnimation,
    pub inventory_value: CounterAnimation,
}

impl StatsCounters {
    pub fn start(stats: &TableStats, animate: bool) -> Self {
        Self {
            total: CounterAnimation::start(stats.total as f64, animate),
            available: CounterAnimation::start(stats.available as f64, animate),
            sold: CounterAnimation::start(stats.sold as f64, animate),
            failed: CounterAnimation::start(stats.failed as f64, animate),
            inventory_value: CounterAnimation::start(stats.inventory_value, animate),
        }
    }

    pub fn tick(&mut self) -> bool {
        // Non-short-circuiting so every counter advances on the same frame
        self.total.tick()
            | self.available.tick()
            | self.sold.tick()
            | self.failed.tick()
            | self.inventory_value.tick()
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.total.is_running() || self.inventory_value.is_running()
    }
}
