//! Draw-history balancing windows.
//!
//! Two complementary mechanisms watch recent draw outcomes and push the odds
//! away from over-represented tiers:
//!
//! - [`DrawHistoryWindow`] reacts to the last W draws regardless of pacing,
//!   giving a fast correction once the window has filled.
//! - [`TimeWindowHistory`] counts draws inside an elapsed-time window, giving
//!   a slower, gentler correction independent of draw cadence.
//!
//! Both recompute their adjustments from scratch on every evaluation; nothing
//! carries over between evaluations.

use std::collections::VecDeque;

use tracing::debug;

use crate::constants::{
    DRAW_WINDOW_ADJUSTMENT, DRAW_WINDOW_SIZE, DRAW_WINDOW_THRESHOLD, TIME_WINDOW_ADJUSTMENT,
    TIME_WINDOW_SECS, TIME_WINDOW_THRESHOLD,
};
use crate::rarity::Rarity;
use crate::rates::RateAdjustments;

/// Count draws per tier and emit one shift-up per tier at or over threshold.
///
/// Every triggered tier is evaluated against the same pre-adjustment counts,
/// so simultaneous triggers are independent and additive.
fn cascade(counts: &[usize; Rarity::COUNT], threshold: usize, amount: f32) -> RateAdjustments {
    let mut adjustments = RateAdjustments::none();
    for rarity in Rarity::ALL {
        if rarity.next_tier().is_none() {
            continue;
        }
        if counts[rarity.index()] >= threshold {
            adjustments.shift_up(rarity, amount);
            debug!(
                tier = %rarity,
                count = counts[rarity.index()],
                threshold,
                amount,
                "balance threshold triggered"
            );
        }
    }
    adjustments
}

/// Sliding window over the last W draw outcomes.
#[derive(Debug, Clone)]
pub struct DrawHistoryWindow {
    window: VecDeque<Rarity>,
    capacity: usize,
    threshold: usize,
    adjustment: f32,
}

impl Default for DrawHistoryWindow {
    fn default() -> Self {
        Self::new(DRAW_WINDOW_SIZE, DRAW_WINDOW_THRESHOLD, DRAW_WINDOW_ADJUSTMENT)
    }
}

impl DrawHistoryWindow {
    /// Window of `capacity` draws triggering at `threshold` same-tier hits.
    pub fn new(capacity: usize, threshold: usize, adjustment: f32) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            threshold,
            adjustment,
        }
    }

    /// Record one completed draw, evicting the oldest when full.
    pub fn record_draw(&mut self, rarity: Rarity) {
        if self.window.len() == self.capacity {
            let _ = self.window.pop_front();
        }
        self.window.push_back(rarity);
    }

    /// Number of draws currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// True when no draws have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Per-rarity deltas for the current window contents.
    ///
    /// Contributes nothing until the window has filled once.
    pub fn adjustments(&self) -> RateAdjustments {
        if self.window.len() < self.capacity {
            return RateAdjustments::none();
        }
        let mut counts = [0usize; Rarity::COUNT];
        for rarity in &self.window {
            counts[rarity.index()] += 1;
        }
        cascade(&counts, self.threshold, self.adjustment)
    }

    /// Drop all recorded draws (session reset).
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

/// One timestamped draw outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub rarity: Rarity,
    /// Monotonic timestamp in seconds, supplied by the host loop.
    pub timestamp: f64,
}

/// Timestamped draw records pruned by elapsed wall time.
#[derive(Debug, Clone)]
pub struct TimeWindowHistory {
    records: VecDeque<DrawRecord>,
    window_secs: f64,
    threshold: usize,
    adjustment: f32,
}

impl Default for TimeWindowHistory {
    fn default() -> Self {
        Self::new(TIME_WINDOW_SECS, TIME_WINDOW_THRESHOLD, TIME_WINDOW_ADJUSTMENT)
    }
}

impl TimeWindowHistory {
    /// History spanning `window_secs` triggering at `threshold` same-tier hits.
    pub fn new(window_secs: f64, threshold: usize, adjustment: f32) -> Self {
        Self {
            records: VecDeque::new(),
            window_secs,
            threshold,
            adjustment,
        }
    }

    /// Record one completed draw at the given monotonic time.
    pub fn record_draw(&mut self, rarity: Rarity, timestamp: f64) {
        debug_assert!(
            self.records.back().map_or(true, |r| r.timestamp <= timestamp),
            "timestamps must be monotonic"
        );
        self.records.push_back(DrawRecord { rarity, timestamp });
    }

    /// Number of records currently held (including not-yet-pruned ones).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard records older than the window relative to `current_time`.
    pub fn prune(&mut self, current_time: f64) {
        let cutoff = current_time - self.window_secs;
        while self
            .records
            .front()
            .is_some_and(|r| r.timestamp < cutoff)
        {
            let _ = self.records.pop_front();
        }
    }

    /// Per-rarity deltas for draws inside the time window.
    pub fn adjustments(&mut self, current_time: f64) -> RateAdjustments {
        self.prune(current_time);
        let mut counts = [0usize; Rarity::COUNT];
        for record in &self.records {
            counts[record.rarity.index()] += 1;
        }
        cascade(&counts, self.threshold, self.adjustment)
    }

    /// Drop all records (session reset).
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_silent_until_full() {
        let mut window = DrawHistoryWindow::default();
        for _ in 0..9 {
            window.record_draw(Rarity::Common);
        }
        assert!(window.adjustments().is_zero(), "9 of 10 draws is not full");

        window.record_draw(Rarity::Common);
        assert!(!window.adjustments().is_zero());
    }

    #[test]
    fn test_five_commons_shift_to_rare() {
        let mut window = DrawHistoryWindow::default();
        let draws = [
            Rarity::Common,
            Rarity::Rare,
            Rarity::Common,
            Rarity::Epic,
            Rarity::Common,
            Rarity::Rare,
            Rarity::Common,
            Rarity::Common,
            Rarity::Rare,
            Rarity::Epic,
        ];
        for draw in draws {
            window.record_draw(draw);
        }

        let adj = window.adjustments();
        assert_eq!(adj.get(Rarity::Common), -5.0);
        assert_eq!(adj.get(Rarity::Rare), 5.0);
        assert_eq!(adj.get(Rarity::Epic), 0.0);
        assert_eq!(adj.get(Rarity::Legendary), 0.0);
    }

    #[test]
    fn test_simultaneous_triggers_are_additive() {
        let mut window = DrawHistoryWindow::default();
        for _ in 0..5 {
            window.record_draw(Rarity::Common);
        }
        for _ in 0..5 {
            window.record_draw(Rarity::Rare);
        }

        // Both tiers trigger against the same pre-adjustment counts:
        // Common -5, Rare +5 -5, Epic +5.
        let adj = window.adjustments();
        assert_eq!(adj.get(Rarity::Common), -5.0);
        assert_eq!(adj.get(Rarity::Rare), 0.0);
        assert_eq!(adj.get(Rarity::Epic), 5.0);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = DrawHistoryWindow::default();
        for _ in 0..5 {
            window.record_draw(Rarity::Common);
        }
        // Ten more draws push every Common out.
        for _ in 0..10 {
            window.record_draw(Rarity::Rare);
        }
        assert_eq!(window.len(), 10);

        let adj = window.adjustments();
        assert_eq!(adj.get(Rarity::Common), 0.0, "Commons were evicted");
        assert_eq!(adj.get(Rarity::Rare), -5.0);
        assert_eq!(adj.get(Rarity::Epic), 5.0);
    }

    #[test]
    fn test_boss_never_shifts_upward() {
        let mut window = DrawHistoryWindow::new(10, 5, 5.0);
        for _ in 0..10 {
            window.record_draw(Rarity::Boss);
        }
        assert!(window.adjustments().is_zero());
    }

    #[test]
    fn test_time_window_prunes_old_records() {
        let mut history = TimeWindowHistory::default();
        for i in 0..8 {
            history.record_draw(Rarity::Common, i as f64);
        }
        // All eight inside the window: threshold met.
        let adj = history.adjustments(30.0);
        assert_eq!(adj.get(Rarity::Common), -1.0);
        assert_eq!(adj.get(Rarity::Rare), 1.0);

        // Sixty-one seconds after the last record everything has aged out.
        let adj = history.adjustments(68.1);
        assert!(adj.is_zero());
        assert!(history.is_empty());
    }

    #[test]
    fn test_time_window_below_threshold() {
        let mut history = TimeWindowHistory::default();
        for i in 0..7 {
            history.record_draw(Rarity::Common, i as f64);
        }
        assert!(history.adjustments(10.0).is_zero());
    }

    #[test]
    fn test_clear_resets_both() {
        let mut window = DrawHistoryWindow::default();
        let mut history = TimeWindowHistory::default();
        for i in 0..10 {
            window.record_draw(Rarity::Common);
            history.record_draw(Rarity::Common, i as f64);
        }
        window.clear();
        history.clear();
        assert!(window.is_empty());
        assert!(history.is_empty());
        assert!(window.adjustments().is_zero());
        assert!(history.adjustments(100.0).is_zero());
    }
}
