//! Scheduling - the idle-slice deadline abstraction.
//!
//! The work loop never owns a clock. Each invocation receives a
//! [`Deadline`] reporting the time remaining in the current slice and
//! yields between units of work once the budget runs out. Injecting the
//! deadline keeps the core host-agnostic: a real host hands in wall-clock
//! slices ([`TimeSlice`]), tests hand in a deterministic unit counter
//! ([`UnitBudget`]).

use std::cell::Cell;
use std::time::{Duration, Instant};

// =============================================================================
// Deadline
// =============================================================================

/// Remaining budget of one cooperative slice.
pub trait Deadline {
    /// Time remaining in this slice.
    fn time_remaining(&self) -> Duration;

    /// Whether the loop should hand control back before the next unit.
    ///
    /// Checked only at unit boundaries; a unit of work is never preempted
    /// internally.
    fn should_yield(&self) -> bool {
        self.time_remaining() < Duration::from_millis(1)
    }
}

// =============================================================================
// Wall-clock slice
// =============================================================================

/// Deadline backed by a wall-clock budget.
pub struct TimeSlice {
    end: Instant,
}

impl TimeSlice {
    /// Slice ending `budget` from now.
    pub fn new(budget: Duration) -> Self {
        Self { end: Instant::now() + budget }
    }
}

impl Deadline for TimeSlice {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }
}

// =============================================================================
// Deterministic budgets
// =============================================================================

/// Deadline that allows an exact number of units per slice.
///
/// `UnitBudget::new(n)` lets the loop perform `n` units of work before
/// yielding, independent of wall time. The deterministic stand-in for an
/// idle callback in tests.
pub struct UnitBudget {
    remaining: Cell<usize>,
}

impl UnitBudget {
    pub fn new(units: usize) -> Self {
        Self { remaining: Cell::new(units) }
    }
}

impl Deadline for UnitBudget {
    fn time_remaining(&self) -> Duration {
        Duration::from_millis(self.remaining.get() as u64)
    }

    fn should_yield(&self) -> bool {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return true;
        }
        self.remaining.set(remaining - 1);
        false
    }
}

/// Deadline that never expires. Drains a whole build in one call.
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }

    fn should_yield(&self) -> bool {
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
