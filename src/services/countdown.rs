//! Countdown controller - the selecting → cleaning → complete lifecycle
//!
//! The controller is pure state: it never owns a timer. Whoever drives it
//! (see `services::runner`) arms a one-second timer while `is_cleaning()` is
//! true and drops it as soon as it turns false.

use serde::Serialize;
use tracing::debug;

/// Lifecycle phase of a cleaning session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Selecting,
    Cleaning,
    Complete,
}

impl Phase {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Selecting => "selecting",
            Phase::Cleaning => "cleaning",
            Phase::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command was issued in a phase that does not accept it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub action: &'static str,
    pub phase: Phase,
}

impl std::fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not allowed while {}", self.action, self.phase)
    }
}

impl std::error::Error for InvalidTransition {}

/// Result of delivering one timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not cleaning; the tick was dropped
    Ignored,
    /// One second elapsed, countdown continues
    Running,
    /// Countdown reached zero; now complete
    Finished,
}

#[derive(Debug)]
pub struct CountdownController {
    phase: Phase,
    total_minutes: u32,
    remaining_seconds: u32,
}

impl Default for CountdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownController {
    pub fn new() -> Self {
        Self { phase: Phase::Selecting, total_minutes: 0, remaining_seconds: 0 }
    }

    /// Start the countdown for `total_minutes` of cleaning work
    ///
    /// A zero total has nothing to count down and completes immediately.
    pub fn confirm(&mut self, total_minutes: u32) -> Result<Phase, InvalidTransition> {
        if self.phase != Phase::Selecting {
            return Err(InvalidTransition { action: "confirm", phase: self.phase });
        }
        self.total_minutes = total_minutes;
        self.remaining_seconds = total_minutes.saturating_mul(60);
        self.phase = if self.remaining_seconds == 0 { Phase::Complete } else { Phase::Cleaning };
        debug!(
            total_minutes = %self.total_minutes,
            remaining_seconds = %self.remaining_seconds,
            phase = %self.phase,
            "countdown_confirmed"
        );
        Ok(self.phase)
    }

    /// Advance the countdown by one second
    ///
    /// Decrement and the zero check happen together, so a tick is applied
    /// exactly once and the transition to `Complete` cannot be missed.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Cleaning || self.remaining_seconds == 0 {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.phase = Phase::Complete;
            TickOutcome::Finished
        } else {
            TickOutcome::Running
        }
    }

    /// Abandon the remaining work; remaining seconds are left as they were
    pub fn skip(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != Phase::Cleaning {
            return Err(InvalidTransition { action: "skip", phase: self.phase });
        }
        self.phase = Phase::Complete;
        debug!(remaining_seconds = %self.remaining_seconds, "countdown_skipped");
        Ok(())
    }

    /// Back to `Selecting` from any phase
    pub fn reset(&mut self) {
        self.phase = Phase::Selecting;
        self.total_minutes = 0;
        self.remaining_seconds = 0;
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_cleaning(&self) -> bool {
        self.phase == Phase::Cleaning
    }

    #[inline]
    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    #[inline]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Builder for tests: a controller already cleaning with `seconds` left
    #[cfg(test)]
    pub(crate) fn cleaning_with_remaining(seconds: u32) -> Self {
        Self { phase: Phase::Cleaning, total_minutes: seconds.div_ceil(60), remaining_seconds: seconds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_sets_remaining_seconds() {
        let mut countdown = CountdownController::new();
        assert_eq!(countdown.confirm(11), Ok(Phase::Cleaning));
        assert_eq!(countdown.remaining_seconds(), 660);
        assert_eq!(countdown.total_minutes(), 11);
        assert!(countdown.is_cleaning());
    }

    #[test]
    fn test_confirm_zero_completes_immediately() {
        let mut countdown = CountdownController::new();
        assert_eq!(countdown.confirm(0), Ok(Phase::Complete));
        assert_eq!(countdown.remaining_seconds(), 0);
        assert_eq!(countdown.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_confirm_only_from_selecting() {
        let mut countdown = CountdownController::new();
        countdown.confirm(3).unwrap();
        let err = countdown.confirm(5).unwrap_err();
        assert_eq!(err, InvalidTransition { action: "confirm", phase: Phase::Cleaning });
        assert_eq!(err.to_string(), "confirm is not allowed while cleaning");
        assert_eq!(countdown.remaining_seconds(), 180);
    }

    #[test]
    fn test_tick_decrements_by_one() {
        let mut countdown = CountdownController::new();
        countdown.confirm(1).unwrap();
        assert_eq!(countdown.tick(), TickOutcome::Running);
        assert_eq!(countdown.tick(), TickOutcome::Running);
        assert_eq!(countdown.remaining_seconds(), 58);
    }

    #[test]
    fn test_last_tick_completes() {
        let mut countdown = CountdownController::cleaning_with_remaining(1);
        assert_eq!(countdown.tick(), TickOutcome::Finished);
        assert_eq!(countdown.phase(), Phase::Complete);
        assert_eq!(countdown.remaining_seconds(), 0);

        assert_eq!(countdown.tick(), TickOutcome::Ignored);
        assert_eq!(countdown.tick(), TickOutcome::Ignored);
        assert_eq!(countdown.remaining_seconds(), 0);
        assert_eq!(countdown.phase(), Phase::Complete);
    }

    #[test]
    fn test_full_countdown_takes_total_seconds() {
        let mut countdown = CountdownController::new();
        countdown.confirm(2).unwrap();
        let mut ticks = 0;
        while countdown.tick() != TickOutcome::Ignored {
            ticks += 1;
        }
        assert_eq!(ticks, 120);
        assert_eq!(countdown.phase(), Phase::Complete);
    }

    #[test]
    fn test_skip_keeps_remaining() {
        let mut countdown = CountdownController::cleaning_with_remaining(300);
        countdown.skip().unwrap();
        assert_eq!(countdown.phase(), Phase::Complete);
        assert_eq!(countdown.remaining_seconds(), 300);
        assert_eq!(countdown.tick(), TickOutcome::Ignored);
        assert_eq!(countdown.remaining_seconds(), 300);
    }

    #[test]
    fn test_skip_only_while_cleaning() {
        let mut countdown = CountdownController::new();
        assert!(countdown.skip().is_err());
        assert_eq!(countdown.phase(), Phase::Selecting);

        countdown.confirm(1).unwrap();
        countdown.skip().unwrap();
        assert_eq!(
            countdown.skip(),
            Err(InvalidTransition { action: "skip", phase: Phase::Complete })
        );
    }

    #[test]
    fn test_tick_ignored_while_selecting() {
        let mut countdown = CountdownController::new();
        assert_eq!(countdown.tick(), TickOutcome::Ignored);
        assert_eq!(countdown.phase(), Phase::Selecting);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut selecting = CountdownController::new();
        let mut cleaning = CountdownController::cleaning_with_remaining(420);
        let mut complete = CountdownController::cleaning_with_remaining(1);
        complete.tick();

        for countdown in [&mut selecting, &mut cleaning, &mut complete] {
            countdown.reset();
            assert_eq!(countdown.phase(), Phase::Selecting);
            assert_eq!(countdown.total_minutes(), 0);
            assert_eq!(countdown.remaining_seconds(), 0);
        }
    }
}
