//! Pagination cursor and loop phases
//!
//! This module defines the explicit state machine that drives the
//! fetch-paginate loop: which page is being fetched, whether another page
//! follows, and how many attempts of the current page have failed.

use crate::SweepError;
use std::fmt;

/// Represents the current phase of the pagination loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPhase {
    // ===== Active Phases =====
    /// The current page is about to be requested
    Fetching,

    /// The last attempt failed and the same page will be requested again
    Retrying,

    /// The current page succeeded and the cursor will move to the next page
    Advancing,

    // ===== Terminal Phases =====
    /// Pagination ended normally (no next page, or page limit reached)
    Done,

    /// The current page failed on every allowed attempt
    PermanentlyFailed,
}

impl LoopPhase {
    /// Returns true if no further fetches will happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::PermanentlyFailed)
    }

    /// Returns true if moving from this phase to `next` is allowed
    pub fn can_transition_to(&self, next: LoopPhase) -> bool {
        use LoopPhase::*;

        match self {
            Fetching => matches!(next, Advancing | Retrying | Done | PermanentlyFailed),
            Retrying | Advancing => next == Fetching,
            Done | PermanentlyFailed => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Retrying => "retrying",
            Self::Advancing => "advancing",
            Self::Done => "done",
            Self::PermanentlyFailed => "permanently_failed",
        }
    }
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transient cursor over the paginated listing
///
/// Mutated once per fetch attempt. The cursor is finished once its phase
/// is terminal.
#[derive(Debug, Clone)]
pub struct PageState {
    page: u32,
    has_next: bool,
    consecutive_failures: u32,
    phase: LoopPhase,
    max_retries: u32,
    max_pages: Option<u32>,
}

impl PageState {
    /// Creates a cursor positioned on page 1
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Retries allowed per page after the first attempt
    /// * `max_pages` - Optional upper bound on the number of pages visited
    pub fn new(max_retries: u32, max_pages: Option<u32>) -> Self {
        Self {
            page: 1,
            has_next: true,
            consecutive_failures: 0,
            phase: LoopPhase::Fetching,
            max_retries,
            max_pages,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_next(&self) -> bool {
        self.has_next
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// 1-based number of the attempt about to be made on the current page
    pub fn attempt(&self) -> u32 {
        self.consecutive_failures + 1
    }

    /// Total attempts allowed per page
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Records a successful fetch of the current page
    ///
    /// Moves to `Advancing` when the page advertised a next page and the page
    /// limit has not been reached, otherwise to `Done`.
    pub fn record_success(&mut self, has_next: bool) -> Result<LoopPhase, SweepError> {
        self.has_next = has_next;
        self.consecutive_failures = 0;

        let limit_reached = self.max_pages.is_some_and(|max| self.page >= max);
        let next = if has_next && !limit_reached {
            LoopPhase::Advancing
        } else {
            LoopPhase::Done
        };

        self.transition(next)?;
        Ok(next)
    }

    /// Records a failed fetch attempt of the current page
    ///
    /// The page is permanently failed once the failure count exceeds the
    /// retry limit.
    pub fn record_failure(&mut self) -> Result<LoopPhase, SweepError> {
        self.consecutive_failures += 1;

        let next = if self.consecutive_failures > self.max_retries {
            self.has_next = false;
            LoopPhase::PermanentlyFailed
        } else {
            LoopPhase::Retrying
        };

        self.transition(next)?;
        Ok(next)
    }

    /// Moves back to `Fetching`, on the next page when advancing or on the
    /// same page when retrying
    pub fn resume(&mut self) -> Result<(), SweepError> {
        if self.phase == LoopPhase::Advancing {
            self.transition(LoopPhase::Fetching)?;
            self.page += 1;
            Ok(())
        } else {
            self.transition(LoopPhase::Fetching)
        }
    }

    fn transition(&mut self, to: LoopPhase) -> Result<(), SweepError> {
        if !self.phase.can_transition_to(to) {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}
