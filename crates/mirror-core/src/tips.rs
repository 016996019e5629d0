use crate::constants::{DEFAULT_TIPS, TIP_ROTATION_INTERVAL};
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TipError {
    #[error("tip sequence must contain at least one entry")]
    Empty,
}

/// Fixed, ordered status prompts. The final entry is the bait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipSequence {
    tips: &'static [&'static str],
}

impl Default for TipSequence {
    fn default() -> Self {
        Self { tips: DEFAULT_TIPS }
    }
}

impl TipSequence {
    pub fn new(tips: &'static [&'static str]) -> Result<Self, TipError> {
        if tips.is_empty() {
            return Err(TipError::Empty);
        }
        Ok(Self { tips })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tips.len()
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.tips.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&'static str> {
        self.tips.get(index).copied()
    }

    #[inline]
    pub fn is_bait(&self, index: usize) -> bool {
        index == self.last_index()
    }
}

/// Saturating tip cursor with its own rotation deadline.
///
/// The rotator only knows *when* it would advance next. Whether it is allowed
/// to run (mirror active and a face acquired) is decided by the caller, which
/// calls [`TipRotator::start`] / [`TipRotator::stop`] as those gates change
/// and re-checks them before every [`TipRotator::fire`].
#[derive(Clone, Debug)]
pub struct TipRotator {
    sequence: TipSequence,
    index: usize,
    interval: Duration,
    next_at: Option<Duration>,
}

impl Default for TipRotator {
    fn default() -> Self {
        Self::new(TipSequence::default(), TIP_ROTATION_INTERVAL)
    }
}

impl TipRotator {
    pub fn new(sequence: TipSequence, interval: Duration) -> Self {
        Self {
            sequence,
            index: 0,
            interval,
            next_at: None,
        }
    }

    pub fn sequence(&self) -> &TipSequence {
        &self.sequence
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static str {
        self.sequence.get(self.index).unwrap_or_default()
    }

    #[inline]
    pub fn is_at_bait(&self) -> bool {
        self.sequence.is_bait(self.index)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_at
    }

    /// Back to the first tip. Leaves the deadline alone.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Arm the rotation timer. No-op when already armed or parked on the bait.
    pub fn start(&mut self, now: Duration) {
        if self.next_at.is_some() || self.is_at_bait() {
            return;
        }
        self.next_at = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    /// Advance once if the deadline is due at `now`. Returns the new index.
    ///
    /// The following deadline is measured from the one that fired, so a late
    /// caller catches up one step per call. Reaching the bait disarms the
    /// timer.
    pub fn fire(&mut self, now: Duration) -> Option<usize> {
        let due = self.next_at.filter(|at| *at <= now)?;
        self.index = (self.index + 1).min(self.sequence.last_index());
        self.next_at = if self.is_at_bait() {
            None
        } else {
            Some(due + self.interval)
        };
        Some(self.index)
    }
}
