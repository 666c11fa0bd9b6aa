//! Validity window for a subscription.

use serde::{Deserialize, Serialize};

use super::{Timestamp, ValidationError};

/// Half-open time window `[start, end)`; an absent end means open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateTimeRange {
    start: Timestamp,
    end: Option<Timestamp>,
}

impl DateTimeRange {
    /// Creates a range, rejecting an end that precedes the start.
    pub fn new(start: Timestamp, end: Option<Timestamp>) -> Result<Self, ValidationError> {
        if let Some(end) = end {
            if end.is_before(&start) {
                return Err(ValidationError::invalid_format(
                    "end",
                    "end must not precede start",
                ));
            }
        }
        Ok(Self { start, end })
    }

    /// Creates an open-ended range beginning at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Option<Timestamp> {
        self.end
    }

    /// True when `start <= at` and the range has not ended by `at`.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        if at.is_before(&self.start) {
            return false;
        }
        match self.end {
            Some(end) => at.is_before(&end),
            None => true,
        }
    }

    /// Returns a copy ending at `end`, clamped so it never precedes the start.
    pub fn with_end(&self, end: Timestamp) -> Self {
        let end = if end.is_before(&self.start) { self.start } else { end };
        Self {
            start: self.start,
            end: Some(end),
        }
    }

    /// Returns an open-ended copy.
    pub fn without_end(&self) -> Self {
        Self {
            start: self.start,
            end: None,
        }
    }
}
