//! Counts of what happened to the input units.

use crate::unit::{Fate, ReadUnit};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrimStats {
    paired: bool,
    pub input: u64,
    /// Units where every read survived (all reads for single-end).
    pub both_surviving: u64,
    pub forward_only: u64,
    pub reverse_only: u64,
    pub dropped: u64,
}

impl TrimStats {
    pub fn new(arity: usize) -> Self {
        Self {
            paired: arity > 1,
            ..Self::default()
        }
    }

    pub fn is_paired(&self) -> bool {
        self.paired
    }

    /// Reads kept in single-end mode.
    pub fn surviving(&self) -> u64 {
        self.both_surviving
    }

    pub fn record(&mut self, unit: &ReadUnit) {
        self.input += 1;
        match unit.fate() {
            Fate::Kept => self.both_surviving += 1,
            Fate::Orphan(0) => self.forward_only += 1,
            Fate::Orphan(_) => self.reverse_only += 1,
            Fate::Dropped => self.dropped += 1,
        }
    }

    fn percent(&self, count: u64) -> String {
        let fraction = if self.input == 0 {
            0.0
        } else {
            count as f64 / self.input as f64
        };
        format!("{:.2}%", fraction * 100.0)
    }
}

impl fmt::Display for TrimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.paired {
            write!(
                f,
                "Input Read Pairs: {} Both Surviving: {} ({}) Forward Only Surviving: {} ({}) \
                 Reverse Only Surviving: {} ({}) Dropped: {} ({})",
                self.input,
                self.both_surviving,
                self.percent(self.both_surviving),
                self.forward_only,
                self.percent(self.forward_only),
                self.reverse_only,
                self.percent(self.reverse_only),
                self.dropped,
                self.percent(self.dropped),
            )
        } else {
            write!(
                f,
                "Input Reads: {} Surviving: {} ({}) Dropped: {} ({})",
                self.input,
                self.both_surviving,
                self.percent(self.both_surviving),
                self.dropped,
                self.percent(self.dropped),
            )
        }
    }
}
