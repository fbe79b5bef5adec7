//! Read units: the reads of one fragment that must travel through trimming together.

use crate::record::FastqRecord;

/// One read (single-end) or one mate pair (paired-end).
///
/// A `None` slot is a read that an earlier trimmer dropped. The number of slots
/// never changes once the unit is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadUnit {
    slots: Vec<Option<FastqRecord>>,
}

/// Where a unit ended up after the chain ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Every slot survived.
    Kept,
    /// Exactly one slot of a pair survived.
    Orphan(usize),
    /// No slot survived.
    Dropped,
}

impl ReadUnit {
    pub fn single(record: FastqRecord) -> Self {
        Self {
            slots: vec![Some(record)],
        }
    }

    pub fn pair(forward: FastqRecord, reverse: FastqRecord) -> Self {
        Self {
            slots: vec![Some(forward), Some(reverse)],
        }
    }

    pub fn from_slots(slots: Vec<Option<FastqRecord>>) -> Self {
        Self { slots }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn slot(&self, index: usize) -> Option<&FastqRecord> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<FastqRecord>] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Option<FastqRecord>] {
        &mut self.slots
    }

    pub fn into_slots(self) -> Vec<Option<FastqRecord>> {
        self.slots
    }

    pub fn survivors(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Name of the first read still present, for diagnostics.
    pub fn first_name(&self) -> Option<&str> {
        self.slots.iter().flatten().next().map(FastqRecord::name)
    }

    pub fn fate(&self) -> Fate {
        match self.survivors() {
            0 => Fate::Dropped,
            n if n == self.arity() => Fate::Kept,
            _ => Fate::Orphan(self.slots.iter().position(Option::is_some).unwrap_or(0)),
        }
    }
}

/// Name and length of a read before trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOrigin {
    pub name: String,
    pub length: usize,
}

impl ReadOrigin {
    pub fn of(record: &FastqRecord) -> Self {
        Self {
            name: record.name().to_string(),
            length: record.len(),
        }
    }
}

/// A unit after the chain ran, with the untrimmed read shapes when a trim log wants them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedUnit {
    pub origins: Option<Vec<ReadOrigin>>,
    pub unit: ReadUnit,
}
