//! Turns one or two FASTQ readers into a stream of read units.

use crate::block::Block;
use crate::config::DEFAULT_BLOCK_SIZE;
use crate::error::{ConfigError, Error, Result};
use crate::phred::{self, PhredOffset};
use crate::reader::FastqReader;
use crate::unit::ReadUnit;
use std::collections::VecDeque;

/// Yields single reads, or mate pairs read in lockstep from two files.
pub struct UnitSource {
    readers: Vec<FastqReader>,
    lookahead: VecDeque<ReadUnit>,
}

impl UnitSource {
    pub fn single(reader: FastqReader) -> Self {
        Self {
            readers: vec![reader],
            lookahead: VecDeque::new(),
        }
    }

    pub fn paired(forward: FastqReader, reverse: FastqReader) -> Self {
        Self {
            readers: vec![forward, reverse],
            lookahead: VecDeque::new(),
        }
    }

    /// Reads per unit: 1 for single-end, 2 for paired-end.
    pub fn arity(&self) -> usize {
        self.readers.len()
    }

    pub fn next_unit(&mut self) -> Result<Option<ReadUnit>> {
        if let Some(unit) = self.lookahead.pop_front() {
            return Ok(Some(unit));
        }
        self.read_unit()
    }

    fn read_unit(&mut self) -> Result<Option<ReadUnit>> {
        let mut slots = Vec::with_capacity(self.readers.len());
        let mut ended = None;
        for (i, reader) in self.readers.iter_mut().enumerate() {
            match reader.next().transpose()? {
                Some(record) => slots.push(Some(record)),
                None => ended = ended.or(Some(i)),
            }
        }
        match ended {
            None => Ok(Some(ReadUnit::from_slots(slots))),
            Some(_) if slots.is_empty() => Ok(None),
            Some(ended) => Err(Error::UnpairedInput { ended }),
        }
    }

    /// Fill a block with up to `capacity` units. An empty block means the input is exhausted.
    pub fn next_block(&mut self, index: u64, capacity: usize) -> Result<Block> {
        let mut units = Vec::with_capacity(capacity.min(DEFAULT_BLOCK_SIZE));
        while units.len() < capacity {
            match self.next_unit()? {
                Some(unit) => units.push(unit),
                None => break,
            }
        }
        Ok(Block { index, units })
    }

    /// Stamp `offset` on every record read from now on, including buffered ones.
    pub fn set_phred_offset(&mut self, offset: PhredOffset) {
        for reader in &mut self.readers {
            reader.set_phred_offset(offset);
        }
        for unit in &mut self.lookahead {
            for record in unit.slots_mut().iter_mut().flatten() {
                record.set_phred_offset(offset);
            }
        }
    }

    /// Detect the quality encoding from the first `sample` units and apply it.
    ///
    /// The sampled units are buffered and still returned by [`Self::next_unit`].
    /// An empty input has nothing to decode and falls back to the default offset.
    pub fn detect_phred_offset(&mut self, sample: usize) -> Result<PhredOffset> {
        while self.lookahead.len() < sample {
            match self.read_unit()? {
                Some(unit) => self.lookahead.push_back(unit),
                None => break,
            }
        }
        if self.lookahead.is_empty() {
            log::warn!("input is empty; assuming {}", PhredOffset::default());
            return Ok(PhredOffset::default());
        }
        let records = self
            .lookahead
            .iter()
            .flat_map(|unit| unit.slots().iter().flatten());
        let offset = phred::detect(records).ok_or(ConfigError::UndetectableQuality)?;
        self.set_phred_offset(offset);
        Ok(offset)
    }
}
