use super::{Trimmer, parse_trimmer};
use crate::block::{Block, TrimmedBlock};
use crate::error::{ChainError, ConfigError, TrimError};
use crate::unit::{ReadOrigin, ReadUnit, TrimmedUnit};
use std::fmt;

/// Trimmers applied in order to every unit.
///
/// Holds no state besides the trimmers themselves, so one chain can be shared by
/// all workers behind an `Arc`.
#[derive(Debug, Default)]
pub struct TrimmerChain {
    trimmers: Vec<Box<dyn Trimmer>>,
}

impl TrimmerChain {
    pub fn new(trimmers: Vec<Box<dyn Trimmer>>) -> Self {
        Self { trimmers }
    }

    /// Build a chain from `NAME:args` tokens, applied left to right.
    pub fn from_specs<I, S>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trimmers = specs
            .into_iter()
            .map(|spec| parse_trimmer(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(trimmers))
    }

    pub fn len(&self) -> usize {
        self.trimmers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Trimmer> + '_ {
        self.trimmers.iter().map(|t| &**t)
    }

    /// Run every trimmer over `unit`.
    ///
    /// Stops early once no read is left. A trimmer that changes the number of
    /// slots or brings back a dropped read is reported as a failure.
    pub fn process_unit(&self, mut unit: ReadUnit) -> Result<ReadUnit, ChainError> {
        let arity = unit.arity();
        for trimmer in &self.trimmers {
            if unit.survivors() == 0 {
                break;
            }
            let present = presence(&unit);
            unit = trimmer.process_records(unit)?;

            let violation = if unit.arity() != arity {
                Some(TrimError::ArityChanged {
                    before: arity,
                    after: unit.arity(),
                })
            } else {
                let restored = presence(&unit) & !present;
                (restored != 0).then(|| TrimError::SlotRestored {
                    slot: restored.trailing_zeros() as usize,
                })
            };
            if let Some(source) = violation {
                return Err(ChainError {
                    trimmer: trimmer.to_string(),
                    read: unit.first_name().unwrap_or_default().to_string(),
                    source,
                });
            }
        }
        Ok(unit)
    }

    /// Trim one unit, keeping the untrimmed names and lengths when `capture_origins` is set.
    pub fn trim_unit(
        &self,
        unit: ReadUnit,
        capture_origins: bool,
    ) -> Result<TrimmedUnit, ChainError> {
        let origins = capture_origins.then(|| {
            unit.slots()
                .iter()
                .flatten()
                .map(ReadOrigin::of)
                .collect::<Vec<_>>()
        });
        let unit = self.process_unit(unit)?;
        Ok(TrimmedUnit { origins, unit })
    }

    /// Trim every unit of a block, keeping their order.
    pub fn process_block(
        &self,
        block: Block,
        capture_origins: bool,
    ) -> Result<TrimmedBlock, ChainError> {
        let units = block
            .units
            .into_iter()
            .map(|unit| self.trim_unit(unit, capture_origins))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TrimmedBlock {
            index: block.index,
            units,
        })
    }
}

/// Bit `i` is set when slot `i` holds a read.
fn presence(unit: &ReadUnit) -> u64 {
    unit.slots()
        .iter()
        .take(64)
        .enumerate()
        .filter(|(_, slot)| slot.is_some())
        .fold(0, |mask, (i, _)| mask | (1u64 << i))
}

impl fmt::Display for TrimmerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, trimmer) in self.trimmers.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{trimmer}")?;
        }
        Ok(())
    }
}
