//! Routing of trimmed units to their output files.

use crate::unit::{Fate, ReadUnit};
use crate::writer::FastqWriter;
use std::io::{self, Write};

/// The FASTQ outputs of a run.
pub enum OutputSinks<W: Write> {
    SingleEnd {
        output: FastqWriter<W>,
    },
    PairedEnd {
        forward_paired: FastqWriter<W>,
        forward_unpaired: FastqWriter<W>,
        reverse_paired: FastqWriter<W>,
        reverse_unpaired: FastqWriter<W>,
    },
}

impl<W: Write> OutputSinks<W> {
    pub fn single(output: W) -> Self {
        Self::SingleEnd {
            output: FastqWriter::new(output),
        }
    }

    pub fn paired(
        forward_paired: W,
        forward_unpaired: W,
        reverse_paired: W,
        reverse_unpaired: W,
    ) -> Self {
        Self::PairedEnd {
            forward_paired: FastqWriter::new(forward_paired),
            forward_unpaired: FastqWriter::new(forward_unpaired),
            reverse_paired: FastqWriter::new(reverse_paired),
            reverse_unpaired: FastqWriter::new(reverse_unpaired),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::SingleEnd { .. } => 1,
            Self::PairedEnd { .. } => 2,
        }
    }

    /// Write the surviving reads of `unit`. Pairs go to the paired outputs, a lone
    /// survivor to its own unpaired output, dropped units nowhere.
    pub fn write_unit(&mut self, unit: &ReadUnit) -> io::Result<()> {
        match self {
            Self::SingleEnd { output } => {
                if let Some(record) = unit.slot(0) {
                    output.write_record(record)?;
                }
            }
            Self::PairedEnd {
                forward_paired,
                forward_unpaired,
                reverse_paired,
                reverse_unpaired,
            } => match (unit.fate(), unit.slot(0), unit.slot(1)) {
                (Fate::Kept, Some(fwd), Some(rev)) => {
                    forward_paired.write_record(fwd)?;
                    reverse_paired.write_record(rev)?;
                }
                (Fate::Orphan(0), Some(fwd), _) => forward_unpaired.write_record(fwd)?,
                (Fate::Orphan(1), _, Some(rev)) => reverse_unpaired.write_record(rev)?,
                _ => {}
            },
        }
        Ok(())
    }

    /// Flush every output and return the writers, single-end first or
    /// forward paired, forward unpaired, reverse paired, reverse unpaired.
    pub fn into_writers(self) -> io::Result<Vec<W>> {
        match self {
            Self::SingleEnd { output } => Ok(vec![output.into_inner()?]),
            Self::PairedEnd {
                forward_paired,
                forward_unpaired,
                reverse_paired,
                reverse_unpaired,
            } => Ok(vec![
                forward_paired.into_inner()?,
                forward_unpaired.into_inner()?,
                reverse_paired.into_inner()?,
                reverse_unpaired.into_inner()?,
            ]),
        }
    }
}
