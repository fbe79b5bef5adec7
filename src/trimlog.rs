//! Per-read trim log: `<name> <length> <start> <end> <trimmed tail>`.

use crate::unit::TrimmedUnit;
use std::io::{self, Write};

/// Writes one line for every input read, positions relative to the untrimmed read.
///
/// A dropped read is logged with all four numbers set to zero.
pub struct TrimLogWriter<W: Write> {
    out: W,
}

impl<W: Write> TrimLogWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_unit(&mut self, trimmed: &TrimmedUnit) -> io::Result<()> {
        let Some(origins) = &trimmed.origins else {
            return Ok(());
        };
        for (i, origin) in origins.iter().enumerate() {
            let (length, start, end, tail) = match trimmed.unit.slot(i) {
                Some(record) => {
                    let start = record.head_pos();
                    let end = start + record.len();
                    (record.len(), start, end, origin.length.saturating_sub(end))
                }
                None => (0, 0, 0, 0),
            };
            writeln!(self.out, "{} {length} {start} {end} {tail}", origin.name)?;
        }
        Ok(())
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
