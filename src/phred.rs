//! Quality score encodings and detection of the encoding used by an input.

use crate::record::FastqRecord;
use std::fmt;

/// ASCII offset added to a Phred quality value to produce its quality character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PhredOffset {
    #[default]
    Phred33,
    Phred64,
}

impl PhredOffset {
    #[inline]
    pub fn value(self) -> u8 {
        match self {
            Self::Phred33 => 33,
            Self::Phred64 => 64,
        }
    }
}

impl fmt::Display for PhredOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phred{}", self.value())
    }
}

// Phred+33 characters below ';' cannot occur in Phred+64 data, and Phred+64
// characters above 'J' are beyond the usual Phred+33 range.
const PHRED33_ONLY_BELOW: u8 = b';';
const PHRED64_ONLY_ABOVE: u8 = b'J';

/// Guess the quality encoding from a sample of records.
///
/// Returns `None` when the sample has no distinguishing characters or carries
/// evidence for both encodings.
pub fn detect<'a, I>(records: I) -> Option<PhredOffset>
where
    I: IntoIterator<Item = &'a FastqRecord>,
{
    let mut phred33 = 0u64;
    let mut phred64 = 0u64;
    for rec in records {
        for &q in rec.quality() {
            if q < PHRED33_ONLY_BELOW {
                phred33 += 1;
            } else if q > PHRED64_ONLY_ABOVE {
                phred64 += 1;
            }
        }
    }
    log::debug!("quality detection: {phred33} phred33-only, {phred64} phred64-only characters");
    match (phred33 > 0, phred64 > 0) {
        (true, false) => Some(PhredOffset::Phred33),
        (false, true) => Some(PhredOffset::Phred64),
        _ => None,
    }
}
