use super::{Trimmer, Verdict};
use crate::record::FastqRecord;
use std::fmt;

/// Removes a fixed number of bases from the start. Reads no longer than that are dropped.
#[derive(Debug, Clone)]
pub struct HeadCropTrimmer {
    bases: usize,
}

impl HeadCropTrimmer {
    pub fn new(bases: usize) -> Self {
        Self { bases }
    }
}

impl fmt::Display for HeadCropTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HEADCROP:{}", self.bases)
    }
}

impl Trimmer for HeadCropTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        match self.bases {
            0 => Verdict::Keep,
            n if record.len() <= n => Verdict::Drop,
            n => Verdict::Trim {
                start: n,
                length: record.len() - n,
            },
        }
    }
}
