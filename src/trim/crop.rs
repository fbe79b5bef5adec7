use super::{Trimmer, Verdict};
use crate::record::FastqRecord;
use std::fmt;

/// Cuts reads down to at most `length` bases, removing from the end.
#[derive(Debug, Clone)]
pub struct CropTrimmer {
    length: usize,
}

impl CropTrimmer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl fmt::Display for CropTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CROP:{}", self.length)
    }
}

impl Trimmer for CropTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        if record.len() > self.length {
            Verdict::Trim {
                start: 0,
                length: self.length,
            }
        } else {
            Verdict::Keep
        }
    }
}
