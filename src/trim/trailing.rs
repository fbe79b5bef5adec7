use super::{Trimmer, Verdict};
use crate::record::FastqRecord;
use std::fmt;

/// Removes bases from the end until one reaches `quality`.
#[derive(Debug, Clone)]
pub struct TrailingTrimmer {
    quality: i32,
}

impl TrailingTrimmer {
    pub fn new(quality: i32) -> Self {
        Self { quality }
    }
}

impl fmt::Display for TrailingTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TRAILING:{}", self.quality)
    }
}

impl Trimmer for TrailingTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        let quals = record.quality_as_integers(true);
        match quals.iter().rposition(|&q| q >= self.quality) {
            Some(last) if last + 1 == quals.len() => Verdict::Keep,
            Some(last) => Verdict::Trim {
                start: 0,
                length: last + 1,
            },
            None => Verdict::Drop,
        }
    }
}
