use super::{Trimmer, Verdict};
use crate::record::FastqRecord;
use std::fmt;

/// Removes bases from the start until one reaches `quality`.
#[derive(Debug, Clone)]
pub struct LeadingTrimmer {
    quality: i32,
}

impl LeadingTrimmer {
    pub fn new(quality: i32) -> Self {
        Self { quality }
    }
}

impl fmt::Display for LeadingTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LEADING:{}", self.quality)
    }
}

impl Trimmer for LeadingTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        let quals = record.quality_as_integers(true);
        match quals.iter().position(|&q| q >= self.quality) {
            Some(0) => Verdict::Keep,
            Some(start) => Verdict::Trim {
                start,
                length: quals.len() - start,
            },
            None => Verdict::Drop,
        }
    }
}
