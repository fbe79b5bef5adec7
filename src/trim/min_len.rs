use super::{Trimmer, Verdict};
use crate::record::FastqRecord;
use std::fmt;

#[derive(Debug, Clone)]
pub struct MinLenTrimmer {
    length: usize,
}

impl MinLenTrimmer {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl fmt::Display for MinLenTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MINLEN:{}", self.length)
    }
}

impl Trimmer for MinLenTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        if record.len() < self.length {
            Verdict::Drop
        } else {
            Verdict::Keep
        }
    }
}
