use super::{Trimmer, Verdict};
use crate::error::ConfigError;
use crate::record::FastqRecord;
use std::fmt;

/// Scans windows of `window` bases from the left and cuts the read at the first
/// window whose mean quality drops below `quality`, then strips the remaining
/// low-quality bases from the new end. Written `SLIDINGWINDOW:<quality>:<window>`.
///
/// A read shorter than the window is judged as a single window of its own length.
/// When the very first window already fails the whole read is dropped.
#[derive(Debug, Clone)]
pub struct SlidingWindowTrimmer {
    quality: i32,
    window: usize,
}

impl SlidingWindowTrimmer {
    pub fn new(quality: i32, window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow(format!("SLIDINGWINDOW:{quality}:{window}")));
        }
        Ok(Self { quality, window })
    }
}

impl fmt::Display for SlidingWindowTrimmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SLIDINGWINDOW:{}:{}", self.quality, self.window)
    }
}

impl Trimmer for SlidingWindowTrimmer {
    fn trim_record(&self, record: &FastqRecord) -> Verdict {
        let quals = record.quality_as_integers(false);
        if quals.is_empty() {
            return Verdict::Drop;
        }
        let window = self.window.min(quals.len());
        // compare totals instead of means to stay in integers
        let required = i64::from(self.quality) * window as i64;
        let mut total: i64 = quals[..window].iter().map(|&q| i64::from(q)).sum();
        if total < required {
            return Verdict::Drop;
        }

        let mut keep = None;
        for start in 1..=quals.len() - window {
            total += i64::from(quals[start + window - 1]) - i64::from(quals[start - 1]);
            if total < required {
                // everything up to the last base of the previous window
                keep = Some(start + window - 1);
                break;
            }
        }
        let Some(mut keep) = keep else {
            return Verdict::Keep;
        };

        while keep > 0 && quals[keep - 1] < self.quality {
            keep -= 1;
        }
        if keep == 0 {
            Verdict::Drop
        } else {
            Verdict::Trim {
                start: 0,
                length: keep,
            }
        }
    }
}
