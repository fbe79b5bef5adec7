//! Per-read trimming rules and their composition into a chain.
//!
//! Each rule is built from a `NAME:arg1:arg2` token, e.g. `SLIDINGWINDOW:20:4`
//! (mean quality 20 over windows of 4 bases).
//! Rules only look at one record at a time; the default [`Trimmer::process_records`]
//! applies the rule to every read of a unit that is still present.

mod chain;
mod crop;
mod head_crop;
mod leading;
mod min_len;
mod sliding_window;
mod trailing;

pub use chain::TrimmerChain;
pub use crop::CropTrimmer;
pub use head_crop::HeadCropTrimmer;
pub use leading::LeadingTrimmer;
pub use min_len::MinLenTrimmer;
pub use sliding_window::SlidingWindowTrimmer;
pub use trailing::TrailingTrimmer;

use crate::error::{ChainError, ConfigError};
use crate::record::FastqRecord;
use crate::unit::ReadUnit;
use std::fmt;

/// What a trimmer decided for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    /// Keep only bases `[start, start + length)`.
    Trim { start: usize, length: usize },
    Drop,
}

/// A stateless trimming rule, shared by all worker threads.
///
/// `Display` renders the rule back into its `NAME:args` form.
pub trait Trimmer: fmt::Debug + fmt::Display + Send + Sync {
    /// Decide the fate of a single read.
    fn trim_record(&self, record: &FastqRecord) -> Verdict;

    /// Apply the rule to every present read of a unit. Absent reads stay absent.
    fn process_records(&self, unit: ReadUnit) -> Result<ReadUnit, ChainError> {
        let mut slots = unit.into_slots();
        for slot in slots.iter_mut() {
            if let Some(record) = slot.take() {
                *slot = apply(self, record)?;
            }
        }
        Ok(ReadUnit::from_slots(slots))
    }
}

/// Run `trimmer` on `record` and build the resulting record.
pub fn apply<T: Trimmer + ?Sized>(
    trimmer: &T,
    record: FastqRecord,
) -> Result<Option<FastqRecord>, ChainError> {
    match trimmer.trim_record(&record) {
        Verdict::Keep => Ok(Some(record)),
        Verdict::Drop => Ok(None),
        Verdict::Trim { start, length } => {
            record
                .subrange(start, length)
                .map(Some)
                .map_err(|source| ChainError {
                    trimmer: trimmer.to_string(),
                    read: record.name().to_string(),
                    source,
                })
        }
    }
}

/// Build a trimmer from its `NAME:arg1:arg2...` token.
pub fn parse_trimmer(spec: &str) -> Result<Box<dyn Trimmer>, ConfigError> {
    let spec = spec.trim();
    let mut parts = spec.split(':');
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(ConfigError::EmptySpec);
    }
    let args: Vec<&str> = parts.collect();

    let trimmer: Box<dyn Trimmer> = match name {
        "LEADING" => {
            let [quality] = expect_args(spec, &args)?;
            Box::new(LeadingTrimmer::new(quality))
        }
        "TRAILING" => {
            let [quality] = expect_args(spec, &args)?;
            Box::new(TrailingTrimmer::new(quality))
        }
        "SLIDINGWINDOW" => {
            let [quality, window] = expect_args(spec, &args)?;
            Box::new(SlidingWindowTrimmer::new(quality, window as usize)?)
        }
        "CROP" => {
            let [length] = expect_args(spec, &args)?;
            Box::new(CropTrimmer::new(length as usize))
        }
        "HEADCROP" => {
            let [bases] = expect_args(spec, &args)?;
            Box::new(HeadCropTrimmer::new(bases as usize))
        }
        "MINLEN" => {
            let [length] = expect_args(spec, &args)?;
            Box::new(MinLenTrimmer::new(length as usize))
        }
        other => return Err(ConfigError::UnknownTrimmer(other.to_string())),
    };
    Ok(trimmer)
}

fn expect_args<const N: usize>(spec: &str, args: &[&str]) -> Result<[i32; N], ConfigError> {
    if args.len() != N {
        return Err(ConfigError::ArgumentCount {
            spec: spec.to_string(),
            expected: N,
            got: args.len(),
        });
    }
    let mut out = [0i32; N];
    for (slot, raw) in out.iter_mut().zip(args) {
        *slot = parse_number(spec, raw)?;
    }
    Ok(out)
}

/// Arguments are non-negative integers.
fn parse_number(spec: &str, raw: &str) -> Result<i32, ConfigError> {
    match raw.trim().parse::<i32>() {
        Ok(v) if v >= 0 => Ok(v),
        _ => Err(ConfigError::InvalidArgument {
            spec: spec.to_string(),
            value: raw.to_string(),
        }),
    }
}
