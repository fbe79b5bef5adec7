//! Quality trimming and filtering of FASTQ reads.
//!
//! - Single-end and paired-end input; mates stay together and orphans go to unpaired outputs.
//! - Configurable chain of trimmers (`LEADING`, `TRAILING`, `SLIDINGWINDOW`, `CROP`,
//!   `HEADCROP`, `MINLEN`).
//! - Multi-threaded pipeline whose outputs, trim log and statistics follow input order exactly.
//! - Plain and `.gz` input and output; quality encoding given or auto-detected.

pub mod block;
pub mod config;
pub mod engine;
pub mod error;
pub mod job;
pub mod phred;
pub mod pipeline;
pub mod policy;
pub mod pool;
pub mod reader;
pub mod record;
pub mod sinks;
pub mod source;
pub mod stats;
pub mod trim;
pub mod trimlog;
pub mod unit;
pub mod writer;
mod util;

pub use crate::config::PipelineConfig;
pub use crate::engine::{Engine, EngineOutput, SerialEngine};
pub use crate::error::{
    ChainError, ConfigError, Error, FastqError, FormatError, IoContext, Result, TrimError,
};
pub use crate::job::{Layout, RunReport, TrimJob};
pub use crate::phred::PhredOffset;
pub use crate::pipeline::Pipeline;
pub use crate::policy::{LineMode, ReaderOptions};
pub use crate::reader::{FastqReader, Source};
pub use crate::record::FastqRecord;
pub use crate::sinks::OutputSinks;
pub use crate::source::UnitSource;
pub use crate::stats::TrimStats;
pub use crate::trim::{Trimmer, TrimmerChain, Verdict};
pub use crate::trimlog::TrimLogWriter;
pub use crate::unit::{Fate, ReadUnit, TrimmedUnit};
