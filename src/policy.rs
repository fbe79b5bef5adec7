//! Parsing options for [`crate::reader::FastqReader`].
//!
//! The command line always reads single-line FASTQ with FASTA headers reported as
//! such. Multi-line input and `fastq_only = false` are library options, set through
//! [`crate::job::TrimJob::reader`] or passed to the reader directly.

use crate::phred::PhredOffset;

/// How sequence/quality lines are laid out in FASTQ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Sequence and quality occupy exactly one line each.
    Single,
    /// Sequence/quality may span multiple lines (general FASTQ).
    Multi,
}

#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Report a FASTA header as its own error instead of a missing `@`.
    pub fastq_only: bool,
    pub line_mode: LineMode,
    /// Encoding stamped on parsed records; may be replaced after detection.
    pub phred_offset: PhredOffset,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            fastq_only: true,
            line_mode: LineMode::Single,
            phred_offset: PhredOffset::Phred33,
        }
    }
}
