use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy)]
pub struct IoContext {
    pub byte_pos: u64,
    pub line_num: u64,
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("expected header '@' at start of record")]
    MissingHeader,
    #[error("found FASTA header '>' where FASTQ '@' expected")]
    FastaHeaderDetected,
    #[error("missing '+' separator line")]
    MissingPlus,
    #[error("unexpected EOF inside record")]
    UnexpectedEof,
    #[error("quality length ({qual}) does not match sequence length ({seq})")]
    LengthMismatch { seq: usize, qual: usize },
    #[error("empty sequence")]
    EmptySequence,
}

#[derive(Debug, Error)]
pub enum FastqError {
    #[error("I/O error at {ctx:?}: {source}")]
    Io {
        #[source]
        source: io::Error,
        ctx: IoContext,
    },
    #[error("format error at {ctx:?}: {source}")]
    Format {
        #[source]
        source: FormatError,
        ctx: IoContext,
    },
}

impl FastqError {
    pub(crate) fn io_err(source: io::Error, ctx: IoContext) -> Self {
        Self::Io { source, ctx }
    }
    pub(crate) fn fmt_err(source: FormatError, ctx: IoContext) -> Self {
        Self::Format { source, ctx }
    }
}

/// Problems with the requested trimming setup, detected before any read is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("empty trimmer specification")]
    EmptySpec,
    #[error("unknown trimmer '{0}'")]
    UnknownTrimmer(String),
    #[error("trimmer '{spec}' expects {expected} argument(s), got {got}")]
    ArgumentCount {
        spec: String,
        expected: usize,
        got: usize,
    },
    #[error("trimmer '{spec}' has an invalid argument '{value}'")]
    InvalidArgument { spec: String, value: String },
    #[error("trimmer '{0}' needs a window of at least one base")]
    ZeroWindow(String),
    #[error("unable to detect quality encoding; pass -phred33 or -phred64")]
    UndetectableQuality,
    #[error("at least one worker thread is required")]
    NoThreads,
    #[error("block size must be at least one unit")]
    ZeroBlockSize,
    #[error("block size {requested} exceeds the maximum of {max} units")]
    BlockSizeTooLarge { requested: usize, max: usize },
    #[error("{requested} worker threads requested; at most {max} are supported")]
    TooManyThreads { requested: usize, max: usize },
}

/// Invariant violations raised while a trimmer rewrites a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrimError {
    #[error("range {start}..{end} exceeds read length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
    #[error("arity changed from {before} to {after}")]
    ArityChanged { before: usize, after: usize },
    #[error("read in slot {slot} was restored after being dropped")]
    SlotRestored { slot: usize },
}

/// A [`TrimError`] tagged with the trimmer and the read it was applied to.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("trimmer {trimmer} failed on read '{read}': {source}")]
pub struct ChainError {
    pub trimmer: String,
    pub read: String,
    #[source]
    pub source: TrimError,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fastq(#[from] FastqError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("failed to {op} '{}': {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write failed: {0}")]
    Write(#[from] io::Error),
    #[error("paired input {ended} ran out of records before its mate")]
    UnpairedInput { ended: usize },
    #[error("pipeline stage '{0}' panicked")]
    StagePanicked(&'static str),
    #[error("pipeline stage '{0}' lost its upstream before end of stream")]
    Disconnected(&'static str),
    #[error("worker pool did not shut down within {0:?}")]
    ShutdownTimeout(Duration),
}

impl Error {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True for errors that only mean another stage stopped first.
    pub(crate) fn is_secondary(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}
