//! File-level entry point: open inputs and outputs, pick an engine, run it.

use crate::config::{DEFAULT_BLOCK_SIZE, PipelineConfig, resolve_threads};
use crate::engine::{Engine, EngineOutput, SerialEngine};
use crate::error::{Error, Result};
use crate::phred::PhredOffset;
use crate::pipeline::Pipeline;
use crate::policy::ReaderOptions;
use crate::reader::FastqReader;
use crate::sinks::OutputSinks;
use crate::source::UnitSource;
use crate::stats::TrimStats;
use crate::trim::TrimmerChain;
use crate::trimlog::TrimLogWriter;
use crate::writer::OutputFile;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Input and output files of a run.
#[derive(Debug, Clone)]
pub enum Layout {
    SingleEnd {
        input: PathBuf,
        output: PathBuf,
    },
    PairedEnd {
        forward_input: PathBuf,
        reverse_input: PathBuf,
        forward_paired: PathBuf,
        forward_unpaired: PathBuf,
        reverse_paired: PathBuf,
        reverse_unpaired: PathBuf,
    },
}

/// Everything needed for one trimming run.
#[derive(Debug, Clone)]
pub struct TrimJob {
    pub layout: Layout,
    /// `NAME:args` tokens, applied left to right.
    pub trimmers: Vec<String>,
    /// Detected from the input when `None`.
    pub phred: Option<PhredOffset>,
    /// `None` or zero means one per CPU.
    pub threads: Option<usize>,
    pub trim_log: Option<PathBuf>,
    pub block_size: usize,
    pub reader: ReaderOptions,
}

impl TrimJob {
    pub fn new(layout: Layout, trimmers: Vec<String>) -> Self {
        Self {
            layout,
            trimmers,
            phred: None,
            threads: None,
            trim_log: None,
            block_size: DEFAULT_BLOCK_SIZE,
            reader: ReaderOptions::default(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: TrimStats,
    pub phred_offset: PhredOffset,
    pub threads: usize,
    pub elapsed: Duration,
}

/// Run `job` to completion.
///
/// Configuration is checked before any output file is created.
pub fn run(job: &TrimJob) -> Result<RunReport> {
    let started = Instant::now();
    let chain = Arc::new(TrimmerChain::from_specs(&job.trimmers)?);
    let threads = resolve_threads(job.threads);
    let config = PipelineConfig::new(threads).with_block_size(job.block_size);
    config.validate()?;
    log::info!("trimmers: {chain}");

    let mut source = open_source(&job.layout, &job.reader)?;
    let phred_offset = match job.phred {
        Some(offset) => {
            source.set_phred_offset(offset);
            offset
        }
        None => {
            let offset = source.detect_phred_offset(config.block_size)?;
            log::info!("quality encoding detected as {offset}");
            offset
        }
    };

    let (sinks, outputs) = open_sinks(&job.layout)?;
    let trim_log = match &job.trim_log {
        Some(path) => {
            let file = File::create(path).map_err(|e| Error::io("create", path, e))?;
            Some(TrimLogWriter::new(BufWriter::new(file)))
        }
        None => None,
    };

    let output = if threads == 1 {
        log::info!("using single-threaded engine");
        SerialEngine.run(source, chain, sinks, trim_log)?
    } else {
        log::info!("using {threads} worker threads");
        Pipeline::new(config)?.run(source, chain, sinks, trim_log)?
    };
    let stats = finish(output, &outputs, job.trim_log.as_deref())?;

    Ok(RunReport {
        stats,
        phred_offset,
        threads,
        elapsed: started.elapsed(),
    })
}

fn open_reader(path: &Path, opts: &ReaderOptions) -> Result<FastqReader> {
    Ok(FastqReader::from_path(path, opts.clone())?)
}

fn open_source(layout: &Layout, opts: &ReaderOptions) -> Result<UnitSource> {
    Ok(match layout {
        Layout::SingleEnd { input, .. } => UnitSource::single(open_reader(input, opts)?),
        Layout::PairedEnd {
            forward_input,
            reverse_input,
            ..
        } => UnitSource::paired(
            open_reader(forward_input, opts)?,
            open_reader(reverse_input, opts)?,
        ),
    })
}

fn create_output(path: &Path) -> Result<OutputFile> {
    OutputFile::create(path).map_err(|e| Error::io("create", path, e))
}

fn open_sinks(layout: &Layout) -> Result<(OutputSinks<OutputFile>, Vec<PathBuf>)> {
    Ok(match layout {
        Layout::SingleEnd { output, .. } => (
            OutputSinks::single(create_output(output)?),
            vec![output.clone()],
        ),
        Layout::PairedEnd {
            forward_paired,
            forward_unpaired,
            reverse_paired,
            reverse_unpaired,
            ..
        } => (
            OutputSinks::paired(
                create_output(forward_paired)?,
                create_output(forward_unpaired)?,
                create_output(reverse_paired)?,
                create_output(reverse_unpaired)?,
            ),
            vec![
                forward_paired.clone(),
                forward_unpaired.clone(),
                reverse_paired.clone(),
                reverse_unpaired.clone(),
            ],
        ),
    })
}

/// Complete every output file; `paths` lists them in [`OutputSinks::into_writers`] order.
fn finish(
    output: EngineOutput<OutputFile, BufWriter<File>>,
    paths: &[PathBuf],
    trim_log: Option<&Path>,
) -> Result<TrimStats> {
    let writers = output.sinks.into_writers()?;
    for (writer, path) in writers.into_iter().zip(paths) {
        writer.finish().map_err(|e| Error::io("finish", path, e))?;
    }
    if let (Some(log), Some(path)) = (output.trim_log, trim_log) {
        log.into_inner().map_err(|e| Error::io("flush", path, e))?;
    }
    Ok(output.stats)
}
