use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use readtrim::config::DEFAULT_BLOCK_SIZE;
use readtrim::{Layout, PhredOffset, TrimJob};
use std::ffi::OsString;
use std::path::PathBuf;

/// Options historically spelled with a single dash.
const LEGACY_OPTIONS: &[&str] = &["-phred33", "-phred64", "-threads", "-trimlog", "-blocksize"];

#[derive(Parser, Debug)]
#[command(name = "readtrim", version, about = "Quality trimming and filtering of FASTQ reads")]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Trim single-end reads
    #[command(name = "SE", alias = "se")]
    SingleEnd {
        #[command(flatten)]
        common: CommonArgs,
        /// Input FASTQ (plain or .gz)
        input: PathBuf,
        /// Output FASTQ (.gz to compress)
        output: PathBuf,
        /// Trimming steps, e.g. LEADING:3 SLIDINGWINDOW:15:4 MINLEN:36
        #[arg(required = true, num_args = 1..)]
        trimmers: Vec<String>,
    },
    /// Trim paired-end reads from two files
    #[command(name = "PE", alias = "pe")]
    PairedEnd {
        #[command(flatten)]
        common: CommonArgs,
        forward_input: PathBuf,
        reverse_input: PathBuf,
        /// Forward reads whose mate survived
        forward_paired: PathBuf,
        /// Forward reads whose mate was dropped
        forward_unpaired: PathBuf,
        reverse_paired: PathBuf,
        reverse_unpaired: PathBuf,
        #[arg(required = true, num_args = 1..)]
        trimmers: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Qualities are encoded with offset 33
    #[arg(long = "phred33", conflicts_with = "phred64")]
    phred33: bool,
    /// Qualities are encoded with offset 64
    #[arg(long = "phred64")]
    phred64: bool,
    /// Worker threads; 0 uses every CPU
    #[arg(long)]
    threads: Option<usize>,
    /// Write a per-read trim log
    #[arg(long = "trimlog")]
    trim_log: Option<PathBuf>,
    /// Reads (or pairs) per unit of parallel work
    #[arg(long = "blocksize", default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,
}

impl CommonArgs {
    fn phred(&self) -> Option<PhredOffset> {
        if self.phred33 {
            Some(PhredOffset::Phred33)
        } else if self.phred64 {
            Some(PhredOffset::Phred64)
        } else {
            None
        }
    }

    fn apply(self, mut job: TrimJob) -> TrimJob {
        job.phred = self.phred();
        job.threads = self.threads;
        job.trim_log = self.trim_log;
        job.block_size = self.block_size;
        job
    }
}

impl Mode {
    fn into_job(self) -> TrimJob {
        match self {
            Mode::SingleEnd {
                common,
                input,
                output,
                trimmers,
            } => common.apply(TrimJob::new(Layout::SingleEnd { input, output }, trimmers)),
            Mode::PairedEnd {
                common,
                forward_input,
                reverse_input,
                forward_paired,
                forward_unpaired,
                reverse_paired,
                reverse_unpaired,
                trimmers,
            } => common.apply(TrimJob::new(
                Layout::PairedEnd {
                    forward_input,
                    reverse_input,
                    forward_paired,
                    forward_unpaired,
                    reverse_paired,
                    reverse_unpaired,
                },
                trimmers,
            )),
        }
    }
}

/// Rewrite `-threads` style options into the `--threads` form clap understands.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some(s) if LEGACY_OPTIONS.contains(&s) => OsString::from(format!("-{s}")),
            _ => arg,
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    let job = cli.mode.into_job();
    let report = readtrim::job::run(&job)?;
    info!(
        "completed in {:.2?} ({}, {} threads)",
        report.elapsed, report.phred_offset, report.threads
    );
    Ok(())
}
