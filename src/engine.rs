//! Trimming engines and the single-threaded reference engine.

use crate::error::Result;
use crate::sinks::OutputSinks;
use crate::source::UnitSource;
use crate::stats::TrimStats;
use crate::trim::TrimmerChain;
use crate::trimlog::TrimLogWriter;
use std::io::Write;
use std::sync::Arc;

/// What an engine hands back once the input is exhausted: the final counts and
/// the sinks, so the caller can finish the underlying files.
pub struct EngineOutput<W: Write, L: Write> {
    pub stats: TrimStats,
    pub sinks: OutputSinks<W>,
    pub trim_log: Option<TrimLogWriter<L>>,
}

/// Drives units from a source through a chain into sinks.
///
/// Every engine writes the same records in the same order; they differ only in
/// how the chain evaluation is scheduled.
pub trait Engine {
    fn run<W, L>(
        &self,
        source: UnitSource,
        chain: Arc<TrimmerChain>,
        sinks: OutputSinks<W>,
        trim_log: Option<TrimLogWriter<L>>,
    ) -> Result<EngineOutput<W, L>>
    where
        W: Write + Send + 'static,
        L: Write + Send + 'static;
}

/// Processes one unit at a time on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialEngine;

impl Engine for SerialEngine {
    fn run<W, L>(
        &self,
        mut source: UnitSource,
        chain: Arc<TrimmerChain>,
        mut sinks: OutputSinks<W>,
        mut trim_log: Option<TrimLogWriter<L>>,
    ) -> Result<EngineOutput<W, L>>
    where
        W: Write + Send + 'static,
        L: Write + Send + 'static,
    {
        let mut stats = TrimStats::new(source.arity());
        let log_trims = trim_log.is_some();
        while let Some(unit) = source.next_unit()? {
            let trimmed = chain.trim_unit(unit, log_trims)?;
            sinks.write_unit(&trimmed.unit)?;
            if let Some(log) = trim_log.as_mut() {
                log.write_unit(&trimmed)?;
            }
            stats.record(&trimmed.unit);
        }
        log::info!("{stats}");
        Ok(EngineOutput {
            stats,
            sinks,
            trim_log,
        })
    }
}
