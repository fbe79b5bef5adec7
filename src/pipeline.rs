//! Order-preserving concurrent trimming.
//!
//! ```text
//! parser ──blocks──▶ coordinator ──submit──▶ worker pool
//!                        │
//!                        ├─futures─▶ serializer
//!                        ├─futures─▶ statistics
//!                        └─futures─▶ trim log (optional)
//! ```
//!
//! A dedicated thread parses units into blocks. The coordinator, running on the
//! calling thread, submits every block to the worker pool and pushes the returned
//! future onto one queue per consumer, in submission order. Each consumer waits on
//! the oldest future of its own queue before looking at the next one, so all of
//! them observe blocks in input order however the workers finish. Every queue is
//! bounded, which keeps the number of blocks in flight fixed.
//!
//! The empty sentinel block travels the same path as real blocks and tells each
//! consumer that the stream has ended. Any failure stops the run; nothing is retried.

use crate::block::{Block, TrimmedBlock};
use crate::config::PipelineConfig;
use crate::engine::{Engine, EngineOutput};
use crate::error::{ChainError, Error, Result};
use crate::pool::{TaskFuture, WorkerPool};
use crate::sinks::OutputSinks;
use crate::source::UnitSource;
use crate::stats::TrimStats;
use crate::trim::TrimmerChain;
use crate::trimlog::TrimLogWriter;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type BlockResult = std::result::Result<Arc<TrimmedBlock>, ChainError>;
type BlockFuture = TaskFuture<BlockResult>;

/// Multi-threaded [`Engine`]; output is identical to [`crate::engine::SerialEngine`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

impl Engine for Pipeline {
    fn run<W, L>(
        &self,
        source: UnitSource,
        chain: Arc<TrimmerChain>,
        sinks: OutputSinks<W>,
        trim_log: Option<TrimLogWriter<L>>,
    ) -> Result<EngineOutput<W, L>>
    where
        W: Write + Send + 'static,
        L: Write + Send + 'static,
    {
        let config = &self.config;
        let arity = source.arity();
        let log_trims = trim_log.is_some();
        log::debug!(
            "pipeline: {} workers, blocks of {} units",
            config.threads,
            config.block_size
        );

        let (block_tx, block_rx) = bounded::<Block>(config.block_queue_capacity());
        let block_size = config.block_size;
        let parser = spawn_stage("trim-parser", move || {
            parse_blocks(source, &block_tx, block_size)
        })?;

        let pool = WorkerPool::new(config.threads, config.task_queue_capacity())?;

        let capacity = config.consumer_queue_capacity();
        let (serial_tx, serial_rx) = bounded::<BlockFuture>(capacity);
        let serializer = spawn_stage("trim-serializer", move || {
            let mut sinks = sinks;
            drain("serializer", &serial_rx, |block| {
                for trimmed in &block.units {
                    sinks.write_unit(&trimmed.unit)?;
                }
                Ok(())
            })?;
            Ok(sinks)
        })?;

        let (log_tx, trim_logger) = match trim_log {
            Some(mut writer) => {
                let (tx, rx) = bounded::<BlockFuture>(capacity);
                let handle = spawn_stage("trim-log", move || {
                    drain("trim log", &rx, |block| {
                        for trimmed in &block.units {
                            writer.write_unit(trimmed)?;
                        }
                        Ok(())
                    })?;
                    Ok(writer)
                })?;
                (Some(tx), Some(handle))
            }
            None => (None, None),
        };

        let (stats_tx, stats_rx) = bounded::<BlockFuture>(capacity);
        let statistics = spawn_stage("trim-stats", move || {
            let mut stats = TrimStats::new(arity);
            drain("statistics", &stats_rx, |block| {
                for trimmed in &block.units {
                    stats.record(&trimmed.unit);
                }
                Ok(())
            })?;
            log::info!("{stats}");
            Ok(stats)
        })?;

        let mut queues = vec![&serial_tx, &stats_tx];
        queues.extend(log_tx.as_ref());
        let coordinated = coordinate(&block_rx, &pool, &chain, log_trims, &queues);
        drop(queues);

        // Teardown: parser, input, pool, then consumers in a fixed order.
        drop(block_rx);
        let parsed = join_stage("parser", parser).map(|source| {
            drop(source);
            log::debug!("pipeline: input closed");
        });
        let pooled = pool.shutdown(config.shutdown_timeout);
        drop(serial_tx);
        drop(log_tx);
        drop(stats_tx);
        let sinks = join_stage("serializer", serializer);
        let trim_log = match trim_logger {
            Some(handle) => join_stage("trim log", handle).map(Some),
            None => Ok(None),
        };
        let stats = join_stage("statistics", statistics);

        match (parsed, coordinated, sinks, trim_log, stats, pooled) {
            (Ok(()), Ok(blocks), Ok(sinks), Ok(trim_log), Ok(stats), Ok(())) => {
                log::debug!("pipeline: {blocks} blocks processed");
                Ok(EngineOutput {
                    stats,
                    sinks,
                    trim_log,
                })
            }
            (parsed, coordinated, sinks, trim_log, stats, pooled) => {
                let errors = [
                    parsed.err(),
                    coordinated.err(),
                    sinks.err(),
                    trim_log.err(),
                    stats.err(),
                    pooled.err(),
                ];
                Err(pick_error(errors.into_iter().flatten())
                    .unwrap_or(Error::Disconnected("pipeline")))
            }
        }
    }
}

/// Read blocks until the input runs out, ending with the sentinel.
///
/// Hands the source back so the caller decides when the input is closed.
fn parse_blocks(
    mut source: UnitSource,
    blocks: &Sender<Block>,
    block_size: usize,
) -> Result<UnitSource> {
    let mut index = 0;
    loop {
        let block = source.next_block(index, block_size)?;
        let last = block.is_sentinel();
        if blocks.send(block).is_err() {
            log::debug!("parser: downstream closed after {index} blocks");
            break;
        }
        if last {
            log::debug!("parser: end of input after {index} blocks");
            break;
        }
        index += 1;
    }
    Ok(source)
}

/// Submit blocks in arrival order and fan each future out to every consumer queue.
///
/// Returns the number of blocks submitted, sentinel included. Stops quietly when
/// the parser goes away; its own error explains why.
fn coordinate(
    blocks: &Receiver<Block>,
    pool: &WorkerPool,
    chain: &Arc<TrimmerChain>,
    log_trims: bool,
    queues: &[&Sender<BlockFuture>],
) -> Result<u64> {
    let mut submitted = 0;
    while let Ok(block) = blocks.recv() {
        let last = block.is_sentinel();
        let chain = Arc::clone(chain);
        let future = pool.submit(move || chain.process_block(block, log_trims).map(Arc::new))?;
        for queue in queues {
            queue
                .send(future.clone())
                .map_err(|_| Error::Disconnected("coordinator"))?;
        }
        submitted += 1;
        if last {
            break;
        }
    }
    Ok(submitted)
}

/// Consume futures strictly in queue order until the sentinel arrives.
fn drain<F>(stage: &'static str, queue: &Receiver<BlockFuture>, mut consume: F) -> Result<u64>
where
    F: FnMut(&TrimmedBlock) -> Result<()>,
{
    let mut blocks = 0;
    loop {
        let future = queue.recv().map_err(|_| Error::Disconnected(stage))?;
        let block = future.wait().ok_or(Error::StagePanicked("worker"))??;
        if block.is_sentinel() {
            log::debug!("{stage}: end of stream after {blocks} blocks");
            return Ok(blocks);
        }
        debug_assert_eq!(block.index, blocks, "{stage} received a block out of order");
        consume(&block)?;
        blocks += 1;
    }
}

fn spawn_stage<T, F>(name: &'static str, stage: F) -> Result<JoinHandle<Result<T>>>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(stage)
        .map_err(|e| Error::io("spawn", name, e))
}

fn join_stage<T>(stage: &'static str, handle: JoinHandle<Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(Error::StagePanicked(stage)))
}

/// The first error that is not just a consequence of another stage stopping.
fn pick_error(errors: impl IntoIterator<Item = Error>) -> Option<Error> {
    let mut secondary = None;
    for error in errors {
        if !error.is_secondary() {
            return Some(error);
        }
        secondary.get_or_insert(error);
    }
    secondary
}
