use crate::error::ConfigError;
use std::time::Duration;

/// Units per block unless configured otherwise.
pub const DEFAULT_BLOCK_SIZE: usize = 1000;

/// Largest accepted block size. Up to `5 * threads` blocks per consumer can be in flight.
pub const MAX_BLOCK_SIZE: usize = 1_000_000;

/// Largest accepted worker count.
pub const MAX_THREADS: usize = 4096;

/// How long shutdown waits for in-flight blocks before giving up.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Sizing of the concurrent pipeline. Queue capacities scale with `threads`.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub threads: usize,
    pub block_size: usize,
    pub shutdown_timeout: Duration,
}

impl PipelineConfig {
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            ..Self::default()
        }
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        if self.threads > MAX_THREADS {
            return Err(ConfigError::TooManyThreads {
                requested: self.threads,
                max: MAX_THREADS,
            });
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.block_size > MAX_BLOCK_SIZE {
            return Err(ConfigError::BlockSizeTooLarge {
                requested: self.block_size,
                max: MAX_BLOCK_SIZE,
            });
        }
        Ok(())
    }

    /// Parsed blocks waiting for submission.
    pub fn block_queue_capacity(&self) -> usize {
        self.threads
    }

    /// Blocks submitted to the pool but not yet picked up by a worker.
    pub fn task_queue_capacity(&self) -> usize {
        self.threads.saturating_mul(2)
    }

    /// Pending results queued for each consumer.
    pub fn consumer_queue_capacity(&self) -> usize {
        self.threads.saturating_mul(5)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threads: resolve_threads(None),
            block_size: DEFAULT_BLOCK_SIZE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

/// `None` or `Some(0)` means one thread per available CPU.
pub fn resolve_threads(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => num_cpus::get().clamp(1, MAX_THREADS),
    }
}
