//! Bounded worker pool running one unit of work per block.

use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::ScanError;
use crate::config::ValidatedScanConfig;

/// A unit-of-work result labelled with the position of its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<T> {
    /// Position of the input this result came from.
    pub index: usize,
    /// The result.
    pub value: T,
}

/// Worker pool sized by [`ScanConfig::worker_threads`](crate::config::ScanConfig).
#[derive(Debug)]
pub struct BlockPool {
    pool: ThreadPool,
}

impl BlockPool {
    /// Build a pool with the configured number of threads.
    ///
    /// # Errors
    /// If the operating system refuses to spawn the threads.
    pub fn new(config: &ValidatedScanConfig) -> Result<Self, ScanError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|index| format!("scanbridge-scan-{index}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` for every index in `0..count` and wait for all of them.
    ///
    /// Results are tagged with their index; their order in the returned vector carries no
    /// meaning.
    pub fn run<T, F>(&self, count: usize, work: F) -> Vec<Tagged<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        self.pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|index| Tagged {
                    index,
                    value: work(index),
                })
                .collect()
        })
    }
}
