//! Rayon thread pool configuration for scoring workloads.
//!
//! Scoring is a pure function of (team, boss, options), so spreading a boss's team list
//! across workers never changes the result: `par_iter().map().collect()` preserves order.
//! The default is sequential.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::warn;

/// Configures how many worker threads score teams.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. 0 runs on the calling thread.
    pub workers: usize,
}

impl WorkerPool {
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Use exactly `n` worker threads.
    pub fn with_workers(n: usize) -> Self {
        Self { workers: n }
    }

    /// Use every core Rayon sees.
    pub fn all_cores() -> Self {
        Self {
            workers: rayon::current_num_threads().max(1),
        }
    }

    pub fn is_parallel(&self) -> bool {
        self.workers > 0
    }

    /// Map `f` over `items`, keeping input order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        if !self.is_parallel() {
            return items.iter().map(f).collect();
        }
        match ThreadPoolBuilder::new().num_threads(self.workers).build() {
            Ok(pool) => pool.install(|| items.par_iter().map(&f).collect()),
            Err(err) => {
                warn!(workers = self.workers, error = %err, "thread pool unavailable, scoring sequentially");
                items.iter().map(f).collect()
            }
        }
    }
}
