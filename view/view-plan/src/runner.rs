//! Data-parallel execution substrate.
//!
//! The planner issues its heavy loops (the per-point sweep, the per-bin
//! histogram projection and the per-point visibility commit) as index-space
//! batches through a [`ParallelRunner`]. Every batch writes only its own
//! output slot, and all reductions happen afterwards in index order, so any
//! runner produces bitwise identical plans.

use std::panic::{AssertUnwindSafe, catch_unwind};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{PlanError, PlanResult};

/// Executes index-space batches.
pub trait ParallelRunner: Send + Sync {
    /// Evaluates `f(i)` for every `i in 0..len` and returns the results in
    /// index order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::AcceleratorFailure`] if the batch could not run
    /// to completion.
    fn map<T, F>(&self, len: usize, f: F) -> PlanResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;

    /// Waits until the results of every previously issued batch are visible.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::AcceleratorFailure`] if outstanding work failed.
    fn barrier(&self) -> PlanResult<()> {
        Ok(())
    }

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Runs every batch as a plain loop on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialRunner;

impl ParallelRunner for SequentialRunner {
    fn map<T, F>(&self, len: usize, f: F) -> PlanResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        Ok((0..len).map(f).collect())
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}

/// Runs batches on a dedicated rayon thread pool.
///
/// Batches complete before [`ParallelRunner::map`] returns, so
/// [`ParallelRunner::barrier`] has nothing to wait for.
#[derive(Debug)]
pub struct RayonRunner {
    pool: ThreadPool,
}

impl RayonRunner {
    /// Creates a runner with `threads` workers, or one per core if `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::AcceleratorFailure`] if the pool cannot be built.
    pub fn new(threads: Option<usize>) -> PlanResult<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.unwrap_or(0))
            .thread_name(|i| format!("view-plan-{i}"))
            .build()
            .map_err(|e| PlanError::accelerator_failure(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "Created rayon runner");
        Ok(Self { pool })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl ParallelRunner for RayonRunner {
    fn map<T, F>(&self, len: usize, f: F) -> PlanResult<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.pool
                .install(|| (0..len).into_par_iter().map(&f).collect::<Vec<T>>())
        }));
        result.map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "worker panicked".to_string());
            PlanError::accelerator_failure(message)
        })
    }

    fn name(&self) -> &'static str {
        "rayon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_order() {
        let out = SequentialRunner.map(5, |i| i * i).unwrap();
        assert_eq!(out, vec![0, 1, 4, 9, 16]);
        assert!(SequentialRunner.barrier().is_ok());
    }

    #[test]
    fn test_rayon_order() {
        let runner = RayonRunner::new(Some(3)).unwrap();
        assert_eq!(runner.threads(), 3);
        let out = runner.map(1000, |i| i * 2).unwrap();
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * 2));
        assert!(runner.barrier().is_ok());
    }

    #[test]
    fn test_rayon_matches_sequential_floats() {
        let runner = RayonRunner::new(Some(4)).unwrap();
        let f = |i: usize| (i as f64).sqrt().sin();
        assert_eq!(runner.map(777, f).unwrap(), SequentialRunner.map(777, f).unwrap());
    }

    #[test]
    fn test_panic_becomes_accelerator_failure() {
        let runner = RayonRunner::new(Some(2)).unwrap();
        let err = runner
            .map(10, |i| {
                assert!(i != 7, "bad index {i}");
                i
            })
            .unwrap_err();
        match err {
            PlanError::AcceleratorFailure(message) => assert!(message.contains("bad index 7")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_batch() {
        let runner = RayonRunner::new(Some(1)).unwrap();
        assert!(runner.map(0, |i| i).unwrap().is_empty());
    }
}
