//! Shared batch execution configuration types.

use serde::{Deserialize, Serialize};

/// Selects how batch recognition distributes work across pages.
///
/// The page-indexed result contract holds identically under both strategies:
/// results are keyed by page number at submission time, so completion order
/// never affects document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Process pages one at a time, in ascending page order.
    ///
    /// Required for OCR backends that are constrained to a single logical
    /// thread; the engine also forces this strategy whenever the recognizer
    /// reports that it does not support concurrent invocation.
    Sequential,
    /// Process pages on a bounded worker pool.
    Concurrent,
}

/// Centralized configuration for batch recognition parallelism.
///
/// This consolidates the worker-pool knobs in one place so callers tune
/// parallelism through configuration rather than through accidental
/// code-path differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// The execution strategy for batch recognition.
    /// Default: Concurrent.
    #[serde(default = "ParallelPolicy::default_strategy")]
    pub strategy: ExecutionStrategy,

    /// Maximum number of workers recognizing pages at once.
    /// Only consulted by the concurrent strategy. Default: 4.
    #[serde(default = "ParallelPolicy::default_max_workers")]
    pub max_workers: usize,
}

impl ParallelPolicy {
    /// Creates a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a policy that forces strictly sequential, in-page-order
    /// execution.
    pub fn sequential() -> Self {
        Self {
            strategy: ExecutionStrategy::Sequential,
            max_workers: 1,
        }
    }

    /// Sets the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the maximum number of workers.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Builds a bounded local rayon pool for the concurrent strategy.
    ///
    /// A local pool (rather than the global one) keeps the worker bound
    /// scoped to one batch run.
    pub(crate) fn build_pool(&self) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
    }

    fn default_strategy() -> ExecutionStrategy {
        ExecutionStrategy::Concurrent
    }

    fn default_max_workers() -> usize {
        4
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            strategy: Self::default_strategy(),
            max_workers: Self::default_max_workers(),
        }
    }
}
