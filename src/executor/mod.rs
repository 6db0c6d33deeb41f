//! Executor module for batch expression evaluation.
//!
//! This module provides the vectorized evaluation contract, the batch
//! container it operates on, and the configuration of the evaluator.

pub mod vectorized;

use self::vectorized::DEFAULT_BATCH_SIZE;

/// Configuration for the vectorized evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Row capacity of batches built with `VectorizedRowBatch::for_config`;
    /// partitioned evaluation rejects larger batches.
    pub batch_size: usize,
    /// Worker threads for partitioned evaluation (0 = one per core).
    pub parallelism: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallelism: 0,
        }
    }
}

impl EvaluatorConfig {
    /// Creates a new evaluator configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the number of worker threads.
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = EvaluatorConfig::new()
            .with_batch_size(256)
            .with_parallelism(4);
        assert_eq!(config.batch_size, 256);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn test_config_default() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.parallelism, 0);
    }
}
