//! Vectorized expression evaluator.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, debug_span};

use crate::error::{Result, VexError};
use crate::executor::EvaluatorConfig;
use crate::types::DataType;

use super::batch::VectorizedRowBatch;
use super::expression::VectorExpression;

/// Drives an expression tree over a stream of batches.
///
/// Owns the root of one tree instance. The tree's scratch state is not
/// shared, so parallel work uses one evaluator per worker; see
/// [`VectorizedEvaluator::evaluate_partitioned`].
#[derive(Debug)]
pub struct VectorizedEvaluator {
    root: Box<dyn VectorExpression>,
}

impl VectorizedEvaluator {
    #[must_use]
    pub fn new(root: Box<dyn VectorExpression>) -> Self {
        VectorizedEvaluator { root }
    }

    /// Column holding the tree's result, or None for a filter tree.
    #[must_use]
    pub fn output_column(&self) -> Option<usize> {
        self.root.output_column()
    }

    #[must_use]
    pub fn output_type(&self) -> DataType {
        self.root.output_type()
    }

    /// Evaluates the whole tree against one batch in place.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by any node; the batch contents
    /// are then unspecified.
    pub fn evaluate(&mut self, batch: &mut VectorizedRowBatch) -> Result<()> {
        let span = debug_span!(
            "vectorized_batch",
            expression = self.root.name(),
            rows = batch.size,
            selected = batch.selected_in_use
        );
        let _enter = span.enter();
        self.root.evaluate(batch)
    }

    /// Evaluates many batches in parallel.
    ///
    /// Builds a rayon pool of `config.parallelism` threads for this call.
    /// `factory` runs once per rayon work split, which is at least once per
    /// participating thread and may be more; each tree is reused for the
    /// batches of its split and never shared across threads. Every batch
    /// must fit `config.batch_size`.
    ///
    /// # Errors
    ///
    /// Returns `BatchTooLarge` for a batch above `config.batch_size`, or an
    /// error if the pool cannot be built, a tree cannot be built, or any
    /// batch fails to evaluate.
    pub fn evaluate_partitioned<F>(
        factory: F,
        batches: &mut [VectorizedRowBatch],
        config: &EvaluatorConfig,
    ) -> Result<()>
    where
        F: Fn() -> Result<Box<dyn VectorExpression>> + Sync + Send,
    {
        if let Some(index) = batches
            .iter()
            .position(|b| b.capacity() > config.batch_size)
        {
            return Err(VexError::BatchTooLarge {
                index,
                capacity: batches[index].capacity(),
                batch_size: config.batch_size,
            });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .build()?;
        debug!(
            "Evaluating {} batches on {} threads",
            batches.len(),
            pool.current_num_threads()
        );
        pool.install(|| {
            batches.par_iter_mut().try_for_each_init(
                || factory().map(VectorizedEvaluator::new),
                |evaluator, batch| match evaluator {
                    Ok(evaluator) => evaluator.evaluate(batch),
                    Err(e) => Err(e.clone()),
                },
            )
        })
    }
}
