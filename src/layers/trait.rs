//! Layer trait definition for neural network layers
//!
//! This module defines the core Layer trait that every primitive held by a
//! `Sequential` implements. Layers own their parameters and run the inference
//! (or training-mode) forward pass over flat, row-major batches.

use crate::error::NetworkError;

/// Core trait for neural network layers.
///
/// All layer types (Dense, Embedding, BatchNorm, etc.) implement this trait to
/// provide a uniform interface for forward propagation.
///
/// Sizes are per sample and flattened: an embedding layer over 9 positions with
/// width 20 reports `input_size() == 9` and `output_size() == 180`.
///
/// # Example
///
/// ```ignore
/// let mut output = vec![0.0f32; batch_size * layer.output_size()];
/// layer.forward(&input, &mut output, batch_size);
/// ```
pub trait Layer {
    /// Forward propagation through the layer.
    ///
    /// # Arguments
    ///
    /// * `input` - Input data flattened as a 1D array (batch_size × input_size)
    /// * `output` - Output buffer to store results (batch_size × output_size)
    /// * `batch_size` - Number of samples in the batch
    ///
    /// # Panics
    ///
    /// Implementations may panic if input/output dimensions don't match expected sizes.
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize);

    /// Number of input features per sample.
    fn input_size(&self) -> usize;

    /// Number of output features per sample.
    fn output_size(&self) -> usize;

    /// Total count of trainable parameters.
    fn parameter_count(&self) -> usize;

    /// Short human readable name used in summaries and log lines.
    fn name(&self) -> &'static str;

    /// Switch between training and inference behavior.
    ///
    /// Only stochastic or batch-statistics layers care; the default is a no-op.
    fn set_training(&mut self, _training: bool) {}

    /// Validate raw model input before it reaches `forward`.
    ///
    /// Only consulted for the first layer of a model. Layers that accept arbitrary
    /// real values keep the default.
    fn check_input(&self, _input: &[f32]) -> Result<(), NetworkError> {
        Ok(())
    }
}

/// Shared length guard for `forward` implementations.
pub(crate) fn assert_buffer_sizes(
    input: &[f32],
    output: &[f32],
    input_size: usize,
    output_size: usize,
    batch_size: usize,
) {
    assert_eq!(
        input.len(),
        batch_size * input_size,
        "input len mismatch: expected {}, got {}",
        batch_size * input_size,
        input.len()
    );
    assert_eq!(
        output.len(),
        batch_size * output_size,
        "output len mismatch: expected {}, got {}",
        batch_size * output_size,
        output.len()
    );
}
