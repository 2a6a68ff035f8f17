//! Embedding lookup layer
//!
//! Maps each of `input_length` symbol indices to a dense row of the embedding table.
//! Indices arrive as `f32` values (the model input buffer is shared by every layer type)
//! and must be integral and inside the vocabulary.

use crate::error::NetworkError;
use crate::layers::r#trait::{assert_buffer_sizes, Layer};
use crate::utils::{Initializer, SimpleRng};
use ndarray::Array2;

pub struct EmbeddingLayer {
    input_dim: usize,
    output_dim: usize,
    input_length: usize,
    /// Row-major table (input_dim × output_dim)
    table: Vec<f32>,
}

impl EmbeddingLayer {
    /// Creates an embedding table drawn from `init`.
    ///
    /// # Example
    ///
    /// ```
    /// use pepnet::layers::{EmbeddingLayer, Layer};
    /// use pepnet::utils::{Initializer, SimpleRng};
    ///
    /// let mut rng = SimpleRng::new(42);
    /// let layer = EmbeddingLayer::new(20, 20, 9, Initializer::GlorotUniform, &mut rng);
    /// assert_eq!(layer.input_size(), 9);
    /// assert_eq!(layer.output_size(), 180);
    /// assert_eq!(layer.parameter_count(), 400);
    /// ```
    pub fn new(
        input_dim: usize,
        output_dim: usize,
        input_length: usize,
        init: Initializer,
        rng: &mut SimpleRng,
    ) -> Self {
        let mut table = vec![0.0f32; input_dim * output_dim];
        init.fill(&mut table, input_dim, output_dim, rng);

        Self {
            input_dim,
            output_dim,
            input_length,
            table,
        }
    }

    /// Creates an embedding layer initialized from a pre-trained table.
    ///
    /// The table shape defines `input_dim` and `output_dim`.
    pub fn from_weights(weights: &Array2<f32>, input_length: usize) -> Self {
        let (input_dim, output_dim) = weights.dim();
        // iter() walks the logical row-major order regardless of memory layout
        let table = weights.iter().copied().collect();

        Self {
            input_dim,
            output_dim,
            input_length,
            table,
        }
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Embedding vector for one symbol index.
    pub fn row(&self, index: usize) -> &[f32] {
        &self.table[index * self.output_dim..(index + 1) * self.output_dim]
    }
}

impl Layer for EmbeddingLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(
            input,
            output,
            self.input_length,
            self.input_length * self.output_dim,
            batch_size,
        );

        for (&index, out) in input.iter().zip(output.chunks_exact_mut(self.output_dim)) {
            out.copy_from_slice(self.row(index as usize));
        }
    }

    fn input_size(&self) -> usize {
        self.input_length
    }

    fn output_size(&self) -> usize {
        self.input_length * self.output_dim
    }

    fn parameter_count(&self) -> usize {
        self.table.len()
    }

    fn name(&self) -> &'static str {
        "embedding"
    }

    fn check_input(&self, input: &[f32]) -> Result<(), NetworkError> {
        for (position, &value) in input.iter().enumerate() {
            if value.fract() != 0.0 || value < 0.0 || value >= self.input_dim as f32 {
                return Err(NetworkError::InvalidInput(format!(
                    "value {} at position {} is not a symbol index in [0, {})",
                    value, position, self.input_dim
                )));
            }
        }
        Ok(())
    }
}
