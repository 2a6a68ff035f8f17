//! Dense (fully connected) layer implementation
//!
//! This module provides a DenseLayer (also known as Linear or Fully Connected layer)
//! that performs the transformation: output = input × weights + biases

use crate::layers::r#trait::{assert_buffer_sizes, Layer};
use crate::utils::{Initializer, SimpleRng};

/// Dense (fully connected) layer with weights and biases.
///
/// Performs the linear transformation: y = xW + b
/// where x is the input (batch_size × input_size),
/// W is the weight matrix (input_size × output_size),
/// and b is the bias vector (output_size).
///
/// # Example
///
/// ```
/// use pepnet::layers::{DenseLayer, Layer};
/// use pepnet::utils::{Initializer, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DenseLayer::new(180, 100, Initializer::GlorotUniform, &mut rng);
/// assert_eq!(layer.input_size(), 180);
/// assert_eq!(layer.output_size(), 100);
/// ```
pub struct DenseLayer {
    input_size: usize,
    output_size: usize,
    weights: Vec<f32>,
    biases: Vec<f32>,
}

impl DenseLayer {
    /// Create a new DenseLayer whose weights are drawn from `init`.
    ///
    /// Biases are initialized to zero.
    pub fn new(
        input_size: usize,
        output_size: usize,
        init: Initializer,
        rng: &mut SimpleRng,
    ) -> Self {
        let mut weights = vec![0.0f32; input_size * output_size];
        init.fill(&mut weights, input_size, output_size, rng);

        Self {
            input_size,
            output_size,
            weights,
            biases: vec![0.0f32; output_size],
        }
    }

    /// Weight matrix in row-major order (input_size × output_size).
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn biases(&self) -> &[f32] {
        &self.biases
    }
}

impl Layer for DenseLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(input, output, self.input_size, self.output_size, batch_size);

        for (x, y) in input
            .chunks_exact(self.input_size)
            .zip(output.chunks_exact_mut(self.output_size))
        {
            y.copy_from_slice(&self.biases);
            for (&xi, w_row) in x.iter().zip(self.weights.chunks_exact(self.output_size)) {
                if xi == 0.0 {
                    continue;
                }
                for (yj, &wij) in y.iter_mut().zip(w_row) {
                    *yj += xi * wij;
                }
            }
        }
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn output_size(&self) -> usize {
        self.output_size
    }

    /// input_size × output_size weights plus output_size biases.
    fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn name(&self) -> &'static str {
        "dense"
    }
}
