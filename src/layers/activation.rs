//! Activation layer: applies an `Activation` to the output of the previous layer.

use crate::layers::r#trait::{assert_buffer_sizes, Layer};
use crate::utils::Activation;

pub struct ActivationLayer {
    size: usize,
    activation: Activation,
}

impl ActivationLayer {
    pub fn new(size: usize, activation: Activation) -> Self {
        Self { size, activation }
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }
}

impl Layer for ActivationLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(input, output, self.size, self.size, batch_size);
        output.copy_from_slice(input);
        self.activation.apply_inplace(output, batch_size, self.size);
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn output_size(&self) -> usize {
        self.size
    }

    fn parameter_count(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "activation"
    }
}
