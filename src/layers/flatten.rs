//! Flatten layer: collapses a `(length × width)` sequence into one feature vector.
//!
//! Buffers are already row-major and flat, so the data is copied as is; the layer
//! exists so the container's shape bookkeeping switches from sequence to flat.

use crate::layers::r#trait::{assert_buffer_sizes, Layer};

pub struct FlattenLayer {
    size: usize,
}

impl FlattenLayer {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Layer for FlattenLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(input, output, self.size, self.size, batch_size);
        output.copy_from_slice(input);
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
        "flatten"
    }
}
