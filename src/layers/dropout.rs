//! Dropout layers for regularization
//!
//! `DropoutLayer` randomly zeroes individual units during training.
//! `SpatialDropout1dLayer` zeroes whole channels of a `(length × width)` sequence,
//! which is how embedded peptide positions are regularized. Both pass inputs
//! through unchanged in inference mode.

use crate::layers::r#trait::{assert_buffer_sizes, Layer};
use crate::utils::rng::SimpleRng;
use std::cell::RefCell;

/// Inverted dropout: kept units are scaled by 1/(1-drop_rate) so the expected
/// activation is unchanged and inference needs no rescaling.
///
/// # Example
///
/// ```
/// use pepnet::layers::{DropoutLayer, Layer};
/// use pepnet::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let layer = DropoutLayer::new(512, 0.5, &mut rng);
/// assert_eq!(layer.output_size(), 512);
/// assert_eq!(layer.parameter_count(), 0);
/// ```
pub struct DropoutLayer {
    size: usize,
    drop_rate: f32,
    training: bool,
    rng: RefCell<SimpleRng>,
}

impl DropoutLayer {
    /// Creates a new dropout layer in training mode.
    ///
    /// # Panics
    ///
    /// If `drop_rate` is outside [0.0, 1.0).
    pub fn new(size: usize, drop_rate: f32, rng: &mut SimpleRng) -> Self {
        assert!(
            (0.0..1.0).contains(&drop_rate),
            "drop_rate must be in range [0.0, 1.0)"
        );

        Self {
            size,
            drop_rate,
            training: true,
            rng: RefCell::new(rng.fork()),
        }
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn drop_rate(&self) -> f32 {
        self.drop_rate
    }
}

impl Layer for DropoutLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(input, output, self.size, self.size, batch_size);

        if !self.training {
            output.copy_from_slice(input);
            return;
        }

        let scale = 1.0 / (1.0 - self.drop_rate);
        let mut rng = self.rng.borrow_mut();
        for (y, &x) in output.iter_mut().zip(input) {
            *y = if rng.next_f32() < self.drop_rate {
                0.0
            } else {
                x * scale
            };
        }
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
        "dropout"
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

/// Channel-wise dropout over a row-major `(length × width)` sequence.
///
/// One keep/drop decision is drawn per sample and channel and applied to that
/// channel at every position.
pub struct SpatialDropout1dLayer {
    length: usize,
    width: usize,
    drop_rate: f32,
    training: bool,
    rng: RefCell<SimpleRng>,
}

impl SpatialDropout1dLayer {
    /// # Panics
    ///
    /// If `drop_rate` is outside [0.0, 1.0).
    pub fn new(length: usize, width: usize, drop_rate: f32, rng: &mut SimpleRng) -> Self {
        assert!(
            (0.0..1.0).contains(&drop_rate),
            "drop_rate must be in range [0.0, 1.0)"
        );

        Self {
            length,
            width,
            drop_rate,
            training: true,
            rng: RefCell::new(rng.fork()),
        }
    }

    pub fn drop_rate(&self) -> f32 {
        self.drop_rate
    }
}

impl Layer for SpatialDropout1dLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        let size = self.length * self.width;
        assert_buffer_sizes(input, output, size, size, batch_size);

        if !self.training {
            output.copy_from_slice(input);
            return;
        }

        let scale = 1.0 / (1.0 - self.drop_rate);
        let mut rng = self.rng.borrow_mut();
        let mut channel_scale = vec![0.0f32; self.width];
        for (x, y) in input.chunks_exact(size).zip(output.chunks_exact_mut(size)) {
            for s in channel_scale.iter_mut() {
                *s = if rng.next_f32() < self.drop_rate { 0.0 } else { scale };
            }
            for (xp, yp) in x.chunks_exact(self.width).zip(y.chunks_exact_mut(self.width)) {
                for ((yc, &xc), &s) in yp.iter_mut().zip(xp).zip(&channel_scale) {
                    *yc = xc * s;
                }
            }
        }
    }

    fn input_size(&self) -> usize {
        self.length * self.width
    }

    fn output_size(&self) -> usize {
        self.length * self.width
    }

    fn parameter_count(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "spatial_dropout1d"
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
