//! Batch normalization layer implementation
//!
//! Normalizes each feature across the batch dimension, then applies a scale
//! (gamma) and shift (beta):
//!
//! 1. Compute batch statistics: mean μ and variance σ² across the batch
//! 2. Normalize: x_norm = (x - μ) / sqrt(σ² + ε)
//! 3. Scale and shift: y = γ * x_norm + β
//!
//! During training, batch statistics are used and running statistics are updated
//! via exponential moving average. During inference, the running statistics are used.
//!
//! # References
//!
//! Ioffe, S., & Szegedy, C. (2015). Batch Normalization: Accelerating Deep Network Training
//! by Reducing Internal Covariate Shift. ICML.

use crate::layers::r#trait::{assert_buffer_sizes, Layer};
use std::cell::RefCell;

/// Default numerical-stability constant.
pub const DEFAULT_EPSILON: f32 = 1e-3;
/// Default momentum for the running statistics.
pub const DEFAULT_MOMENTUM: f32 = 0.99;

/// Batch normalization layer with scale and shift parameters.
///
/// # Fields
///
/// * `size` - Number of input/output features (batch norm doesn't change dimensions)
/// * `epsilon` - Small constant for numerical stability (prevents division by zero)
/// * `momentum` - Momentum for updating running statistics
/// * `training` - Whether the layer is in training mode (true) or inference mode (false)
/// * `gamma` - Scale parameter (initialized to 1.0)
/// * `beta` - Shift parameter (initialized to 0.0)
/// * `running_mean` - Running average of means (initialized to 0.0)
/// * `running_var` - Running average of variances (initialized to 1.0)
pub struct BatchNormLayer {
    size: usize,
    epsilon: f32,
    momentum: f32,
    training: bool,

    gamma: Vec<f32>,
    beta: Vec<f32>,

    // Updated from `forward`, which only borrows the layer immutably
    running_mean: RefCell<Vec<f32>>,
    running_var: RefCell<Vec<f32>>,
}

impl BatchNormLayer {
    /// Creates a new batch normalization layer. The layer starts in training mode.
    ///
    /// # Panics
    ///
    /// If `epsilon` is not positive or `momentum` lies outside [0.0, 1.0].
    ///
    /// # Examples
    ///
    /// ```
    /// use pepnet::layers::{BatchNormLayer, Layer};
    /// let layer = BatchNormLayer::new(256, 1e-3, 0.99);
    /// assert_eq!(layer.input_size(), 256);
    /// assert_eq!(layer.parameter_count(), 512);
    /// assert!(layer.is_training());
    /// ```
    pub fn new(size: usize, epsilon: f32, momentum: f32) -> Self {
        assert!(epsilon > 0.0, "epsilon must be positive");
        assert!(
            (0.0..=1.0).contains(&momentum),
            "momentum must be in range [0.0, 1.0]"
        );

        Self {
            size,
            epsilon,
            momentum,
            training: true,
            gamma: vec![1.0f32; size],
            beta: vec![0.0f32; size],
            running_mean: RefCell::new(vec![0.0f32; size]),
            running_var: RefCell::new(vec![1.0f32; size]),
        }
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn gamma(&self) -> &[f32] {
        &self.gamma
    }

    pub fn beta(&self) -> &[f32] {
        &self.beta
    }

    /// Copy of the running mean statistics.
    pub fn running_mean(&self) -> Vec<f32> {
        self.running_mean.borrow().clone()
    }

    /// Copy of the running variance statistics.
    pub fn running_var(&self) -> Vec<f32> {
        self.running_var.borrow().clone()
    }

    fn normalize_with(&self, input: &[f32], output: &mut [f32], mean: &[f32], var: &[f32]) {
        let inv_std: Vec<f32> = var.iter().map(|&v| 1.0 / (v + self.epsilon).sqrt()).collect();
        for (x, y) in input
            .chunks_exact(self.size)
            .zip(output.chunks_exact_mut(self.size))
        {
            for j in 0..self.size {
                y[j] = self.gamma[j] * (x[j] - mean[j]) * inv_std[j] + self.beta[j];
            }
        }
    }
}

impl Layer for BatchNormLayer {
    fn forward(&self, input: &[f32], output: &mut [f32], batch_size: usize) {
        assert_buffer_sizes(input, output, self.size, self.size, batch_size);

        if !self.training {
            let running_mean = self.running_mean.borrow();
            let running_var = self.running_var.borrow();
            self.normalize_with(input, output, &running_mean, &running_var);
            return;
        }

        let mut batch_mean = vec![0.0f32; self.size];
        let mut batch_var = vec![0.0f32; self.size];

        for row in input.chunks_exact(self.size) {
            for (m, &x) in batch_mean.iter_mut().zip(row) {
                *m += x;
            }
        }
        for m in &mut batch_mean {
            *m /= batch_size as f32;
        }

        for row in input.chunks_exact(self.size) {
            for j in 0..self.size {
                let diff = row[j] - batch_mean[j];
                batch_var[j] += diff * diff;
            }
        }
        for v in &mut batch_var {
            *v /= batch_size as f32;
        }

        self.normalize_with(input, output, &batch_mean, &batch_var);

        // running = momentum * running + (1 - momentum) * batch
        let mut running_mean = self.running_mean.borrow_mut();
        let mut running_var = self.running_var.borrow_mut();
        for j in 0..self.size {
            running_mean[j] = self.momentum * running_mean[j] + (1.0 - self.momentum) * batch_mean[j];
            running_var[j] = self.momentum * running_var[j] + (1.0 - self.momentum) * batch_var[j];
        }
    }

    fn input_size(&self) -> usize {
        self.size
    }

    fn output_size(&self) -> usize {
        self.size
    }

    /// gamma + beta; running statistics are not trainable.
    fn parameter_count(&self) -> usize {
        2 * self.size
    }

    fn name(&self) -> &'static str {
        "batch_norm"
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}
