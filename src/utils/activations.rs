//! Activation functions for neural networks
//!
//! This module provides the `Activation` identifier used in network configs and the
//! in-place kernels the activation layer runs:
//! - Element-wise functions (tanh, sigmoid, relu, ...)
//! - Softmax (row-wise, for output layers)

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Activation function applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Activation {
    Linear,
    Relu,
    Elu,
    Tanh,
    Sigmoid,
    HardSigmoid,
    Softplus,
    Softsign,
    Softmax,
}

const ACTIVATION_NAMES: [&str; 9] = [
    "linear",
    "relu",
    "elu",
    "tanh",
    "sigmoid",
    "hard_sigmoid",
    "softplus",
    "softsign",
    "softmax",
];

impl Activation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Elu => "elu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::HardSigmoid => "hard_sigmoid",
            Activation::Softplus => "softplus",
            Activation::Softsign => "softsign",
            Activation::Softmax => "softmax",
        }
    }

    /// Apply the activation in place to a row-major `rows × cols` buffer.
    ///
    /// Element-wise activations ignore the row structure; softmax normalizes each row.
    pub fn apply_inplace(&self, data: &mut [f32], rows: usize, cols: usize) {
        match self {
            Activation::Linear => {}
            Activation::Relu => relu_inplace(data),
            Activation::Softmax => softmax_rows(data, rows, cols),
            _ => {
                for value in data.iter_mut() {
                    *value = self.apply_scalar(*value);
                }
            }
        }
    }

    fn apply_scalar(&self, x: f32) -> f32 {
        match self {
            Activation::Linear | Activation::Softmax => x,
            Activation::Relu => x.max(0.0),
            Activation::Elu => {
                if x > 0.0 {
                    x
                } else {
                    x.exp() - 1.0
                }
            }
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => sigmoid(x),
            Activation::HardSigmoid => (0.2 * x + 0.5).clamp(0.0, 1.0),
            // ln(1 + e^x) computed without overflow for large x
            Activation::Softplus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
            Activation::Softsign => x / (1.0 + x.abs()),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Activation {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(Activation::Linear),
            "relu" => Ok(Activation::Relu),
            "elu" => Ok(Activation::Elu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            "hard_sigmoid" => Ok(Activation::HardSigmoid),
            "softplus" => Ok(Activation::Softplus),
            "softsign" => Ok(Activation::Softsign),
            "softmax" => Ok(Activation::Softmax),
            _ => Err(NetworkError::unknown_name(
                "activation function",
                s,
                &ACTIVATION_NAMES,
            )),
        }
    }
}

// Serde goes through `FromStr` so config files get the same aliases and error text.
impl TryFrom<String> for Activation {
    type Error = NetworkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Activation> for String {
    fn from(value: Activation) -> String {
        value.as_str().to_string()
    }
}

/// Sigmoid: 1 / (1 + exp(-x))
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// ReLU activation function applied in-place.
pub fn relu_inplace(data: &mut [f32]) {
    for value in data.iter_mut() {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
}

/// Softmax activation function applied row-wise.
///
/// Converts logits to probabilities for each row. Uses the max-subtraction
/// trick for numerical stability to avoid overflow with large values.
///
/// # Arguments
/// * `outputs` - Flat array containing row-major matrix data
/// * `rows` - Number of rows in the matrix
/// * `cols` - Number of columns in the matrix
pub fn softmax_rows(outputs: &mut [f32], rows: usize, cols: usize) {
    if cols == 0 {
        return;
    }
    assert_eq!(outputs.len(), rows * cols, "outputs length mismatch in softmax_rows");

    for row in outputs.chunks_exact_mut(cols).take(rows) {
        let max_value = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mut sum = 0.0f32;
        for value in row.iter_mut() {
            *value = (*value - max_value).exp();
            sum += *value;
        }

        let inv_sum = 1.0f32 / sum;
        for value in row.iter_mut() {
            *value *= inv_sum;
        }
    }
}
