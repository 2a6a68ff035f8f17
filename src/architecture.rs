//! Architecture descriptions
//!
//! `LayerConfig` is the framework-neutral description of one layer primitive. The
//! network builders emit these into a `ModelBuilder`; an `ArchitectureConfig` is an
//! ordered list of them that can be written to and read back from JSON, and replayed
//! into a fresh `Sequential`.

use crate::error::NetworkError;
use crate::layers::batchnorm::{DEFAULT_EPSILON, DEFAULT_MOMENTUM};
use crate::model::{ModelBuilder, Sequential};
use crate::utils::{Activation, Initializer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a single layer in the neural network.
///
/// Serialized with a `layer_type` tag:
///
/// ```json
/// { "layer_type": "dense", "input_size": 180, "output_size": 100, "init": "glorot_uniform" }
/// { "layer_type": "activation", "activation": "tanh" }
/// { "layer_type": "batch_norm" }
/// { "layer_type": "dropout", "rate": 0.25 }
/// { "layer_type": "embedding", "input_dim": 20, "output_dim": 20, "input_length": 9 }
/// { "layer_type": "flatten" }
/// ```
///
/// Batch normalization and dropout carry no size; the container infers it from the
/// previous layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layer_type", rename_all = "snake_case")]
pub enum LayerConfig {
    Dense {
        input_size: usize,
        output_size: usize,
        #[serde(default)]
        init: Initializer,
    },
    Activation {
        activation: Activation,
    },
    BatchNorm {
        #[serde(default = "default_epsilon")]
        epsilon: f32,
        #[serde(default = "default_momentum")]
        momentum: f32,
    },
    Dropout {
        rate: f32,
    },
    #[serde(rename = "spatial_dropout1d")]
    SpatialDropout1d {
        rate: f32,
    },
    Embedding {
        input_dim: usize,
        output_dim: usize,
        input_length: usize,
        #[serde(default)]
        init: Initializer,
        /// Pre-trained table of shape (input_dim, output_dim); overrides `init`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weights: Option<Array2<f32>>,
    },
    Flatten,
}

fn default_epsilon() -> f32 {
    DEFAULT_EPSILON
}

fn default_momentum() -> f32 {
    DEFAULT_MOMENTUM
}

impl LayerConfig {
    pub fn dense(input_size: usize, output_size: usize, init: Initializer) -> Self {
        LayerConfig::Dense {
            input_size,
            output_size,
            init,
        }
    }

    pub fn activation(activation: Activation) -> Self {
        LayerConfig::Activation { activation }
    }

    /// Batch normalization with default epsilon and momentum.
    pub fn batch_norm() -> Self {
        LayerConfig::BatchNorm {
            epsilon: DEFAULT_EPSILON,
            momentum: DEFAULT_MOMENTUM,
        }
    }

    pub fn dropout(rate: f32) -> Self {
        LayerConfig::Dropout { rate }
    }

    pub fn spatial_dropout1d(rate: f32) -> Self {
        LayerConfig::SpatialDropout1d { rate }
    }

    pub fn flatten() -> Self {
        LayerConfig::Flatten
    }

    /// The `layer_type` tag used in JSON.
    pub fn layer_type(&self) -> &'static str {
        match self {
            LayerConfig::Dense { .. } => "dense",
            LayerConfig::Activation { .. } => "activation",
            LayerConfig::BatchNorm { .. } => "batch_norm",
            LayerConfig::Dropout { .. } => "dropout",
            LayerConfig::SpatialDropout1d { .. } => "spatial_dropout1d",
            LayerConfig::Embedding { .. } => "embedding",
            LayerConfig::Flatten => "flatten",
        }
    }
}

/// Configuration for the entire neural network architecture.
///
/// Layers are applied in the order they appear in the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureConfig {
    pub layers: Vec<LayerConfig>,
}

/// Loads an architecture configuration from a JSON file.
///
/// # Errors
///
/// If the file cannot be read, the JSON is invalid, or the layer list is empty.
/// Layer connections are checked when the architecture is built.
///
/// # Examples
///
/// ```no_run
/// use pepnet::architecture::{build_sequential, load_architecture};
///
/// let arch = load_architecture("config/architectures/embedding_9mer.json").unwrap();
/// let model = build_sequential(&arch, 42).unwrap();
/// assert_eq!(model.layers().len(), arch.layers.len());
/// ```
pub fn load_architecture(path: impl AsRef<Path>) -> Result<ArchitectureConfig, NetworkError> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    if config.layers.is_empty() {
        return Err(NetworkError::EmptyModel);
    }
    Ok(config)
}

/// Writes an architecture configuration as pretty-printed JSON.
pub fn save_architecture(
    config: &ArchitectureConfig,
    path: impl AsRef<Path>,
) -> Result<(), NetworkError> {
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Replays an architecture into a fresh `Sequential` seeded with `seed`.
///
/// Each layer goes through the container's validation, so a connection mismatch is
/// reported with the index of the offending layer.
pub fn build_sequential(config: &ArchitectureConfig, seed: u64) -> Result<Sequential, NetworkError> {
    let mut model = Sequential::with_seed(seed);
    for layer in &config.layers {
        model.add(layer.clone())?;
    }
    Ok(model)
}
