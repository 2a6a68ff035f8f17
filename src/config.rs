//! Network hyperparameters
//!
//! `NetworkConfig` holds every knob of the feed-forward factories except the input
//! size, which each factory derives from its own arguments. It can be built in code
//! (starting from `Default`) or read from JSON, where missing fields take their
//! defaults.

use crate::compile::{Loss, OptimizerKind};
use crate::error::NetworkError;
use crate::utils::{Activation, Initializer};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hidden layer widths used when none are given.
pub const DEFAULT_LAYER_SIZES: [usize; 1] = [100];

/// Configuration for a fixed-length feed-forward network.
///
/// # Example
///
/// ```json
/// {
///   "layer_sizes": [64, 32],
///   "activation": "relu",
///   "dropout": 0.25,
///   "embedding_output_dim": 32,
///   "loss": "binary_crossentropy",
///   "optimizer": "adam"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Width of the output layer
    pub output_size: usize,

    /// Embedding vocabulary size; enables the embedding front end when set
    pub embedding_input_dim: Option<usize>,
    /// Embedding vector width; required together with `embedding_input_dim`
    pub embedding_output_dim: Option<usize>,

    /// Hidden layer widths, in order; may be empty
    pub layer_sizes: Vec<usize>,
    /// Activation after every hidden dense layer
    pub activation: Activation,
    /// Weight initializer for every dense layer
    pub init: Initializer,
    /// Activation after the output dense layer
    pub output_activation: Activation,

    /// Dropout rate after every hidden block; 0 disables
    pub dropout: f32,
    /// Spatial dropout rate over the embedded sequence; 0 disables
    pub embedding_dropout: f32,
    /// Batch normalization after every hidden activation
    pub batch_normalization: bool,

    /// Pre-trained embedding table of shape (embedding_input_dim, embedding_output_dim)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_embedding_weights: Option<Array2<f32>>,
    /// Initializer for the embedding table when no weights are given
    #[serde(alias = "embedding_init_method")]
    pub embedding_init: Initializer,

    pub optimizer: OptimizerKind,
    pub loss: Loss,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            output_size: 1,
            embedding_input_dim: None,
            embedding_output_dim: None,
            layer_sizes: DEFAULT_LAYER_SIZES.to_vec(),
            activation: Activation::Tanh,
            init: Initializer::GlorotUniform,
            output_activation: Activation::Sigmoid,
            dropout: 0.0,
            embedding_dropout: 0.0,
            batch_normalization: true,
            initial_embedding_weights: None,
            embedding_init: Initializer::GlorotUniform,
            optimizer: OptimizerKind::Rmsprop,
            loss: Loss::Mse,
        }
    }
}

impl NetworkConfig {
    pub fn with_layer_sizes(mut self, layer_sizes: impl Into<Vec<usize>>) -> Self {
        self.layer_sizes = layer_sizes.into();
        self
    }

    pub fn with_embedding(mut self, input_dim: usize, output_dim: usize) -> Self {
        self.embedding_input_dim = Some(input_dim);
        self.embedding_output_dim = Some(output_dim);
        self
    }

    pub fn with_initial_embedding_weights(mut self, weights: Array2<f32>) -> Self {
        self.initial_embedding_weights = Some(weights);
        self
    }

    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn with_embedding_dropout(mut self, embedding_dropout: f32) -> Self {
        self.embedding_dropout = embedding_dropout;
        self
    }

    pub fn with_batch_normalization(mut self, enabled: bool) -> Self {
        self.batch_normalization = enabled;
        self
    }

    pub fn with_output(mut self, output_size: usize, output_activation: Activation) -> Self {
        self.output_size = output_size;
        self.output_activation = output_activation;
        self
    }
}

/// Loads a network configuration from a JSON file.
///
/// Fields absent from the file keep their defaults. Value ranges are not checked
/// here; the model container rejects invalid layers when the network is built.
///
/// # Examples
///
/// ```no_run
/// use pepnet::config::load_network_config;
///
/// let cfg = load_network_config("config/embedding_9mer.json").unwrap();
/// assert!(cfg.embedding_output_dim.is_some());
/// ```
pub fn load_network_config(path: impl AsRef<Path>) -> Result<NetworkConfig, NetworkError> {
    let contents = fs::read_to_string(path)?;
    let config: NetworkConfig = serde_json::from_str(&contents)?;
    Ok(config)
}
