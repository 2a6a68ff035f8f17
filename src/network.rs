//! Fixed-length feed-forward network builders
//!
//! Three factories share one layer-stacking routine:
//!
//! - [`make_fixed_length_feedforward_network`]: any input size, optional embedding front end
//! - [`make_fixed_length_hotshot_network`]: peptides one-hot encoded into
//!   `peptide_length × n_symbols` binary features
//! - [`make_fixed_length_embedding_network`]: peptides encoded as `peptide_length`
//!   symbol indices, looked up in an embedding table
//!
//! The builders only use [`ModelBuilder`], so any framework implementing it can host
//! the network. Pass `Sequential::new()` to start from an empty in-crate model.

use crate::architecture::LayerConfig;
use crate::config::NetworkConfig;
use crate::error::NetworkError;
use crate::model::ModelBuilder;
use crate::utils::{Activation, Initializer};

/// Amino acids per peptide when no length is given.
pub const DEFAULT_PEPTIDE_LENGTH: usize = 9;
/// Size of the amino-acid alphabet.
pub const DEFAULT_N_SYMBOLS: usize = 20;
/// Embedding width used by the embedding factory when the config leaves it unset.
pub const DEFAULT_EMBEDDING_OUTPUT_DIM: usize = 20;

/// Hidden dense blocks followed by an output block.
///
/// `input_size` only seeds the dimension bookkeeping; no layer is emitted for it.
/// Each hidden width produces `dense → activation [→ batch_norm] [→ dropout]`; the
/// output block is `dense → output_activation` with no normalization or dropout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseStack<'a> {
    pub input_size: usize,
    pub layer_sizes: &'a [usize],
    pub activation: Activation,
    pub output_size: usize,
    pub output_activation: Activation,
    pub init: Initializer,
    pub batch_normalization: bool,
    pub dropout: f32,
}

impl<'a> DenseStack<'a> {
    /// Stack shaped by `config`, fed by `input_size` features.
    pub fn from_config(input_size: usize, config: &'a NetworkConfig) -> Self {
        Self {
            input_size,
            layer_sizes: &config.layer_sizes,
            activation: config.activation,
            output_size: config.output_size,
            output_activation: config.output_activation,
            init: config.init,
            batch_normalization: config.batch_normalization,
            dropout: config.dropout,
        }
    }

    /// Append the stack to `model` and hand the same model back for chaining.
    pub fn build<'m, M: ModelBuilder>(&self, model: &'m mut M) -> Result<&'m mut M, NetworkError> {
        let mut previous = self.input_size;

        for &width in self.layer_sizes {
            model
                .add(LayerConfig::dense(previous, width, self.init))?
                .add(LayerConfig::activation(self.activation))?;
            if self.batch_normalization {
                model.add(LayerConfig::batch_norm())?;
            }
            if self.dropout > 0.0 {
                model.add(LayerConfig::dropout(self.dropout))?;
            }
            previous = width;
        }

        model
            .add(LayerConfig::dense(previous, self.output_size, self.init))?
            .add(LayerConfig::activation(self.output_activation))?;
        Ok(model)
    }
}

/// Build and compile a feed-forward network over `input_size` inputs.
///
/// When `config.embedding_input_dim` is set (and non-zero) the inputs are treated as
/// symbol indices: an embedding lookup (optionally followed by spatial dropout) and a
/// flatten step turn them into `input_size × embedding_output_dim` features for the dense stack.
///
/// # Errors
///
/// - [`NetworkError::MissingEmbeddingOutputDim`] if only the vocabulary size is set
/// - [`NetworkError::EmbeddingShapeMismatch`] if the initial embedding weights do not
///   have shape `(embedding_input_dim, embedding_output_dim)`
/// - [`NetworkError::SizeOverflow`] if `input_size × embedding_output_dim` overflows
/// - anything the model rejects while layers are added or compiled
///
/// A dimension of `Some(0)` counts as unset. The configuration errors above are
/// raised before any layer is added.
///
/// # Example
///
/// ```
/// use pepnet::config::NetworkConfig;
/// use pepnet::model::Sequential;
/// use pepnet::network::make_fixed_length_feedforward_network;
///
/// let config = NetworkConfig::default().with_layer_sizes([16]);
/// let model = make_fixed_length_feedforward_network(40, &config, Sequential::new())?;
/// assert_eq!(model.input_size(), 40);
/// assert_eq!(model.output_size(), 1);
/// # Ok::<(), pepnet::NetworkError>(())
/// ```
pub fn make_fixed_length_feedforward_network<M: ModelBuilder>(
    input_size: usize,
    config: &NetworkConfig,
    mut model: M,
) -> Result<M::Model, NetworkError> {
    log::info!(
        "building feed-forward network: input_size={}, embedding={:?}x{:?}, layer_sizes={:?}, output_size={}",
        input_size,
        config.embedding_input_dim,
        config.embedding_output_dim,
        config.layer_sizes,
        config.output_size
    );

    let mut dense_input_size = input_size;

    // Zero counts as unset for both embedding dimensions
    if let Some(embedding_input_dim) = config.embedding_input_dim.filter(|&dim| dim > 0) {
        let embedding_output_dim = config
            .embedding_output_dim
            .filter(|&dim| dim > 0)
            .ok_or(NetworkError::MissingEmbeddingOutputDim)?;

        if let Some(weights) = &config.initial_embedding_weights {
            let (actual_rows, actual_cols) = weights.dim();
            if actual_rows != embedding_input_dim || actual_cols != embedding_output_dim {
                return Err(NetworkError::EmbeddingShapeMismatch {
                    expected_rows: embedding_input_dim,
                    expected_cols: embedding_output_dim,
                    actual_rows,
                    actual_cols,
                });
            }
        }
        dense_input_size =
            NetworkError::checked_size("flattened embedding size", input_size, embedding_output_dim)?;

        model.add(LayerConfig::Embedding {
            input_dim: embedding_input_dim,
            output_dim: embedding_output_dim,
            input_length: input_size,
            init: config.embedding_init,
            weights: config.initial_embedding_weights.clone(),
        })?;
        if config.embedding_dropout > 0.0 {
            model.add(LayerConfig::spatial_dropout1d(config.embedding_dropout))?;
        }
        model.add(LayerConfig::flatten())?;
    } else if config.initial_embedding_weights.is_some() {
        log::warn!("initial_embedding_weights ignored: embedding_input_dim is not set");
    }

    DenseStack::from_config(dense_input_size, config).build(&mut model)?;

    model.compile(config.loss, config.optimizer)
}

/// Network over one-hot ("hot-shot") encoded peptides.
///
/// Each of the `peptide_length` positions is a binary indicator vector over
/// `n_symbols` symbols, so the input has `peptide_length × n_symbols` features. The
/// embedding settings of `config` are ignored; everything else is forwarded.
pub fn make_fixed_length_hotshot_network<M: ModelBuilder>(
    peptide_length: usize,
    n_symbols: usize,
    config: &NetworkConfig,
    model: M,
) -> Result<M::Model, NetworkError> {
    let config = NetworkConfig {
        embedding_input_dim: None,
        embedding_output_dim: None,
        initial_embedding_weights: None,
        ..config.clone()
    };
    let input_size = NetworkError::checked_size("one-hot input size", peptide_length, n_symbols)?;
    make_fixed_length_feedforward_network(input_size, &config, model)
}

/// Network over peptides encoded as `peptide_length` symbol indices.
///
/// The vocabulary is `n_symbols`; the embedding width is
/// `config.embedding_output_dim`, or [`DEFAULT_EMBEDDING_OUTPUT_DIM`] when unset.
///
/// # Example
///
/// ```
/// use pepnet::config::NetworkConfig;
/// use pepnet::model::Sequential;
/// use pepnet::network::{make_fixed_length_embedding_network, DEFAULT_N_SYMBOLS, DEFAULT_PEPTIDE_LENGTH};
///
/// let model = make_fixed_length_embedding_network(
///     DEFAULT_PEPTIDE_LENGTH,
///     DEFAULT_N_SYMBOLS,
///     &NetworkConfig::default(),
///     Sequential::new(),
/// )?;
/// assert_eq!(model.input_size(), 9);
/// assert_eq!(model.layers()[0].layer_type(), "embedding");
/// # Ok::<(), pepnet::NetworkError>(())
/// ```
pub fn make_fixed_length_embedding_network<M: ModelBuilder>(
    peptide_length: usize,
    n_symbols: usize,
    config: &NetworkConfig,
    model: M,
) -> Result<M::Model, NetworkError> {
    let config = NetworkConfig {
        embedding_input_dim: Some(n_symbols),
        embedding_output_dim: Some(
            config
                .embedding_output_dim
                .unwrap_or(DEFAULT_EMBEDDING_OUTPUT_DIM),
        ),
        ..config.clone()
    };
    make_fixed_length_feedforward_network(peptide_length, &config, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{Loss, OptimizerKind};

    /// Records layers without instantiating anything.
    #[derive(Default)]
    struct Recorder {
        layers: Vec<LayerConfig>,
        compiled_with: Option<(Loss, OptimizerKind)>,
    }

    impl ModelBuilder for Recorder {
        type Model = Recorder;

        fn add(&mut self, layer: LayerConfig) -> Result<&mut Self, NetworkError> {
            self.layers.push(layer);
            Ok(self)
        }

        fn compile(mut self, loss: Loss, optimizer: OptimizerKind) -> Result<Recorder, NetworkError> {
            self.compiled_with = Some((loss, optimizer));
            Ok(self)
        }
    }

    fn tags(layers: &[LayerConfig]) -> Vec<&'static str> {
        layers.iter().map(LayerConfig::layer_type).collect()
    }

    #[test]
    fn test_dense_stack_without_hidden_layers() {
        let stack = DenseStack {
            input_size: 12,
            layer_sizes: &[],
            activation: Activation::Tanh,
            output_size: 3,
            output_activation: Activation::Softmax,
            init: Initializer::GlorotUniform,
            batch_normalization: true,
            dropout: 0.5,
        };
        let mut recorder = Recorder::default();
        stack.build(&mut recorder).unwrap();

        assert_eq!(
            recorder.layers,
            vec![
                LayerConfig::dense(12, 3, Initializer::GlorotUniform),
                LayerConfig::activation(Activation::Softmax),
            ]
        );
    }

    #[test]
    fn test_dense_stack_block_order() {
        let stack = DenseStack {
            input_size: 10,
            layer_sizes: &[8, 4],
            activation: Activation::Relu,
            output_size: 1,
            output_activation: Activation::Sigmoid,
            init: Initializer::HeUniform,
            batch_normalization: true,
            dropout: 0.2,
        };
        let mut recorder = Recorder::default();
        stack.build(&mut recorder).unwrap();

        assert_eq!(
            recorder.layers,
            vec![
                LayerConfig::dense(10, 8, Initializer::HeUniform),
                LayerConfig::activation(Activation::Relu),
                LayerConfig::batch_norm(),
                LayerConfig::dropout(0.2),
                LayerConfig::dense(8, 4, Initializer::HeUniform),
                LayerConfig::activation(Activation::Relu),
                LayerConfig::batch_norm(),
                LayerConfig::dropout(0.2),
                LayerConfig::dense(4, 1, Initializer::HeUniform),
                LayerConfig::activation(Activation::Sigmoid),
            ]
        );
    }

    #[test]
    fn test_factory_compiles_with_configured_loss_and_optimizer() {
        let config = NetworkConfig {
            loss: Loss::BinaryCrossentropy,
            optimizer: OptimizerKind::Adam,
            ..NetworkConfig::default()
        };
        let recorder =
            make_fixed_length_feedforward_network(5, &config, Recorder::default()).unwrap();
        assert_eq!(
            recorder.compiled_with,
            Some((Loss::BinaryCrossentropy, OptimizerKind::Adam))
        );
    }

    /// Fails the test if the builder touches it.
    struct Untouchable;

    impl ModelBuilder for Untouchable {
        type Model = ();

        fn add(&mut self, layer: LayerConfig) -> Result<&mut Self, NetworkError> {
            panic!("no layer should be added, got {:?}", layer);
        }

        fn compile(self, _loss: Loss, _optimizer: OptimizerKind) -> Result<(), NetworkError> {
            panic!("compile should not be reached");
        }
    }

    #[test]
    fn test_configuration_errors_raised_before_any_layer() {
        let missing_pair = NetworkConfig {
            embedding_input_dim: Some(20),
            ..NetworkConfig::default()
        };
        let result = make_fixed_length_feedforward_network(9, &missing_pair, Untouchable);
        assert!(matches!(result, Err(NetworkError::MissingEmbeddingOutputDim)));

        let wrong_shape = NetworkConfig::default()
            .with_embedding(20, 10)
            .with_initial_embedding_weights(ndarray::Array2::zeros((20, 15)));
        let result = make_fixed_length_feedforward_network(9, &wrong_shape, Untouchable);
        assert!(matches!(
            result,
            Err(NetworkError::EmbeddingShapeMismatch { .. })
        ));

        let zero_width = NetworkConfig::default().with_embedding(20, 0);
        let result = make_fixed_length_feedforward_network(9, &zero_width, Untouchable);
        assert!(matches!(result, Err(NetworkError::MissingEmbeddingOutputDim)));

        let result =
            make_fixed_length_embedding_network(usize::MAX / 2, 20, &NetworkConfig::default(), Untouchable);
        assert!(matches!(result, Err(NetworkError::SizeOverflow { .. })));
    }

    #[test]
    fn test_embedding_front_end_order() {
        let config = NetworkConfig::default()
            .with_embedding(20, 4)
            .with_embedding_dropout(0.1)
            .with_layer_sizes([6])
            .with_batch_normalization(false);
        let recorder =
            make_fixed_length_feedforward_network(9, &config, Recorder::default()).unwrap();

        assert_eq!(
            tags(&recorder.layers),
            vec![
                "embedding",
                "spatial_dropout1d",
                "flatten",
                "dense",
                "activation",
                "dense",
                "activation"
            ]
        );
        assert_eq!(
            recorder.layers[3],
            LayerConfig::dense(36, 6, Initializer::GlorotUniform)
        );
    }

    #[test]
    fn test_hotshot_clears_embedding_settings() {
        let config = NetworkConfig::default().with_embedding(20, 8);
        let recorder =
            make_fixed_length_hotshot_network(9, 20, &config, Recorder::default()).unwrap();
        assert_eq!(recorder.layers[0], LayerConfig::dense(180, 100, Initializer::GlorotUniform));
        assert!(!tags(&recorder.layers).contains(&"embedding"));
    }

    #[test]
    fn test_embedding_factory_respects_configured_width() {
        let config = NetworkConfig {
            embedding_output_dim: Some(32),
            ..NetworkConfig::default()
        };
        let recorder =
            make_fixed_length_embedding_network(9, 21, &config, Recorder::default()).unwrap();
        match &recorder.layers[0] {
            LayerConfig::Embedding {
                input_dim,
                output_dim,
                input_length,
                ..
            } => assert_eq!((*input_dim, *output_dim, *input_length), (21, 32, 9)),
            other => panic!("expected embedding, got {:?}", other),
        }
        assert_eq!(recorder.layers[2], LayerConfig::dense(288, 100, Initializer::GlorotUniform));
    }
}
