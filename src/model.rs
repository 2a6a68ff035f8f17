//! Model containers
//!
//! `ModelBuilder` is the seam between the network builders and a modeling framework:
//! append a layer, then compile with a loss and an optimizer. `Sequential` is the
//! in-crate implementation; it validates every layer against the running shape,
//! instantiates the primitive from `crate::layers`, and compiles into a
//! `CompiledModel` that can run forward passes.

use crate::architecture::{ArchitectureConfig, LayerConfig};
use crate::compile::{Loss, OptimizerKind};
use crate::error::NetworkError;
use crate::layers::{
    ActivationLayer, BatchNormLayer, DenseLayer, DropoutLayer, EmbeddingLayer, FlattenLayer,
    Layer, SpatialDropout1dLayer,
};
use crate::utils::SimpleRng;
use std::fmt::Write;

/// Minimal interface a modeling framework exposes to the network builders.
pub trait ModelBuilder {
    /// The compiled, ready-to-train model.
    type Model;

    /// Append one layer. Errors are the framework's own validation.
    fn add(&mut self, layer: LayerConfig) -> Result<&mut Self, NetworkError>;

    /// Bind a loss and an optimizer and finish construction.
    fn compile(self, loss: Loss, optimizer: OptimizerKind) -> Result<Self::Model, NetworkError>
    where
        Self: Sized;
}

/// Per-sample shape flowing between layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat(usize),
    /// Output of an embedding lookup: `length` positions of `width` channels
    Sequence { length: usize, width: usize },
}

impl Shape {
    /// Number of values per sample.
    ///
    /// `Sequential` only builds sequence shapes whose size fits in `usize`.
    pub fn size(&self) -> usize {
        match *self {
            Shape::Flat(n) => n,
            Shape::Sequence { length, width } => length * width,
        }
    }
}

const DEFAULT_SEED: u64 = 42;

/// Linear stack of layers under construction.
///
/// # Example
///
/// ```
/// use pepnet::architecture::LayerConfig;
/// use pepnet::compile::{Loss, OptimizerKind};
/// use pepnet::model::{ModelBuilder, Sequential};
/// use pepnet::utils::{Activation, Initializer};
///
/// let mut model = Sequential::new();
/// model
///     .add(LayerConfig::dense(4, 2, Initializer::GlorotUniform))?
///     .add(LayerConfig::activation(Activation::Sigmoid))?;
/// let compiled = model.compile(Loss::Mse, OptimizerKind::Rmsprop)?;
/// assert_eq!(compiled.output_size(), 2);
/// # Ok::<(), pepnet::NetworkError>(())
/// ```
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
    configs: Vec<LayerConfig>,
    input_shape: Option<Shape>,
    shape: Option<Shape>,
    rng: SimpleRng,
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequential {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Empty container whose weight initialization and dropout masks derive from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            layers: Vec::new(),
            configs: Vec::new(),
            input_shape: None,
            shape: None,
            rng: SimpleRng::new(seed),
        }
    }

    /// Layers added so far, in order.
    pub fn layers(&self) -> &[LayerConfig] {
        &self.configs
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Shape produced by the last layer, `None` while empty.
    pub fn output_shape(&self) -> Option<Shape> {
        self.shape
    }

    /// Shape of the model input, `None` while empty.
    pub fn input_shape(&self) -> Option<Shape> {
        self.input_shape
    }

    /// Check `config` against the current shape and build the primitive.
    ///
    /// Returns the layer together with the shapes it consumes and produces.
    fn instantiate(
        &mut self,
        index: usize,
        config: &LayerConfig,
    ) -> Result<(Box<dyn Layer>, Shape, Shape), NetworkError> {
        let invalid = |reason: String| NetworkError::invalid_layer(index, reason);
        let current = self.shape;

        match config {
            LayerConfig::Dense {
                input_size,
                output_size,
                init,
            } => {
                if *input_size == 0 {
                    return Err(invalid("Dense layer input_size must be greater than 0".into()));
                }
                if *output_size == 0 {
                    return Err(invalid("Dense layer output_size must be greater than 0".into()));
                }
                if input_size.checked_mul(*output_size).is_none() {
                    return Err(invalid(format!(
                        "Dense weight matrix {} × {} is too large",
                        input_size, output_size
                    )));
                }
                match current {
                    None => {}
                    Some(Shape::Flat(n)) if n == *input_size => {}
                    Some(Shape::Flat(n)) => {
                        return Err(invalid(format!(
                            "Layer connection mismatch: previous output size ({}) does not match Dense input size ({})",
                            n, input_size
                        )))
                    }
                    Some(Shape::Sequence { length, width }) => {
                        return Err(invalid(format!(
                            "Dense layer needs a flat input but receives a ({}, {}) sequence; add a flatten layer first",
                            length, width
                        )))
                    }
                }
                let layer = DenseLayer::new(*input_size, *output_size, *init, &mut self.rng);
                Ok((
                    Box::new(layer),
                    Shape::Flat(*input_size),
                    Shape::Flat(*output_size),
                ))
            }
            LayerConfig::Activation { activation } => {
                let shape = require_previous(current, index, "Activation")?;
                let layer = ActivationLayer::new(shape.size(), *activation);
                Ok((Box::new(layer), shape, shape))
            }
            LayerConfig::BatchNorm { epsilon, momentum } => {
                let shape = require_previous(current, index, "BatchNorm")?;
                if *epsilon <= 0.0 {
                    return Err(invalid("epsilon must be positive".into()));
                }
                if !(0.0..=1.0).contains(momentum) {
                    return Err(invalid("momentum must be in range [0.0, 1.0]".into()));
                }
                let layer = BatchNormLayer::new(shape.size(), *epsilon, *momentum);
                Ok((Box::new(layer), shape, shape))
            }
            LayerConfig::Dropout { rate } => {
                let shape = require_previous(current, index, "Dropout")?;
                check_rate(*rate, index)?;
                let layer = DropoutLayer::new(shape.size(), *rate, &mut self.rng);
                Ok((Box::new(layer), shape, shape))
            }
            LayerConfig::SpatialDropout1d { rate } => {
                let shape = require_previous(current, index, "SpatialDropout1D")?;
                let Shape::Sequence { length, width } = shape else {
                    return Err(invalid(
                        "SpatialDropout1D needs a sequence input (place it after an embedding)"
                            .into(),
                    ));
                };
                check_rate(*rate, index)?;
                let layer = SpatialDropout1dLayer::new(length, width, *rate, &mut self.rng);
                Ok((Box::new(layer), shape, shape))
            }
            LayerConfig::Embedding {
                input_dim,
                output_dim,
                input_length,
                init,
                weights,
            } => {
                if current.is_some() {
                    return Err(invalid("Embedding must be the first layer".into()));
                }
                if *input_dim == 0 || *output_dim == 0 || *input_length == 0 {
                    return Err(invalid(format!(
                        "Embedding sizes must be greater than 0 (input_dim={}, output_dim={}, input_length={})",
                        input_dim, output_dim, input_length
                    )));
                }
                if input_dim.checked_mul(*output_dim).is_none()
                    || input_length.checked_mul(*output_dim).is_none()
                {
                    return Err(invalid(format!(
                        "Embedding of {} × {} over {} positions is too large",
                        input_dim, output_dim, input_length
                    )));
                }
                let layer = match weights {
                    Some(table) => {
                        let (rows, cols) = table.dim();
                        if (rows, cols) != (*input_dim, *output_dim) {
                            return Err(invalid(format!(
                                "Embedding weights have shape ({}, {}), expected ({}, {})",
                                rows, cols, input_dim, output_dim
                            )));
                        }
                        EmbeddingLayer::from_weights(table, *input_length)
                    }
                    None => EmbeddingLayer::new(
                        *input_dim,
                        *output_dim,
                        *input_length,
                        *init,
                        &mut self.rng,
                    ),
                };
                Ok((
                    Box::new(layer),
                    Shape::Flat(*input_length),
                    Shape::Sequence {
                        length: *input_length,
                        width: *output_dim,
                    },
                ))
            }
            LayerConfig::Flatten => {
                let shape = require_previous(current, index, "Flatten")?;
                let layer = FlattenLayer::new(shape.size());
                Ok((Box::new(layer), shape, Shape::Flat(shape.size())))
            }
        }
    }
}

fn require_previous(
    current: Option<Shape>,
    index: usize,
    kind: &str,
) -> Result<Shape, NetworkError> {
    current.ok_or_else(|| {
        NetworkError::invalid_layer(
            index,
            format!("{} layer cannot infer its size without a preceding layer", kind),
        )
    })
}

fn check_rate(rate: f32, index: usize) -> Result<(), NetworkError> {
    if !(0.0..1.0).contains(&rate) {
        return Err(NetworkError::invalid_layer(
            index,
            format!("drop rate must be in range [0.0, 1.0), got {}", rate),
        ));
    }
    Ok(())
}

impl ModelBuilder for Sequential {
    type Model = CompiledModel;

    fn add(&mut self, layer: LayerConfig) -> Result<&mut Self, NetworkError> {
        let index = self.configs.len();
        let (instance, input, output) = self.instantiate(index, &layer)?;
        log::debug!(
            "layer {}: {} {:?} -> {:?} ({} parameters)",
            index,
            instance.name(),
            input,
            output,
            instance.parameter_count()
        );

        if self.input_shape.is_none() {
            self.input_shape = Some(input);
        }
        self.shape = Some(output);
        self.layers.push(instance);
        self.configs.push(layer);
        Ok(self)
    }

    fn compile(self, loss: Loss, optimizer: OptimizerKind) -> Result<CompiledModel, NetworkError> {
        let (Some(input_shape), Some(output_shape)) = (self.input_shape, self.shape) else {
            return Err(NetworkError::EmptyModel);
        };

        let mut model = CompiledModel {
            layers: self.layers,
            configs: self.configs,
            input_shape,
            output_shape,
            loss,
            optimizer,
            training: true,
        };
        model.set_training(false);

        log::info!(
            "compiled model: {} layers, {} parameters, loss={}, optimizer={}",
            model.configs.len(),
            model.parameter_count(),
            loss,
            optimizer
        );
        Ok(model)
    }
}

/// A layer stack bound to a loss and an optimizer.
///
/// Starts in inference mode.
pub struct CompiledModel {
    layers: Vec<Box<dyn Layer>>,
    configs: Vec<LayerConfig>,
    input_shape: Shape,
    output_shape: Shape,
    loss: Loss,
    optimizer: OptimizerKind,
    training: bool,
}

impl CompiledModel {
    pub fn layers(&self) -> &[LayerConfig] {
        &self.configs
    }

    pub fn loss(&self) -> Loss {
        self.loss
    }

    pub fn optimizer(&self) -> OptimizerKind {
        self.optimizer
    }

    /// Values per input sample (positions for embedding models, features otherwise).
    pub fn input_size(&self) -> usize {
        self.input_shape.size()
    }

    /// Values per output sample.
    pub fn output_size(&self) -> usize {
        self.output_shape.size()
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.parameter_count()).sum()
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Toggle dropout and batch-statistics behavior on every layer.
    pub fn set_training(&mut self, training: bool) {
        for layer in &mut self.layers {
            layer.set_training(training);
        }
        self.training = training;
    }

    /// The layer stack as a serializable architecture.
    pub fn architecture(&self) -> ArchitectureConfig {
        ArchitectureConfig {
            layers: self.configs.clone(),
        }
    }

    /// One line per layer: index, name, output width and parameter count.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:<18} out={:<6} params={}",
                i,
                layer.name(),
                layer.output_size(),
                layer.parameter_count()
            );
        }
        let _ = write!(
            out,
            "total params={}  loss={}  optimizer={}",
            self.parameter_count(),
            self.loss,
            self.optimizer
        );
        out
    }

    /// Run a forward pass over `batch_size` samples stored row-major in `input`.
    ///
    /// For embedding models every input value must be a symbol index.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `batch_size` is zero, `batch_size * input_size()` overflows
    /// or differs from the input length, or the first layer rejects the values.
    pub fn predict(&self, input: &[f32], batch_size: usize) -> Result<Vec<f32>, NetworkError> {
        if batch_size == 0 {
            return Err(NetworkError::InvalidInput(
                "batch_size must be greater than 0".into(),
            ));
        }
        let expected = batch_size.checked_mul(self.input_size()).ok_or_else(|| {
            NetworkError::InvalidInput(format!(
                "batch of {} samples × {} values does not fit in memory",
                batch_size,
                self.input_size()
            ))
        })?;
        if input.len() != expected {
            return Err(NetworkError::InvalidInput(format!(
                "expected {} values ({} samples × {}), got {}",
                expected,
                batch_size,
                self.input_size(),
                input.len()
            )));
        }
        if let Some(first) = self.layers.first() {
            first.check_input(input)?;
        }

        let mut current = input.to_vec();
        for layer in &self.layers {
            let len = NetworkError::checked_size("layer output buffer", batch_size, layer.output_size())?;
            let mut next = vec![0.0f32; len];
            layer.forward(&current, &mut next, batch_size);
            current = next;
        }
        Ok(current)
    }
}
