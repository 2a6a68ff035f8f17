//! Feed-forward networks for fixed-length peptide sequences
//!
//! This library assembles dense networks (with an optional embedding front end,
//! batch normalization and dropout) for fixed-length amino-acid sequences and
//! compiles them with a loss and an optimizer.
//!
//! # Modules
//!
//! - `network`: the layer-stack builder and the feed-forward / hot-shot / embedding factories
//! - `model`: the `ModelBuilder` interface and the in-crate `Sequential` container
//! - `layers`: Layer trait and implementations (Dense, Embedding, BatchNorm, etc.)
//! - `architecture`: serializable layer descriptions
//! - `config`: network hyperparameters and JSON loading
//! - `compile`: loss and optimizer identifiers
//! - `utils`: shared utilities (RNG, activation functions, initializers)
//!
//! # Example
//!
//! ```
//! use pepnet::{make_fixed_length_hotshot_network, NetworkConfig, Sequential};
//!
//! let model = make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())?;
//! let scores = model.predict(&vec![0.0; 180], 1)?;
//! assert_eq!(scores.len(), 1);
//! # Ok::<(), pepnet::NetworkError>(())
//! ```

pub mod architecture;
pub mod compile;
pub mod config;
pub mod error;
pub mod layers;
pub mod model;
pub mod network;
pub mod utils;

pub use architecture::{ArchitectureConfig, LayerConfig};
pub use compile::{Loss, OptimizerKind};
pub use config::NetworkConfig;
pub use error::NetworkError;
pub use model::{CompiledModel, ModelBuilder, Sequential};
pub use network::{
    make_fixed_length_embedding_network, make_fixed_length_feedforward_network,
    make_fixed_length_hotshot_network, DenseStack,
};
pub use utils::{Activation, Initializer};
