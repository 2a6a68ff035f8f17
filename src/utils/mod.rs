//! Shared utilities for the layer implementations
//!
//! Random number generation, activation functions and weight initializers.

pub mod activations;
pub mod init;
pub mod rng;

pub use activations::Activation;
pub use init::Initializer;
pub use rng::SimpleRng;
