//! Layer primitives held by a `Sequential`
//!
//! This module provides the Layer trait and the primitives the network builders
//! stack: dense, activation, batch normalization, dropout, spatial dropout,
//! embedding lookup and flatten.

mod r#trait;
pub mod activation;
pub mod batchnorm;
pub mod dense;
pub mod dropout;
pub mod embedding;
pub mod flatten;

pub use activation::ActivationLayer;
pub use batchnorm::BatchNormLayer;
pub use dense::DenseLayer;
pub use dropout::{DropoutLayer, SpatialDropout1dLayer};
pub use embedding::EmbeddingLayer;
pub use flatten::FlattenLayer;
pub use r#trait::Layer;
