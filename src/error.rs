//! Error type shared by the builders, the sequential container and the config loaders.

use thiserror::Error;

/// Errors raised while assembling, compiling or running a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// An embedding vocabulary size was given without an embedding width.
    #[error("Both embedding_input_dim and embedding_output_dim must be set")]
    MissingEmbeddingOutputDim,

    /// Pre-trained embedding weights disagree with the declared embedding dimensions.
    #[error(
        "Wrong shape for embedding: expected ({expected_rows}, {expected_cols}) but got ({actual_rows}, {actual_cols})"
    )]
    EmbeddingShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A layer was rejected by the sequential container.
    #[error("Layer {index}: {reason}")]
    InvalidLayer { index: usize, reason: String },

    /// A derived layer width does not fit in `usize`.
    #[error("{what} overflows: {lhs} × {rhs}")]
    SizeOverflow {
        what: &'static str,
        lhs: usize,
        rhs: usize,
    },

    /// `compile` was called on a container without layers.
    #[error("cannot compile a model without layers")]
    EmptyModel,

    /// Input handed to `predict` does not fit the model.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A textual identifier (activation, initializer, loss, optimizer) was not recognised.
    #[error("Invalid {kind} '{name}'. Must be one of: {expected}")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn invalid_layer(index: usize, reason: impl Into<String>) -> Self {
        NetworkError::InvalidLayer {
            index,
            reason: reason.into(),
        }
    }

    /// `lhs * rhs`, or `SizeOverflow` naming the quantity being computed.
    pub(crate) fn checked_size(what: &'static str, lhs: usize, rhs: usize) -> Result<usize, Self> {
        lhs.checked_mul(rhs)
            .ok_or(NetworkError::SizeOverflow { what, lhs, rhs })
    }

    pub(crate) fn unknown_name(kind: &'static str, name: &str, expected: &[&str]) -> Self {
        NetworkError::UnknownName {
            kind,
            name: name.to_string(),
            expected: expected.join(", "),
        }
    }
}
