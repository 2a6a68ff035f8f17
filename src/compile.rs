//! Loss and optimizer identifiers bound to a model by `compile`.
//!
//! Only the identifiers live here; evaluating losses and running optimizer updates
//! belongs to the training code.

use crate::error::NetworkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Loss {
    /// Mean squared error
    #[default]
    Mse,
    /// Mean absolute error
    Mae,
    BinaryCrossentropy,
    CategoricalCrossentropy,
}

const LOSS_NAMES: [&str; 4] = ["mse", "mae", "binary_crossentropy", "categorical_crossentropy"];

impl Loss {
    pub fn as_str(&self) -> &'static str {
        match self {
            Loss::Mse => "mse",
            Loss::Mae => "mae",
            Loss::BinaryCrossentropy => "binary_crossentropy",
            Loss::CategoricalCrossentropy => "categorical_crossentropy",
        }
    }
}

impl fmt::Display for Loss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Loss {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mse" | "mean_squared_error" => Ok(Loss::Mse),
            "mae" | "mean_absolute_error" => Ok(Loss::Mae),
            "binary_crossentropy" => Ok(Loss::BinaryCrossentropy),
            "categorical_crossentropy" => Ok(Loss::CategoricalCrossentropy),
            _ => Err(NetworkError::unknown_name("loss", s, &LOSS_NAMES)),
        }
    }
}

// Serde goes through `FromStr` so config files get the same aliases and error text.
impl TryFrom<String> for Loss {
    type Error = NetworkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Loss> for String {
    fn from(value: Loss) -> String {
        value.as_str().to_string()
    }
}

/// Optimization algorithm requested for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OptimizerKind {
    /// RMSprop: adaptive per-parameter learning rates from a moving average of squared gradients
    #[default]
    Rmsprop,
    /// Adam: adaptive moment estimation
    Adam,
    /// Vanilla stochastic gradient descent
    Sgd,
    Adagrad,
}

const OPTIMIZER_NAMES: [&str; 4] = ["rmsprop", "adam", "sgd", "adagrad"];

impl OptimizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizerKind::Rmsprop => "rmsprop",
            OptimizerKind::Adam => "adam",
            OptimizerKind::Sgd => "sgd",
            OptimizerKind::Adagrad => "adagrad",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizerKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rmsprop" => Ok(OptimizerKind::Rmsprop),
            "adam" => Ok(OptimizerKind::Adam),
            "sgd" => Ok(OptimizerKind::Sgd),
            "adagrad" => Ok(OptimizerKind::Adagrad),
            _ => Err(NetworkError::unknown_name("optimizer", s, &OPTIMIZER_NAMES)),
        }
    }
}

impl TryFrom<String> for OptimizerKind {
    type Error = NetworkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OptimizerKind> for String {
    fn from(value: OptimizerKind) -> String {
        value.as_str().to_string()
    }
}
