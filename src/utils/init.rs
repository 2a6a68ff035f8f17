//! Weight initialization schemes.
//!
//! Fan-in / fan-out follow the weight matrix layout: for a dense layer they are the input
//! and output widths, for an embedding table the vocabulary size and embedding width.

use crate::error::NetworkError;
use crate::utils::rng::SimpleRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Initializer {
    /// Uniform in ±sqrt(6 / (fan_in + fan_out)).
    #[default]
    GlorotUniform,
    /// Normal with stddev sqrt(2 / (fan_in + fan_out)).
    GlorotNormal,
    /// Uniform in ±sqrt(6 / fan_in).
    HeUniform,
    /// Normal with stddev sqrt(2 / fan_in).
    HeNormal,
    /// Uniform in ±sqrt(3 / fan_in).
    LecunUniform,
    /// Uniform in ±0.05.
    Uniform,
    Zeros,
}

const INITIALIZER_NAMES: [&str; 7] = [
    "glorot_uniform",
    "glorot_normal",
    "he_uniform",
    "he_normal",
    "lecun_uniform",
    "uniform",
    "zeros",
];

const UNIFORM_LIMIT: f32 = 0.05;

impl Initializer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Initializer::GlorotUniform => "glorot_uniform",
            Initializer::GlorotNormal => "glorot_normal",
            Initializer::HeUniform => "he_uniform",
            Initializer::HeNormal => "he_normal",
            Initializer::LecunUniform => "lecun_uniform",
            Initializer::Uniform => "uniform",
            Initializer::Zeros => "zeros",
        }
    }

    /// Fill `values` for a weight matrix with the given fan-in and fan-out.
    pub fn fill(&self, values: &mut [f32], fan_in: usize, fan_out: usize, rng: &mut SimpleRng) {
        let fan_in = fan_in.max(1) as f32;
        let fan_out = fan_out.max(1) as f32;

        match self {
            Initializer::GlorotUniform => fill_uniform(values, (6.0 / (fan_in + fan_out)).sqrt(), rng),
            Initializer::HeUniform => fill_uniform(values, (6.0 / fan_in).sqrt(), rng),
            Initializer::LecunUniform => fill_uniform(values, (3.0 / fan_in).sqrt(), rng),
            Initializer::Uniform => fill_uniform(values, UNIFORM_LIMIT, rng),
            Initializer::GlorotNormal => fill_normal(values, (2.0 / (fan_in + fan_out)).sqrt(), rng),
            Initializer::HeNormal => fill_normal(values, (2.0 / fan_in).sqrt(), rng),
            Initializer::Zeros => values.fill(0.0),
        }
    }
}

fn fill_uniform(values: &mut [f32], limit: f32, rng: &mut SimpleRng) {
    for value in values.iter_mut() {
        *value = rng.gen_range_f32(-limit, limit);
    }
}

fn fill_normal(values: &mut [f32], stddev: f32, rng: &mut SimpleRng) {
    for value in values.iter_mut() {
        *value = rng.next_gaussian() * stddev;
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Initializer {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "glorot_uniform" => Ok(Initializer::GlorotUniform),
            "glorot_normal" => Ok(Initializer::GlorotNormal),
            "he_uniform" => Ok(Initializer::HeUniform),
            "he_normal" => Ok(Initializer::HeNormal),
            "lecun_uniform" => Ok(Initializer::LecunUniform),
            "uniform" => Ok(Initializer::Uniform),
            "zeros" => Ok(Initializer::Zeros),
            _ => Err(NetworkError::unknown_name("initializer", s, &INITIALIZER_NAMES)),
        }
    }
}

impl TryFrom<String> for Initializer {
    type Error = NetworkError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Initializer> for String {
    fn from(value: Initializer) -> String {
        value.as_str().to_string()
    }
}
