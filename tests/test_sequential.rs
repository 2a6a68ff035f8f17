//! Tests for the Sequential container and compiled models
//!
//! This file covers:
//! - Shape validation while layers are added
//! - Forward passes through compiled hot-shot and embedding networks
//! - Input validation in predict
//! - Training / inference mode switching
//! - Reproducibility from a seed

use approx::assert_relative_eq;
use ndarray::Array2;
use pepnet::architecture::LayerConfig;
use pepnet::compile::{Loss, OptimizerKind};
use pepnet::config::NetworkConfig;
use pepnet::model::{ModelBuilder, Sequential, Shape};
use pepnet::network::{make_fixed_length_embedding_network, make_fixed_length_hotshot_network};
use pepnet::utils::{Activation, Initializer};
use pepnet::NetworkError;

fn one_hot(peptide: &[usize], n_symbols: usize) -> Vec<f32> {
    let mut encoded = vec![0.0f32; peptide.len() * n_symbols];
    for (position, &symbol) in peptide.iter().enumerate() {
        encoded[position * n_symbols + symbol] = 1.0;
    }
    encoded
}

// ============================================================================
// Layer Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_shapes_through_embedding_stack() {
        let mut model = Sequential::new();
        model
            .add(LayerConfig::Embedding {
                input_dim: 20,
                output_dim: 8,
                input_length: 9,
                init: Initializer::GlorotUniform,
                weights: None,
            })
            .unwrap();
        assert_eq!(model.input_shape(), Some(Shape::Flat(9)));
        assert_eq!(
            model.output_shape(),
            Some(Shape::Sequence { length: 9, width: 8 })
        );

        model.add(LayerConfig::spatial_dropout1d(0.2)).unwrap();
        model.add(LayerConfig::flatten()).unwrap();
        assert_eq!(model.output_shape(), Some(Shape::Flat(72)));
    }

    #[test]
    fn test_dense_after_embedding_requires_flatten() {
        let mut model = Sequential::new();
        model
            .add(LayerConfig::Embedding {
                input_dim: 20,
                output_dim: 8,
                input_length: 9,
                init: Initializer::GlorotUniform,
                weights: None,
            })
            .unwrap();
        let err = model
            .add(LayerConfig::dense(72, 10, Initializer::GlorotUniform))
            .err()
            .unwrap();
        assert!(err.to_string().contains("flatten"), "{}", err);
    }

    #[test]
    fn test_embedding_must_come_first() {
        let mut model = Sequential::new();
        model
            .add(LayerConfig::dense(4, 4, Initializer::GlorotUniform))
            .unwrap();
        let err = model
            .add(LayerConfig::Embedding {
                input_dim: 20,
                output_dim: 8,
                input_length: 4,
                init: Initializer::GlorotUniform,
                weights: None,
            })
            .err()
            .unwrap();
        assert!(matches!(err, NetworkError::InvalidLayer { index: 1, .. }));
    }

    #[test]
    fn test_spatial_dropout_needs_sequence() {
        let mut model = Sequential::new();
        model
            .add(LayerConfig::dense(4, 4, Initializer::GlorotUniform))
            .unwrap();
        assert!(model.add(LayerConfig::spatial_dropout1d(0.1)).is_err());
    }

    #[test]
    fn test_embedding_weights_checked_by_container() {
        let mut model = Sequential::new();
        let err = model
            .add(LayerConfig::Embedding {
                input_dim: 20,
                output_dim: 8,
                input_length: 9,
                init: Initializer::GlorotUniform,
                weights: Some(Array2::zeros((21, 8))),
            })
            .err()
            .unwrap();
        assert!(err.to_string().contains("(21, 8)"), "{}", err);
    }

    #[test]
    fn test_oversized_layers_rejected() {
        let mut model = Sequential::new();
        let err = model
            .add(LayerConfig::dense(usize::MAX / 2, 4, Initializer::Zeros))
            .err()
            .unwrap();
        assert!(matches!(err, NetworkError::InvalidLayer { index: 0, .. }));

        let err = model
            .add(LayerConfig::Embedding {
                input_dim: 20,
                output_dim: 8,
                input_length: usize::MAX / 4,
                init: Initializer::Zeros,
                weights: None,
            })
            .err()
            .unwrap();
        assert!(err.to_string().contains("too large"), "{}", err);
        assert!(model.is_empty());
    }

    #[test]
    fn test_batch_norm_parameters_checked() {
        let mut model = Sequential::new();
        model
            .add(LayerConfig::dense(4, 4, Initializer::GlorotUniform))
            .unwrap();
        assert!(model
            .add(LayerConfig::BatchNorm {
                epsilon: 0.0,
                momentum: 0.9
            })
            .is_err());
        assert!(model
            .add(LayerConfig::BatchNorm {
                epsilon: 1e-3,
                momentum: 1.5
            })
            .is_err());
        assert_eq!(model.layers().len(), 1);
    }
}

// ============================================================================
// Forward Pass Tests
// ============================================================================

mod forward_tests {
    use super::*;

    #[test]
    fn test_hotshot_predictions_in_sigmoid_range() {
        let model =
            make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())
                .unwrap();

        let mut batch = one_hot(&[0, 1, 2, 3, 4, 5, 6, 7, 8], 20);
        batch.extend(one_hot(&[19, 18, 17, 16, 15, 14, 13, 12, 11], 20));
        let scores = model.predict(&batch, 2).unwrap();

        assert_eq!(scores.len(), 2);
        assert!(scores.iter().all(|&s| s > 0.0 && s < 1.0));
    }

    #[test]
    fn test_embedding_predictions() {
        let config = NetworkConfig::default().with_layer_sizes([32, 16]);
        let model = make_fixed_length_embedding_network(9, 20, &config, Sequential::new()).unwrap();

        let batch: Vec<f32> = (0..27).map(|i| (i % 20) as f32).collect();
        let scores = model.predict(&batch, 3).unwrap();
        assert_eq!(scores.len(), 3);
        assert!(scores.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_softmax_output_rows_sum_to_one() {
        let config = NetworkConfig::default()
            .with_layer_sizes([10])
            .with_output(3, Activation::Softmax);
        let model = make_fixed_length_hotshot_network(2, 4, &config, Sequential::new()).unwrap();

        let batch = vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let probs = model.predict(&batch, 2).unwrap();
        for row in probs.chunks(3) {
            assert_relative_eq!(row.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_pretrained_embedding_lookup_is_exact() {
        // Embedding → flatten → identity dense is just the table lookup
        let table = Array2::from_shape_fn((3, 2), |(s, c)| (s * 2 + c) as f32);
        let mut model = Sequential::new();
        model
            .add(LayerConfig::Embedding {
                input_dim: 3,
                output_dim: 2,
                input_length: 2,
                init: Initializer::GlorotUniform,
                weights: Some(table),
            })
            .unwrap()
            .add(LayerConfig::flatten())
            .unwrap();
        let compiled = model.compile(Loss::Mse, OptimizerKind::Rmsprop).unwrap();

        let output = compiled.predict(&[2.0, 0.0], 1).unwrap();
        assert_eq!(output, vec![4.0, 5.0, 0.0, 1.0]);
    }
}

// ============================================================================
// Input Validation Tests
// ============================================================================

mod predict_validation_tests {
    use super::*;

    #[test]
    fn test_wrong_input_length() {
        let model =
            make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())
                .unwrap();
        let err = model.predict(&vec![0.0; 179], 1).err().unwrap();
        assert!(matches!(err, NetworkError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_batch_size() {
        let model =
            make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())
                .unwrap();
        assert!(model.predict(&[], 0).is_err());
    }

    #[test]
    fn test_batch_size_overflow() {
        let model =
            make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())
                .unwrap();
        let err = model.predict(&[], usize::MAX).err().unwrap();
        assert!(matches!(err, NetworkError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_vocabulary_index() {
        let model = make_fixed_length_embedding_network(
            9,
            20,
            &NetworkConfig::default(),
            Sequential::new(),
        )
        .unwrap();
        let mut peptide = vec![1.0f32; 9];
        peptide[4] = 20.0;

        let err = model.predict(&peptide, 1).err().unwrap();
        assert!(err.to_string().contains("position 4"), "{}", err);
    }
}

// ============================================================================
// Mode and Reproducibility Tests
// ============================================================================

mod mode_tests {
    use super::*;

    fn regularized_config() -> NetworkConfig {
        NetworkConfig::default()
            .with_layer_sizes([64])
            .with_dropout(0.5)
            .with_embedding_dropout(0.5)
    }

    #[test]
    fn test_inference_is_deterministic() {
        let model =
            make_fixed_length_embedding_network(9, 20, &regularized_config(), Sequential::new())
                .unwrap();
        assert!(!model.is_training());

        let peptide: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let first = model.predict(&peptide, 1).unwrap();
        let second = model.predict(&peptide, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_training_mode_is_stochastic() {
        let config = regularized_config().with_batch_normalization(false);
        let mut model =
            make_fixed_length_embedding_network(9, 20, &config, Sequential::new()).unwrap();
        model.set_training(true);
        assert!(model.is_training());

        let peptide: Vec<f32> = (0..9).map(|i| i as f32).collect();
        let outputs: Vec<Vec<f32>> = (0..5).map(|_| model.predict(&peptide, 1).unwrap()).collect();
        assert!(outputs.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn test_same_seed_same_model() {
        let config = NetworkConfig::default().with_layer_sizes([16]);
        let a = make_fixed_length_hotshot_network(9, 20, &config, Sequential::with_seed(99)).unwrap();
        let b = make_fixed_length_hotshot_network(9, 20, &config, Sequential::with_seed(99)).unwrap();
        let c = make_fixed_length_hotshot_network(9, 20, &config, Sequential::with_seed(100)).unwrap();

        let input = one_hot(&[3, 1, 4, 1, 5, 9, 2, 6, 5], 20);
        let pa = a.predict(&input, 1).unwrap();
        let pb = b.predict(&input, 1).unwrap();
        let pc = c.predict(&input, 1).unwrap();
        assert_eq!(pa, pb);
        assert_ne!(pa, pc);
    }

    #[test]
    fn test_parameter_count_of_default_hotshot() {
        let model =
            make_fixed_length_hotshot_network(9, 20, &NetworkConfig::default(), Sequential::new())
                .unwrap();
        // dense 180→100, batch norm over 100, dense 100→1
        assert_eq!(model.parameter_count(), 180 * 100 + 100 + 2 * 100 + 100 + 1);
    }

    #[test]
    fn test_architecture_round_trip_rebuilds_same_layers() {
        let model = make_fixed_length_embedding_network(
            9,
            20,
            &NetworkConfig::default(),
            Sequential::new(),
        )
        .unwrap();
        let arch = model.architecture();
        let rebuilt = pepnet::architecture::build_sequential(&arch, 42).unwrap();
        assert_eq!(rebuilt.layers(), model.layers());
    }
}
