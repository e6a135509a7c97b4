use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;

/// One layer in a network specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Number of units in this layer.
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable description of a network topology, input → output.
/// Each layer's input size is the previous layer's `size` (or `input_dim`
/// for the first layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub input_dim: usize,
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    /// 12 clinical features → 20 tanh units → 2 raw logits.
    pub fn heart(input_dim: usize, hidden_dim: usize, output_dim: usize) -> NetworkSpec {
        NetworkSpec {
            input_dim,
            layers: vec![
                LayerSpec { size: hidden_dim, activation: ActivationFunction::Tanh },
                LayerSpec { size: output_dim, activation: ActivationFunction::Identity },
            ],
        }
    }
}
