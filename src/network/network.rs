use std::path::Path;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::activation::activation::softmax;
use crate::error::{HeartError, Result};
use crate::layers::dense::{Gradients, Layer};
use crate::loss::cross_entropy::SoftmaxCrossEntropy;
use crate::math::matrix::Matrix;
use crate::network::export::ModelGraph;
use crate::network::metadata::ModelMetadata;
use crate::network::spec::NetworkSpec;

/// Feed-forward stack of dense layers producing raw logits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub input_dim: usize,
    pub layers: Vec<Layer>,
}

/// Activations of one layer from a forward pass, kept for backprop.
#[derive(Debug, Clone)]
pub struct LayerTrace {
    pub z: Matrix,
    pub a: Matrix,
}

impl Network {
    /// Builds a network from `spec`, drawing every parameter from
    /// U(-init_scale, init_scale). The same `seed` always yields the same
    /// starting weights.
    pub fn new(spec: &NetworkSpec, init_scale: f64, seed: u64) -> Network {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut input_size = spec.input_dim;
        let mut layers = Vec::with_capacity(spec.layers.len());
        for layer_spec in &spec.layers {
            layers.push(Layer::new(input_size, layer_spec.size, layer_spec.activation, init_scale, &mut rng));
            input_size = layer_spec.size;
        }
        Network { input_dim: spec.input_dim, layers }
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(self.input_dim, |l| l.size)
    }

    fn check_input(&self, batch: &Matrix) -> Result<()> {
        if batch.rows == 0 {
            return Err(HeartError::EmptyBatch);
        }
        if batch.cols != self.input_dim {
            return Err(HeartError::shape("network input", self.input_dim, batch.cols));
        }
        Ok(())
    }

    /// Forward pass over a batch (one record per row), returning every
    /// layer's pre-activation and activation.
    pub fn forward_cached(&self, batch: &Matrix) -> Result<Vec<LayerTrace>> {
        self.check_input(batch)?;
        let mut traces: Vec<LayerTrace> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let input = traces.last().map_or(batch, |t| &t.a);
            let (z, a) = layer.forward(input);
            traces.push(LayerTrace { z, a });
        }
        Ok(traces)
    }

    /// Raw output-layer values, shape (batch, output_dim).
    pub fn logits(&self, batch: &Matrix) -> Result<Matrix> {
        let traces = self.forward_cached(batch)?;
        Ok(traces.into_iter().last().map_or_else(|| batch.clone(), |t| t.a))
    }

    /// Class probabilities for a single record.
    pub fn predict(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.input_dim {
            return Err(HeartError::shape("feature vector", self.input_dim, features.len()));
        }
        let logits = self.logits(&Matrix::row_vector(features))?;
        Ok(softmax(&logits.data[0]))
    }

    /// Runs a forward and backward pass of softmax cross-entropy over the
    /// batch. Returns the logits from the forward pass and one set of
    /// batch-averaged gradients per layer, in layer order.
    pub fn gradients(&self, batch: &Matrix, targets: &Matrix) -> Result<(Matrix, Vec<Gradients>)> {
        if targets.rows != batch.rows {
            return Err(HeartError::shape("label rows", batch.rows, targets.rows));
        }
        if targets.rows > 0 && targets.cols != self.output_dim() {
            return Err(HeartError::shape("label vector", self.output_dim(), targets.cols));
        }
        let traces = self.forward_cached(batch)?;
        let logits = match traces.last() {
            Some(t) => t.a.clone(),
            None => return Ok((batch.clone(), Vec::new())),
        };

        let mut delta = SoftmaxCrossEntropy::gradient(&logits, targets);
        let mut grads: Vec<Gradients> = Vec::with_capacity(self.layers.len());
        for i in (0..self.layers.len()).rev() {
            let input_for_layer = if i == 0 { batch } else { &traces[i - 1].a };
            let g = self.layers[i].backward(&delta, &traces[i].z, input_for_layer);
            delta = g.input_delta.clone();
            grads.push(g);
        }
        grads.reverse();
        Ok((logits, grads))
    }

    /// Writes the network, wrapped in a softmax, as an interchange graph.
    /// The parent directory must already exist. A graph that would not load
    /// back (e.g. diverged, non-finite weights) is rejected before any file
    /// is created.
    pub fn export<P: AsRef<Path>>(&self, path: P, metadata: &ModelMetadata) -> Result<()> {
        let graph = ModelGraph::from_network(self, metadata.clone());
        graph.validate().map_err(HeartError::InvalidModel)?;
        graph.save_json(path)
    }
}
