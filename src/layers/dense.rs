use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{math::matrix::Matrix, activation::activation::ActivationFunction};

/// Fully connected layer computing `a = f(x·W + b)` for a batch `x` with one
/// record per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer{
    pub size: usize,
    /// Shape: (input_size, size).
    pub weights: Matrix,
    /// Shape: (1, size).
    pub biases: Matrix,
    pub activator: ActivationFunction
}

/// Batch-averaged parameter gradients plus the error propagated to the layer
/// below.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Matrix,
    /// ∂L/∂x for every record, shape (batch, input_size).
    pub input_delta: Matrix,
}

impl Layer {
    /// Weights and biases are drawn from U(-init_scale, init_scale).
    pub fn new<R: Rng>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        init_scale: f64,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::uniform(input_size, size, init_scale, rng);
        let biases = Matrix::uniform(1, size, init_scale, rng);

        Layer {
            size,
            weights,
            biases,
            activator: activation
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    /// Returns `(z, a)`: the pre-activation values (kept for backprop) and
    /// the activations.
    pub fn forward(&self, input: &Matrix) -> (Matrix, Matrix) {
        let z = (input * &self.weights).add_row(&self.biases);
        let a = z.map(|x| self.activator.function(x));
        (z, a)
    }

    /// `delta_a` is ∂L/∂a per record (not yet averaged). `z` and `inputs`
    /// must come from the forward pass that produced `a`.
    pub fn backward(&self, delta_a: &Matrix, z: &Matrix, inputs: &Matrix) -> Gradients {
        // δ = ∂L/∂a ⊙ f'(z)
        let act_derivative = z.map(|x| self.activator.derivative(x));
        let delta = delta_a.hadamard(&act_derivative);

        let inv_batch = 1.0 / inputs.rows.max(1) as f64;
        let weights = (&inputs.transpose() * &delta).map(|x| x * inv_batch);
        let biases = delta.column_means();
        let input_delta = &delta * &self.weights.transpose();

        Gradients { weights, biases, input_delta }
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights = self.weights.clone() - weights_grad.map(|x| x * lr);
        self.biases = self.biases.clone() - biases_grad.map(|x| x * lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn identity_layer() -> Layer {
        Layer {
            size: 1,
            weights: Matrix::from_data(vec![vec![2.0], vec![-1.0]]),
            biases: Matrix::row_vector(&[0.5]),
            activator: ActivationFunction::Identity,
        }
    }

    #[test]
    fn forward_is_affine_per_row() {
        let layer = identity_layer();
        let x = Matrix::from_data(vec![vec![1.0, 1.0], vec![0.0, 2.0]]);
        let (z, a) = layer.forward(&x);
        assert_eq!(z.data, vec![vec![1.5], vec![-1.5]]);
        assert_eq!(a, z);
    }

    #[test]
    fn backward_averages_over_the_batch() {
        let layer = identity_layer();
        let x = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let (z, _) = layer.forward(&x);
        let delta = Matrix::from_data(vec![vec![1.0], vec![3.0]]);
        let g = layer.backward(&delta, &z, &x);
        assert_eq!(g.weights.data, vec![vec![0.5], vec![1.5]]);
        assert_eq!(g.biases.data, vec![vec![2.0]]);
        assert_eq!(g.input_delta.data, vec![vec![2.0, -1.0], vec![6.0, -3.0]]);
    }

    #[test]
    fn new_layer_has_requested_shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        let layer = Layer::new(12, 20, ActivationFunction::Tanh, 0.01, &mut rng);
        assert_eq!((layer.weights.rows, layer.weights.cols), (12, 20));
        assert_eq!((layer.biases.rows, layer.biases.cols), (1, 20));
        assert_eq!(layer.input_size(), 12);
    }
}
