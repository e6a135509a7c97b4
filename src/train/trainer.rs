use tracing::trace;

use crate::{
    data::ctf::Minibatch,
    error::{HeartError, Result},
    loss::cross_entropy::{classification_error, SoftmaxCrossEntropy},
    network::network::Network,
    optim::sgd::Sgd,
};

/// Couples a network with its optimizer and remembers the statistics of the
/// most recent training minibatch.
pub struct Trainer {
    network: Network,
    optimizer: Sgd,
    last_loss: f64,
    last_error: f64,
    iterations: usize,
}

impl Trainer {
    pub fn new(network: Network, optimizer: Sgd) -> Trainer {
        Trainer {
            network,
            optimizer,
            last_loss: 0.0,
            last_error: 0.0,
            iterations: 0,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Number of SGD updates applied so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One SGD update on `batch`. Loss and error are measured on the forward
    /// pass that produced the gradients, i.e. before the update.
    pub fn train_minibatch(&mut self, batch: &Minibatch) -> Result<()> {
        if batch.is_empty() {
            return Err(HeartError::EmptyBatch);
        }
        let (logits, grads) = self.network.gradients(&batch.features, &batch.labels)?;

        self.last_loss = SoftmaxCrossEntropy::batch_mean(&logits, &batch.labels);
        self.last_error = classification_error(&logits, &batch.labels);

        // Borrow-checker ordering: all gradients are computed before any layer changes.
        for (layer, g) in self.network.layers.iter_mut().zip(grads.iter()) {
            self.optimizer.step(layer, g);
        }
        self.iterations += 1;
        trace!(iteration = self.iterations, loss = self.last_loss, error = self.last_error, "minibatch");
        Ok(())
    }

    /// Mean cross-entropy of the last training minibatch.
    pub fn previous_minibatch_loss_average(&self) -> f64 {
        self.last_loss
    }

    /// Classification error rate of the last training minibatch.
    pub fn previous_minibatch_evaluation_average(&self) -> f64 {
        self.last_error
    }

    /// Classification error rate on `batch` without touching the parameters.
    pub fn test_minibatch(&self, batch: &Minibatch) -> Result<f64> {
        if batch.is_empty() {
            return Err(HeartError::EmptyBatch);
        }
        if batch.labels.cols != self.network.output_dim() {
            return Err(HeartError::shape("label vector", self.network.output_dim(), batch.labels.cols));
        }
        let logits = self.network.logits(&batch.features)?;
        Ok(classification_error(&logits, &batch.labels))
    }
}
