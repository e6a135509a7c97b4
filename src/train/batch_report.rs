use std::fmt;

use serde::{Serialize, Deserialize};

/// Progress snapshot taken from a single training minibatch. These are
/// single-batch estimates, not running averages over the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 0-based iteration the batch was trained at.
    pub iteration: usize,
    pub mean_loss: f64,
    /// `(1 - error_rate) * 100`.
    pub accuracy_pct: f64,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "batch {:4}: mean loss = {:.4}, accuracy = {:.2}%",
            self.iteration, self.mean_loss, self.accuracy_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_progress_log() {
        let r = BatchReport { iteration: 500, mean_loss: 0.69314, accuracy_pct: 70.0 };
        assert_eq!(r.to_string(), "batch  500: mean loss = 0.6931, accuracy = 70.00%");
    }
}
