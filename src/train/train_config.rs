use serde::{Deserialize, Serialize};

/// Hyper-parameters for a training run.
///
/// These are fixed at compile time for the heart-disease driver; the struct
/// exists so they travel together and get recorded in the exported model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub learning_rate: f64,
    /// Records per SGD update.
    pub batch_size: usize,
    /// Number of SGD updates; training is not bounded by sweeps.
    pub max_iterations: usize,
    /// Parameters start in U(-init_scale, init_scale).
    pub init_scale: f64,
    pub seed: u64,
    /// How many records the test file is assumed to hold. Evaluation reads
    /// the whole file regardless and warns on a mismatch.
    pub expected_test_records: usize,
}

impl TrainConfig {
    pub const fn heart_default() -> TrainConfig {
        TrainConfig {
            input_dim: 12,
            hidden_dim: 20,
            output_dim: 2,
            learning_rate: 0.005,
            batch_size: 10,
            max_iterations: 5000,
            init_scale: 0.01,
            seed: 1,
            expected_test_records: 91,
        }
    }

    /// A progress line is printed every this many iterations.
    pub fn report_every(&self) -> usize {
        (self.max_iterations / 10).max(1)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::heart_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_interval() {
        assert_eq!(TrainConfig::heart_default().report_every(), 500);
        let short = TrainConfig { max_iterations: 7, ..TrainConfig::heart_default() };
        assert_eq!(short.report_every(), 1);
    }
}
