pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod data;
pub mod train;
pub mod features;
pub mod driver;
pub mod error;
pub mod logging;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{softmax, ActivationFunction};
pub use layers::dense::Layer;
pub use network::{ExportedModel, ModelGraph, ModelMetadata, Network, NetworkSpec};
pub use loss::cross_entropy::SoftmaxCrossEntropy;
pub use optim::sgd::Sgd;
pub use data::ctf::{CtfSchema, Minibatch, MinibatchSource, Randomize, Record, Sweeps};
pub use train::{BatchReport, TrainConfig, Trainer};
pub use features::PatientRecord;
pub use driver::{DriverPaths, RunSummary};
pub use error::{HeartError, Result};
