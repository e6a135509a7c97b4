use serde::{Deserialize, Serialize};

use crate::train::train_config::TrainConfig;

/// Optional annotations attached to an exported model.
/// All fields are Option<> so documents written without them still load.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Human-readable class labels for the output layer, in output order.
    pub output_labels: Option<Vec<String>>,
    /// Hyper-parameters the model was trained with.
    pub training: Option<TrainConfig>,
}

impl ModelMetadata {
    pub fn heart(config: &TrainConfig) -> ModelMetadata {
        ModelMetadata {
            description: Some("Cleveland Heart Disease two-node classifier".to_string()),
            output_labels: Some(vec!["disease".to_string(), "no_disease".to_string()]),
            training: Some(config.clone()),
        }
    }
}
