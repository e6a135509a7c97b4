pub mod batch_report;
pub mod train_config;
pub mod trainer;

pub use batch_report::BatchReport;
pub use train_config::TrainConfig;
pub use trainer::Trainer;
