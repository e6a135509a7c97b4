//! The training driver: build, train, export, evaluate, predict.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::data::ctf::{CtfSchema, MinibatchSource, Randomize, Sweeps};
use crate::error::{HeartError, Result};
use crate::network::export::ExportedModel;
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;
use crate::optim::sgd::Sgd;
use crate::train::batch_report::BatchReport;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::Trainer;

/// The ad hoc record predicted after training. Encodes a 60 year old with
/// normal thal, non-anginal chest pain, two coloured vessels, 1.0 mm ST
/// depression, no exercise angina, max heart rate 180 and a flat slope.
pub const EXAMPLE_FEATURES: [f64; 12] = [
    1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 0.0370370373, 0.0, 0.832061052, 0.0, 1.0, 0.6458333,
];

/// Where the driver reads datasets from and writes the model to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverPaths {
    pub train: PathBuf,
    pub test: PathBuf,
    pub model: PathBuf,
}

impl DriverPaths {
    pub fn from_root(root: &Path) -> DriverPaths {
        DriverPaths {
            train: root.join("data").join("TrainingData.txt"),
            test: root.join("data").join("TestData.txt"),
            model: root.join("assets").join("Heart.json"),
        }
    }

    /// Layout relative to the crate root.
    pub fn crate_layout() -> DriverPaths {
        DriverPaths::from_root(Path::new(env!("CARGO_MANIFEST_DIR")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub records: usize,
    pub accuracy_pct: f64,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub iterations: usize,
    pub reports: Vec<BatchReport>,
    pub evaluation: Evaluation,
    /// Class probabilities for `EXAMPLE_FEATURES`, from the reloaded export.
    pub prediction: Vec<f64>,
}

fn schema(config: &TrainConfig) -> CtfSchema {
    CtfSchema::new(config.input_dim, config.output_dim)
}

/// Runs exactly `config.max_iterations` SGD updates over an endlessly
/// repeated, shuffled training stream. Prints a progress line every
/// `config.report_every()` iterations. Console banners go to stdout along
/// with the progress lines; `tracing` carries diagnostics only.
pub fn train(train_path: &Path, config: &TrainConfig) -> Result<(Trainer, Vec<BatchReport>)> {
    println!(
        "Creating a {}-{}-{} tanh-softmax NN",
        config.input_dim, config.hidden_dim, config.output_dim
    );
    let spec = NetworkSpec::heart(config.input_dim, config.hidden_dim, config.output_dim);
    let network = Network::new(&spec, config.init_scale, config.seed);

    println!(
        "Creating a cross entropy batch={} SGD LR={} trainer",
        config.batch_size, config.learning_rate
    );
    let mut trainer = Trainer::new(network, Sgd::new(config.learning_rate));

    let mut source = MinibatchSource::open(
        train_path,
        &schema(config),
        Randomize::Shuffled,
        Sweeps::Infinite,
        config.seed,
    )?;

    debug!(iterations = config.max_iterations, seed = config.seed, "training source ready");
    println!("\nStarting training\n");
    let every = config.report_every();
    let mut reports = Vec::new();
    for i in 0..config.max_iterations {
        let batch = source.next_minibatch(config.batch_size).ok_or(HeartError::EmptyBatch)?;
        trainer.train_minibatch(&batch)?;
        if i % every == 0 {
            let report = BatchReport {
                iteration: i,
                mean_loss: trainer.previous_minibatch_loss_average(),
                accuracy_pct: (1.0 - trainer.previous_minibatch_evaluation_average()) * 100.0,
            };
            println!("{report}");
            reports.push(report);
        }
    }
    println!("\nTraining complete");
    Ok((trainer, reports))
}

/// Reads the whole test file in file order as a single batch and reports
/// `(1 - error) * 100`. The file is assumed to hold
/// `config.expected_test_records` records; a different count is logged and
/// every record actually present is evaluated.
pub fn evaluate(trainer: &Trainer, test_path: &Path, config: &TrainConfig) -> Result<Evaluation> {
    let mut source = MinibatchSource::open(
        test_path,
        &schema(config),
        Randomize::Sequential,
        Sweeps::Limited(1),
        config.seed,
    )?;

    let present = source.sweep_len();
    if present != config.expected_test_records {
        warn!(
            path = %test_path.display(),
            expected = config.expected_test_records,
            present,
            "test set size differs from the assumed count; evaluating all records present"
        );
    }

    let batch = source
        .next_minibatch(present.max(config.expected_test_records))
        .ok_or(HeartError::EmptyBatch)?;
    let error = trainer.test_minibatch(&batch)?;
    Ok(Evaluation { records: batch.len(), accuracy_pct: (1.0 - error) * 100.0 })
}

/// Full pipeline. Every failure is fatal; nothing is retried.
pub fn run(paths: &DriverPaths, config: &TrainConfig) -> Result<RunSummary> {
    let (trainer, reports) = train(&paths.train, config)?;

    trainer.network().export(&paths.model, &ModelMetadata::heart(config))?;
    info!(path = %paths.model.display(), "exported model");

    println!("\nEvaluating accuracy on the test set\n");
    let evaluation = evaluate(&trainer, &paths.test, config)?;
    println!(
        "Classification accuracy on the {} data items = {:.2}%",
        evaluation.records, evaluation.accuracy_pct
    );

    let model = ExportedModel::load(&paths.model)?;
    let prediction = model.eval(&EXAMPLE_FEATURES)?;
    println!("{}", format_probabilities(&prediction));

    Ok(RunSummary {
        iterations: trainer.iterations(),
        reports,
        evaluation,
        prediction,
    })
}

fn format_probabilities(p: &[f64]) -> String {
    let cells: Vec<String> = p.iter().map(|x| format!("{x:.8}")).collect();
    format!("[{}]", cells.join(" "))
}
