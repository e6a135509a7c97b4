mod common;

use common::{synthetic_ctf, Workspace};
use heart_nn::driver::{self, EXAMPLE_FEATURES};
use heart_nn::{ExportedModel, HeartError, TrainConfig};

fn prepared(name: &str, train: usize, test: usize) -> Workspace {
    let ws = Workspace::new(name);
    let paths = ws.paths();
    ws.write(&paths.train, &synthetic_ctf(train, 11));
    ws.write(&paths.test, &synthetic_ctf(test, 12));
    ws
}

#[test]
fn full_run_reports_sane_numbers() {
    let ws = prepared("full-run", 212, 91);
    let config = TrainConfig::heart_default();

    let summary = driver::run(&ws.paths(), &config).unwrap();

    assert_eq!(summary.iterations, 5000);
    let iterations: Vec<usize> = summary.reports.iter().map(|r| r.iteration).collect();
    assert_eq!(iterations, (0..5000usize).step_by(500).collect::<Vec<_>>());

    assert_eq!(summary.evaluation.records, 91);
    let acc = summary.evaluation.accuracy_pct;
    assert!(acc.is_finite() && (0.0..=100.0).contains(&acc));

    assert_eq!(summary.prediction.len(), 2);
    assert!((summary.prediction.iter().sum::<f64>() - 1.0).abs() < 1e-5);
    assert!(ws.paths().model.exists());
}

#[test]
fn iteration_count_is_exact_for_any_dataset_size() {
    for records in [3usize, 10, 37] {
        let ws = prepared(&format!("iters-{records}"), records, 5);
        let config = TrainConfig { max_iterations: 123, ..TrainConfig::heart_default() };
        let (trainer, reports) = driver::train(&ws.paths().train, &config).unwrap();
        assert_eq!(trainer.iterations(), 123);
        assert_eq!(reports.len(), 11);
    }
}

#[test]
fn evaluation_is_repeatable() {
    let ws = prepared("eval-repeat", 50, 91);
    let config = TrainConfig { max_iterations: 200, ..TrainConfig::heart_default() };
    let (trainer, _) = driver::train(&ws.paths().train, &config).unwrap();

    let first = driver::evaluate(&trainer, &ws.paths().test, &config).unwrap();
    let second = driver::evaluate(&trainer, &ws.paths().test, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn same_seed_same_training_outcome() {
    let ws = prepared("seeded", 40, 10);
    let config = TrainConfig { max_iterations: 100, ..TrainConfig::heart_default() };
    let (a, _) = driver::train(&ws.paths().train, &config).unwrap();
    let (b, _) = driver::train(&ws.paths().train, &config).unwrap();
    assert_eq!(a.network(), b.network());
}

#[test]
fn exported_model_matches_in_memory_network() {
    let ws = prepared("roundtrip", 60, 10);
    let config = TrainConfig { max_iterations: 300, ..TrainConfig::heart_default() };
    let (trainer, _) = driver::train(&ws.paths().train, &config).unwrap();

    let path = ws.paths().model;
    trainer.network().export(&path, &heart_nn::ModelMetadata::heart(&config)).unwrap();
    let model = ExportedModel::load(&path).unwrap();

    assert_eq!(model.graph().metadata.training.as_ref(), Some(&config));
    let in_memory = trainer.network().predict(&EXAMPLE_FEATURES).unwrap();
    let reloaded = model.eval(&EXAMPLE_FEATURES).unwrap();
    for (a, b) in in_memory.iter().zip(reloaded.iter()) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }
    assert!(matches!(model.eval(&[0.0; 11]), Err(HeartError::Shape { expected: 12, got: 11, .. })));
}

#[test]
fn test_set_size_mismatch_still_evaluates_every_record() {
    let ws = prepared("mismatch", 30, 120);
    let config = TrainConfig { max_iterations: 20, ..TrainConfig::heart_default() };
    let (trainer, _) = driver::train(&ws.paths().train, &config).unwrap();
    let eval = driver::evaluate(&trainer, &ws.paths().test, &config).unwrap();
    assert_eq!(eval.records, 120);

    ws.write(&ws.paths().test, &synthetic_ctf(7, 3));
    let eval = driver::evaluate(&trainer, &ws.paths().test, &config).unwrap();
    assert_eq!(eval.records, 7);
}

#[test]
fn missing_export_directory_is_fatal() {
    let ws = prepared("no-assets", 20, 5);
    std::fs::remove_dir_all(ws.root.join("assets")).unwrap();
    let config = TrainConfig { max_iterations: 10, ..TrainConfig::heart_default() };
    match driver::run(&ws.paths(), &config) {
        Err(HeartError::Io { path, .. }) => assert_eq!(path, ws.paths().model),
        other => panic!("expected io error, got {:?}", other.map(|s| s.iterations)),
    }
    assert!(!ws.root.join("assets").exists());
}

#[test]
fn missing_or_malformed_inputs_are_fatal() {
    let ws = Workspace::new("bad-input");
    let config = TrainConfig { max_iterations: 10, ..TrainConfig::heart_default() };

    assert!(matches!(driver::train(&ws.paths().train, &config), Err(HeartError::Io { .. })));

    ws.write(&ws.paths().train, "|features 1 2 3 |label 1 0\n");
    match driver::train(&ws.paths().train, &config) {
        Err(HeartError::Parse { line, .. }) => assert_eq!(line, 1),
        Err(other) => panic!("expected parse error, got {other}"),
        Ok(_) => panic!("expected parse error"),
    }

    ws.write(&ws.paths().train, "");
    assert!(matches!(driver::train(&ws.paths().train, &config), Err(HeartError::EmptyBatch)));
}

#[test]
fn non_finite_training_value_stops_the_run_before_export() {
    let ws = prepared("nan-train", 20, 5);
    let mut text = synthetic_ctf(20, 11);
    text.push_str("|features nan 0 0 0 0 0 0 0 0 0 0 0 |label 1 0\n");
    ws.write(&ws.paths().train, &text);
    let config = TrainConfig { max_iterations: 20, ..TrainConfig::heart_default() };

    match driver::run(&ws.paths(), &config) {
        Err(HeartError::Parse { line, message, .. }) => {
            assert_eq!(line, 21);
            assert!(message.contains("finite"), "{message}");
        }
        other => panic!("expected parse error, got {:?}", other.map(|s| s.iterations)),
    }
    assert!(!ws.paths().model.exists());
}
