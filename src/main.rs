// Trains the heart-disease classifier with fixed hyper-parameters, exports it
// to assets/Heart.json and reports test accuracy. Takes no arguments; paths
// are fixed relative to the crate root.
use anyhow::Context;
use heart_nn::{driver, logging, DriverPaths, TrainConfig};

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    println!("\nBegin binary classification (two-node technique)\n");

    let paths = DriverPaths::crate_layout();
    let config = TrainConfig::heart_default();

    driver::run(&paths, &config)
        .with_context(|| format!("training run over '{}' failed", paths.train.display()))?;

    println!("\nEnd Cleveland Heart Disease classification");
    Ok(())
}
