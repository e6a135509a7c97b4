/// Scores one patient with a previously exported model.
///
/// Run the trainer first (`cargo run --release`) so that assets/Heart.json
/// exists, then:
///   cargo run --example predict

use std::path::Path;

use heart_nn::features::{disease_probability, ChestPain, ExerciseSlope, PatientRecord, Thal};
use heart_nn::{logging, ExportedModel};

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let model_path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join("Heart.json");
    let model = ExportedModel::load(&model_path)?;

    let patient = PatientRecord {
        thal: Thal::Normal,
        chest_pain: ChestPain::NonAnginalPain,
        major_vessels: 2,
        st_depression: 1.0,
        exercise_angina: false,
        max_heart_rate: 180.0,
        exercise_slope: ExerciseSlope::Flat,
        age: 60.0,
    };

    let probs = model.eval(&patient.to_features())?;
    let disease = disease_probability(&probs)?;
    println!("Yes: {:.2}%, No: {:.2}%", disease * 100.0, (1.0 - disease) * 100.0);
    println!("Probability of Heart Disease is {:.2}%", disease * 100.0);
    Ok(())
}
