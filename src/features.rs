//! Encoding of clinical attributes into the 12-element feature vector.
//!
//! The network only checks vector length, so a vector assembled in the wrong
//! order still "works" and silently predicts garbage. `PatientRecord` keeps
//! the layout in one place:
//!
//! | index | attribute                         | encoding                       |
//! |-------|-----------------------------------|--------------------------------|
//! | 0..2  | thallium stress test (`thal`)     | effects-coded, 2 columns       |
//! | 2..5  | chest pain type (`cp`)            | effects-coded, 3 columns       |
//! | 5     | major vessels coloured (`ca`)     | raw count 0..=3                |
//! | 6     | ST depression (`oldpeak`)         | clamped to [0.8, 6.2], scaled  |
//! | 7     | exercise induced angina (`exang`) | 0 / 1                          |
//! | 8     | max heart rate (`thalach`)        | clamped to [71, 202], scaled   |
//! | 9..11 | slope of peak exercise ST         | effects-coded, 2 columns       |
//! | 11    | age                               | clamped to [29, 77], scaled    |

use serde::{Deserialize, Serialize};

use crate::error::{HeartError, Result};

pub const FEATURE_COUNT: usize = 12;

const ST_DEPRESSION_RANGE: (f64, f64) = (0.8, 6.2);
const MAX_HEART_RATE_RANGE: (f64, f64) = (71.0, 202.0);
const AGE_RANGE: (f64, f64) = (29.0, 77.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thal {
    ReversibleDefect,
    Normal,
    FixedDefect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChestPain {
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseSlope {
    Flat,
    Upsloping,
    Downsloping,
}

/// The attributes a prediction needs, in clinical units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub thal: Thal,
    pub chest_pain: ChestPain,
    /// Number of major vessels coloured by fluoroscopy, 0..=3.
    pub major_vessels: u8,
    /// ST depression induced by exercise relative to rest, in mm.
    pub st_depression: f64,
    pub exercise_angina: bool,
    /// Maximum heart rate achieved, in bpm.
    pub max_heart_rate: f64,
    pub exercise_slope: ExerciseSlope,
    /// Age in years.
    pub age: f64,
}

impl Thal {
    fn encode(self) -> [f64; 2] {
        match self {
            Thal::ReversibleDefect => [0.0, 1.0],
            Thal::Normal => [1.0, 0.0],
            Thal::FixedDefect => [-1.0, -1.0],
        }
    }
}

impl ChestPain {
    fn encode(self) -> [f64; 3] {
        match self {
            ChestPain::TypicalAngina => [1.0, 0.0, 0.0],
            ChestPain::AtypicalAngina => [0.0, 1.0, 0.0],
            ChestPain::NonAnginalPain => [0.0, 0.0, 1.0],
            ChestPain::Asymptomatic => [-1.0, -1.0, -1.0],
        }
    }
}

impl ExerciseSlope {
    fn encode(self) -> [f64; 2] {
        match self {
            ExerciseSlope::Flat => [0.0, 1.0],
            ExerciseSlope::Upsloping => [1.0, 0.0],
            ExerciseSlope::Downsloping => [-1.0, -1.0],
        }
    }
}

/// Clamps to `[min, max]` and rescales to `[0, 1]`.
fn min_max((min, max): (f64, f64), value: f64) -> f64 {
    (value.clamp(min, max) - min) / (max - min)
}

impl PatientRecord {
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        let thal = self.thal.encode();
        let cp = self.chest_pain.encode();
        let slope = self.exercise_slope.encode();
        [
            thal[0],
            thal[1],
            cp[0],
            cp[1],
            cp[2],
            f64::from(self.major_vessels),
            min_max(ST_DEPRESSION_RANGE, self.st_depression),
            if self.exercise_angina { 1.0 } else { 0.0 },
            min_max(MAX_HEART_RATE_RANGE, self.max_heart_rate),
            slope[0],
            slope[1],
            min_max(AGE_RANGE, self.age),
        ]
    }
}

/// Probability of the "disease present" class from a softmax output.
pub fn disease_probability(probabilities: &[f64]) -> Result<f64> {
    match probabilities {
        [disease, _] => Ok(*disease),
        _ => Err(HeartError::shape("class probabilities", 2, probabilities.len())),
    }
}
