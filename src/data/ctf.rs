//! Reader for the CNTK text format (CTF) used by the heart-disease datasets.
//!
//! Format, one record per line:
//! - optional leading sequence id (anything before the first `|`), ignored
//! - one or more named fields: `|name v1 v2 ...`, values whitespace-separated
//! - field order within a line is free
//! - blank lines and lines starting with `#` are skipped, as are `|#` comment
//!   segments within a line
//! - values must be finite; `nan` and `inf` are rejected
//!
//! Example: `|features 1 0 0 0 1 2 0.03 0 0.83 0 1 0.64 |label 1 0`

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::error::{HeartError, Result};
use crate::math::matrix::Matrix;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One labeled observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub features: Vec<f64>,
    pub label: Vec<f64>,
}

/// A named dense stream and its fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDef {
    pub field: String,
    pub dim: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtfSchema {
    pub features: StreamDef,
    pub label: StreamDef,
}

impl CtfSchema {
    pub fn new(feature_dim: usize, label_dim: usize) -> CtfSchema {
        CtfSchema {
            features: StreamDef { field: "features".to_string(), dim: feature_dim },
            label: StreamDef { field: "label".to_string(), dim: label_dim },
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Reads and parses a whole CTF file. The file handle is released before
/// this returns.
pub fn read_ctf(path: &Path, schema: &CtfSchema) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| HeartError::io(path, e))?;
    parse_ctf(&text, schema, path)
}

/// Parses CTF text. `origin` is only used to label errors.
pub fn parse_ctf(text: &str, schema: &CtfSchema, origin: &Path) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push(parse_line(line, schema).map_err(|message| HeartError::Parse {
            path: origin.to_path_buf(),
            line: idx + 1,
            message,
        })?);
    }
    Ok(records)
}

fn parse_line(line: &str, schema: &CtfSchema) -> std::result::Result<Record, String> {
    let mut features: Option<Vec<f64>> = None;
    let mut label: Option<Vec<f64>> = None;

    // Everything before the first '|' is the sequence id.
    let mut segments = line.split('|');
    segments.next();

    for segment in segments {
        let mut tokens = segment.split_whitespace();
        let name = match tokens.next() {
            Some(name) => name,
            None => return Err("empty field marker '|'".to_string()),
        };
        // `|#...` runs to the next '|'.
        if name.starts_with('#') {
            continue;
        }
        let values = tokens
            .map(|t| parse_value(name, t))
            .collect::<std::result::Result<Vec<f64>, String>>()?;

        let (stream, slot) = if name == schema.features.field {
            (&schema.features, &mut features)
        } else if name == schema.label.field {
            (&schema.label, &mut label)
        } else {
            return Err(format!("unknown field '{name}'"));
        };
        if values.len() != stream.dim {
            return Err(format!(
                "field '{name}' has {} values, expected {}",
                values.len(),
                stream.dim
            ));
        }
        if slot.is_some() {
            return Err(format!("field '{name}' appears twice"));
        }
        *slot = Some(values);
    }

    match (features, label) {
        (Some(features), Some(label)) => Ok(Record { features, label }),
        (None, _) => Err(format!("missing field '{}'", schema.features.field)),
        (_, None) => Err(format!("missing field '{}'", schema.label.field)),
    }
}

fn parse_value(name: &str, token: &str) -> std::result::Result<f64, String> {
    let v = token
        .parse::<f64>()
        .map_err(|_| format!("field '{name}': '{token}' is not a valid number"))?;
    if !v.is_finite() {
        return Err(format!("field '{name}': '{token}' is not a finite number"));
    }
    Ok(v)
}

// ---------------------------------------------------------------------------
// Minibatch streaming
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Randomize {
    /// Re-permute the records at the start of every sweep.
    Shuffled,
    /// Keep file order.
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweeps {
    Infinite,
    Limited(usize),
}

/// A group of records stacked as matrices, one record per row.
#[derive(Debug, Clone)]
pub struct Minibatch {
    pub features: Matrix,
    pub labels: Matrix,
}

impl Minibatch {
    pub fn from_records(records: &[&Record]) -> Minibatch {
        Minibatch {
            features: Matrix::from_data(records.iter().map(|r| r.features.clone()).collect()),
            labels: Matrix::from_data(records.iter().map(|r| r.label.clone()).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.features.rows
    }

    pub fn is_empty(&self) -> bool {
        self.features.rows == 0
    }
}

/// Serves minibatches from a CTF file, repeating it for the configured number
/// of sweeps.
pub struct MinibatchSource {
    records: Vec<Record>,
    order: Vec<usize>,
    cursor: usize,
    sweeps_started: usize,
    randomize: Randomize,
    sweeps: Sweeps,
    rng: StdRng,
}

impl MinibatchSource {
    pub fn open(
        path: &Path,
        schema: &CtfSchema,
        randomize: Randomize,
        sweeps: Sweeps,
        seed: u64,
    ) -> Result<MinibatchSource> {
        let records = read_ctf(path, schema)?;
        debug!(path = %path.display(), records = records.len(), "opened minibatch source");
        Ok(MinibatchSource::from_records(records, randomize, sweeps, seed))
    }

    pub fn from_records(
        records: Vec<Record>,
        randomize: Randomize,
        sweeps: Sweeps,
        seed: u64,
    ) -> MinibatchSource {
        let order = (0..records.len()).collect();
        MinibatchSource {
            records,
            order,
            cursor: 0,
            sweeps_started: 0,
            randomize,
            sweeps,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Records in one sweep.
    pub fn sweep_len(&self) -> usize {
        self.records.len()
    }

    /// Starts a new sweep if the current one is used up and the sweep budget
    /// allows. Returns false once the source is exhausted.
    fn ensure_sweep(&mut self) -> bool {
        if self.records.is_empty() {
            return false;
        }
        if self.sweeps_started > 0 && self.cursor < self.order.len() {
            return true;
        }
        if let Sweeps::Limited(max) = self.sweeps {
            if self.sweeps_started >= max {
                return false;
            }
        }
        if self.randomize == Randomize::Shuffled {
            self.order.shuffle(&mut self.rng);
        }
        self.cursor = 0;
        self.sweeps_started += 1;
        true
    }

    /// Returns up to `n` records. With infinite sweeps the batch is always
    /// full and may straddle a sweep boundary; with limited sweeps a request
    /// larger than what remains yields the remainder. `None` once exhausted.
    pub fn next_minibatch(&mut self, n: usize) -> Option<Minibatch> {
        let mut picked: Vec<usize> = Vec::with_capacity(n);
        while picked.len() < n && self.ensure_sweep() {
            let take = (n - picked.len()).min(self.order.len() - self.cursor);
            picked.extend_from_slice(&self.order[self.cursor..self.cursor + take]);
            self.cursor += take;
        }
        if picked.is_empty() {
            return None;
        }
        let records: Vec<&Record> = picked.iter().map(|&i| &self.records[i]).collect();
        Some(Minibatch::from_records(&records))
    }
}
