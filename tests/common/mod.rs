#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use heart_nn::DriverPaths;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// A scratch directory laid out like the crate root (`data/`, `assets/`).
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(name: &str) -> Workspace {
        let root = std::env::temp_dir().join(format!("heart-nn-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("data")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        Workspace { root }
    }

    pub fn paths(&self) -> DriverPaths {
        DriverPaths::from_root(&self.root)
    }

    pub fn write(&self, path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// `n` CTF lines with 12 features in [0, 1]. Records whose vessel-count and
/// age columns are large are labelled "disease" (`1 0`).
pub fn synthetic_ctf(n: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = String::new();
    for _ in 0..n {
        let features: Vec<f64> = (0..12).map(|_| rng.gen_range(0.0..1.0)).collect();
        let disease = features[5] + features[11] > 1.0;
        let label = if disease { "1 0" } else { "0 1" };
        let cells: Vec<String> = features.iter().map(|x| format!("{x:.6}")).collect();
        writeln!(out, "|features {} |label {}", cells.join(" "), label).unwrap();
    }
    out
}
