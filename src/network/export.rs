//! Portable model interchange.
//!
//! A trained [`Network`] is exported as a JSON operator graph: an ordered list
//! of nodes (`gemm`, element-wise activations, `softmax`) with the learned
//! parameters stored inline. The graph is self-describing, so it can be
//! evaluated without the crate's training types via [`ExportedModel`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation::activation::{softmax, ActivationFunction};
use crate::error::{HeartError, Result};
use crate::network::metadata::ModelMetadata;
use crate::network::network::Network;

pub const FORMAT_NAME: &str = "heart-nn-graph";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensorInfo {
    pub name: String,
    pub dim: usize,
}

/// One operator in the exported graph. Nodes run in list order, each
/// consuming the previous node's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Node {
    /// `y = x·weight + bias`; `weight` is (in, out).
    Gemm {
        name: String,
        weight: Vec<Vec<f64>>,
        bias: Vec<f64>,
    },
    Tanh { name: String },
    Softmax { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGraph {
    pub format: String,
    pub version: u32,
    pub producer: String,
    pub input: TensorInfo,
    pub output: TensorInfo,
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub metadata: ModelMetadata,
}

impl ModelGraph {
    /// Lowers `network` to affine/activation nodes and appends a softmax.
    pub fn from_network(network: &Network, metadata: ModelMetadata) -> ModelGraph {
        let last = network.layers.len().saturating_sub(1);
        let mut nodes = Vec::with_capacity(network.layers.len() * 2 + 1);
        for (i, layer) in network.layers.iter().enumerate() {
            let name = if i == last {
                "outLayer".to_string()
            } else if last == 1 {
                "hidLayer".to_string()
            } else {
                format!("hidLayer{i}")
            };
            nodes.push(Node::Gemm {
                name: name.clone(),
                weight: layer.weights.data.clone(),
                bias: layer.biases.data[0].clone(),
            });
            match layer.activator {
                ActivationFunction::Identity => {}
                ActivationFunction::Tanh => nodes.push(Node::Tanh { name: format!("{name}_tanh") }),
            }
        }
        nodes.push(Node::Softmax { name: "softmax".to_string() });

        ModelGraph {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            producer: format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            input: TensorInfo { name: "features".to_string(), dim: network.input_dim },
            output: TensorInfo { name: "probabilities".to_string(), dim: network.output_dim() },
            nodes,
            metadata,
        }
    }

    /// Serializes the graph to a pretty-printed JSON file. Fails if the
    /// parent directory does not exist.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| HeartError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| HeartError::io(path, e))
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ModelGraph> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| HeartError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Checks format tag, dimension chaining, and that every parameter is
    /// finite.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.format != FORMAT_NAME {
            return Err(format!("unknown format '{}'", self.format));
        }
        if self.version != FORMAT_VERSION {
            return Err(format!("unsupported version {}", self.version));
        }
        if self.input.dim == 0 {
            return Err("input dim must be > 0".to_string());
        }
        if self.nodes.is_empty() {
            return Err("graph has no nodes".to_string());
        }

        let mut width = self.input.dim;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Gemm { name, weight, bias } = node {
                if weight.len() != width {
                    return Err(format!(
                        "node[{idx}] '{name}' expects {} inputs, previous width is {width}",
                        weight.len()
                    ));
                }
                let out = bias.len();
                if out == 0 {
                    return Err(format!("node[{idx}] '{name}' has no outputs"));
                }
                if let Some(r) = weight.iter().position(|row| row.len() != out) {
                    return Err(format!(
                        "node[{idx}] '{name}' weight row {r} has {} columns, bias has {out}",
                        weight[r].len()
                    ));
                }
                if weight.iter().flatten().chain(bias.iter()).any(|v| !v.is_finite()) {
                    return Err(format!("node[{idx}] '{name}' contains non-finite values"));
                }
                width = out;
            }
        }
        if width != self.output.dim {
            return Err(format!("graph produces {width} outputs, header declares {}", self.output.dim));
        }
        Ok(())
    }
}

/// A validated graph ready for inference.
#[derive(Debug, Clone)]
pub struct ExportedModel {
    graph: ModelGraph,
}

impl ExportedModel {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ExportedModel> {
        ExportedModel::from_graph(ModelGraph::load_json(path)?)
    }

    pub fn from_graph(graph: ModelGraph) -> Result<ExportedModel> {
        graph.validate().map_err(HeartError::InvalidModel)?;
        Ok(ExportedModel { graph })
    }

    pub fn graph(&self) -> &ModelGraph {
        &self.graph
    }

    /// Evaluates the graph on one record.
    pub fn eval(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.graph.input.dim {
            return Err(HeartError::shape("feature vector", self.graph.input.dim, features.len()));
        }
        let mut x = features.to_vec();
        for node in &self.graph.nodes {
            x = match node {
                Node::Gemm { weight, bias, .. } => {
                    let mut y = bias.clone();
                    for (xi, row) in x.iter().zip(weight.iter()) {
                        for (yj, w) in y.iter_mut().zip(row.iter()) {
                            *yj += xi * w;
                        }
                    }
                    y
                }
                Node::Tanh { .. } => x.iter().map(|v| v.tanh()).collect(),
                Node::Softmax { .. } => softmax(&x),
            };
        }
        Ok(x)
    }
}
