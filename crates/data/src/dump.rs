use crate::dataset::int_values;
use anyhow::{bail, Context};
use safetensors::SafeTensors;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Raw, rule-free view of every tensor in a dataset file, for dumping
/// games to JSON exactly as they are stored.
#[derive(Debug, Clone)]
pub struct RawTensors {
    tensors: Vec<RawTensor>,
}

#[derive(Debug, Clone)]
struct RawTensor {
    name: String,
    dtype: String,
    shape: Vec<usize>,
    values: Vec<i64>,
}

impl RawTensors {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let buffer = fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_bytes(&buffer).with_context(|| format!("load {}", path.display()))
    }

    pub fn from_bytes(buffer: &[u8]) -> anyhow::Result<Self> {
        let file = SafeTensors::deserialize(buffer).context("parse safetensors")?;
        let mut tensors = Vec::with_capacity(file.len());
        for (name, view) in file.tensors() {
            let values = int_values(&view).with_context(|| format!("tensor {name}"))?;
            tensors.push(RawTensor {
                name,
                dtype: format!("{:?}", view.dtype()),
                shape: view.shape().to_vec(),
                values,
            });
        }
        tensors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { tensors })
    }

    /// One description line per tensor, mirroring the dataset header.
    pub fn shape_lines(&self) -> Vec<String> {
        self.tensors
            .iter()
            .map(|tensor| {
                format!(
                    "{}: shape={:?}, dtype={}",
                    tensor.name, tensor.shape, tensor.dtype
                )
            })
            .collect()
    }

    /// Number of games, taken from the leading dimension of the first
    /// batched tensor.
    pub fn num_games(&self) -> anyhow::Result<usize> {
        self.tensors
            .iter()
            .find_map(|tensor| tensor.shape.first().copied())
            .context("dataset holds no batched tensors")
    }

    /// Extracts game `idx` as a JSON object: scalar tensors verbatim,
    /// batched tensors as the nested lists of their `idx`-th entry.
    pub fn extract_game(&self, idx: usize) -> anyhow::Result<Value> {
        let mut game = Map::new();
        for tensor in &self.tensors {
            let value = match tensor.shape.split_first() {
                None => nest(&tensor.values, &[]),
                Some((&games, entry_shape)) => {
                    if idx >= games {
                        bail!(
                            "game index {idx} is out of bounds for tensor {} with {games} games",
                            tensor.name
                        );
                    }
                    let block: usize = entry_shape.iter().product();
                    nest(&tensor.values[idx * block..(idx + 1) * block], entry_shape)
                }
            };
            game.insert(tensor.name.clone(), value);
        }
        Ok(Value::Object(game))
    }
}

fn nest(values: &[i64], shape: &[usize]) -> Value {
    match shape.split_first() {
        None => Value::from(values[0]),
        Some((&n, rest)) => {
            let block: usize = rest.iter().product();
            Value::Array(
                (0..n)
                    .map(|i| nest(&values[i * block..(i + 1) * block], rest))
                    .collect(),
            )
        }
    }
}
