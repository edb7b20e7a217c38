use anyhow::Context;
use hanatrace_core::{ActionTable, ColorMap};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Translation tables shipped alongside the dataset: one description per
/// raw action code and one display name per color index.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConstants {
    #[serde(rename = "ACTION_DESCRIPTIONS")]
    pub action_descriptions: Vec<String>,
    #[serde(rename = "COLOR_MAP")]
    pub color_map: HashMap<String, String>,
}

impl LoggingConstants {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("parse logging constants")
    }

    pub fn action_table(&self) -> ActionTable {
        ActionTable::new(self.action_descriptions.clone())
    }

    /// JSON object keys arrive as strings; color indices are parsed back
    /// to integers here.
    pub fn color_map(&self) -> anyhow::Result<ColorMap> {
        let mut names = BTreeMap::new();
        for (key, name) in &self.color_map {
            let idx: u8 = key
                .parse()
                .with_context(|| format!("color map key {key:?} is not a color index"))?;
            names.insert(idx, name.clone());
        }
        Ok(ColorMap::new(names))
    }
}

pub fn load_constants(path: &Path) -> anyhow::Result<(ActionTable, ColorMap)> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let constants = LoggingConstants::parse(&raw)?;
    Ok((constants.action_table(), constants.color_map()?))
}
