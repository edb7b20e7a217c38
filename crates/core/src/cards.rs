use crate::TraceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub color: u8,
    pub rank: u8,
}

impl Card {
    pub fn new(color: u8, rank: u8) -> Self {
        Self { color, rank }
    }

    /// Rank as players see it: stored 0-based, shown 1-based.
    pub fn face_rank(&self) -> u8 {
        self.rank + 1
    }

    pub fn render(&self, colors: &ColorMap) -> Result<String, TraceError> {
        Ok(format!("{} {}", colors.name(self.color)?, self.face_rank()))
    }
}

/// Color index to display name, in index order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColorMap(BTreeMap<u8, String>);

impl ColorMap {
    pub fn new(names: BTreeMap<u8, String>) -> Self {
        Self(names)
    }

    pub fn name(&self, color: u8) -> Result<&str, TraceError> {
        self.0
            .get(&color)
            .map(String::as_str)
            .ok_or(TraceError::UnknownColor(color))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.0.iter().map(|(idx, name)| (*idx, name.as_str()))
    }

    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Display text for each raw action code, indexed by code.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionTable(Vec<String>);

impl ActionTable {
    pub fn new(descriptions: Vec<String>) -> Self {
        Self(descriptions)
    }

    pub fn describe(&self, code: i64) -> Result<&str, TraceError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.0.get(idx))
            .map(String::as_str)
            .ok_or(TraceError::UnknownAction(code))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
