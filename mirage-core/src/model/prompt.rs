use crate::model::ModelChoice;
use crate::utils::{LUCY_PROMPTS, MIRAGE_PROMPTS};
use serde::{Deserialize, Serialize};

/// One selectable prompt: a short display key and the instruction sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    pub key: String,
    pub instruction: String,
}

impl PromptEntry {
    pub fn new(key: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            instruction: instruction.into(),
        }
    }
}

/// Ordered list of prompts for a single model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTable {
    entries: Vec<PromptEntry>,
}

impl PromptTable {
    pub fn new(entries: Vec<PromptEntry>) -> Self {
        Self { entries }
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(key, instruction)| PromptEntry::new(*key, *instruction))
                .collect(),
        )
    }

    pub fn mirage() -> Self {
        Self::from_pairs(MIRAGE_PROMPTS)
    }

    pub fn lucy() -> Self {
        Self::from_pairs(LUCY_PROMPTS)
    }

    pub fn for_model(model: ModelChoice) -> Self {
        match model {
            ModelChoice::Mirage => Self::mirage(),
            ModelChoice::Lucy => Self::lucy(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PromptEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptEntry> {
        self.entries.iter()
    }

    /// Index one step away from `index`, wrapping at both ends.
    /// Returns `None` for an empty table.
    pub fn step(&self, index: usize, forward: bool) -> Option<usize> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let index = index % len;
        Some(if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        })
    }
}
