//! Difficulty ratings and natural-roll classification.

use serde::{Deserialize, Serialize};

/// A named difficulty tier whose value is subtracted from a roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRating {
    /// Lowercase name (e.g. "hard").
    pub name: String,
    /// Penalty subtracted from the roll.
    pub value: i32,
}

impl DifficultyRating {
    /// Create a rating. The name is normalized to lowercase.
    pub fn new(name: &str, value: i32) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            value,
        }
    }
}

impl std::fmt::Display for DifficultyRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Whether a natural roll is exceptional in the good or the bad direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaturalKind {
    /// Matches raw draws at or above the threshold.
    Critical,
    /// Matches raw draws at or below the threshold.
    Botch,
}

/// Classification of a raw d100 draw, independent of modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalRollType {
    /// Display name (e.g. "critical success").
    pub name: String,
    /// Threshold on the raw draw.
    pub threshold: u32,
    /// Direction of the threshold.
    pub kind: NaturalKind,
    /// Text substituted for `{natural}` in band templates.
    #[serde(default)]
    pub message: String,
}

impl NaturalRollType {
    /// Returns true if a raw draw falls into this classification.
    pub fn matches(&self, raw: u32) -> bool {
        match self.kind {
            NaturalKind::Critical => raw >= self.threshold,
            NaturalKind::Botch => raw <= self.threshold,
        }
    }

    /// Returns true for critical classifications.
    pub fn is_critical(&self) -> bool {
        self.kind == NaturalKind::Critical
    }

    /// Returns true for botch classifications.
    pub fn is_botch(&self) -> bool {
        self.kind == NaturalKind::Botch
    }
}

impl std::fmt::Display for NaturalRollType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
