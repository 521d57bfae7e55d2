//! Pre-configured checks whose traits and difficulty come from a definition.

use std::collections::HashMap;

use rc_core::{Entity, TraitSource};
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};
use crate::tables::{DifficultyRating, RuleTables, WeightTable};

/// Which kind of trait a difficulty rule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// A stat.
    Stat,
    /// A skill.
    Skill,
}

/// One step of a target-dependent difficulty rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyTier {
    /// Minimum target trait value for this tier.
    pub at_least: u32,
    /// Name of the difficulty rating this tier selects.
    pub rating: String,
}

/// How a scripted check picks its difficulty when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DifficultySource {
    /// Always the same rating.
    Fixed {
        /// Rating name.
        rating: String,
    },
    /// Chosen by one of the target's traits: the highest tier the target's
    /// value reaches, or the first tier if it reaches none.
    TargetTrait {
        /// Name of the trait read from the target.
        name: String,
        /// Stat or skill.
        kind: TraitKind,
        /// Tiers, in any order.
        tiers: Vec<DifficultyTier>,
    },
}

/// A named check with its traits, difficulty rule, and per-band outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDefinition {
    /// Display name (e.g. "Resist Poison").
    pub name: String,
    /// Stats rolled.
    pub stats: Vec<String>,
    /// Skills rolled.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Difficulty rule.
    pub difficulty: DifficultySource,
    /// Outcome text keyed by band name.
    #[serde(default)]
    pub outcomes: HashMap<String, String>,
}

impl CheckDefinition {
    /// Weighted contribution of every stat and skill in the definition.
    ///
    /// Stats use the stat-alone curve when the definition has no skills.
    pub fn trait_values(&self, actor: &Entity, weights: &dyn WeightTable) -> (i32, i32) {
        let stat_alone = self.skills.is_empty();
        let stats = self
            .stats
            .iter()
            .map(|s| weights.weighted_stat(actor.stat_value(s), stat_alone))
            .fold(0i32, i32::saturating_add);
        let skills = self
            .skills
            .iter()
            .map(|s| weights.weighted_skill(actor.skill_value(s)))
            .fold(0i32, i32::saturating_add);
        (stats, skills)
    }

    /// Resolve the difficulty against a target.
    pub fn difficulty_for(
        &self,
        target: &Entity,
        tables: &RuleTables,
    ) -> MechResult<DifficultyRating> {
        let name = match &self.difficulty {
            DifficultySource::Fixed { rating } => rating.as_str(),
            DifficultySource::TargetTrait { name, kind, tiers } => {
                let value = match kind {
                    TraitKind::Stat => target.stat_value(name),
                    TraitKind::Skill => target.skill_value(name),
                };
                let first = tiers.first().ok_or_else(|| {
                    MechError::InvalidConfig(format!("check '{}' has no difficulty tiers", self.name))
                })?;
                tiers
                    .iter()
                    .filter(|t| t.at_least <= value)
                    .max_by_key(|t| t.at_least)
                    .unwrap_or(first)
                    .rating
                    .as_str()
            }
        };
        tables.require_difficulty(name).cloned()
    }

    /// Outcome text for a band, if the definition has one.
    pub fn outcome_for(&self, band: &str) -> Option<&str> {
        self.outcomes.get(band).map(String::as_str)
    }

    /// Stat names as string slices.
    pub fn stat_names(&self) -> Vec<&str> {
        self.stats.iter().map(String::as_str).collect()
    }

    /// Skill names as string slices.
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(String::as_str).collect()
    }
}

impl std::fmt::Display for CheckDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
