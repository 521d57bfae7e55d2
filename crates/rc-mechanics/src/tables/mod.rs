//! Rule tables: the read-only reference data every check is weighed against.
//!
//! A [`RuleTables`] bundles the weight curves, difficulty ratings, natural
//! roll thresholds, and result bands. It is built once (from
//! [`RuleTables::preset`] or a JSON document) and passed by reference into
//! every roll, never reached through global state.

pub mod bands;
pub mod preset;
pub mod rating;
pub mod weights;

pub use bands::{Polarity, RenderContext, RollResultBand};
pub use rating::{DifficultyRating, NaturalKind, NaturalRollType};
pub use weights::{StatWeights, WeightTable, WeightTier};

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Deserialize;

use crate::error::{MechError, MechResult};

/// The complete set of lookup tables for resolving checks.
#[derive(Clone)]
pub struct RuleTables {
    weights: Arc<dyn WeightTable>,
    difficulties: Vec<DifficultyRating>,
    naturals: Vec<NaturalRollType>,
    bands: Vec<RollResultBand>,
}

impl RuleTables {
    /// Build and validate a set of tables.
    ///
    /// Bands are sorted by ceiling. Validation rejects: no difficulty
    /// ratings, duplicate rating or band names, anything other than exactly
    /// one open-ended top band, repeated ceilings, no failure band, and
    /// natural thresholds outside 1-100.
    pub fn new(
        weights: impl WeightTable + 'static,
        difficulties: Vec<DifficultyRating>,
        naturals: Vec<NaturalRollType>,
        mut bands: Vec<RollResultBand>,
    ) -> MechResult<Self> {
        if difficulties.is_empty() {
            return Err(MechError::InvalidConfig(
                "at least one difficulty rating is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for rating in &difficulties {
            if !seen.insert(rating.name.to_lowercase()) {
                return Err(MechError::InvalidConfig(format!(
                    "duplicate difficulty rating: {}",
                    rating.name
                )));
            }
        }
        let difficulties = difficulties
            .into_iter()
            .map(|r| DifficultyRating::new(&r.name, r.value))
            .collect();

        if let Some(bad) = naturals
            .iter()
            .find(|n| !(1..=100).contains(&n.threshold))
        {
            return Err(MechError::InvalidConfig(format!(
                "natural roll threshold out of range: {} ({})",
                bad.name, bad.threshold
            )));
        }

        validate_bands(&mut bands)?;

        Ok(Self {
            weights: Arc::new(weights),
            difficulties,
            naturals,
            bands,
        })
    }

    /// Load tables from a JSON document.
    ///
    /// The document has `weights`, `difficulties`, `naturals`, and `bands`
    /// keys shaped like the corresponding Rust types.
    pub fn from_json(json: &str) -> MechResult<Self> {
        let doc: TablesDoc = serde_json::from_str(json)?;
        Self::new(
            doc.weights.normalized(),
            doc.difficulties,
            doc.naturals,
            doc.bands,
        )
    }

    /// The built-in tables.
    pub fn preset() -> Self {
        preset::standard()
    }

    /// The weight curves.
    pub fn weights(&self) -> &dyn WeightTable {
        self.weights.as_ref()
    }

    // -----------------------------------------------------------------------
    // Difficulty ratings
    // -----------------------------------------------------------------------

    /// Look up a difficulty rating by name (case-insensitive).
    pub fn difficulty(&self, name: &str) -> Option<&DifficultyRating> {
        let name = name.trim().to_lowercase();
        self.difficulties.iter().find(|r| r.name == name)
    }

    /// Look up a difficulty rating by name, or fail.
    pub fn require_difficulty(&self, name: &str) -> MechResult<&DifficultyRating> {
        self.difficulty(name)
            .ok_or_else(|| MechError::UnknownDifficulty(name.to_string()))
    }

    /// All difficulty ratings in their defined order.
    pub fn difficulties(&self) -> &[DifficultyRating] {
        &self.difficulties
    }

    /// The first rating in defined order; used when a check has no rating of its own.
    pub fn default_difficulty(&self) -> &DifficultyRating {
        &self.difficulties[0]
    }

    // -----------------------------------------------------------------------
    // Natural rolls
    // -----------------------------------------------------------------------

    /// Classify a raw d100 draw. The first matching entry wins.
    pub fn classify_natural(&self, raw: u32) -> Option<&NaturalRollType> {
        self.naturals.iter().find(|n| n.matches(raw))
    }

    // -----------------------------------------------------------------------
    // Result bands
    // -----------------------------------------------------------------------

    /// The band enclosing a net value, with its ordinal.
    pub fn band_for_value(&self, net: i32) -> (usize, &RollResultBand) {
        let ordinal = self
            .bands
            .iter()
            .position(|b| b.covers(net))
            .unwrap_or(self.bands.len() - 1);
        (ordinal, &self.bands[ordinal])
    }

    /// A failure band chosen uniformly at random, with its ordinal.
    pub fn random_failure_band(&self, rng: &mut StdRng) -> (usize, &RollResultBand) {
        let failures: Vec<usize> = self
            .bands
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_success())
            .map(|(i, _)| i)
            .collect();
        let ordinal = failures[rng.random_range(0..failures.len())];
        (ordinal, &self.bands[ordinal])
    }

    /// All bands, lowest first.
    pub fn bands(&self) -> &[RollResultBand] {
        &self.bands
    }
}

impl std::fmt::Debug for RuleTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleTables")
            .field("difficulties", &self.difficulties)
            .field("naturals", &self.naturals)
            .field("bands", &self.bands)
            .finish_non_exhaustive()
    }
}

impl Default for RuleTables {
    fn default() -> Self {
        preset::standard()
    }
}

#[derive(Deserialize)]
struct TablesDoc {
    weights: StatWeights,
    difficulties: Vec<DifficultyRating>,
    #[serde(default)]
    naturals: Vec<NaturalRollType>,
    bands: Vec<RollResultBand>,
}

fn validate_bands(bands: &mut [RollResultBand]) -> MechResult<()> {
    let open = bands.iter().filter(|b| b.ceiling.is_none()).count();
    if open != 1 {
        return Err(MechError::InvalidConfig(format!(
            "exactly one band must have no ceiling, found {open}"
        )));
    }
    // `None` sorts last with this key.
    bands.sort_by_key(|b| (b.ceiling.is_none(), b.ceiling));

    for pair in bands.windows(2) {
        if let (Some(a), Some(b)) = (pair[0].ceiling, pair[1].ceiling) {
            if a == b {
                return Err(MechError::InvalidConfig(format!(
                    "bands '{}' and '{}' share ceiling {a}",
                    pair[0].name, pair[1].name
                )));
            }
        }
    }

    let mut names = HashSet::new();
    for band in bands.iter() {
        if !names.insert(band.name.to_lowercase()) {
            return Err(MechError::InvalidConfig(format!(
                "duplicate band: {}",
                band.name
            )));
        }
    }

    if bands.iter().all(|b| b.is_success()) {
        return Err(MechError::InvalidConfig(
            "at least one failure band is required".to_string(),
        ));
    }
    Ok(())
}
