//! The built-in rule tables.
//!
//! These produce the same [`RuleTables`] a JSON document with the same
//! values would, without requiring one.

use std::sync::Arc;

use super::{
    DifficultyRating, NaturalKind, NaturalRollType, Polarity, RollResultBand, RuleTables,
    StatWeights, WeightTier,
};

/// Standard weight curves.
///
/// A stat rolled alone counts double compared to a stat paired with a
/// skill. Skills taper off above 5.
pub fn standard_weights() -> StatWeights {
    StatWeights {
        only_stat: vec![WeightTier::new(0, 10)],
        stat: vec![WeightTier::new(0, 5)],
        skill: vec![WeightTier::new(0, 5), WeightTier::new(5, 3)],
        knack: vec![WeightTier::new(0, 5)],
    }
}

/// Difficulty ratings from "easy" to "legendary".
pub fn standard_difficulties() -> Vec<DifficultyRating> {
    [
        ("easy", 10),
        ("normal", 25),
        ("hard", 40),
        ("daunting", 55),
        ("formidable", 70),
        ("legendary", 90),
    ]
    .into_iter()
    .map(|(name, value)| DifficultyRating::new(name, value))
    .collect()
}

/// A natural 98+ is critical, a natural 1-2 is a botch.
pub fn standard_naturals() -> Vec<NaturalRollType> {
    vec![
        NaturalRollType {
            name: "critical success".to_string(),
            threshold: 98,
            kind: NaturalKind::Critical,
            message: " *Critical!*".to_string(),
        },
        NaturalRollType {
            name: "botch".to_string(),
            threshold: 2,
            kind: NaturalKind::Botch,
            message: " *Botch!*".to_string(),
        },
    ]
}

/// Result bands from "disaster" to "legendary success", lowest first.
pub fn standard_bands() -> Vec<RollResultBand> {
    let band = |name: &str, ceiling: Option<i32>, polarity, template: &str| RollResultBand {
        name: name.to_string(),
        ceiling,
        polarity,
        template: template.to_string(),
    };
    vec![
        band(
            "disaster",
            Some(-60),
            Polarity::Failure,
            "{character} meets with |rdisaster|n.{natural}",
        ),
        band(
            "abject failure",
            Some(-30),
            Polarity::Failure,
            "{character} fails |rabjectly|n.{natural}",
        ),
        band(
            "failure",
            Some(-1),
            Polarity::Failure,
            "{character} |rfails|n.{natural}",
        ),
        band(
            "marginal success",
            Some(20),
            Polarity::Success,
            "{character} is |ymarginally successful|n.{natural}",
        ),
        band(
            "success",
            Some(45),
            Polarity::Success,
            "{character} is |gsuccessful|n.{natural}",
        ),
        band(
            "good success",
            Some(70),
            Polarity::Success,
            "{character} is |gvery successful|n.{natural}",
        ),
        band(
            "spectacular success",
            Some(100),
            Polarity::Success,
            "{character} is |gspectacularly successful|n.{natural}",
        ),
        band(
            "legendary success",
            None,
            Polarity::Success,
            "{character} achieves a |mlegendary success|n.{natural}",
        ),
    ]
}

/// The standard tables.
pub fn standard() -> RuleTables {
    RuleTables {
        weights: Arc::new(standard_weights()),
        difficulties: standard_difficulties(),
        naturals: standard_naturals(),
        bands: standard_bands(),
    }
}
