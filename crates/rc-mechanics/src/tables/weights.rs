//! Trait weighting: how much a raw stat, skill, or knack magnitude adds to a roll.

use serde::{Deserialize, Serialize};

/// Converts raw trait magnitudes into roll contributions.
pub trait WeightTable: Send + Sync {
    /// Contribution of a stat. `stat_alone` is true when no skill is paired with it.
    fn weighted_stat(&self, raw: u32, stat_alone: bool) -> i32;

    /// Contribution of a skill.
    fn weighted_skill(&self, raw: u32) -> i32;

    /// Contribution of a knack total, which may be negative.
    fn weighted_knack(&self, raw: i32) -> i32;
}

/// One step of a weight curve: every point above `level` counts `weight`
/// until the next tier begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTier {
    /// The value at which this tier starts applying.
    pub level: u32,
    /// Points added per unit of value inside this tier.
    pub weight: i32,
}

impl WeightTier {
    /// Create a tier.
    pub const fn new(level: u32, weight: i32) -> Self {
        Self { level, weight }
    }
}

/// Table-driven [`WeightTable`] with a separate curve per trait kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatWeights {
    /// Curve for a stat rolled without a skill.
    pub only_stat: Vec<WeightTier>,
    /// Curve for a stat rolled alongside a skill.
    pub stat: Vec<WeightTier>,
    /// Curve for skills.
    pub skill: Vec<WeightTier>,
    /// Curve for knack totals.
    pub knack: Vec<WeightTier>,
}

impl StatWeights {
    /// Sort every curve by level so lookups can walk them in order.
    pub fn normalized(mut self) -> Self {
        for curve in [
            &mut self.only_stat,
            &mut self.stat,
            &mut self.skill,
            &mut self.knack,
        ] {
            curve.sort_by_key(|t| t.level);
        }
        self
    }
}

impl WeightTable for StatWeights {
    fn weighted_stat(&self, raw: u32, stat_alone: bool) -> i32 {
        if stat_alone {
            weigh(&self.only_stat, raw)
        } else {
            weigh(&self.stat, raw)
        }
    }

    fn weighted_skill(&self, raw: u32) -> i32 {
        weigh(&self.skill, raw)
    }

    fn weighted_knack(&self, raw: i32) -> i32 {
        weigh(&self.knack, raw.unsigned_abs()).saturating_mul(raw.signum())
    }
}

/// Credit each tier for the span of `value` it covers. Tiers may be in any
/// order; the sum saturates at the `i32` bounds.
fn weigh(tiers: &[WeightTier], value: u32) -> i32 {
    let mut sorted: Vec<&WeightTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| t.level);

    let mut total: i32 = 0;
    for (i, tier) in sorted.iter().enumerate() {
        if value <= tier.level {
            break;
        }
        let upper = sorted
            .get(i + 1)
            .map(|next| next.level.min(value))
            .unwrap_or(value);
        let span = i32::try_from(upper - tier.level).unwrap_or(i32::MAX);
        total = total.saturating_add(span.saturating_mul(tier.weight));
    }
    total
}
