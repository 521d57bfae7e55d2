//! Group checks: a leader and helpers each roll the same check.
//!
//! No pass or fail is decided for the group as a whole; the result is a
//! narrative listing of every participant's roll.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rc_core::Entity;

use crate::error::MechResult;
use crate::roll::{Roll, check_string};
use crate::tables::{DifficultyRating, RuleTables};

/// A check made by a leader with the help of others.
#[derive(Debug, Clone)]
pub struct GroupCheck<'a> {
    leader: &'a Entity,
    helpers: Vec<&'a Entity>,
    stat: String,
    skill: Option<String>,
    rating: DifficultyRating,
}

/// The resolved group check.
#[derive(Debug, Clone)]
pub struct GroupOutcome<'a> {
    /// The leader's roll first, then one per helper.
    pub rolls: Vec<Roll<'a>>,
    /// Header followed by one message line per participant.
    pub message: String,
}

impl<'a> GroupCheck<'a> {
    /// Set up a group check. Helpers are deduplicated and the leader is
    /// dropped from them; order is otherwise kept.
    pub fn new(
        leader: &'a Entity,
        helpers: impl IntoIterator<Item = &'a Entity>,
        stat: &str,
        skill: Option<&str>,
        rating: DifficultyRating,
    ) -> Self {
        let mut seen = HashSet::from([leader.id]);
        let helpers = helpers
            .into_iter()
            .filter(|h| seen.insert(h.id))
            .collect();
        Self {
            leader,
            helpers,
            stat: stat.trim().to_lowercase(),
            skill: skill.map(|s| s.trim().to_lowercase()),
            rating,
        }
    }

    /// The helpers after deduplication.
    pub fn helpers(&self) -> &[&'a Entity] {
        &self.helpers
    }

    /// Announcement line naming the leader, the check, and the helpers.
    pub fn header(&self) -> String {
        let helpers: Vec<&str> = self.helpers.iter().map(|h| h.name.as_str()).collect();
        let check = check_string(&self.stat, self.skill.as_deref(), &self.rating);
        if helpers.is_empty() {
            format!(
                "\n|w*** {} has called for a group check of {check}. ***|n",
                self.leader.name
            )
        } else {
            format!(
                "\n|w*** {} has called for a group check of {check}, assisted by {}. ***|n",
                self.leader.name,
                helpers.join(", ")
            )
        }
    }

    /// Roll once for the leader and once for each helper.
    // TODO: aggregate-threshold mode (group succeeds when enough helpers succeed).
    pub fn perform(&self, tables: &RuleTables, rng: &mut StdRng) -> MechResult<GroupOutcome<'a>> {
        let mut rolls = Vec::with_capacity(self.helpers.len() + 1);
        let mut lines = vec![self.header()];
        for &participant in std::iter::once(&self.leader).chain(&self.helpers) {
            let mut roll = Roll::plain(
                participant,
                &self.stat,
                self.skill.as_deref(),
                self.rating.clone(),
            );
            roll.execute(tables, rng)?;
            lines.push(roll.message().unwrap_or_default());
            rolls.push(roll);
        }

        tracing::debug!(
            leader = %self.leader.name,
            helpers = self.helpers.len(),
            "group check resolved"
        );

        Ok(GroupOutcome {
            rolls,
            message: lines.join("\n"),
        })
    }
}
