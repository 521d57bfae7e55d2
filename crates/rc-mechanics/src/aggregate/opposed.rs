//! Opposed checks: exactly two rolls, head to head.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rc_core::Entity;

use crate::compare::{self, TIE_THRESHOLD};
use crate::error::{MechError, MechResult};
use crate::roll::Roll;
use crate::tables::RuleTables;

/// One side of an opposed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The caller's roll.
    Left,
    /// The target's roll.
    Right,
}

/// Result of an opposed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The rolls compare equal.
    Tie,
    /// One side won.
    Winner(Side),
}

/// Two unresolved rolls, one for the caller and one for the target.
#[derive(Debug, Clone)]
pub struct OpposedCheck<'a> {
    caller: &'a Entity,
    target: &'a Entity,
    left: Roll<'a>,
    right: Roll<'a>,
    tie_threshold: i32,
}

/// The resolved opposed check.
#[derive(Debug, Clone)]
pub struct OpposedOutcome<'a> {
    /// The caller's roll.
    pub left: Roll<'a>,
    /// The target's roll.
    pub right: Roll<'a>,
    /// Tie or winner.
    pub verdict: Verdict,
    /// The full announcement.
    pub message: String,
}

impl<'a> OpposedCheck<'a> {
    /// Pair two rolls. Both must be unresolved.
    pub fn new(
        caller: &'a Entity,
        target: &'a Entity,
        left: Roll<'a>,
        right: Roll<'a>,
    ) -> MechResult<Self> {
        if left.is_resolved() || right.is_resolved() {
            return Err(MechError::InvalidRollState(
                "opposed check needs unresolved rolls".to_string(),
            ));
        }
        Ok(Self {
            caller,
            target,
            left,
            right,
            tie_threshold: TIE_THRESHOLD,
        })
    }

    /// Override the tie threshold.
    pub fn with_tie_threshold(mut self, threshold: i32) -> Self {
        self.tie_threshold = threshold;
        self
    }

    /// Execute both rolls and decide the winner.
    pub fn perform(mut self, tables: &RuleTables, rng: &mut StdRng) -> MechResult<OpposedOutcome<'a>> {
        self.left.execute(tables, rng)?;
        self.right.execute(tables, rng)?;

        let verdict = match compare::compare(
            self.left.require_resolution()?,
            self.right.require_resolution()?,
            self.tie_threshold,
        ) {
            Ordering::Equal => Verdict::Tie,
            Ordering::Greater => Verdict::Winner(Side::Left),
            Ordering::Less => Verdict::Winner(Side::Right),
        };

        let verdict_line = match verdict {
            Verdict::Tie => "*** The rolls are |ctied|n. ***".to_string(),
            Verdict::Winner(side) => {
                let winner = match side {
                    Side::Left => &self.left,
                    Side::Right => &self.right,
                };
                format!("*** |c{}|n is the winner. ***", winner.actor_name())
            }
        };
        let message = format!(
            "\n|w*** {} has called for an opposing check with {}. ***|n\n{}\n{}\n{}",
            self.caller.name,
            self.target.name,
            self.left.message().unwrap_or_default(),
            self.right.message().unwrap_or_default(),
            verdict_line
        );

        tracing::debug!(
            caller = %self.caller.name,
            target = %self.target.name,
            ?verdict,
            "opposed check resolved"
        );

        Ok(OpposedOutcome {
            left: self.left,
            right: self.right,
            verdict,
            message,
        })
    }
}

impl OpposedOutcome<'_> {
    /// The winning roll, or `None` on a tie.
    pub fn winner(&self) -> Option<&Roll<'_>> {
        match self.verdict {
            Verdict::Tie => None,
            Verdict::Winner(Side::Left) => Some(&self.left),
            Verdict::Winner(Side::Right) => Some(&self.right),
        }
    }
}
