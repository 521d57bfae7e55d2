//! Owned results of a session operation.

use rc_mechanics::{ContestRanking, MechResult, Resolution, Roll, Verdict};

/// One resolved roll, detached from the roster it borrowed.
#[derive(Debug, Clone)]
pub struct RollSummary {
    /// Name of whoever rolled.
    pub actor: String,
    /// Who is rolling what at what difficulty.
    pub prefix: String,
    /// The resolved state.
    pub resolution: Resolution,
    /// Outcome text of a defined check, if it has one for this band.
    pub outcome: Option<String>,
}

impl RollSummary {
    /// Snapshot an executed roll.
    pub fn from_roll(roll: &Roll<'_>) -> MechResult<Self> {
        let resolution = roll.require_resolution()?.clone();
        Ok(Self {
            actor: roll.actor_name(),
            prefix: roll.prefix().unwrap_or_default(),
            outcome: roll.outcome().map(str::to_string),
            resolution,
        })
    }

    /// Prefix and description on one line.
    pub fn message(&self) -> String {
        format!("{} {}", self.prefix, self.resolution.description)
    }
}

/// What kind of operation produced a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// One roll.
    Single,
    /// A ranked contest.
    Contest(ContestRanking),
    /// An opposed check.
    Opposed(Verdict),
    /// A group check.
    Group,
}

/// The resolved rolls and what was sent.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// The operation.
    pub kind: ReportKind,
    /// Every roll made, in the order made.
    pub rolls: Vec<RollSummary>,
    /// The text delivered.
    pub message: String,
    /// Names of everyone it was delivered to, sorted.
    pub recipients: Vec<String>,
}

impl CheckReport {
    /// The first (or only) roll.
    pub fn roll(&self) -> Option<&RollSummary> {
        self.rolls.first()
    }
}
