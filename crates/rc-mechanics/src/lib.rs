//! Check resolution engine for Rollcall.
//!
//! Provides the rule tables a check is weighed against, the roll variants
//! (plain, retainer, spoofed NPC, scripted), the tie-window comparison
//! that ranks resolved rolls, and the contest, opposed, and group
//! aggregators built on top of it.

pub mod aggregate;
pub mod compare;
pub mod config;
pub mod error;
pub mod roll;
pub mod tables;

pub use aggregate::{
    Contest, ContestOutcome, ContestRanking, GroupCheck, GroupOutcome, OpposedCheck,
    OpposedOutcome, Side, Verdict,
};
pub use compare::{TIE_THRESHOLD, compare, is_less, ties};
pub use config::EngineConfig;
pub use error::{MechError, MechResult};
pub use roll::{
    CheckDefinition, DifficultySource, DifficultyTier, Resolution, Roll, RollSource, SpoofMode,
    TraitKind, check_string,
};
pub use tables::{
    DifficultyRating, NaturalKind, NaturalRollType, Polarity, RollResultBand, RuleTables,
    StatWeights, WeightTable,
};
