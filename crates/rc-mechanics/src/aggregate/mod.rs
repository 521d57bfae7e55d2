//! Checks made of several rolls: contests, opposed checks, and group checks.

pub mod contest;
pub mod group;
pub mod opposed;

pub use contest::{Contest, ContestOutcome, ContestRanking};
pub use group::{GroupCheck, GroupOutcome};
pub use opposed::{OpposedCheck, OpposedOutcome, Side, Verdict};
