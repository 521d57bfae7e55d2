//! Check sessions for Rollcall.
//!
//! A [`CheckSession`] owns the roster, the rule tables, the engine
//! configuration, and the entropy source. Each operation resolves one check
//! (or one contest, opposed check, or group check) and announces it to the
//! right audience through a [`rc_notify::Delivery`] sink.

pub mod error;
pub mod report;
pub mod request;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use report::{CheckReport, ReportKind, RollSummary};
pub use request::{Audience, SpoofCheck, TraitCheck};
pub use session::CheckSession;
