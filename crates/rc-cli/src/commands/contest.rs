use crate::parse;

use super::{Options, load};

/// Who takes part in a contest.
#[derive(Debug, Clone)]
pub enum Participants {
    /// These characters.
    Named(Vec<String>),
    /// Every other character in the caller's room.
    Here,
}

/// Rank everyone's result on one check.
pub fn run(
    opts: &Options,
    caller: &str,
    participants: Participants,
    check: &str,
) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let check = parse::parse_check(check, &loaded.vocab, loaded.session.tables())?;
    let report = match participants {
        Participants::Named(names) => loaded.session.contested_check(caller, &names, &check),
        Participants::Here => loaded.session.contest_here(caller, &check),
    }
    .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
