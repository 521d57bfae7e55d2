use crate::parse;

use super::{Options, load};

/// Roll a check for a leader and each helper.
pub fn run(opts: &Options, leader: &str, helpers: &[String], check: &str) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let check = parse::parse_traits(check, &loaded.vocab)?;
    let report = loaded
        .session
        .group_check(leader, helpers, &check)
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
