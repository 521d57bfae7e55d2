use crate::parse;

use super::{Options, load};

/// Roll `checks` ("left vs right") for the caller and a target.
pub fn run(opts: &Options, caller: &str, target: &str, checks: &str) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let (left, right) = parse::parse_vs(checks, &loaded.vocab)?;
    let report = loaded
        .session
        .opposed_check(caller, target, &left, &right)
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
