use crate::parse;

use super::{Options, audience, load};

/// Roll `check` for `actor`, publicly or for the named receivers.
pub fn run(opts: &Options, actor: &str, check: &str, to: Vec<String>) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let check = parse::parse_check(check, &loaded.vocab, loaded.session.tables())?;
    let report = loaded
        .session
        .check(actor, &check, &audience(to))
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
