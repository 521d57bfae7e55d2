use crate::parse;

use super::{Options, audience, load};

/// Roll `check` for `actor` with a retainer's traits.
pub fn run(
    opts: &Options,
    actor: &str,
    retainer: &str,
    check: &str,
    to: Vec<String>,
) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let check = parse::parse_check(check, &loaded.vocab, loaded.session.tables())?;
    let report = loaded
        .session
        .retainer_check(actor, Some(retainer), &check, &audience(to))
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
