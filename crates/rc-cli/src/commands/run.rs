use colored::Colorize;

use super::{Options, audience, load};

/// Roll a defined check by name.
pub fn run(
    opts: &Options,
    actor: &str,
    check: &str,
    target: Option<&str>,
    rating: Option<&str>,
    to: Vec<String>,
) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let report = loaded
        .session
        .defined_check(actor, check, target, rating, &audience(to))
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    if let Some(outcome) = report.roll().and_then(|r| r.outcome.as_deref()) {
        println!("{} {outcome}", "Outcome:".dimmed());
    }
    Ok(())
}
