use rc_mechanics::SpoofMode;

use crate::parse;

use super::{Options, audience, load};

/// How a GM roll treats naturals.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naturals {
    /// Allow natural criticals and botches.
    pub crit: bool,
    /// Force a failure.
    pub flub: bool,
}

impl Naturals {
    fn mode(self) -> SpoofMode {
        if self.flub {
            SpoofMode::Flub
        } else if self.crit {
            SpoofMode::CanCrit
        } else {
            SpoofMode::Standard
        }
    }
}

/// Roll GM-supplied magnitudes, optionally for a named NPC.
pub fn run(
    opts: &Options,
    gm: &str,
    check: &str,
    npc: Option<String>,
    naturals: Naturals,
    to: Vec<String>,
) -> Result<(), String> {
    let mut loaded = load(opts)?;
    let mut check = parse::parse_spoof(check, &loaded.vocab, loaded.session.tables())?
        .with_mode(naturals.mode());
    if let Some(npc) = npc {
        check = check.for_npc(npc);
    }
    let report = loaded
        .session
        .gm_check(gm, &check, &audience(to))
        .map_err(|e| e.to_string())?;
    loaded.print(&report);
    Ok(())
}
