pub mod check;
pub mod contest;
pub mod gmcheck;
pub mod group;
pub mod ratings;
pub mod retainer;
pub mod run;
pub mod vs;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use colored::Colorize;
use rc_core::Roster;
use rc_mechanics::{EngineConfig, RuleTables};
use rc_notify::Outbox;
use rc_session::{Audience, CheckReport, CheckSession, ReportKind};

use crate::markup;
use crate::parse::Vocabulary;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Roster document.
    pub roster: Option<PathBuf>,
    /// Rule tables document. The standard tables when absent.
    pub tables: Option<PathBuf>,
    /// Defined checks document.
    pub checks: Option<PathBuf>,
    /// RNG seed.
    pub seed: Option<u64>,
    /// Tie threshold override.
    pub tie_threshold: Option<i32>,
    /// Print color markup as written.
    pub raw: bool,
}

/// A loaded session and the outbox it delivers into.
pub struct Loaded {
    /// The session.
    pub session: CheckSession,
    /// Known trait names.
    pub vocab: Vocabulary,
    outbox: Arc<Outbox>,
    raw: bool,
}

impl Loaded {
    /// Print what was delivered, then drain the outbox.
    pub fn print(&self, report: &CheckReport) {
        let title = match &report.kind {
            ReportKind::Single => "Check",
            ReportKind::Contest(_) => "Contest",
            ReportKind::Opposed(_) => "Opposed check",
            ReportKind::Group => "Group check",
        };
        let deliveries = self.outbox.drain();
        println!(
            "{} {}",
            title.bold(),
            format!("({} recipients)", deliveries.len()).dimmed()
        );
        for delivered in deliveries {
            let name = self
                .session
                .roster()
                .get(delivered.recipient)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| delivered.recipient.to_string());
            println!("-> {}: {}", name.bold(), self.text(&delivered.message));
        }
    }

    fn text(&self, message: &str) -> String {
        if self.raw {
            message.to_string()
        } else {
            markup::render(message)
        }
    }
}

/// Load the roster, tables, and checks named by `opts` into a session.
pub fn load(opts: &Options) -> Result<Loaded, String> {
    let roster_path = opts
        .roster
        .as_deref()
        .ok_or("no roster given; pass --roster FILE")?;
    let roster = Roster::from_json(&read(roster_path)?)
        .map_err(|e| format!("failed to load {}: {e}", roster_path.display()))?;
    let tables = load_tables(opts)?;

    let mut config = EngineConfig::default();
    if let Some(seed) = opts.seed {
        config = config.with_seed(seed);
    }
    if let Some(threshold) = opts.tie_threshold {
        config = config.with_tie_threshold(threshold);
    }

    let outbox = Arc::new(Outbox::new());
    let mut session = CheckSession::new(roster, tables, config, outbox.clone());
    if let Some(path) = &opts.checks {
        let count = session
            .load_checks(&read(path)?)
            .map_err(|e| format!("failed to load {}: {e}", path.display()))?;
        tracing::debug!(count, path = %path.display(), "loaded defined checks");
    }

    let vocab = Vocabulary::collect(session.roster(), session.checks());
    Ok(Loaded {
        session,
        vocab,
        outbox,
        raw: opts.raw,
    })
}

/// The tables named by `opts`, or the standard ones.
pub fn load_tables(opts: &Options) -> Result<RuleTables, String> {
    match &opts.tables {
        Some(path) => RuleTables::from_json(&read(path)?)
            .map_err(|e| format!("failed to load {}: {e}", path.display())),
        None => Ok(RuleTables::preset()),
    }
}

/// Public unless receivers are named.
fn audience(to: Vec<String>) -> Audience {
    if to.is_empty() {
        Audience::Public
    } else {
        Audience::Private(to)
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}
