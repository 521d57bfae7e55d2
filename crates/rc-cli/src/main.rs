//! CLI frontend for the Rollcall check engine.

mod commands;
mod markup;
mod parse;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Options;
use commands::contest::Participants;
use commands::gmcheck::Naturals;

#[derive(Parser)]
#[command(
    name = "rollcall",
    about = "Rollcall: resolve stat checks and announce them to the right audience",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Roster document (JSON)
    #[arg(short, long, global = true)]
    roster: Option<PathBuf>,

    /// Rule tables document (JSON); the standard tables when omitted
    #[arg(short, long, global = true)]
    tables: Option<PathBuf>,

    /// Defined checks document (JSON)
    #[arg(long, global = true)]
    checks: Option<PathBuf>,

    /// Seed for reproducible rolls
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Largest net difference at which two same-band rolls tie
    #[arg(long, global = true)]
    tie_threshold: Option<i32>,

    /// Print color markup as written instead of rendering it
    #[arg(long, global = true)]
    raw: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a stat (and skill) at a difficulty rating
    Check {
        /// Who rolls
        actor: String,

        /// "<stat> [+ <skill>] at <rating>"
        check: String,

        /// Show the roll only to these players (comma-separated)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },

    /// Roll GM-supplied stat and skill values
    Gmcheck {
        /// The GM rolling
        gm: String,

        /// "<stat>/<value> [+ <skill>/<value>] at <rating>"
        check: String,

        /// NPC the roll is made for
        #[arg(long)]
        npc: Option<String>,

        /// Allow natural criticals and botches
        #[arg(long, conflicts_with = "flub")]
        crit: bool,

        /// Fail on purpose, with a random failure result
        #[arg(long)]
        flub: bool,

        /// Show the roll only to these players (comma-separated)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },

    /// Roll with a retainer's stats and skills
    Retainer {
        /// The retainer's owner
        actor: String,

        /// The retainer
        retainer: String,

        /// "<stat> [+ <skill>] at <rating>"
        check: String,

        /// Show the roll only to these players (comma-separated)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },

    /// Roll a defined check by name
    Run {
        /// Who rolls
        actor: String,

        /// Name of the defined check
        check: String,

        /// Target whose traits pick the difficulty
        #[arg(long)]
        target: Option<String>,

        /// Difficulty rating override
        #[arg(long = "at")]
        rating: Option<String>,

        /// Show the roll only to these players (comma-separated)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
    },

    /// Have several characters roll the same check and rank them
    Contest {
        /// The GM calling the contest
        caller: String,

        /// Participants (comma-separated)
        participants: String,

        /// "<stat> [+ <skill>] at <rating>"
        check: String,
    },

    /// Contest between every other character in the caller's room
    ContestHere {
        /// The GM calling the contest
        caller: String,

        /// "<stat> [+ <skill>] at <rating>"
        check: String,
    },

    /// Roll the caller's check against a target's
    Vs {
        /// Who calls the check
        caller: String,

        /// The opposing character
        target: String,

        /// "<stat> [+ <skill>] vs <stat> [+ <skill>]"
        #[arg(value_name = "CHECKS")]
        pair: String,
    },

    /// Roll a check together with helpers
    With {
        /// Who leads the attempt
        leader: String,

        /// Helpers (comma-separated)
        helpers: String,

        /// "<stat> [+ <skill>]"
        check: String,
    },

    /// List difficulty ratings and result bands
    Ratings,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let opts = Options {
        roster: cli.global.roster,
        tables: cli.global.tables,
        checks: cli.global.checks,
        seed: cli.global.seed,
        tie_threshold: cli.global.tie_threshold,
        raw: cli.global.raw,
    };

    let result = match cli.command {
        Commands::Check { actor, check, to } => commands::check::run(&opts, &actor, &check, to),
        Commands::Gmcheck {
            gm,
            check,
            npc,
            crit,
            flub,
            to,
        } => commands::gmcheck::run(&opts, &gm, &check, npc, Naturals { crit, flub }, to),
        Commands::Retainer {
            actor,
            retainer,
            check,
            to,
        } => commands::retainer::run(&opts, &actor, &retainer, &check, to),
        Commands::Run {
            actor,
            check,
            target,
            rating,
            to,
        } => commands::run::run(
            &opts,
            &actor,
            &check,
            target.as_deref(),
            rating.as_deref(),
            to,
        ),
        Commands::Contest {
            caller,
            participants,
            check,
        } => commands::contest::run(
            &opts,
            &caller,
            Participants::Named(split_names(&participants)),
            &check,
        ),
        Commands::ContestHere { caller, check } => {
            commands::contest::run(&opts, &caller, Participants::Here, &check)
        }
        Commands::Vs {
            caller,
            target,
            pair,
        } => commands::vs::run(&opts, &caller, &target, &pair),
        Commands::With {
            leader,
            helpers,
            check,
        } => commands::group::run(&opts, &leader, &split_names(&helpers), &check),
        Commands::Ratings => commands::ratings::run(&opts),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Split a comma-separated name list, dropping blanks.
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn argument_ids_are_unique() {
        Cli::command().debug_assert();
    }

    #[test]
    fn vs_and_checks_file_parse_together() {
        let cli = Cli::try_parse_from([
            "rollcall",
            "--checks",
            "checks.json",
            "vs",
            "Kael",
            "Mira",
            "wits vs wits",
        ])
        .unwrap();
        assert_eq!(cli.global.checks, Some(PathBuf::from("checks.json")));
        match cli.command {
            Commands::Vs { pair, .. } => assert_eq!(pair, "wits vs wits"),
            _ => panic!("expected vs"),
        }
    }
}
