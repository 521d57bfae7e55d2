use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rc_mechanics::Polarity;

use super::{Options, load_tables};

/// List difficulty ratings and result bands.
pub fn run(opts: &Options) -> Result<(), String> {
    let tables = load_tables(opts)?;

    println!("{}", "Difficulty ratings".bold());
    let mut ratings = Table::new();
    ratings.set_content_arrangement(ContentArrangement::Dynamic);
    ratings.set_header(vec!["Rating", "Penalty"]);
    for rating in tables.difficulties() {
        ratings.add_row(vec![rating.name.clone(), rating.value.to_string()]);
    }
    println!("{ratings}");
    println!(
        "  {} {}",
        "default:".dimmed(),
        tables.default_difficulty().name
    );
    println!();

    println!("{}", "Result bands".bold());
    let mut bands = Table::new();
    bands.set_content_arrangement(ContentArrangement::Dynamic);
    bands.set_header(vec!["Band", "Net result", "Outcome"]);
    let mut floor: Option<i32> = None;
    for band in tables.bands() {
        let range = match (floor, band.ceiling) {
            (None, Some(ceiling)) => format!("..{ceiling}"),
            (Some(low), Some(ceiling)) => format!("{low}..{ceiling}"),
            (Some(low), None) => format!("{low}.."),
            (None, None) => "any".to_string(),
        };
        let polarity = match band.polarity {
            Polarity::Success => "success",
            Polarity::Failure => "failure",
        };
        bands.add_row(vec![band.name.clone(), range, polarity.to_string()]);
        floor = band.ceiling.map(|c| c + 1);
    }
    println!("{bands}");

    Ok(())
}
