//! Check-string parsing for the command line.
//!
//! Syntax:
//!
//! - `<stat> [+ <skill>] at <rating>`
//! - `<stat>/<value> [+ <skill>/<value>] at <rating>` (GM rolls)
//! - `<stat> [+ <skill>] vs <stat> [+ <skill>]`
//!
//! Stat and skill names are lowercased and checked against the vocabulary
//! of known trait names.

use std::collections::BTreeSet;

use rc_core::Roster;
use rc_mechanics::{CheckDefinition, RuleTables};
use rc_session::{SpoofCheck, TraitCheck};

const SYNTAX_MSG: &str = "Usage: stat [+ skill] at <difficulty rating>";
const SPOOF_SYNTAX_MSG: &str = "Usage: <stat>/<value> [+ <skill>/<value>] at <difficulty rating>";
const TWO_CHECK_MSG: &str = "Must provide two checks.";

/// Highest magnitude a GM may give a stat or skill.
pub const SPOOF_LIMIT: u32 = 20;

/// Stats every roster understands, whether or not anyone has them.
const BASE_STATS: &[&str] = &[
    "strength",
    "dexterity",
    "stamina",
    "charm",
    "command",
    "composure",
    "intellect",
    "perception",
    "wits",
    "mana",
    "luck",
    "willpower",
];

/// Known stat and skill names.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    stats: BTreeSet<String>,
    skills: BTreeSet<String>,
}

impl Vocabulary {
    /// The base stats plus every trait named in the roster or a defined check.
    pub fn collect<'a>(
        roster: &Roster,
        checks: impl IntoIterator<Item = &'a CheckDefinition>,
    ) -> Self {
        let mut vocab = Self {
            stats: BASE_STATS.iter().map(|s| s.to_string()).collect(),
            skills: BTreeSet::new(),
        };
        for entity in roster.all_entities() {
            vocab.stats.extend(entity.stats.keys().cloned());
            vocab.skills.extend(entity.skills.keys().cloned());
            if let Some(knacks) = &entity.knacks {
                for knack in &knacks.0 {
                    vocab.stats.insert(knack.stat.to_lowercase());
                    if let Some(skill) = &knack.skill {
                        vocab.skills.insert(skill.to_lowercase());
                    }
                }
            }
        }
        for check in checks {
            vocab.stats.extend(check.stats.iter().map(|s| s.to_lowercase()));
            vocab.skills.extend(check.skills.iter().map(|s| s.to_lowercase()));
        }
        vocab
    }

    /// Fail on a stat or skill nobody knows.
    pub fn validate(&self, stat: &str, skill: Option<&str>) -> Result<(), String> {
        if !self.stats.contains(stat) {
            return Err(format!("{stat} is not a valid stat name."));
        }
        match skill {
            Some(skill) if !self.skills.contains(skill) => {
                Err(format!("{skill} is not a valid skill name."))
            }
            _ => Ok(()),
        }
    }
}

/// Split `stat [+ skill]`, lowercased.
pub fn split_stat_skill(input: &str) -> (String, Option<String>) {
    match input.split_once('+') {
        Some((stat, skill)) => (
            stat.trim().to_lowercase(),
            Some(skill.trim().to_lowercase()),
        ),
        None => (input.trim().to_lowercase(), None),
    }
}

/// `<stat> [+ <skill>]` with no rating.
pub fn parse_traits(input: &str, vocab: &Vocabulary) -> Result<TraitCheck, String> {
    let (stat, skill) = split_stat_skill(input);
    vocab.validate(&stat, skill.as_deref())?;
    Ok(TraitCheck::new(stat, skill.as_deref()))
}

/// `<stat> [+ <skill>] at <rating>`.
pub fn parse_check(
    input: &str,
    vocab: &Vocabulary,
    tables: &RuleTables,
) -> Result<TraitCheck, String> {
    let (traits, rating) = split_rating(input, tables, SYNTAX_MSG)?;
    Ok(parse_traits(traits, vocab)?.at(rating))
}

/// `<stat> [+ <skill>] vs <stat> [+ <skill>]`.
pub fn parse_vs(input: &str, vocab: &Vocabulary) -> Result<(TraitCheck, TraitCheck), String> {
    let (left, right) = input
        .split_once(" vs ")
        .ok_or_else(|| TWO_CHECK_MSG.to_string())?;
    if right.contains(" vs ") {
        return Err(TWO_CHECK_MSG.to_string());
    }
    Ok((parse_traits(left, vocab)?, parse_traits(right, vocab)?))
}

/// `<stat>/<value> [+ <skill>/<value>] at <rating>`.
///
/// Magnitudes must be between 1 and [`SPOOF_LIMIT`].
pub fn parse_spoof(
    input: &str,
    vocab: &Vocabulary,
    tables: &RuleTables,
) -> Result<SpoofCheck, String> {
    let (traits, rating) = split_rating(input, tables, SPOOF_SYNTAX_MSG)?;
    let slashes = traits.matches('/').count();
    let (stat_part, skill_part) = match traits.split_once('+') {
        Some(_) if slashes != 2 => return Err(SPOOF_SYNTAX_MSG.to_string()),
        None if slashes != 1 => return Err(SPOOF_SYNTAX_MSG.to_string()),
        Some((stat, skill)) => (stat, Some(skill)),
        None => (traits, None),
    };
    if skill_part.is_some_and(|s| s.contains('+')) {
        return Err(SPOOF_SYNTAX_MSG.to_string());
    }

    let (stat, stat_value) = extract_value(stat_part)?;
    let skill = skill_part.map(extract_value).transpose()?;
    vocab.validate(&stat, skill.as_ref().map(|(name, _)| name.as_str()))?;

    if !(1..=SPOOF_LIMIT).contains(&stat_value) {
        return Err(format!("Stats must be between 1 and {SPOOF_LIMIT}."));
    }
    let mut check = SpoofCheck::new(stat, stat_value).at(rating);
    if let Some((skill, value)) = skill {
        if !(1..=SPOOF_LIMIT).contains(&value) {
            return Err(format!("Skills must be between 1 and {SPOOF_LIMIT}."));
        }
        check = check.with_skill(skill, value);
    }
    Ok(check)
}

fn split_rating<'a>(
    input: &'a str,
    tables: &RuleTables,
    syntax: &str,
) -> Result<(&'a str, String), String> {
    let (traits, rating) = input
        .split_once(" at ")
        .ok_or_else(|| syntax.to_string())?;
    let rating = rating.trim().to_lowercase();
    if tables.difficulty(&rating).is_none() {
        return Err(format!("'{rating}' is not a valid difficulty rating."));
    }
    Ok((traits, rating))
}

/// `name/value`.
fn extract_value(input: &str) -> Result<(String, u32), String> {
    let (name, value) = input
        .trim()
        .split_once('/')
        .ok_or_else(|| "Specify \"name/value\" for stats and skills.".to_string())?;
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err("Stat/skill values must be a number.".to_string());
    }
    let value = value
        .parse()
        .map_err(|_| "Stat/skill values must be a number.".to_string())?;
    Ok((name.trim().to_lowercase(), value))
}

#[cfg(test)]
mod tests {
    use rc_core::Entity;
    use rc_mechanics::SpoofMode;

    use super::*;

    fn vocab() -> Vocabulary {
        let mut roster = Roster::new();
        roster
            .add_entity(
                Entity::character("Kael")
                    .with_stat("dexterity", 3)
                    .with_skill("stealth", 2)
                    .with_skill("athletics", 1),
            )
            .unwrap();
        Vocabulary::collect(&roster, [])
    }

    #[test]
    fn stat_and_skill_at_rating() {
        let check = parse_check("Dexterity + Stealth at hard", &vocab(), &RuleTables::preset())
            .unwrap();
        assert_eq!(check, TraitCheck::new("dexterity", Some("stealth")).at("hard"));
    }

    #[test]
    fn stat_alone() {
        let check = parse_check("wits at normal", &vocab(), &RuleTables::preset()).unwrap();
        assert_eq!(check.stat, "wits");
        assert_eq!(check.skill, None);
    }

    #[test]
    fn missing_rating() {
        let err = parse_check("dexterity + stealth", &vocab(), &RuleTables::preset()).unwrap_err();
        assert_eq!(err, SYNTAX_MSG);
    }

    #[test]
    fn unknown_rating() {
        let err =
            parse_check("dexterity at impossible-ish", &vocab(), &RuleTables::preset()).unwrap_err();
        assert_eq!(err, "'impossible-ish' is not a valid difficulty rating.");
    }

    #[test]
    fn unknown_traits() {
        let tables = RuleTables::preset();
        let err = parse_check("agility at hard", &vocab(), &tables).unwrap_err();
        assert_eq!(err, "agility is not a valid stat name.");
        let err = parse_check("wits + juggling at hard", &vocab(), &tables).unwrap_err();
        assert_eq!(err, "juggling is not a valid skill name.");
    }

    #[test]
    fn vs_needs_exactly_two_checks() {
        let (left, right) = parse_vs("dexterity + stealth vs wits", &vocab()).unwrap();
        assert_eq!(left.skill.as_deref(), Some("stealth"));
        assert_eq!(right.stat, "wits");
        assert!(right.rating.is_none());

        assert_eq!(parse_vs("dexterity", &vocab()).unwrap_err(), TWO_CHECK_MSG);
        assert_eq!(
            parse_vs("wits vs wits vs wits", &vocab()).unwrap_err(),
            TWO_CHECK_MSG
        );
    }

    #[test]
    fn spoof_values() {
        let check = parse_spoof(
            "strength/4 + athletics/2 at hard",
            &vocab(),
            &RuleTables::preset(),
        )
        .unwrap();
        assert_eq!(check.stat, ("strength".to_string(), 4));
        assert_eq!(check.skill, Some(("athletics".to_string(), 2)));
        assert_eq!(check.rating.as_deref(), Some("hard"));
        assert_eq!(check.mode, SpoofMode::Standard);
    }

    #[test]
    fn spoof_syntax_errors() {
        let tables = RuleTables::preset();
        let vocab = vocab();
        assert_eq!(
            parse_spoof("strength at hard", &vocab, &tables).unwrap_err(),
            SPOOF_SYNTAX_MSG
        );
        assert_eq!(
            parse_spoof("strength/4 + athletics at hard", &vocab, &tables).unwrap_err(),
            SPOOF_SYNTAX_MSG
        );
        assert_eq!(
            parse_spoof("strength/four at hard", &vocab, &tables).unwrap_err(),
            "Stat/skill values must be a number."
        );
    }

    #[test]
    fn spoof_limits() {
        let tables = RuleTables::preset();
        let vocab = vocab();
        assert_eq!(
            parse_spoof("strength/21 at hard", &vocab, &tables).unwrap_err(),
            "Stats must be between 1 and 20."
        );
        assert_eq!(
            parse_spoof("strength/0 at hard", &vocab, &tables).unwrap_err(),
            "Stats must be between 1 and 20."
        );
        assert_eq!(
            parse_spoof("strength/20 + athletics/25 at hard", &vocab, &tables).unwrap_err(),
            "Skills must be between 1 and 20."
        );
        assert!(parse_spoof("strength/20 + athletics/1 at hard", &vocab, &tables).is_ok());
    }
}
