//! Contests: many independent rolls ranked against each other.
//!
//! Ranking sorts descending by [`compare::is_less`] and then walks the sorted
//! list, adding a roll to the open group when it ties the group's **first**
//! member. Because the tie window is not transitive, a group can hold rolls
//! that do not tie each other, as long as each ties the anchor.

use rand::rngs::StdRng;
use rc_core::Entity;

use crate::compare::{self, TIE_THRESHOLD};
use crate::error::MechResult;
use crate::roll::{Resolution, Roll, check_string};
use crate::tables::{DifficultyRating, RuleTables};

/// Ranked groups of roll indices, best first. Groups of two or more are ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestRanking {
    groups: Vec<Vec<usize>>,
}

impl ContestRanking {
    /// Rank resolutions. Indices in the result refer to positions in `resolutions`.
    pub fn rank(resolutions: &[&Resolution], threshold: i32) -> Self {
        let mut order: Vec<(usize, &Resolution)> =
            resolutions.iter().copied().enumerate().collect();
        compare::sort_descending(&mut order, threshold, |entry| entry.1);

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (i, _) in order {
            match groups.last_mut() {
                Some(group) if compare::ties(resolutions[group[0]], resolutions[i], threshold) => {
                    group.push(i);
                }
                _ => groups.push(vec![i]),
            }
        }
        Self { groups }
    }

    /// Rank executed rolls. Fails if any roll is unresolved.
    pub fn rank_rolls(rolls: &[Roll<'_>], threshold: i32) -> MechResult<Self> {
        let resolutions = rolls
            .iter()
            .map(Roll::require_resolution)
            .collect::<MechResult<Vec<_>>>()?;
        Ok(Self::rank(&resolutions, threshold))
    }

    /// The groups, best first.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One line per group: a lone description, or `TIE: ` and every tied
    /// description separated by spaces.
    pub fn render(&self, resolutions: &[&Resolution]) -> String {
        self.groups
            .iter()
            .map(|group| {
                let descriptions: Vec<&str> = group
                    .iter()
                    .map(|&i| resolutions[i].description.as_str())
                    .collect();
                if descriptions.len() > 1 {
                    format!("TIE: {}", descriptions.join(" "))
                } else {
                    descriptions.concat()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A check every participant makes with the same stat, skill, and rating.
#[derive(Debug, Clone)]
pub struct Contest<'a> {
    caller: &'a Entity,
    participants: Vec<&'a Entity>,
    stat: String,
    skill: Option<String>,
    rating: DifficultyRating,
    tie_threshold: i32,
}

/// The resolved contest.
#[derive(Debug, Clone)]
pub struct ContestOutcome<'a> {
    /// One roll per participant, in participant order.
    pub rolls: Vec<Roll<'a>>,
    /// The ranking over `rolls`.
    pub ranking: ContestRanking,
    /// Header followed by the ranked result lines.
    pub message: String,
}

impl<'a> Contest<'a> {
    /// Set up a contest called by `caller`.
    pub fn new(
        caller: &'a Entity,
        participants: Vec<&'a Entity>,
        stat: &str,
        skill: Option<&str>,
        rating: DifficultyRating,
    ) -> Self {
        Self {
            caller,
            participants,
            stat: stat.trim().to_lowercase(),
            skill: skill.map(|s| s.trim().to_lowercase()),
            rating,
            tie_threshold: TIE_THRESHOLD,
        }
    }

    /// Override the tie threshold.
    pub fn with_tie_threshold(mut self, threshold: i32) -> Self {
        self.tie_threshold = threshold;
        self
    }

    /// `"{caller} has called for a check of {check}."`
    pub fn header(&self) -> String {
        format!(
            "{} has called for a check of {}.",
            self.caller.name,
            check_string(&self.stat, self.skill.as_deref(), &self.rating)
        )
    }

    /// Roll for every participant and rank the results.
    pub fn perform(&self, tables: &RuleTables, rng: &mut StdRng) -> MechResult<ContestOutcome<'a>> {
        let mut rolls = Vec::with_capacity(self.participants.len());
        for &participant in &self.participants {
            let mut roll = Roll::plain(
                participant,
                &self.stat,
                self.skill.as_deref(),
                self.rating.clone(),
            )
            .with_tie_threshold(self.tie_threshold);
            roll.execute(tables, rng)?;
            rolls.push(roll);
        }

        let resolutions = rolls
            .iter()
            .map(Roll::require_resolution)
            .collect::<MechResult<Vec<_>>>()?;
        let ranking = ContestRanking::rank(&resolutions, self.tie_threshold);
        let message = format!("{}\n{}", self.header(), ranking.render(&resolutions));

        tracing::debug!(
            caller = %self.caller.name,
            participants = rolls.len(),
            groups = ranking.len(),
            "contest ranked"
        );

        Ok(ContestOutcome {
            rolls,
            ranking,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Polarity, RollResultBand};
    use rand::SeedableRng;

    fn resolution(ordinal: usize, net: i32, who: &str) -> Resolution {
        Resolution {
            raw: 50,
            stat_contribution: 0,
            skill_contribution: 0,
            extra_contribution: 0,
            difficulty: DifficultyRating::new("normal", 0),
            net,
            ordinal,
            band: RollResultBand {
                name: "success".into(),
                ceiling: None,
                polarity: Polarity::Success,
                template: String::new(),
            },
            natural: None,
            description: format!("{who} rolled {net}."),
        }
    }

    #[test]
    fn close_pair_ties_then_singleton() {
        let a = resolution(6, 90, "A");
        let b = resolution(6, 88, "B");
        let c = resolution(6, 50, "C");
        let all = [&c, &a, &b];
        let ranking = ContestRanking::rank(&all, 5);
        assert_eq!(ranking.groups(), &[vec![1, 2], vec![0]]);
        assert_eq!(
            ranking.render(&all),
            "TIE: A rolled 90. B rolled 88.\nC rolled 50."
        );
    }

    #[test]
    fn ties_anchor_to_first_member() {
        let a = resolution(3, 90, "A");
        let b = resolution(3, 86, "B");
        let c = resolution(3, 82, "C");
        // B ties A, C ties B but not A: C starts a new group.
        let all = [&a, &b, &c];
        let ranking = ContestRanking::rank(&all, 5);
        assert_eq!(ranking.groups(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn different_bands_never_group() {
        let a = resolution(4, 10, "A");
        let b = resolution(3, 12, "B");
        let all = [&b, &a];
        let ranking = ContestRanking::rank(&all, 5);
        assert_eq!(ranking.groups(), &[vec![1], vec![0]]);
        assert_eq!(ranking.render(&all), "A rolled 10.\nB rolled 12.");
    }

    #[test]
    fn empty_contest() {
        let ranking = ContestRanking::rank(&[], 5);
        assert!(ranking.is_empty());
        assert_eq!(ranking.render(&[]), "");
    }

    #[test]
    fn unresolved_rolls_cannot_be_ranked() {
        let kael = Entity::character("Kael");
        let rolls = vec![Roll::plain(&kael, "wits", None, DifficultyRating::new("easy", 10))];
        assert!(ContestRanking::rank_rolls(&rolls, 5).is_err());
    }

    #[test]
    fn contest_rolls_everyone_once() {
        let tables = RuleTables::default();
        let gm = Entity::character("Mira").as_gm();
        let a = Entity::character("Aria").with_stat("wits", 3);
        let b = Entity::character("Bram").with_stat("wits", 1);
        let contest = Contest::new(
            &gm,
            vec![&a, &b],
            "Wits",
            Some("Investigation"),
            DifficultyRating::new("hard", 40),
        );
        assert_eq!(
            contest.header(),
            "Mira has called for a check of wits and investigation at hard."
        );

        let mut rng = StdRng::seed_from_u64(3);
        let outcome = contest.perform(&tables, &mut rng).unwrap();
        assert_eq!(outcome.rolls.len(), 2);
        assert!(outcome.rolls.iter().all(Roll::is_resolved));
        let ranked: usize = outcome.ranking.groups().iter().map(Vec::len).sum();
        assert_eq!(ranked, 2);
        assert!(outcome.message.starts_with(&contest.header()));
        assert_eq!(outcome.message.lines().count(), 1 + outcome.ranking.len());
    }
}
