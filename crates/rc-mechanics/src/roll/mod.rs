//! Rolls: one stochastic evaluation of a stat (and optional skill) against a difficulty.
//!
//! Every variant shares one [`Roll::execute`] algorithm:
//!
//! ```text
//! net = raw + stat + skill + extra - difficulty
//! ```
//!
//! The [`RollSource`] decides where the stat, skill, and extra contributions
//! come from, who is named in the result, and how the prefix reads.

pub mod scripted;

pub use scripted::{CheckDefinition, DifficultySource, DifficultyTier, TraitKind};

use rand::Rng;
use rand::rngs::StdRng;
use rc_core::{Entity, TraitSource};

use crate::compare::{self, TIE_THRESHOLD};
use crate::error::{MechError, MechResult};
use crate::tables::{
    DifficultyRating, NaturalRollType, RenderContext, RollResultBand, RuleTables, WeightTable,
};

/// How a spoofed roll treats natural results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpoofMode {
    /// No natural classification: never critical, never a botch.
    #[default]
    Standard,
    /// Natural classification applies as for a character roll.
    CanCrit,
    /// Forced failure: raw draw fixed at 1, band picked at random among failures.
    Flub,
}

/// Where a roll's contributions come from.
#[derive(Debug, Clone)]
pub enum RollSource<'a> {
    /// The actor's own traits and knacks.
    Plain,
    /// A retainer's traits, with the actor's knacks.
    Proxy {
        /// The bound retainer; `None` contributes nothing.
        proxy: Option<&'a Entity>,
    },
    /// Magnitudes supplied directly, as for an NPC the GM is running.
    Spoofed {
        /// Stat magnitude.
        stat_value: u32,
        /// Skill magnitude.
        skill_value: u32,
        /// Name shown in the result instead of the GM's.
        npc_name: Option<String>,
        /// Natural-roll handling.
        mode: SpoofMode,
    },
    /// A pre-configured check definition.
    Scripted {
        /// The definition.
        check: &'a CheckDefinition,
        /// Whose state sets the difficulty; the actor when `None`.
        target: Option<&'a Entity>,
    },
}

/// The resolved state of a roll. Written once, never changed.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The d100 draw.
    pub raw: u32,
    /// Weighted stat contribution.
    pub stat_contribution: i32,
    /// Weighted skill contribution.
    pub skill_contribution: i32,
    /// Weighted knack contribution.
    pub extra_contribution: i32,
    /// The difficulty the roll was made at.
    pub difficulty: DifficultyRating,
    /// Net result after contributions and difficulty.
    pub net: i32,
    /// Position of `band` in the rule tables, lowest first.
    pub ordinal: usize,
    /// The result band.
    pub band: RollResultBand,
    /// Critical or botch classification of the raw draw.
    pub natural: Option<NaturalRollType>,
    /// The rendered single-line result.
    pub description: String,
}

impl Resolution {
    /// The band is a success band.
    pub fn is_success(&self) -> bool {
        self.band.is_success()
    }

    /// The raw draw was a critical.
    pub fn is_critical(&self) -> bool {
        self.natural.as_ref().is_some_and(|n| n.is_critical())
    }

    /// The raw draw was a botch.
    pub fn is_botch(&self) -> bool {
        self.natural.as_ref().is_some_and(|n| n.is_botch())
    }
}

#[derive(Debug, Default)]
struct Contributions {
    stat: i32,
    skill: i32,
    extra: i32,
}

impl Contributions {
    fn total(&self) -> i32 {
        self.stat.saturating_add(self.skill).saturating_add(self.extra)
    }
}

/// One check, owned by whoever created it.
#[derive(Debug, Clone)]
pub struct Roll<'a> {
    actor: Option<&'a Entity>,
    stat: Option<String>,
    skill: Option<String>,
    rating: Option<DifficultyRating>,
    source: RollSource<'a>,
    tie_threshold: i32,
    resolution: Option<Resolution>,
}

impl<'a> Roll<'a> {
    /// An unresolved roll with no actor, traits, or rating yet.
    pub fn new(source: RollSource<'a>) -> Self {
        Self {
            actor: None,
            stat: None,
            skill: None,
            rating: None,
            source,
            tie_threshold: TIE_THRESHOLD,
            resolution: None,
        }
    }

    /// A character rolling their own traits.
    pub fn plain(
        actor: &'a Entity,
        stat: &str,
        skill: Option<&str>,
        rating: DifficultyRating,
    ) -> Self {
        Self::new(RollSource::Plain)
            .with_actor(actor)
            .with_traits(stat, skill)
            .with_rating(rating)
    }

    /// A character rolling on behalf of a retainer.
    pub fn proxy(
        actor: &'a Entity,
        proxy: Option<&'a Entity>,
        stat: &str,
        skill: Option<&str>,
        rating: DifficultyRating,
    ) -> Self {
        Self::new(RollSource::Proxy { proxy })
            .with_actor(actor)
            .with_traits(stat, skill)
            .with_rating(rating)
    }

    /// A GM rolling supplied magnitudes.
    ///
    /// `skill` pairs a skill name with its magnitude.
    pub fn spoofed(
        gm: Option<&'a Entity>,
        stat: (&str, u32),
        skill: Option<(&str, u32)>,
        npc_name: Option<&str>,
        mode: SpoofMode,
        rating: DifficultyRating,
    ) -> Self {
        let roll = Self::new(RollSource::Spoofed {
            stat_value: stat.1,
            skill_value: skill.map(|(_, v)| v).unwrap_or(0),
            npc_name: npc_name.map(str::to_string),
            mode,
        })
        .with_traits(stat.0, skill.map(|(name, _)| name))
        .with_rating(rating);
        match gm {
            Some(gm) => roll.with_actor(gm),
            None => roll,
        }
    }

    /// A character rolling a pre-configured check.
    ///
    /// Without a rating, the check resolves one against `target` (or the actor).
    pub fn scripted(
        actor: &'a Entity,
        check: &'a CheckDefinition,
        target: Option<&'a Entity>,
        rating: Option<DifficultyRating>,
    ) -> Self {
        let roll = Self::new(RollSource::Scripted { check, target }).with_actor(actor);
        match rating {
            Some(rating) => roll.with_rating(rating),
            None => roll,
        }
    }

    /// Set the actor.
    pub fn with_actor(mut self, actor: &'a Entity) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Set the stat and optional skill. Names are normalized to lowercase.
    pub fn with_traits(mut self, stat: &str, skill: Option<&str>) -> Self {
        self.stat = Some(stat.trim().to_lowercase());
        self.skill = skill.map(|s| s.trim().to_lowercase());
        self
    }

    /// Set an explicit difficulty rating.
    pub fn with_rating(mut self, rating: DifficultyRating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the tie threshold used by [`Roll::ties`] and [`Roll::is_less`].
    pub fn with_tie_threshold(mut self, threshold: i32) -> Self {
        self.tie_threshold = threshold;
        self
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Draw and resolve the roll.
    ///
    /// Fails if the roll was already executed, if a character-sourced roll
    /// has no actor, if a spoofed roll has neither GM nor NPC name, or if no
    /// difficulty can be determined.
    pub fn execute(&mut self, tables: &RuleTables, rng: &mut StdRng) -> MechResult<&Resolution> {
        if self.resolution.is_some() {
            return Err(MechError::InvalidRollState(
                "roll has already been executed".to_string(),
            ));
        }
        self.check_identity()?;

        let difficulty = self.resolve_difficulty(tables)?;
        let contributions = self.contributions(tables.weights());
        let mode = self.spoof_mode();

        let raw: u32 = if mode == Some(SpoofMode::Flub) {
            1
        } else {
            rng.random_range(1..=100)
        };
        let net = contributions
            .total()
            .saturating_add(i32::try_from(raw).unwrap_or(i32::MAX))
            .saturating_sub(difficulty.value);

        let natural = match mode {
            Some(SpoofMode::Standard) => None,
            _ => tables.classify_natural(raw).cloned(),
        };

        let (ordinal, band) = if mode == Some(SpoofMode::Flub) {
            tables.random_failure_band(rng)
        } else {
            tables.band_for_value(net)
        };

        let description = band.render(&RenderContext {
            character: &self.shown_name(),
            raw,
            roll: net,
            natural: natural.as_ref(),
        });

        tracing::debug!(
            actor = %self.actor_name(),
            raw,
            net,
            band = %band.name,
            difficulty = %difficulty.name,
            "roll resolved"
        );

        Ok(&*self.resolution.insert(Resolution {
            raw,
            stat_contribution: contributions.stat,
            skill_contribution: contributions.skill,
            extra_contribution: contributions.extra,
            difficulty,
            net,
            ordinal,
            band: band.clone(),
            natural,
            description,
        }))
    }

    fn check_identity(&self) -> MechResult<()> {
        match &self.source {
            RollSource::Spoofed { npc_name, .. } => {
                if self.actor.is_none() && npc_name.is_none() {
                    return Err(MechError::InvalidRollState(
                        "spoofed roll needs a GM or an NPC name".to_string(),
                    ));
                }
            }
            _ => {
                if self.actor.is_none() {
                    return Err(MechError::InvalidRollState(
                        "roll has no actor".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn resolve_difficulty(&self, tables: &RuleTables) -> MechResult<DifficultyRating> {
        if let Some(rating) = &self.rating {
            return Ok(rating.clone());
        }
        match (&self.source, self.actor) {
            (RollSource::Scripted { check, target }, Some(actor)) => {
                check.difficulty_for(target.unwrap_or(actor), tables)
            }
            _ => Err(MechError::InvalidRollState(
                "roll has no difficulty rating".to_string(),
            )),
        }
    }

    fn contributions(&self, weights: &dyn WeightTable) -> Contributions {
        match &self.source {
            RollSource::Plain => match self.actor {
                Some(actor) => Contributions {
                    stat: self.weighted_stat(actor, weights),
                    skill: self.weighted_skill(actor, weights),
                    extra: self.weighted_knacks(weights),
                },
                None => Contributions::default(),
            },
            RollSource::Proxy { proxy } => match proxy {
                Some(proxy) => Contributions {
                    stat: self.weighted_stat(*proxy, weights),
                    skill: self.weighted_skill(*proxy, weights),
                    extra: self.weighted_knacks(weights),
                },
                None => Contributions {
                    extra: self.weighted_knacks(weights),
                    ..Contributions::default()
                },
            },
            RollSource::Spoofed {
                stat_value,
                skill_value,
                ..
            } => Contributions {
                stat: match &self.stat {
                    Some(_) => weights.weighted_stat(*stat_value, self.skill.is_none()),
                    None => 0,
                },
                skill: match &self.skill {
                    Some(_) => weights.weighted_skill(*skill_value),
                    None => 0,
                },
                extra: 0,
            },
            RollSource::Scripted { check, .. } => match self.actor {
                Some(actor) => {
                    let (stat, skill) = check.trait_values(actor, weights);
                    let extra = actor
                        .modifiers()
                        .map(|m| m.total_modifier(&check.stat_names(), &check.skill_names()))
                        .map(|total| weights.weighted_knack(total))
                        .unwrap_or(0);
                    Contributions { stat, skill, extra }
                }
                None => Contributions::default(),
            },
        }
    }

    fn weighted_stat(&self, source: &dyn TraitSource, weights: &dyn WeightTable) -> i32 {
        match &self.stat {
            Some(stat) => weights.weighted_stat(source.stat_value(stat), self.skill.is_none()),
            None => 0,
        }
    }

    fn weighted_skill(&self, source: &dyn TraitSource, weights: &dyn WeightTable) -> i32 {
        match &self.skill {
            Some(skill) => weights.weighted_skill(source.skill_value(skill)),
            None => 0,
        }
    }

    fn weighted_knacks(&self, weights: &dyn WeightTable) -> i32 {
        let Some(mods) = self.actor.and_then(|a| a.modifiers()) else {
            return 0;
        };
        let stats: Vec<&str> = self.stat.as_deref().into_iter().collect();
        let skills: Vec<&str> = self.skill.as_deref().into_iter().collect();
        weights.weighted_knack(mods.total_modifier(&stats, &skills))
    }

    fn spoof_mode(&self) -> Option<SpoofMode> {
        match &self.source {
            RollSource::Spoofed { mode, .. } => Some(*mode),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The resolved state, once executed.
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// The resolved state, or an error if the roll has not been executed.
    pub fn require_resolution(&self) -> MechResult<&Resolution> {
        self.resolution
            .as_ref()
            .ok_or_else(|| MechError::InvalidRollState("roll has not been executed".to_string()))
    }

    /// Returns true once executed.
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Resolved into a success band.
    pub fn is_success(&self) -> bool {
        self.resolution.as_ref().is_some_and(Resolution::is_success)
    }

    /// Resolved with a critical natural roll.
    pub fn is_critical(&self) -> bool {
        self.resolution.as_ref().is_some_and(Resolution::is_critical)
    }

    /// Resolved with a botched natural roll.
    pub fn is_botch(&self) -> bool {
        self.resolution.as_ref().is_some_and(Resolution::is_botch)
    }

    /// The actor, if any.
    pub fn actor(&self) -> Option<&'a Entity> {
        self.actor
    }

    /// The roll's variant.
    pub fn source(&self) -> &RollSource<'a> {
        &self.source
    }

    /// The stat name, lowercased.
    pub fn stat(&self) -> Option<&str> {
        self.stat.as_deref()
    }

    /// The skill name, lowercased.
    pub fn skill(&self) -> Option<&str> {
        self.skill.as_deref()
    }

    /// The actor's name, or "The GM" for an actor-less spoofed roll.
    pub fn actor_name(&self) -> String {
        match self.actor {
            Some(actor) => actor.name.clone(),
            None => "The GM".to_string(),
        }
    }

    /// The name a result is rendered under: the retainer's short name for
    /// proxy rolls, the NPC's name for spoofed rolls that have one, and the
    /// actor's name otherwise.
    pub fn shown_name(&self) -> String {
        match &self.source {
            RollSource::Proxy { proxy: Some(proxy) } => proxy.short_name().to_string(),
            RollSource::Spoofed {
                npc_name: Some(npc),
                ..
            } => npc.clone(),
            _ => self.actor_name(),
        }
    }

    /// The rendered result line, once executed.
    pub fn description(&self) -> Option<&str> {
        self.resolution.as_ref().map(|r| r.description.as_str())
    }

    /// Who is rolling what at what difficulty, once executed.
    pub fn prefix(&self) -> Option<String> {
        let resolution = self.resolution.as_ref()?;
        let rating = &resolution.difficulty;
        let actor = self.actor_name();
        let prefix = match &self.source {
            RollSource::Plain => {
                format!("{actor} checks {}.", self.check_string(rating))
            }
            RollSource::Proxy { proxy } => match proxy {
                Some(proxy) => format!(
                    "{actor}'s retainer ({}|n) checks {}.",
                    proxy.name,
                    self.check_string(rating)
                ),
                None => format!("{actor}'s retainer checks {}.", self.check_string(rating)),
            },
            RollSource::Spoofed {
                stat_value,
                skill_value,
                npc_name,
                ..
            } => {
                let checked = self.spoof_check_string(*stat_value, *skill_value, rating);
                match npc_name {
                    Some(npc) => format!("{actor} GM checks |c{npc}'s|n {checked}."),
                    None => format!("|c{actor}|n GM checks {checked}."),
                }
            }
            RollSource::Scripted { check, .. } => {
                format!("{actor} checks '{check}' at {rating}.")
            }
        };
        Some(prefix)
    }

    /// Prefix and description on one line, once executed.
    pub fn message(&self) -> Option<String> {
        Some(format!("{} {}", self.prefix()?, self.description()?))
    }

    /// The scripted check's outcome text for the resolved band.
    pub fn outcome(&self) -> Option<&'a str> {
        let resolution = self.resolution.as_ref()?;
        match &self.source {
            RollSource::Scripted { check, .. } => {
                let check: &'a CheckDefinition = *check;
                check.outcome_for(&resolution.band.name)
            }
            _ => None,
        }
    }

    fn check_string(&self, rating: &DifficultyRating) -> String {
        check_string(self.stat.as_deref().unwrap_or(""), self.skill.as_deref(), rating)
    }

    fn spoof_check_string(&self, stat_value: u32, skill_value: u32, rating: &DifficultyRating) -> String {
        let stat = self.stat.as_deref().unwrap_or("");
        match &self.skill {
            Some(skill) => {
                format!("{stat} ({stat_value}) and {skill} ({skill_value}) at {rating}")
            }
            None => format!("{stat} ({stat_value}) at {rating}"),
        }
    }

    // -----------------------------------------------------------------------
    // Comparison
    // -----------------------------------------------------------------------

    /// Whether two executed rolls tie under this roll's threshold.
    pub fn ties(&self, other: &Roll<'_>) -> MechResult<bool> {
        Ok(compare::ties(
            self.require_resolution()?,
            other.require_resolution()?,
            self.tie_threshold,
        ))
    }

    /// Whether this executed roll ranks strictly below another.
    pub fn is_less(&self, other: &Roll<'_>) -> MechResult<bool> {
        Ok(compare::is_less(
            self.require_resolution()?,
            other.require_resolution()?,
            self.tie_threshold,
        ))
    }
}

/// "stat and skill at rating", or "stat at rating" without a skill.
pub fn check_string(stat: &str, skill: Option<&str>, rating: &DifficultyRating) -> String {
    match skill {
        Some(skill) => format!("{stat} and {skill} at {rating}"),
        None => format!("{stat} at {rating}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rc_core::Knack;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn hard() -> DifficultyRating {
        DifficultyRating::new("hard", 40)
    }

    fn kael() -> Entity {
        Entity::character("Kael")
            .with_stat("dexterity", 3)
            .with_skill("melee", 2)
            .with_knack(Knack {
                name: "Duelist".into(),
                stat: "dexterity".into(),
                skill: Some("melee".into()),
                value: 1,
            })
    }

    #[test]
    fn plain_roll_formula() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut roll = Roll::plain(&kael, "Dexterity", Some("Melee"), hard());
        let r = roll.execute(&tables, &mut rng()).unwrap().clone();
        assert!((1..=100).contains(&r.raw));
        assert_eq!(r.stat_contribution, 15);
        assert_eq!(r.skill_contribution, 10);
        assert_eq!(r.extra_contribution, 5);
        assert_eq!(r.net, r.raw as i32 + 15 + 10 + 5 - 40);
        assert_eq!(r.band, tables.band_for_value(r.net).1.clone());
    }

    #[test]
    fn stat_alone_weighs_more() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut alone = Roll::plain(&kael, "dexterity", None, hard());
        let r = alone.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.stat_contribution, 30);
        assert_eq!(r.skill_contribution, 0);
        // The knack needs melee, so it does not apply to a bare stat roll.
        assert_eq!(r.extra_contribution, 0);
    }

    #[test]
    fn huge_trait_values_saturate() {
        let tables = RuleTables::default();
        let big = Entity::character("Big")
            .with_stat("strength", 300_000_000)
            .with_skill("athletics", u32::MAX);
        let mut roll = Roll::plain(&big, "strength", Some("athletics"), hard());
        let r = roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.net, i32::MAX - 40);
        assert!(r.band.ceiling.is_none());
        assert!(r.is_success());
    }

    #[test]
    fn missing_modifier_capability_contributes_zero() {
        let tables = RuleTables::default();
        let plain = Entity::character("Plain").with_stat("dexterity", 3);
        assert!(plain.modifiers().is_none());
        let mut roll = Roll::plain(&plain, "dexterity", None, hard());
        assert_eq!(roll.execute(&tables, &mut rng()).unwrap().extra_contribution, 0);
    }

    #[test]
    fn same_seed_same_result() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut a = Roll::plain(&kael, "dexterity", Some("melee"), hard());
        let mut b = Roll::plain(&kael, "dexterity", Some("melee"), hard());
        let ra = a.execute(&tables, &mut rng()).unwrap().net;
        let rb = b.execute(&tables, &mut rng()).unwrap().net;
        assert_eq!(ra, rb);
    }

    #[test]
    fn execute_twice_fails() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut roll = Roll::plain(&kael, "dexterity", None, hard());
        roll.execute(&tables, &mut rng()).unwrap();
        let first = roll.resolution().unwrap().raw;
        assert!(matches!(
            roll.execute(&tables, &mut rng()),
            Err(MechError::InvalidRollState(_))
        ));
        assert_eq!(roll.resolution().unwrap().raw, first);
    }

    #[test]
    fn missing_actor_fails() {
        let tables = RuleTables::default();
        let mut roll = Roll::new(RollSource::Plain)
            .with_traits("dexterity", None)
            .with_rating(hard());
        assert!(matches!(
            roll.execute(&tables, &mut rng()),
            Err(MechError::InvalidRollState(_))
        ));
        assert!(!roll.is_resolved());
    }

    #[test]
    fn missing_rating_fails() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut roll = Roll::new(RollSource::Plain)
            .with_actor(&kael)
            .with_traits("dexterity", None);
        assert!(roll.execute(&tables, &mut rng()).is_err());
    }

    #[test]
    fn unresolved_accessors() {
        let kael = kael();
        let roll = Roll::plain(&kael, "dexterity", None, hard());
        assert!(!roll.is_success());
        assert!(!roll.is_critical());
        assert!(!roll.is_botch());
        assert!(roll.description().is_none());
        assert!(roll.prefix().is_none());
        assert!(roll.message().is_none());
        assert!(roll.require_resolution().is_err());
    }

    #[test]
    fn plain_prefix_and_message() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut roll = Roll::plain(&kael, "dexterity", Some("melee"), hard());
        roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(
            roll.prefix().unwrap(),
            "Kael checks dexterity and melee at hard."
        );
        let message = roll.message().unwrap();
        assert!(message.starts_with("Kael checks dexterity and melee at hard. Kael "));
        // Rendering never redraws.
        assert_eq!(roll.message().unwrap(), message);
        assert_eq!(roll.description(), roll.description());
    }

    #[test]
    fn proxy_uses_retainer_traits_and_short_name() {
        let tables = RuleTables::default();
        let kael = kael();
        let tomas = Entity::retainer("Tomas, Keeper of Keys")
            .with_stat("dexterity", 1)
            .with_skill("melee", 4);
        let mut roll = Roll::proxy(&kael, Some(&tomas), "dexterity", Some("melee"), hard());
        let r = roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.stat_contribution, 5);
        assert_eq!(r.skill_contribution, 20);
        assert!(r.description.starts_with("Tomas "));
        assert_eq!(
            roll.prefix().unwrap(),
            "Kael's retainer (Tomas, Keeper of Keys|n) checks dexterity and melee at hard."
        );
    }

    #[test]
    fn proxy_without_retainer_contributes_zero() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut roll = Roll::proxy(&kael, None, "dexterity", None, hard());
        let r = roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.stat_contribution, 0);
        assert_eq!(r.skill_contribution, 0);
    }

    #[test]
    fn spoofed_roll_uses_given_values_and_no_knacks() {
        let tables = RuleTables::default();
        let gm = kael();
        let mut roll = Roll::spoofed(
            Some(&gm),
            ("dexterity", 4),
            Some(("melee", 6)),
            Some("Bandit Chief"),
            SpoofMode::Standard,
            hard(),
        );
        let r = roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.stat_contribution, 20);
        assert_eq!(r.skill_contribution, 28);
        assert_eq!(r.extra_contribution, 0);
        assert!(r.natural.is_none());
        assert!(r.description.starts_with("Bandit Chief "));
        assert_eq!(
            roll.prefix().unwrap(),
            "Kael GM checks |cBandit Chief's|n dexterity (4) and melee (6) at hard."
        );
    }

    #[test]
    fn spoofed_without_npc_names_the_gm() {
        let tables = RuleTables::default();
        let gm = kael();
        let mut roll = Roll::spoofed(
            Some(&gm),
            ("strength", 2),
            None,
            None,
            SpoofMode::CanCrit,
            hard(),
        );
        roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(
            roll.prefix().unwrap(),
            "|cKael|n GM checks strength (2) at hard."
        );
        assert!(roll.description().unwrap().starts_with("Kael "));
    }

    #[test]
    fn spoofed_needs_gm_or_npc() {
        let tables = RuleTables::default();
        let mut roll = Roll::spoofed(None, ("strength", 2), None, None, SpoofMode::Standard, hard());
        assert!(roll.execute(&tables, &mut rng()).is_err());

        let mut npc_only = Roll::spoofed(
            None,
            ("strength", 2),
            None,
            Some("Ogre"),
            SpoofMode::Standard,
            hard(),
        );
        assert!(npc_only.execute(&tables, &mut rng()).is_ok());
    }

    #[test]
    fn flub_always_fails() {
        let tables = RuleTables::default();
        let mut rng = rng();
        for _ in 0..100 {
            let mut roll = Roll::spoofed(
                None,
                ("strength", 20),
                Some(("athletics", 20)),
                Some("Ogre"),
                SpoofMode::Flub,
                DifficultyRating::new("easy", 0),
            );
            let r = roll.execute(&tables, &mut rng).unwrap();
            assert_eq!(r.raw, 1);
            assert!(!r.is_success());
            assert_eq!(tables.bands()[r.ordinal], r.band);
            assert!(r.is_botch());
            assert!(!roll.is_success());
        }
    }

    #[test]
    fn scripted_roll_resolves_difficulty_from_target() {
        let tables = RuleTables::default();
        let check = CheckDefinition {
            name: "Resist Poison".into(),
            stats: vec!["stamina".into()],
            skills: vec![],
            difficulty: DifficultySource::TargetTrait {
                name: "potency".into(),
                kind: TraitKind::Stat,
                tiers: vec![
                    DifficultyTier {
                        at_least: 0,
                        rating: "easy".into(),
                    },
                    DifficultyTier {
                        at_least: 5,
                        rating: "legendary".into(),
                    },
                ],
            },
            outcomes: Default::default(),
        };
        let kael = Entity::character("Kael").with_stat("stamina", 2).with_knack(Knack {
            name: "Iron Gut".into(),
            stat: "stamina".into(),
            skill: None,
            value: 2,
        });
        let venom = Entity::new(rc_core::EntityKind::Item, "Venom").with_stat("potency", 6);

        let mut roll = Roll::scripted(&kael, &check, Some(&venom), None);
        let r = roll.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.difficulty.name, "legendary");
        assert_eq!(r.stat_contribution, 20);
        assert_eq!(r.extra_contribution, 10);
        assert_eq!(
            roll.prefix().unwrap(),
            "Kael checks 'Resist Poison' at legendary."
        );

        let mut against_self = Roll::scripted(&kael, &check, None, None);
        let r = against_self.execute(&tables, &mut rng()).unwrap();
        assert_eq!(r.difficulty.name, "easy");
    }

    #[test]
    fn scripted_explicit_rating_wins() {
        let tables = RuleTables::default();
        let check = CheckDefinition {
            name: "Climb".into(),
            stats: vec!["strength".into()],
            skills: vec!["athletics".into()],
            difficulty: DifficultySource::Fixed {
                rating: "legendary".into(),
            },
            outcomes: [("failure".to_string(), "You slip.".to_string())].into(),
        };
        let kael = Entity::character("Kael");
        let mut roll = Roll::scripted(&kael, &check, None, Some(DifficultyRating::new("easy", 10)));
        let r = roll.execute(&tables, &mut rng()).unwrap().clone();
        assert_eq!(r.difficulty.name, "easy");
        assert_eq!(roll.outcome(), check.outcome_for(&r.band.name));
    }

    #[test]
    fn critical_and_botch_flags_follow_natural() {
        let tables = RuleTables::default();
        let kael = kael();
        let mut rng = rng();
        let mut saw_crit = false;
        let mut saw_botch = false;
        for _ in 0..2000 {
            let mut roll = Roll::plain(&kael, "dexterity", None, hard());
            let raw = roll.execute(&tables, &mut rng).unwrap().raw;
            assert_eq!(roll.is_critical(), raw >= 98);
            assert_eq!(roll.is_botch(), raw <= 2);
            saw_crit |= roll.is_critical();
            saw_botch |= roll.is_botch();
        }
        assert!(saw_crit && saw_botch);
    }
}
