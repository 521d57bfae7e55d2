//! The check session: resolve, then announce.
//!
//! Single checks go to the actor's room (public) or to a private audience:
//! the actor plus named players and player GMs, and every staff member in
//! the room. Contests, opposed checks, and group checks are always
//! broadcast to the caller's room, or to the caller alone when they are
//! nowhere.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rc_core::{Entity, EntityId, EntityKind, Roster};
use rc_mechanics::{
    CheckDefinition, Contest, DifficultyRating, EngineConfig, GroupCheck, MechResult,
    OpposedCheck, Roll, RuleTables,
};
use rc_notify::{AudienceFlags, Delivery, MessageOptions, Notifier, SharedWith};

use crate::error::{SessionError, SessionResult};
use crate::report::{CheckReport, ReportKind, RollSummary};
use crate::request::{Audience, SpoofCheck, TraitCheck};

/// A running check session.
pub struct CheckSession {
    roster: Roster,
    tables: RuleTables,
    config: EngineConfig,
    checks: BTreeMap<String, CheckDefinition>,
    delivery: Arc<dyn Delivery>,
    rng: StdRng,
}

impl CheckSession {
    /// Create a session. The RNG is seeded from `config`.
    pub fn new(
        roster: Roster,
        tables: RuleTables,
        config: EngineConfig,
        delivery: Arc<dyn Delivery>,
    ) -> Self {
        let rng = config.rng();
        Self {
            roster,
            tables,
            config,
            checks: BTreeMap::new(),
            delivery,
            rng,
        }
    }

    /// Register defined checks, replacing any with the same name.
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = CheckDefinition>) -> Self {
        for check in checks {
            self.checks.insert(check.name.to_lowercase(), check);
        }
        self
    }

    /// Register defined checks from a JSON array. Returns how many were loaded.
    pub fn load_checks(&mut self, json: &str) -> SessionResult<usize> {
        let checks: Vec<CheckDefinition> = serde_json::from_str(json)?;
        let count = checks.len();
        for check in checks {
            self.checks.insert(check.name.to_lowercase(), check);
        }
        Ok(count)
    }

    /// The roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The rule tables.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Defined checks, sorted by name.
    pub fn checks(&self) -> impl Iterator<Item = &CheckDefinition> {
        self.checks.values()
    }

    // -----------------------------------------------------------------------
    // Single checks
    // -----------------------------------------------------------------------

    /// A check everyone in the actor's room sees.
    pub fn public_check(&mut self, actor: &str, check: &TraitCheck) -> SessionResult<CheckReport> {
        self.check(actor, check, &Audience::Public)
    }

    /// A check only the actor, the named receivers, and staff in the room see.
    pub fn private_check(
        &mut self,
        actor: &str,
        check: &TraitCheck,
        receivers: &[String],
    ) -> SessionResult<CheckReport> {
        self.check(actor, check, &Audience::Private(receivers.to_vec()))
    }

    /// A character rolling their own traits.
    pub fn check(
        &mut self,
        actor: &str,
        check: &TraitCheck,
        audience: &Audience,
    ) -> SessionResult<CheckReport> {
        let actor = character(&self.roster, actor)?;
        let rating = rating(&self.tables, check.rating.as_deref())?;
        let mut roll = Roll::plain(actor, &check.stat, check.skill.as_deref(), rating)
            .with_tie_threshold(self.config.tie_threshold);
        roll.execute(&self.tables, &mut self.rng)?;
        let summary = RollSummary::from_roll(&roll)?;
        Ok(announce(&self.roster, self.delivery.as_ref(), actor, summary, audience))
    }

    /// A character rolling on behalf of one of their retainers.
    ///
    /// With no retainer the roll still happens, with zero trait contribution.
    pub fn retainer_check(
        &mut self,
        actor: &str,
        retainer: Option<&str>,
        check: &TraitCheck,
        audience: &Audience,
    ) -> SessionResult<CheckReport> {
        let actor = character(&self.roster, actor)?;
        let proxy = match retainer {
            Some(name) => {
                let proxy = entity(&self.roster, name)?;
                if proxy.kind != EntityKind::Retainer {
                    return Err(SessionError::WrongKind(format!(
                        "{} is not a retainer.",
                        proxy.name
                    )));
                }
                Some(proxy)
            }
            None => None,
        };
        let rating = rating(&self.tables, check.rating.as_deref())?;
        let mut roll = Roll::proxy(actor, proxy, &check.stat, check.skill.as_deref(), rating)
            .with_tie_threshold(self.config.tie_threshold);
        roll.execute(&self.tables, &mut self.rng)?;
        let summary = RollSummary::from_roll(&roll)?;
        Ok(announce(&self.roster, self.delivery.as_ref(), actor, summary, audience))
    }

    /// A GM rolling supplied magnitudes, usually for an NPC.
    pub fn gm_check(
        &mut self,
        gm: &str,
        check: &SpoofCheck,
        audience: &Audience,
    ) -> SessionResult<CheckReport> {
        let gm = character(&self.roster, gm)?;
        require_gm(gm)?;
        let rating = rating(&self.tables, check.rating.as_deref())?;
        let mut roll = Roll::spoofed(
            Some(gm),
            (&check.stat.0, check.stat.1),
            check.skill.as_ref().map(|(name, value)| (name.as_str(), *value)),
            check.npc.as_deref(),
            check.mode,
            rating,
        )
        .with_tie_threshold(self.config.tie_threshold);
        roll.execute(&self.tables, &mut self.rng)?;
        let summary = RollSummary::from_roll(&roll)?;
        Ok(announce(&self.roster, self.delivery.as_ref(), gm, summary, audience))
    }

    /// A defined check. Without a rating, the check picks one from `target`
    /// (or the actor when there is no target).
    pub fn defined_check(
        &mut self,
        actor: &str,
        check: &str,
        target: Option<&str>,
        rating_name: Option<&str>,
        audience: &Audience,
    ) -> SessionResult<CheckReport> {
        let actor = character(&self.roster, actor)?;
        let definition = self
            .checks
            .get(&check.trim().to_lowercase())
            .ok_or_else(|| SessionError::UnknownCheck(check.to_string()))?;
        let target = target.map(|name| entity(&self.roster, name)).transpose()?;
        let rating = rating_name
            .map(|name| self.tables.require_difficulty(name).cloned())
            .transpose()?;
        let mut roll = Roll::scripted(actor, definition, target, rating)
            .with_tie_threshold(self.config.tie_threshold);
        roll.execute(&self.tables, &mut self.rng)?;
        let summary = RollSummary::from_roll(&roll)?;
        Ok(announce(&self.roster, self.delivery.as_ref(), actor, summary, audience))
    }

    // -----------------------------------------------------------------------
    // Multi-roll checks
    // -----------------------------------------------------------------------

    /// Every named participant rolls the same check; results are ranked.
    pub fn contested_check(
        &mut self,
        caller: &str,
        participants: &[String],
        check: &TraitCheck,
    ) -> SessionResult<CheckReport> {
        let caller = character(&self.roster, caller)?;
        require_gm(caller)?;
        if participants.is_empty() {
            return Err(SessionError::InvalidRequest(
                "You must specify the names of characters for the contest.".to_string(),
            ));
        }
        let participants = participants
            .iter()
            .map(|name| character(&self.roster, name).map(|e| e.id))
            .collect::<SessionResult<Vec<_>>>()?;
        let caller = caller.id;
        self.run_contest(caller, &participants, check)
    }

    /// Every other character in the caller's room rolls the same check.
    pub fn contest_here(&mut self, caller: &str, check: &TraitCheck) -> SessionResult<CheckReport> {
        let caller = character(&self.roster, caller)?;
        require_gm(caller)?;
        let room = caller.location.ok_or_else(|| {
            SessionError::InvalidRequest("You are not in a room.".to_string())
        })?;
        let participants: Vec<EntityId> = self
            .roster
            .contents(room)
            .into_iter()
            .filter(|e| e.kind.is_character() && e.id != caller.id)
            .map(|e| e.id)
            .collect();
        let caller = caller.id;
        self.run_contest(caller, &participants, check)
    }

    fn run_contest(
        &mut self,
        caller: EntityId,
        participants: &[EntityId],
        check: &TraitCheck,
    ) -> SessionResult<CheckReport> {
        let caller = self.roster.require(caller)?;
        let participants = participants
            .iter()
            .map(|&id| self.roster.require(id))
            .collect::<Result<Vec<_>, _>>()?;
        let rating = rating(&self.tables, check.rating.as_deref())?;
        let outcome = Contest::new(caller, participants, &check.stat, check.skill.as_deref(), rating)
            .with_tie_threshold(self.config.tie_threshold)
            .perform(&self.tables, &mut self.rng)?;
        let rolls = summarize(&outcome.rolls)?;
        let recipients = broadcast(&self.roster, self.delivery.as_ref(), caller, &outcome.message);
        Ok(CheckReport {
            kind: ReportKind::Contest(outcome.ranking),
            rolls,
            message: outcome.message,
            recipients,
        })
    }

    /// Caller and target each roll their own check; the higher result wins.
    ///
    /// Both rolls share one rating: the left check's, else the first in the tables.
    pub fn opposed_check(
        &mut self,
        caller: &str,
        target: &str,
        left: &TraitCheck,
        right: &TraitCheck,
    ) -> SessionResult<CheckReport> {
        let caller = character(&self.roster, caller)?;
        let target = entity(&self.roster, target)?;
        if !target.kind.is_character() {
            return Err(SessionError::WrongKind("That is not a character.".to_string()));
        }
        let rating = rating(&self.tables, left.rating.as_deref())?;
        let outcome = OpposedCheck::new(
            caller,
            target,
            Roll::plain(caller, &left.stat, left.skill.as_deref(), rating.clone()),
            Roll::plain(target, &right.stat, right.skill.as_deref(), rating),
        )?
        .with_tie_threshold(self.config.tie_threshold)
        .perform(&self.tables, &mut self.rng)?;

        let rolls = vec![
            RollSummary::from_roll(&outcome.left)?,
            RollSummary::from_roll(&outcome.right)?,
        ];
        let recipients = broadcast(&self.roster, self.delivery.as_ref(), caller, &outcome.message);
        Ok(CheckReport {
            kind: ReportKind::Opposed(outcome.verdict),
            rolls,
            message: outcome.message,
            recipients,
        })
    }

    /// The leader and each helper roll the same check.
    pub fn group_check(
        &mut self,
        leader: &str,
        helpers: &[String],
        check: &TraitCheck,
    ) -> SessionResult<CheckReport> {
        if helpers.is_empty() {
            return Err(SessionError::InvalidRequest(
                "You must specify who is assisting you.".to_string(),
            ));
        }
        let leader = character(&self.roster, leader)?;
        let mut found = Vec::with_capacity(helpers.len());
        for name in helpers {
            match character(&self.roster, name) {
                Ok(helper) => found.push(helper),
                Err(SessionError::UnknownEntity(_)) => {
                    tracing::debug!(name = %name, "skipping unresolved helper");
                }
                Err(e) => return Err(e),
            }
        }
        let helpers = found;
        if helpers.iter().any(|h| h.id == leader.id) {
            return Err(SessionError::InvalidRequest(
                "Exclude yourself; specify only other characters as helpers.".to_string(),
            ));
        }
        let rating = rating(&self.tables, check.rating.as_deref())?;
        let outcome = GroupCheck::new(leader, helpers, &check.stat, check.skill.as_deref(), rating)
            .perform(&self.tables, &mut self.rng)?;
        let rolls = summarize(&outcome.rolls)?;
        let recipients = broadcast(&self.roster, self.delivery.as_ref(), leader, &outcome.message);
        Ok(CheckReport {
            kind: ReportKind::Group,
            rolls,
            message: outcome.message,
            recipients,
        })
    }
}

impl std::fmt::Debug for CheckSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckSession")
            .field("entities", &self.roster.entity_count())
            .field("checks", &self.checks.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

fn entity<'r>(roster: &'r Roster, name: &str) -> SessionResult<&'r Entity> {
    roster
        .find_by_name(name)
        .ok_or_else(|| SessionError::UnknownEntity(name.trim().to_string()))
}

fn character<'r>(roster: &'r Roster, name: &str) -> SessionResult<&'r Entity> {
    let found = entity(roster, name)?;
    if found.kind.is_character() {
        Ok(found)
    } else {
        Err(SessionError::WrongKind(format!("{} is not a character.", found.name)))
    }
}

fn require_gm(entity: &Entity) -> SessionResult<()> {
    if entity.is_staff_or_gm() {
        Ok(())
    } else {
        Err(SessionError::WrongKind(
            "You are not GMing an event in this room.".to_string(),
        ))
    }
}

fn rating(tables: &RuleTables, name: Option<&str>) -> SessionResult<DifficultyRating> {
    match name {
        Some(name) => Ok(tables.require_difficulty(name)?.clone()),
        None => Ok(tables.default_difficulty().clone()),
    }
}

fn summarize(rolls: &[Roll<'_>]) -> MechResult<Vec<RollSummary>> {
    rolls.iter().map(RollSummary::from_roll).collect()
}

// ---------------------------------------------------------------------------
// Announcements
// ---------------------------------------------------------------------------

fn announce(
    roster: &Roster,
    delivery: &dyn Delivery,
    actor: &Entity,
    summary: RollSummary,
    audience: &Audience,
) -> CheckReport {
    let (message, recipients) = match audience {
        Audience::Public => {
            let message = summary.message();
            let mut room = Notifier::room(actor.id, actor.location, AudienceFlags::all());
            room.generate(roster);
            room.notify(&message, MessageOptions::roll(), delivery);
            (message, room.receiver_names())
        }
        Audience::Private(receivers) => announce_private(roster, delivery, actor, &summary, receivers),
    };
    tracing::debug!(
        actor = %actor.name,
        private = matches!(audience, Audience::Private(_)),
        recipients = recipients.len(),
        "check announced"
    );
    CheckReport {
        kind: ReportKind::Single,
        rolls: vec![summary],
        message,
        recipients,
    }
}

fn announce_private(
    roster: &Roster,
    delivery: &dyn Delivery,
    actor: &Entity,
    summary: &RollSummary,
    receivers: &[String],
) -> (String, Vec<String>) {
    let mut players =
        Notifier::list_with_self(actor.id, receivers.to_vec(), AudienceFlags::players_and_gms());
    let mut staff = Notifier::room(actor.id, actor.location, AudienceFlags::staff_only());
    players.generate(roster);
    staff.generate(roster);

    let shared = SharedWith::new(actor.name.clone(), players.receiver_names(), staff.receiver_names());
    let message = format!("|w[Private Roll]|n {} {shared}", summary.message());

    players.notify(&message, MessageOptions::roll(), delivery);
    // Staff GMs already reached through the list get the message once.
    for id in staff.receivers() {
        if !players.contains(id) {
            delivery.deliver(id, &message, MessageOptions::roll());
        }
    }

    let mut recipients = players.receiver_names();
    for name in staff.receiver_names() {
        if !recipients.contains(&name) {
            recipients.push(name);
        }
    }
    recipients.sort();
    (message, recipients)
}

fn broadcast(roster: &Roster, delivery: &dyn Delivery, caller: &Entity, message: &str) -> Vec<String> {
    let mut notifier = match caller.location {
        Some(room) => Notifier::room(caller.id, Some(room), AudienceFlags::all()),
        None => Notifier::list_with_self(caller.id, Vec::new(), AudienceFlags::all()),
    };
    notifier.generate(roster);
    notifier.notify(message, MessageOptions::roll(), delivery);
    let recipients = notifier.receiver_names();
    tracing::debug!(caller = %caller.name, recipients = recipients.len(), "broadcast");
    recipients
}
