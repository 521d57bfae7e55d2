//! Computing who receives a notification.
//!
//! Generation runs in two steps. Sourcing collects the raw pool:
//!
//! - [`Source::Room`]: every character in a room (nothing for no room)
//! - [`Source::List`]: names resolved through the directory; names that do
//!   not resolve are skipped
//! - [`Source::ListWithSelf`]: the list, plus the caller
//!
//! Filtering then splits the pool. Each filter runs only when its flag is
//! set, and the receivers are the union of the filters that ran:
//!
//! - players: neither staff nor GM
//! - GM players: GM
//! - staff: staff

use std::collections::{BTreeMap, BTreeSet};

use rc_core::{Directory, EntityId, RoomId};

use crate::delivery::{Delivery, MessageOptions};

/// Which categories of the pool receive a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudienceFlags {
    /// Players who are neither staff nor GMs.
    pub to_player: bool,
    /// Player GMs.
    pub to_gm: bool,
    /// Staff.
    pub to_staff: bool,
}

impl AudienceFlags {
    /// Everyone.
    pub fn all() -> Self {
        Self {
            to_player: true,
            to_gm: true,
            to_staff: true,
        }
    }

    /// Players and player GMs, no staff.
    pub fn players_and_gms() -> Self {
        Self {
            to_player: true,
            to_gm: true,
            to_staff: false,
        }
    }

    /// Staff only.
    pub fn staff_only() -> Self {
        Self {
            to_staff: true,
            ..Self::default()
        }
    }
}

/// Where the raw pool comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Characters in a room; `None` sources nothing.
    Room(Option<RoomId>),
    /// Named recipients.
    List(Vec<String>),
    /// Named recipients plus the caller.
    ListWithSelf(Vec<String>),
}

/// One audience request, owned by the check that made it.
#[derive(Debug, Clone)]
pub struct Notifier {
    caller: EntityId,
    source: Source,
    flags: AudienceFlags,
    pool: BTreeSet<EntityId>,
    players: BTreeSet<EntityId>,
    gm_players: BTreeSet<EntityId>,
    staff: BTreeSet<EntityId>,
    receivers: BTreeSet<EntityId>,
    names: BTreeMap<EntityId, String>,
}

impl Notifier {
    /// Create an empty notifier. Nothing is sourced until [`Notifier::generate`].
    pub fn new(caller: EntityId, source: Source, flags: AudienceFlags) -> Self {
        Self {
            caller,
            source,
            flags,
            pool: BTreeSet::new(),
            players: BTreeSet::new(),
            gm_players: BTreeSet::new(),
            staff: BTreeSet::new(),
            receivers: BTreeSet::new(),
            names: BTreeMap::new(),
        }
    }

    /// Everyone in a room.
    pub fn room(caller: EntityId, room: Option<RoomId>, flags: AudienceFlags) -> Self {
        Self::new(caller, Source::Room(room), flags)
    }

    /// Named recipients.
    pub fn list(caller: EntityId, names: Vec<String>, flags: AudienceFlags) -> Self {
        Self::new(caller, Source::List(names), flags)
    }

    /// Named recipients and the caller.
    pub fn list_with_self(caller: EntityId, names: Vec<String>, flags: AudienceFlags) -> Self {
        Self::new(caller, Source::ListWithSelf(names), flags)
    }

    /// Source the raw pool and filter it into receivers.
    ///
    /// Calling this again recomputes everything from scratch.
    pub fn generate(&mut self, directory: &dyn Directory) {
        self.pool = self.source_characters(directory);
        self.filter_receivers(directory);
        self.names = self
            .pool
            .iter()
            .map(|&id| (id, directory.display_name(id)))
            .collect();

        tracing::debug!(
            caller = %self.caller,
            pool = self.pool.len(),
            receivers = self.receivers.len(),
            "audience generated"
        );
    }

    fn source_characters(&self, directory: &dyn Directory) -> BTreeSet<EntityId> {
        match &self.source {
            Source::Room(room) => room
                .map(|room| directory.characters_in(room).into_iter().collect())
                .unwrap_or_default(),
            Source::List(names) => resolve_names(names, directory),
            Source::ListWithSelf(names) => {
                let mut pool = resolve_names(names, directory);
                pool.insert(self.caller);
                pool
            }
        }
    }

    fn filter_receivers(&mut self, directory: &dyn Directory) {
        let pick = |keep: &dyn Fn(EntityId) -> bool| -> BTreeSet<EntityId> {
            self.pool.iter().copied().filter(|&id| keep(id)).collect()
        };
        let players = if self.flags.to_player {
            pick(&|id| !directory.is_staff(id) && !directory.is_gm(id))
        } else {
            BTreeSet::new()
        };
        let gm_players = if self.flags.to_gm {
            pick(&|id| directory.is_gm(id))
        } else {
            BTreeSet::new()
        };
        let staff = if self.flags.to_staff {
            pick(&|id| directory.is_staff(id))
        } else {
            BTreeSet::new()
        };

        self.receivers = players
            .iter()
            .chain(&gm_players)
            .chain(&staff)
            .copied()
            .collect();
        self.players = players;
        self.gm_players = gm_players;
        self.staff = staff;
    }

    /// Deliver `message` to every receiver, in name order.
    pub fn notify(&self, message: &str, options: MessageOptions, delivery: &dyn Delivery) {
        for id in self.receivers() {
            delivery.deliver(id, message, options);
        }
    }

    /// Who sent the notification.
    pub fn caller(&self) -> EntityId {
        self.caller
    }

    /// The raw pool before filtering.
    pub fn pool(&self) -> &BTreeSet<EntityId> {
        &self.pool
    }

    /// Whether `id` receives the notification.
    pub fn contains(&self, id: EntityId) -> bool {
        self.receivers.contains(&id)
    }

    /// Receivers sorted by display name.
    pub fn receivers(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.receivers.iter().copied().collect();
        ids.sort_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        ids
    }

    /// Plain players that receive the notification.
    pub fn players(&self) -> &BTreeSet<EntityId> {
        &self.players
    }

    /// Player GMs that receive the notification.
    pub fn gm_players(&self) -> &BTreeSet<EntityId> {
        &self.gm_players
    }

    /// Staff that receive the notification.
    pub fn staff(&self) -> &BTreeSet<EntityId> {
        &self.staff
    }

    /// Sorted names of plain players.
    pub fn player_names(&self) -> Vec<String> {
        self.sorted_names(&self.players)
    }

    /// Sorted names of player GMs.
    pub fn gm_names(&self) -> Vec<String> {
        self.sorted_names(&self.gm_players)
    }

    /// Sorted names of staff.
    pub fn staff_names(&self) -> Vec<String> {
        self.sorted_names(&self.staff)
    }

    /// Sorted names of every receiver.
    pub fn receiver_names(&self) -> Vec<String> {
        self.sorted_names(&self.receivers)
    }

    fn sorted_names(&self, ids: &BTreeSet<EntityId>) -> Vec<String> {
        let mut names: Vec<String> = ids.iter().map(|&id| self.name_of(id).to_string()).collect();
        names.sort();
        names
    }

    fn name_of(&self, id: EntityId) -> &str {
        self.names.get(&id).map(String::as_str).unwrap_or("")
    }
}

fn resolve_names(names: &[String], directory: &dyn Directory) -> BTreeSet<EntityId> {
    let mut pool = BTreeSet::new();
    for name in names {
        match directory.search(name.trim()) {
            Some(id) => {
                pool.insert(id);
            }
            None => tracing::debug!(name = %name, "skipping unresolved recipient"),
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::Outbox;
    use rc_core::{Entity, Roster};

    struct World {
        roster: Roster,
        hall: RoomId,
        kael: EntityId,
        aria: EntityId,
        mira: EntityId,
        sage: EntityId,
        both: EntityId,
    }

    fn world() -> World {
        let mut roster = Roster::new();
        let hall = roster.add_room("Great Hall").unwrap();
        let _empty = roster.add_room("Cellar").unwrap();
        let kael = roster
            .add_entity(Entity::character("Kael").in_room(hall))
            .unwrap();
        let aria = roster
            .add_entity(Entity::character("Aria").in_room(hall))
            .unwrap();
        let mira = roster
            .add_entity(Entity::character("Mira").in_room(hall).as_gm())
            .unwrap();
        let sage = roster
            .add_entity(Entity::character("Sage").in_room(hall).as_staff())
            .unwrap();
        let both = roster
            .add_entity(Entity::character("Warden").in_room(hall).as_staff().as_gm())
            .unwrap();
        roster
            .add_entity(Entity::retainer("Tomas").in_room(hall))
            .unwrap();
        World {
            roster,
            hall,
            kael,
            aria,
            mira,
            sage,
            both,
        }
    }

    #[test]
    fn room_source_takes_characters_only() {
        let w = world();
        let mut n = Notifier::room(w.kael, Some(w.hall), AudienceFlags::all());
        n.generate(&w.roster);
        assert_eq!(n.pool().len(), 5);
        assert_eq!(
            n.receiver_names(),
            vec!["Aria", "Kael", "Mira", "Sage", "Warden"]
        );
    }

    #[test]
    fn empty_room_yields_nobody() {
        let w = world();
        let cellar = w.roster.find_room("cellar").unwrap().id;
        let mut n = Notifier::room(w.kael, Some(cellar), AudienceFlags::all());
        n.generate(&w.roster);
        assert!(n.receivers().is_empty());

        let mut nowhere = Notifier::room(w.kael, None, AudienceFlags::all());
        nowhere.generate(&w.roster);
        assert!(nowhere.pool().is_empty());
    }

    #[test]
    fn filters_split_the_pool() {
        let w = world();
        let mut n = Notifier::room(w.kael, Some(w.hall), AudienceFlags::all());
        n.generate(&w.roster);
        assert_eq!(n.player_names(), vec!["Aria", "Kael"]);
        assert_eq!(n.gm_names(), vec!["Mira", "Warden"]);
        assert_eq!(n.staff_names(), vec!["Sage", "Warden"]);
        // Warden is in two categories but receives once.
        assert_eq!(n.receivers().len(), 5);
    }

    #[test]
    fn unset_flags_skip_their_filter() {
        let w = world();
        let mut staff = Notifier::room(w.kael, Some(w.hall), AudienceFlags::staff_only());
        staff.generate(&w.roster);
        assert!(staff.players().is_empty());
        assert!(staff.gm_players().is_empty());
        assert!(staff.contains(w.sage));
        assert!(staff.contains(w.both));
        assert!(!staff.contains(w.aria));

        let mut none = Notifier::room(w.kael, Some(w.hall), AudienceFlags::default());
        none.generate(&w.roster);
        assert!(none.receivers().is_empty());
        assert_eq!(none.pool().len(), 5);
    }

    #[test]
    fn list_skips_unresolved_names() {
        let w = world();
        let mut n = Notifier::list(
            w.kael,
            vec!["aria".into(), "Nobody".into()],
            AudienceFlags::all(),
        );
        n.generate(&w.roster);
        assert_eq!(n.receivers(), vec![w.aria]);
        assert!(!n.pool().contains(&w.kael));
    }

    #[test]
    fn list_with_self_adds_caller_to_pool() {
        let w = world();
        let mut n = Notifier::list_with_self(w.kael, vec!["Mira".into()], AudienceFlags::players_and_gms());
        n.generate(&w.roster);
        assert!(n.pool().contains(&w.kael));
        assert_eq!(n.receiver_names(), vec!["Kael", "Mira"]);

        // The caller is still filtered: a staff caller is dropped without the staff flag.
        let mut staff_caller = Notifier::list_with_self(w.sage, vec![], AudienceFlags::players_and_gms());
        staff_caller.generate(&w.roster);
        assert!(staff_caller.pool().contains(&w.sage));
        assert!(staff_caller.receivers().is_empty());
    }

    #[test]
    fn notify_sends_identical_text_to_everyone() {
        let w = world();
        let outbox = Outbox::new();
        let mut n = Notifier::room(w.kael, Some(w.hall), AudienceFlags::players_and_gms());
        n.generate(&w.roster);
        n.notify("Kael checks wits at easy.", MessageOptions::roll(), &outbox);

        let sent = outbox.messages();
        assert_eq!(sent.len(), 4);
        assert!(sent.iter().all(|d| d.message == "Kael checks wits at easy." && d.options.roll));
        let order: Vec<EntityId> = sent.iter().map(|d| d.recipient).collect();
        assert_eq!(order, vec![w.aria, w.kael, w.mira, w.both]);
    }

    #[test]
    fn regenerate_recomputes() {
        let w = world();
        let mut n = Notifier::list(w.kael, vec!["Aria".into()], AudienceFlags::all());
        n.generate(&w.roster);
        n.generate(&w.roster);
        assert_eq!(n.receivers().len(), 1);
        assert_eq!(n.caller(), w.kael);
    }
}
