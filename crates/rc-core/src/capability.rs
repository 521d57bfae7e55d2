//! The narrow interfaces the check engine consumes from the game world.
//!
//! Anything that can answer these questions can drive checks and
//! notifications; [`crate::Roster`] is the in-memory implementation.

use crate::entity::{EntityId, RoomId};

/// Raw stat and skill magnitudes of an entity.
pub trait TraitSource {
    /// The raw value of a stat, 0 if the entity lacks it.
    fn stat_value(&self, stat: &str) -> u32;

    /// The raw value of a skill, 0 if the entity lacks it.
    fn skill_value(&self, skill: &str) -> u32;
}

/// Optional capability: active modifiers (knacks) for a stat/skill pairing.
pub trait ModifierProvider {
    /// Sum of every modifier that applies to the given stats and skills.
    fn total_modifier(&self, stats: &[&str], skills: &[&str]) -> i32;
}

/// Identity lookups and permission predicates.
pub trait Directory {
    /// Resolve a name (or alias) to an identity.
    fn search(&self, name: &str) -> Option<EntityId>;

    /// Every character-like identity present in a room.
    fn characters_in(&self, room: RoomId) -> Vec<EntityId>;

    /// Whether the identity is administrative staff.
    fn is_staff(&self, id: EntityId) -> bool;

    /// Whether the identity is a player game-master.
    fn is_gm(&self, id: EntityId) -> bool;

    /// The name shown to other players.
    fn display_name(&self, id: EntityId) -> String;
}
