use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::{ModifierProvider, TraitSource};

/// Unique identifier for every character, retainer, or item in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Unique identifier for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub Uuid);

impl RoomId {
    /// Generate a new random room ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A character: can act, roll, and receive messages.
    #[default]
    Character,
    /// A retainer or other proxy whose stats stand in for its owner's.
    Retainer,
    /// An inert object. Never rolls and never receives messages.
    Item,
}

impl EntityKind {
    /// Returns true for entities that can receive notifications.
    pub fn is_character(self) -> bool {
        matches!(self, Self::Character)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Retainer => write!(f, "retainer"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// A character-specific modifier that nudges one stat/skill pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Knack {
    /// Display name (e.g. "Silver Tongue").
    pub name: String,
    /// The stat this knack applies to.
    pub stat: String,
    /// The skill this knack applies to, if it is skill-specific.
    #[serde(default)]
    pub skill: Option<String>,
    /// Raw modifier magnitude, weighted by the rule tables at roll time.
    pub value: i32,
}

impl Knack {
    fn applies_to(&self, stats: &[&str], skills: &[&str]) -> bool {
        let stat_matches = stats.iter().any(|s| s.eq_ignore_ascii_case(&self.stat));
        let skill_matches = match &self.skill {
            Some(skill) => skills.iter().any(|s| s.eq_ignore_ascii_case(skill)),
            None => true,
        };
        stat_matches && skill_matches
    }
}

/// The set of knacks a character has learned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Knacks(pub Vec<Knack>);

impl ModifierProvider for Knacks {
    fn total_modifier(&self, stats: &[&str], skills: &[&str]) -> i32 {
        self.0
            .iter()
            .filter(|k| k.applies_to(stats, skills))
            .map(|k| k.value)
            .fold(0, i32::saturating_add)
    }
}

/// Every actor, retainer, and object the check engine can refer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// The kind of entity.
    pub kind: EntityKind,
    /// Full display name.
    pub name: String,
    /// Alternative names accepted by name search.
    pub aliases: Vec<String>,
    /// The room this entity is in, if any.
    pub location: Option<RoomId>,
    /// Stat values keyed by lowercase stat name.
    pub stats: HashMap<String, u32>,
    /// Skill values keyed by lowercase skill name.
    pub skills: HashMap<String, u32>,
    /// Knacks, for entities that can have them at all.
    pub knacks: Option<Knacks>,
    /// Administrative staff flag.
    pub staff: bool,
    /// Player game-master flag.
    pub gm: bool,
}

impl Entity {
    /// Create a new entity with a random ID and no traits.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            kind,
            name: name.into(),
            aliases: Vec::new(),
            location: None,
            stats: HashMap::new(),
            skills: HashMap::new(),
            knacks: None,
            staff: false,
            gm: false,
        }
    }

    /// Shorthand for a new character.
    pub fn character(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Character, name)
    }

    /// Shorthand for a new retainer.
    pub fn retainer(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Retainer, name)
    }

    /// Set a stat value.
    pub fn with_stat(mut self, stat: &str, value: u32) -> Self {
        self.stats.insert(stat.to_lowercase(), value);
        self
    }

    /// Set a skill value.
    pub fn with_skill(mut self, skill: &str, value: u32) -> Self {
        self.skills.insert(skill.to_lowercase(), value);
        self
    }

    /// Add a knack, enabling the modifier capability if it was absent.
    pub fn with_knack(mut self, knack: Knack) -> Self {
        self.knacks.get_or_insert_with(Knacks::default).0.push(knack);
        self
    }

    /// Place the entity in a room.
    pub fn in_room(mut self, room: RoomId) -> Self {
        self.location = Some(room);
        self
    }

    /// Mark the entity as staff.
    pub fn as_staff(mut self) -> Self {
        self.staff = true;
        self
    }

    /// Mark the entity as a player GM.
    pub fn as_gm(mut self) -> Self {
        self.gm = true;
        self
    }

    /// Add a search alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Returns true if this entity is staff or a player GM.
    pub fn is_staff_or_gm(&self) -> bool {
        self.staff || self.gm
    }

    /// The name cut at the first comma, or failing that the first hyphen.
    ///
    /// "Brother Tomas, Keeper of Keys" becomes "Brother Tomas".
    pub fn short_name(&self) -> &str {
        let cut = self.name.find(',').or_else(|| self.name.find('-'));
        match cut {
            Some(idx) => self.name[..idx].trim(),
            None => &self.name,
        }
    }

    /// The modifier capability, if this entity has one.
    pub fn modifiers(&self) -> Option<&dyn ModifierProvider> {
        self.knacks.as_ref().map(|k| k as &dyn ModifierProvider)
    }
}

impl TraitSource for Entity {
    fn stat_value(&self, stat: &str) -> u32 {
        self.stats.get(&stat.to_lowercase()).copied().unwrap_or(0)
    }

    fn skill_value(&self, skill: &str) -> u32 {
        self.skills.get(&skill.to_lowercase()).copied().unwrap_or(0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_display_shows_short_form() {
        let id = EntityId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn short_name_cuts_at_comma_first() {
        let e = Entity::retainer("Brother Tomas, Keeper of Keys - Retired");
        assert_eq!(e.short_name(), "Brother Tomas");
    }

    #[test]
    fn short_name_cuts_at_hyphen() {
        let e = Entity::retainer("Mira - the Quiet Blade");
        assert_eq!(e.short_name(), "Mira");
    }

    #[test]
    fn short_name_without_separator_is_full_name() {
        let e = Entity::retainer("Grub");
        assert_eq!(e.short_name(), "Grub");
    }

    #[test]
    fn trait_lookup_is_case_insensitive_and_defaults_to_zero() {
        let e = Entity::character("Kael").with_stat("Strength", 3);
        assert_eq!(e.stat_value("strength"), 3);
        assert_eq!(e.stat_value("STRENGTH"), 3);
        assert_eq!(e.skill_value("melee"), 0);
    }

    #[test]
    fn no_knacks_means_no_modifier_capability() {
        let e = Entity::character("Kael");
        assert!(e.modifiers().is_none());
    }

    #[test]
    fn knacks_apply_to_matching_pair_only() {
        let e = Entity::character("Kael")
            .with_knack(Knack {
                name: "Duelist".into(),
                stat: "dexterity".into(),
                skill: Some("melee".into()),
                value: 2,
            })
            .with_knack(Knack {
                name: "Iron Will".into(),
                stat: "composure".into(),
                skill: None,
                value: 1,
            });
        let mods = e.modifiers().unwrap();
        assert_eq!(mods.total_modifier(&["dexterity"], &["melee"]), 2);
        assert_eq!(mods.total_modifier(&["dexterity"], &["stealth"]), 0);
        assert_eq!(mods.total_modifier(&["composure"], &[]), 1);
        assert_eq!(mods.total_modifier(&["Composure"], &["melee"]), 1);
    }

    #[test]
    fn kind_is_character() {
        assert!(EntityKind::Character.is_character());
        assert!(!EntityKind::Retainer.is_character());
        assert!(!EntityKind::Item.is_character());
    }
}
