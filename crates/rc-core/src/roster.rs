use std::collections::HashMap;

use serde::Deserialize;

use crate::capability::Directory;
use crate::entity::{Entity, EntityId, EntityKind, Knacks, RoomId};
use crate::error::{CoreError, CoreResult};

/// A place characters can be in.
#[derive(Debug, Clone)]
pub struct Room {
    /// Unique identifier.
    pub id: RoomId,
    /// Display name.
    pub name: String,
}

/// The in-memory population of rooms and entities.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    rooms: HashMap<RoomId, Room>,
    entities: HashMap<EntityId, Entity>,

    // Indexes
    room_by_name_lower: HashMap<String, RoomId>,
    by_name_lower: HashMap<String, EntityId>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Add a room. Returns its ID.
    pub fn add_room(&mut self, name: impl Into<String>) -> CoreResult<RoomId> {
        let name = name.into();
        let lower = name.to_lowercase();
        if self.room_by_name_lower.contains_key(&lower) {
            return Err(CoreError::DuplicateName(name));
        }
        let id = RoomId::new();
        self.room_by_name_lower.insert(lower, id);
        self.rooms.insert(id, Room { id, name });
        Ok(id)
    }

    /// Add an entity. Its name and aliases must be unused.
    pub fn add_entity(&mut self, entity: Entity) -> CoreResult<EntityId> {
        let mut keys = vec![entity.name.to_lowercase()];
        keys.extend(entity.aliases.iter().map(|a| a.to_lowercase()));
        if let Some(taken) = keys.iter().find(|k| self.by_name_lower.contains_key(*k)) {
            return Err(CoreError::DuplicateName(taken.clone()));
        }

        let id = entity.id;
        for key in keys {
            self.by_name_lower.insert(key, id);
        }
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Load a roster from its JSON document form.
    ///
    /// ```json
    /// {
    ///   "rooms": ["Great Hall"],
    ///   "entities": [
    ///     { "name": "Kael", "room": "Great Hall", "stats": { "strength": 3 } }
    ///   ]
    /// }
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let doc: RosterDoc = serde_json::from_str(json)?;
        let mut roster = Self::new();
        for room in doc.rooms {
            roster.add_room(room)?;
        }
        for def in doc.entities {
            let location = match &def.room {
                Some(name) => Some(
                    roster
                        .find_room(name)
                        .map(|r| r.id)
                        .ok_or_else(|| CoreError::UnknownRoom(name.clone()))?,
                ),
                None => None,
            };
            let mut entity = Entity::new(def.kind, def.name);
            entity.aliases = def.aliases;
            entity.location = location;
            entity.stats = lowercase_keys(def.stats);
            entity.skills = lowercase_keys(def.skills);
            entity.knacks = def.knacks;
            entity.staff = def.staff;
            entity.gm = def.gm;
            roster.add_entity(entity)?;
        }
        Ok(roster)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Get an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get an entity by ID, or an error if it is missing.
    pub fn require(&self, id: EntityId) -> CoreResult<&Entity> {
        self.get(id).ok_or(CoreError::EntityNotFound(id))
    }

    /// Find an entity by name or alias (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name_lower
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.entities.get(id))
    }

    /// Get a room by ID.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Find a room by name (case-insensitive).
    pub fn find_room(&self, name: &str) -> Option<&Room> {
        self.room_by_name_lower
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.rooms.get(id))
    }

    /// Every entity in a room, characters or not, sorted by name.
    pub fn contents(&self, room: RoomId) -> Vec<&Entity> {
        let mut found: Vec<&Entity> = self
            .entities
            .values()
            .filter(|e| e.location == Some(room))
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// All entities, in no particular order.
    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

impl Directory for Roster {
    fn search(&self, name: &str) -> Option<EntityId> {
        self.find_by_name(name).map(|e| e.id)
    }

    fn characters_in(&self, room: RoomId) -> Vec<EntityId> {
        self.contents(room)
            .into_iter()
            .filter(|e| e.kind.is_character())
            .map(|e| e.id)
            .collect()
    }

    fn is_staff(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.staff)
    }

    fn is_gm(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.gm)
    }

    fn display_name(&self, id: EntityId) -> String {
        self.get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Deserialize)]
struct RosterDoc {
    #[serde(default)]
    rooms: Vec<String>,
    #[serde(default)]
    entities: Vec<EntityDoc>,
}

#[derive(Deserialize)]
struct EntityDoc {
    name: String,
    #[serde(default)]
    kind: EntityKind,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    room: Option<String>,
    #[serde(default)]
    stats: HashMap<String, u32>,
    #[serde(default)]
    skills: HashMap<String, u32>,
    #[serde(default)]
    knacks: Option<Knacks>,
    #[serde(default)]
    staff: bool,
    #[serde(default)]
    gm: bool,
}

fn lowercase_keys(map: HashMap<String, u32>) -> HashMap<String, u32> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}
