//! What a caller asks a session to roll.

use rc_mechanics::SpoofMode;

/// A stat, an optional skill, and an optional difficulty rating name.
///
/// Without a rating the session uses the first rating in the tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitCheck {
    /// Stat name.
    pub stat: String,
    /// Skill name.
    pub skill: Option<String>,
    /// Difficulty rating name.
    pub rating: Option<String>,
}

impl TraitCheck {
    /// A check of `stat` and optionally `skill`, at the default rating.
    pub fn new(stat: impl Into<String>, skill: Option<&str>) -> Self {
        Self {
            stat: stat.into(),
            skill: skill.map(str::to_string),
            rating: None,
        }
    }

    /// Set the rating.
    pub fn at(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }
}

/// A GM roll with magnitudes given directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoofCheck {
    /// Stat name and magnitude.
    pub stat: (String, u32),
    /// Skill name and magnitude.
    pub skill: Option<(String, u32)>,
    /// Difficulty rating name.
    pub rating: Option<String>,
    /// NPC the roll is made for.
    pub npc: Option<String>,
    /// Natural-roll handling.
    pub mode: SpoofMode,
}

impl SpoofCheck {
    /// A standard spoofed check with no NPC name.
    pub fn new(stat: impl Into<String>, value: u32) -> Self {
        Self {
            stat: (stat.into(), value),
            skill: None,
            rating: None,
            npc: None,
            mode: SpoofMode::Standard,
        }
    }

    /// Add a skill.
    pub fn with_skill(mut self, skill: impl Into<String>, value: u32) -> Self {
        self.skill = Some((skill.into(), value));
        self
    }

    /// Set the rating.
    pub fn at(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    /// Roll for a named NPC.
    pub fn for_npc(mut self, npc: impl Into<String>) -> Self {
        self.npc = Some(npc.into());
        self
    }

    /// Set the natural-roll mode.
    pub fn with_mode(mut self, mode: SpoofMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Who sees a single check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Audience {
    /// Everyone in the actor's room.
    #[default]
    Public,
    /// The actor, the named players and player GMs, and staff in the room.
    Private(Vec<String>),
}
