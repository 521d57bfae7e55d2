//! Core types for Rollcall: characters, retainers, rooms, and the roster.
//!
//! The check engine never touches storage directly. It consumes the
//! capability traits in [`capability`] and this crate ships an in-memory
//! [`Roster`] implementing all of them, loadable from JSON.

/// Capability traits: directory lookups, trait values, and roll modifiers.
pub mod capability;
/// Entity types, identifiers, and knacks.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// The in-memory roster of rooms and entities.
pub mod roster;

/// Re-export capability traits.
pub use capability::{Directory, ModifierProvider, TraitSource};
/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityKind, Knack, Knacks, RoomId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the roster.
pub use roster::{Room, Roster};
