//! Audience targeting for Rollcall.
//!
//! A [`Notifier`] gathers a raw pool of candidates from a [`Source`], filters
//! it into players, player GMs, and staff according to its
//! [`AudienceFlags`], and delivers one message to the union through a
//! [`Delivery`] sink.

pub mod audience;
pub mod delivery;
pub mod shared;

pub use audience::{AudienceFlags, Notifier, Source};
pub use delivery::{Delivered, Delivery, MessageOptions, Outbox};
pub use shared::SharedWith;
