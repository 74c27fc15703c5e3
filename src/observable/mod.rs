//! Typed events on top of the untyped center.
//!
//! - [`EventName`], [`validate_vocabulary`], `event_names!`: per-entity event vocabularies
//! - [`Observable`]: the capability an entity acquires by naming its vocabulary,
//!   center and source id

mod capability;
mod vocabulary;

pub use capability::Observable;
pub use vocabulary::{validate_vocabulary, EventName};
