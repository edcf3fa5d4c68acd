//! Support structures for the moss CSS engine.
//!
//! This crate holds the two data structures the engine core depends on but
//! that are not themselves CSS-specific:
//!
//! - [`LruCache`]: a bounded least-recently-used cache backed by an entry
//!   array with intrusive links, used to memoize expensive keyed artifacts
//!   (query plans, compiled selectors).
//! - [`entities`]: the HTML named-entity table with fast escape/unescape,
//!   used by any text layer that needs HTML-safe serialization.

/// HTML named-entity table and escape/unescape routines.
pub mod entities;
/// Bounded LRU cache over an intrusively linked entry array.
pub mod lru;

pub use entities::{entity_code_point, entity_name, escape, is_known_entity, unescape};
pub use lru::LruCache;
