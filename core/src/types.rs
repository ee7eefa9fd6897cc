//! Domain types for the values API.
//!
//! # Design
//! Entities are anonymous text values held by the server in an ordered
//! collection. They carry no identifier; callers address them by their
//! current position in that collection.

/// A single text value managed by the remote collection.
pub type Entity = String;

/// Zero-based position into the server's ordered collection.
///
/// An index is a position, not a stable identifier: deleting an entity
/// shifts every later entity down by one, so an index read before a delete
/// may name a different entity afterwards. The client passes indices
/// through unvalidated.
pub type Index = u32;
