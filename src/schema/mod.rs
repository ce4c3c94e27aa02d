//! Typed model for tool argument schemas.
//!
//! Tool schemas are a small JSON-Schema subset: six types, nested
//! `properties` for objects and a single `items` schema for arrays. This
//! module provides the type tags and the tagged union the codec, compiler
//! and validator all match exhaustively, so a type tag can never disagree
//! with the fields carried alongside it.
//!
//! # Key Types
//!
//! - [`SchemaKind`] - The six supported type tags
//! - [`SchemaType`] - Tagged union of per-type payloads

pub mod types;

pub use types::{SchemaKind, SchemaType};
