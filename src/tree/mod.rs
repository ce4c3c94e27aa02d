//! Arena-backed editable schema tree.
//!
//! A tool's input/output schema is edited as a tree of nodes addressed by
//! generated stable identifiers. Hierarchy lives in explicit parent
//! references and ordered child lists; node identity never encodes position,
//! so renaming or moving a property cannot invalidate references held by a
//! caller. Name-based lookup exists only within a parent's scope.
//!
//! # Key Types
//!
//! - [`SchemaTree`] - The arena plus the root reference and presentation state
//! - [`SchemaNode`] - One tree node
//! - [`codec`] - Decode/encode between JSON-Schema properties and the tree
//!
//! # Examples
//!
//! ```rust
//! use mcp_toolspec::SchemaTree;
//! use serde_json::json;
//!
//! let properties = json!({ "city": { "type": "string" } });
//! let mut tree = SchemaTree::decode(properties.as_object().unwrap(), "args", &[]);
//! let city = tree.child_by_label(tree.root(), "city").unwrap();
//! tree.set_required(city, true);
//! assert_eq!(tree.save().required, vec!["city"]);
//! ```

pub mod arena;
pub mod codec;
pub mod editor;
pub mod node;

pub use arena::SchemaTree;
pub use editor::{DeleteOutcome, SavedSchema};
pub use node::{NodeId, NodeRole, SchemaNode};
