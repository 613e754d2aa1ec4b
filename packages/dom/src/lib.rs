//! # Varmark DOM
//!
//! In-memory content tree for a rich-text editing surface.
//!
//! ```text
//! markup text ──parse──▶ Vec<Node> ──edit──▶ Vec<Node> ──serialize──▶ markup text
//! ```
//!
//! Nodes are addressed by [`NodePath`] (child indexes from the body root),
//! which is the snapshot handle used by two-phase tree rewrites: collect an
//! immutable list of paths first, then apply replacements in reverse
//! document order so the remaining paths stay valid.

pub mod error;
pub mod id_generator;
pub mod node;
pub mod parser;
pub mod serializer;

pub use error::{ParseError, ParseResult};
pub use id_generator::IdGenerator;
pub use node::{Element, Node, NodePath};
pub use parser::parse;
pub use serializer::{serialize, serialize_node};
