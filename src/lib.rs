//! A polymorphic JSON document model and streaming tree builder.
//!
//! This crate parses JSON text into a tree of [JsonNode]s. Each node in the tree is one of
//! three variants: an object holding named properties, an array holding positional elements,
//! or a value holding a tagged scalar payload. Scalar payloads expose a closed conversion
//! contract covering every primitive type known to the [TypeTag] registry, including raw byte
//! buffers which sit outside the conventional tag range.
//!
//! The tree is assembled by a [TreeBuilder] driven from a token stream: either the in-crate
//! [lexer::Lexer] via the text-level [Parser] front-end, or any other tokenizer able to
//! produce the [Match] alphabet. Input text is run through a base64 unwrap heuristic before
//! lexing, and the finished tree has redundant single-element envelopes collapsed away.
//!
//! ```
//! use chisel_dom::builder::Parser;
//!
//! let parser = Parser::default();
//! let root = parser.parse_str(r#"{"name":"widget","sizes":[1,2,3]}"#).unwrap();
//! assert!(root.is_object());
//! assert_eq!(
//!     root.lookup("name").unwrap().payload().unwrap().as_string().unwrap(),
//!     "widget"
//! );
//! assert_eq!(root.lookup("sizes").unwrap().len(), 3);
//! ```
//!
//! ## Ownership and aliasing
//!
//! Ownership flows strictly downwards: containers own their children, whilst parent links are
//! weak back-references used only for upward traversal. Trees are single-threaded structures;
//! no internal synchronisation is performed. Note that [JsonNode::rename] on a container
//! produces a copy *sharing* the source's child collection - see the method documentation
//! before relying on renamed trees being independent.
//!
//! ## Serialisation
//!
//! Serialising a tree back to text is delegated to whatever generic object serialiser the
//! consuming application already uses, and is out of scope here. A serialiser pointed at
//! these trees is expected to be configured so that output is indented, reference cycles are
//! serialised by re-emitting the referenced content rather than failing (the parent
//! back-links will otherwise trip naive reference tracking), non-public constructors may be
//! used during deserialisation, and both null-valued members and members equal to their
//! type's default are omitted from the output.

pub mod builder;
pub mod coords;
pub mod decimal;
pub mod dom;
pub mod errors;
pub mod events;
pub mod lexer;
pub mod pointer;
pub mod scalar;
pub mod tags;
#[cfg(test)]
mod test_macros;

pub use builder::{BuilderState, Encoding, Parser, TreeBuilder};
pub use decimal::Decimal;
pub use dom::{Children, JsonNode, NodeKind};
pub use errors::{Details, ParserError, ParserResult, Stage};
pub use events::{Event, Match};
pub use pointer::{JsonPointer, JsonPointerComponent};
pub use scalar::Scalar;
pub use tags::TypeTag;
