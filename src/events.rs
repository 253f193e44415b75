//! The token alphabet consumed by the tree builder
use chrono::{DateTime, Utc};

use crate::coords::Span;

/// Enumeration of the various different matches that can be fed to the tree builder. This is
/// the builder's entire input alphabet: any tokenizer able to produce these can drive a build.
/// Structural punctuation (colons, commas) never reaches the builder; a string followed by a
/// colon arrives already folded into a [Match::PropertyName]
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// Start of a new object
    StartObject,
    /// End of the current object
    EndObject,
    /// Start of a new array
    StartArray,
    /// End of the current array
    EndArray,
    /// A property name awaiting attachment to the next constructed node
    PropertyName(String),
    /// A string scalar
    String(String),
    /// An integer scalar
    Integer(i64),
    /// A float scalar
    Float(f64),
    /// A boolean scalar
    Boolean(bool),
    /// A null scalar
    Null,
    /// A date/time scalar
    DateTime(DateTime<Utc>),
    /// A raw byte buffer scalar
    Bytes(Vec<u8>),
}

/// A general event produced whilst driving the builder from a lexed token stream
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The [Match] associated with the event
    pub matched: Match,
    /// The [Span] associated with the match
    pub span: Span,
}
