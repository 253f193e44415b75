//! General error types shared by the lexing, building and conversion stages
use std::fmt::{Display, Formatter};

use crate::coords::Coords;
use crate::tags::TypeTag;

/// Global result type used throughout the crate
pub type ParserResult<T> = Result<T, ParserError>;

/// Enumeration of the various different stages that can produce an error
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    /// The tokenisation stage
    Lexer,
    /// The tree construction stage
    Builder,
    /// Scalar conversion operations on an already constructed tree
    Conversion,
}

/// A global enumeration of error codes
#[derive(Debug, Clone, PartialEq)]
pub enum Details {
    /// Ran out of input before a token could be completed
    EndOfInput,
    /// The underlying input stream failed
    StreamFailure,
    /// The supplied input file could not be opened
    InvalidFile,
    /// A character was found that can't start any token
    InvalidCharacter(char),
    /// Failed to match an expected literal sequence such as `null` or `true`
    MatchFailed(String),
    /// A numeric representation that doesn't parse
    InvalidNumericRepresentation(String),
    /// A malformed escape sequence within a string
    InvalidEscapeSequence(String),
    /// A malformed unicode escape sequence within a string
    InvalidUnicodeEscapeSequence(String),
    /// The token stream never opened a root container
    NoRootNode,
    /// A scalar payload could not be converted to the requested target type
    ConversionFailed {
        /// The tag of the source payload
        from: TypeTag,
        /// The tag of the requested target
        to: TypeTag,
    },
    /// A byte buffer could not be decoded from its textual representation
    DecodeFailure(String),
}

impl Display for Details {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Details::EndOfInput => write!(f, "end of input reached"),
            Details::StreamFailure => write!(f, "failure in the underlying stream"),
            Details::InvalidFile => write!(f, "input file could not be opened"),
            Details::InvalidCharacter(c) => write!(f, "invalid character found: '{}'", c),
            Details::MatchFailed(msg) => write!(f, "match failed: {}", msg),
            Details::InvalidNumericRepresentation(repr) => {
                write!(f, "invalid numeric representation: \"{}\"", repr)
            }
            Details::InvalidEscapeSequence(seq) => {
                write!(f, "invalid escape sequence: \"{}\"", seq)
            }
            Details::InvalidUnicodeEscapeSequence(seq) => {
                write!(f, "invalid unicode escape sequence: \"{}\"", seq)
            }
            Details::NoRootNode => write!(f, "no root node was produced"),
            Details::ConversionFailed { from, to } => {
                write!(f, "cannot convert a payload tagged {} to {}", from, to)
            }
            Details::DecodeFailure(msg) => write!(f, "byte buffer decode failed: {}", msg),
        }
    }
}

/// The general error structure
#[derive(Debug, Clone, PartialEq)]
pub struct ParserError {
    /// The originating stage for the error
    pub stage: Stage,
    /// The global error code for the error
    pub details: Details,
    /// Optional input coordinates
    pub coords: Option<Coords>,
}

impl Display for ParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.coords {
            Some(coords) => write!(f, "{:?} error: {} at {}", self.stage, self.details, coords),
            None => write!(f, "{:?} error: {}", self.stage, self.details),
        }
    }
}

impl std::error::Error for ParserError {}

/// Construct an `Err(ParserError)` originating from the lexer, with coordinates
#[macro_export]
macro_rules! lexer_error {
    ($details : expr, $coords : expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Lexer,
            details: $details,
            coords: Some($coords),
        })
    };
    ($details : expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Lexer,
            details: $details,
            coords: None,
        })
    };
}

/// Construct an `Err(ParserError)` originating from the tree builder
#[macro_export]
macro_rules! builder_error {
    ($details : expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Builder,
            details: $details,
            coords: None,
        })
    };
}

/// Construct an `Err(ParserError)` originating from a scalar conversion
#[macro_export]
macro_rules! conversion_error {
    ($from : expr, $to : expr) => {
        Err($crate::errors::ParserError {
            stage: $crate::errors::Stage::Conversion,
            details: $crate::errors::Details::ConversionFailed {
                from: $from,
                to: $to,
            },
            coords: None,
        })
    };
}
