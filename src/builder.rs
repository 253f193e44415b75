//! The tree builder, which assembles a [JsonNode] tree from a stream of matches, and the
//! text-level [Parser] front-end which drives it from lexed input
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chisel_decoders::ascii::AsciiDecoder;
use chisel_decoders::utf8::Utf8Decoder;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::rc::Rc;

use crate::builder_error;
use crate::dom::JsonNode;
use crate::errors::{Details, ParserResult};
use crate::events::{Event, Match};
use crate::lexer::{Lexer, PackedToken, Token};
use crate::scalar::Scalar;

/// Default name given to containers constructed with no pending name available
const DEFAULT_ROOT_NAME: &str = "root";

/// The complete mutable state carried by a build in flight. Kept as an explicit struct (rather
/// than ambient fields) so that the name-attachment behaviour is inspectable mid-build
#[derive(Debug, Default)]
pub struct BuilderState {
    /// The container currently being filled. Walks down on start matches and back up through
    /// the parent links on end matches
    pub current: Option<Rc<JsonNode>>,
    /// The most recently seen property name, awaiting attachment to the next constructed node.
    /// This slot is only ever *overwritten*, never cleared: a consumed name survives and will
    /// leak onto a following sibling that carries no property name of its own
    pub pending_name: Option<String>,
}

/// Assembles a node tree from a stream of [Match]es. Any tokenizer able to produce the match
/// alphabet can drive this; the in-crate [Lexer] is wired up through [Parser]
#[derive(Debug, Default)]
pub struct TreeBuilder {
    state: BuilderState,
}

impl TreeBuilder {
    /// Construct a new builder with empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// The current build state
    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Feed a single [Event] into the build. The positional information is used for nothing
    /// beyond what the caller already did with it; only the match matters here
    pub fn push_event(&mut self, event: Event) -> &mut Self {
        self.push(event.matched)
    }

    /// Feed a single [Match] into the build. Scalar matches arriving before any container has
    /// been opened have nowhere to attach and are dropped
    pub fn push(&mut self, matched: Match) -> &mut Self {
        match matched {
            Match::StartObject => self.start_container(JsonNode::object(self.container_name())),
            Match::StartArray => self.start_container(JsonNode::array(self.container_name())),
            Match::EndObject | Match::EndArray => self.end_container(),
            Match::PropertyName(name) => self.state.pending_name = Some(name),
            Match::String(value) => self.attach_scalar(Scalar::String(value)),
            Match::Integer(value) => self.attach_scalar(Scalar::Int64(value)),
            Match::Float(value) => self.attach_scalar(Scalar::Double(value)),
            Match::Boolean(value) => self.attach_scalar(Scalar::Boolean(value)),
            Match::Null => self.attach_scalar(Scalar::Null),
            Match::DateTime(value) => self.attach_scalar(Scalar::DateTime(value)),
            Match::Bytes(value) => self.attach_scalar(Scalar::Bytes(value)),
        }
        self
    }

    /// Containers take the pending name when one is available, or the default root name. The
    /// pending name is left in place either way
    fn container_name(&self) -> Option<String> {
        Some(
            self.state
                .pending_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ROOT_NAME.to_string()),
        )
    }

    fn start_container(&mut self, node: Rc<JsonNode>) {
        if let Some(current) = &self.state.current {
            current.add_child(Rc::clone(&node));
        }
        self.state.current = Some(node);
    }

    /// Walk the cursor back up to the enclosing container, staying put at the root
    fn end_container(&mut self) {
        if let Some(current) = &self.state.current {
            if let Some(parent) = current.parent() {
                self.state.current = Some(parent);
            }
        }
    }

    /// Attach a scalar to the current container. The pending name is cloned, not taken
    fn attach_scalar(&mut self, payload: Scalar) {
        if let Some(current) = &self.state.current {
            if let Some(node) = JsonNode::value(self.state.pending_name.clone(), payload) {
                current.add_child(node);
            }
        }
    }

    /// Complete the build: walk back up to the true root and apply the unwrap pass. The two
    /// collapse rules apply in sequence: a single-element array root is replaced by its
    /// element, and then an object root holding a single object-valued property is replaced by
    /// that nested object. Yields whatever tree was constructed, even from a truncated stream
    pub fn finish(self) -> Option<Rc<JsonNode>> {
        let mut root = self.state.current?;
        while let Some(parent) = root.parent() {
            root = parent;
        }
        if root.is_array() && root.len() == 1 {
            root = root.get(0)?;
        }
        if root.is_object() && root.len() == 1 {
            let only = root.get(0)?;
            if only.is_object() {
                root = only;
            }
        }
        Some(root)
    }
}

/// Enumeration of different supported input encoding types
#[derive(Debug, Copy, Clone)]
pub enum Encoding {
    Utf8,
    Ascii,
}

impl Default for Encoding {
    #[cfg(feature = "default_utf8_encoding")]
    fn default() -> Self {
        Encoding::Utf8
    }

    #[cfg(not(feature = "default_utf8_encoding"))]
    fn default() -> Self {
        Encoding::Ascii
    }
}

/// The text-level parser front-end. Preprocesses the raw input, lexes it and drives a
/// [TreeBuilder] to produce the root [JsonNode] of the parsed document
#[derive(Debug, Default)]
pub struct Parser {
    encoding: Encoding,
}

impl Parser {
    /// Create a new instance of the parser using a specific [Encoding]
    pub fn with_encoding(encoding: Encoding) -> Self {
        Self { encoding }
    }

    /// Parse the contents of a given file
    pub fn parse_file<PathLike: AsRef<Path>>(&self, path: PathLike) -> ParserResult<Rc<JsonNode>> {
        match File::open(&path) {
            Ok(f) => {
                let mut reader = BufReader::new(f);
                let text = self.decode(&mut reader);
                self.parse_text(&text)
            }
            Err(_) => builder_error!(Details::InvalidFile),
        }
    }

    /// Parse a byte buffer, decoding it according to the configured encoding
    pub fn parse_bytes(&self, bytes: &[u8]) -> ParserResult<Rc<JsonNode>> {
        let mut reader = BufReader::new(bytes);
        let text = self.decode(&mut reader);
        self.parse_text(&text)
    }

    /// Parse a string slice
    pub fn parse_str(&self, str: &str) -> ParserResult<Rc<JsonNode>> {
        self.parse_text(str)
    }

    /// Parse the contents of an arbitrary character iterator
    pub fn parse(&self, chars: &mut impl Iterator<Item = char>) -> ParserResult<Rc<JsonNode>> {
        let text: String = chars.collect();
        self.parse_text(&text)
    }

    /// Decode a byte stream into text using the configured encoding
    fn decode<Buffer: BufRead>(&self, buffer: &mut Buffer) -> String {
        match self.encoding {
            Encoding::Utf8 => Utf8Decoder::new(buffer).collect(),
            Encoding::Ascii => AsciiDecoder::new(buffer).collect(),
        }
    }

    /// Run the preprocessing heuristic and then drive a [TreeBuilder] from the lexed token
    /// stream. Lexical failures are hard failures; a token stream that simply runs out leaves
    /// whatever partial tree has been constructed so far
    fn parse_text(&self, text: &str) -> ParserResult<Rc<JsonNode>> {
        let text = preprocess(text);
        let mut chars = text.chars();
        let mut lexer = Lexer::new(&mut chars);
        let mut builder = TreeBuilder::new();
        let mut pushback: Option<PackedToken> = None;
        loop {
            let (token, span) = match pushback.take() {
                Some(packed) => packed,
                None => lexer.consume()?,
            };
            let matched = match token {
                Token::EndOfInput => break,
                Token::StartObject => Some(Match::StartObject),
                Token::EndObject => Some(Match::EndObject),
                Token::StartArray => Some(Match::StartArray),
                Token::EndArray => Some(Match::EndArray),
                // structural punctuation carries no information the builder wants
                Token::Colon | Token::Comma => None,
                Token::Str(value) => {
                    // a string followed by a colon is a property name, not a scalar
                    let next = lexer.consume()?;
                    if next.0 == Token::Colon {
                        Some(Match::PropertyName(value))
                    } else {
                        pushback = Some(next);
                        Some(Match::String(value))
                    }
                }
                Token::Integer(value) => Some(Match::Integer(value)),
                Token::Float(value) => Some(Match::Float(value)),
                Token::Boolean(value) => Some(Match::Boolean(value)),
                Token::Null => Some(Match::Null),
            };
            if let Some(matched) = matched {
                builder.push_event(Event { matched, span });
            }
        }
        match builder.finish() {
            Some(root) => Ok(root),
            None => builder_error!(Details::NoRootNode),
        }
    }
}

/// Attempt to treat the entire input as base64 encoded text: if the input decodes cleanly and
/// the result revalidates as UTF-8, the decoded text replaces the original. Any failure along
/// the way is swallowed and the original text is kept, since most inputs are not base64.
/// Short all-alphanumeric JSON can in principle decode cleanly and be misread; callers able to
/// rule base64 out should feed the builder through [TreeBuilder::push] instead
fn preprocess(text: &str) -> Cow<'_, str> {
    match BASE64_STANDARD.decode(text.trim()) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(decoded) => Cow::Owned(decoded),
            Err(_) => Cow::Borrowed(text),
        },
        Err(_) => Cow::Borrowed(text),
    }
}
