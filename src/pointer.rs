//! A representation of a JSON Pointer with associated operations, as per RFC 6901, along with
//! resolution of pointers against a built [JsonNode] tree
use std::fmt::Display;
use std::ops::Add;
use std::rc::Rc;

use crate::dom::JsonNode;

/// Each pointer is a series of segments delineated by a separator char
const PATH_SEPARATOR: char = '/';
/// As per the RFC, we need to encode any tilde characters as ~0
const ENCODED_TILDE: &str = "~0";
/// As per the RFC, we need to encode any slash characters as ~1
const ENCODED_SLASH: &str = "~1";

/// Each pointer is made up of one of three different component types
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPointerComponent {
    /// Root element of a pointer
    Root,
    /// A named element within a pointer
    Name(String),
    /// An indexed element within a pointer
    Index(usize),
}

impl Display for JsonPointerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, ""),
            Self::Name(s) => write!(
                f,
                "{}",
                &s.replace('~', ENCODED_TILDE).replace('/', ENCODED_SLASH)
            ),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A structure representing a complete pointer, comprising multiple [JsonPointerComponent]s
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsonPointer {
    /// The components that go together to make up the pointer
    components: Vec<JsonPointerComponent>,
}

impl JsonPointer {
    /// Parse a pointer from its string representation. An empty string is the empty pointer;
    /// all-digit segments are treated as indexes, everything else as (escaped) names
    pub fn parse(s: &str) -> Self {
        let mut pointer = JsonPointer::default();
        for segment in s.split(PATH_SEPARATOR).skip(1) {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                pointer.push_index(segment.parse().unwrap_or(0));
            } else {
                pointer.push_name(
                    segment
                        .replace(ENCODED_SLASH, "/")
                        .replace(ENCODED_TILDE, "~"),
                );
            }
        }
        pointer
    }

    /// Returns the number of [JsonPointerComponent]s within the pointer
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks whether the pointer is the empty pointer
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Push a whole bunch of names onto the end of the pointer in order
    pub fn push_names(&mut self, names: &[&str]) {
        names.iter().for_each(|n| self.push_name(n.to_string()))
    }

    /// Push a whole bunch of indexes onto the end of the pointer in order
    pub fn push_indexes(&mut self, indexes: &[usize]) {
        indexes.iter().for_each(|i| self.push_index(*i))
    }

    /// Push a new [JsonPointerComponent::Name] onto the end of the pointer
    pub fn push_name(&mut self, name: String) {
        if self.is_empty() {
            self.components.push(JsonPointerComponent::Root)
        }
        self.components.push(JsonPointerComponent::Name(name))
    }

    /// Push a new [JsonPointerComponent::Index] onto the end of the pointer
    pub fn push_index(&mut self, index: usize) {
        if self.is_empty() {
            self.components.push(JsonPointerComponent::Root)
        }
        self.components.push(JsonPointerComponent::Index(index))
    }

    /// Pop the last component off the back of the pointer
    pub fn pop(&mut self) -> Option<JsonPointerComponent> {
        self.components.pop()
    }

    /// Checks whether a pointer matches another pointer
    pub fn matches(&self, rhs: &JsonPointer) -> bool {
        self.as_str() == rhs.as_str()
    }

    /// Navigate a node tree following the components of this pointer. Name components follow
    /// the tree's own lookup rules (case-insensitive, first match); index components use
    /// positional access and so work against both objects and arrays. An empty pointer
    /// resolves to the root itself, anything unmatched resolves to nothing
    pub fn resolve(&self, root: &Rc<JsonNode>) -> Option<Rc<JsonNode>> {
        let mut current = Rc::clone(root);
        for component in &self.components {
            match component {
                JsonPointerComponent::Root => (),
                JsonPointerComponent::Name(name) => current = current.lookup(name)?,
                JsonPointerComponent::Index(index) => current = current.get(*index)?,
            }
        }
        Some(current)
    }

    /// Serialise the pointer into a string representation that's compliant with RFC 6901
    pub fn as_str(&self) -> String {
        self.components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join("/")
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Add<&JsonPointer> for JsonPointer {
    type Output = Self;

    /// Concatenate two [JsonPointer] instances
    fn add(mut self, rhs: &JsonPointer) -> Self {
        for component in &rhs.components {
            match component {
                JsonPointerComponent::Root => (),
                JsonPointerComponent::Name(name) => self.push_name(name.clone()),
                JsonPointerComponent::Index(index) => self.push_index(*index),
            }
        }
        self
    }
}
