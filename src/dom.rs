//! The polymorphic document model produced by the tree builder
//!
//! A parsed document is a tree of [JsonNode]s. Each node is one of three variants: an object
//! (named children), an array (positional children) or a value (a tagged scalar payload).
//! Ownership flows strictly downwards through the child collections; parent links are weak
//! back-references used for upward traversal only, so the ownership graph remains acyclic.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::scalar::Scalar;
use crate::tags::TypeTag;

/// The shared child collection type. Collections are reference counted so that a renamed
/// container can alias the children of its source (see [JsonNode::rename])
pub type Children = Rc<RefCell<Vec<Rc<JsonNode>>>>;

/// The three node variants. Consumers should match exhaustively on this rather than probing
/// with the convenience predicates where full coverage matters
#[derive(Debug)]
pub enum NodeKind {
    /// An object with an insertion-ordered, possibly duplicate-named property list
    Object(Children),
    /// An array with positionally ordered elements
    Array(Children),
    /// A scalar value together with its registry tag
    Value {
        /// The registry tag derived from the payload at construction time
        tag: TypeTag,
        /// The payload itself
        payload: Scalar,
    },
}

/// A single node within a parsed document
#[derive(Debug)]
pub struct JsonNode {
    /// Optional node name. Array elements and the root typically carry either no name or a
    /// name inherited from the enclosing property
    name: Option<String>,
    /// Non-owning link back to the enclosing container
    parent: RefCell<Weak<JsonNode>>,
    /// The variant specific state
    kind: NodeKind,
}

impl JsonNode {
    /// Create a new, empty object node
    pub fn object(name: Option<String>) -> Rc<JsonNode> {
        Rc::new(JsonNode {
            name,
            parent: RefCell::new(Weak::new()),
            kind: NodeKind::Object(Rc::new(RefCell::new(Vec::new()))),
        })
    }

    /// Create a new, empty array node
    pub fn array(name: Option<String>) -> Rc<JsonNode> {
        Rc::new(JsonNode {
            name,
            parent: RefCell::new(Weak::new()),
            kind: NodeKind::Array(Rc::new(RefCell::new(Vec::new()))),
        })
    }

    /// Create a new value node from a scalar payload, deriving the registry tag. This is the
    /// only construction that can fail: when no name is given and the payload is null there is
    /// neither a name, a resolved type nor a value to hang a node on, and no node is produced
    pub fn value(name: Option<String>, payload: impl Into<Scalar>) -> Option<Rc<JsonNode>> {
        let payload = payload.into();
        let tag = TypeTag::of(&payload);
        if name.is_none() && tag == TypeTag::Empty {
            return None;
        }
        Some(Rc::new(JsonNode {
            name,
            parent: RefCell::new(Weak::new()),
            kind: NodeKind::Value { tag, payload },
        }))
    }

    /// Wrap an existing value node rather than re-deriving tag and payload: the source's tag
    /// and payload are copied verbatim, and the supplied name takes precedence over the
    /// source's own name. Container sources carry no scalar payload and produce no node
    pub fn wrap(name: Option<String>, source: &Rc<JsonNode>) -> Option<Rc<JsonNode>> {
        match &source.kind {
            NodeKind::Value { tag, payload } => {
                let name = name.or_else(|| source.name.clone());
                if name.is_none() && *tag == TypeTag::Empty {
                    return None;
                }
                Some(Rc::new(JsonNode {
                    name,
                    parent: RefCell::new(Weak::new()),
                    kind: NodeKind::Value {
                        tag: *tag,
                        payload: payload.clone(),
                    },
                }))
            }
            _ => None,
        }
    }

    /// The variant specific state for this node
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Is this node an object?
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }

    /// Is this node an array?
    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array(_))
    }

    /// Is this node a scalar value?
    pub fn is_value(&self) -> bool {
        matches!(self.kind, NodeKind::Value { .. })
    }

    /// Emptiness is variant specific: containers are empty when they have no children, values
    /// are empty when the payload is null or the empty string (zero and `false` are not empty)
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            NodeKind::Object(children) | NodeKind::Array(children) => {
                children.borrow().is_empty()
            }
            NodeKind::Value { payload, .. } => payload.is_empty(),
        }
    }

    /// The node name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The enclosing container, if this node is attached and the container is still alive
    pub fn parent(&self) -> Option<Rc<JsonNode>> {
        self.parent.borrow().upgrade()
    }

    /// The registry tag for a value node
    pub fn tag(&self) -> Option<TypeTag> {
        match &self.kind {
            NodeKind::Value { tag, .. } => Some(*tag),
            _ => None,
        }
    }

    /// The scalar payload for a value node
    pub fn payload(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Value { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Append a child to a container, re-parenting the child onto this node. Returns a handle
    /// to this node so that calls can be chained builder-style. Value nodes hold no children
    /// and ignore the call
    pub fn add_child(self: &Rc<Self>, child: Rc<JsonNode>) -> Rc<JsonNode> {
        if let NodeKind::Object(children) | NodeKind::Array(children) = &self.kind {
            *child.parent.borrow_mut() = Rc::downgrade(self);
            children.borrow_mut().push(child);
        }
        Rc::clone(self)
    }

    /// The number of children held by a container. Values always report zero
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Object(children) | NodeKind::Array(children) => children.borrow().len(),
            NodeKind::Value { .. } => 0,
        }
    }

    /// A snapshot of the children in insertion order
    pub fn children(&self) -> Vec<Rc<JsonNode>> {
        match &self.kind {
            NodeKind::Object(children) | NodeKind::Array(children) => {
                children.borrow().clone()
            }
            NodeKind::Value { .. } => Vec::new(),
        }
    }

    /// Positional child access, valid for both container variants. Out of range indexes are
    /// absent rather than an error
    pub fn get(&self, index: usize) -> Option<Rc<JsonNode>> {
        match &self.kind {
            NodeKind::Object(children) | NodeKind::Array(children) => {
                children.borrow().get(index).cloned()
            }
            NodeKind::Value { .. } => None,
        }
    }

    /// Look a property up by name within an object. The scan is linear over the insertion
    /// order, the comparison is ASCII case-insensitive, and the *first* match wins when
    /// duplicate names are present (duplicates are legal)
    pub fn lookup(&self, name: &str) -> Option<Rc<JsonNode>> {
        match &self.kind {
            NodeKind::Object(children) => children
                .borrow()
                .iter()
                .find(|child| {
                    child
                        .name()
                        .map(|n| n.eq_ignore_ascii_case(name))
                        .unwrap_or(false)
                })
                .cloned(),
            _ => None,
        }
    }

    /// Check whether an object has a property with the given name (same rules as [lookup])
    ///
    /// [lookup]: JsonNode::lookup
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Produce a copy of this node carrying a new name.
    ///
    /// For container variants this is a *shallow* clone: the copy shares the same underlying
    /// child collection instance as the source, so children added through either node are
    /// visible through both. Callers relying on independent trees must rebuild the children
    /// themselves. For value variants the payload is copied in full and the two nodes are
    /// completely independent. In both cases the copy keeps the source's parent reference but
    /// is not inserted into the parent's child collection
    pub fn rename(&self, name: &str) -> Rc<JsonNode> {
        let kind = match &self.kind {
            NodeKind::Object(children) => NodeKind::Object(Rc::clone(children)),
            NodeKind::Array(children) => NodeKind::Array(Rc::clone(children)),
            NodeKind::Value { tag, payload } => NodeKind::Value {
                tag: *tag,
                payload: payload.clone(),
            },
        };
        Rc::new(JsonNode {
            name: Some(name.to_string()),
            parent: RefCell::new(self.parent.borrow().clone()),
            kind,
        })
    }
}
