//! Property values and the property map.
//!
//! Properties carry everything a virtual node knows about itself: plain
//! attributes, event handlers, and (under the reserved `children` key) the
//! node's normalized child sequence. Handlers compare by identity, all
//! other values structurally: the distinction is what lets the property
//! diff detach a replaced handler by its old value.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::node::VNode;
use crate::types::{CHILDREN, is_attribute, is_event};

// =============================================================================
// Event handlers
// =============================================================================

/// Event handler callback.
///
/// Using `Rc<dyn Fn>` instead of `Box<dyn Fn>` so handlers can be cloned
/// into the property maps of successive generations without ownership
/// issues. The argument is the host's native event object; the engine
/// imposes no contract beyond "invocable with it".
pub type EventHandler = Rc<dyn Fn(&dyn Any)>;

// =============================================================================
// Prop Value
// =============================================================================

/// A single property value.
///
/// `Nodes` only ever appears under the reserved `children` key; it is how
/// a node's normalized child sequence travels inside the property map.
#[derive(Clone)]
pub enum PropValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Event handler (event-prefixed names only).
    Handler(EventHandler),
    /// Child node list (reserved `children` key only).
    Nodes(Vec<VNode>),
}

impl PropValue {
    /// Wrap a closure as a handler value.
    pub fn handler(f: impl Fn(&dyn Any) + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }

    /// The value rendered as attribute text, if it has one.
    ///
    /// Handlers and child lists have no attribute representation. Whole
    /// numbers print without a fractional part.
    pub fn attribute_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            Self::Number(n) => Some(format!("{n}")),
            Self::Bool(b) => Some(format!("{b}")),
            Self::Handler(_) | Self::Nodes(_) => None,
        }
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Handlers compare by identity, everything else structurally.
impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            (Self::Nodes(a), Self::Nodes(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
            Self::Nodes(nodes) => f.debug_tuple("Nodes").field(nodes).finish(),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}

// =============================================================================
// Props map
// =============================================================================

/// Property map of a virtual node or fiber.
///
/// Names are unique; the map itself is semantically unordered but iterates
/// deterministically so host bindings observe a stable application order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<String, PropValue>,
}

impl Props {
    /// Empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a property.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all properties, reserved keys included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate plain attributes (no events, no `children`).
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.iter().filter(|(name, _)| is_attribute(name))
    }

    /// Iterate event properties that carry a handler.
    pub fn events(&self) -> impl Iterator<Item = (&str, &EventHandler)> {
        self.iter().filter_map(|(name, value)| match value {
            PropValue::Handler(h) if is_event(name) => Some((name, h)),
            _ => None,
        })
    }

    /// The normalized child sequence stored under the reserved key.
    pub fn children(&self) -> &[VNode] {
        match self.entries.get(CHILDREN) {
            Some(PropValue::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    /// Store the normalized child sequence.
    pub(crate) fn set_children(&mut self, children: Vec<VNode>) {
        self.entries.insert(CHILDREN.to_string(), PropValue::Nodes(children));
    }
}

// =============================================================================
// Tests
// =============================================================================
