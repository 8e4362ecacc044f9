//! Virtual nodes and node construction.
//!
//! A virtual node is an immutable description of one desired host node: a
//! type tag plus a property map, with the child sequence embedded in the
//! map under the reserved `children` key. [`create_node`] normalizes the
//! caller's child list: nested lists are spliced flat in order, raw
//! strings and numbers become text nodes.

use crate::node::props::{PropValue, Props};
use crate::types::{NODE_VALUE, TEXT_NODE};

// =============================================================================
// Virtual Node
// =============================================================================

/// Immutable description of a desired tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct VNode {
    /// Type tag identifying the host-node kind ([`TEXT_NODE`] for text).
    pub kind: String,
    /// Property map, children included under the reserved key.
    pub props: Props,
}

impl VNode {
    /// Node with the given kind and properties, no children.
    pub fn new(kind: impl Into<String>, props: Props) -> Self {
        Self { kind: kind.into(), props }
    }

    /// Text node carrying a string literal.
    pub fn text(value: impl Into<String>) -> Self {
        Self::literal(PropValue::Text(value.into()))
    }

    /// Text node carrying an already-typed literal value.
    fn literal(value: PropValue) -> Self {
        let mut props = Props::new().with(NODE_VALUE, value);
        props.set_children(Vec::new());
        Self { kind: TEXT_NODE.to_string(), props }
    }

    /// The normalized child sequence.
    pub fn children(&self) -> &[VNode] {
        self.props.children()
    }

    /// Whether this is a text node.
    pub fn is_text(&self) -> bool {
        self.kind == TEXT_NODE
    }
}

// =============================================================================
// Children
// =============================================================================

/// One entry in a caller-supplied child list, before normalization.
#[derive(Clone, Debug)]
pub enum Child {
    /// An already-built virtual node.
    Node(VNode),
    /// A raw string literal; wrapped into a text node.
    Text(String),
    /// A raw numeric literal; wrapped into a text node.
    Number(f64),
    /// A nested list, spliced flat in order.
    Many(Vec<Child>),
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Self::Node(node)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for Child {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Vec<Child>> for Child {
    fn from(children: Vec<Child>) -> Self {
        Self::Many(children)
    }
}

impl From<Vec<VNode>> for Child {
    fn from(nodes: Vec<VNode>) -> Self {
        Self::Many(nodes.into_iter().map(Child::Node).collect())
    }
}

// =============================================================================
// Node construction
// =============================================================================

/// Build a virtual node from a kind, properties, and children.
///
/// Children are flattened into one ordered sequence; raw literals are
/// wrapped into text nodes. The result's `props.children` is exactly the
/// normalized sequence. The kind is not validated: unknown kinds are the
/// host binding's concern.
pub fn create_node(
    kind: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = Child>,
) -> VNode {
    let mut normalized = Vec::new();
    for child in children {
        flatten_into(child, &mut normalized);
    }

    let mut props = props;
    props.set_children(normalized);
    VNode { kind: kind.into(), props }
}

fn flatten_into(child: Child, out: &mut Vec<VNode>) {
    match child {
        Child::Node(node) => out.push(node),
        Child::Text(value) => out.push(VNode::literal(PropValue::Text(value))),
        Child::Number(value) => out.push(VNode::literal(PropValue::Number(value))),
        Child::Many(children) => {
            for child in children {
                flatten_into(child, out);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
