//! Recording host - in-memory nodes plus an operation log.
//!
//! Materializes host nodes as plain records and logs every capability
//! call, so tests can assert both what the host tree looks like and
//! exactly which mutations produced it. Initial properties applied during
//! `create_node` populate the record but are not logged as mutations;
//! only one `Create` op marks the node's birth.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use super::{HostBackend, HostError};
use crate::node::{EventHandler, PropValue, Props};
use crate::types::event_name;

// =============================================================================
// Operation log
// =============================================================================

/// One capability call, as observed by the recording host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostOp {
    Create { node: usize, kind: String },
    SetAttribute { node: usize, name: String, value: String },
    RemoveAttribute { node: usize, name: String },
    AttachHandler { node: usize, event: String },
    DetachHandler { node: usize, event: String },
    AppendChild { parent: usize, child: usize },
    RemoveChild { parent: usize, child: usize },
}

impl HostOp {
    /// Whether this op mutates an already-created node or the tree shape.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Create { .. })
    }
}

// =============================================================================
// Node records
// =============================================================================

/// Materialized state of one recorded node.
pub struct RecordedNode {
    pub kind: String,
    pub attributes: BTreeMap<String, String>,
    pub handlers: BTreeMap<String, EventHandler>,
    pub children: Vec<usize>,
}

impl RecordedNode {
    fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: BTreeMap::new(),
            handlers: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

// =============================================================================
// Recording host
// =============================================================================

/// In-memory host backend that records every operation.
#[derive(Default)]
pub struct RecordingHost {
    nodes: Vec<RecordedNode>,
    ops: Vec<HostOp>,
    rejected: BTreeSet<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached container node to render into.
    ///
    /// Containers are caller-owned, so no `Create` op is recorded.
    pub fn container(&mut self) -> usize {
        self.nodes.push(RecordedNode::new("#container"));
        self.nodes.len() - 1
    }

    /// Make `create_node` fail for a kind with
    /// [`HostError::InvalidNodeType`].
    pub fn reject_kind(&mut self, kind: impl Into<String>) {
        self.rejected.insert(kind.into());
    }

    /// Every operation observed so far, in order.
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Drain the operation log, keeping node state.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of nodes created through the capability contract.
    pub fn created_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, HostOp::Create { .. }))
            .count()
    }

    pub fn node(&self, id: usize) -> &RecordedNode {
        &self.nodes[id]
    }

    pub fn attribute(&self, id: usize, name: &str) -> Option<&str> {
        self.nodes[id].attributes.get(name).map(String::as_str)
    }

    pub fn handler(&self, id: usize, event: &str) -> Option<&EventHandler> {
        self.nodes[id].handlers.get(event)
    }

    pub fn children(&self, id: usize) -> &[usize] {
        &self.nodes[id].children
    }

    /// Invoke the handler attached for `event` on a node, if any.
    pub fn dispatch(&self, id: usize, event: &str, payload: &dyn std::any::Any) {
        if let Some(handler) = self.nodes[id].handlers.get(event) {
            handler(payload);
        }
    }

    fn apply_initial_props(&mut self, id: usize, props: &Props) {
        for (name, value) in props.attributes() {
            if let Some(text) = value.attribute_text() {
                self.nodes[id].attributes.insert(name.to_string(), text);
            }
        }
        for (name, handler) in props.events() {
            self.nodes[id]
                .handlers
                .insert(event_name(name), handler.clone());
        }
    }
}

impl HostBackend for RecordingHost {
    type Node = usize;

    fn create_node(&mut self, kind: &str, props: &Props) -> Result<usize, HostError> {
        if self.rejected.contains(kind) {
            return Err(HostError::InvalidNodeType { kind: kind.to_string() });
        }
        self.nodes.push(RecordedNode::new(kind));
        let id = self.nodes.len() - 1;
        self.apply_initial_props(id, props);
        self.ops.push(HostOp::Create { node: id, kind: kind.to_string() });
        Ok(id)
    }

    fn set_attribute(
        &mut self,
        node: &usize,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError> {
        let text = value.attribute_text().unwrap_or_default();
        self.nodes[*node]
            .attributes
            .insert(name.to_string(), text.clone());
        self.ops.push(HostOp::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: text,
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &usize, name: &str) -> Result<(), HostError> {
        self.nodes[*node].attributes.remove(name);
        self.ops.push(HostOp::RemoveAttribute {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn attach_handler(
        &mut self,
        node: &usize,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        self.nodes[*node]
            .handlers
            .insert(event.to_string(), handler.clone());
        self.ops.push(HostOp::AttachHandler {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn detach_handler(
        &mut self,
        node: &usize,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        // Detach by value: only drop the entry if it still holds the
        // handler being detached.
        if let Some(current) = self.nodes[*node].handlers.get(event) {
            if Rc::ptr_eq(current, handler) {
                self.nodes[*node].handlers.remove(event);
            }
        }
        self.ops.push(HostOp::DetachHandler {
            node: *node,
            event: event.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
        self.nodes[*parent].children.push(*child);
        self.ops.push(HostOp::AppendChild { parent: *parent, child: *child });
        Ok(())
    }

    fn remove_child(&mut self, parent: &usize, child: &usize) -> Result<(), HostError> {
        self.nodes[*parent].children.retain(|c| c != child);
        self.ops.push(HostOp::RemoveChild { parent: *parent, child: *child });
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_create_applies_initial_props_without_mutation_ops() {
        let mut host = RecordingHost::new();
        let props = Props::new()
            .with("class", "title")
            .with("onClick", PropValue::handler(|_| {}));

        let id = host.create_node("div", &props).unwrap();

        assert_eq!(host.attribute(id, "class"), Some("title"));
        assert!(host.handler(id, "click").is_some());
        assert_eq!(host.ops().len(), 1);
        assert!(!host.ops()[0].is_mutation());
    }

    #[test]
    fn test_rejected_kind_errors() {
        let mut host = RecordingHost::new();
        host.reject_kind("video");

        let err = host.create_node("video", &Props::new()).unwrap_err();
        assert!(matches!(err, HostError::InvalidNodeType { kind } if kind == "video"));
    }

    #[test]
    fn test_remove_child_detaches_subtree_root() {
        let mut host = RecordingHost::new();
        let container = host.container();
        let a = host.create_node("a", &Props::new()).unwrap();
        host.append_child(&container, &a).unwrap();
        host.remove_child(&container, &a).unwrap();

        assert!(host.children(container).is_empty());
    }

    #[test]
    fn test_dispatch_invokes_attached_handler() {
        let calls = Rc::new(Cell::new(0));
        let calls_seen = calls.clone();

        let mut host = RecordingHost::new();
        let props = Props::new().with(
            "onClick",
            PropValue::handler(move |_| calls_seen.set(calls_seen.get() + 1)),
        );
        let id = host.create_node("button", &props).unwrap();

        host.dispatch(id, "click", &());
        assert_eq!(calls.get(), 1);
    }
}
