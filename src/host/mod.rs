//! Host backends - the capability contract the engine renders through.
//!
//! The engine never touches a concrete tree. Everything it needs from a
//! host is behind [`HostBackend`]: create a node for a type tag, mutate
//! attributes and handlers, and splice nodes under parents. A binding
//! decides what a node handle *is* (its associated `Node` type): the
//! engine only stores and clones handles.
//!
//! Two bindings ship with the crate:
//!
//! - [`RecordingHost`] - in-memory nodes plus an operation log; the
//!   deterministic fixture for tests.
//! - [`TerminalHost`] - a terminal canvas over crossterm.

mod recording;
mod terminal;

pub use recording::{HostOp, RecordedNode, RecordingHost};
pub use terminal::{TermNode, TerminalHost, TextAttr};

use thiserror::Error;

use crate::node::{EventHandler, PropValue, Props};

// =============================================================================
// Errors
// =============================================================================

/// Failure surfaced by a host binding.
///
/// The engine has no recovery policy: an error aborts the current
/// scheduler tick and leaves the work-in-progress generation incomplete.
#[derive(Debug, Error)]
pub enum HostError {
    /// The binding does not know how to create a node of this kind.
    #[error("invalid host node type `{kind}`")]
    InvalidNodeType { kind: String },

    /// I/O failure in the binding, propagated unmodified.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Capability contract
// =============================================================================

/// Capabilities a host tree must provide.
///
/// `Node` is the binding's handle type; the engine clones handles freely
/// (one lives on the owning fiber, clones are passed back into the
/// binding), so handles are expected to clone cheaply (ids, `Rc`s).
pub trait HostBackend {
    /// Host node handle.
    type Node: Clone;

    /// Create a host node for a type tag, applying the initial attributes
    /// and handlers from `props` (the reserved `children` key is
    /// metadata and must be ignored).
    fn create_node(&mut self, kind: &str, props: &Props) -> Result<Self::Node, HostError>;

    /// Set or replace a named attribute.
    fn set_attribute(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), HostError>;

    /// Clear a named attribute.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), HostError>;

    /// Attach a handler for a host event name.
    fn attach_handler(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    /// Detach a previously attached handler by value.
    fn detach_handler(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;

    /// Append a node under a parent, after any existing children.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    /// Remove a node, and with it the node's whole subtree, from a parent.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;
}
