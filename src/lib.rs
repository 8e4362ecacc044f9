//! # ember-ui
//!
//! Incremental UI-tree reconciliation engine for Rust.
//!
//! Callers describe the tree they want as immutable virtual nodes; the
//! engine diffs that description against what it committed last time and
//! applies the minimal set of mutations to a host tree: a browser-like
//! canvas, a terminal, any backend implementing the capability contract.
//! Work is cooperative: the diff proceeds one fiber at a time and yields
//! between units whenever the current idle slice runs out, so a render
//! never blocks the caller for unbounded time.
//!
//! ## Architecture
//!
//! ```text
//! VNode tree → render() → work loop (reconcile, one fiber per unit)
//!                              │ yields between units
//!                              ▼
//!                         commit (one uninterrupted pass) → host tree
//! ```
//!
//! Two fiber generations exist at most: the committed tree and the
//! work-in-progress tree being diffed against it. Diffing is strictly
//! positional: same kind at the same position is an update, anything
//! else is a removal plus an insertion.
//!
//! ## Modules
//!
//! - [`types`] - reserved property names and classification
//! - [`node`] - virtual nodes and property maps
//! - [`fiber`] - the arena-backed work tree
//! - [`reconcile`] - positional diffing and property deltas
//! - [`schedule`] - the idle-slice deadline abstraction
//! - [`runtime`] - the scheduler context, work loop, and committer
//! - [`host`] - the capability contract plus the recording and terminal
//!   bindings
//!
//! ## Example
//!
//! ```
//! use ember_ui::{Props, Runtime, create_node};
//! use ember_ui::host::RecordingHost;
//! use std::time::Duration;
//!
//! let mut runtime = Runtime::new(RecordingHost::new());
//! let container = runtime.host_mut().container();
//!
//! let tree = create_node(
//!     "div",
//!     Props::new().with("class", "greeting"),
//!     vec!["hello".into()],
//! );
//! runtime.render(tree, container);
//! runtime.run_until_idle(Duration::from_millis(4)).unwrap();
//!
//! let div = runtime.host().children(container)[0];
//! assert_eq!(runtime.host().node(div).kind, "div");
//! ```

pub mod fiber;
pub mod host;
pub mod node;
pub mod reconcile;
pub mod runtime;
pub mod schedule;
pub mod types;

// Re-export commonly used items
pub use types::{CHILDREN, EVENT_PREFIX, NODE_VALUE, TEXT_NODE, event_name, is_attribute, is_event};

pub use node::{Child, EventHandler, PropValue, Props, VNode, create_node};

pub use fiber::{EffectTag, Fiber, FiberArena, FiberId};

pub use reconcile::{PropDelta, diff_props, reconcile_children};

pub use schedule::{Deadline, TimeSlice, Unbounded, UnitBudget};

pub use runtime::{Runtime, WorkStatus};

pub use host::{HostBackend, HostError};
