//! Node Model - immutable virtual-node descriptions.
//!
//! The node model is the engine's input language: callers describe the
//! tree they want as [`VNode`] values and hand the root to
//! [`Runtime::render`](crate::runtime::Runtime::render). Nothing here
//! touches the host: descriptions are pure data.
//!
//! - [`props`] - property values and the property map
//! - [`vnode`] - virtual nodes, child normalization, [`create_node`]

mod props;
mod vnode;

pub use props::{EventHandler, PropValue, Props};
pub use vnode::{Child, VNode, create_node};
