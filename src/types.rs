//! Core conventions for ember-ui.
//!
//! The property namespace is partitioned by convention, not by schema:
//! a handful of reserved names and one prefix decide how every property
//! flows through the reconciler and out to the host binding. Everything
//! else builds on the predicates defined here.

// =============================================================================
// Reserved names
// =============================================================================

/// Type tag of text nodes.
///
/// A bare string or number child is never a virtual node by itself; it is
/// wrapped into a node of this kind during [`create_node`](crate::node::create_node)
/// normalization.
pub const TEXT_NODE: &str = "#text";

/// Reserved property holding a text node's literal value.
pub const NODE_VALUE: &str = "nodeValue";

/// Reserved property carrying a node's normalized child sequence.
///
/// Children travel embedded in the property map. This key is metadata for
/// the reconciler and is excluded from attribute handling everywhere.
pub const CHILDREN: &str = "children";

/// Prefix that marks a property as an event handler ("onClick", "onKey", ...).
pub const EVENT_PREFIX: &str = "on";

// =============================================================================
// Property classification
// =============================================================================

/// Whether a property name designates an event handler.
pub fn is_event(name: &str) -> bool {
    name.starts_with(EVENT_PREFIX)
}

/// Whether a property name designates a plain host attribute.
///
/// Everything that is neither an event nor the reserved `children` key.
pub fn is_attribute(name: &str) -> bool {
    name != CHILDREN && !is_event(name)
}

/// Host-level event name for an event property.
///
/// Strips the prefix and lowercases the rest: `onClick` -> `click`.
pub fn event_name(prop: &str) -> String {
    prop[EVENT_PREFIX.len()..].to_lowercase()
}

// =============================================================================
// Tests
// =============================================================================
