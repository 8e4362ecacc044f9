//! Property diffing between two generations of one node.
//!
//! Computes the change set first, then lets the committer apply it: only
//! properties that actually differ produce host calls. The reserved
//! `children` key never reaches attribute handling, and handlers compare
//! by identity so a replaced callback is detached by its old value and
//! attached by its new one, never merged.

use crate::node::{EventHandler, PropValue, Props};
use crate::types::{event_name, is_attribute, is_event};

// =============================================================================
// Prop Delta
// =============================================================================

/// The mutations needed to move a host node from one property map to the
/// next. Application order: detach, remove, set, attach.
#[derive(Default)]
pub struct PropDelta<'a> {
    /// Handlers gone or replaced, keyed by host event name, detached by
    /// their old value.
    pub detached: Vec<(String, &'a EventHandler)>,
    /// Attributes no longer present.
    pub removed: Vec<&'a str>,
    /// Attributes new or changed.
    pub set: Vec<(&'a str, &'a PropValue)>,
    /// Handlers new or changed, keyed by host event name.
    pub attached: Vec<(String, &'a EventHandler)>,
}

impl PropDelta<'_> {
    /// True when the two maps need no host mutation at all.
    pub fn is_empty(&self) -> bool {
        self.detached.is_empty()
            && self.removed.is_empty()
            && self.set.is_empty()
            && self.attached.is_empty()
    }
}

/// Diff two property maps into an explicit delta.
pub fn diff_props<'a>(prev: &'a Props, next: &'a Props) -> PropDelta<'a> {
    let mut delta = PropDelta::default();

    for (name, value) in prev.iter() {
        if is_event(name) {
            if let PropValue::Handler(handler) = value {
                let changed = next.get(name).is_none_or(|n| n != value);
                if changed {
                    delta.detached.push((event_name(name), handler));
                }
            }
        } else if is_attribute(name) && next.get(name).is_none() {
            delta.removed.push(name);
        }
    }

    for (name, value) in next.iter() {
        let changed = prev.get(name).is_none_or(|p| p != value);
        if !changed {
            continue;
        }
        if is_event(name) {
            if let PropValue::Handler(handler) = value {
                delta.attached.push((event_name(name), handler));
            }
        } else if is_attribute(name) {
            delta.set.push((name, value));
        }
    }

    delta
}

// =============================================================================
// Tests
// =============================================================================
