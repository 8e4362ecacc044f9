//! Commit phase - applying a finished build to the host tree.
//!
//! One uninterrupted pass per generation: the deletion list first, then a
//! pre-order walk (child before sibling) of the work-in-progress tree
//! applying each fiber's effect. Host mutations are batched here: the
//! host tree is never observed half-mutated across a yield point, because
//! the work loop only yields between units and the commit runs whole
//! within a single invocation.

use std::mem;

use crate::fiber::{EffectTag, FiberId};
use crate::host::{HostBackend, HostError};
use crate::reconcile::diff_props;

use super::Runtime;

impl<H: HostBackend> Runtime<H> {
    /// Flush the finished work-in-progress tree to the host and promote
    /// it to current.
    pub(super) fn commit_root(&mut self) -> Result<(), HostError> {
        let deletions = mem::take(&mut self.deletions);
        log::debug!("commit: {} deletions", deletions.len());
        for id in deletions {
            self.commit_deletion(id)?;
        }

        let Some(wip) = self.wip_root else {
            return Ok(());
        };
        if let Some(child) = self.fibers[wip].child {
            self.commit_work(child)?;
        }

        // Promote: work-in-progress becomes current, atomically from the
        // perspective of the next render call.
        self.wip_root = None;
        let previous = self.current_root.replace(wip);

        // Alternates were only needed while building; drop them together
        // with the generation they point into.
        self.clear_alternates(wip);
        if let Some(old) = previous {
            self.fibers.release_subtree(old);
        }
        Ok(())
    }

    /// Remove a deleted fiber's host subtree from its host parent.
    fn commit_deletion(&mut self, id: FiberId) -> Result<(), HostError> {
        let Some(parent) = self.host_parent_of(id) else {
            return Ok(());
        };
        let Some(node) = self.fibers[id].host.clone() else {
            return Ok(());
        };
        self.host.remove_child(&parent, &node)
    }

    /// Apply one fiber's effect, then its child and sibling in pre-order.
    fn commit_work(&mut self, id: FiberId) -> Result<(), HostError> {
        match self.fibers[id].effect {
            EffectTag::Placement => {
                if let (Some(parent), Some(node)) =
                    (self.host_parent_of(id), self.fibers[id].host.clone())
                {
                    self.host.append_child(&parent, &node)?;
                }
            }
            EffectTag::Update => {
                if let (Some(alt), Some(node)) =
                    (self.fibers[id].alternate, self.fibers[id].host.clone())
                {
                    let delta = diff_props(&self.fibers[alt].props, &self.fibers[id].props);
                    for (event, handler) in &delta.detached {
                        self.host.detach_handler(&node, event, handler)?;
                    }
                    for name in &delta.removed {
                        self.host.remove_attribute(&node, name)?;
                    }
                    for (name, value) in &delta.set {
                        self.host.set_attribute(&node, name, value)?;
                    }
                    for (event, handler) in &delta.attached {
                        self.host.attach_handler(&node, event, handler)?;
                    }
                }
            }
            // Deletions were applied in the first pass and are not linked
            // into this tree; the root carries no effect.
            EffectTag::Deletion | EffectTag::None => {}
        }

        if let Some(child) = self.fibers[id].child {
            self.commit_work(child)?;
        }
        if let Some(sibling) = self.fibers[id].sibling {
            self.commit_work(sibling)?;
        }
        Ok(())
    }

    /// Host node of the nearest ancestor fiber that owns one.
    fn host_parent_of(&self, id: FiberId) -> Option<H::Node> {
        let mut cursor = self.fibers[id].parent;
        while let Some(parent) = cursor {
            if let Some(node) = &self.fibers[parent].host {
                return Some(node.clone());
            }
            cursor = self.fibers[parent].parent;
        }
        None
    }

    /// Clear every alternate link in the promoted tree.
    fn clear_alternates(&mut self, root: FiberId) {
        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            self.fibers[id].alternate = None;
            if let Some(child) = self.fibers[id].child {
                pending.push(child);
            }
            if let Some(sibling) = self.fibers[id].sibling {
                pending.push(sibling);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
