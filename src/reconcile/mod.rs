//! Reconciler - positional diffing between generations.
//!
//! [`reconcile_children`] pairs a fiber's new virtual-node child list
//! against the old sibling chain reached through its alternate, strictly
//! by position. Kind equality is the only reuse criterion: same kind at a
//! position means Update (host node reused, properties re-diffed at
//! commit); anything else at that position means Deletion of the old
//! and/or Placement of the new. There is no key-based matching: a moved
//! child reads as a remove plus an insert.

pub mod diff;

pub use diff::{PropDelta, diff_props};

use crate::fiber::{EffectTag, Fiber, FiberArena, FiberId};
use crate::node::VNode;

/// Whether the old fiber at a position can be reused for the new child.
///
/// Positional matching consults only the kind. A caller-supplied stable
/// identity would be checked here before falling back to position, if
/// list reordering support were ever needed.
fn same_kind<N>(old: &Fiber<N>, new: &VNode) -> bool {
    old.kind == new.kind
}

/// Reconcile a fiber's children against the previous generation.
///
/// Walks `elements` and the old sibling chain (via `arena[wip].alternate`)
/// in lockstep. Produces the new child fibers linked under `wip` in list
/// order, and appends every dropped old fiber to `deletions` exactly once.
pub fn reconcile_children<N: Clone>(
    arena: &mut FiberArena<N>,
    wip: FiberId,
    elements: &[VNode],
    deletions: &mut Vec<FiberId>,
) {
    let mut index = 0;
    let mut old = arena[wip].alternate.and_then(|alt| arena[alt].child);
    let mut prev: Option<FiberId> = None;

    while index < elements.len() || old.is_some() {
        let element = elements.get(index);

        let new_fiber = match (old, element) {
            (Some(old_id), Some(element)) if same_kind(&arena[old_id], element) => {
                // Same kind at the same position: keep the host node,
                // re-diff properties at commit.
                let mut fiber = Fiber::new(arena[old_id].kind.clone(), element.props.clone());
                fiber.host = arena[old_id].host.clone();
                fiber.parent = Some(wip);
                fiber.alternate = Some(old_id);
                fiber.effect = EffectTag::Update;
                Some(arena.alloc(fiber))
            }
            _ => {
                // Position changed kind, grew, or shrank.
                if let Some(old_id) = old {
                    arena[old_id].effect = EffectTag::Deletion;
                    deletions.push(old_id);
                }
                element.map(|element| {
                    let mut fiber = Fiber::new(element.kind.clone(), element.props.clone());
                    fiber.parent = Some(wip);
                    fiber.effect = EffectTag::Placement;
                    arena.alloc(fiber)
                })
            }
        };

        if let Some(old_id) = old {
            old = arena[old_id].sibling;
        }

        if index == 0 {
            arena[wip].child = new_fiber;
        } else if let (Some(prev_id), Some(_)) = (prev, element) {
            arena[prev_id].sibling = new_fiber;
        }

        prev = new_fiber;
        index += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================
