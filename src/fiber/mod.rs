//! Fiber Tree - the mutable work representation.
//!
//! One fiber exists per rendered virtual node per generation. Fibers are
//! records in an arena ([`FiberArena`]) and link to each other by index:
//! first-child / next-sibling / parent for the tree itself, plus a
//! non-owning `alternate` back reference to the fiber that held the same
//! tree position in the previously committed generation.
//!
//! ```text
//! current (committed)          work-in-progress
//!      root  ◄──alternate────────  root'
//!       │                           │
//!      div   ◄──alternate────────  div'   (Update: host reused)
//!       │                           │
//!     #text  ◄──alternate──────── #text'  (Update)
//! ```
//!
//! Alternates are lookup-only and never mutated after creation; they are
//! cleared at commit when the old generation is released.

mod arena;

pub use arena::{FiberArena, FiberId};

use crate::node::Props;
use crate::node::VNode;

// =============================================================================
// Effect tags
// =============================================================================

/// Mutation a fiber requires at commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EffectTag {
    /// No host mutation (the synthetic root).
    #[default]
    None,
    /// New node: append its host node under the nearest ancestor's.
    Placement,
    /// Kept node: apply the property delta against its alternate.
    Update,
    /// Dropped node: remove its host subtree. Lives only in the deletion
    /// list, never in the new tree.
    Deletion,
}

// =============================================================================
// Fiber
// =============================================================================

/// Mutable work-tree record for one virtual node in one generation.
///
/// `N` is the host binding's node handle type. The handle is owned by the
/// fiber (created lazily, absent until the fiber is first worked); links
/// are arena indices, so ownership of the tree is structural.
pub struct Fiber<N> {
    /// Type tag copied from the producing virtual node.
    pub kind: String,
    /// Properties copied from the producing virtual node.
    pub props: Props,
    /// Owned host-node reference. `None` until lazily created.
    pub host: Option<N>,
    pub parent: Option<FiberId>,
    pub child: Option<FiberId>,
    pub sibling: Option<FiberId>,
    /// Same tree position in the prior generation. Lookup only.
    pub alternate: Option<FiberId>,
    pub effect: EffectTag,
}

impl<N> Fiber<N> {
    /// Unlinked fiber with no host node and no effect.
    pub fn new(kind: impl Into<String>, props: Props) -> Self {
        Self {
            kind: kind.into(),
            props,
            host: None,
            parent: None,
            child: None,
            sibling: None,
            alternate: None,
            effect: EffectTag::None,
        }
    }

    /// The virtual children this fiber's props carry.
    pub fn children(&self) -> &[VNode] {
        self.props.children()
    }
}
