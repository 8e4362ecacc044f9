//! Runtime - the scheduler context driving one render pipeline.
//!
//! A [`Runtime`] owns everything the engine needs between yields: the
//! host backend, the fiber arena, the committed root, the
//! work-in-progress root, the next unit of work, and the deletion list
//! accumulated during the current build. It is created once per pipeline
//! and never duplicated: there is exactly one build in flight and one
//! committed tree at any time.
//!
//! # Control flow
//!
//! ```text
//! render() → work_loop() ─ yields between units ─ ... → commit_root()
//!    │            │                                         │
//!    wip root     one fiber per unit: create host node,     effects applied,
//!    + baseline   reconcile children, pick next fiber       wip becomes current
//! ```
//!
//! `work_loop` is the idle-callback body: the embedding host invokes it
//! once per idle slice with a [`Deadline`], re-invoking while it reports
//! [`WorkStatus::Pending`]. [`Runtime::run_until_idle`] is the pull-style
//! driver for hosts without a real idle callback.

mod commit;

use std::time::Duration;

use crate::fiber::{EffectTag, Fiber, FiberArena, FiberId};
use crate::host::{HostBackend, HostError};
use crate::node::{Props, VNode};
use crate::reconcile::reconcile_children;
use crate::schedule::{Deadline, TimeSlice};

/// Type tag of the synthetic root fiber. Never passed to the host: the
/// root's host node is the caller's container.
const ROOT_NODE: &str = "#root";

// =============================================================================
// Work status
// =============================================================================

/// Outcome of one work-loop invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkStatus {
    /// Everything committed; nothing left to do.
    Idle,
    /// The slice budget ran out with work remaining: invoke again on the
    /// next idle slice.
    Pending,
}

// =============================================================================
// Runtime
// =============================================================================

/// Scheduler context owning one render pipeline.
pub struct Runtime<H: HostBackend> {
    host: H,
    fibers: FiberArena<H::Node>,
    current_root: Option<FiberId>,
    wip_root: Option<FiberId>,
    next_unit: Option<FiberId>,
    deletions: Vec<FiberId>,
}

impl<H: HostBackend> Runtime<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            fibers: FiberArena::new(),
            current_root: None,
            wip_root: None,
            next_unit: None,
            deletions: Vec::new(),
        }
    }

    /// The host backend, for dispatching events or presenting output.
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether an uncommitted build or unprocessed work remains.
    pub fn has_pending_work(&self) -> bool {
        self.next_unit.is_some() || self.wip_root.is_some()
    }

    /// Number of live fiber records across both generations.
    pub fn fiber_count(&self) -> usize {
        self.fibers.live_count()
    }

    // =========================================================================
    // Render entry point
    // =========================================================================

    /// Request that `node` be rendered into `container`.
    ///
    /// Builds a fresh work-in-progress root with the committed root as its
    /// diff baseline and points the work loop at it. Does not block:
    /// completion is observed only through the commit's host mutations.
    ///
    /// Calling again before the previous build commits supersedes it: the
    /// abandoned generation's fibers are released and its pending deletion
    /// tags reset, so nothing from it can reach a later commit.
    pub fn render(&mut self, node: VNode, container: H::Node) {
        if let Some(stale) = self.wip_root.take() {
            log::debug!("superseding uncommitted render");
            for id in self.deletions.drain(..) {
                if let Some(fiber) = self.fibers.get_mut(id) {
                    fiber.effect = EffectTag::None;
                }
            }
            self.fibers.release_subtree(stale);
        }
        self.deletions.clear();

        let mut props = Props::new();
        props.set_children(vec![node]);

        let mut root = Fiber::new(ROOT_NODE, props);
        root.host = Some(container);
        root.alternate = self.current_root;

        let root = self.fibers.alloc(root);
        self.wip_root = Some(root);
        self.next_unit = Some(root);
    }

    // =========================================================================
    // Work loop
    // =========================================================================

    /// Process units of work until the slice expires or the build is done,
    /// committing when no work remains.
    ///
    /// Yields only between units; a unit is never preempted internally. On
    /// a host error the tick aborts with `next_unit` still pointing at the
    /// failed fiber and the generation left uncommitted.
    pub fn work_loop(&mut self, deadline: &impl Deadline) -> Result<WorkStatus, HostError> {
        while let Some(unit) = self.next_unit {
            if deadline.should_yield() {
                return Ok(WorkStatus::Pending);
            }
            self.next_unit = self.perform_unit_of_work(unit)?;
        }

        if self.wip_root.is_some() {
            self.commit_root()?;
        }
        Ok(WorkStatus::Idle)
    }

    /// Drive the work loop with fixed time slices until it goes idle.
    ///
    /// Stand-in for a host idle callback: each iteration models one idle
    /// slice of `slice` length.
    pub fn run_until_idle(&mut self, slice: Duration) -> Result<(), HostError> {
        loop {
            match self.work_loop(&TimeSlice::new(slice))? {
                WorkStatus::Idle => return Ok(()),
                WorkStatus::Pending => {}
            }
        }
    }

    /// One unit of work: materialize the fiber's host node, reconcile its
    /// children, and pick the next fiber to visit.
    fn perform_unit_of_work(&mut self, unit: FiberId) -> Result<Option<FiberId>, HostError> {
        if self.fibers[unit].host.is_none() {
            let node = self
                .host
                .create_node(&self.fibers[unit].kind, &self.fibers[unit].props)?;
            self.fibers[unit].host = Some(node);
        }

        let elements = self.fibers[unit].children().to_vec();
        reconcile_children(&mut self.fibers, unit, &elements, &mut self.deletions);
        log::trace!("unit of work: {} ({} children)", self.fibers[unit].kind, elements.len());

        // Depth first: child, then sibling, then siblings of ancestors.
        if let Some(child) = self.fibers[unit].child {
            return Ok(Some(child));
        }
        let mut cursor = Some(unit);
        while let Some(id) = cursor {
            if let Some(sibling) = self.fibers[id].sibling {
                return Ok(Some(sibling));
            }
            cursor = self.fibers[id].parent;
        }
        Ok(None)
    }
}

// =============================================================================
// Tests
// =============================================================================
