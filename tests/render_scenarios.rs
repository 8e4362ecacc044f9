//! End-to-end render scenarios through the recording host.
//!
//! Each test drives the full pipeline (render, cooperative work loop,
//! commit) and asserts against the host's materialized tree and its
//! operation log.

use std::cell::Cell;
use std::rc::Rc;

use ember_ui::host::{HostOp, RecordingHost};
use ember_ui::{
    NODE_VALUE, PropValue, Props, Runtime, Unbounded, UnitBudget, VNode, WorkStatus, create_node,
};

fn greeting(text: &str) -> VNode {
    create_node("div", Props::new(), vec![text.into()])
}

fn drain(runtime: &mut Runtime<RecordingHost>) {
    runtime.work_loop(&Unbounded).unwrap();
}

#[test]
fn first_render_builds_the_host_tree() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(greeting("hi"), container);
    drain(&mut runtime);

    let host = runtime.host();
    assert_eq!(host.children(container).len(), 1);
    let div = host.children(container)[0];
    assert_eq!(host.node(div).kind, "div");
    assert_eq!(host.children(div).len(), 1);
    let text = host.children(div)[0];
    assert_eq!(host.node(text).kind, "#text");
    assert_eq!(host.attribute(text, NODE_VALUE), Some("hi"));
}

#[test]
fn text_change_updates_in_place() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(greeting("hi"), container);
    drain(&mut runtime);
    runtime.host_mut().take_ops();

    runtime.render(greeting("bye"), container);
    drain(&mut runtime);

    let host = runtime.host();
    // Exactly one mutation: the text attribute flipping to "bye".
    let mutations: Vec<&HostOp> = host.ops().iter().filter(|op| op.is_mutation()).collect();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(
        mutations[0],
        HostOp::SetAttribute { name, value, .. } if name == NODE_VALUE && value == "bye"
    ));
    assert_eq!(host.created_count(), 0);

    let div = host.children(container)[0];
    let text = host.children(div)[0];
    assert_eq!(host.attribute(text, NODE_VALUE), Some("bye"));
}

#[test]
fn idempotent_rerender_produces_no_mutations() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    let tree = create_node(
        "div",
        Props::new().with("class", "title"),
        vec![greeting("hi").into(), "steady".into()],
    );

    runtime.render(tree.clone(), container);
    drain(&mut runtime);
    runtime.host_mut().take_ops();

    runtime.render(tree, container);
    drain(&mut runtime);

    assert!(runtime.host().ops().is_empty());
}

#[test]
fn kind_change_remounts_delete_then_place() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(VNode::new("a", Props::new()), container);
    drain(&mut runtime);
    let a = runtime.host().children(container)[0];
    runtime.host_mut().take_ops();

    runtime.render(VNode::new("b", Props::new()), container);
    drain(&mut runtime);

    let host = runtime.host();
    let removals: Vec<&HostOp> = host
        .ops()
        .iter()
        .filter(|op| matches!(op, HostOp::RemoveChild { .. }))
        .collect();
    assert_eq!(removals.len(), 1);
    assert!(matches!(
        removals[0],
        HostOp::RemoveChild { child, .. } if *child == a
    ));

    // One new node, removed before the replacement is appended.
    assert_eq!(host.created_count(), 1);
    let remove_at = host
        .ops()
        .iter()
        .position(|op| matches!(op, HostOp::RemoveChild { .. }))
        .unwrap();
    let append_at = host
        .ops()
        .iter()
        .position(|op| matches!(op, HostOp::AppendChild { .. }))
        .unwrap();
    assert!(remove_at < append_at);

    assert_eq!(host.children(container).len(), 1);
    assert_eq!(host.node(host.children(container)[0]).kind, "b");
}

#[test]
fn shrinking_child_list_deletes_the_tail() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    let three = create_node(
        "ul",
        Props::new(),
        vec![
            VNode::new("li", Props::new()).into(),
            VNode::new("li", Props::new()).into(),
            VNode::new("li", Props::new()).into(),
        ],
    );
    runtime.render(three, container);
    drain(&mut runtime);
    runtime.host_mut().take_ops();

    let one = create_node("ul", Props::new(), vec![VNode::new("li", Props::new()).into()]);
    runtime.render(one, container);
    drain(&mut runtime);

    let host = runtime.host();
    let removals = host
        .ops()
        .iter()
        .filter(|op| matches!(op, HostOp::RemoveChild { .. }))
        .count();
    assert_eq!(removals, 2);

    let ul = host.children(container)[0];
    assert_eq!(host.children(ul).len(), 1);
}

#[test]
fn handler_replacement_detaches_old_then_attaches_new() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    let first_hits = Rc::new(Cell::new(0));
    let second_hits = Rc::new(Cell::new(0));

    let seen = first_hits.clone();
    let f1 = PropValue::handler(move |_| seen.set(seen.get() + 1));
    let seen = second_hits.clone();
    let f2 = PropValue::handler(move |_| seen.set(seen.get() + 1));

    runtime.render(
        VNode::new("button", Props::new().with("onClick", f1)),
        container,
    );
    drain(&mut runtime);
    let button = runtime.host().children(container)[0];
    runtime.host_mut().take_ops();

    runtime.render(
        VNode::new("button", Props::new().with("onClick", f2)),
        container,
    );
    drain(&mut runtime);

    let host = runtime.host();
    let mutations: Vec<&HostOp> = host.ops().iter().filter(|op| op.is_mutation()).collect();
    assert_eq!(mutations.len(), 2);
    assert!(matches!(
        mutations[0],
        HostOp::DetachHandler { event, .. } if event == "click"
    ));
    assert!(matches!(
        mutations[1],
        HostOp::AttachHandler { event, .. } if event == "click"
    ));

    // Only the new handler fires after commit.
    host.dispatch(button, "click", &());
    assert_eq!(first_hits.get(), 0);
    assert_eq!(second_hits.get(), 1);
}

#[test]
fn host_mutations_are_batched_until_commit() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(greeting("hi"), container);

    // Partway through the build: nodes may exist, but nothing is wired
    // into the container yet.
    let status = runtime.work_loop(&UnitBudget::new(2)).unwrap();
    assert_eq!(status, WorkStatus::Pending);
    assert!(runtime.host().children(container).is_empty());
    assert!(runtime.host().ops().iter().all(|op| !op.is_mutation()));

    drain(&mut runtime);
    assert_eq!(runtime.host().children(container).len(), 1);
}

#[test]
fn attribute_removal_clears_the_host_attribute() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(
        VNode::new("div", Props::new().with("class", "a").with("id", "x")),
        container,
    );
    drain(&mut runtime);
    let div = runtime.host().children(container)[0];
    runtime.host_mut().take_ops();

    runtime.render(VNode::new("div", Props::new().with("class", "a")), container);
    drain(&mut runtime);

    let host = runtime.host();
    let mutations: Vec<&HostOp> = host.ops().iter().filter(|op| op.is_mutation()).collect();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(
        mutations[0],
        HostOp::RemoveAttribute { name, .. } if name == "id"
    ));
    assert_eq!(host.attribute(div, "id"), None);
    assert_eq!(host.attribute(div, "class"), Some("a"));
}

#[test]
fn superseding_render_wins_and_leaks_nothing_into_commit() {
    let mut runtime = Runtime::new(RecordingHost::new());
    let container = runtime.host_mut().container();

    runtime.render(greeting("first"), container);
    drain(&mut runtime);
    runtime.host_mut().take_ops();

    // Start replacing with a tree that would delete the text child, but
    // abandon that build partway through.
    runtime.render(VNode::new("div", Props::new()), container);
    runtime.work_loop(&UnitBudget::new(1)).unwrap();

    runtime.render(greeting("second"), container);
    drain(&mut runtime);

    let host = runtime.host();
    // No deletion from the abandoned build may reach the commit.
    assert!(host
        .ops()
        .iter()
        .all(|op| !matches!(op, HostOp::RemoveChild { .. })));

    let div = host.children(container)[0];
    let text = host.children(div)[0];
    assert_eq!(host.attribute(text, NODE_VALUE), Some("second"));

    // Two generations at most: the committed tree is root + div + text.
    assert_eq!(runtime.fiber_count(), 3);
}

#[test]
fn rejected_kind_leaves_generation_uncommitted() {
    let mut runtime = Runtime::new(RecordingHost::new());
    runtime.host_mut().reject_kind("canvas");
    let container = runtime.host_mut().container();

    runtime.render(greeting("ok"), container);
    drain(&mut runtime);
    runtime.host_mut().take_ops();

    runtime.render(
        create_node("canvas", Props::new(), vec!["never".into()]),
        container,
    );
    assert!(runtime.work_loop(&Unbounded).is_err());

    // The committed tree is untouched.
    let host = runtime.host();
    assert!(host.ops().iter().all(|op| !op.is_mutation()));
    let div = host.children(container)[0];
    let text = host.children(div)[0];
    assert_eq!(host.attribute(text, NODE_VALUE), Some("ok"));
}
