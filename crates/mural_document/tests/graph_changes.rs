// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end change scenarios driven through the tracker's public API.

use mural_document::changes::{
    ConnectPropertiesChange, CreateNodeChange, DeleteNodeChange, DisconnectPropertyChange,
    NodePositionChange,
};
use mural_document::DocumentChangeTracker;
use mural_graph::{NodeId, PropertyHandle};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create(tracker: &mut DocumentChangeTracker, tag: &str) -> NodeId {
    let change = CreateNodeChange::new(tag, [0.0, 0.0]);
    let id = change.node_id();
    tracker.apply(change).unwrap();
    tracker.complete_packet();
    id
}

fn connect(tracker: &mut DocumentChangeTracker, from: (NodeId, &str), to: (NodeId, &str)) {
    tracker
        .apply(ConnectPropertiesChange::new(
            PropertyHandle::new(from.0, from.1),
            PropertyHandle::new(to.0, to.1),
        ))
        .unwrap();
    tracker.complete_packet();
}

#[test]
fn create_blur_then_undo_removes_it() {
    init_tracing();
    let mut tracker = DocumentChangeTracker::new();
    let before = tracker.document().node_count();

    let id = create(&mut tracker, "blur");
    assert!(tracker.document().has_node(id));

    tracker.undo().unwrap();
    assert!(!tracker.document().has_node(id));
    assert_eq!(tracker.document().node_count(), before);
}

#[test]
fn connect_then_disconnect_leaves_input_unconnected() {
    init_tracing();
    let mut tracker = DocumentChangeTracker::new();
    let a = create(&mut tracker, "merge");
    let b = create(&mut tracker, "output");
    let output = PropertyHandle::new(a, "output");
    let input = PropertyHandle::new(b, "background");

    let fan_out_before = tracker.document().graph().connections_from(&output).count();
    connect(&mut tracker, (a, "output"), (b, "background"));
    assert!(tracker.document().graph().connection_to(&input).is_some());

    tracker
        .apply(DisconnectPropertyChange::new(input.clone()))
        .unwrap();
    tracker.complete_packet();

    assert!(tracker.document().graph().connection_to(&input).is_none());
    assert_eq!(
        tracker.document().graph().connections_from(&output).count(),
        fan_out_before
    );
}

#[test]
fn deleting_pass_through_bridges_chain_and_undo_restores_it() {
    init_tracing();
    let mut tracker = DocumentChangeTracker::new();
    let a = create(&mut tracker, "merge");
    let b = create(&mut tracker, "blur");
    let c = create(&mut tracker, "output");
    connect(&mut tracker, (a, "output"), (b, "background"));
    connect(&mut tracker, (b, "output"), (c, "background"));

    tracker.apply(DeleteNodeChange::new(b)).unwrap();
    tracker.complete_packet();

    let into_c = PropertyHandle::new(c, "background");
    assert!(!tracker.document().has_node(b));
    assert_eq!(
        tracker.document().graph().connection_to(&into_c).unwrap().output.node,
        a
    );

    tracker.undo().unwrap();
    assert!(tracker.document().has_node(b));
    assert_eq!(
        tracker.document().graph().connection_to(&into_c).unwrap().output.node,
        b
    );
    assert_eq!(
        tracker
            .document()
            .graph()
            .connection_to(&PropertyHandle::new(b, "background"))
            .unwrap()
            .output
            .node,
        a
    );
}

#[test]
fn diamond_queue_orders_dependencies() {
    init_tracing();
    let mut tracker = DocumentChangeTracker::new();
    let a = create(&mut tracker, "zone_start");
    let b = create(&mut tracker, "blur");
    let c = create(&mut tracker, "blur");
    let d = create(&mut tracker, "merge");
    connect(&mut tracker, (a, "output"), (b, "background"));
    connect(&mut tracker, (a, "output"), (c, "background"));
    connect(&mut tracker, (b, "output"), (d, "background"));
    connect(&mut tracker, (c, "output"), (d, "foreground"));

    let queue = tracker.document().graph().execution_queue(d).unwrap();
    let pos = |id: NodeId| queue.iter().position(|n| *n == id).unwrap();
    assert_eq!(queue.len(), 4);
    assert!(pos(a) < pos(b));
    assert!(pos(a) < pos(c));
    assert!(pos(b) < pos(d));
    assert!(pos(c) < pos(d));
}

#[test]
fn consecutive_moves_merge_into_one_undo_entry() {
    init_tracing();
    let mut tracker = DocumentChangeTracker::new();
    let id = create(&mut tracker, "blur");

    tracker.apply(NodePositionChange::new(id, [30.0, 0.0])).unwrap();
    tracker.complete_packet();
    tracker.apply(NodePositionChange::new(id, [60.0, 0.0])).unwrap();
    tracker.complete_packet();

    tracker.undo().unwrap();
    assert_eq!(tracker.document().find_node(id).unwrap().position, [0.0, 0.0]);
    // Both moves collapsed into one entry; the next undo is the create
    tracker.undo().unwrap();
    assert!(!tracker.document().has_node(id));
}
