//! Gesture commit, undo and redo
//!
//! One pick-drag-release interaction is the unit of undo. While a drag is in
//! progress each affected joint accumulates its accepted deltas; on release
//! the accumulator is committed to the undo stack as a single snapshot keyed
//! by the picked node's identity. Undo pops the snapshot, composes its
//! inverse back into the joint and restores the pre-gesture axis offsets;
//! redo replays it. Both stacks are strict LIFO and shared by the whole
//! scene, so interleaved gestures on different nodes unwind in reverse
//! order.

use log::debug;
use marionette_core::Transform;
use node::NodeKind;

use crate::{SceneGraph, SceneNodeId};

/// One committed gesture: the identity of the picked node, the composed
/// rotation the gesture applied to its governing joint, and the per-axis
/// degree sums needed to restore exact offsets.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GestureSnapshot {
    pub(crate) node: SceneNodeId,
    pub(crate) delta: Transform,
    pub(crate) degrees: (f64, f64),
}

impl SceneGraph {
    /// Commits the gesture in progress, if any.
    ///
    /// Called exactly once per drag, at pointer release, after all deltas
    /// have been applied. Every joint whose accumulator is non-empty and
    /// whose active child drove it contributes one snapshot; a release with
    /// no selection or no accepted motion pushes nothing. Committing a new
    /// gesture invalidates the redo history.
    pub fn end_gesture(&mut self) {
        let mut joints = Vec::new();
        let mut pending = vec![self.root()];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.get_node(id) {
                if node.kind.is_joint() {
                    joints.push(id);
                }
                pending.extend(node.children.iter().rev().copied());
            }
        }

        let mut pushed = 0;
        for joint_id in joints {
            let Some(joint) = self.get_node(joint_id) else {
                continue;
            };
            let active_child = joint.children.iter().copied().find(|&child_id| {
                self.get_node(child_id)
                    .map(|child| child.flags.active)
                    .unwrap_or(false)
            });

            let mut snapshot = None;
            if let Some(joint) = self.get_node_mut(joint_id) {
                if let NodeKind::Joint(state) = &mut joint.kind {
                    if state.gesture_in_progress() {
                        if let Some(child_id) = active_child {
                            snapshot = Some(GestureSnapshot {
                                node: child_id,
                                delta: state.gesture,
                                degrees: state.gesture_degrees,
                            });
                        }
                    }
                    // A stale accumulator with no surviving selection is
                    // abandoned rather than committed.
                    state.clear_gesture();
                }
            }
            if let Some(snapshot) = snapshot {
                debug!("end_gesture: committing gesture on {}", snapshot.node);
                self.undo_stack.push(snapshot);
                pushed += 1;
            }
        }

        if pushed > 0 {
            self.redo_stack.clear();
        }
    }

    /// Undoes the most recent committed gesture.
    ///
    /// Restores the governing joint's pre-gesture transform and axis
    /// offsets, and moves the snapshot to the redo stack. An empty stack is
    /// a silent no-op; a snapshot whose node has since been removed is
    /// dropped without effect. Returns whether a gesture was undone.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            debug!("undo: stack empty");
            return false;
        };

        let Some(joint_id) = self.get_node(snapshot.node).and_then(|node| node.parent) else {
            debug!("undo: dropping snapshot for dead node {}", snapshot.node);
            return false;
        };

        let mut handled = false;
        if let Some(joint) = self.get_node_mut(joint_id) {
            if let NodeKind::Joint(state) = &mut joint.kind {
                joint.local = joint.local.pre_mul(&snapshot.delta.inverted());
                state.x.shift(-snapshot.degrees.0);
                state.y.shift(-snapshot.degrees.1);
                handled = true;
            }
        }

        if handled {
            debug!("undo: unwound gesture on {}", snapshot.node);
            self.redo_stack.push(snapshot);
        }
        handled
    }

    /// Replays the most recently undone gesture.
    ///
    /// Symmetric to [`undo`](SceneGraph::undo): reapplies the snapshot's
    /// transform and degree sums and moves it back to the undo stack.
    /// Returns whether a gesture was replayed.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            debug!("redo: stack empty");
            return false;
        };

        let Some(joint_id) = self.get_node(snapshot.node).and_then(|node| node.parent) else {
            debug!("redo: dropping snapshot for dead node {}", snapshot.node);
            return false;
        };

        let mut handled = false;
        if let Some(joint) = self.get_node_mut(joint_id) {
            if let NodeKind::Joint(state) = &mut joint.kind {
                joint.local = joint.local.pre_mul(&snapshot.delta);
                state.x.shift(snapshot.degrees.0);
                state.y.shift(snapshot.degrees.1);
                handled = true;
            }
        }

        if handled {
            debug!("redo: replayed gesture on {}", snapshot.node);
            self.undo_stack.push(snapshot);
        }
        handled
    }

    /// Depth of the undo stack. Exposed for UI affordances (menu graying).
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Depth of the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
