//! Pick resolution and joint dragging
//!
//! The renderer performs the actual hit test: during a picking traversal it
//! tags each geometry draw with the node's identity and reports back a list
//! of [`PickHit`] candidates with depth bounds. This module turns that list
//! into a single selection and applies drag deltas to the joints that govern
//! the selected part.

use log::debug;
use marionette_core::{Axis, Transform};
use node::NodeKind;

use crate::{SceneGraph, SceneNodeId};

/// One hit-test candidate reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Identity the draw call was tagged with.
    pub id: SceneNodeId,
    /// Depth of the nearest intersection with the tagged geometry.
    pub near: f64,
    /// Depth of the farthest intersection.
    pub far: f64,
}

impl PickHit {
    pub fn new(id: SceneNodeId, near: f64, far: f64) -> Self {
        Self { id, near, far }
    }
}

impl SceneGraph {
    /// Selects the nearest live candidate from a hit list.
    ///
    /// The minimum near-depth wins; ties keep the first candidate
    /// encountered. Identities that do not name a live node are skipped: the
    /// hit buffer is produced outside the graph and is not trusted. An empty
    /// list resolves to no selection.
    pub fn resolve_pick(&self, hits: &[PickHit]) -> Option<SceneNodeId> {
        let mut best: Option<(SceneNodeId, f64)> = None;

        for hit in hits {
            if !self.nodes.contains_key(hit.id) {
                debug!("resolve_pick: skipping dead id {}", hit.id);
                continue;
            }
            match best {
                Some((_, depth)) if hit.near >= depth => {}
                _ => best = Some((hit.id, hit.near)),
            }
        }

        debug!(
            "resolve_pick: {} hit(s) -> {:?}",
            hits.len(),
            best.map(|(id, _)| id.as_u64())
        );
        best.map(|(id, _)| id)
    }

    /// Marks exactly the picked node active and every other node inactive,
    /// clearing the per-pick `moved` flag everywhere. `None` clears the
    /// selection. Visits each node exactly once.
    pub fn apply_pick(&mut self, picked: Option<SceneNodeId>) {
        for (id, node) in self.nodes.iter_mut() {
            node.flags.active = picked == Some(id);
            node.flags.moved = false;
        }
    }

    /// Applies a drag delta, in screen pixels, to the joints controlling the
    /// active node.
    ///
    /// At every joint whose direct child is active, the horizontal delta is
    /// attempted on the first axis (rotation about X) and the vertical delta
    /// on the second (rotation about Z), each converted to degrees through
    /// the drag divisor. The two attempts accept or reject independently
    /// against the axis bounds; a rejected attempt leaves that axis exactly
    /// where it was. Accepted deltas pre-multiply the joint's current
    /// transform and accumulate in its gesture state, and mark the active
    /// child moved. The delta is forwarded through the whole tree regardless
    /// of acceptance.
    pub fn drag(&mut self, dx_pixels: f64, dy_pixels: f64) {
        let dx_degrees = dx_pixels / self.drag_divisor;
        let dy_degrees = dy_pixels / self.drag_divisor;
        self.drag_from(self.root(), dx_degrees, dy_degrees);
    }

    fn drag_from(&mut self, node_id: SceneNodeId, dx_degrees: f64, dy_degrees: f64) {
        let Some(node) = self.get_node(node_id) else {
            return;
        };
        let children: Vec<SceneNodeId> = node.children.clone();
        let is_joint = node.kind.is_joint();

        if is_joint {
            for &child_id in &children {
                let child_active = self
                    .get_node(child_id)
                    .map(|child| child.flags.active)
                    .unwrap_or(false);
                if !child_active {
                    continue;
                }
                if self.apply_joint_delta(node_id, dx_degrees, dy_degrees) {
                    if let Some(child) = self.get_node_mut(child_id) {
                        child.flags.moved = true;
                    }
                }
            }
        }

        for child_id in children {
            self.drag_from(child_id, dx_degrees, dy_degrees);
        }
    }

    /// Attempts both axes on one joint; returns whether anything moved.
    fn apply_joint_delta(&mut self, joint_id: SceneNodeId, dx_degrees: f64, dy_degrees: f64) -> bool {
        let Some(joint) = self.get_node_mut(joint_id) else {
            return false;
        };
        let NodeKind::Joint(state) = &mut joint.kind else {
            return false;
        };

        let mut moved = false;

        if state.x.try_apply(dx_degrees) {
            let rotation = Transform::rotation(Axis::X, dx_degrees);
            joint.local = joint.local.pre_mul(&rotation);
            state.gesture = state.gesture.pre_mul(&rotation);
            state.gesture_degrees.0 += dx_degrees;
            moved = true;
        }

        if state.y.try_apply(dy_degrees) {
            let rotation = Transform::rotation(Axis::Z, dy_degrees);
            joint.local = joint.local.pre_mul(&rotation);
            state.gesture = state.gesture.pre_mul(&rotation);
            state.gesture_degrees.1 += dy_degrees;
            moved = true;
        }

        moved
    }
}
