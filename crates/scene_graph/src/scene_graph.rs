//! # Scene Graph System
//!
//! The scene graph is the interaction core of Marionette: a hierarchical
//! tree of transform-carrying nodes supporting screen-space pick resolution,
//! bounded joint manipulation, and gesture-granular undo/redo.
//!
//! ## Key Concepts
//!
//! - **Arena storage**: every node lives in a single slotmap keyed by
//!   [`SceneNodeId`]; parent "ownership" of children is expressed through the
//!   arena, so teardown is a plain recursive removal with no manual lifetime
//!   management.
//! - **Identity**: the arena key doubles as the node's stable identity. It is
//!   assigned at insertion, never reused (slotmap versioning), and is the
//!   sole key for pick resolution and undo/redo bookkeeping.
//! - **Explicit transform accumulation**: traversal passes the composed
//!   world transform down the recursion instead of leaning on an external
//!   matrix stack, so sibling subtrees can never observe each other's state.
//! - **Gestures**: one pick-drag-release interaction is the unit of undo.
//!   The two snapshot stacks live here, owned exclusively by the graph.
//!
//! Rendering and hit testing are external collaborators: the graph hands the
//! renderer identities, kinds, flags and world transforms during [`walk`],
//! and consumes the hit list the renderer produced in
//! [`resolve_pick`](SceneGraph::resolve_pick).
//!
//! [`walk`]: SceneGraph::walk

mod gesture;
pub mod pick;
pub mod scene_node;

use glam::DVec3;
use marionette_core::{Axis, Transform, DEFAULT_DRAG_DIVISOR};
use node::{JointAxis, NodeKind};
use slotmap::{KeyData, SlotMap};
use std::fmt::{self, Display};

use gesture::GestureSnapshot;
pub use pick::PickHit;
pub use scene_node::SceneNode;

slotmap::new_key_type! {
/// Unique, never-reused identifier for nodes within the scene graph.
    pub struct SceneNodeId;
}

impl From<u64> for SceneNodeId {
    fn from(value: u64) -> Self {
        Self(KeyData::from_ffi(value))
    }
}

impl SceneNodeId {
    /// Converts this id to a [u64], the form the renderer tags picking draw
    /// calls with and the hit-test provider reports back.
    pub fn as_u64(self) -> u64 {
        self.0.as_ffi()
    }
}

impl Display for SceneNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// SceneGraph owns the node hierarchy and drives every interaction on it.
///
/// The graph is single-threaded and event-driven: one gesture (pick, drag,
/// release) fully resolves before the next event is processed, and the
/// undo/redo stacks are touched by nothing outside the call in progress.
pub struct SceneGraph {
    /// The root node, a plain group created with the graph.
    root: SceneNodeId,

    /// Storage for all scene nodes, indexed by their IDs.
    nodes: SlotMap<SceneNodeId, SceneNode>,

    /// Committed gestures, most recent on top.
    pub(crate) undo_stack: Vec<GestureSnapshot>,

    /// Undone gestures available for replay, most recent on top.
    pub(crate) redo_stack: Vec<GestureSnapshot>,

    /// Screen-pixels-per-degree conversion applied to drag deltas.
    pub(crate) drag_divisor: f64,
}

impl SceneGraph {
    /// Creates a new scene graph containing only a root group node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(None, "root".to_string(), NodeKind::Group));

        Self {
            root,
            nodes,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            drag_divisor: DEFAULT_DRAG_DIVISOR,
        }
    }

    /// Returns the ID of the root node.
    pub fn root(&self) -> SceneNodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a reference to a node by its ID.
    pub fn get_node(&self, node_id: SceneNodeId) -> Option<&SceneNode> {
        self.nodes.get(node_id)
    }

    pub(crate) fn get_node_mut(&mut self, node_id: SceneNodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(node_id)
    }

    /// Overrides the drag sensitivity divisor (pixels per degree).
    pub fn set_drag_divisor(&mut self, divisor: f64) {
        self.drag_divisor = divisor;
    }

    /// Creates a new node as a child of `parent_id` (the root when `None`).
    pub fn create_node(
        &mut self,
        parent_id: Option<SceneNodeId>,
        name: impl Into<String>,
        kind: NodeKind,
    ) -> SceneNodeId {
        let parent_id = parent_id.unwrap_or(self.root);

        let node_id = self
            .nodes
            .insert(SceneNode::new(Some(parent_id), name.into(), kind));

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(node_id);
        }

        node_id
    }

    /// Moves an existing node under another parent.
    ///
    /// Returns false when either node is dead or when the move would create
    /// a cycle; the hierarchy is untouched in that case.
    pub fn add_child(&mut self, parent_id: SceneNodeId, child_id: SceneNodeId) -> bool {
        if !self.nodes.contains_key(parent_id) || !self.nodes.contains_key(child_id) {
            return false;
        }

        if self.is_ancestor(child_id, parent_id) {
            return false;
        }

        if let Some(old_parent_id) = self.nodes.get(child_id).and_then(|node| node.parent) {
            if let Some(old_parent) = self.nodes.get_mut(old_parent_id) {
                old_parent.children.retain(|&id| id != child_id);
            }
        }

        if let Some(child) = self.nodes.get_mut(child_id) {
            child.parent = Some(parent_id);
        }

        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(child_id);
        }

        true
    }

    /// Removes a node and all its descendants. The root cannot be removed.
    ///
    /// Snapshots on the undo/redo stacks that reference removed nodes are
    /// left in place; they are dropped silently when popped.
    pub fn remove_node(&mut self, node_id: SceneNodeId) -> bool {
        if node_id == self.root || !self.nodes.contains_key(node_id) {
            return false;
        }

        if let Some(parent_id) = self.nodes.get(node_id).and_then(|node| node.parent) {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.retain(|&id| id != node_id);
            }
        }

        let mut pending = vec![node_id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.remove(id) {
                pending.extend(node.children);
            }
        }

        true
    }

    /// Clears all nodes except a fresh root, and empties both gesture stacks.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.root = self
            .nodes
            .insert(SceneNode::new(None, "root".to_string(), NodeKind::Group));
    }

    /// Configures the two rotational axes of a joint node. Returns false for
    /// dead ids and non-joint nodes.
    pub fn set_joint_axes(&mut self, node_id: SceneNodeId, x: JointAxis, y: JointAxis) -> bool {
        match self.nodes.get_mut(node_id).map(|node| &mut node.kind) {
            Some(NodeKind::Joint(state)) => {
                state.x = x;
                state.y = y;
                state.clear_gesture();
                true
            }
            _ => false,
        }
    }

    /// Authored rotation of `degrees` about `axis`, composed on the right of
    /// both the initial and the current transform so that resets keep it.
    pub fn rotate(&mut self, node_id: SceneNodeId, axis: Axis, degrees: f64) {
        self.apply_authored(node_id, Transform::rotation(axis, degrees));
    }

    /// Authored non-uniform scale. A zero factor is accepted but produces a
    /// singular transform; avoiding it is the caller's responsibility.
    pub fn scale(&mut self, node_id: SceneNodeId, factors: DVec3) {
        self.apply_authored(node_id, Transform::scaling(factors));
    }

    /// Authored translation.
    pub fn translate(&mut self, node_id: SceneNodeId, amount: DVec3) {
        self.apply_authored(node_id, Transform::translation(amount));
    }

    /// Session-only translation: moves the current transform without
    /// touching the authored pose. Used for free-dragging the whole model;
    /// `reset_to_origin` discards it.
    pub fn translate_free(&mut self, node_id: SceneNodeId, amount: DVec3) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.local = node.local.post_mul(&Transform::translation(amount));
        }
    }

    fn apply_authored(&mut self, node_id: SceneNodeId, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.initial = node.initial.post_mul(&transform);
            node.local = node.local.post_mul(&transform);
        }
    }

    /// Restores this node's current transform to its authored pose. Children
    /// are untouched.
    pub fn reset_to_origin(&mut self, node_id: SceneNodeId) {
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.local = node.initial;
        }
    }

    /// Restores this node and every descendant to their own authored poses,
    /// depth-first. Leaf nodes are reset like any other.
    pub fn reset_orientation(&mut self, node_id: SceneNodeId) {
        let mut pending = vec![node_id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.local = node.initial;
                pending.extend(node.children.iter().copied());
            }
        }
    }

    /// Depth-first pre-order traversal from the root.
    ///
    /// The visitor receives each node's identity, the node itself, the world
    /// transform composed down from the root (the node's own local transform
    /// included), and the `picking` flag the renderer uses to decide between
    /// an identity-tagged pass and a shaded pass. The accumulated transform
    /// is a call argument, not shared state, so a subtree's composition can
    /// never leak into a sibling's.
    pub fn walk<F>(&self, picking: bool, visitor: &mut F)
    where
        F: FnMut(SceneNodeId, &SceneNode, &Transform, bool),
    {
        self.walk_from(self.root, &Transform::IDENTITY, picking, visitor);
    }

    fn walk_from<F>(
        &self,
        node_id: SceneNodeId,
        parent_world: &Transform,
        picking: bool,
        visitor: &mut F,
    ) where
        F: FnMut(SceneNodeId, &SceneNode, &Transform, bool),
    {
        let Some(node) = self.nodes.get(node_id) else {
            return;
        };

        let world = parent_world.post_mul(&node.local);
        visitor(node_id, node, &world, picking);

        for &child in &node.children {
            self.walk_from(child, &world, picking, visitor);
        }
    }

    /// Composes the world transform of a single node by walking the parent
    /// chain upward.
    pub fn world_transform(&self, node_id: SceneNodeId) -> Transform {
        let Some(node) = self.nodes.get(node_id) else {
            return Transform::IDENTITY;
        };

        match node.parent {
            Some(parent_id) => self.world_transform(parent_id).post_mul(&node.local),
            None => node.local,
        }
    }

    /// Determines if a node is an ancestor of another node in the hierarchy.
    ///
    /// Used to reject reparenting operations that would create a cycle,
    /// which would otherwise hang every traversal. Iterative rather than
    /// recursive so hierarchy depth is not bounded by stack size.
    fn is_ancestor(&self, node_id: SceneNodeId, descendant_id: SceneNodeId) -> bool {
        let mut current = Some(descendant_id);
        while let Some(id) = current {
            if id == node_id {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        false
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::DMat4;

    fn assert_transform_eq(a: &Transform, b: &Transform) {
        for (x, y) in a
            .matrix()
            .to_cols_array()
            .iter()
            .zip(b.matrix().to_cols_array().iter())
        {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_scene_graph_creation() {
        let graph = SceneGraph::new();

        // The graph should have a root node with no parent and no children.
        let root = graph.get_node(graph.root()).unwrap();
        assert!(root.parent().is_none());
        assert!(root.children().is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_create_node() {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        // No explicit parent means the root adopts the node.
        let torso = graph.create_node(None, "torso", NodeKind::Group);
        let neck = graph.create_node(Some(torso), "neck", NodeKind::Group);

        assert_eq!(graph.get_node(torso).unwrap().parent(), Some(root));
        assert_eq!(graph.get_node(neck).unwrap().parent(), Some(torso));
        assert!(graph.get_node(root).unwrap().children().contains(&torso));
        assert!(graph.get_node(torso).unwrap().children().contains(&neck));
        assert_eq!(graph.get_node(neck).unwrap().name(), "neck");
    }

    #[test]
    fn test_add_child_reparents() {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(None, "b", NodeKind::Group);

        assert!(graph.add_child(a, b));

        assert!(!graph.get_node(root).unwrap().children().contains(&b));
        assert!(graph.get_node(a).unwrap().children().contains(&b));
        assert_eq!(graph.get_node(b).unwrap().parent(), Some(a));
    }

    #[test]
    fn test_cannot_create_cycle() {
        let mut graph = SceneGraph::new();

        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(Some(a), "b", NodeKind::Group);
        let c = graph.create_node(Some(b), "c", NodeKind::Group);

        assert!(!graph.add_child(c, a));

        assert_eq!(graph.get_node(a).unwrap().parent(), Some(graph.root()));
        assert_eq!(graph.get_node(b).unwrap().parent(), Some(a));
        assert_eq!(graph.get_node(c).unwrap().parent(), Some(b));
    }

    #[test]
    fn test_remove_node_is_recursive() {
        let mut graph = SceneGraph::new();
        let root = graph.root();

        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(Some(a), "b", NodeKind::Group);

        assert!(graph.remove_node(a));

        assert!(!graph.get_node(root).unwrap().children().contains(&a));
        assert!(graph.get_node(a).is_none());
        assert!(graph.get_node(b).is_none());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut graph = SceneGraph::new();
        assert!(!graph.remove_node(graph.root()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut graph = SceneGraph::new();
        graph.create_node(None, "a", NodeKind::Group);
        graph.clear();

        assert_eq!(graph.len(), 1);
        assert!(graph.get_node(graph.root()).unwrap().children().is_empty());
    }

    #[test]
    fn test_authored_edits_track_initial() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);

        graph.rotate(a, Axis::Y, 45.0);
        graph.translate(a, DVec3::new(1.0, 2.0, 3.0));
        graph.scale(a, DVec3::new(2.0, 2.0, 2.0));

        let node = graph.get_node(a).unwrap();
        assert_transform_eq(node.local(), node.initial());
    }

    #[test]
    fn test_reset_to_origin_discards_session_state() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);

        // Authored pose.
        graph.rotate(a, Axis::X, 30.0);
        graph.translate(a, DVec3::new(0.0, 1.0, 0.0));
        let authored = *graph.get_node(a).unwrap().local();

        // Session-only motion diverges the current transform.
        graph.translate_free(a, DVec3::new(9.0, 9.0, 9.0));
        assert_ne!(graph.get_node(a).unwrap().local(), &authored);

        graph.reset_to_origin(a);
        assert_transform_eq(graph.get_node(a).unwrap().local(), &authored);
    }

    #[test]
    fn test_reset_orientation_restores_whole_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(Some(a), "b", NodeKind::Group);
        let c = graph.create_node(Some(b), "c", NodeKind::Group);

        for &id in &[a, b, c] {
            graph.rotate(id, Axis::Z, 10.0);
        }
        for &id in &[a, b, c] {
            graph.translate_free(id, DVec3::new(1.0, 0.0, 0.0));
        }

        graph.reset_orientation(graph.root());

        // Every node, the childless leaf included, returns to its own pose.
        for &id in &[a, b, c] {
            let node = graph.get_node(id).unwrap();
            assert_transform_eq(node.local(), node.initial());
        }
    }

    #[test]
    fn test_walk_composes_world_transforms() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(Some(a), "b", NodeKind::Group);

        graph.translate(a, DVec3::new(1.0, 0.0, 0.0));
        graph.translate(b, DVec3::new(0.0, 2.0, 0.0));

        let mut worlds = Vec::new();
        graph.walk(false, &mut |id, _node, world, picking| {
            assert!(!picking);
            worlds.push((id, world.apply_point(DVec3::ZERO)));
        });

        // Pre-order: root, a, b.
        assert_eq!(worlds[0].0, graph.root());
        assert_eq!(worlds[1].0, a);
        assert_eq!(worlds[2].0, b);
        assert_relative_eq!(worlds[1].1.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(worlds[2].1.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(worlds[2].1.y, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sibling_subtrees_are_isolated() {
        let mut graph = SceneGraph::new();
        let left = graph.create_node(None, "left", NodeKind::Group);
        let right = graph.create_node(None, "right", NodeKind::Group);
        graph.translate(left, DVec3::new(5.0, 0.0, 0.0));

        let mut right_origin = DVec3::ZERO;
        graph.walk(false, &mut |id, _node, world, _| {
            if id == right {
                right_origin = world.apply_point(DVec3::ZERO);
            }
        });

        // The left subtree's translation must not bleed into its sibling.
        assert_eq!(right_origin, DVec3::ZERO);
    }

    #[test]
    fn test_world_transform_matches_walk() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);
        let b = graph.create_node(Some(a), "b", NodeKind::Group);

        graph.rotate(a, Axis::Z, 90.0);
        graph.translate(b, DVec3::new(1.0, 0.0, 0.0));

        let world = graph.world_transform(b);
        let p = world.apply_point(DVec3::ZERO);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-9);

        // And the inverse is kept consistent through the composition chain.
        let round_trip = world.matrix() * world.inverse();
        for (x, y) in round_trip
            .to_cols_array()
            .iter()
            .zip(DMat4::IDENTITY.to_cols_array().iter())
        {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_identity_round_trips_through_u64() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node(None, "a", NodeKind::Group);

        let raw = a.as_u64();
        assert_eq!(SceneNodeId::from(raw), a);
    }
}
