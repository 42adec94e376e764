//! A single node of the hierarchy.

use marionette_core::Transform;
use node::{NodeKind, PickFlags};

use crate::SceneNodeId;

/// One element of the scene hierarchy.
///
/// A node couples its position in the tree (parent/children) with its local
/// transform state and its kind-specific payload. Two transforms are kept:
/// `local`, the live transform relative to the parent, and `initial`, the
/// authored pose the node can be reset to. Authored edits move both; session
/// interactions (joint drags, free translation) move only `local`, which is
/// exactly what makes the reset operations meaningful.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Reference to the parent node; only the root has none.
    pub(crate) parent: Option<SceneNodeId>,

    /// Child nodes in insertion order.
    pub(crate) children: Vec<SceneNodeId>,

    /// Human-readable label for authoring and logs.
    pub(crate) name: String,

    /// Current transform relative to the parent (with cached inverse).
    pub(crate) local: Transform,

    /// The authored pose; target of the reset operations.
    pub(crate) initial: Transform,

    /// Kind-specific payload: group, joint, or geometry.
    pub(crate) kind: NodeKind,

    /// Transient interaction state.
    pub(crate) flags: PickFlags,
}

impl SceneNode {
    pub(crate) fn new(parent: Option<SceneNodeId>, name: String, kind: NodeKind) -> Self {
        Self {
            parent,
            children: Vec::new(),
            name,
            local: Transform::IDENTITY,
            initial: Transform::IDENTITY,
            kind,
            flags: PickFlags::default(),
        }
    }

    pub fn parent(&self) -> Option<SceneNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[SceneNodeId] {
        &self.children
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn local(&self) -> &Transform {
        &self.local
    }

    pub fn initial(&self) -> &Transform {
        &self.initial
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn flags(&self) -> PickFlags {
        self.flags
    }

    /// Derived display state for the renderer.
    pub fn is_highlighted(&self) -> bool {
        self.flags.is_highlighted()
    }
}
