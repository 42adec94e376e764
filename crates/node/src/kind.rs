//! Node kinds and transient picking state
//!
//! The hierarchy distinguishes three kinds of node: plain grouping nodes,
//! joints with bounded rotational freedom, and geometry leaves that carry a
//! drawable payload. Kind-specific behavior is dispatched through this enum
//! rather than through a virtual class hierarchy, so the scene graph can
//! match on it explicitly where behavior diverges.

use crate::geometry::GeometryData;
use crate::joint::JointState;

/// What a scene node is, with its kind-specific state inline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Pure hierarchy node: transforms and forwards, nothing else.
    Group,
    /// Constrained articulation point.
    Joint(JointState),
    /// Drawable leaf payload.
    Geometry(GeometryData),
}

impl NodeKind {
    pub fn is_joint(&self) -> bool {
        matches!(self, NodeKind::Joint(_))
    }

    pub fn is_geometry(&self) -> bool {
        matches!(self, NodeKind::Geometry(_))
    }

    pub fn as_joint(&self) -> Option<&JointState> {
        match self {
            NodeKind::Joint(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_joint_mut(&mut self) -> Option<&mut JointState> {
        match self {
            NodeKind::Joint(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&GeometryData> {
        match self {
            NodeKind::Geometry(data) => Some(data),
            _ => None,
        }
    }
}

/// Transient per-node interaction state. Never persisted; cleared and set by
/// pick application, consumed by the renderer for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickFlags {
    /// Selected by the current or most recent pick.
    pub active: bool,
    /// Dirtied by an accepted drag delta since the last pick.
    pub moved: bool,
}

impl PickFlags {
    /// Derived display state: a node is drawn highlighted while it is the
    /// selection or still carries uncommitted motion.
    pub fn is_highlighted(&self) -> bool {
        self.active || self.moved
    }
}
