//! # Node data model for Marionette
//!
//! This crate defines what a scene node *is*, independent of where it sits in
//! the hierarchy: its kind (plain group, constrained joint, or drawable
//! geometry), the bounded joint state, the non-owning handles to externally
//! managed render resources, and the transient picking flags. The scene graph
//! crate owns the tree structure and drives these types.

pub mod geometry;
pub mod joint;
pub mod kind;

pub use geometry::{GeometryData, MaterialId, PrimitiveId};
pub use joint::{JointAxis, JointState};
pub use kind::{NodeKind, PickFlags};
