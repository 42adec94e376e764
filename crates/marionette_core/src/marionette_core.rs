//! # Core math for Marionette
//!
//! This crate provides the transform type shared by the rest of the
//! workspace: a homogeneous 4x4 matrix that always travels with its inverse,
//! plus the elementary constructors (axis rotation, translation, scale) the
//! scene graph composes from.

pub mod transform;

pub use transform::{Axis, Transform, DEFAULT_DRAG_DIVISOR};
