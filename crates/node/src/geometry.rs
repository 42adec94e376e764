//! Render-resource handles for geometry nodes
//!
//! The scene graph never owns primitives or materials; it records opaque
//! handles and hands them to the renderer during traversal. Resolution of a
//! handle to an actual mesh or shading state is entirely the renderer's
//! concern.

use std::fmt;

/// Handle to an externally owned drawable primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimitiveId(pub usize);

impl PrimitiveId {
    pub fn new(id: usize) -> Self {
        PrimitiveId(id)
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive-{}", self.0)
    }
}

/// Handle to an externally owned material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub usize);

impl MaterialId {
    pub fn new(id: usize) -> Self {
        MaterialId(id)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Material-{}", self.0)
    }
}

/// Payload of a geometry node: one primitive, optionally one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryData {
    pub primitive: PrimitiveId,
    pub material: Option<MaterialId>,
}

impl GeometryData {
    pub fn new(primitive: PrimitiveId) -> Self {
        Self {
            primitive,
            material: None,
        }
    }

    pub fn with_material(primitive: PrimitiveId, material: MaterialId) -> Self {
        Self {
            primitive,
            material: Some(material),
        }
    }
}
