//! Homogeneous transform with a cached inverse
//!
//! Every transform stored in the scene graph is consumed in both directions:
//! forward when composing world matrices during traversal, inverse when
//! unwinding a gesture during undo. Recomputing a 4x4 inverse at every undo
//! would be wasteful and, worse, easy to forget; instead the inverse is part
//! of the value and every constructor and composition maintains it
//! analytically.

use glam::{DMat4, DVec3};

/// Screen-pixels-per-degree divisor applied to drag deltas before they become
/// joint rotations. The value is a tuning constant, not a derived law; the
/// scene graph exposes a setter for callers that want a different feel.
pub const DEFAULT_DRAG_DIVISOR: f64 = 60.0;

/// One of the three principal rotation axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A 4x4 homogeneous transform paired with its inverse.
///
/// Invariant: `inverse` is always the matrix inverse of `matrix`. Both
/// matrices are updated together on every operation, so the inverse can be
/// read at any time without a recompute. A degenerate input (for example a
/// zero scale factor) produces a transform whose inverse is unusable; callers
/// are expected not to author one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: DMat4,
    inverse: DMat4,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        matrix: DMat4::IDENTITY,
        inverse: DMat4::IDENTITY,
    };

    /// Wraps an arbitrary matrix, computing its inverse numerically.
    pub fn from_matrix(matrix: DMat4) -> Self {
        Self {
            matrix,
            inverse: matrix.inverse(),
        }
    }

    /// Counterclockwise rotation of `degrees` about a principal axis.
    ///
    /// A rotation's inverse is its transpose, so no numeric inversion is
    /// needed.
    pub fn rotation(axis: Axis, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        let matrix = match axis {
            Axis::X => DMat4::from_rotation_x(radians),
            Axis::Y => DMat4::from_rotation_y(radians),
            Axis::Z => DMat4::from_rotation_z(radians),
        };
        Self {
            matrix,
            inverse: matrix.transpose(),
        }
    }

    /// Displacement by `amount`.
    pub fn translation(amount: DVec3) -> Self {
        Self {
            matrix: DMat4::from_translation(amount),
            inverse: DMat4::from_translation(-amount),
        }
    }

    /// Non-uniform scale by `factors`.
    ///
    /// A zero component yields a singular matrix; that case is left to the
    /// caller rather than guarded here.
    pub fn scaling(factors: DVec3) -> Self {
        Self {
            matrix: DMat4::from_scale(factors),
            inverse: DMat4::from_scale(factors.recip()),
        }
    }

    /// The forward matrix.
    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    /// The cached inverse matrix.
    pub fn inverse(&self) -> DMat4 {
        self.inverse
    }

    /// Composes `rhs` on the right: the result applies `rhs` first, then
    /// `self`. This is the composition used for authored edits, which stack
    /// under the node's existing transform.
    pub fn post_mul(&self, rhs: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * rhs.matrix,
            inverse: rhs.inverse * self.inverse,
        }
    }

    /// Composes `lhs` on the left: the result applies `self` first, then
    /// `lhs`. This is the composition used for interactive joint deltas,
    /// which act in the joint's parent frame.
    pub fn pre_mul(&self, lhs: &Transform) -> Transform {
        Transform {
            matrix: lhs.matrix * self.matrix,
            inverse: self.inverse * lhs.inverse,
        }
    }

    /// The inverse transform. Cheap: the two cached matrices swap roles.
    pub fn inverted(&self) -> Transform {
        Transform {
            matrix: self.inverse,
            inverse: self.matrix,
        }
    }

    /// The transposed transform, for consumers that want column-major data
    /// uploaded in row-major order. Transposition and inversion commute, so
    /// the cached inverse stays valid.
    pub fn transposed(&self) -> Transform {
        Transform {
            matrix: self.matrix.transpose(),
            inverse: self.inverse.transpose(),
        }
    }

    /// Applies the transform to a point (w = 1).
    pub fn apply_point(&self, point: DVec3) -> DVec3 {
        self.matrix.transform_point3(point)
    }

    /// Whether this transform is exactly the identity. Used to detect empty
    /// gesture accumulators, which are built from exact identity values and
    /// only change when a delta is accepted.
    pub fn is_identity(&self) -> bool {
        self.matrix == DMat4::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat_eq(a: DMat4, b: DMat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_identity() {
        let t = Transform::IDENTITY;
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.apply_point(p), p);
        assert!(t.is_identity());
    }

    #[test]
    fn test_translation_inverse_cached() {
        let t = Transform::translation(DVec3::new(3.0, -1.0, 2.0));
        assert_mat_eq(t.inverse(), t.matrix().inverse());
        assert_mat_eq(t.matrix() * t.inverse(), DMat4::IDENTITY);
    }

    #[test]
    fn test_rotation_degrees() {
        let t = Transform::rotation(Axis::Z, 90.0);
        let p = t.apply_point(DVec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-9);
        assert_mat_eq(t.inverse(), t.matrix().inverse());
    }

    #[test]
    fn test_scaling_inverse() {
        let t = Transform::scaling(DVec3::new(2.0, 4.0, 0.5));
        assert_mat_eq(t.matrix() * t.inverse(), DMat4::IDENTITY);
    }

    #[test]
    fn test_composition_keeps_inverse_consistent() {
        let a = Transform::rotation(Axis::X, 30.0);
        let b = Transform::translation(DVec3::new(0.0, 5.0, 0.0));
        let c = a.post_mul(&b);
        assert_mat_eq(c.matrix(), a.matrix() * b.matrix());
        assert_mat_eq(c.matrix() * c.inverse(), DMat4::IDENTITY);

        let d = a.pre_mul(&b);
        assert_mat_eq(d.matrix(), b.matrix() * a.matrix());
        assert_mat_eq(d.matrix() * d.inverse(), DMat4::IDENTITY);
    }

    #[test]
    fn test_inverted_round_trip() {
        let t = Transform::rotation(Axis::Y, 45.0)
            .post_mul(&Transform::translation(DVec3::new(1.0, 2.0, 3.0)));
        let back = t.post_mul(&t.inverted());
        assert_mat_eq(back.matrix(), DMat4::IDENTITY);
    }

    #[test]
    fn test_transposed_commutes_with_inverse() {
        let t = Transform::rotation(Axis::X, 20.0)
            .post_mul(&Transform::scaling(DVec3::new(2.0, 2.0, 2.0)));
        let tt = t.transposed();
        assert_mat_eq(tt.inverse(), t.inverse().transpose());
        assert_mat_eq(tt.matrix() * tt.inverse(), DMat4::IDENTITY);
    }
}
