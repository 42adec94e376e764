//! Bounded joint state
//!
//! A joint node has two independent rotational degrees of freedom. Each axis
//! accumulates an offset in degrees inside a closed range; an update that
//! would leave the range is rejected outright for that axis (the offset does
//! not saturate at the boundary, it simply does not move). The joint also
//! carries a per-gesture accumulator so that one full pick-drag-release
//! interaction can be committed, undone and redone as a single unit.

use marionette_core::Transform;

/// One rotational degree of freedom with a closed range.
///
/// Invariant: `min <= current <= max` holds after every accepted update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAxis {
    pub min: f64,
    pub initial: f64,
    pub max: f64,
    current: f64,
}

impl JointAxis {
    /// Configures an axis. `current` starts at `initial`.
    pub fn new(min: f64, initial: f64, max: f64) -> Self {
        Self {
            min,
            initial,
            max,
            current: initial,
        }
    }

    /// An axis that accepts no motion at all.
    pub fn locked() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// The accumulated offset in degrees.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Attempts to add `delta` degrees. Returns true only when the axis
    /// actually moved: a delta that would leave `[min, max]` is rejected
    /// with the offset unchanged, and a zero delta is not a change.
    pub fn try_apply(&mut self, delta: f64) -> bool {
        if delta == 0.0 {
            return false;
        }
        let next = self.current + delta;
        if next < self.min || next > self.max {
            return false;
        }
        self.current = next;
        true
    }

    /// Shifts the offset without a bounds check. Used by undo/redo, which
    /// replays deltas that were accepted when first applied.
    pub fn shift(&mut self, delta: f64) {
        self.current += delta;
    }

    /// Restores the offset to its configured initial value.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

impl Default for JointAxis {
    fn default() -> Self {
        Self::locked()
    }
}

/// The full state of a joint node: two bounded axes plus the running
/// accumulator for the gesture in progress.
///
/// By convention axis `x` answers horizontal drag motion (rotation about the
/// X axis) and axis `y` answers vertical drag motion (rotation about Z); the
/// mapping itself lives in the scene graph's drag logic.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointState {
    pub x: JointAxis,
    pub y: JointAxis,
    /// Composed transform of every delta accepted since the last gesture
    /// commit. Identity when no gesture is in progress.
    pub gesture: Transform,
    /// Degrees accepted on each axis since the last gesture commit. Recorded
    /// into the gesture snapshot so undo can restore exact offsets.
    pub gesture_degrees: (f64, f64),
}

impl JointState {
    pub fn new(x: JointAxis, y: JointAxis) -> Self {
        Self {
            x,
            y,
            gesture: Transform::IDENTITY,
            gesture_degrees: (0.0, 0.0),
        }
    }

    /// Whether any delta has been accepted since the last commit.
    pub fn gesture_in_progress(&self) -> bool {
        !self.gesture.is_identity()
    }

    /// Clears the accumulator after a gesture is committed or abandoned.
    pub fn clear_gesture(&mut self) {
        self.gesture = Transform::IDENTITY;
        self.gesture_degrees = (0.0, 0.0);
    }
}
