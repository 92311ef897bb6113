//! Declarative layout constraints.
//!
//! Each node carries one position constraint and one size constraint per
//! axis. A constraint is a kind tag plus one adjustable scalar `value`; the
//! scalar is mutable so animations can tween it. Evaluation is pure: it
//! reads the node's already-resolved parent bounds, the window viewport, and
//! (for aspect/content kinds) the node's own content metrics or resolved
//! opposite-axis extent — never unresolved state.
//!
//! Evaluation order inside one layout pass is parent-before-child and, per
//! node, sizes before positions with the aspect-driven axis last. That order
//! is what lets aspect kinds read "the other axis's already-resolved
//! on-screen value" instead of re-entering evaluation.

mod position;
mod size;

pub use position::{PositionConstraint, PositionKind};
pub use size::{SizeConstraint, SizeKind};

/// Layout axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::X)
    }
}

use nimbus_core::coords::Rect;

#[inline]
pub(crate) fn axis_origin(r: Rect, axis: Axis) -> f32 {
    match axis {
        Axis::X => r.origin.x,
        Axis::Y => r.origin.y,
    }
}

#[inline]
pub(crate) fn axis_extent(r: Rect, axis: Axis) -> f32 {
    match axis {
        Axis::X => r.size.x,
        Axis::Y => r.size.y,
    }
}
