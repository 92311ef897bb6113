use std::fmt;

use nimbus_core::input::MouseButton;

/// Rejection reasons for structurally invalid HUD operations.
///
/// All of these reject the offending operation and leave shared state
/// untouched; none of them is fatal to the host loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HudError {
    /// A drag is already active on this button; one drag per button.
    DragSlotOccupied(MouseButton),
    /// Aspect-driven size constraints may not sit on both axes of one node.
    AspectOnBothAxes,
    /// The node already has a parent; a node has at most one.
    AlreadyParented,
    /// The operation requires an attached node.
    NotAttached,
    /// The operation requires a detached node.
    StillAttached,
    /// Attaching here would make the node its own ancestor.
    WouldCycle,
    /// Stale or never-valid node id.
    InvalidNode,
    /// The tree root cannot be re-parented or removed.
    IsRoot,
}

impl fmt::Display for HudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HudError::DragSlotOccupied(b) => write!(f, "a drag is already active on {b:?}"),
            HudError::AspectOnBothAxes => {
                write!(f, "aspect-driven size constraints on both axes of one node")
            }
            HudError::AlreadyParented => write!(f, "node already has a parent"),
            HudError::NotAttached => write!(f, "node is not attached"),
            HudError::StillAttached => write!(f, "node is still attached"),
            HudError::WouldCycle => write!(f, "attachment would create a cycle"),
            HudError::InvalidNode => write!(f, "invalid node id"),
            HudError::IsRoot => write!(f, "operation not allowed on the root"),
        }
    }
}

impl std::error::Error for HudError {}
