use crate::tree::{ComponentTree, Content, NodeId};

use super::{axis_extent, Axis};

/// How a size constraint turns its scalar into an extent.
///
/// All results are normalized window units. `AspectRatio` and
/// `TextureContent` are *aspect-driven*: they derive this axis from the
/// node's resolved opposite-axis extent, so a node may carry at most one of
/// them (enforced at construction, see
/// [`Component::with_size`](crate::tree::Component::with_size)).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SizeKind {
    /// `value` is a fraction of the window extent.
    Screen,
    /// `value` is a fraction of the parent extent.
    Parent,
    /// `value` is an extent in pixels.
    Pixel,
    /// Parent extent minus `value` pixels (clamped at zero).
    ParentMinusPixels,
    /// Opposite-axis on-screen extent × `value`, aspect-corrected so
    /// `value == 1.0` yields a square on screen.
    AspectRatio,
    /// Derived from the node's text metrics (max advance on X, line count ×
    /// line height on Y), scaled by `value`.
    TextContent,
    /// Opposite-axis extent scaled by the texture's own aspect ratio and
    /// `value`; keeps texture pixels square on screen.
    TextureContent,
}

impl SizeKind {
    /// Kinds that read the node's resolved opposite-axis extent.
    #[inline]
    pub fn is_aspect_driven(self) -> bool {
        matches!(self, SizeKind::AspectRatio | SizeKind::TextureContent)
    }
}

/// Size constraint for one axis: a kind plus one adjustable scalar.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SizeConstraint {
    pub kind: SizeKind,
    pub value: f32,
}

impl SizeConstraint {
    #[inline]
    pub const fn new(kind: SizeKind, value: f32) -> Self {
        Self { kind, value }
    }

    #[inline]
    pub const fn screen(value: f32) -> Self {
        Self::new(SizeKind::Screen, value)
    }

    #[inline]
    pub const fn parent(value: f32) -> Self {
        Self::new(SizeKind::Parent, value)
    }

    #[inline]
    pub const fn pixels(value: f32) -> Self {
        Self::new(SizeKind::Pixel, value)
    }

    #[inline]
    pub const fn parent_minus_pixels(value: f32) -> Self {
        Self::new(SizeKind::ParentMinusPixels, value)
    }

    /// Aspect lock against the opposite axis; `ratio` is this axis's
    /// on-screen extent per unit of the other.
    #[inline]
    pub const fn aspect(ratio: f32) -> Self {
        Self::new(SizeKind::AspectRatio, ratio)
    }

    /// Text-metric driven extent, scaled by `scale`.
    #[inline]
    pub const fn text(scale: f32) -> Self {
        Self::new(SizeKind::TextContent, scale)
    }

    /// Texture-aspect driven extent, scaled by `scale`.
    #[inline]
    pub const fn texture(scale: f32) -> Self {
        Self::new(SizeKind::TextureContent, scale)
    }

    #[inline]
    pub fn is_aspect_driven(&self) -> bool {
        self.kind.is_aspect_driven()
    }

    /// Resolves the extent for `node` on `axis`.
    ///
    /// Pure; aspect-driven kinds read the opposite axis's extent as resolved
    /// earlier in the same pass — they never re-enter evaluation, which is
    /// what keeps same-node aspect references from recursing. Callers guard
    /// against detached nodes.
    pub fn evaluate(&self, tree: &ComponentTree, node: NodeId, axis: Axis) -> f32 {
        let vp = tree.viewport();
        match self.kind {
            SizeKind::Screen => self.value,
            SizeKind::Parent => self.value * axis_extent(tree.parent_bounds(node), axis),
            SizeKind::Pixel => vp.pixels_to_normalized(self.value, axis.is_horizontal()),
            SizeKind::ParentMinusPixels => {
                let parent = axis_extent(tree.parent_bounds(node), axis);
                let inset = vp.pixels_to_normalized(self.value, axis.is_horizontal());
                (parent - inset).max(0.0)
            }
            SizeKind::AspectRatio => {
                let other = tree.resolved_extent(node, axis.other());
                other * self.value * aspect_correction(vp.aspect_ratio(), axis)
            }
            SizeKind::TextContent => {
                let Content::Text { metrics, .. } = tree.content(node) else {
                    return 0.0;
                };
                let px = match axis {
                    Axis::X => metrics.max_advance,
                    Axis::Y => metrics.height(),
                };
                vp.pixels_to_normalized(px * self.value, axis.is_horizontal())
            }
            SizeKind::TextureContent => {
                let Content::Texture { width, height } = tree.content(node) else {
                    return 0.0;
                };
                if *width <= 0.0 || *height <= 0.0 {
                    return 0.0;
                }
                let ratio = match axis {
                    Axis::X => width / height,
                    Axis::Y => height / width,
                };
                let other = tree.resolved_extent(node, axis.other());
                other * ratio * self.value * aspect_correction(vp.aspect_ratio(), axis)
            }
        }
    }
}

impl Default for SizeConstraint {
    /// Fills the parent.
    fn default() -> Self {
        Self::parent(1.0)
    }
}

/// Converts a normalized extent from the opposite axis into this axis so the
/// on-screen pixel proportions survive the window's aspect ratio.
#[inline]
fn aspect_correction(window_aspect: f32, axis: Axis) -> f32 {
    match axis {
        // width_norm = height_norm * h_px / w_px
        Axis::X => {
            if window_aspect > 0.0 { 1.0 / window_aspect } else { 1.0 }
        }
        // height_norm = width_norm * w_px / h_px
        Axis::Y => window_aspect,
    }
}
