//! GPU-pick identity.
//!
//! Every attached node carries a dense 24-bit pick id that the renderer
//! writes into an offscreen id buffer alongside the color pass. Hit testing
//! is then a single buffer read at the cursor — no geometric walk, and
//! overlap resolution is exactly paint order.

use bytemuck::{Pod, Zeroable};
use nimbus_core::coords::Rect;

/// Dense pick id. `0` means "no node"; live nodes are numbered `1..=N` in
/// draw order and renumbered on every structural change, so the id always
/// fits the RGB channels of an 8-bit render target.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct PickId(u32);

impl PickId {
    pub const NONE: PickId = PickId(0);
    /// Largest id encodable in 24 bits of color.
    pub const MAX: u32 = 0x00FF_FFFF;

    /// Id for the node at `index` of the draw-order numbering.
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!((index as u64) < Self::MAX as u64);
        PickId(index as u32 + 1)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Encodes the id into RGB channels, low byte in red.
    #[inline]
    pub fn to_rgb(self) -> [u8; 3] {
        [(self.0 & 0xFF) as u8, ((self.0 >> 8) & 0xFF) as u8, ((self.0 >> 16) & 0xFF) as u8]
    }

    /// Decodes an id read back from an RGB render target.
    #[inline]
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        PickId((rgb[0] as u32) | ((rgb[1] as u32) << 8) | ((rgb[2] as u32) << 16))
    }
}

/// Where the dispatcher reads pick ids from.
///
/// The production implementation reads back the GPU id attachment; tests and
/// headless runs use [`CpuPickBuffer`]. Reads reflect the last rendered
/// frame, so an id can be one structural change stale — the tree lookup
/// rejects ids outside the current dense range.
pub trait PickSource {
    /// Id under the pixel at (`x`, `y`); [`PickId::NONE`] outside the buffer.
    fn pick_at(&self, x: u32, y: u32) -> PickId;
}

/// Software id buffer with stencil-like mask nesting.
///
/// Mirrors what the GPU pass does: draw-order stamping of node rects, and a
/// per-pixel counter buffer standing in for the stencil attachment so nested
/// masks clip both rendering and picking identically.
pub struct CpuPickBuffer {
    width: u32,
    height: u32,
    ids: Vec<u32>,
    /// Per pixel: how many of the active masks contain it. Writable iff it
    /// equals the current nesting depth.
    clip: Vec<u8>,
    depth: u8,
}

impl CpuPickBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self { width, height, ids: vec![0; len], clip: vec![0; len], depth: 0 }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocates for a new surface size and clears.
    pub fn resize(&mut self, width: u32, height: u32) {
        let len = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.ids.clear();
        self.ids.resize(len, 0);
        self.clip.clear();
        self.clip.resize(len, 0);
        self.depth = 0;
    }

    /// Resets all ids and mask state; the start of a frame.
    pub fn clear(&mut self) {
        self.ids.fill(0);
        self.clip.fill(0);
        self.depth = 0;
    }

    /// Stamps `id` over `rect` (logical pixels), honoring active masks.
    pub fn stamp(&mut self, rect: Rect, id: PickId) {
        let (x0, x1, y0, y1) = self.pixel_range(rect);
        for y in y0..y1 {
            let row = y * self.width as usize;
            for x in x0..x1 {
                let i = row + x;
                if self.clip[i] == self.depth {
                    self.ids[i] = id.raw();
                }
            }
        }
    }

    /// Enters a mask region; stamps until the matching [`pop_mask`](Self::pop_mask)
    /// only land inside `rect` (intersected with enclosing masks).
    pub fn push_mask(&mut self, rect: Rect) {
        let prev = self.depth;
        self.depth += 1;
        let (x0, x1, y0, y1) = self.pixel_range(rect);
        for y in y0..y1 {
            let row = y * self.width as usize;
            for x in x0..x1 {
                let i = row + x;
                if self.clip[i] == prev {
                    self.clip[i] = self.depth;
                }
            }
        }
    }

    /// Leaves the innermost mask region.
    pub fn pop_mask(&mut self) {
        debug_assert!(self.depth > 0, "pop_mask without matching push_mask");
        if self.depth == 0 {
            return;
        }
        for c in &mut self.clip {
            if *c == self.depth {
                *c -= 1;
            }
        }
        self.depth -= 1;
    }

    /// Raw little-endian id bytes, the same layout a GPU readback delivers.
    pub fn id_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.ids)
    }

    fn pixel_range(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let max = rect.max();
        let x0 = rect.origin.x.floor().max(0.0) as usize;
        let y0 = rect.origin.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil().max(0.0) as usize).min(self.width as usize);
        let y1 = (max.y.ceil().max(0.0) as usize).min(self.height as usize);
        (x0.min(self.width as usize), x1, y0.min(self.height as usize), y1)
    }
}

impl PickSource for CpuPickBuffer {
    fn pick_at(&self, x: u32, y: u32) -> PickId {
        if x >= self.width || y >= self.height {
            return PickId::NONE;
        }
        PickId(self.ids[(y * self.width + x) as usize])
    }
}
