use std::fmt;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Layout metrics for a measured text block, in logical pixels.
///
/// These are the content metrics consumed by text-driven size constraints:
/// a text-height constraint derives its extent from `line_count` ×
/// `line_height`, a text-width constraint from `max_advance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextMetrics {
    /// Number of laid-out lines (≥ 1 for non-empty text).
    pub line_count: u32,
    /// Widest line's advance extent.
    pub max_advance: f32,
    /// Height of a single line at the measured size.
    pub line_height: f32,
}

impl TextMetrics {
    /// Total block height.
    #[inline]
    pub fn height(self) -> f32 {
        self.line_count as f32 * self.line_height
    }
}

/// Owns a collection of loaded fonts.
///
/// Fonts are immutable after loading. The system is owned by the host
/// application; the HUD layer borrows it when resolving text-content size
/// constraints.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays out `text` at `size` logical pixels, wrapping at `max_width` if
    /// given, and returns the metrics the constraint evaluator consumes.
    ///
    /// Unknown `id` and empty text both produce a single empty line, so a
    /// text-sized node degrades to one line height rather than collapsing.
    #[must_use]
    pub fn measure(
        &self,
        text: &str,
        id: FontId,
        size: f32,
        max_width: Option<f32>,
    ) -> TextMetrics {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let line_height = size * 1.2;
        let empty = TextMetrics { line_count: 1, max_advance: 0.0, line_height };

        let Some(font) = self.get(id) else {
            return empty;
        };
        if text.is_empty() {
            return empty;
        }

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return empty;
        }

        // Pen position after each glyph (= g.x - xmin + advance) rather than
        // the bitmap right edge, so the measured advance matches what a
        // renderer laying out the same string will produce.
        let max_advance = glyphs
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        TextMetrics {
            line_count: layout.lines().map_or(1, |l| l.len().max(1)) as u32,
            max_advance,
            line_height,
        }
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_font_degrades_to_one_line() {
        let fonts = FontSystem::new();
        let m = fonts.measure("hello", FontId(0), 10.0, None);
        assert_eq!(m.line_count, 1);
        assert_eq!(m.max_advance, 0.0);
        assert_eq!(m.line_height, 12.0);
        assert_eq!(m.height(), 12.0);
    }

    #[test]
    fn block_height_scales_with_line_count() {
        let m = TextMetrics { line_count: 3, max_advance: 40.0, line_height: 12.0 };
        assert_eq!(m.height(), 36.0);
    }
}
