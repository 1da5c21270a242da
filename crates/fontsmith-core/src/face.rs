//! The font collaborator interface.
//!
//! Atlas generation never talks to a font library directly. Everything it
//! needs from a face (sizing, charmap walk, metrics, stroked rasterization,
//! raw tables, kerning queries) goes through [`FontFace`]. The production
//! implementation is [`TtfFace`](crate::TtfFace); tests plug in synthetic
//! faces.
//!
//! Metric values follow the 26.6 fixed point convention: one pixel is 64
//! units.

/// Index of a glyph inside a face.
pub type GlyphId = u16;

/// Size-dependent face metrics, in 26.6 pixels unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeMetrics {
    /// Distance from baseline to the top of the face (positive).
    pub ascender: i64,
    /// Distance from baseline to the bottom of the face (negative).
    pub descender: i64,
    /// Baseline-to-baseline distance.
    pub height: i64,
    /// Nominal vertical pixels per em (whole pixels).
    pub y_ppem: u16,
    /// Design units per em.
    pub units_per_em: u16,
}

/// Windows and typographic ascent/descent hints from the OS/2 table, in
/// font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerticalHints {
    pub win_ascent: u16,
    pub win_descent: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
}

/// Per-glyph horizontal layout metrics in 26.6 pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphOutlineMetrics {
    /// Pen origin to the left edge of the glyph.
    pub bearing_x: i64,
    /// Baseline to the top edge of the glyph (up is positive).
    pub bearing_y: i64,
    /// Pen advance after the glyph.
    pub advance: i64,
}

/// Optional stroking applied to an outline before rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Stroke {
    /// Rasterize the outline as is.
    #[default]
    None,
    /// Replace the outline with a closed ring of the given total width
    /// centered on the original contour (round caps and joins).
    Ring { width: f32 },
    /// Inflate the glyph: the filled outline plus everything within
    /// `radius` pixels of its contour.
    Border { radius: f32 },
}

/// Bitmap flavour produced by [`FontFace::rasterize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterMode {
    /// Anti-aliased 8-bit coverage.
    #[default]
    Gray,
    /// Aliased coverage: every byte is 0 or 255.
    Mono,
}

/// How to rasterize a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphRaster {
    pub stroke: Stroke,
    pub mode: RasterMode,
}

impl GlyphRaster {
    /// Plain anti-aliased rendering.
    pub const GRAY: Self = Self {
        stroke: Stroke::None,
        mode: RasterMode::Gray,
    };

    /// Plain aliased rendering.
    pub const MONO: Self = Self {
        stroke: Stroke::None,
        mode: RasterMode::Mono,
    };

    /// Anti-aliased rendering of a stroked outline.
    pub fn stroked(stroke: Stroke) -> Self {
        Self {
            stroke,
            mode: RasterMode::Gray,
        }
    }
}

/// A rasterized glyph: one coverage byte per pixel, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    /// Pen origin to the left column, in pixels.
    pub left: i32,
    /// Baseline to the top row, in pixels (up is positive).
    pub top: i32,
    /// `width * height` coverage values.
    pub coverage: Vec<u8>,
}

impl Bitmap {
    /// A bitmap with no pixels, as produced by blank glyphs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the bitmap has zero area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A scalable font face at a configurable pixel size.
///
/// Implementations are used from a single thread for the duration of one
/// generation request.
pub trait FontFace {
    /// Family name, e.g. "DejaVu Sans".
    fn family_name(&self) -> String;

    /// Style name, e.g. "Bold".
    fn style_name(&self) -> String;

    /// Set the nominal pixel height used by every later query.
    fn set_pixel_size(&mut self, pixels: u32);

    /// Every (codepoint, glyph) pair of the Unicode charmap in ascending
    /// codepoint order. Pairs mapping to glyph 0 are not reported.
    fn codepoints(&self) -> Vec<(u32, GlyphId)>;

    /// Face metrics at the current pixel size.
    fn size_metrics(&self) -> SizeMetrics;

    /// OS/2 vertical hints, when the face carries that table.
    fn vertical_hints(&self) -> Option<VerticalHints>;

    /// Layout metrics of one glyph at the current pixel size.
    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphOutlineMetrics;

    /// Render one glyph at the current pixel size.
    fn rasterize(&self, glyph: GlyphId, raster: GlyphRaster) -> Bitmap;

    /// Raw bytes of a font table.
    fn table(&self, tag: [u8; 4]) -> Option<&[u8]>;

    /// Whether the face carries horizontal kerning.
    fn has_kerning(&self) -> bool;

    /// Horizontal kerning between two glyphs at the current pixel size,
    /// in 26.6 pixels.
    fn kerning(&self, left: GlyphId, right: GlyphId) -> i64;
}
