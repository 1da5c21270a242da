//! TrueType/OpenType faces backed by ttf-parser and tiny-skia.
//!
//! ttf-parser supplies outlines, the charmap, metrics tables and kerning
//! lookups; tiny-skia strokes outlines and rasterizes them into coverage
//! masks. Values handed back through [`FontFace`] are grid fitted the way a
//! hinting rasterizer reports them: ascender and bearing-Y round up,
//! descender and bearing-X round down, advances and line height round to
//! the nearest pixel.
//!
//! # Example
//!
//! ```no_run
//! use fontsmith_core::{FontFace, TtfFace};
//!
//! let data = std::fs::read("DejaVuSans.ttf")?;
//! let mut face = TtfFace::from_bytes(&data, 0)?;
//! face.set_pixel_size(32);
//! println!("{} glyphs mapped", face.codepoints().len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use tiny_skia::{FillRule, LineCap, LineJoin, Mask, Path, PathBuilder, Transform};
use tracing::trace;
use ttf_parser::{FaceParsingError, Tag, name_id};

use crate::face::{
    Bitmap, FontFace, GlyphId, GlyphOutlineMetrics, GlyphRaster, RasterMode, SizeMetrics, Stroke,
    VerticalHints,
};

/// A parsed font face borrowing its file data.
pub struct TtfFace<'a> {
    face: ttf_parser::Face<'a>,
    pixel_size: u32,
}

impl<'a> TtfFace<'a> {
    /// Parse face `index` of a font file or collection.
    pub fn from_bytes(data: &'a [u8], index: u32) -> Result<Self, FaceParsingError> {
        let face = ttf_parser::Face::parse(data, index)?;
        Ok(Self {
            face,
            pixel_size: 0,
        })
    }

    /// Current nominal pixel height.
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Design units to pixels at the current size.
    fn scale(&self) -> f32 {
        self.pixel_size as f32 / f32::from(self.face.units_per_em().max(1))
    }

    fn name(&self, id: u16) -> Option<String> {
        self.face
            .names()
            .into_iter()
            .filter(|name| name.name_id == id)
            .find_map(|name| name.to_string())
    }

    /// Glyph outline in pixel space, y pointing down.
    fn outline(&self, glyph: GlyphId) -> Option<Path> {
        let mut builder = OutlineBuilder(PathBuilder::new());
        self.face
            .outline_glyph(ttf_parser::GlyphId(glyph), &mut builder)?;
        let scale = self.scale();
        builder
            .0
            .finish()?
            .transform(Transform::from_scale(scale, -scale))
    }
}

/// Forwards ttf-parser outline commands to a tiny-skia path.
struct OutlineBuilder(PathBuilder);

impl ttf_parser::OutlineBuilder for OutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

// ============================================================================
// 26.6 fixed point helpers
// ============================================================================

fn to_26_6(pixels: f32) -> i64 {
    (pixels * 64.0).round() as i64
}

fn floor_26_6(v: i64) -> i64 {
    v & !63
}

fn ceil_26_6(v: i64) -> i64 {
    (v + 63) & !63
}

fn round_26_6(v: i64) -> i64 {
    (v + 32) & !63
}

fn round_stroke(width: f32) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    }
}

/// Fill `paths` into one coverage bitmap sized to their combined pixel
/// bounds. Overlapping paths keep the highest coverage.
fn rasterize_paths(paths: &[Path], anti_alias: bool) -> Bitmap {
    let Some(first) = paths.first() else {
        return Bitmap::empty();
    };
    let bounds = paths.iter().skip(1).fold(first.bounds(), |acc, path| {
        let b = path.bounds();
        tiny_skia::Rect::from_ltrb(
            acc.left().min(b.left()),
            acc.top().min(b.top()),
            acc.right().max(b.right()),
            acc.bottom().max(b.bottom()),
        )
        .unwrap_or(acc)
    });

    let left = bounds.left().floor() as i32;
    let top = bounds.top().floor() as i32;
    let width = (bounds.right().ceil() as i32 - left).max(0) as u32;
    let height = (bounds.bottom().ceil() as i32 - top).max(0) as u32;

    let Some(mut coverage) = Mask::new(width, height) else {
        return Bitmap::empty();
    };
    let transform = Transform::from_translate(-left as f32, -top as f32);
    coverage.fill_path(first, FillRule::Winding, anti_alias, transform);

    for path in &paths[1..] {
        if let Some(mut layer) = Mask::new(width, height) {
            layer.fill_path(path, FillRule::Winding, anti_alias, transform);
            for (dst, src) in coverage.data_mut().iter_mut().zip(layer.data()) {
                *dst = (*dst).max(*src);
            }
        }
    }

    Bitmap {
        width: width as usize,
        height: height as usize,
        left,
        top: -top,
        coverage: coverage.data().to_vec(),
    }
}

impl FontFace for TtfFace<'_> {
    fn family_name(&self) -> String {
        self.name(name_id::TYPOGRAPHIC_FAMILY)
            .or_else(|| self.name(name_id::FAMILY))
            .unwrap_or_default()
    }

    fn style_name(&self) -> String {
        self.name(name_id::TYPOGRAPHIC_SUBFAMILY)
            .or_else(|| self.name(name_id::SUBFAMILY))
            .unwrap_or_default()
    }

    fn set_pixel_size(&mut self, pixels: u32) {
        self.pixel_size = pixels;
    }

    fn codepoints(&self) -> Vec<(u32, GlyphId)> {
        let mut map = BTreeMap::new();
        let Some(cmap) = self.face.tables().cmap else {
            return Vec::new();
        };

        for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
            subtable.codepoints(|codepoint| {
                if let Some(glyph) = subtable.glyph_index(codepoint) {
                    if glyph.0 != 0 {
                        map.entry(codepoint).or_insert(glyph.0);
                    }
                }
            });
        }

        map.into_iter().collect()
    }

    fn size_metrics(&self) -> SizeMetrics {
        let scale = self.scale();
        let ascender = f32::from(self.face.ascender()) * scale;
        let descender = f32::from(self.face.descender()) * scale;
        let line_gap = f32::from(self.face.line_gap()) * scale;

        SizeMetrics {
            ascender: ceil_26_6(to_26_6(ascender)),
            descender: floor_26_6(to_26_6(descender)),
            height: round_26_6(to_26_6(ascender - descender + line_gap)),
            y_ppem: u16::try_from(self.pixel_size).unwrap_or(u16::MAX),
            units_per_em: self.face.units_per_em(),
        }
    }

    fn vertical_hints(&self) -> Option<VerticalHints> {
        let os2 = self.face.tables().os2?;
        Some(VerticalHints {
            win_ascent: os2.windows_ascender().unsigned_abs(),
            win_descent: os2.windows_descender().unsigned_abs(),
            typo_ascender: os2.typographic_ascender(),
            typo_descender: os2.typographic_descender(),
        })
    }

    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphOutlineMetrics {
        let scale = self.scale();
        let id = ttf_parser::GlyphId(glyph);
        let advance = self.face.glyph_hor_advance(id).unwrap_or(0);
        let (bearing_x, bearing_y) = self
            .face
            .glyph_bounding_box(id)
            .map(|bbox| (f32::from(bbox.x_min) * scale, f32::from(bbox.y_max) * scale))
            .unwrap_or((0.0, 0.0));

        GlyphOutlineMetrics {
            bearing_x: floor_26_6(to_26_6(bearing_x)),
            bearing_y: ceil_26_6(to_26_6(bearing_y)),
            advance: round_26_6(to_26_6(f32::from(advance) * scale)),
        }
    }

    fn rasterize(&self, glyph: GlyphId, raster: GlyphRaster) -> Bitmap {
        let Some(outline) = self.outline(glyph) else {
            trace!(target: "fontsmith::ttf", glyph, "glyph has no outline");
            return Bitmap::empty();
        };
        let anti_alias = raster.mode == RasterMode::Gray;

        let paths = match raster.stroke {
            Stroke::None => vec![outline],
            Stroke::Ring { width } => outline
                .stroke(&round_stroke(width), 1.0)
                .into_iter()
                .collect(),
            Stroke::Border { radius } => {
                let border = outline.stroke(&round_stroke(radius * 2.0), 1.0);
                std::iter::once(outline).chain(border).collect()
            }
        };

        rasterize_paths(&paths, anti_alias)
    }

    fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        self.face.raw_face().table(Tag::from_bytes(&tag))
    }

    fn has_kerning(&self) -> bool {
        self.face
            .tables()
            .kern
            .is_some_and(|kern| kern.subtables.into_iter().any(|s| s.horizontal))
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> i64 {
        let Some(kern) = self.face.tables().kern else {
            return 0;
        };
        let (left, right) = (ttf_parser::GlyphId(left), ttf_parser::GlyphId(right));
        let units: i32 = kern
            .subtables
            .into_iter()
            .filter(|s| s.horizontal && !s.variable && !s.has_cross_stream)
            .filter_map(|s| s.glyphs_kerning(left, right))
            .map(i32::from)
            .sum();

        round_26_6(to_26_6(units as f32 * self.scale()))
    }
}
