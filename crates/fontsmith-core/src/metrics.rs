//! Pixel layout metrics.
//!
//! Face metrics arrive in 26.6 fixed point and are rounded half-up to whole
//! pixels. When the face has an OS/2 table, its Windows and typographic
//! ascent/descent values (scaled by `y_ppem / units_per_em` with integer
//! division) may widen the ascender and descender.

use crate::face::{FontFace, GlyphId, SizeMetrics, VerticalHints};

/// Round a 26.6 value to whole pixels, halves rounding up.
#[inline]
pub fn round_to_pixels(value: i64) -> i32 {
    ((value >> 6) + i64::from((value & 0x3f) >= 32)) as i32
}

/// Per-glyph layout values in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    /// Line height of the face (recomputed with each glyph).
    pub line_height: i32,
    /// Pen origin to the image's left edge.
    pub x_offset: i32,
    /// Top of the line to the image's top edge.
    pub y_offset: i32,
    /// Pen advance.
    pub x_advance: i32,
}

/// Ascender and descender in whole pixels after OS/2 widening, and the
/// resulting line height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceMetrics {
    pub ascender: i32,
    pub descender: i32,
    pub line_height: i32,
}

/// Compute face-level metrics from raw size metrics and optional hints.
pub fn face_metrics(size: &SizeMetrics, hints: Option<&VerticalHints>) -> FaceMetrics {
    let mut ascender = round_to_pixels(size.ascender);
    let mut descender = round_to_pixels(size.descender);

    if let Some(hints) = hints {
        let ppem = i64::from(size.y_ppem);
        let upem = i64::from(size.units_per_em.max(1));
        let scaled = |units: i64| (units * ppem / upem) as i32;

        ascender = ascender
            .max(scaled(i64::from(hints.win_ascent)))
            .max(scaled(i64::from(hints.typo_ascender)));
        descender = descender
            .max(scaled(i64::from(hints.win_descent)))
            .max(scaled(i64::from(hints.typo_descender)));
    }

    FaceMetrics {
        ascender,
        descender,
        line_height: (ascender + descender).max(round_to_pixels(size.height)),
    }
}

/// Compute the layout metrics of one glyph at the face's current size.
pub fn glyph_metrics(face: &dyn FontFace, glyph: GlyphId) -> GlyphMetrics {
    let face_metrics = face_metrics(&face.size_metrics(), face.vertical_hints().as_ref());
    let outline = face.glyph_metrics(glyph);

    GlyphMetrics {
        line_height: face_metrics.line_height,
        x_offset: round_to_pixels(outline.bearing_x),
        y_offset: face_metrics.ascender - round_to_pixels(outline.bearing_y),
        x_advance: round_to_pixels(outline.advance),
    }
}
