//! Helpers shared by the integration tests.

#![allow(dead_code)]

use fontsmith_core::testing::{BoxGlyph, SyntheticFace};
use fontsmith_core::{FontAtlas, GenerationParams, GlyphRecord, StyleParams};

/// Every style with small, non-trivial parameters.
pub fn all_styles() -> [StyleParams; 4] {
    [
        StyleParams::Simple { blur_radius: 1 },
        StyleParams::Contour {
            thickness: 2,
            blur_radius: 0,
        },
        StyleParams::Outlined {
            thickness: 2,
            blur_radius: 1,
        },
        StyleParams::Sdf {
            max_distance: 2,
            supersample_scale: 2,
        },
    ]
}

/// Rectangle size of a glyph whose raster is empty.
///
/// Blurring extends the canvas even when there is nothing to blur, so a
/// blank glyph comes out as a transparent `2r` square. SDF returns before
/// any growth.
pub fn blank_glyph_size(style: StyleParams) -> (u32, u32) {
    let blur = match style {
        StyleParams::Simple { blur_radius }
        | StyleParams::Contour { blur_radius, .. }
        | StyleParams::Outlined { blur_radius, .. } => blur_radius,
        StyleParams::Sdf { .. } => 0,
    };
    (2 * blur, 2 * blur)
}

/// Parameters for a 20 px atlas in `style` on square pages.
pub fn params(style: StyleParams, page_size: u32) -> GenerationParams {
    GenerationParams {
        pixel_height: 20,
        page_width: page_size,
        page_height: page_size,
        ..GenerationParams::with_style(style)
    }
}

/// Forty glyphs of varying size plus a space.
pub fn crowded_face() -> SyntheticFace {
    let mut glyphs = vec![BoxGlyph::blank(0x20, 0.25)];
    glyphs.extend((0..40u32).map(|i| {
        let width = 0.1 + (i % 7) as f32 * 0.1;
        let height = 0.2 + (i % 5) as f32 * 0.15;
        BoxGlyph::new(0x21 + i, width, height, width + 0.1)
    }));
    SyntheticFace::new(glyphs)
}

pub fn overlaps(a: &GlyphRecord, b: &GlyphRecord) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Assert that no two non-empty records on the same page overlap and that
/// every record lies inside its page.
pub fn assert_packing_valid(atlas: &FontAtlas) {
    let placed: Vec<&GlyphRecord> = atlas
        .glyphs()
        .iter()
        .filter(|g| g.width > 0 && g.height > 0)
        .collect();

    for glyph in &placed {
        let page = atlas
            .page(glyph.page as usize)
            .unwrap_or_else(|| panic!("glyph {} on missing page {}", glyph.codepoint, glyph.page));
        assert!(glyph.x + glyph.width <= page.width());
        assert!(glyph.y + glyph.height <= page.height());
    }

    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            assert!(
                a.page != b.page || !overlaps(a, b),
                "glyphs {} and {} overlap on page {}",
                a.codepoint,
                b.codepoint,
                a.page
            );
        }
    }
}
