//! End-to-end generation tests on synthetic faces.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{
    all_styles, assert_packing_valid, blank_glyph_size, crowded_face, params,
};
use fontsmith_core::testing::{BoxGlyph, SyntheticFace};
use fontsmith_core::{
    Color, CpuFieldBackend, FieldBackend, FontAtlasBuilder, FontFace, GenerationParams,
    GrayscaleMask, KerningPair, StyleParams, StyleRenderer,
};

#[test]
fn test_packing_never_overlaps_in_any_style() {
    for style in all_styles() {
        let mut face = crowded_face();
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 64))
            .unwrap();

        assert_eq!(atlas.glyphs().len(), 41, "{style:?}");
        assert_eq!(atlas.stats().dropped, 0, "{style:?}");
        assert_packing_valid(&atlas);
    }
}

#[test]
fn test_multiple_pages() {
    let mut face = crowded_face();
    let atlas = FontAtlasBuilder::new()
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 32))
        .unwrap();

    assert!(atlas.page_count() > 1);
    assert_eq!(atlas.stats().pages, atlas.page_count());
    let last_page = atlas.glyphs().iter().map(|g| g.page).max().unwrap();
    assert_eq!(last_page as usize, atlas.page_count() - 1);
    assert_packing_valid(&atlas);

    // Pages are filled in order.
    let pages: Vec<u32> = atlas
        .glyphs()
        .iter()
        .filter(|g| g.width > 0)
        .map(|g| g.page)
        .collect();
    assert!(pages.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_large_page_holds_everything() {
    for style in all_styles() {
        let mut face = SyntheticFace::latin_sample();
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 1024))
            .unwrap();

        assert_eq!(atlas.page_count(), 1);
        assert_eq!(atlas.descriptor("font").page_files.len(), 1);
    }
}

#[test]
fn test_blur_grows_glyph_by_twice_radius() {
    let record = |blur_radius| {
        let mut face = SyntheticFace::latin_sample();
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(StyleParams::Simple { blur_radius }, 256))
            .unwrap();
        *atlas.glyph('A' as u32).unwrap()
    };

    let sharp = record(0);
    let blurred = record(3);
    assert_eq!(blurred.width, sharp.width + 6);
    assert_eq!(blurred.height, sharp.height + 6);
    assert_eq!(blurred.x_offset, sharp.x_offset - 3);
    assert_eq!(blurred.y_offset, sharp.y_offset - 3);
    assert_eq!(blurred.x_advance, sharp.x_advance);
}

#[test]
fn test_stroke_styles_widen_advance() {
    let advance = |style| {
        let mut face = SyntheticFace::latin_sample();
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 256))
            .unwrap();
        (atlas.glyph('A' as u32).unwrap().x_advance, atlas.line_height())
    };

    let (base_advance, base_line) = advance(StyleParams::Simple { blur_radius: 0 });
    for thickness in [1, 2, 5] {
        let (contour, contour_line) = advance(StyleParams::Contour {
            thickness,
            blur_radius: 0,
        });
        assert_eq!(contour, base_advance + thickness as i32);
        assert_eq!(contour_line, base_line + thickness as i32);

        let (outlined, outlined_line) = advance(StyleParams::Outlined {
            thickness,
            blur_radius: 0,
        });
        assert_eq!(outlined, base_advance + 2 * thickness as i32);
        assert_eq!(outlined_line, base_line + 2 * thickness as i32);
    }
}

#[test]
fn test_sdf_space_has_zero_rect() {
    for max_distance in [1, 2, 4, 10] {
        let mut face = SyntheticFace::latin_sample();
        let style = StyleParams::Sdf {
            max_distance,
            supersample_scale: 2,
        };
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 512))
            .unwrap();

        let space = atlas.glyph(' ' as u32).unwrap();
        assert_eq!(
            (space.x, space.y, space.width, space.height, space.page),
            (0, 0, 0, 0, 0),
            "radius {max_distance}"
        );
        assert_eq!(space.x_advance, 5);
    }
}

#[test]
fn test_blank_glyph_grows_with_blur() {
    for style in all_styles() {
        let mut face = SyntheticFace::latin_sample();
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 512))
            .unwrap();

        let space = atlas.glyph(' ' as u32).unwrap();
        assert_eq!((space.width, space.height), blank_glyph_size(style), "{style:?}");
    }

    let mut face = SyntheticFace::latin_sample();
    let atlas = FontAtlasBuilder::new()
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 3 }, 512))
        .unwrap();
    let space = atlas.glyph(' ' as u32).unwrap();
    assert_eq!((space.width, space.height), (6, 6));
    assert_eq!(atlas.stats().empty_glyphs, 0);
}

#[test]
fn test_sdf_metrics_match_output_size() {
    let mut sharp_face = SyntheticFace::latin_sample();
    let sharp = FontAtlasBuilder::new()
        .generate(&mut sharp_face, &params(StyleParams::Simple { blur_radius: 0 }, 256))
        .unwrap();

    let mut sdf_face = SyntheticFace::latin_sample();
    let style = StyleParams::Sdf {
        max_distance: 3,
        supersample_scale: 4,
    };
    let sdf = FontAtlasBuilder::new()
        .generate(&mut sdf_face, &params(style, 256))
        .unwrap();

    let (a, b) = (
        sharp.glyph('A' as u32).unwrap(),
        sdf.glyph('A' as u32).unwrap(),
    );
    assert_eq!(b.x_advance, a.x_advance);
    assert_eq!(b.y_offset, a.y_offset);
    // Padded by the radius, then trimmed by radius - 1 on each side.
    assert_eq!(b.width, a.width + 2);
    assert_eq!(b.height, a.height + 2);
    assert_eq!(sdf.line_height(), sharp.line_height());
}

#[test]
fn test_kerning_pairs() {
    for style in all_styles() {
        let mut face = SyntheticFace::latin_sample().with_kerning('a' as u32, 'o' as u32, -0.01);
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 256))
            .unwrap();

        let kerning = atlas.kerning();
        assert!(kerning.iter().all(|pair| pair.amount != 0), "{style:?}");
        assert!(kerning.contains(&KerningPair {
            left: 'A' as u32,
            right: 'V' as u32,
            amount: -2,
        }));
        // Rounds to zero at 20 px.
        assert!(!kerning.iter().any(|p| p.left == 'a' as u32));
        // Not in the table at all.
        assert!(!kerning.iter().any(|p| p.left == 'A' as u32 && p.right == 'a' as u32));
        assert_eq!(kerning.len(), 2);
    }
}

#[test]
fn test_kerning_skips_unsupported_subtables() {
    use fontsmith_core::testing::{KernSubtable, kern_table};

    let face = SyntheticFace::latin_sample();
    let (a, v) = (face.glyph_of('A' as u32), face.glyph_of('V' as u32));
    let table = kern_table(&[
        KernSubtable::Raw {
            version: 0,
            coverage: 0x0003,
            body: vec![0; 8],
        },
        KernSubtable::Pairs(vec![(a, v, -100)]),
    ]);
    let mut face = face.with_raw_kern_table(table);

    let atlas = FontAtlasBuilder::new()
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 256))
        .unwrap();
    assert_eq!(
        atlas.kerning(),
        [KerningPair {
            left: 'A' as u32,
            right: 'V' as u32,
            amount: -2
        }]
    );
}

#[test]
fn test_aliased_codepoints_share_kerning() {
    // U+0391 GREEK CAPITAL ALPHA drawn with the 'A' glyph.
    let mut face = SyntheticFace::latin_sample().with_alias(0x391, 'A' as u32);
    let atlas = FontAtlasBuilder::new()
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 256))
        .unwrap();

    assert!(atlas.glyph('A' as u32).is_some());
    assert!(atlas.glyph(0x391).is_some());
    // The glyph maps back to the last codepoint visited for it.
    assert!(atlas.kerning().iter().any(|p| p.left == 0x391 && p.right == 'V' as u32));
}

#[test]
fn test_tiny_page_drops_every_inked_glyph() {
    let mut face = SyntheticFace::new(vec![
        BoxGlyph::new('A' as u32, 0.6, 0.7, 0.65),
        BoxGlyph::new('B' as u32, 0.5, 0.7, 0.6),
        BoxGlyph::new('.' as u32, 0.1, 0.1, 0.25),
    ]);
    for style in all_styles() {
        let atlas = FontAtlasBuilder::new()
            .generate(&mut face, &params(style, 1))
            .unwrap();

        assert!(atlas.glyphs().is_empty(), "{style:?}");
        assert_eq!(atlas.stats().dropped, 3);
        assert_eq!(atlas.page_count(), 1);
    }
}

#[test]
fn test_tiny_page_keeps_blank_glyphs() {
    let mut face = SyntheticFace::latin_sample();
    let atlas = FontAtlasBuilder::new()
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 1))
        .unwrap();

    let ids: Vec<u32> = atlas.glyphs().iter().map(|g| g.codepoint).collect();
    assert_eq!(ids, [' ' as u32]);
    assert_eq!(atlas.stats().dropped, 5);
}

#[test]
fn test_half_alpha_main_color() {
    let params = GenerationParams {
        main_color: Color::new(1.0, 1.0, 1.0, 0.5),
        ..params(StyleParams::Simple { blur_radius: 0 }, 256)
    };

    let mut face = SyntheticFace::latin_sample();
    face.set_pixel_size(params.raster_pixel_size());
    let rendered = StyleRenderer::new(&params, &CpuFieldBackend).render(&face, face.glyph_of('A' as u32));
    assert_eq!(rendered.image.get_pixel(4, 4).0, [1.0, 1.0, 1.0, 0.5]);

    let atlas = FontAtlasBuilder::new().generate(&mut face, &params).unwrap();
    let a = atlas.glyph('A' as u32).unwrap();
    let pixel = atlas.page(0).unwrap().get_pixel(a.x + 4, a.y + 4);
    assert_eq!(pixel.0, [255, 255, 255, 128]);
}

#[test]
fn test_outlined_inner_glyph_in_main_color() {
    let params = GenerationParams {
        main_color: Color::new(1.0, 0.0, 0.0, 1.0),
        stroke_color: Color::BLACK,
        ..params(
            StyleParams::Outlined {
                thickness: 2,
                blur_radius: 0,
            },
            256,
        )
    };
    let mut face = SyntheticFace::latin_sample();
    let atlas = FontAtlasBuilder::new().generate(&mut face, &params).unwrap();

    let a = atlas.glyph('A' as u32).unwrap();
    let page = atlas.page(0).unwrap();
    assert_eq!(page.get_pixel(a.x, a.y).0, [0, 0, 0, 255]);
    assert_eq!(page.get_pixel(a.x + a.width / 2, a.y + a.height / 2).0, [255, 0, 0, 255]);
}

struct CountingBackend {
    calls: Rc<Cell<usize>>,
}

impl FieldBackend for CountingBackend {
    fn distance_field(&self, mask: &GrayscaleMask, radius: u32, scale: u32) -> GrayscaleMask {
        self.calls.set(self.calls.get() + 1);
        CpuFieldBackend.distance_field(mask, radius, scale)
    }
}

#[test]
fn test_custom_field_backend() {
    let calls = Rc::new(Cell::new(0));
    let builder = FontAtlasBuilder::new().with_field_backend(CountingBackend {
        calls: Rc::clone(&calls),
    });

    let mut face = SyntheticFace::latin_sample();
    let style = StyleParams::Sdf {
        max_distance: 2,
        supersample_scale: 2,
    };
    let atlas = builder.generate(&mut face, &params(style, 512)).unwrap();

    // Every glyph except the space reaches the backend.
    assert_eq!(calls.get(), 5);
    assert_eq!(atlas.stats().empty_glyphs, 1);
}

#[test]
fn test_regeneration_is_independent() {
    let builder = FontAtlasBuilder::new();
    let mut face = SyntheticFace::latin_sample();

    let first = builder
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 256))
        .unwrap();
    let second = builder
        .generate(&mut face, &params(StyleParams::Simple { blur_radius: 0 }, 256))
        .unwrap();

    assert_eq!(first.glyphs(), second.glyphs());
    assert_eq!(first.pages(), second.pages());
}
