//! A synthetic [`FontFace`] for tests and front-end development.
//!
//! [`SyntheticFace`] draws every glyph as a solid rectangle whose size is a
//! fraction of the pixel size, so results are predictable at any scale and
//! no font file is needed. Stroking grows the rectangle, blank glyphs
//! rasterize to nothing, and kerning comes from a real `kern` table built
//! by [`kern_table`].
//!
//! # Example
//!
//! ```
//! use fontsmith_core::testing::SyntheticFace;
//! use fontsmith_core::{FontAtlasBuilder, GenerationParams, StyleParams};
//!
//! let mut face = SyntheticFace::latin_sample();
//! let params = GenerationParams::with_style(StyleParams::Simple { blur_radius: 0 });
//! let atlas = FontAtlasBuilder::new().generate(&mut face, &params).unwrap();
//! assert_eq!(atlas.page_count(), 1);
//! ```

use std::collections::HashMap;

use crate::face::{
    Bitmap, FontFace, GlyphId, GlyphOutlineMetrics, GlyphRaster, SizeMetrics, Stroke,
    VerticalHints,
};

/// One rectangle glyph, sized in ems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGlyph {
    pub codepoint: u32,
    /// Box width; zero makes a blank glyph.
    pub width: f32,
    /// Box height above the baseline; zero makes a blank glyph.
    pub height: f32,
    /// Pen origin to the box's left edge.
    pub bearing_x: f32,
    pub advance: f32,
}

impl BoxGlyph {
    pub fn new(codepoint: u32, width: f32, height: f32, advance: f32) -> Self {
        Self {
            codepoint,
            width,
            height,
            bearing_x: 0.05,
            advance,
        }
    }

    /// A glyph with an advance but no ink, like a space.
    pub fn blank(codepoint: u32, advance: f32) -> Self {
        Self::new(codepoint, 0.0, 0.0, advance)
    }
}

/// Rectangle-glyph font face.
#[derive(Debug, Clone)]
pub struct SyntheticFace {
    glyphs: Vec<BoxGlyph>,
    aliases: Vec<(u32, GlyphId)>,
    kerning: HashMap<(GlyphId, GlyphId), f32>,
    kern_override: Option<Vec<u8>>,
    hints: Option<VerticalHints>,
    pixel_size: u32,
    kern_table: Option<Vec<u8>>,
}

fn px(em: f32, pixel_size: u32) -> i64 {
    (em * pixel_size as f32).round() as i64
}

impl SyntheticFace {
    /// A face with the given glyphs; glyph ids are assigned from 1 in order.
    pub fn new(glyphs: Vec<BoxGlyph>) -> Self {
        Self {
            glyphs,
            aliases: Vec::new(),
            kerning: HashMap::new(),
            kern_override: None,
            hints: None,
            pixel_size: 0,
            kern_table: None,
        }
    }

    /// Space, 'A', 'V', 'a', 'o' and '.', with kerning between A and V.
    pub fn latin_sample() -> Self {
        Self::new(vec![
            BoxGlyph::blank(' ' as u32, 0.25),
            BoxGlyph::new('.' as u32, 0.1, 0.1, 0.25),
            BoxGlyph::new('A' as u32, 0.6, 0.7, 0.65),
            BoxGlyph::new('V' as u32, 0.6, 0.7, 0.65),
            BoxGlyph::new('a' as u32, 0.45, 0.5, 0.55),
            BoxGlyph::new('o' as u32, 0.45, 0.5, 0.55),
        ])
        .with_kerning('A' as u32, 'V' as u32, -0.1)
        .with_kerning('V' as u32, 'A' as u32, -0.1)
    }

    /// Add a kerning pair between two codepoints, amount in ems.
    ///
    /// # Panics
    ///
    /// Panics if either codepoint has no glyph.
    pub fn with_kerning(mut self, left: u32, right: u32, amount: f32) -> Self {
        let (l, r) = (self.glyph_of(left), self.glyph_of(right));
        self.kerning.insert((l, r), amount);
        self.rebuild_kern_table();
        self
    }

    /// Map an extra codepoint to the glyph of `target`.
    ///
    /// # Panics
    ///
    /// Panics if `target` has no glyph.
    pub fn with_alias(mut self, codepoint: u32, target: u32) -> Self {
        let glyph = self.glyph_of(target);
        self.aliases.push((codepoint, glyph));
        self
    }

    /// Replace the generated `kern` table with raw bytes.
    pub fn with_raw_kern_table(mut self, table: Vec<u8>) -> Self {
        self.kern_override = Some(table);
        self.rebuild_kern_table();
        self
    }

    /// Report OS/2 vertical hints.
    pub fn with_hints(mut self, hints: VerticalHints) -> Self {
        self.hints = Some(hints);
        self
    }

    /// Glyph id of a codepoint.
    ///
    /// # Panics
    ///
    /// Panics if the codepoint has no glyph.
    pub fn glyph_of(&self, codepoint: u32) -> GlyphId {
        self.glyphs
            .iter()
            .position(|g| g.codepoint == codepoint)
            .map(|i| (i + 1) as GlyphId)
            .unwrap_or_else(|| panic!("no glyph for U+{codepoint:04X}"))
    }

    fn glyph(&self, glyph: GlyphId) -> Option<&BoxGlyph> {
        self.glyphs.get(usize::from(glyph).checked_sub(1)?)
    }

    fn rebuild_kern_table(&mut self) {
        self.kern_table = match &self.kern_override {
            Some(raw) => Some(raw.clone()),
            None if self.kerning.is_empty() => None,
            None => {
                // Raw table values are design units at 1000 units per em.
                let mut pairs: Vec<(GlyphId, GlyphId, i16)> = self
                    .kerning
                    .iter()
                    .map(|(&(l, r), &em)| (l, r, (em * 1000.0) as i16))
                    .collect();
                pairs.sort_unstable();
                Some(kern_table(&[KernSubtable::Pairs(pairs)]))
            }
        };
    }

    /// Box size in pixels at the current size, `None` for blank glyphs.
    fn box_size(&self, glyph: &BoxGlyph) -> Option<(usize, usize)> {
        let w = px(glyph.width, self.pixel_size);
        let h = px(glyph.height, self.pixel_size);
        (w > 0 && h > 0).then_some((w as usize, h as usize))
    }
}

impl FontFace for SyntheticFace {
    fn family_name(&self) -> String {
        "Synthetic".into()
    }

    fn style_name(&self) -> String {
        "Regular".into()
    }

    fn set_pixel_size(&mut self, pixels: u32) {
        self.pixel_size = pixels;
    }

    fn codepoints(&self) -> Vec<(u32, GlyphId)> {
        let mut all: Vec<(u32, GlyphId)> = self
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| (g.codepoint, (i + 1) as GlyphId))
            .chain(self.aliases.iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup_by_key(|(cp, _)| *cp);
        all
    }

    fn size_metrics(&self) -> SizeMetrics {
        let p = self.pixel_size;
        SizeMetrics {
            ascender: px(0.8, p) * 64,
            descender: -px(0.2, p) * 64,
            height: px(1.2, p) * 64,
            y_ppem: u16::try_from(p).unwrap_or(u16::MAX),
            units_per_em: 1000,
        }
    }

    fn vertical_hints(&self) -> Option<VerticalHints> {
        self.hints
    }

    fn glyph_metrics(&self, glyph: GlyphId) -> GlyphOutlineMetrics {
        let Some(g) = self.glyph(glyph) else {
            return GlyphOutlineMetrics::default();
        };
        let p = self.pixel_size;
        GlyphOutlineMetrics {
            bearing_x: px(g.bearing_x, p) * 64,
            bearing_y: px(g.height, p) * 64,
            advance: px(g.advance, p) * 64,
        }
    }

    fn rasterize(&self, glyph: GlyphId, raster: GlyphRaster) -> Bitmap {
        let Some(g) = self.glyph(glyph) else {
            return Bitmap::empty();
        };
        let Some((w, h)) = self.box_size(g) else {
            return Bitmap::empty();
        };
        let left = px(g.bearing_x, self.pixel_size) as i32;

        let (grow, band) = match raster.stroke {
            Stroke::None => (0, None),
            Stroke::Ring { width } if width <= 0.0 => return Bitmap::empty(),
            Stroke::Ring { width } => {
                let half = (width / 2.0).ceil() as usize;
                (half, Some(half * 2))
            }
            Stroke::Border { radius } => (radius.max(0.0).ceil() as usize, None),
        };

        let (bw, bh) = (w + grow * 2, h + grow * 2);
        let coverage = (0..bh)
            .flat_map(|y| (0..bw).map(move |x| (x, y)))
            .map(|(x, y)| match band {
                Some(band) => {
                    let in_band = x < band || y < band || x + band >= bw || y + band >= bh;
                    if in_band { 255 } else { 0 }
                }
                None => 255,
            })
            .collect();

        Bitmap {
            width: bw,
            height: bh,
            left: left - grow as i32,
            top: (h + grow) as i32,
            coverage,
        }
    }

    fn table(&self, tag: [u8; 4]) -> Option<&[u8]> {
        match &tag {
            b"kern" => self.kern_table.as_deref(),
            _ => None,
        }
    }

    fn has_kerning(&self) -> bool {
        self.kern_table.is_some()
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> i64 {
        self.kerning
            .get(&(left, right))
            .map_or(0, |&em| (em * self.pixel_size as f32 * 64.0).round() as i64)
    }
}

// ============================================================================
// kern table assembly
// ============================================================================

/// One subtable of a hand-assembled `kern` table.
#[derive(Debug, Clone)]
pub enum KernSubtable {
    /// Horizontal format 0 pairs (left glyph, right glyph, value).
    Pairs(Vec<(GlyphId, GlyphId, i16)>),
    /// A subtable with arbitrary version, coverage and body.
    Raw {
        version: u16,
        coverage: u16,
        body: Vec<u8>,
    },
}

/// Assemble a version 0 `kern` table, big-endian as stored in font files.
pub fn kern_table(subtables: &[KernSubtable]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes());
    out.extend_from_slice(&(subtables.len() as u16).to_be_bytes());

    for subtable in subtables {
        let (version, coverage, body) = match subtable {
            KernSubtable::Pairs(pairs) => {
                let mut body = Vec::new();
                body.extend_from_slice(&(pairs.len() as u16).to_be_bytes());
                // searchRange, entrySelector, rangeShift are not used by readers here.
                body.extend_from_slice(&[0; 6]);
                for &(l, r, v) in pairs {
                    body.extend_from_slice(&l.to_be_bytes());
                    body.extend_from_slice(&r.to_be_bytes());
                    body.extend_from_slice(&v.to_be_bytes());
                }
                (0u16, 0x0001u16, body)
            }
            KernSubtable::Raw {
                version,
                coverage,
                body,
            } => (*version, *coverage, body.clone()),
        };

        let length = (6 + body.len()) as u16;
        out.extend_from_slice(&version.to_be_bytes());
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&coverage.to_be_bytes());
        out.extend_from_slice(&body);
    }
    out
}
