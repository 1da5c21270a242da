//! Atlas generation.
//!
//! [`FontAtlasBuilder`] runs one synchronous pass over every codepoint of a
//! face: each glyph is rendered in the requested style, packed onto the
//! current page (opening a new page when it is full), and recorded. After
//! the pass, kerning is extracted for the glyphs that were visited.
//!
//! The resulting [`FontAtlas`] owns its pages and records; nothing is shared
//! with later generations.
//!
//! # Example
//!
//! ```no_run
//! use fontsmith_core::{FontAtlasBuilder, GenerationParams};
//!
//! let atlas = FontAtlasBuilder::new()
//!     .generate_from_file("DejaVuSans.ttf", &GenerationParams::default())?;
//! println!("{}", atlas.stats());
//! atlas.save("dejavu")?;
//! # Ok::<(), fontsmith_core::AtlasError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tracing::{info, trace, warn};

use crate::config::{GenerationParams, StyleParams};
use crate::descriptor::{BmFontXml, DescriptorFormat, FontDescriptor, GlyphRecord, write_atomic};
use crate::error::{AtlasError, AtlasResult};
use crate::face::{FontFace, GlyphId};
use crate::kerning::{KerningPair, KerningTableParser};
use crate::metrics::face_metrics;
use crate::packing::{AtlasPageSet, PackedRect};
use crate::sdf::{CpuFieldBackend, FieldBackend};
use crate::style::StyleRenderer;
use crate::ttf::TtfFace;

// ============================================================================
// FontAtlas
// ============================================================================

/// Counters collected during one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationStats {
    /// Glyph records produced, empty glyphs included.
    pub glyphs: usize,
    /// Records with a zero-size rectangle.
    pub empty_glyphs: usize,
    /// Glyphs skipped because they did not fit on a fresh page.
    pub dropped: usize,
    pub pages: usize,
    pub kerning_pairs: usize,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} glyphs ({} empty, {} dropped) on {} page(s), {} kerning pairs",
            self.glyphs, self.empty_glyphs, self.dropped, self.pages, self.kerning_pairs
        )
    }
}

/// What [`FontAtlas::save`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The atlas has no pages or no glyphs; nothing was written.
    NothingToSave,
    /// The descriptor and page images were written.
    Saved {
        descriptor: PathBuf,
        pages: Vec<PathBuf>,
    },
}

/// The result of one generation: page images plus glyph and kerning tables.
#[derive(Debug, Clone)]
pub struct FontAtlas {
    face_name: String,
    params: GenerationParams,
    line_height: i32,
    pages: Vec<RgbaImage>,
    glyphs: Vec<GlyphRecord>,
    has_kerning: bool,
    kerning: Vec<KerningPair>,
    stats: GenerationStats,
}

impl FontAtlas {
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// One page image, for previews.
    pub fn page(&self, index: usize) -> Option<&RgbaImage> {
        self.pages.get(index)
    }

    pub fn pages(&self) -> &[RgbaImage] {
        &self.pages
    }

    /// Glyph records in codepoint order.
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    /// Record of one codepoint, if it was packed.
    pub fn glyph(&self, codepoint: u32) -> Option<&GlyphRecord> {
        self.glyphs.iter().find(|g| g.codepoint == codepoint)
    }

    pub fn kerning(&self) -> &[KerningPair] {
        &self.kerning
    }

    /// Whether the face reported kerning, even if no pair survived.
    pub fn has_kerning(&self) -> bool {
        self.has_kerning
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn face_name(&self) -> &str {
        &self.face_name
    }

    /// The validated parameters the atlas was generated with.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    pub fn stats(&self) -> GenerationStats {
        self.stats
    }

    /// Build the descriptor, naming page images `<page_stem>_<index>.png`.
    pub fn descriptor(&self, page_stem: &str) -> FontDescriptor {
        FontDescriptor {
            face: self.face_name.clone(),
            size: self.params.pixel_height,
            line_height: self.line_height,
            page_files: (0..self.pages.len())
                .map(|i| page_file_name(page_stem, i))
                .collect(),
            glyphs: self.glyphs.clone(),
            kerning: self.has_kerning.then(|| self.kerning.clone()),
        }
    }

    /// Save as BMFont XML plus PNG pages.
    ///
    /// See [`save_with`](Self::save_with).
    pub fn save(&self, path: impl AsRef<Path>) -> AtlasResult<SaveOutcome> {
        self.save_with(path, &BmFontXml)
    }

    /// Write the descriptor to `path` and every page next to it.
    ///
    /// Without an extension, `path` gets `.sdf` for distance field atlases
    /// and `.fnt` otherwise. Pages are written as `<stem>_<index>.png` in the
    /// descriptor's directory. An atlas without pages or glyphs is not
    /// written at all.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::Image`] if a page cannot be written and
    /// [`AtlasError::Io`] if the descriptor cannot be written.
    pub fn save_with(
        &self,
        path: impl AsRef<Path>,
        format: &dyn DescriptorFormat,
    ) -> AtlasResult<SaveOutcome> {
        if self.pages.is_empty() || self.glyphs.is_empty() {
            info!(target: "fontsmith::builder", "nothing generated, skipping save");
            return Ok(SaveOutcome::NothingToSave);
        }

        let mut descriptor_path = path.as_ref().to_path_buf();
        if descriptor_path.extension().is_none() {
            descriptor_path.set_extension(self.params.style.kind().file_extension());
        }
        let stem = descriptor_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AtlasError::InvalidParams(format!(
                    "save path {} has no file name",
                    descriptor_path.display()
                ))
            })?;
        let dir = descriptor_path.parent().unwrap_or(Path::new(""));

        let descriptor = self.descriptor(&stem);
        let mut page_paths = Vec::with_capacity(self.pages.len());
        for (page, file) in self.pages.iter().zip(&descriptor.page_files) {
            let page_path = dir.join(file);
            page.save_with_format(&page_path, ImageFormat::Png)
                .map_err(|source| AtlasError::Image {
                    path: page_path.clone(),
                    source,
                })?;
            page_paths.push(page_path);
        }

        write_atomic(&descriptor_path, &format.encode(&descriptor))?;

        info!(
            target: "fontsmith::builder",
            path = %descriptor_path.display(),
            pages = page_paths.len(),
            "atlas saved"
        );
        Ok(SaveOutcome::Saved {
            descriptor: descriptor_path,
            pages: page_paths,
        })
    }
}

fn page_file_name(stem: &str, index: usize) -> String {
    format!("{stem}_{index}.png")
}

// ============================================================================
// FontAtlasBuilder
// ============================================================================

/// Generates font atlases.
///
/// The builder holds the distance field backend; everything else is passed
/// per call, so one builder can run any number of generations.
pub struct FontAtlasBuilder {
    field_backend: Box<dyn FieldBackend>,
}

impl Default for FontAtlasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FontAtlasBuilder {
    /// A builder using [`CpuFieldBackend`].
    pub fn new() -> Self {
        Self {
            field_backend: Box::new(CpuFieldBackend),
        }
    }

    /// Replace the distance field backend.
    pub fn with_field_backend(mut self, backend: impl FieldBackend + 'static) -> Self {
        self.field_backend = Box::new(backend);
        self
    }

    /// Load a TrueType/OpenType file and generate an atlas from its first face.
    ///
    /// # Errors
    ///
    /// Parameters are checked before the file is opened. A missing or
    /// unparsable font fails with [`AtlasError::FontLoad`].
    pub fn generate_from_file(
        &self,
        path: impl AsRef<Path>,
        params: &GenerationParams,
    ) -> AtlasResult<FontAtlas> {
        let path = path.as_ref();
        params.validated()?;

        let data = std::fs::read(path).map_err(|e| AtlasError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut face = TtfFace::from_bytes(&data, 0).map_err(|e| AtlasError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        self.generate(&mut face, params)
    }

    /// Generate an atlas from a face.
    ///
    /// The face is resized to the requested pixel height (times the
    /// supersampling scale for distance fields).
    ///
    /// # Errors
    ///
    /// Only invalid parameters fail. Glyphs that do not fit on an empty page
    /// are skipped and counted in [`GenerationStats::dropped`].
    pub fn generate(
        &self,
        face: &mut dyn FontFace,
        params: &GenerationParams,
    ) -> AtlasResult<FontAtlas> {
        let params = params.validated()?;
        let scale = params.style.supersample_scale();
        face.set_pixel_size(params.raster_pixel_size());

        let face_name = display_name(&*face);
        info!(
            target: "fontsmith::builder",
            face = %face_name,
            style = %params.style.kind(),
            pixel_height = params.pixel_height,
            page_width = params.page_width,
            page_height = params.page_height,
            "generating atlas"
        );

        let mut pages =
            AtlasPageSet::new(params.page_width, params.page_height, params.page_clear_color());
        let renderer = StyleRenderer::new(&params, self.field_backend.as_ref());

        let mut glyphs = Vec::new();
        let mut visited: HashMap<GlyphId, u32> = HashMap::new();
        let mut line_height = None;
        let mut stats = GenerationStats::default();

        for (codepoint, glyph) in face.codepoints() {
            let rendered = renderer.render(&*face, glyph);
            line_height = Some(rendered.metrics.line_height);
            visited.insert(glyph, codepoint);

            // A blurred blank glyph is a transparent 2r square and gets packed.
            let rect = if rendered.is_empty() {
                stats.empty_glyphs += 1;
                PackedRect::default()
            } else {
                match pages.pack(&rendered.image) {
                    Some(rect) => inset(rect, rendered.rect_inset),
                    None => {
                        warn!(
                            target: "fontsmith::builder",
                            codepoint,
                            width = rendered.image.width(),
                            height = rendered.image.height(),
                            "glyph does not fit on an empty page, skipping"
                        );
                        stats.dropped += 1;
                        continue;
                    }
                }
            };

            trace!(
                target: "fontsmith::builder",
                codepoint,
                page = rect.page,
                x = rect.x,
                y = rect.y,
                "packed glyph"
            );
            glyphs.push(GlyphRecord {
                codepoint,
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                x_offset: rendered.metrics.x_offset,
                y_offset: rendered.metrics.y_offset,
                x_advance: rendered.metrics.x_advance,
                page: rect.page,
            });
        }

        let has_kerning = face.has_kerning();
        let kerning = KerningTableParser::new(&visited, scale).parse(&*face);
        let line_height = line_height.unwrap_or_else(|| styled_line_height(&*face, &params.style));
        let pages = pages.into_pages();

        stats.glyphs = glyphs.len();
        stats.pages = pages.len();
        stats.kerning_pairs = kerning.len();
        info!(
            target: "fontsmith::builder",
            glyphs = stats.glyphs,
            empty = stats.empty_glyphs,
            dropped = stats.dropped,
            pages = stats.pages,
            kerning_pairs = stats.kerning_pairs,
            "atlas generated"
        );

        Ok(FontAtlas {
            face_name,
            params,
            line_height,
            pages,
            glyphs,
            has_kerning,
            kerning,
            stats,
        })
    }
}

fn display_name(face: &dyn FontFace) -> String {
    let family = face.family_name();
    let style = face.style_name();
    match (family.is_empty(), style.is_empty()) {
        (_, true) => family,
        (true, false) => style,
        (false, false) => format!("{family} {style}"),
    }
}

/// Shrink a packed rectangle by `amount` on every side.
fn inset(rect: PackedRect, amount: u32) -> PackedRect {
    PackedRect {
        x: rect.x.saturating_add(amount),
        y: rect.y.saturating_add(amount),
        width: rect.width.saturating_sub(amount.saturating_mul(2)),
        height: rect.height.saturating_sub(amount.saturating_mul(2)),
        page: rect.page,
    }
}

/// Line height of a face without glyphs, with the style's growth applied the
/// same way glyph rendering applies it.
fn styled_line_height(face: &dyn FontFace, style: &StyleParams) -> i32 {
    let base = face_metrics(&face.size_metrics(), face.vertical_hints().as_ref()).line_height;
    match *style {
        StyleParams::Simple { .. } => base,
        StyleParams::Contour { thickness, .. } => base + thickness as i32,
        StyleParams::Outlined { thickness, .. } => base + 2 * thickness as i32,
        StyleParams::Sdf {
            supersample_scale, ..
        } => base / supersample_scale.max(1) as i32,
    }
}
