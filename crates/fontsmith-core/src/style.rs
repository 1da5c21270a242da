//! Per-style glyph rendering.
//!
//! Each style turns one glyph of a [`FontFace`] into a colored RGBA image
//! plus layout metrics with the style's growth already folded in:
//!
//! | Style    | Image                                            | Metric change                        |
//! |----------|--------------------------------------------------|--------------------------------------|
//! | Simple   | glyph coverage in the main color                 | offsets shift by `-blur`             |
//! | Contour  | ring stroke of `thickness` in the stroke color   | advance, line height `+thickness`    |
//! | Outlined | main-color glyph over a stroke-color silhouette  | advance, line height `+2*thickness`  |
//! | SDF      | distance field, white with the field as alpha    | everything divided by the supersample|
//!
//! Coverage masks become images with [`colorize`]: every pixel takes the
//! color's RGB and `coverage * alpha`, in straight alpha.

use image::{Rgba, Rgba32FImage};
use tracing::trace;

use crate::color::Color;
use crate::config::{GenerationParams, StyleParams};
use crate::face::{FontFace, GlyphId, GlyphRaster, Stroke};
use crate::mask::GrayscaleMask;
use crate::metrics::{GlyphMetrics, glyph_metrics};
use crate::sdf::FieldBackend;

/// A styled glyph ready for packing.
#[derive(Debug, Clone)]
pub struct RenderedGlyph {
    /// Straight-alpha RGBA image; zero-sized for glyphs without ink.
    pub image: Rgba32FImage,
    /// Layout metrics including the style's growth.
    pub metrics: GlyphMetrics,
    /// Pixels trimmed from each side of the packed rectangle when recorded.
    pub rect_inset: u32,
}

impl RenderedGlyph {
    /// Whether the image has zero area.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }
}

/// Paint a coverage mask with a single color.
pub fn colorize(mask: &GrayscaleMask, color: Color) -> Rgba32FImage {
    Rgba32FImage::from_fn(mask.width() as u32, mask.height() as u32, |x, y| {
        let coverage = mask.get(x as usize, y as usize);
        Rgba([color.r, color.g, color.b, coverage * color.a])
    })
}

/// Renders glyphs in one style.
pub struct StyleRenderer<'a> {
    style: StyleParams,
    main_color: Color,
    stroke_color: Color,
    field_backend: &'a dyn FieldBackend,
}

impl<'a> StyleRenderer<'a> {
    /// Create a renderer for validated parameters.
    ///
    /// The face passed to [`render`](Self::render) must already be sized to
    /// [`GenerationParams::raster_pixel_size`].
    pub fn new(params: &GenerationParams, field_backend: &'a dyn FieldBackend) -> Self {
        Self {
            style: params.style,
            main_color: params.main_color,
            stroke_color: params.stroke_color,
            field_backend,
        }
    }

    /// Render one glyph.
    pub fn render(&self, face: &dyn FontFace, glyph: GlyphId) -> RenderedGlyph {
        // Metrics come from the unstroked outline.
        let metrics = glyph_metrics(face, glyph);

        let rendered = match self.style {
            StyleParams::Simple { blur_radius } => self.simple(face, glyph, metrics, blur_radius),
            StyleParams::Contour {
                thickness,
                blur_radius,
            } => self.contour(face, glyph, metrics, thickness, blur_radius),
            StyleParams::Outlined {
                thickness,
                blur_radius,
            } => self.outlined(face, glyph, metrics, thickness, blur_radius),
            StyleParams::Sdf {
                max_distance,
                supersample_scale,
            } => self.sdf(face, glyph, metrics, max_distance, supersample_scale),
        };

        trace!(
            target: "fontsmith::style",
            glyph,
            width = rendered.image.width(),
            height = rendered.image.height(),
            "rendered glyph"
        );
        rendered
    }

    fn simple(
        &self,
        face: &dyn FontFace,
        glyph: GlyphId,
        mut metrics: GlyphMetrics,
        blur: u32,
    ) -> RenderedGlyph {
        let mut mask = GrayscaleMask::from_bitmap(&face.rasterize(glyph, GlyphRaster::GRAY));
        apply_blur(&mut mask, &mut metrics, blur);

        RenderedGlyph {
            image: colorize(&mask, self.main_color),
            metrics,
            rect_inset: 0,
        }
    }

    fn contour(
        &self,
        face: &dyn FontFace,
        glyph: GlyphId,
        mut metrics: GlyphMetrics,
        thickness: u32,
        blur: u32,
    ) -> RenderedGlyph {
        let ring = Stroke::Ring {
            width: thickness as f32,
        };
        let mut mask = GrayscaleMask::from_bitmap(&face.rasterize(glyph, GlyphRaster::stroked(ring)));

        // The ring reaches half the thickness past the outline on each side.
        metrics.x_advance += thickness as i32;
        metrics.line_height += thickness as i32;
        apply_blur(&mut mask, &mut metrics, blur);

        RenderedGlyph {
            image: colorize(&mask, self.stroke_color),
            metrics,
            rect_inset: 0,
        }
    }

    fn outlined(
        &self,
        face: &dyn FontFace,
        glyph: GlyphId,
        mut metrics: GlyphMetrics,
        thickness: u32,
        blur: u32,
    ) -> RenderedGlyph {
        let normal = face.rasterize(glyph, GlyphRaster::GRAY);
        let border = Stroke::Border {
            radius: thickness as f32,
        };
        let inflated = face.rasterize(glyph, GlyphRaster::stroked(border));

        // The stroke is not always exactly `thickness` wide, so place the
        // inner glyph by the bitmaps' own origins.
        let mut dx = normal.left - inflated.left;
        let mut dy = inflated.top - normal.top;

        let inner = GrayscaleMask::from_bitmap(&normal);
        let mut outer = GrayscaleMask::from_bitmap(&inflated);
        if blur > 0 {
            apply_blur(&mut outer, &mut metrics, blur);
            dx += blur as i32;
            dy += blur as i32;
        }

        let mut image = colorize(&outer, self.stroke_color);
        if self.main_color != self.stroke_color {
            overwrite(&mut image, &inner, dx, dy, self.main_color);
        }

        metrics.line_height += 2 * thickness as i32;
        metrics.x_advance += 2 * thickness as i32;

        RenderedGlyph {
            image,
            metrics,
            rect_inset: 0,
        }
    }

    fn sdf(
        &self,
        face: &dyn FontFace,
        glyph: GlyphId,
        metrics: GlyphMetrics,
        radius: u32,
        scale: u32,
    ) -> RenderedGlyph {
        let scale = scale.max(1);
        let radius = radius.max(1);
        let divisor = scale as i32;
        let metrics = GlyphMetrics {
            line_height: metrics.line_height / divisor,
            x_offset: metrics.x_offset / divisor,
            y_offset: metrics.y_offset / divisor,
            x_advance: metrics.x_advance / divisor,
        };

        let bitmap = face.rasterize(glyph, GlyphRaster::MONO);
        if bitmap.is_empty() {
            return RenderedGlyph {
                image: Rgba32FImage::new(0, 0),
                metrics,
                rect_inset: 0,
            };
        }

        let field_radius = radius * scale;
        let mut mask = GrayscaleMask::from_bitmap(&bitmap);
        mask.extend(field_radius as i32);
        let field = self
            .field_backend
            .distance_field(&mask, field_radius, scale);

        RenderedGlyph {
            image: colorize(&field, Color::WHITE),
            metrics,
            rect_inset: radius - 1,
        }
    }
}

/// Blur the mask and shift the offsets so the blurred image stays centered
/// on the sharp glyph.
fn apply_blur(mask: &mut GrayscaleMask, metrics: &mut GlyphMetrics, blur: u32) {
    if blur == 0 {
        return;
    }
    mask.blur(blur as i32);
    metrics.x_offset -= blur as i32;
    metrics.y_offset -= blur as i32;
}

/// Write `mask` painted in `color` over `image` at `(dx, dy)`.
///
/// This is not alpha blending: each channel, alpha included, moves from the
/// background value toward `color` by the mask coverage. Pixels landing
/// outside the image are ignored.
fn overwrite(image: &mut Rgba32FImage, mask: &GrayscaleMask, dx: i32, dy: i32, color: Color) {
    let front = color.to_array();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let (tx, ty) = (x as i64 + i64::from(dx), y as i64 + i64::from(dy));
            if tx < 0 || ty < 0 || tx >= i64::from(image.width()) || ty >= i64::from(image.height())
            {
                continue;
            }
            let coverage = mask.get(x, y);
            let back = image.get_pixel_mut(tx as u32, ty as u32);
            for (channel, value) in back.0.iter_mut().zip(front) {
                *channel = coverage * value + *channel * (1.0 - coverage);
            }
        }
    }
}
