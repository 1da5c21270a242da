//! Generation parameters.
//!
//! [`GenerationParams`] is the full input of one generation request. The
//! style-specific knobs live in [`StyleParams`], one variant per style with
//! named fields, so a blur radius can never be mistaken for a stroke width.
//!
//! Both types are serde-enabled and read naturally from TOML:
//!
//! ```
//! use fontsmith_core::{GenerationParams, StyleParams};
//!
//! let params: GenerationParams = toml::from_str(r##"
//!     pixel_height = 32
//!     main_color = "#ffcc00"
//!
//!     [style]
//!     kind = "outlined"
//!     thickness = 2
//!     blur_radius = 0
//! "##).unwrap();
//!
//! assert_eq!(params.style, StyleParams::Outlined { thickness: 2, blur_radius: 0 });
//! assert_eq!(params.page_width, 1024);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{AtlasError, AtlasResult};

/// Default nominal pixel height.
pub const DEFAULT_PIXEL_HEIGHT: u32 = 60;

/// Default atlas page edge length.
pub const DEFAULT_PAGE_SIZE: u32 = 1024;

/// Default SDF field radius, in output pixels.
pub const DEFAULT_SDF_DISTANCE: u32 = 10;

/// Default SDF supersampling factor.
pub const DEFAULT_SDF_SCALE: u32 = 8;

// ============================================================================
// Style
// ============================================================================

/// Style tag without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Plain anti-aliased glyphs, optionally blurred.
    Simple,
    /// Only the stroked outline of each glyph.
    Contour,
    /// Glyph body in the main color surrounded by a stroke.
    Outlined,
    /// Signed distance field.
    Sdf,
}

impl StyleKind {
    /// All styles, in display order.
    pub const ALL: [StyleKind; 4] = [Self::Simple, Self::Contour, Self::Outlined, Self::Sdf];

    /// Lowercase style name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Contour => "contour",
            Self::Outlined => "outlined",
            Self::Sdf => "sdf",
        }
    }

    /// Extension given to saved descriptors.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Sdf => "sdf",
            _ => "fnt",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleKind {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AtlasError::Config(format!("unknown style '{s}'")))
    }
}

/// Rendering style together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StyleParams {
    /// Plain glyphs in the main color.
    Simple {
        #[serde(default)]
        blur_radius: u32,
    },
    /// Glyph outline stroked in place, painted in the stroke color.
    Contour {
        thickness: u32,
        #[serde(default)]
        blur_radius: u32,
    },
    /// Glyph in the main color over an inflated silhouette in the stroke color.
    Outlined {
        thickness: u32,
        /// Blur applied to the stroke only.
        #[serde(default)]
        blur_radius: u32,
    },
    /// Signed distance field rendered at `supersample_scale` times the
    /// pixel height and reduced afterwards.
    Sdf {
        max_distance: u32,
        supersample_scale: u32,
    },
}

impl Default for StyleParams {
    fn default() -> Self {
        Self::Sdf {
            max_distance: DEFAULT_SDF_DISTANCE,
            supersample_scale: DEFAULT_SDF_SCALE,
        }
    }
}

impl StyleParams {
    /// Build style parameters from the two generic numeric slots used by
    /// older front ends.
    ///
    /// | style    | `value1`       | `value2`           |
    /// |----------|----------------|--------------------|
    /// | simple   | unused         | blur radius        |
    /// | contour  | thickness      | blur radius        |
    /// | outlined | thickness      | stroke blur radius |
    /// | sdf      | field distance | supersample scale  |
    ///
    /// Negative values are taken by magnitude.
    pub fn from_values(kind: StyleKind, value1: i32, value2: i32) -> Self {
        let v1 = value1.unsigned_abs();
        let v2 = value2.unsigned_abs();
        match kind {
            StyleKind::Simple => Self::Simple { blur_radius: v2 },
            StyleKind::Contour => Self::Contour {
                thickness: v1,
                blur_radius: v2,
            },
            StyleKind::Outlined => Self::Outlined {
                thickness: v1,
                blur_radius: v2,
            },
            StyleKind::Sdf => Self::Sdf {
                max_distance: v1,
                supersample_scale: v2,
            },
        }
    }

    /// The two generic slots of [`from_values`](Self::from_values).
    ///
    /// The unused slot of `Simple` reads as 0.
    pub fn values(&self) -> (u32, u32) {
        match *self {
            Self::Simple { blur_radius } => (0, blur_radius),
            Self::Contour {
                thickness,
                blur_radius,
            }
            | Self::Outlined {
                thickness,
                blur_radius,
            } => (thickness, blur_radius),
            Self::Sdf {
                max_distance,
                supersample_scale,
            } => (max_distance, supersample_scale),
        }
    }

    /// Default parameters for a style.
    pub fn default_for(kind: StyleKind) -> Self {
        match kind {
            StyleKind::Simple => Self::Simple { blur_radius: 0 },
            StyleKind::Contour => Self::Contour {
                thickness: 2,
                blur_radius: 0,
            },
            StyleKind::Outlined => Self::Outlined {
                thickness: 2,
                blur_radius: 0,
            },
            StyleKind::Sdf => Self::default(),
        }
    }

    /// The style tag.
    pub fn kind(&self) -> StyleKind {
        match self {
            Self::Simple { .. } => StyleKind::Simple,
            Self::Contour { .. } => StyleKind::Contour,
            Self::Outlined { .. } => StyleKind::Outlined,
            Self::Sdf { .. } => StyleKind::Sdf,
        }
    }

    /// Factor the face is rendered at relative to the requested height.
    ///
    /// Always 1 except for distance fields.
    pub fn supersample_scale(&self) -> u32 {
        match *self {
            Self::Sdf {
                supersample_scale, ..
            } => supersample_scale.max(1),
            _ => 1,
        }
    }

    /// Clamp values that would make the style meaningless.
    fn normalized(self) -> Self {
        match self {
            Self::Sdf {
                max_distance,
                supersample_scale,
            } => Self::Sdf {
                max_distance: max_distance.max(1),
                supersample_scale: supersample_scale.max(1),
            },
            other => other,
        }
    }
}

// ============================================================================
// Page tint
// ============================================================================

/// Which color's RGB fills freshly opened atlas pages (always at alpha 0).
///
/// The transparent fill only matters when the atlas is sampled with
/// filtering: edge texels then blend toward this RGB instead of black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageTint {
    /// Stroke color for every style.
    #[default]
    Stroke,
    /// Main color for every style.
    Main,
    /// Stroke color for contour and outlined styles, main color otherwise.
    ByStyle,
}

impl PageTint {
    /// Resolve the clear color for new pages.
    pub fn clear_color(self, style: StyleKind, main: Color, stroke: Color) -> Color {
        let base = match self {
            Self::Stroke => stroke,
            Self::Main => main,
            Self::ByStyle => match style {
                StyleKind::Contour | StyleKind::Outlined => stroke,
                StyleKind::Simple | StyleKind::Sdf => main,
            },
        };
        base.with_alpha(0.0)
    }
}

impl FromStr for PageTint {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "stroke" => Ok(Self::Stroke),
            "main" => Ok(Self::Main),
            "by_style" => Ok(Self::ByStyle),
            other => Err(AtlasError::Config(format!("unknown page tint '{other}'"))),
        }
    }
}

// ============================================================================
// Generation parameters
// ============================================================================

/// Complete input of one generation request (besides the font itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Nominal glyph height in pixels.
    pub pixel_height: u32,
    /// Rendering style.
    pub style: StyleParams,
    /// Glyph body color.
    pub main_color: Color,
    /// Outline color.
    pub stroke_color: Color,
    /// Atlas page width in pixels.
    pub page_width: u32,
    /// Atlas page height in pixels.
    pub page_height: u32,
    /// Background tint of new pages.
    pub page_tint: PageTint,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            pixel_height: DEFAULT_PIXEL_HEIGHT,
            style: StyleParams::default(),
            main_color: Color::WHITE,
            stroke_color: Color::BLACK,
            page_width: DEFAULT_PAGE_SIZE,
            page_height: DEFAULT_PAGE_SIZE,
            page_tint: PageTint::default(),
        }
    }
}

impl GenerationParams {
    /// Create parameters for a style with every other field defaulted.
    pub fn with_style(style: StyleParams) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Check the parameters and return a copy with style values clamped.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidParams`] for a zero pixel height, a
    /// zero page dimension or a contour without thickness. A zero-width ring
    /// strokes nothing, so every glyph would come out blank.
    pub fn validated(&self) -> AtlasResult<Self> {
        if self.pixel_height == 0 {
            return Err(AtlasError::InvalidParams(
                "pixel height must be at least 1".into(),
            ));
        }
        if self.page_width == 0 || self.page_height == 0 {
            return Err(AtlasError::InvalidParams(format!(
                "page size {}x{} has a zero dimension",
                self.page_width, self.page_height
            )));
        }
        if let StyleParams::Contour { thickness: 0, .. } = self.style {
            return Err(AtlasError::InvalidParams(
                "contour thickness must be at least 1".into(),
            ));
        }

        Ok(Self {
            style: self.style.normalized(),
            ..self.clone()
        })
    }

    /// Pixel size the face is actually rasterized at.
    pub fn raster_pixel_size(&self) -> u32 {
        self.pixel_height
            .saturating_mul(self.style.supersample_scale())
    }

    /// Color new pages are cleared to.
    pub fn page_clear_color(&self) -> Color {
        self.page_tint
            .clear_color(self.style.kind(), self.main_color, self.stroke_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = GenerationParams::default();
        assert_eq!(params.pixel_height, 60);
        assert_eq!(
            params.style,
            StyleParams::Sdf {
                max_distance: 10,
                supersample_scale: 8
            }
        );
        assert_eq!(params.main_color, Color::WHITE);
        assert_eq!(params.stroke_color, Color::BLACK);
        assert_eq!((params.page_width, params.page_height), (1024, 1024));
        assert_eq!(params.raster_pixel_size(), 480);
    }

    #[test]
    fn test_from_values_takes_magnitudes() {
        assert_eq!(
            StyleParams::from_values(StyleKind::Simple, 7, -3),
            StyleParams::Simple { blur_radius: 3 }
        );
        assert_eq!(
            StyleParams::from_values(StyleKind::Contour, -2, 1),
            StyleParams::Contour {
                thickness: 2,
                blur_radius: 1
            }
        );
        assert_eq!(
            StyleParams::from_values(StyleKind::Sdf, 4, -2),
            StyleParams::Sdf {
                max_distance: 4,
                supersample_scale: 2
            }
        );
    }

    #[test]
    fn test_values_inverts_from_values() {
        for kind in [StyleKind::Contour, StyleKind::Outlined, StyleKind::Sdf] {
            let (v1, v2) = StyleParams::from_values(kind, 5, 3).values();
            assert_eq!((v1, v2), (5, 3), "{kind}");
        }
        assert_eq!(StyleParams::Simple { blur_radius: 4 }.values(), (0, 4));
    }

    #[test]
    fn test_validated_rejects_zero_sizes() {
        let mut params = GenerationParams::default();
        params.page_width = 0;
        assert!(matches!(
            params.validated(),
            Err(AtlasError::InvalidParams(_))
        ));

        let mut params = GenerationParams::default();
        params.pixel_height = 0;
        assert!(params.validated().is_err());
    }

    #[test]
    fn test_validated_rejects_bare_contour() {
        let params =
            GenerationParams::with_style(StyleParams::from_values(StyleKind::Contour, 0, 1));
        assert!(matches!(
            params.validated(),
            Err(AtlasError::InvalidParams(_))
        ));

        // Outlined still draws the inner glyph without a border.
        let params = GenerationParams::with_style(StyleParams::Outlined {
            thickness: 0,
            blur_radius: 0,
        });
        assert!(params.validated().is_ok());
    }

    #[test]
    fn test_validated_clamps_sdf() {
        let params = GenerationParams::with_style(StyleParams::Sdf {
            max_distance: 0,
            supersample_scale: 0,
        });
        let params = params.validated().unwrap();
        assert_eq!(
            params.style,
            StyleParams::Sdf {
                max_distance: 1,
                supersample_scale: 1
            }
        );
    }

    #[test]
    fn test_page_tint() {
        let main = Color::from_rgb(1.0, 0.0, 0.0);
        let stroke = Color::from_rgb(0.0, 0.0, 1.0);

        let c = PageTint::Stroke.clear_color(StyleKind::Simple, main, stroke);
        assert_eq!(c, Color::new(0.0, 0.0, 1.0, 0.0));

        let c = PageTint::ByStyle.clear_color(StyleKind::Simple, main, stroke);
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 0.0));

        let c = PageTint::ByStyle.clear_color(StyleKind::Outlined, main, stroke);
        assert_eq!(c, Color::new(0.0, 0.0, 1.0, 0.0));

        assert_eq!("by-style".parse::<PageTint>().unwrap(), PageTint::ByStyle);
    }

    #[test]
    fn test_style_kind_parse() {
        assert_eq!("SDF".parse::<StyleKind>().unwrap(), StyleKind::Sdf);
        assert_eq!(StyleKind::Contour.file_extension(), "fnt");
        assert!("shadow".parse::<StyleKind>().is_err());
    }

    #[test]
    fn test_toml_style_table() {
        let params: GenerationParams = toml::from_str(
            r#"
            page_tint = "by_style"
            [style]
            kind = "contour"
            thickness = 3
            "#,
        )
        .unwrap();
        assert_eq!(
            params.style,
            StyleParams::Contour {
                thickness: 3,
                blur_radius: 0
            }
        );
        assert_eq!(params.page_tint, PageTint::ByStyle);
        assert_eq!(params.pixel_height, 60);
    }
}
