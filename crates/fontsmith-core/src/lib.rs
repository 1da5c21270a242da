//! Bitmap font atlas generation.
//!
//! This crate turns a scalable font face into one or more RGBA atlas pages
//! plus a descriptor listing where every glyph landed, its layout metrics
//! and the face's kerning pairs.
//!
//! Four rendering styles are available through [`StyleParams`]:
//!
//! - **Simple**: glyph coverage in one color, optionally blurred.
//! - **Contour**: only a stroke around each outline.
//! - **Outlined**: the glyph body over a wider stroked silhouette.
//! - **Sdf**: a signed distance field computed from a supersampled raster.
//!
//! # Getting Started
//!
//! ```no_run
//! use fontsmith_core::{Color, FontAtlasBuilder, GenerationParams, StyleParams};
//!
//! let params = GenerationParams {
//!     pixel_height: 48,
//!     style: StyleParams::Outlined { thickness: 2, blur_radius: 0 },
//!     main_color: Color::WHITE,
//!     stroke_color: Color::BLACK,
//!     ..GenerationParams::default()
//! };
//!
//! let atlas = FontAtlasBuilder::new().generate_from_file("font.ttf", &params)?;
//! for index in 0..atlas.page_count() {
//!     let page = atlas.page(index).unwrap();
//!     println!("page {index}: {}x{}", page.width(), page.height());
//! }
//! atlas.save("out/font")?;
//! # Ok::<(), fontsmith_core::AtlasError>(())
//! ```
//!
//! # Custom faces
//!
//! Generation works on any [`FontFace`]. [`TtfFace`] reads TrueType and
//! OpenType fonts. With the `testing` feature, `testing::SyntheticFace`
//! draws rectangles for tests that should not depend on a font file.

mod builder;
mod color;
mod config;
mod descriptor;
mod error;
mod face;
mod kerning;
mod mask;
mod metrics;
mod packing;
mod style;
mod ttf;

pub mod sdf;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod xml;

// Generation
pub use builder::{FontAtlas, FontAtlasBuilder, GenerationStats, SaveOutcome};
pub use config::{
    DEFAULT_PAGE_SIZE, DEFAULT_PIXEL_HEIGHT, DEFAULT_SDF_DISTANCE, DEFAULT_SDF_SCALE,
    GenerationParams, PageTint, StyleKind, StyleParams,
};
pub use error::{AtlasError, AtlasResult};

// Output
pub use descriptor::{BmFontXml, DescriptorFormat, FontDescriptor, GlyphRecord};

// Font access
pub use face::{
    Bitmap, FontFace, GlyphId, GlyphOutlineMetrics, GlyphRaster, RasterMode, SizeMetrics,
    Stroke, VerticalHints,
};
pub use ttf::TtfFace;

// Building blocks
pub use color::Color;
pub use kerning::{KerningPair, KerningTableParser, kern_table_pairs};
pub use mask::GrayscaleMask;
pub use metrics::{FaceMetrics, GlyphMetrics, face_metrics, glyph_metrics, round_to_pixels};
pub use packing::{AreaAllocator, AtlasPageSet, PackedRect};
pub use sdf::{CpuFieldBackend, FieldBackend};
pub use style::{RenderedGlyph, StyleRenderer, colorize};
