//! Synthetic atlas example.
//!
//! Generates one atlas per style from the rectangle-glyph test face and
//! saves them, which is handy for checking descriptor output without a
//! font file.
//!
//! Run with: cargo run -p fontsmith-core --example synthetic_atlas [OUTPUT_DIR]

use std::path::PathBuf;

use fontsmith_core::testing::SyntheticFace;
use fontsmith_core::{
    Color, FontAtlasBuilder, GenerationParams, SaveOutcome, StyleKind, StyleParams,
};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/synthetic_atlas"));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let builder = FontAtlasBuilder::new();
    for kind in StyleKind::ALL {
        let params = GenerationParams {
            pixel_height: 32,
            style: StyleParams::default_for(kind),
            main_color: Color::from_rgb(1.0, 0.8, 0.2),
            page_width: 256,
            page_height: 256,
            ..GenerationParams::default()
        };

        let mut face = SyntheticFace::latin_sample();
        let atlas = builder
            .generate(&mut face, &params)
            .expect("Failed to generate atlas");
        println!("{kind}: {}", atlas.stats());

        match atlas
            .save(out_dir.join(kind.as_str()))
            .expect("Failed to save atlas")
        {
            SaveOutcome::Saved { descriptor, .. } => println!("  -> {}", descriptor.display()),
            SaveOutcome::NothingToSave => println!("  -> nothing to save"),
        }
    }
}
