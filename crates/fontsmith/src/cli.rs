//! Command line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use fontsmith_core::{Color, PageTint, StyleKind};

#[derive(Parser, Debug)]
#[command(
    name = "fontsmith",
    version,
    about = "Generate a bitmap font atlas (BMFont XML descriptor and PNG pages) from a font file"
)]
pub struct Cli {
    /// TrueType or OpenType font file
    #[arg(value_name = "FONT")]
    pub font: PathBuf,

    /// Descriptor path; `.fnt` or `.sdf` is appended when it has no extension
    /// [default: the font's file stem in the current directory]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// TOML file with generation parameters; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Nominal glyph height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Rendering style: simple, contour, outlined or sdf
    #[arg(long)]
    pub style: Option<StyleKind>,

    /// First style value: stroke thickness (contour, outlined) or field
    /// distance (sdf); unused by simple
    #[arg(long, allow_negative_numbers = true)]
    pub value1: Option<i32>,

    /// Second style value: blur radius (simple, contour, outlined) or
    /// supersampling scale (sdf)
    #[arg(long, allow_negative_numbers = true)]
    pub value2: Option<i32>,

    /// Glyph color as #RRGGBB[AA] or r,g,b[,a] in 0..1
    #[arg(long, value_name = "COLOR")]
    pub main_color: Option<Color>,

    /// Outline color as #RRGGBB[AA] or r,g,b[,a] in 0..1
    #[arg(long, value_name = "COLOR")]
    pub stroke_color: Option<Color>,

    /// Atlas page width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub page_width: Option<u32>,

    /// Atlas page height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub page_height: Option<u32>,

    /// Which color tints empty page pixels: stroke, main or by-style
    #[arg(long)]
    pub page_tint: Option<PageTint>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by `-v`, if any.
    pub fn log_level(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
