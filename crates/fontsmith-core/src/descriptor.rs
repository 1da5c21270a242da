//! Font descriptors: the metadata written next to the atlas pages.
//!
//! [`FontDescriptor`] is independent of any file format. A
//! [`DescriptorFormat`] turns it into bytes; [`BmFontXml`] produces the
//! AngelCode BMFont XML layout understood by most game engines:
//!
//! ```text
//! <font>
//!   <info face="..." size="..."/>
//!   <common lineHeight="..." pages="..."/>
//!   <pages><page id="0" file="name_0.png"/></pages>
//!   <chars count="..."><char id x y width height xoffset yoffset xadvance page/></chars>
//!   <kernings count="..."><kerning first second amount/></kernings>
//! </font>
//! ```

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{AtlasError, AtlasResult};
use crate::kerning::KerningPair;
use crate::xml::{XmlDocument, XmlElement};

/// Placement and layout of one glyph in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphRecord {
    /// Unicode scalar value.
    pub codepoint: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
    /// Index of the page holding the glyph.
    pub page: u32,
}

/// Everything a descriptor file records about a generated font.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontDescriptor {
    /// Face name, usually `"Family Style"`.
    pub face: String,
    /// Nominal size the atlas was requested at. Informational only.
    pub size: u32,
    pub line_height: i32,
    /// File name of each page image, in page order.
    pub page_files: Vec<String>,
    pub glyphs: Vec<GlyphRecord>,
    /// `None` when the face has no kerning at all, which omits the kerning
    /// section entirely rather than writing an empty one.
    pub kerning: Option<Vec<KerningPair>>,
}

/// A descriptor file format.
pub trait DescriptorFormat {
    /// Serialize the descriptor.
    fn encode(&self, descriptor: &FontDescriptor) -> Vec<u8>;
}

/// AngelCode BMFont XML.
#[derive(Debug, Clone, Copy, Default)]
pub struct BmFontXml;

impl BmFontXml {
    /// Build the XML tree for a descriptor.
    pub fn document(&self, descriptor: &FontDescriptor) -> XmlDocument {
        let mut doc = XmlDocument::new("font");
        let root = doc.root_mut();

        root.add_child(
            XmlElement::new("info")
                .with_attribute("face", &descriptor.face)
                .with_attribute("size", descriptor.size),
        );
        root.add_child(
            XmlElement::new("common")
                .with_attribute("lineHeight", descriptor.line_height)
                .with_attribute("pages", descriptor.page_files.len()),
        );

        let mut pages = XmlElement::new("pages");
        for (id, file) in descriptor.page_files.iter().enumerate() {
            pages.add_child(
                XmlElement::new("page")
                    .with_attribute("id", id)
                    .with_attribute("file", file),
            );
        }
        root.add_child(pages);

        let mut chars = XmlElement::new("chars").with_attribute("count", descriptor.glyphs.len());
        for glyph in &descriptor.glyphs {
            chars.add_child(
                XmlElement::new("char")
                    .with_attribute("id", glyph.codepoint)
                    .with_attribute("x", glyph.x)
                    .with_attribute("y", glyph.y)
                    .with_attribute("width", glyph.width)
                    .with_attribute("height", glyph.height)
                    .with_attribute("xoffset", glyph.x_offset)
                    .with_attribute("yoffset", glyph.y_offset)
                    .with_attribute("xadvance", glyph.x_advance)
                    .with_attribute("page", glyph.page),
            );
        }
        root.add_child(chars);

        if let Some(pairs) = &descriptor.kerning {
            let mut kernings = XmlElement::new("kernings").with_attribute("count", pairs.len());
            for pair in pairs {
                kernings.add_child(
                    XmlElement::new("kerning")
                        .with_attribute("first", pair.left)
                        .with_attribute("second", pair.right)
                        .with_attribute("amount", pair.amount),
                );
            }
            root.add_child(kernings);
        }

        doc
    }
}

impl DescriptorFormat for BmFontXml {
    fn encode(&self, descriptor: &FontDescriptor) -> Vec<u8> {
        self.document(descriptor).to_bytes_pretty()
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so an existing file is either fully replaced or left untouched.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> AtlasResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(|e| AtlasError::io(path, e))?;
    file.write_all(bytes).map_err(|e| AtlasError::io(path, e))?;
    file.as_file()
        .sync_all()
        .map_err(|e| AtlasError::io(path, e))?;
    file.persist(path).map_err(|e| AtlasError::io(path, e.error))?;
    Ok(())
}
