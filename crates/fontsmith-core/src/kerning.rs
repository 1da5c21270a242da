//! Kerning extraction from the TrueType `kern` table.
//!
//! The table lists kerning by *glyph* pairs. The parser walks the table to
//! find which pairs are kerned at all, maps both glyphs back to codepoints
//! seen during generation, and asks the face for the actual adjustment at
//! the current size (the raw table values are design units and are not
//! used directly).
//!
//! Only version 0 tables are read. Within them, only format 0 subtables
//! with horizontal coverage and neither the minimum nor the cross-stream
//! flag are used; any other subtable is skipped by its length.
//!
//! ```text
//! kern header:   version u16 | nTables u16
//! subtable:      version u16 | length u16 | coverage u16
//! format 0 body: nPairs u16 | searchRange u16 | entrySelector u16 | rangeShift u16
//!                nPairs x (left u16 | right u16 | value i16)
//! ```

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::face::{FontFace, GlyphId};
use crate::metrics::round_to_pixels;

const COVERAGE_HORIZONTAL: u16 = 0x0001;
const COVERAGE_MINIMUM: u16 = 0x0002;
const COVERAGE_CROSS_STREAM: u16 = 0x0004;
const SUBTABLE_HEADER_LEN: usize = 6;
const FORMAT0_HEADER_LEN: usize = 8;
const PAIR_LEN: usize = 6;

/// A horizontal spacing adjustment between two codepoints, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KerningPair {
    pub left: u32,
    pub right: u32,
    /// Non-zero adjustment added to the left glyph's advance.
    pub amount: i32,
}

/// Big-endian cursor over table bytes.
#[derive(Clone, Copy)]
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn u16(&mut self) -> Option<u16> {
        let bytes = self.data.get(self.pos..self.pos + 2)?;
        self.pos += 2;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn skip(&mut self, n: usize) -> Option<()> {
        self.data.get(self.pos..self.pos + n)?;
        self.pos += n;
        Some(())
    }
}

/// Glyph pairs listed in the supported subtables of a raw `kern` table, in
/// table order.
///
/// Parsing stops at the first truncated field; pairs read up to that point
/// are kept.
pub fn kern_table_pairs(data: &[u8]) -> Vec<(GlyphId, GlyphId)> {
    let mut pairs = Vec::new();
    let mut header = Reader::at(data, 0);

    let Some(version) = header.u16() else {
        warn!(target: "fontsmith::kerning", "kern table is too short for a header");
        return pairs;
    };
    if version != 0 {
        debug!(target: "fontsmith::kerning", version, "unsupported kern table version");
        return pairs;
    }
    let Some(table_count) = header.u16() else {
        warn!(target: "fontsmith::kerning", "kern table is too short for a header");
        return pairs;
    };

    let mut offset = header.pos;
    for index in 0..table_count {
        match read_subtable(data, offset, &mut pairs) {
            Some(next) => offset = next,
            None => {
                warn!(
                    target: "fontsmith::kerning",
                    subtable = index,
                    offset,
                    "kern table truncated, ignoring the rest"
                );
                break;
            }
        }
    }
    pairs
}

/// Read one subtable starting at `offset`, appending its pairs if the
/// subtable is supported. Returns the offset of the next subtable.
fn read_subtable(data: &[u8], offset: usize, pairs: &mut Vec<(GlyphId, GlyphId)>) -> Option<usize> {
    let mut r = Reader::at(data, offset);
    let version = r.u16()?;
    let length = usize::from(r.u16()?);
    let coverage = r.u16()?;

    let format = coverage >> 8;
    let supported = version == 0
        && format == 0
        && coverage & COVERAGE_HORIZONTAL != 0
        && coverage & (COVERAGE_MINIMUM | COVERAGE_CROSS_STREAM) == 0;

    if !supported {
        debug!(
            target: "fontsmith::kerning",
            version,
            format,
            coverage,
            "skipping unsupported kern subtable"
        );
        if length < SUBTABLE_HEADER_LEN {
            return None;
        }
        return Some(offset + length);
    }

    let pair_count = usize::from(r.u16()?);
    r.skip(FORMAT0_HEADER_LEN - 2)?;
    for _ in 0..pair_count {
        let left = r.u16()?;
        let right = r.u16()?;
        r.skip(2)?;
        pairs.push((left, right));
    }

    // Large format 0 subtables overflow the 16-bit length field, so the
    // pair count decides where the next subtable starts.
    Some(offset + SUBTABLE_HEADER_LEN + FORMAT0_HEADER_LEN + pair_count * PAIR_LEN)
}

/// Turns the `kern` table of a face into codepoint kerning pairs.
pub struct KerningTableParser<'a> {
    codepoints: &'a HashMap<GlyphId, u32>,
    scale: i32,
}

impl<'a> KerningTableParser<'a> {
    /// `codepoints` maps each glyph visited during generation to its
    /// codepoint; `scale` is the supersampling factor the face is sized at.
    pub fn new(codepoints: &'a HashMap<GlyphId, u32>, scale: u32) -> Self {
        Self {
            codepoints,
            scale: scale.max(1) as i32,
        }
    }

    /// Extract every non-zero kerning pair between visited glyphs.
    ///
    /// Returns an empty list when the face reports no kerning or has no
    /// readable `kern` table.
    pub fn parse(&self, face: &dyn FontFace) -> Vec<KerningPair> {
        if !face.has_kerning() {
            return Vec::new();
        }
        let Some(table) = face.table(*b"kern") else {
            debug!(target: "fontsmith::kerning", "face reports kerning but has no kern table");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut result = Vec::new();

        for (left_glyph, right_glyph) in kern_table_pairs(table) {
            let (Some(&left), Some(&right)) = (
                self.codepoints.get(&left_glyph),
                self.codepoints.get(&right_glyph),
            ) else {
                continue;
            };
            if !seen.insert((left, right)) {
                continue;
            }

            let amount = round_to_pixels(face.kerning(left_glyph, right_glyph)) / self.scale;
            if amount != 0 {
                result.push(KerningPair {
                    left,
                    right,
                    amount,
                });
            }
        }

        debug!(target: "fontsmith::kerning", pairs = result.len(), "kerning extracted");
        result
    }
}
