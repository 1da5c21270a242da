//! Atlas page packing using shelf-based allocation.
//!
//! [`AreaAllocator`] places rectangles on one page. It keeps a list of
//! shelves (horizontal rows); each request goes to the shelf whose height
//! wastes the least space, or opens a new shelf below the last one.
//!
//! [`AtlasPageSet`] owns the page images. When the current page has no room
//! it is sealed, a fresh page is opened, and the request is retried once.
//! A glyph that still does not fit is dropped.
//!
//! # Example
//!
//! ```
//! use fontsmith_core::{AtlasPageSet, Color};
//! use image::Rgba32FImage;
//!
//! let mut pages = AtlasPageSet::new(64, 64, Color::TRANSPARENT);
//! let glyph = Rgba32FImage::new(10, 12);
//! let rect = pages.pack(&glyph).unwrap();
//! assert_eq!((rect.width, rect.height, rect.page), (10, 12, 0));
//! ```

use image::{Rgba, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::color::{Color, unit_to_u8};

/// A shelf (horizontal row of allocations) on a page.
#[derive(Debug, Clone)]
struct Shelf {
    /// Y position of this shelf on the page.
    y: u32,
    /// Height of this shelf.
    height: u32,
    /// Current X position for the next allocation.
    cursor_x: u32,
}

impl Shelf {
    fn new(y: u32, height: u32) -> Self {
        Self {
            y,
            height,
            cursor_x: 0,
        }
    }

    /// Get remaining width in this shelf.
    fn remaining_width(&self, page_width: u32) -> u32 {
        page_width.saturating_sub(self.cursor_x)
    }

    /// Try to allocate space in this shelf.
    fn try_allocate(&mut self, width: u32, height: u32, page_width: u32) -> Option<(u32, u32)> {
        if height > self.height || width > self.remaining_width(page_width) {
            return None;
        }

        let x = self.cursor_x;
        self.cursor_x += width;
        Some((x, self.y))
    }
}

/// Rectangle allocator for a single page.
///
/// Allocated rectangles never overlap for the lifetime of the allocator.
#[derive(Debug, Clone)]
pub struct AreaAllocator {
    width: u32,
    height: u32,
    shelves: Vec<Shelf>,
    next_shelf_y: u32,
    allocations: usize,
}

impl AreaAllocator {
    /// Create an allocator for a `width` × `height` page.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            shelves: Vec::new(),
            next_shelf_y: 0,
            allocations: 0,
        }
    }

    /// Forget every allocation and adopt new page dimensions.
    pub fn reset(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Page width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Page height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether nothing has been allocated since the last reset.
    pub fn is_empty(&self) -> bool {
        self.allocations == 0
    }

    /// Reserve a `width` × `height` area, returning its top-left corner.
    ///
    /// Returns `None` when no free region of that size remains.
    pub fn allocate(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width || height > self.height {
            return None;
        }

        // Try existing shelves first (best fit by height)
        let best = self
            .shelves
            .iter()
            .enumerate()
            .filter(|(_, shelf)| {
                height <= shelf.height && shelf.remaining_width(self.width) >= width
            })
            .min_by_key(|(_, shelf)| shelf.height - height)
            .map(|(idx, _)| idx);

        let position = match best {
            Some(idx) => self.shelves[idx].try_allocate(width, height, self.width),
            None if self.next_shelf_y + height <= self.height => {
                let mut shelf = Shelf::new(self.next_shelf_y, height);
                let position = shelf.try_allocate(width, height, self.width);
                self.next_shelf_y += height;
                self.shelves.push(shelf);
                position
            }
            None => None,
        };

        if position.is_some() {
            self.allocations += 1;
        }
        position
    }
}

/// Where a glyph image landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub page: u32,
}

/// Append-only sequence of fixed-size atlas pages.
#[derive(Debug, Clone)]
pub struct AtlasPageSet {
    pages: Vec<RgbaImage>,
    allocator: AreaAllocator,
    clear: Rgba<u8>,
}

impl AtlasPageSet {
    /// Create a page set and open its first page, filled with `clear`.
    pub fn new(page_width: u32, page_height: u32, clear: Color) -> Self {
        let mut set = Self {
            pages: Vec::new(),
            allocator: AreaAllocator::new(page_width, page_height),
            clear: Rgba(clear.to_rgba8()),
        };
        set.begin_page();
        set
    }

    /// Seal the current page and open a fresh one.
    fn begin_page(&mut self) {
        let (width, height) = (self.allocator.width(), self.allocator.height());
        self.allocator.reset(width, height);
        self.pages
            .push(RgbaImage::from_pixel(width, height, self.clear));
        debug!(
            target: "fontsmith::packing",
            page = self.pages.len() - 1,
            width,
            height,
            "opened atlas page"
        );
    }

    /// Copy `image` onto a page, reserving a one pixel gutter to its right
    /// and below.
    ///
    /// Returns `None` if the image does not fit even on a fresh page. A
    /// page that has not received any glyph is never replaced, so an
    /// oversized image cannot open empty pages.
    pub fn pack(&mut self, image: &Rgba32FImage) -> Option<PackedRect> {
        let (width, height) = image.dimensions();
        let (req_w, req_h) = (width.saturating_add(1), height.saturating_add(1));

        let (x, y) = match self.allocator.allocate(req_w, req_h) {
            Some(position) => position,
            None if self.allocator.is_empty() => return None,
            None => {
                self.begin_page();
                self.allocator.allocate(req_w, req_h)?
            }
        };

        let page = self.pages.len() - 1;
        blit(&mut self.pages[page], x, y, image);

        Some(PackedRect {
            x,
            y,
            width,
            height,
            page: page as u32,
        })
    }

    /// Number of pages opened so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages in order.
    pub fn pages(&self) -> &[RgbaImage] {
        &self.pages
    }

    /// Take ownership of the pages.
    pub fn into_pages(self) -> Vec<RgbaImage> {
        self.pages
    }
}

/// Replace the pixels under `(x, y)` with `source`, quantized to 8 bits.
fn blit(page: &mut RgbaImage, x: u32, y: u32, source: &Rgba32FImage) {
    for (sx, sy, pixel) in source.enumerate_pixels() {
        let (px, py) = (x + sx, y + sy);
        if px < page.width() && py < page.height() {
            page.put_pixel(px, py, Rgba(pixel.0.map(unit_to_u8)));
        }
    }
}
