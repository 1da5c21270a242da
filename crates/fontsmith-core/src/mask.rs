//! Grayscale coverage masks.
//!
//! A [`GrayscaleMask`] holds one `f32` coverage value per pixel in `0..=1`.
//! Styles rasterize a glyph into a mask, grow it with [`extend`] or
//! [`blur`], and finally paint it into a colored image.
//!
//! [`extend`]: GrayscaleMask::extend
//! [`blur`]: GrayscaleMask::blur

use crate::face::Bitmap;

/// An owned 2D buffer of coverage values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GrayscaleMask {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl GrayscaleMask {
    /// A fully transparent mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }

    /// Wrap existing coverage values.
    ///
    /// Returns `None` if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f32>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert a rasterized bitmap, mapping byte coverage to `0..=1`.
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        let len = bitmap.width * bitmap.height;
        let mut pixels: Vec<f32> = bitmap
            .coverage
            .iter()
            .take(len)
            .map(|&c| f32::from(c) / 255.0)
            .collect();
        pixels.resize(len, 0.0);

        Self {
            width: bitmap.width,
            height: bitmap.height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw coverage values, row-major.
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Whether the mask has zero area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `(x, y)` addresses a pixel of this mask.
    #[inline]
    pub fn is_inside(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Coverage at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the mask; check with
    /// [`is_inside`](Self::is_inside) first.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Set the coverage at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the mask.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y * self.width + x] = value;
    }

    /// Grow the canvas by `pad` transparent pixels on every side, keeping
    /// the content centered. The sign of `pad` is ignored.
    pub fn extend(&mut self, pad: i32) {
        let pad = pad.unsigned_abs() as usize;
        if pad == 0 {
            return;
        }

        let new_width = self.width + pad * 2;
        let new_height = self.height + pad * 2;
        let mut pixels = vec![0.0; new_width * new_height];

        for (y, row) in self.pixels.chunks_exact(self.width.max(1)).enumerate() {
            let start = (y + pad) * new_width + pad;
            pixels[start..start + self.width].copy_from_slice(row);
        }

        self.width = new_width;
        self.height = new_height;
        self.pixels = pixels;
    }

    /// Tent blur with half-width `radius`.
    ///
    /// The canvas first grows by `radius` on every side so nothing is
    /// clipped, then a vertical and a horizontal pass run with weights
    /// `radius + 1 - d` for samples at distance `d`. Samples outside the
    /// canvas count as transparent and every sum is divided by
    /// `(radius + 1)^2`. A zero radius leaves the mask untouched.
    pub fn blur(&mut self, radius: i32) {
        if radius == 0 {
            return;
        }
        let radius = radius.unsigned_abs() as isize;
        self.extend(radius as i32);

        let total_weight = ((radius + 1) * (radius + 1)) as f32;
        let center_weight = (radius + 1) as f32;
        let (w, h) = (self.width as isize, self.height as isize);
        let mut tmp = vec![0.0f32; self.pixels.len()];

        // Vertical pass into tmp.
        for x in 0..w {
            for y in 0..h {
                let mut value = self.get(x as usize, y as usize) * center_weight;
                for dist in 1..=radius {
                    let weight = (radius + 1 - dist) as f32;
                    for sy in [y + dist, y - dist] {
                        if self.is_inside(x, sy) {
                            value += self.get(x as usize, sy as usize) * weight;
                        }
                    }
                }
                tmp[(y * w + x) as usize] = value / total_weight;
            }
        }

        // Horizontal pass back into the mask.
        for y in 0..h {
            for x in 0..w {
                let mut value = tmp[(y * w + x) as usize] * center_weight;
                for dist in 1..=radius {
                    let weight = (radius + 1 - dist) as f32;
                    for sx in [x + dist, x - dist] {
                        if self.is_inside(sx, y) {
                            value += tmp[(y * w + sx) as usize] * weight;
                        }
                    }
                }
                self.pixels[(y * w + x) as usize] = value / total_weight;
            }
        }
    }

    /// Replace every value `v` with `1 - v`.
    pub fn invert(&mut self) {
        for v in &mut self.pixels {
            *v = 1.0 - *v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: usize) -> GrayscaleMask {
        GrayscaleMask::from_pixels(size, size, vec![1.0; size * size]).unwrap()
    }

    #[test]
    fn test_from_bitmap_normalizes() {
        let bitmap = Bitmap {
            width: 2,
            height: 1,
            left: 0,
            top: 0,
            coverage: vec![0, 255],
        };
        let mask = GrayscaleMask::from_bitmap(&bitmap);
        assert_eq!(mask.pixels(), &[0.0, 1.0]);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(GrayscaleMask::from_pixels(2, 2, vec![0.0; 3]).is_none());
    }

    #[test]
    fn test_extend_centers_content() {
        let mut mask = GrayscaleMask::from_pixels(2, 1, vec![0.25, 0.75]).unwrap();
        mask.extend(-2);

        assert_eq!((mask.width(), mask.height()), (6, 5));
        assert_eq!(mask.get(2, 2), 0.25);
        assert_eq!(mask.get(3, 2), 0.75);
        assert_eq!(mask.get(0, 0), 0.0);
        assert_eq!(mask.pixels().iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_extend_empty_mask() {
        let mut mask = GrayscaleMask::new(0, 0);
        mask.extend(3);
        assert_eq!((mask.width(), mask.height()), (6, 6));
        assert!(mask.pixels().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_blur_zero_is_identity() {
        let original = GrayscaleMask::from_pixels(3, 2, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();
        let mut mask = original.clone();
        mask.blur(0);
        assert_eq!(mask, original);
    }

    #[test]
    fn test_blur_grows_canvas() {
        for radius in [1, 2, 5] {
            let mut mask = square(4);
            mask.blur(radius);
            let growth = 2 * radius as usize;
            assert_eq!((mask.width(), mask.height()), (4 + growth, 4 + growth));
        }
    }

    #[test]
    fn test_blur_preserves_energy() {
        // Nothing reaches the canvas edge, so the normalized kernel keeps the total.
        let mut mask = square(3);
        mask.blur(2);
        let total: f32 = mask.pixels().iter().sum();
        assert!((total - 9.0).abs() < 1e-4, "total {total}");
    }

    #[test]
    fn test_blur_single_pixel_weights() {
        let mut mask = square(1);
        mask.blur(1);

        // Separable tent: corner 1*1, edge 1*2, center 2*2, all over 4*4.
        assert_eq!((mask.width(), mask.height()), (3, 3));
        assert!((mask.get(1, 1) - 4.0 / 16.0).abs() < 1e-6);
        assert!((mask.get(0, 1) - 2.0 / 16.0).abs() < 1e-6);
        assert!((mask.get(0, 0) - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_is_inside() {
        let mask = GrayscaleMask::new(2, 3);
        assert!(mask.is_inside(0, 0));
        assert!(mask.is_inside(1, 2));
        assert!(!mask.is_inside(2, 0));
        assert!(!mask.is_inside(0, 3));
        assert!(!mask.is_inside(-1, 0));
    }

    #[test]
    fn test_invert() {
        let mut mask = GrayscaleMask::from_pixels(2, 1, vec![0.0, 0.25]).unwrap();
        mask.invert();
        assert_eq!(mask.pixels(), &[1.0, 0.75]);
    }
}
