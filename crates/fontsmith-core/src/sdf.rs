//! Signed distance field computation.
//!
//! The field is computed on a supersampled binary mask in two separable 1D
//! passes per side:
//!
//! 1. **Horizontal**: distance along the row to the nearest foreground pixel.
//! 2. **Vertical**: for each pixel, the smallest `sqrt(h(y')² + (y - y')²)`
//!    over the column, which combines the row distances into a 2D distance.
//!
//! Every distance is capped at the field radius `R`. Running the passes on
//! the mask gives the external field (background pixels measured against
//! the glyph); running them on the inverted mask gives the internal field.
//! The two are combined so the glyph edge sits at 0.5 and averaged over
//! `S×S` blocks down to the output resolution:
//!
//! ```text
//! value = 0.5 - 0.5 * external / R + 0.5 * internal / R
//! ```
//!
//! The column pass uses the lower-envelope-of-parabolas transform, which
//! gives the same minimum as scanning every `y'` in linear time.

use crate::mask::GrayscaleMask;

/// Coverage at or above this value counts as foreground.
const FOREGROUND_THRESHOLD: f32 = 0.5;

/// Computes a combined, downsampled distance field from a padded mask.
///
/// Implementations must produce the same values as [`CpuFieldBackend`]
/// within floating point rounding of the block average.
pub trait FieldBackend {
    /// `mask` is the supersampled glyph, already padded by `radius` on every
    /// side; `radius` is in supersampled pixels. The result is
    /// `mask.width() / scale` by `mask.height() / scale`.
    fn distance_field(&self, mask: &GrayscaleMask, radius: u32, scale: u32) -> GrayscaleMask;
}

/// Straightforward CPU implementation of the field passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFieldBackend;

impl FieldBackend for CpuFieldBackend {
    fn distance_field(&self, mask: &GrayscaleMask, radius: u32, scale: u32) -> GrayscaleMask {
        let radius = radius.max(1) as f32;
        let external = directional_field(mask, radius, false);
        let internal = directional_field(mask, radius, true);

        let combined: Vec<f32> = external
            .iter()
            .zip(&internal)
            .map(|(ext, int)| 0.5 - 0.5 * ext / radius + 0.5 * int / radius)
            .collect();

        downsample(&combined, mask.width(), mask.height(), scale.max(1) as usize)
    }
}

/// Capped distance from every pixel to the nearest foreground pixel
/// (background pixel when `invert` is set).
pub fn directional_field(mask: &GrayscaleMask, radius: f32, invert: bool) -> Vec<f32> {
    let (w, h) = (mask.width(), mask.height());
    let is_foreground = |v: f32| (v >= FOREGROUND_THRESHOLD) != invert;

    let mut field = vec![radius; w * h];
    for (row, out) in mask.pixels().chunks_exact(w.max(1)).zip(field.chunks_exact_mut(w.max(1))) {
        horizontal_pass(row, out, radius, is_foreground);
    }
    vertical_pass(&mut field, w, h, radius);
    field
}

/// Distance along a row to the nearest foreground pixel, capped at `radius`.
fn horizontal_pass(row: &[f32], out: &mut [f32], radius: f32, is_foreground: impl Fn(f32) -> bool) {
    let mut last: Option<usize> = None;
    for (x, &v) in row.iter().enumerate() {
        if is_foreground(v) {
            last = Some(x);
        }
        out[x] = last.map_or(radius, |l| ((x - l) as f32).min(radius));
    }

    let mut next: Option<usize> = None;
    for x in (0..row.len()).rev() {
        if is_foreground(row[x]) {
            next = Some(x);
        }
        if let Some(n) = next {
            out[x] = out[x].min(((n - x) as f32).min(radius));
        }
    }
}

/// Combine row distances along each column in place.
fn vertical_pass(field: &mut [f32], w: usize, h: usize, radius: f32) {
    if w == 0 || h == 0 {
        return;
    }

    let mut squared = vec![0.0f32; h];
    let mut result = vec![0.0f32; h];
    let mut envelope = Envelope::with_capacity(h);

    for x in 0..w {
        for y in 0..h {
            let d = field[y * w + x];
            squared[y] = d * d;
        }
        envelope.transform(&squared, &mut result);
        for y in 0..h {
            field[y * w + x] = result[y].sqrt().min(radius);
        }
    }
}

/// Scratch buffers for the 1D squared distance transform.
struct Envelope {
    /// Positions of the parabolas forming the lower envelope.
    vertices: Vec<usize>,
    /// Boundaries between consecutive parabolas.
    bounds: Vec<f32>,
}

impl Envelope {
    fn with_capacity(n: usize) -> Self {
        Self {
            vertices: vec![0; n],
            bounds: vec![0.0; n + 1],
        }
    }

    /// `out[q] = min over p of (q - p)² + f[p]`.
    fn transform(&mut self, f: &[f32], out: &mut [f32]) {
        let n = f.len();
        if n == 0 {
            return;
        }
        let v = &mut self.vertices;
        let z = &mut self.bounds;

        let intersect = |q: usize, p: usize| -> f32 {
            let (qf, pf) = (q as f32, p as f32);
            ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * qf - 2.0 * pf)
        };

        let mut k = 0usize;
        v[0] = 0;
        z[0] = f32::NEG_INFINITY;
        z[1] = f32::INFINITY;

        for q in 1..n {
            let mut s = intersect(q, v[k]);
            while s <= z[k] {
                k -= 1;
                s = intersect(q, v[k]);
            }
            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = f32::INFINITY;
        }

        k = 0;
        for (q, slot) in out.iter_mut().enumerate().take(n) {
            while z[k + 1] < q as f32 {
                k += 1;
            }
            let d = q as f32 - v[k] as f32;
            *slot = d * d + f[v[k]];
        }
    }
}

/// Average `scale × scale` blocks. Trailing rows and columns that do not
/// fill a whole block are dropped.
fn downsample(values: &[f32], w: usize, h: usize, scale: usize) -> GrayscaleMask {
    let (out_w, out_h) = (w / scale, h / scale);
    let block = (scale * scale) as f32;
    let mut out = GrayscaleMask::new(out_w, out_h);

    for oy in 0..out_h {
        for ox in 0..out_w {
            let mut sum = 0.0f32;
            for y in oy * scale..(oy + 1) * scale {
                let row = &values[y * w + ox * scale..y * w + (ox + 1) * scale];
                sum += row.iter().sum::<f32>();
            }
            out.set(ox, oy, sum / block);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct evaluation of both passes, for comparison.
    fn brute_force(mask: &GrayscaleMask, radius: f32, invert: bool) -> Vec<f32> {
        let (w, h) = (mask.width() as isize, mask.height() as isize);
        let r = radius as isize;
        let fg = |x: isize, y: isize| {
            (mask.get(x as usize, y as usize) >= FOREGROUND_THRESHOLD) != invert
        };

        let mut horizontal = vec![radius; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                for dx in -r..=r {
                    if mask.is_inside(x + dx, y) && fg(x + dx, y) {
                        let d = (dx.abs() as f32).min(radius);
                        let slot = &mut horizontal[(y * w + x) as usize];
                        *slot = slot.min(d);
                    }
                }
            }
        }

        let mut out = vec![radius; (w * h) as usize];
        for y in 0..h {
            for x in 0..w {
                for dy in -r..=r {
                    if mask.is_inside(x, y + dy) {
                        let hd = horizontal[((y + dy) * w + x) as usize];
                        let d = (hd * hd + (dy * dy) as f32).sqrt().min(radius);
                        let slot = &mut out[(y * w + x) as usize];
                        *slot = slot.min(d);
                    }
                }
            }
        }
        out
    }

    fn glyph_mask() -> GrayscaleMask {
        // An L shape padded by 4.
        let mut mask = GrayscaleMask::new(5, 6);
        for y in 0..6 {
            mask.set(0, y, 1.0);
            mask.set(1, y, 1.0);
        }
        for x in 0..5 {
            mask.set(x, 5, 1.0);
        }
        mask.extend(4);
        mask
    }

    #[test]
    fn test_matches_brute_force() {
        let mask = glyph_mask();
        for radius in [1.0, 3.0, 4.0] {
            for invert in [false, true] {
                let fast = directional_field(&mask, radius, invert);
                let slow = brute_force(&mask, radius, invert);
                for (a, b) in fast.iter().zip(&slow) {
                    assert!((a - b).abs() < 1e-4, "radius {radius} invert {invert}: {a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_external_field_is_zero_on_glyph() {
        let mask = glyph_mask();
        let field = directional_field(&mask, 4.0, false);
        // (4, 4) is the top of the L's stem after padding.
        assert_eq!(field[4 * mask.width() + 4], 0.0);
        // A corner of the padding is farther than the radius from the glyph.
        assert_eq!(field[0], 4.0);
    }

    #[test]
    fn test_combined_values_straddle_half() {
        let mask = glyph_mask();
        let out = CpuFieldBackend.distance_field(&mask, 4, 1);

        assert_eq!((out.width(), out.height()), (mask.width(), mask.height()));
        assert!(out.get(4, 4) > 0.5);
        assert!(out.get(0, 0) < 0.5);
        assert_eq!(out.get(0, 0), 0.0);
        assert!(out.pixels().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_downsample_averages_blocks() {
        let values = vec![
            1.0, 0.0, 0.5, 0.5, 9.0, //
            0.0, 1.0, 0.5, 0.5, 9.0, //
            9.0, 9.0, 9.0, 9.0, 9.0,
        ];
        let out = downsample(&values, 5, 3, 2);
        assert_eq!((out.width(), out.height()), (2, 1));
        assert_eq!(out.get(0, 0), 0.5);
        assert_eq!(out.get(1, 0), 0.5);
    }

    #[test]
    fn test_supersampled_output_size() {
        let mask = glyph_mask();
        let out = CpuFieldBackend.distance_field(&mask, 4, 2);
        assert_eq!(out.width(), mask.width() / 2);
        assert_eq!(out.height(), mask.height() / 2);
    }
}
