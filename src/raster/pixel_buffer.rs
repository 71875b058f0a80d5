use crate::color::{check_channels, quantize, Color};
use crate::error::{Error, Result};

// ============================================================================
// Utility Functions
// ============================================================================

/// Blend a single normalized channel toward `src` by `coverage`
#[inline]
fn blend_channel(src: f32, dst: f32, coverage: f32) -> f32 {
    dst + (src - dst) * coverage
}

/// Euclidean distance from (px, py) to the segment (x0, y0)-(x1, y1)
#[inline]
fn distance_to_segment(px: f32, py: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq < 1e-6 {
        0.0
    } else {
        (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let cx = x0 + t * dx;
    let cy = y0 + t * dy;
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}

/// Cohen-Sutherland clipping of a float segment to `(min_x, min_y, max_x, max_y)`.
/// Returns `None` when nothing of the segment lies inside or an endpoint is not finite.
fn clip_segment(
    (mut x0, mut y0, mut x1, mut y1): (f32, f32, f32, f32),
    (min_x, min_y, max_x, max_y): (f32, f32, f32, f32),
) -> Option<(f32, f32, f32, f32)> {
    const INSIDE: u8 = 0;
    const LEFT: u8 = 1;
    const RIGHT: u8 = 2;
    const BOTTOM: u8 = 4;
    const TOP: u8 = 8;
    // Float rounding can take a few extra rounds near corners
    const MAX_ITERATIONS: u32 = 8;

    if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let outcode = |x: f32, y: f32| -> u8 {
        let mut code = INSIDE;
        if x < min_x {
            code |= LEFT;
        } else if x > max_x {
            code |= RIGHT;
        }
        if y < min_y {
            code |= TOP;
        } else if y > max_y {
            code |= BOTTOM;
        }
        code
    };

    let mut code0 = outcode(x0, y0);
    let mut code1 = outcode(x1, y1);

    for _ in 0..MAX_ITERATIONS {
        if (code0 | code1) == INSIDE {
            return Some((x0, y0, x1, y1));
        }
        if (code0 & code1) != 0 {
            return None;
        }

        // Endpoints straddle the crossed edge, so its delta is non-zero
        let code_out = if code0 != INSIDE { code0 } else { code1 };
        let dx = x1 - x0;
        let dy = y1 - y0;
        let (x, y) = if (code_out & BOTTOM) != 0 {
            (x0 + dx * (max_y - y0) / dy, max_y)
        } else if (code_out & TOP) != 0 {
            (x0 + dx * (min_y - y0) / dy, min_y)
        } else if (code_out & RIGHT) != 0 {
            (max_x, y0 + dy * (max_x - x0) / dx)
        } else {
            (min_x, y0 + dy * (min_x - x0) / dx)
        };

        if code_out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(x0, y0);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(x1, y1);
        }
    }

    None
}

/// Coverage of a pixel whose center lies `signed_dist` outside an edge.
/// One pixel wide ramp centered on the edge.
#[inline]
fn edge_coverage(signed_dist: f32) -> f32 {
    (0.5 - signed_dist).clamp(0.0, 1.0)
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Height x width x channels float canvas.
///
/// Samples are stored row-major, interleaved, in the normalized 0.0-1.0
/// domain. Channel count is fixed at construction (1, 3 or 4) and every
/// color combined with the buffer must match it. Conversion to 8 bits
/// happens only through [`PixelBuffer::to_u8`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    samples: Vec<f32>,
    width: u32,
    height: u32,
    channels: usize,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer
    pub fn with_size(width: u32, height: u32, channels: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::config(format!(
                "buffer dimensions must be non-zero (got {}x{})",
                width, height
            )));
        }
        check_channels(channels)?;
        Ok(Self {
            samples: vec![0.0; width as usize * height as usize * channels],
            width,
            height,
            channels,
        })
    }

    /// Allocate a buffer uniformly filled with `color`; channel count follows the color
    pub fn filled(width: u32, height: u32, color: &Color) -> Result<Self> {
        let mut buffer = Self::with_size(width, height, color.len())?;
        buffer.clear(&color.normalized());
        Ok(buffer)
    }

    /// Build a buffer by evaluating `f(x, y, pixel)` for every pixel
    pub fn from_fn<F>(width: u32, height: u32, channels: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32, &mut [f32]),
    {
        let mut buffer = Self::with_size(width, height, channels)?;
        let w = width as usize;
        for (i, pixel) in buffer.samples.chunks_exact_mut(channels).enumerate() {
            f((i % w) as u32, (i / w) as u32, pixel);
        }
        Ok(buffer)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Pixel-center rectangle grown by `margin` on every side
    #[inline]
    fn clip_rect(&self, margin: f32) -> (f32, f32, f32, f32) {
        (
            -margin,
            -margin,
            (self.width - 1) as f32 + margin,
            (self.height - 1) as f32 + margin,
        )
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate sample offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    /// Fail unless `color` has exactly this buffer's channel count
    pub fn check_color(&self, color: &[f32]) -> Result<()> {
        if color.len() == self.channels {
            Ok(())
        } else {
            Err(Error::config(format!(
                "color has {} channels but buffer has {}",
                color.len(),
                self.channels
            )))
        }
    }

    /// Fill every pixel with a normalized color
    pub fn clear(&mut self, color: &[f32]) {
        debug_assert_eq!(color.len(), self.channels);
        for pixel in self.samples.chunks_exact_mut(self.channels) {
            pixel.copy_from_slice(color);
        }
    }

    /// Normalized samples of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.pixel_index(x, y);
        Some(&self.samples[idx..idx + self.channels])
    }

    /// Pixel quantized to 8 bits per channel
    pub fn pixel_u8(&self, x: u32, y: u32) -> Option<Vec<u8>> {
        self.pixel(x, y)
            .map(|p| p.iter().map(|&v| quantize(v)).collect())
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: &[f32]) {
        if x < self.width && y < self.height {
            let idx = self.pixel_index(x, y);
            self.samples[idx..idx + self.channels].copy_from_slice(color);
        }
    }

    /// Single sample; panics when out of range
    #[inline]
    pub fn sample(&self, x: u32, y: u32, channel: usize) -> f32 {
        self.samples[self.pixel_index(x, y) + channel]
    }

    #[inline]
    pub fn set_sample(&mut self, x: u32, y: u32, channel: usize, value: f32) {
        let idx = self.pixel_index(x, y) + channel;
        self.samples[idx] = value;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Blend a pixel toward `color` by `coverage` in [0, 1]; ignores out-of-bounds
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: &[f32], coverage: f32) {
        if !self.in_bounds(x, y) || coverage <= 0.0 {
            return;
        }
        let coverage = coverage.min(1.0);
        let idx = self.pixel_index(x as u32, y as u32);
        for (dst, &src) in self.samples[idx..idx + self.channels].iter_mut().zip(color) {
            *dst = blend_channel(src, *dst, coverage);
        }
    }

    /// Evaluate `coverage(x, y)` over a pixel rectangle (clipped to the buffer)
    /// and blend `color` in by the result. Pixel centers sit on integer coordinates.
    pub fn stamp_coverage<F>(
        &mut self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        color: &[f32],
        coverage: F,
    ) where
        F: Fn(f32, f32) -> f32,
    {
        let x_start = (min_x.floor() as i32).max(0);
        let y_start = (min_y.floor() as i32).max(0);
        let x_end = (max_x.ceil() as i32).min(self.width as i32 - 1);
        let y_end = (max_y.ceil() as i32).min(self.height as i32 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                let c = coverage(x as f32, y as f32);
                self.blend_pixel(x, y, color, c);
            }
        }
    }

    // ========================================================================
    // Anti-aliased Shapes
    // Composes: stamp_coverage -> blend_pixel
    // ========================================================================

    /// Filled disc with a one pixel anti-aliased rim.
    /// Radii below half a pixel still cover the pixel under the center.
    pub fn fill_circle_aa(&mut self, cx: f32, cy: f32, radius: f32, color: &[f32]) {
        let radius = radius.max(0.5);
        let reach = radius + 1.0;
        self.stamp_coverage(cx - reach, cy - reach, cx + reach, cy + reach, color, |x, y| {
            let d = ((x - cx) * (x - cx) + (y - cy) * (y - cy)).sqrt();
            edge_coverage(d - radius)
        });
    }

    /// Ring outline of `thickness` pixels centered on `radius`.
    /// A thickness of 0 draws a hairline.
    pub fn stroke_circle_aa(&mut self, cx: f32, cy: f32, radius: f32, thickness: u32, color: &[f32]) {
        let half = thickness.max(1) as f32 / 2.0;
        let reach = radius + half + 1.0;
        self.stamp_coverage(cx - reach, cy - reach, cx + reach, cy + reach, color, |x, y| {
            let d = ((x - cx) * (x - cx) + (y - cy) * (y - cy)).sqrt();
            edge_coverage((d - radius).abs() - half)
        });
    }

    /// Thick anti-aliased segment with round caps
    pub fn line_thick_aa(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        thickness: u32,
        color: &[f32],
    ) {
        if thickness <= 1 {
            self.line_aa(x0, y0, x1, y1, color);
            return;
        }

        let half = thickness as f32 / 2.0;
        let reach = half + 1.0;
        // Parts farther than `reach` outside the buffer cannot cover any pixel
        let Some((x0, y0, x1, y1)) = clip_segment((x0, y0, x1, y1), self.clip_rect(reach)) else {
            return;
        };
        self.stamp_coverage(
            x0.min(x1) - reach,
            y0.min(y1) - reach,
            x0.max(x1) + reach,
            y0.max(y1) + reach,
            color,
            |x, y| edge_coverage(distance_to_segment(x, y, x0, y0, x1, y1) - half),
        );
    }

    /// Anti-aliased hairline using Xiaolin Wu's algorithm.
    /// Accepts f32 endpoints for subpixel precision.
    /// Clipped two pixels outside the buffer so endpoint gaps never land on visible pixels.
    pub fn line_aa(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: &[f32]) {
        let Some((mut x0, mut y0, mut x1, mut y1)) =
            clip_segment((x0, y0, x1, y1), self.clip_rect(2.0))
        else {
            return;
        };

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let gradient = if dx.abs() < 0.001 { 1.0 } else { dy / dx };

        // Plot in the original (unswapped) orientation
        let plot = |buf: &mut Self, major: i32, minor: i32, c: f32| {
            if steep {
                buf.blend_pixel(minor, major, color, c);
            } else {
                buf.blend_pixel(major, minor, color, c);
            }
        };

        // First endpoint
        let xend = x0.round();
        let yend = y0 + gradient * (xend - x0);
        let xgap = 1.0 - (x0 + 0.5).fract();
        let xpxl1 = xend as i32;
        let ypxl1 = yend.floor() as i32;
        let fpart = yend - yend.floor();
        plot(self, xpxl1, ypxl1, (1.0 - fpart) * xgap);
        plot(self, xpxl1, ypxl1 + 1, fpart * xgap);
        let mut intery = yend + gradient;

        // Second endpoint
        let xend = x1.round();
        let yend = y1 + gradient * (xend - x1);
        let xgap = (x1 + 0.5).fract();
        let xpxl2 = xend as i32;
        let ypxl2 = yend.floor() as i32;
        let fpart = yend - yend.floor();
        plot(self, xpxl2, ypxl2, (1.0 - fpart) * xgap);
        plot(self, xpxl2, ypxl2 + 1, fpart * xgap);

        // Main line body
        for x in (xpxl1 + 1)..xpxl2 {
            let ipart = intery.floor();
            let fpart = intery - ipart;
            plot(self, x, ipart as i32, 1.0 - fpart);
            plot(self, x, ipart as i32 + 1, fpart);
            intery += gradient;
        }
    }

    // ========================================================================
    // Channel Operations
    // ========================================================================

    /// Reverse the color channels of every pixel (RGB -> BGR).
    /// An alpha channel, when present, stays last. No-op for gray buffers.
    pub fn reverse_color_channels(&mut self) {
        let color_channels = match self.channels {
            3 | 4 => 3,
            _ => return,
        };
        for pixel in self.samples.chunks_exact_mut(self.channels) {
            pixel[..color_channels].reverse();
        }
    }

    /// Subtract the red channel from the alpha channel: `alpha -= red`.
    ///
    /// Only meaningful for black/white masks drawn over a fully opaque
    /// background: white regions become transparent, black stay opaque.
    /// Other colors give whatever the subtraction gives; results below
    /// zero are clamped at quantization.
    pub fn alpha_from_red(&mut self) -> Result<()> {
        if self.channels != 4 {
            return Err(Error::config(format!(
                "alpha derivation needs a 4-channel buffer (got {})",
                self.channels
            )));
        }
        for pixel in self.samples.chunks_exact_mut(4) {
            pixel[3] -= pixel[0];
        }
        Ok(())
    }

    /// Quantize to interleaved 8-bit samples: scale by 255, clamp, round
    pub fn to_u8(&self) -> Vec<u8> {
        self.samples.iter().map(|&v| quantize(v)).collect()
    }
}
