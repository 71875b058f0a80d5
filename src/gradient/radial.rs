use std::f32::consts::SQRT_2;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{check_channels, normalize, Color};
use crate::error::{Error, Result};
use crate::raster::PixelBuffer;

pub const DEFAULT_GRADIENT_SIZE: f32 = 2.0;

fn default_gradient_size() -> f32 {
    DEFAULT_GRADIENT_SIZE
}

/// Radial gradient from `inner_color` at the center to `outer_color` at the
/// threshold distance `sqrt(2) * max(height, width) / gradient_size`, flat
/// `outer_color` beyond it.
///
/// A larger `gradient_size` therefore shrinks the transition circle.
///
/// Each center coordinate is used only when it lies within `0..=width`
/// (resp. `0..=height`); otherwise it silently falls back to `width / 2`
/// (resp. `height / 2`, floored). Out-of-range centers are not an error.
///
/// `inner_alpha` / `outer_alpha` append an alpha channel to 3-channel colors;
/// a missing one counts as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub center_x: Option<f32>,
    #[serde(default)]
    pub center_y: Option<f32>,
    pub inner_color: Color,
    pub outer_color: Color,
    #[serde(default = "default_gradient_size")]
    pub gradient_size: f32,
    #[serde(default)]
    pub inner_alpha: Option<u8>,
    #[serde(default)]
    pub outer_alpha: Option<u8>,
}

impl RadialGradient {
    /// Opaque gradient centered on the buffer with the default gradient size
    pub fn new(height: u32, width: u32, inner_color: Color, outer_color: Color) -> Result<Self> {
        let gradient = Self {
            height,
            width,
            center_x: None,
            center_y: None,
            inner_color,
            outer_color,
            gradient_size: DEFAULT_GRADIENT_SIZE,
            inner_alpha: None,
            outer_alpha: None,
        };
        gradient.validate()?;
        Ok(gradient)
    }

    pub fn with_center(mut self, center_x: Option<f32>, center_y: Option<f32>) -> Self {
        self.center_x = center_x;
        self.center_y = center_y;
        self
    }

    pub fn with_gradient_size(mut self, gradient_size: f32) -> Result<Self> {
        self.gradient_size = gradient_size;
        self.validate()?;
        Ok(self)
    }

    pub fn with_alpha(mut self, inner_alpha: Option<u8>, outer_alpha: Option<u8>) -> Result<Self> {
        self.inner_alpha = inner_alpha;
        self.outer_alpha = outer_alpha;
        self.validate()?;
        Ok(self)
    }

    fn has_alpha_override(&self) -> bool {
        self.inner_alpha.is_some() || self.outer_alpha.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::config(format!(
                "gradient dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.inner_color.len() != self.outer_color.len() {
            return Err(Error::config(format!(
                "inner color has {} channels but outer color has {}",
                self.inner_color.len(),
                self.outer_color.len()
            )));
        }
        if !self.gradient_size.is_finite() || self.gradient_size <= 0.0 {
            return Err(Error::config(format!(
                "gradient size must be a positive number (got {})",
                self.gradient_size
            )));
        }
        if self.has_alpha_override() && self.inner_color.len() != 3 {
            return Err(Error::config(
                "alpha overrides need 3-channel inner and outer colors",
            ));
        }
        check_channels(self.channels())
    }

    /// Output channel count: the color's, plus one when alpha is overridden
    pub fn channels(&self) -> usize {
        self.inner_color.len() + usize::from(self.has_alpha_override())
    }

    /// Center actually used, after the out-of-range fallback
    pub fn center(&self) -> (f32, f32) {
        let cx = match self.center_x {
            Some(x) if x >= 0.0 && x <= self.width as f32 => x,
            _ => (self.width / 2) as f32,
        };
        let cy = match self.center_y {
            Some(y) if y >= 0.0 && y <= self.height as f32 => y,
            _ => (self.height / 2) as f32,
        };
        (cx, cy)
    }

    /// Raw distance at which the gradient reaches `outer_color`
    pub fn threshold(&self) -> f32 {
        SQRT_2 * self.height.max(self.width) as f32 / self.gradient_size
    }

    /// Normalized distance of (x, y) from the center; >= 1 means outer color
    pub fn distance(&self, x: f32, y: f32) -> f32 {
        let (cx, cy) = self.center();
        let raw = ((x - cx) * (x - cx) + (y - cy) * (y - cy)).sqrt();
        raw / self.threshold()
    }

    fn endpoints(&self) -> (Vec<f32>, Vec<f32>) {
        let mut inner = self.inner_color.normalized();
        let mut outer = self.outer_color.normalized();
        if self.has_alpha_override() {
            inner.push(normalize(self.inner_alpha.unwrap_or(255)));
            outer.push(normalize(self.outer_alpha.unwrap_or(255)));
        }
        (inner, outer)
    }

    pub fn render(&self) -> Result<PixelBuffer> {
        self.validate()?;
        let (inner, outer) = self.endpoints();
        let (cx, cy) = self.center();
        debug!(
            "radial gradient {}x{} center ({}, {}) size {} {} -> {}",
            self.width, self.height, cx, cy, self.gradient_size, self.inner_color, self.outer_color
        );

        PixelBuffer::from_fn(self.width, self.height, self.channels(), |x, y, pixel| {
            let dist = self.distance(x as f32, y as f32);
            if dist >= 1.0 {
                pixel.copy_from_slice(&outer);
            } else {
                for (c, out) in pixel.iter_mut().enumerate() {
                    *out = outer[c] * dist + inner[c] * (1.0 - dist);
                }
            }
        })
    }
}

/// Render a radial gradient; see [`RadialGradient`] for the parameter rules
pub fn render_radial_gradient(
    height: u32,
    width: u32,
    center: (Option<f32>, Option<f32>),
    inner_color: Color,
    outer_color: Color,
    gradient_size: f32,
    inner_alpha: Option<u8>,
    outer_alpha: Option<u8>,
) -> Result<PixelBuffer> {
    RadialGradient::new(height, width, inner_color, outer_color)?
        .with_center(center.0, center.1)
        .with_gradient_size(gradient_size)?
        .with_alpha(inner_alpha, outer_alpha)?
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white(h: u32, w: u32) -> RadialGradient {
        RadialGradient::new(h, w, Color::black(), Color::white()).unwrap()
    }

    #[test]
    fn test_center_pixel_is_inner_color() {
        let buf = render_radial_gradient(
            5,
            5,
            (None, None),
            Color::black(),
            Color::white(),
            2.0,
            None,
            None,
        )
        .unwrap();
        assert_eq!(buf.pixel_u8(2, 2).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_five_by_five_corner_follows_formula() {
        // threshold = sqrt(2) * 5 / 2, corner sits sqrt(8) away: dist = 0.8
        let buf = black_to_white(5, 5).render().unwrap();
        assert_eq!(buf.pixel_u8(0, 0).unwrap(), vec![204, 204, 204]);
        assert_eq!(buf.pixel_u8(4, 4).unwrap(), vec![204, 204, 204]);

        // Quadrupling the divisor pulls the threshold inside the corners
        let tight = black_to_white(5, 5).with_gradient_size(4.0).unwrap().render().unwrap();
        assert_eq!(tight.pixel_u8(0, 0).unwrap(), vec![255, 255, 255]);
        assert_eq!(tight.pixel_u8(2, 2).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_beyond_threshold_is_exactly_outer() {
        let g = RadialGradient::new(40, 60, Color::rgb(200, 10, 30), Color::rgb(5, 90, 250))
            .unwrap()
            .with_gradient_size(6.0)
            .unwrap();
        let buf = g.render().unwrap();
        let outer = Color::rgb(5, 90, 250).normalized();
        let mut checked = 0;
        for y in 0..40 {
            for x in 0..60 {
                if g.distance(x as f32, y as f32) >= 1.0 {
                    assert_eq!(buf.pixel(x, y).unwrap(), outer.as_slice());
                    checked += 1;
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_equal_colors_are_uniform() {
        let c = Color::rgb(12, 34, 56);
        let buf = RadialGradient::new(17, 23, c.clone(), c.clone())
            .unwrap()
            .render()
            .unwrap();
        for y in 0..17 {
            for x in 0..23 {
                assert_eq!(buf.pixel_u8(x, y).unwrap(), c.channels());
            }
        }
    }

    #[test]
    fn test_interpolation_is_linear_in_distance() {
        let g = black_to_white(64, 64);
        let buf = g.render().unwrap();
        let d = g.distance(40.0, 32.0);
        assert!(d > 0.0 && d < 1.0);
        assert!((buf.sample(40, 32, 0) - d).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_center_falls_back() {
        let default = black_to_white(30, 40).render().unwrap();
        let far = black_to_white(30, 40)
            .with_center(Some(40.0 + 10.0), None)
            .render()
            .unwrap();
        assert_eq!(default, far);

        let negative = black_to_white(30, 40)
            .with_center(Some(-1.0), Some(-5.0))
            .render()
            .unwrap();
        assert_eq!(default, negative);
    }

    #[test]
    fn test_in_range_center_is_used() {
        let g = black_to_white(30, 40).with_center(Some(0.0), Some(30.0));
        assert_eq!(g.center(), (0.0, 30.0));
        let buf = g.render().unwrap();
        assert_eq!(buf.pixel_u8(0, 29).unwrap()[0], quantize_dist(&g, 0.0, 29.0));
    }

    fn quantize_dist(g: &RadialGradient, x: f32, y: f32) -> u8 {
        crate::color::quantize(g.distance(x, y).min(1.0))
    }

    #[test]
    fn test_default_center_uses_floor_division() {
        let g = black_to_white(5, 7);
        assert_eq!(g.center(), (3.0, 2.0));
    }

    #[test]
    fn test_alpha_variant() {
        let g = black_to_white(21, 21)
            .with_alpha(Some(255), Some(0))
            .unwrap()
            .with_gradient_size(4.0)
            .unwrap();
        let buf = g.render().unwrap();
        assert_eq!(buf.channels(), 4);
        assert_eq!(buf.pixel_u8(10, 10).unwrap(), vec![0, 0, 0, 255]);
        assert_eq!(buf.pixel_u8(0, 0).unwrap(), vec![255, 255, 255, 0]);

        let d = g.distance(13.0, 10.0);
        let alpha = buf.sample(13, 10, 3);
        assert!((alpha - (1.0 - d)).abs() < 1e-6);
        // Color channels behave as without alpha
        assert!((buf.sample(13, 10, 0) - d).abs() < 1e-6);
    }

    #[test]
    fn test_four_channel_colors_interpolate_alpha() {
        let g = RadialGradient::new(9, 9, Color::rgba(0, 0, 0, 255), Color::rgba(255, 255, 255, 0))
            .unwrap();
        let buf = g.render().unwrap();
        assert_eq!(buf.pixel_u8(4, 4).unwrap(), vec![0, 0, 0, 255]);
    }

    #[test]
    fn test_validation() {
        assert!(RadialGradient::new(4, 4, Color::black(), Color::rgba(0, 0, 0, 0)).is_err());
        assert!(black_to_white(4, 4).with_gradient_size(0.0).is_err());
        assert!(black_to_white(4, 4).with_gradient_size(f32::NAN).is_err());
        let rgba = RadialGradient::new(4, 4, Color::rgba(0, 0, 0, 0), Color::rgba(0, 0, 0, 0)).unwrap();
        assert!(matches!(rgba.with_alpha(Some(1), None), Err(Error::Configuration(_))));
    }
}
