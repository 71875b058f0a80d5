use log::debug;
use serde::{Deserialize, Serialize};

use super::Geometry;
use crate::color::{check_channels, Color};
use crate::error::{Error, Result};
use crate::raster::{check_kernel_size, PixelBuffer};

/// How a stamped shape buffer is finished before it leaves the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeOutput {
    /// Colored shape; color channels are reversed to BGR as the last step
    Color,
    /// Plain mask, channel order untouched
    #[default]
    Mask,
    /// 4-channel mask whose alpha is derived from the red channel before blurring
    TransparentMask,
}

/// Background + stamped primitive + optional blur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub height: u32,
    pub width: u32,
    pub background_color: Color,
    pub shape_color: Color,
    pub geometry: Geometry,
    /// Odd Gaussian kernel size; `None` leaves edges as stamped
    #[serde(default)]
    pub blur_kernel: Option<u32>,
    #[serde(default)]
    pub output: ShapeOutput,
}

impl ShapeSpec {
    pub fn new(
        height: u32,
        width: u32,
        background_color: Color,
        shape_color: Color,
        geometry: Geometry,
    ) -> Result<Self> {
        let spec = Self {
            height,
            width,
            background_color,
            shape_color,
            geometry,
            blur_kernel: None,
            output: ShapeOutput::Mask,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn with_blur(mut self, blur_kernel: Option<u32>) -> Result<Self> {
        self.blur_kernel = blur_kernel;
        self.validate()?;
        Ok(self)
    }

    pub fn with_output(mut self, output: ShapeOutput) -> Result<Self> {
        self.output = output;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::config(format!(
                "canvas dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        let channels = self.background_color.len();
        if self.shape_color.len() != channels {
            return Err(Error::config(format!(
                "background color has {} channels but shape color has {}",
                channels,
                self.shape_color.len()
            )));
        }
        check_channels(channels)?;
        if self.output == ShapeOutput::TransparentMask && channels != 4 {
            return Err(Error::config(format!(
                "transparent masks need 4-channel colors (got {})",
                channels
            )));
        }
        if let Some(k) = self.blur_kernel {
            check_kernel_size(k)?;
        }
        self.geometry.validate()
    }

    /// Fill, stamp, derive alpha, blur, reorder: in that order
    pub fn render(&self) -> Result<PixelBuffer> {
        self.validate()?;
        debug!(
            "{} {:?} {}x{} bg {} fg {} blur {:?}",
            self.geometry.name(),
            self.output,
            self.width,
            self.height,
            self.background_color,
            self.shape_color,
            self.blur_kernel
        );

        let mut buffer = PixelBuffer::filled(self.width, self.height, &self.background_color)?;
        self.geometry.stamp(&mut buffer, &self.shape_color.normalized())?;

        if self.output == ShapeOutput::TransparentMask {
            derive_alpha_from_red_channel(&mut buffer)?;
        }
        if let Some(k) = self.blur_kernel {
            buffer.gaussian_blur(k)?;
        }
        if self.output == ShapeOutput::Color {
            to_encoder_order(&mut buffer);
        }
        Ok(buffer)
    }
}

/// Set `alpha = alpha - red` on a 4-channel buffer, in place.
///
/// Assumes an opaque black/white mask: full red turns transparent, zero
/// red keeps its alpha. Other colors yield the raw difference.
pub fn derive_alpha_from_red_channel(buffer: &mut PixelBuffer) -> Result<()> {
    buffer.alpha_from_red()
}

/// RGB -> BGR reversal applied only on the colored-shape path
pub fn to_encoder_order(buffer: &mut PixelBuffer) {
    buffer.reverse_color_channels();
}

/// Render a plain shape mask (no alpha derivation, no channel reversal)
pub fn render_shape_mask(
    height: u32,
    width: u32,
    background_color: Color,
    shape_color: Color,
    geometry: Geometry,
    blur_kernel: Option<u32>,
) -> Result<PixelBuffer> {
    ShapeSpec::new(height, width, background_color, shape_color, geometry)?
        .with_blur(blur_kernel)?
        .render()
}
