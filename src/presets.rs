//! Named generator presets
//!
//! Each preset is a fully specified generator plus the artifact name its
//! output files carry. Masks come in black-on-white / white-on-black and
//! transparent flavors.

use serde::{Deserialize, Serialize};

use crate::color::{Axis, Color};
use crate::error::Result;
use crate::gradient::{LinearGradient, RadialGradient, DEFAULT_GRADIENT_SIZE};
use crate::raster::PixelBuffer;
use crate::shapes::{Geometry, Point, Segment, ShapeOutput, ShapeSpec, DEFAULT_LINE_THICKNESS};

pub const DEFAULT_SIZE: u32 = 256;
pub const DEFAULT_RADIUS: f32 = 50.0;
pub const CIRCLE_MASK_BLUR: u32 = 51;
pub const LINE_MASK_BLUR: u32 = 31;

/// One of the three generator families, fully parameterized
#[derive(Debug, Clone, PartialEq)]
pub enum Generator {
    Linear(LinearGradient),
    Radial(RadialGradient),
    Shape(ShapeSpec),
}

impl Generator {
    pub fn render(&self) -> Result<PixelBuffer> {
        match self {
            Generator::Linear(g) => g.render(),
            Generator::Radial(g) => g.render(),
            Generator::Shape(s) => s.render(),
        }
    }

    /// Artifact name when none is given explicitly
    pub fn default_artifact(&self) -> String {
        match self {
            Generator::Linear(_) => "linear_gradient".to_string(),
            Generator::Radial(_) => "color_radial_gradient".to_string(),
            Generator::Shape(spec) => {
                let shape = match &spec.geometry {
                    Geometry::Circle { .. } => "circle",
                    Geometry::Lines { .. } => "lines",
                };
                match spec.output {
                    ShapeOutput::Color => shape.to_string(),
                    ShapeOutput::Mask => format!("{}_mask", spec.geometry.name()),
                    ShapeOutput::TransparentMask => {
                        format!("trans_{}_mask", spec.geometry.name())
                    },
                }
            },
        }
    }
}

/// A generator with the name its output is saved under
#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub artifact: String,
    pub generator: Generator,
}

impl Preset {
    pub fn new(artifact: impl Into<String>, generator: Generator) -> Self {
        Self {
            artifact: artifact.into(),
            generator,
        }
    }

    pub fn render(&self) -> Result<PixelBuffer> {
        self.generator.render()
    }
}

impl From<Generator> for Preset {
    fn from(generator: Generator) -> Self {
        Self {
            artifact: generator.default_artifact(),
            generator,
        }
    }
}

// ============================================================================
// Preset Parameters
// ============================================================================

/// Black/white radial mask parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialMaskParams {
    pub height: u32,
    pub width: u32,
    pub center_x: Option<f32>,
    pub center_y: Option<f32>,
    pub gradient_size: f32,
    /// Black at the center fading to white outside; `false` swaps them
    pub inner_to_outer: bool,
}

impl Default for RadialMaskParams {
    fn default() -> Self {
        Self {
            height: DEFAULT_SIZE,
            width: DEFAULT_SIZE,
            center_x: None,
            center_y: None,
            gradient_size: DEFAULT_GRADIENT_SIZE,
            inner_to_outer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleMaskParams {
    pub height: u32,
    pub width: u32,
    pub radius: f32,
    pub center: Option<Point>,
    pub blur_kernel: Option<u32>,
    /// White circle on black; `false` gives a black circle on white
    pub white: bool,
}

impl Default for CircleMaskParams {
    fn default() -> Self {
        Self {
            height: DEFAULT_SIZE,
            width: DEFAULT_SIZE,
            radius: DEFAULT_RADIUS,
            center: None,
            blur_kernel: Some(CIRCLE_MASK_BLUR),
            white: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMaskParams {
    pub height: u32,
    pub width: u32,
    pub segments: Vec<Segment>,
    pub thickness: u32,
    pub blur_kernel: Option<u32>,
    /// White lines on black; `false` gives black lines on white
    pub white: bool,
}

impl Default for LineMaskParams {
    fn default() -> Self {
        Self {
            height: DEFAULT_SIZE,
            width: DEFAULT_SIZE,
            segments: star_segments(DEFAULT_SIZE, DEFAULT_SIZE),
            thickness: DEFAULT_LINE_THICKNESS,
            blur_kernel: Some(LINE_MASK_BLUR),
            white: true,
        }
    }
}

/// Both diagonals plus the horizontal and vertical center lines
pub fn star_segments(height: u32, width: u32) -> Vec<Segment> {
    let (w, h) = (width as f32, height as f32);
    let (mx, my) = ((width / 2) as f32, (height / 2) as f32);
    vec![
        Segment::new(0.0, 0.0, w, h),
        Segment::new(0.0, my, w, my),
        Segment::new(mx, 0.0, mx, h),
        Segment::new(0.0, h, w, 0.0),
    ]
}

/// (background, shape) for a mask, optionally with opaque alpha
fn mask_colors(white_shape: bool, with_alpha: bool) -> (Color, Color) {
    let (bg, fg) = if white_shape {
        (Color::black(), Color::white())
    } else {
        (Color::white(), Color::black())
    };
    if with_alpha {
        (bg.with_alpha(255), fg.with_alpha(255))
    } else {
        (bg, fg)
    }
}

// ============================================================================
// Gradients
// ============================================================================

pub fn linear_gradient(
    height: u32,
    width: u32,
    start_color: Color,
    end_color: Color,
    axes: Vec<Axis>,
) -> Result<Preset> {
    let g = LinearGradient::new(height, width, start_color, end_color, axes)?;
    Ok(Generator::Linear(g).into())
}

pub fn horizontal_gradient(
    height: u32,
    width: u32,
    start_color: Color,
    end_color: Color,
) -> Result<Preset> {
    let g = LinearGradient::uniform(height, width, start_color, end_color, Axis::Horizontal)?;
    Ok(Generator::Linear(g).into())
}

pub fn vertical_gradient(
    height: u32,
    width: u32,
    start_color: Color,
    end_color: Color,
) -> Result<Preset> {
    let g = LinearGradient::uniform(height, width, start_color, end_color, Axis::Vertical)?;
    Ok(Generator::Linear(g).into())
}

pub fn color_radial_gradient(gradient: RadialGradient) -> Result<Preset> {
    gradient.validate()?;
    Ok(Preset::new("color_radial_gradient", Generator::Radial(gradient)))
}

pub fn radial_gradient_mask(params: &RadialMaskParams) -> Result<Preset> {
    let (inner, outer) = if params.inner_to_outer {
        (Color::black(), Color::white())
    } else {
        (Color::white(), Color::black())
    };
    let g = RadialGradient::new(params.height, params.width, inner, outer)?
        .with_center(params.center_x, params.center_y)
        .with_gradient_size(params.gradient_size)?;
    Ok(Preset::new("radial_gradient", Generator::Radial(g)))
}

/// Opaque black center fading to fully transparent white (or the reverse)
pub fn transparent_radial_gradient_mask(params: &RadialMaskParams) -> Result<Preset> {
    let black = Color::rgba(0, 0, 0, 255);
    let clear_white = Color::rgba(255, 255, 255, 0);
    let (inner, outer) = if params.inner_to_outer {
        (black, clear_white)
    } else {
        (clear_white, black)
    };
    let g = RadialGradient::new(params.height, params.width, inner, outer)?
        .with_center(params.center_x, params.center_y)
        .with_gradient_size(params.gradient_size)?;
    Ok(Preset::new("transparent_radial_gradient", Generator::Radial(g)))
}

// ============================================================================
// Shapes
// ============================================================================

/// Colored circle; output channels come out BGR-ordered
pub fn circle(
    background_color: Color,
    circle_color: Color,
    height: u32,
    width: u32,
    radius: f32,
    center: Option<Point>,
    blur_kernel: Option<u32>,
) -> Result<Preset> {
    let geometry = Geometry::Circle {
        radius,
        center,
        thickness: None,
    };
    let spec = ShapeSpec::new(height, width, background_color, circle_color, geometry)?
        .with_blur(blur_kernel)?
        .with_output(ShapeOutput::Color)?;
    Ok(Preset::new("circle", Generator::Shape(spec)))
}

fn circle_mask_spec(params: &CircleMaskParams, transparent: bool) -> Result<ShapeSpec> {
    let (bg, fg) = mask_colors(params.white, transparent);
    let geometry = Geometry::Circle {
        radius: params.radius,
        center: params.center,
        thickness: None,
    };
    let output = if transparent {
        ShapeOutput::TransparentMask
    } else {
        ShapeOutput::Mask
    };
    ShapeSpec::new(params.height, params.width, bg, fg, geometry)?
        .with_blur(params.blur_kernel)?
        .with_output(output)
}

pub fn circle_mask(params: &CircleMaskParams) -> Result<Preset> {
    let spec = circle_mask_spec(params, false)?;
    Ok(Preset::new("circle_mask", Generator::Shape(spec)))
}

pub fn transparent_circle_mask(params: &CircleMaskParams) -> Result<Preset> {
    let spec = circle_mask_spec(params, true)?;
    Ok(Preset::new("trans_circle_mask", Generator::Shape(spec)))
}

/// Colored lines; output channels come out BGR-ordered
pub fn lines(
    segments: Vec<Segment>,
    background_color: Color,
    line_color: Color,
    thickness: u32,
    height: u32,
    width: u32,
    blur_kernel: Option<u32>,
) -> Result<Preset> {
    let spec = ShapeSpec::new(
        height,
        width,
        background_color,
        line_color,
        Geometry::lines(segments, thickness),
    )?
    .with_blur(blur_kernel)?
    .with_output(ShapeOutput::Color)?;
    Ok(Preset::new("lines", Generator::Shape(spec)))
}

fn line_mask_spec(params: &LineMaskParams, transparent: bool) -> Result<ShapeSpec> {
    let (bg, fg) = mask_colors(params.white, transparent);
    let geometry = Geometry::lines(params.segments.clone(), params.thickness);
    let output = if transparent {
        ShapeOutput::TransparentMask
    } else {
        ShapeOutput::Mask
    };
    ShapeSpec::new(params.height, params.width, bg, fg, geometry)?
        .with_blur(params.blur_kernel)?
        .with_output(output)
}

pub fn line_mask(params: &LineMaskParams) -> Result<Preset> {
    let spec = line_mask_spec(params, false)?;
    Ok(Preset::new("line_mask", Generator::Shape(spec)))
}

pub fn transparent_line_mask(params: &LineMaskParams) -> Result<Preset> {
    let spec = line_mask_spec(params, true)?;
    Ok(Preset::new("trans_line_mask", Generator::Shape(spec)))
}
