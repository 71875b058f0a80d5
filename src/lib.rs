//! Procedural gradient and shape-mask generation
//!
//! Three generator families produce float pixel buffers in `0.0..=1.0`:
//!
//! - linear gradients with an independent axis per channel
//! - radial gradients around a configurable center, optionally with alpha
//! - shape masks: anti-aliased circles and lines on a uniform background,
//!   with optional red-to-alpha derivation and Gaussian blur
//!
//! Buffers are quantized to 8 bits only when they are written out by
//! [`output::ImageWriter`].
//!
//! ```no_run
//! use gradmask::{presets, output::ImageWriter};
//!
//! let preset = presets::circle_mask(&presets::CircleMaskParams::default())?;
//! let buffer = preset.render()?;
//! ImageWriter::new("out").write(&buffer, &preset.artifact)?;
//! # Ok::<(), gradmask::Error>(())
//! ```

pub mod color;
pub mod error;
pub mod gradient;
pub mod job;
pub mod output;
pub mod presets;
pub mod raster;
pub mod shapes;

pub use color::{Axis, Color};
pub use error::{Error, Result};
pub use gradient::{render_linear_gradient, render_radial_gradient};
pub use raster::PixelBuffer;
pub use shapes::render_shape_mask;
