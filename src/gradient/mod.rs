//! Analytic gradient generators: every pixel is a pure function of its coordinates

mod linear;
mod radial;

pub use linear::{gradient_2d, ramp, render_linear_gradient, LinearGradient};
pub use radial::{render_radial_gradient, RadialGradient, DEFAULT_GRADIENT_SIZE};
