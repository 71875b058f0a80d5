//! Shape masks: uniform background, anti-aliased primitives, optional alpha and blur

mod geometry;
mod mask;

pub use geometry::{default_center, Geometry, Point, Segment, DEFAULT_LINE_THICKNESS};
pub use mask::{
    derive_alpha_from_red_channel, render_shape_mask, to_encoder_order, ShapeOutput, ShapeSpec,
};
