//! Float pixel canvas and the rasterization primitives that draw into it

mod blur;
mod pixel_buffer;

pub use blur::{check_kernel_size, gaussian_kernel, sigma_for_kernel};
pub use pixel_buffer::PixelBuffer;
