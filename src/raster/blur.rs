use super::PixelBuffer;
use crate::error::{Error, Result};

/// Sigma derived from the kernel size, as common imaging libraries do
/// when no explicit sigma is given: `0.3 * ((k - 1) * 0.5 - 1) + 0.8`
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian weights for an odd kernel size
pub fn gaussian_kernel(kernel_size: u32) -> Result<Vec<f32>> {
    check_kernel_size(kernel_size)?;
    let sigma = sigma_for_kernel(kernel_size);
    let half = (kernel_size / 2) as i32;
    let denom = 2.0 * sigma * sigma;

    let mut weights: Vec<f32> = (-half..=half)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    Ok(weights)
}

/// Blur kernels must be odd and positive
pub fn check_kernel_size(kernel_size: u32) -> Result<()> {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return Err(Error::config(format!(
            "blur kernel size must be a positive odd number (got {})",
            kernel_size
        )));
    }
    Ok(())
}

/// Mirror an out-of-range index without repeating the border sample
/// (`gfedcb|abcdefgh|gfedcba`)
#[inline]
fn reflect_101(mut i: i32, len: i32) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    i = i.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

impl PixelBuffer {
    /// Separable Gaussian blur over every channel (alpha included).
    /// Mirrors at the edges. Allocates one temporary buffer internally.
    pub fn gaussian_blur(&mut self, kernel_size: u32) -> Result<()> {
        let kernel = gaussian_kernel(kernel_size)?;
        if kernel.len() == 1 {
            return Ok(());
        }

        let w = self.width() as i32;
        let h = self.height() as i32;
        let ch = self.channels();
        let half = (kernel.len() / 2) as i32;
        let stride = w as usize * ch;

        let src = self.as_mut_slice();
        let mut temp = vec![0.0f32; src.len()];

        // --- Horizontal pass: src -> temp ---
        for y in 0..h as usize {
            let row = y * stride;
            for x in 0..w {
                let out = row + x as usize * ch;
                for (k, &weight) in kernel.iter().enumerate() {
                    let sx = reflect_101(x + k as i32 - half, w);
                    let inp = row + sx * ch;
                    for c in 0..ch {
                        temp[out + c] += src[inp + c] * weight;
                    }
                }
            }
        }

        // --- Vertical pass: temp -> src ---
        src.fill(0.0);
        for y in 0..h {
            let out_row = y as usize * stride;
            for (k, &weight) in kernel.iter().enumerate() {
                let in_row = reflect_101(y + k as i32 - half, h) * stride;
                for i in 0..stride {
                    src[out_row + i] += temp[in_row + i] * weight;
                }
            }
        }

        Ok(())
    }
}
