use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{check_channels, normalize, Axis, Color};
use crate::error::{Error, Result};
use crate::raster::PixelBuffer;

/// `n` evenly spaced samples from `start` to `stop`, both inclusive.
/// A single sample degenerates to `start`.
pub fn ramp(start: f32, stop: f32, n: u32) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f32;
            let mut samples: Vec<f32> = (0..n).map(|i| start + step * i as f32).collect();
            // Pin the last sample so rounding never misses the endpoint
            samples[n as usize - 1] = stop;
            samples
        },
    }
}

/// Row-major `height x width` scalar field varying from `start` to `stop`
/// along `axis` and constant across it
pub fn gradient_2d(start: f32, stop: f32, width: u32, height: u32, axis: Axis) -> Vec<f32> {
    let (w, h) = (width as usize, height as usize);
    let mut field = Vec::with_capacity(w * h);
    match axis {
        Axis::Horizontal => {
            let row = ramp(start, stop, width);
            for _ in 0..h {
                field.extend_from_slice(&row);
            }
        },
        Axis::Vertical => {
            for v in ramp(start, stop, height) {
                field.extend(std::iter::repeat(v).take(w));
            }
        },
    }
    field
}

/// Per-channel linear gradient. Each channel ramps from its start value to
/// its end value along its own axis, so mixed axes give diagonal looks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub height: u32,
    pub width: u32,
    pub start_color: Color,
    pub end_color: Color,
    pub axes: Vec<Axis>,
}

impl LinearGradient {
    pub fn new(
        height: u32,
        width: u32,
        start_color: Color,
        end_color: Color,
        axes: Vec<Axis>,
    ) -> Result<Self> {
        let gradient = Self {
            height,
            width,
            start_color,
            end_color,
            axes,
        };
        gradient.validate()?;
        Ok(gradient)
    }

    /// Every channel ramps along the same axis
    pub fn uniform(
        height: u32,
        width: u32,
        start_color: Color,
        end_color: Color,
        axis: Axis,
    ) -> Result<Self> {
        let axes = vec![axis; start_color.len()];
        Self::new(height, width, start_color, end_color, axes)
    }

    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::config(format!(
                "gradient dimensions must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        let channels = self.start_color.len();
        if self.end_color.len() != channels || self.axes.len() != channels {
            return Err(Error::config(format!(
                "channel mismatch: start has {}, end has {}, axes has {}",
                channels,
                self.end_color.len(),
                self.axes.len()
            )));
        }
        check_channels(channels)
    }

    pub fn channels(&self) -> usize {
        self.start_color.len()
    }

    pub fn render(&self) -> Result<PixelBuffer> {
        self.validate()?;
        let channels = self.channels();
        debug!(
            "linear gradient {}x{} {} -> {} axes {:?}",
            self.width, self.height, self.start_color, self.end_color, self.axes
        );

        let mut buffer = PixelBuffer::with_size(self.width, self.height, channels)?;
        let starts = self.start_color.channels();
        let stops = self.end_color.channels();
        for (c, &axis) in self.axes.iter().enumerate() {
            let plane = gradient_2d(
                normalize(starts[c]),
                normalize(stops[c]),
                self.width,
                self.height,
                axis,
            );
            for (pixel, v) in buffer.as_mut_slice().chunks_exact_mut(channels).zip(plane) {
                pixel[c] = v;
            }
        }
        Ok(buffer)
    }
}

/// Render a linear gradient with one start, end and axis per channel
pub fn render_linear_gradient(
    height: u32,
    width: u32,
    start_color: Color,
    end_color: Color,
    axes: Vec<Axis>,
) -> Result<PixelBuffer> {
    LinearGradient::new(height, width, start_color, end_color, axes)?.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    const H3: [Axis; 3] = [Axis::Horizontal; 3];
    const V3: [Axis; 3] = [Axis::Vertical; 3];

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp(0.0, 1.0, 1), vec![0.0]);
        assert_eq!(ramp(0.0, 1.0, 2), vec![0.0, 1.0]);
        let r = ramp(0.2, 0.9, 8);
        assert_eq!(r[0], 0.2);
        assert_eq!(r[7], 0.9);
        assert!(r.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_four_by_four_black_to_white() {
        let buf =
            render_linear_gradient(4, 4, Color::black(), Color::white(), H3.to_vec()).unwrap();
        assert_eq!((buf.width(), buf.height(), buf.channels()), (4, 4, 3));
        let expected = [0u8, 85, 170, 255];
        for y in 0..4 {
            for (x, &v) in expected.iter().enumerate() {
                assert_eq!(buf.pixel_u8(x as u32, y).unwrap(), vec![v, v, v]);
            }
        }
    }

    #[test]
    fn test_horizontal_rows_identical_and_monotonic() {
        let start = Color::rgb(10, 200, 0);
        let end = Color::rgb(250, 20, 255);
        let buf = render_linear_gradient(7, 13, start.clone(), end.clone(), H3.to_vec()).unwrap();
        let bytes = buf.to_u8();
        let row_len = 13 * 3;
        let first_row = &bytes[..row_len];
        for row in bytes.chunks(row_len) {
            assert_eq!(row, first_row);
        }
        assert_eq!(buf.pixel_u8(0, 3).unwrap(), start.channels());
        assert_eq!(buf.pixel_u8(12, 3).unwrap(), end.channels());
        for x in 1..13 {
            let prev = buf.pixel(x - 1, 0).unwrap();
            let cur = buf.pixel(x, 0).unwrap();
            assert!(cur[0] >= prev[0]);
            assert!(cur[1] <= prev[1]);
            assert!(cur[2] >= prev[2]);
        }
    }

    #[test]
    fn test_vertical_columns_identical() {
        let buf =
            render_linear_gradient(9, 5, Color::black(), Color::white(), V3.to_vec()).unwrap();
        for y in 0..9 {
            let first = buf.pixel_u8(0, y).unwrap();
            for x in 1..5 {
                assert_eq!(buf.pixel_u8(x, y).unwrap(), first);
            }
        }
        assert_eq!(buf.pixel_u8(2, 0).unwrap(), vec![0, 0, 0]);
        assert_eq!(buf.pixel_u8(2, 8).unwrap(), vec![255, 255, 255]);
        for y in 1..9 {
            assert!(buf.sample(0, y, 0) >= buf.sample(0, y - 1, 0));
        }
    }

    #[test]
    fn test_independent_axes_per_channel() {
        let axes = vec![Axis::Horizontal, Axis::Vertical, Axis::Horizontal];
        let buf = render_linear_gradient(3, 3, Color::black(), Color::white(), axes).unwrap();
        // Red varies along x only, green along y only
        assert_eq!(buf.pixel_u8(2, 0).unwrap(), vec![255, 0, 255]);
        assert_eq!(buf.pixel_u8(0, 2).unwrap(), vec![0, 255, 0]);
    }

    #[test]
    fn test_single_sample_degenerates_to_start() {
        let buf = render_linear_gradient(1, 1, Color::rgb(30, 60, 90), Color::white(), H3.to_vec())
            .unwrap();
        assert_eq!(buf.pixel_u8(0, 0).unwrap(), vec![30, 60, 90]);

        let tall =
            render_linear_gradient(6, 1, Color::black(), Color::white(), H3.to_vec()).unwrap();
        for y in 0..6 {
            assert_eq!(tall.pixel_u8(0, y).unwrap(), vec![0, 0, 0]);
        }
    }

    #[test]
    fn test_rgba_gradient() {
        let buf = LinearGradient::uniform(
            2,
            3,
            Color::rgba(0, 0, 0, 255),
            Color::rgba(255, 255, 255, 0),
            Axis::Horizontal,
        )
        .unwrap()
        .render()
        .unwrap();
        assert_eq!(buf.channels(), 4);
        assert_eq!(buf.pixel_u8(2, 1).unwrap(), vec![255, 255, 255, 0]);
    }

    #[test]
    fn test_channel_mismatch_is_config_error() {
        let err = LinearGradient::new(4, 4, Color::black(), Color::white(), vec![Axis::Vertical; 2]);
        assert!(matches!(err, Err(Error::Configuration(_))));

        let err = LinearGradient::new(
            4,
            4,
            Color::black(),
            Color::rgba(0, 0, 0, 0),
            H3.to_vec(),
        );
        assert!(matches!(err, Err(Error::Configuration(_))));

        let err = LinearGradient::new(0, 4, Color::black(), Color::white(), H3.to_vec());
        assert!(matches!(err, Err(Error::Configuration(_))));
    }
}
