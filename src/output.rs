//! PNG persistence for finished buffers
//!
//! Quantizes float buffers to 8 bits and writes them as
//! `{artifact}_{YYYYmmddHHMMSS}.png`. By default 3/4-channel buffers are
//! read as BGR(A), the way OpenCV-style encoders read them.
//!
//! The stamp is UTC, not local time, so names do not depend on the host
//! time zone. It is computed from `SystemTime` with the days-to-civil
//! conversion below.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ColorType, ImageFormat};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::PixelBuffer;

/// Channel order the encoder assumes for the color channels it receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    #[default]
    Bgr,
    Rgb,
}

impl FromStr for ChannelOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "bgr" => Ok(ChannelOrder::Bgr),
            "rgb" => Ok(ChannelOrder::Rgb),
            other => Err(Error::config(format!("unknown channel order '{}'", other))),
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOrder::Bgr => write!(f, "bgr"),
            ChannelOrder::Rgb => write!(f, "rgb"),
        }
    }
}

/// Writes buffers into a directory under timestamped names
#[derive(Debug, Clone)]
pub struct ImageWriter {
    output_dir: PathBuf,
    channel_order: ChannelOrder,
}

impl ImageWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            channel_order: ChannelOrder::default(),
        }
    }

    pub fn with_channel_order(mut self, channel_order: ChannelOrder) -> Self {
        self.channel_order = channel_order;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.channel_order
    }

    /// Quantized bytes in the RGB(A) layout PNG expects
    pub fn encode(&self, buffer: &PixelBuffer) -> Vec<u8> {
        let mut bytes = buffer.to_u8();
        if self.channel_order == ChannelOrder::Bgr && buffer.channels() >= 3 {
            for pixel in bytes.chunks_exact_mut(buffer.channels()) {
                pixel.swap(0, 2);
            }
        }
        bytes
    }

    /// Write to an explicit path
    pub fn write_to(&self, buffer: &PixelBuffer, path: &Path) -> Result<()> {
        let color = match buffer.channels() {
            1 => ColorType::L8,
            3 => ColorType::Rgb8,
            4 => ColorType::Rgba8,
            n => {
                return Err(Error::config(format!("cannot encode {} channels", n)));
            },
        };
        let bytes = self.encode(buffer);
        image::save_buffer_with_format(
            path,
            &bytes,
            buffer.width(),
            buffer.height(),
            color,
            ImageFormat::Png,
        )
        .map_err(|e| match e {
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other),
        })?;
        debug!("wrote {}x{} {:?} to {}", buffer.width(), buffer.height(), color, path.display());
        Ok(())
    }

    /// Write under `{artifact}_{timestamp}.png`, never overwriting an existing file
    pub fn write(&self, buffer: &PixelBuffer, artifact: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.unique_path(artifact, &timestamp());
        self.write_to(buffer, &path)?;
        info!("saved {}", path.display());
        Ok(path)
    }

    fn unique_path(&self, artifact: &str, stamp: &str) -> PathBuf {
        let base = artifact_stem(artifact, stamp);
        let mut path = self.output_dir.join(format!("{}.png", base));
        let mut n = 1;
        while path.exists() {
            path = self.output_dir.join(format!("{}_{}.png", base, n));
            n += 1;
        }
        path
    }
}

impl Default for ImageWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

/// `{artifact}_{stamp}`
pub fn artifact_stem(artifact: &str, stamp: &str) -> String {
    format!("{}_{}", artifact, stamp)
}

/// Current UTC time as `YYYYmmddHHMMSS`
pub fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_timestamp(secs)
}

/// Format seconds since the Unix epoch as `YYYYmmddHHMMSS` (UTC)
pub fn format_timestamp(epoch_secs: u64) -> String {
    let days = (epoch_secs / 86_400) as i64;
    let rem = epoch_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}{:02}{:02}{:02}{:02}{:02}",
        year,
        month,
        day,
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
