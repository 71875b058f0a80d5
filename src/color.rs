//! Color tuples and channel helpers shared by every generator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Channel counts a buffer may carry: gray, RGB, RGBA
pub const SUPPORTED_CHANNELS: [usize; 3] = [1, 3, 4];

/// Convert an 8-bit channel value into the normalized 0.0-1.0 domain
#[inline]
pub fn normalize(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Scale a normalized sample to 0-255, clamp, and round to 8 bits
#[inline]
pub fn quantize(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Reject channel counts the buffer and encoder cannot represent
pub fn check_channels(channels: usize) -> Result<()> {
    if SUPPORTED_CHANNELS.contains(&channels) {
        Ok(())
    } else {
        Err(Error::config(format!(
            "unsupported channel count {} (expected 1, 3 or 4)",
            channels
        )))
    }
}

/// Direction along which a linear ramp varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Ramp runs left to right; every row is identical
    #[default]
    Horizontal,
    /// Ramp runs top to bottom; every column is identical
    Vertical,
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "h" | "horizontal" => Ok(Axis::Horizontal),
            "v" | "vertical" => Ok(Axis::Vertical),
            other => Err(Error::config(format!("unknown axis '{}'", other))),
        }
    }
}

/// A color as given by the caller: one 0-255 value per channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(Vec<u8>);

impl Color {
    pub fn new(channels: impl Into<Vec<u8>>) -> Self {
        Self(channels.into())
    }

    pub fn gray(v: u8) -> Self {
        Self(vec![v])
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(vec![r, g, b])
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(vec![r, g, b, a])
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn channels(&self) -> &[u8] {
        &self.0
    }

    /// Per-channel values in the 0.0-1.0 domain
    pub fn normalized(&self) -> Vec<f32> {
        self.0.iter().map(|&v| normalize(v)).collect()
    }

    /// Append an alpha channel to a 3-channel color
    pub fn with_alpha(&self, alpha: u8) -> Self {
        let mut channels = self.0.clone();
        channels.push(alpha);
        Self(channels)
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self(c.to_vec())
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self(c.to_vec())
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Parse a comma-separated list such as `255,128,0` or `0,0,0,255`
    fn from_str(s: &str) -> Result<Self> {
        let channels = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u8>()
                    .map_err(|e| Error::config(format!("bad color channel '{}': {}", part, e)))
            })
            .collect::<Result<Vec<u8>>>()?;
        check_channels(channels.len())?;
        Ok(Self(channels))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u8::to_string).collect();
        write!(f, "({})", parts.join(", "))
    }
}
