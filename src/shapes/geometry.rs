use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::PixelBuffer;

pub const DEFAULT_LINE_THICKNESS: u32 = 5;

fn default_line_thickness() -> u32 {
    DEFAULT_LINE_THICKNESS
}

/// A point in pixel coordinates; serializes as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f32, pub f32);

impl Point {
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.1
    }
}

/// A straight segment from its first point to its second; serializes as `[[x0, y0], [x1, y1]]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment(pub Point, pub Point);

impl Segment {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self(Point(x0, y0), Point(x1, y1))
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

impl FromStr for Segment {
    type Err = Error;

    /// Parse `x0,y0,x1,y1`
    fn from_str(s: &str) -> Result<Self> {
        let coords = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f32>()
                    .map_err(|e| Error::config(format!("bad coordinate '{}': {}", part, e)))
            })
            .collect::<Result<Vec<f32>>>()?;
        if let Some(bad) = coords.iter().find(|v| !v.is_finite()) {
            return Err(Error::config(format!("segment coordinate must be finite (got {})", bad)));
        }
        match coords.as_slice() {
            &[x0, y0, x1, y1] => Ok(Self::new(x0, y0, x1, y1)),
            _ => Err(Error::config(format!(
                "segment needs 4 coordinates x0,y0,x1,y1 (got '{}')",
                s
            ))),
        }
    }
}

/// Primitive stamped onto a shape background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Disc (no thickness) or ring outline `thickness` pixels wide.
    /// Center defaults to the buffer center.
    Circle {
        radius: f32,
        #[serde(default)]
        center: Option<Point>,
        #[serde(default)]
        thickness: Option<u32>,
    },
    /// Segments drawn in list order with a uniform thickness
    Lines {
        segments: Vec<Segment>,
        #[serde(default = "default_line_thickness")]
        thickness: u32,
    },
}

impl Geometry {
    pub fn filled_circle(radius: f32) -> Self {
        Geometry::Circle {
            radius,
            center: None,
            thickness: None,
        }
    }

    pub fn lines(segments: Vec<Segment>, thickness: u32) -> Self {
        Geometry::Lines {
            segments,
            thickness,
        }
    }

    /// Short name used in artifact file names
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Circle { .. } => "circle",
            Geometry::Lines { .. } => "line",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Geometry::Circle { radius, center, .. } => {
                if !radius.is_finite() || *radius < 0.0 {
                    return Err(Error::config(format!(
                        "circle radius must be a non-negative number (got {})",
                        radius
                    )));
                }
                if let Some(c) = center.filter(|c| !c.is_finite()) {
                    return Err(Error::config(format!(
                        "circle center must be finite (got {:?})",
                        c
                    )));
                }
            },
            Geometry::Lines {
                segments,
                thickness,
            } => {
                if segments.is_empty() {
                    return Err(Error::config("line geometry needs at least one segment"));
                }
                if *thickness == 0 {
                    return Err(Error::config("line thickness must be at least 1"));
                }
                if let Some(s) = segments.iter().find(|s| !s.is_finite()) {
                    return Err(Error::config(format!(
                        "segment coordinates must be finite (got {:?})",
                        s
                    )));
                }
            },
        }
        Ok(())
    }

    /// Rasterize onto `buffer` with a normalized color of the buffer's channel count
    pub fn stamp(&self, buffer: &mut PixelBuffer, color: &[f32]) -> Result<()> {
        buffer.check_color(color)?;
        match self {
            Geometry::Circle {
                radius,
                center,
                thickness,
            } => {
                let Point(cx, cy) = center.unwrap_or_else(|| default_center(buffer));
                match thickness {
                    Some(t) => buffer.stroke_circle_aa(cx, cy, *radius, *t, color),
                    None => buffer.fill_circle_aa(cx, cy, *radius, color),
                }
            },
            Geometry::Lines {
                segments,
                thickness,
            } => {
                for Segment(start, end) in segments {
                    buffer.line_thick_aa(start.0, start.1, end.0, end.1, *thickness, color);
                }
            },
        }
        Ok(())
    }
}

/// Buffer center with integer truncation, (width / 2, height / 2)
pub fn default_center(buffer: &PixelBuffer) -> Point {
    Point((buffer.width() / 2) as f32, (buffer.height() / 2) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parse() {
        let s: Segment = "0, 128,256,128".parse().unwrap();
        assert_eq!(s, Segment::new(0.0, 128.0, 256.0, 128.0));
        assert!("1,2,3".parse::<Segment>().is_err());
        assert!("1,2,3,x".parse::<Segment>().is_err());
        assert!("NaN,0,1,1".parse::<Segment>().is_err());
        assert!("0,0,inf,1".parse::<Segment>().is_err());
    }

    #[test]
    fn test_geometry_json() {
        let circle: Geometry =
            serde_json::from_str(r#"{"type": "circle", "radius": 50, "center": [10, 20]}"#).unwrap();
        assert_eq!(
            circle,
            Geometry::Circle {
                radius: 50.0,
                center: Some(Point(10.0, 20.0)),
                thickness: None
            }
        );

        let lines: Geometry =
            serde_json::from_str(r#"{"type": "lines", "segments": [[[0, 0], [256, 256]]]}"#)
                .unwrap();
        assert_eq!(
            lines,
            Geometry::lines(vec![Segment::new(0.0, 0.0, 256.0, 256.0)], DEFAULT_LINE_THICKNESS)
        );
    }

    #[test]
    fn test_geometry_validation() {
        assert!(Geometry::filled_circle(-1.0).validate().is_err());
        assert!(Geometry::filled_circle(0.0).validate().is_ok());
        assert!(Geometry::lines(Vec::new(), 3).validate().is_err());
        assert!(Geometry::lines(vec![Segment::new(0.0, 0.0, 1.0, 1.0)], 0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let nan_segment = Geometry::lines(vec![Segment::new(0.0, f32::NAN, 4.0, 4.0)], 1);
        assert!(matches!(nan_segment.validate(), Err(Error::Configuration(_))));
        let inf_segment = Geometry::lines(vec![Segment::new(0.0, 0.0, f32::INFINITY, 4.0)], 3);
        assert!(matches!(inf_segment.validate(), Err(Error::Configuration(_))));

        let circle = Geometry::Circle {
            radius: 4.0,
            center: Some(Point(f32::NAN, 2.0)),
            thickness: None,
        };
        assert!(matches!(circle.validate(), Err(Error::Configuration(_))));
        assert!(Geometry::filled_circle(f32::INFINITY).validate().is_err());
    }

    #[test]
    fn test_stamp_far_off_canvas_hairline() {
        let mut buf = PixelBuffer::with_size(16, 16, 3).unwrap();
        let geometry = Geometry::lines(
            vec![
                Segment::new(0.0, 3.0e9, 10.0, 3.0e9),
                Segment::new(-3.0e9, -3.0e9, -1.0e9, -2.0e9),
            ],
            1,
        );
        geometry.validate().unwrap();
        geometry.stamp(&mut buf, &[1.0, 1.0, 1.0]).unwrap();
        assert!(buf.to_u8().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_stamp_zero_length_segment_and_zero_radius() {
        let mut buf = PixelBuffer::with_size(9, 9, 1).unwrap();
        Geometry::lines(vec![Segment::new(4.0, 4.0, 4.0, 4.0)], 3)
            .stamp(&mut buf, &[1.0])
            .unwrap();
        assert_eq!(buf.pixel_u8(4, 4).unwrap(), vec![255]);

        let mut buf = PixelBuffer::with_size(9, 9, 1).unwrap();
        Geometry::filled_circle(0.0).stamp(&mut buf, &[1.0]).unwrap();
        assert_eq!(buf.pixel_u8(4, 4).unwrap(), vec![255]);
        assert_eq!(buf.pixel_u8(6, 4).unwrap(), vec![0]);
    }

    #[test]
    fn test_stamp_rejects_mismatched_color() {
        let mut buf = PixelBuffer::with_size(4, 4, 3).unwrap();
        let err = Geometry::filled_circle(1.0).stamp(&mut buf, &[1.0, 1.0, 1.0, 1.0]);
        assert!(matches!(err, Err(Error::Configuration(_))));
        assert!(buf.to_u8().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_default_center_truncates() {
        let buf = PixelBuffer::with_size(7, 5, 1).unwrap();
        assert_eq!(default_center(&buf), Point(3.0, 2.0));
    }
}
