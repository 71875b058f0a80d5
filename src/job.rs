//! Batch rendering from JSON job files
//!
//! ```json
//! {
//!   "output_dir": "out",
//!   "channel_order": "bgr",
//!   "jobs": [
//!     { "kind": "circle_mask", "radius": 40, "white": false },
//!     { "kind": "linear", "height": 64, "width": 256,
//!       "start_color": [0, 0, 0], "end_color": [255, 255, 255],
//!       "axes": ["horizontal", "horizontal", "vertical"] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::gradient::{LinearGradient, RadialGradient};
use crate::output::{ChannelOrder, ImageWriter};
use crate::presets::{self, CircleMaskParams, Generator, LineMaskParams, Preset, RadialMaskParams};
use crate::shapes::ShapeSpec;

/// One render request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    Linear(LinearGradient),
    Radial(RadialGradient),
    Shape(ShapeSpec),
    RadialMask(RadialMaskParams),
    TransparentRadialMask(RadialMaskParams),
    CircleMask(CircleMaskParams),
    TransparentCircleMask(CircleMaskParams),
    LineMask(LineMaskParams),
    TransparentLineMask(LineMaskParams),
}

impl Job {
    /// Validate and resolve into a named generator
    pub fn to_preset(&self) -> Result<Preset> {
        match self {
            Job::Linear(g) => {
                g.validate()?;
                Ok(Generator::Linear(g.clone()).into())
            },
            Job::Radial(g) => presets::color_radial_gradient(g.clone()),
            Job::Shape(s) => {
                s.validate()?;
                Ok(Generator::Shape(s.clone()).into())
            },
            Job::RadialMask(p) => presets::radial_gradient_mask(p),
            Job::TransparentRadialMask(p) => presets::transparent_radial_gradient_mask(p),
            Job::CircleMask(p) => presets::circle_mask(p),
            Job::TransparentCircleMask(p) => presets::transparent_circle_mask(p),
            Job::LineMask(p) => presets::line_mask(p),
            Job::TransparentLineMask(p) => presets::transparent_line_mask(p),
        }
    }
}

/// A list of jobs plus where and how to write them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub channel_order: Option<ChannelOrder>,
    pub jobs: Vec<Job>,
}

impl JobFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a job file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save the job file as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Writer for this file; the fallbacks apply to settings the file leaves out
    pub fn writer(&self, fallback_dir: &Path, fallback_order: ChannelOrder) -> ImageWriter {
        let dir = self.output_dir.as_deref().unwrap_or(fallback_dir);
        ImageWriter::new(dir).with_channel_order(self.channel_order.unwrap_or(fallback_order))
    }

    /// Validate every job first, then render and write them in order
    pub fn run(&self, writer: &ImageWriter) -> Result<Vec<PathBuf>> {
        let presets = self.jobs.iter().map(Job::to_preset).collect::<Result<Vec<_>>>()?;
        info!("running {} job(s) into {}", presets.len(), writer.output_dir().display());

        let mut written = Vec::with_capacity(presets.len());
        for preset in &presets {
            let buffer = preset.render()?;
            written.push(writer.write(&buffer, &preset.artifact)?);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Axis, Color};
    use crate::error::Error;

    const SAMPLE: &str = r#"{
        "output_dir": "masks",
        "jobs": [
            { "kind": "circle_mask", "radius": 40, "white": false },
            { "kind": "transparent_line_mask", "height": 64, "width": 64,
              "segments": [[[0, 0], [64, 64]]], "blur_kernel": null },
            { "kind": "linear", "height": 8, "width": 16,
              "start_color": [0, 0, 0], "end_color": [255, 255, 255],
              "axes": ["horizontal", "horizontal", "vertical"] },
            { "kind": "radial", "height": 32, "width": 32,
              "inner_color": [255, 0, 0], "outer_color": [0, 0, 255],
              "center_x": 500, "inner_alpha": 255, "outer_alpha": 0 },
            { "kind": "shape", "height": 32, "width": 32,
              "background_color": [0, 0, 0], "shape_color": [0, 255, 0],
              "geometry": { "type": "lines", "segments": [[[0, 16], [32, 16]]], "thickness": 2 },
              "output": "color" }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let file = JobFile::from_json(SAMPLE).unwrap();
        assert_eq!(file.output_dir, Some(PathBuf::from("masks")));
        assert_eq!(file.channel_order, None);
        assert_eq!(file.jobs.len(), 5);

        match &file.jobs[0] {
            Job::CircleMask(p) => {
                assert_eq!(p.radius, 40.0);
                assert!(!p.white);
                assert_eq!(p.height, 256);
                assert_eq!(p.blur_kernel, Some(51));
            },
            other => panic!("unexpected job {:?}", other),
        }
        match &file.jobs[1] {
            Job::TransparentLineMask(p) => {
                assert_eq!(p.blur_kernel, None);
                assert_eq!(p.thickness, 5);
            },
            other => panic!("unexpected job {:?}", other),
        }
        match &file.jobs[2] {
            Job::Linear(g) => assert_eq!(g.axes[2], Axis::Vertical),
            other => panic!("unexpected job {:?}", other),
        }
        match &file.jobs[3] {
            Job::Radial(g) => {
                assert_eq!(g.center_x, Some(500.0));
                assert_eq!(g.gradient_size, 2.0);
            },
            other => panic!("unexpected job {:?}", other),
        }
    }

    #[test]
    fn test_artifact_names() {
        let file = JobFile::from_json(SAMPLE).unwrap();
        let names: Vec<String> = file
            .jobs
            .iter()
            .map(|j| j.to_preset().unwrap().artifact)
            .collect();
        assert_eq!(
            names,
            vec![
                "circle_mask",
                "trans_line_mask",
                "linear_gradient",
                "color_radial_gradient",
                "lines"
            ]
        );
    }

    #[test]
    fn test_run_writes_every_job() {
        let dir = std::env::temp_dir().join(format!("gradmask-job-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut file = JobFile::from_json(SAMPLE).unwrap();
        // Keep the test fast
        file.jobs[0] = Job::CircleMask(CircleMaskParams {
            height: 32,
            width: 32,
            radius: 8.0,
            blur_kernel: Some(3),
            ..CircleMaskParams::default()
        });
        file.output_dir = None;

        let written = file.run(&file.writer(&dir, ChannelOrder::Bgr)).unwrap();
        assert_eq!(written.len(), 5);
        for path in &written {
            assert!(path.exists(), "missing {}", path.display());
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_job_fails_before_writing() {
        let dir = std::env::temp_dir().join(format!("gradmask-badjob-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let file = JobFile {
            output_dir: None,
            channel_order: Some(ChannelOrder::Rgb),
            jobs: vec![
                Job::Linear(LinearGradient {
                    height: 4,
                    width: 4,
                    start_color: Color::black(),
                    end_color: Color::white(),
                    axes: vec![Axis::Horizontal; 3],
                }),
                Job::CircleMask(CircleMaskParams {
                    blur_kernel: Some(8),
                    ..CircleMaskParams::default()
                }),
            ],
        };
        let err = file.run(&file.writer(&dir, ChannelOrder::Bgr));
        assert!(matches!(err, Err(Error::Configuration(_))));
        assert!(!dir.exists());
    }

    #[test]
    fn test_writer_fallbacks() {
        let mut file = JobFile::from_json(SAMPLE).unwrap();
        let writer = file.writer(Path::new("elsewhere"), ChannelOrder::Rgb);
        assert_eq!(writer.output_dir(), Path::new("masks"));
        assert_eq!(writer.channel_order(), ChannelOrder::Rgb);

        file.output_dir = None;
        file.channel_order = Some(ChannelOrder::Bgr);
        let writer = file.writer(Path::new("elsewhere"), ChannelOrder::Rgb);
        assert_eq!(writer.output_dir(), Path::new("elsewhere"));
        assert_eq!(writer.channel_order(), ChannelOrder::Bgr);
    }

    #[test]
    fn test_unknown_kind_is_json_error() {
        let err = JobFile::from_json(r#"{"jobs": [{"kind": "spiral"}]}"#);
        assert!(matches!(err, Err(Error::Json(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("gradmask-jobs-{}.json", std::process::id()));
        let file = JobFile::from_json(SAMPLE).unwrap();
        file.save(&path).unwrap();
        let loaded = JobFile::load(&path).unwrap();
        assert_eq!(loaded, file);
        let _ = fs::remove_file(&path);
    }
}
