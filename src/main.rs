use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gradmask::color::{Axis, Color};
use gradmask::gradient::{RadialGradient, DEFAULT_GRADIENT_SIZE};
use gradmask::job::JobFile;
use gradmask::output::{ChannelOrder, ImageWriter};
use gradmask::presets::{
    self, CircleMaskParams, Generator, LineMaskParams, Preset, RadialMaskParams,
    CIRCLE_MASK_BLUR, DEFAULT_RADIUS, DEFAULT_SIZE, LINE_MASK_BLUR,
};
use gradmask::shapes::{Geometry, Point, Segment, ShapeOutput, ShapeSpec, DEFAULT_LINE_THICKNESS};
use log::info;

#[derive(Parser)]
#[command(name = "gradmask", version, about = "Procedural gradient and shape-mask generator")]
struct Cli {
    /// Directory the PNG files are written to
    #[arg(long, short = 'o', global = true, default_value = ".")]
    output_dir: PathBuf,
    /// How the encoder reads color channels: bgr or rgb
    #[arg(long, global = true, default_value_t = ChannelOrder::Bgr)]
    channel_order: ChannelOrder,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    #[command(flatten)]
    Render(Render),
    /// Render every job in a JSON job file
    Job {
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum Render {
    /// Per-channel linear gradient
    Linear {
        #[command(flatten)]
        canvas: Canvas,
        /// Start color, e.g. 0,0,0
        #[arg(long, default_value = "0,0,0")]
        start: Color,
        /// End color, e.g. 255,255,255
        #[arg(long, default_value = "255,255,255")]
        end: Color,
        /// Axis for every channel (h or v)
        #[arg(long, default_value = "h")]
        axis: Axis,
        /// One axis per channel, overriding --axis (e.g. h,h,v)
        #[arg(long, value_delimiter = ',')]
        axes: Vec<Axis>,
    },
    /// Colored radial gradient
    Radial {
        #[command(flatten)]
        canvas: Canvas,
        #[command(flatten)]
        center: Center,
        #[arg(long, default_value = "0,0,0")]
        inner: Color,
        #[arg(long, default_value = "255,255,255")]
        outer: Color,
        #[arg(long, default_value_t = DEFAULT_GRADIENT_SIZE)]
        gradient_size: f32,
        /// Adds an alpha channel (missing side defaults to 255)
        #[arg(long)]
        inner_alpha: Option<u8>,
        #[arg(long)]
        outer_alpha: Option<u8>,
    },
    /// Black/white radial mask
    RadialMask {
        #[command(flatten)]
        canvas: Canvas,
        #[command(flatten)]
        center: Center,
        #[arg(long, default_value_t = DEFAULT_GRADIENT_SIZE)]
        gradient_size: f32,
        /// White center fading to black
        #[arg(long)]
        reverse: bool,
        /// Opaque black center fading to transparent white
        #[arg(long)]
        transparent: bool,
    },
    /// Colored circle on a uniform background
    Circle {
        #[command(flatten)]
        canvas: Canvas,
        #[arg(long, default_value_t = DEFAULT_RADIUS)]
        radius: f32,
        #[command(flatten)]
        center: Center,
        /// Outline width; negative fills the disc
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        thickness: i32,
        /// Odd Gaussian kernel size
        #[arg(long)]
        blur: Option<u32>,
        #[arg(long, default_value = "0,0,0")]
        bg: Color,
        #[arg(long, default_value = "255,255,255")]
        fg: Color,
    },
    /// Blurred circle mask
    CircleMask {
        #[command(flatten)]
        canvas: Canvas,
        #[arg(long, default_value_t = DEFAULT_RADIUS)]
        radius: f32,
        #[command(flatten)]
        center: Center,
        #[arg(long, default_value_t = CIRCLE_MASK_BLUR)]
        blur: u32,
        #[arg(long)]
        no_blur: bool,
        /// Black circle on white
        #[arg(long)]
        black: bool,
        /// Derive alpha from the red channel
        #[arg(long)]
        transparent: bool,
    },
    /// Colored line segments on a uniform background
    Lines {
        #[command(flatten)]
        canvas: Canvas,
        /// Segment as x0,y0,x1,y1; repeatable, drawn in order
        #[arg(long = "segment", required = true)]
        segments: Vec<Segment>,
        #[arg(long, default_value_t = DEFAULT_LINE_THICKNESS)]
        thickness: u32,
        #[arg(long)]
        blur: Option<u32>,
        #[arg(long, default_value = "0,0,0")]
        bg: Color,
        #[arg(long, default_value = "255,255,255")]
        fg: Color,
    },
    /// Blurred line mask; draws a star when no segment is given
    LineMask {
        #[command(flatten)]
        canvas: Canvas,
        #[arg(long = "segment")]
        segments: Vec<Segment>,
        #[arg(long, default_value_t = DEFAULT_LINE_THICKNESS)]
        thickness: u32,
        #[arg(long, default_value_t = LINE_MASK_BLUR)]
        blur: u32,
        #[arg(long)]
        no_blur: bool,
        /// Black lines on white
        #[arg(long)]
        black: bool,
        #[arg(long)]
        transparent: bool,
    },
}

#[derive(clap::Args)]
struct Canvas {
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    width: u32,
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    height: u32,
}

#[derive(clap::Args)]
struct Center {
    /// Defaults to width / 2 (radial gradients also fall back when off-canvas)
    #[arg(long)]
    center_x: Option<f32>,
    /// Defaults to height / 2
    #[arg(long)]
    center_y: Option<f32>,
}

impl Center {
    fn point(&self, canvas: &Canvas) -> Option<Point> {
        if self.center_x.is_none() && self.center_y.is_none() {
            return None;
        }
        Some(Point(
            self.center_x.unwrap_or((canvas.width / 2) as f32),
            self.center_y.unwrap_or((canvas.height / 2) as f32),
        ))
    }
}

fn blur_option(kernel: u32, disabled: bool) -> Option<u32> {
    if disabled {
        None
    } else {
        Some(kernel)
    }
}

fn build_preset(cmd: Render) -> gradmask::Result<Preset> {
    match cmd {
        Render::Linear {
            canvas,
            start,
            end,
            axis,
            axes,
        } => {
            let axes = if axes.is_empty() {
                vec![axis; start.len()]
            } else {
                axes
            };
            presets::linear_gradient(canvas.height, canvas.width, start, end, axes)
        },
        Render::Radial {
            canvas,
            center,
            inner,
            outer,
            gradient_size,
            inner_alpha,
            outer_alpha,
        } => {
            let gradient = RadialGradient::new(canvas.height, canvas.width, inner, outer)?
                .with_center(center.center_x, center.center_y)
                .with_gradient_size(gradient_size)?
                .with_alpha(inner_alpha, outer_alpha)?;
            presets::color_radial_gradient(gradient)
        },
        Render::RadialMask {
            canvas,
            center,
            gradient_size,
            reverse,
            transparent,
        } => {
            let params = RadialMaskParams {
                height: canvas.height,
                width: canvas.width,
                center_x: center.center_x,
                center_y: center.center_y,
                gradient_size,
                inner_to_outer: !reverse,
            };
            if transparent {
                presets::transparent_radial_gradient_mask(&params)
            } else {
                presets::radial_gradient_mask(&params)
            }
        },
        Render::Circle {
            canvas,
            radius,
            center,
            thickness,
            blur,
            bg,
            fg,
        } => {
            let center = center.point(&canvas);
            if thickness < 0 {
                return presets::circle(bg, fg, canvas.height, canvas.width, radius, center, blur);
            }
            let geometry = Geometry::Circle {
                radius,
                center,
                thickness: Some(thickness as u32),
            };
            let spec = ShapeSpec::new(canvas.height, canvas.width, bg, fg, geometry)?
                .with_blur(blur)?
                .with_output(ShapeOutput::Color)?;
            Ok(Preset::new("circle", Generator::Shape(spec)))
        },
        Render::CircleMask {
            canvas,
            radius,
            center,
            blur,
            no_blur,
            black,
            transparent,
        } => {
            let params = CircleMaskParams {
                height: canvas.height,
                width: canvas.width,
                radius,
                center: center.point(&canvas),
                blur_kernel: blur_option(blur, no_blur),
                white: !black,
            };
            if transparent {
                presets::transparent_circle_mask(&params)
            } else {
                presets::circle_mask(&params)
            }
        },
        Render::Lines {
            canvas,
            segments,
            thickness,
            blur,
            bg,
            fg,
        } => presets::lines(segments, bg, fg, thickness, canvas.height, canvas.width, blur),
        Render::LineMask {
            canvas,
            segments,
            thickness,
            blur,
            no_blur,
            black,
            transparent,
        } => {
            let segments = if segments.is_empty() {
                presets::star_segments(canvas.height, canvas.width)
            } else {
                segments
            };
            let params = LineMaskParams {
                height: canvas.height,
                width: canvas.width,
                segments,
                thickness,
                blur_kernel: blur_option(blur, no_blur),
                white: !black,
            };
            if transparent {
                presets::transparent_line_mask(&params)
            } else {
                presets::line_mask(&params)
            }
        },
    }
}

fn run_job(file: &Path, output_dir: &Path, channel_order: ChannelOrder) -> Result<Vec<PathBuf>> {
    let jobs =
        JobFile::load(file).with_context(|| format!("loading job file {}", file.display()))?;
    let writer = jobs.writer(output_dir, channel_order);
    jobs.run(&writer)
        .with_context(|| format!("running job file {}", file.display()))
}

fn run_one(cmd: Render, output_dir: &Path, channel_order: ChannelOrder) -> Result<PathBuf> {
    let preset = build_preset(cmd).context("invalid render parameters")?;
    info!("rendering {}", preset.artifact);
    let buffer = preset.render().context("rendering failed")?;
    ImageWriter::new(output_dir)
        .with_channel_order(channel_order)
        .write(&buffer, &preset.artifact)
        .with_context(|| format!("writing into {}", output_dir.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let written = match cli.command {
        Cmd::Job { file } => run_job(&file, &cli.output_dir, cli.channel_order)?,
        Cmd::Render(cmd) => vec![run_one(cmd, &cli.output_dir, cli.channel_order)?],
    };

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
