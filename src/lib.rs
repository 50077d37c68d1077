//! Boxtag: draw labelled detection boxes onto images.
//!
//! Detectors report what they found as boxes with labels and scores, in
//! pixel or normalized coordinates. Boxtag turns those reports into an
//! annotated image: an outline per region and a filled label tag, placed
//! above the box or, when the box touches the top of the image, below it.
//!
//! # Modules
//!
//! - [`annotate`]: outline and label-tag drawing
//! - [`geom`]: coordinate spaces, boxes and regions
//! - [`font`]: font lookup with a built-in fallback
//! - [`color`]: color parsing
//! - [`io`]: regions documents (JSON, YAML, response envelopes)
//! - [`validation`]: region validation and error reporting
//! - [`detect`]: the detection capability
//! - [`cache`]: URL-keyed image cache
//! - [`render`]: load, detect, annotate and save in one call
//! - [`error`]: error types for boxtag operations

pub mod annotate;
pub mod cache;
pub mod color;
pub mod detect;
pub mod error;
pub mod font;
pub mod geom;
pub mod io;
pub mod render;
pub mod validation;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Deserialize;

pub use annotate::{annotate, AnnotateOptions};
pub use error::BoxtagError;

use cache::ImageCache;
use color::Color;
use detect::PrecomputedDetector;
use font::{FontBook, DEFAULT_FONT_NAME};
use render::RenderOptions;

/// The boxtag CLI application.
#[derive(Parser)]
#[command(name = "boxtag")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Draw regions from a regions file onto an image.
    Annotate(AnnotateArgs),
    /// Annotate several images listed in a JSON manifest.
    Batch(BatchArgs),
    /// Check a regions file against an image's dimensions.
    Validate(ValidateArgs),
}

/// Drawing options shared by `annotate` and `batch`.
#[derive(clap::Args)]
struct StyleArgs {
    /// Outline and tag color (name, #rrggbb, or rgb(r,g,b)).
    #[arg(long, default_value = "black")]
    color: Color,

    /// Outline width in pixels (0 disables the outline).
    #[arg(long, default_value_t = 2)]
    thickness: u32,

    /// Font file name or path for label text.
    #[arg(long, env = "BOXTAG_FONT", default_value = DEFAULT_FONT_NAME)]
    font: String,

    /// Extra directory to search for fonts (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Append detector scores to labels.
    #[arg(long)]
    show_scores: bool,

    /// Treat all coordinates as normalized to [0, 1].
    #[arg(long)]
    normalized: bool,
}

impl StyleArgs {
    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            annotate: AnnotateOptions {
                color: self.color,
                thickness: self.thickness,
                font_name: self.font.clone(),
            },
            show_scores: self.show_scores,
            force_normalized: self.normalized,
        }
    }

    fn font_book(&self) -> FontBook {
        FontBook::new(self.font_dirs.iter().cloned()).extend_from(FontBook::from_env())
    }
}

/// Arguments for the annotate subcommand.
#[derive(clap::Args)]
struct AnnotateArgs {
    /// Image to annotate.
    input: PathBuf,

    /// Regions file (JSON or YAML).
    #[arg(short, long)]
    regions: PathBuf,

    /// Where to write the annotated image (format from extension).
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

/// Arguments for the batch subcommand.
#[derive(clap::Args)]
struct BatchArgs {
    /// JSON manifest: {"jobs": [{"source", "regions", "output", "color"?}, ...]}.
    manifest: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Regions file to validate.
    input: PathBuf,

    /// Image the regions belong to (only its header is read).
    #[arg(long, conflicts_with_all = ["width", "height"])]
    image: Option<PathBuf>,

    /// Image width in pixels, when no image is given.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Image height in pixels, when no image is given.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

#[derive(Deserialize)]
struct BatchManifest {
    jobs: Vec<BatchJob>,
}

#[derive(Deserialize)]
struct BatchJob {
    /// Image source; also the cache key, so repeated sources decode once.
    source: String,
    regions: PathBuf,
    output: PathBuf,
    /// Overrides `--color` for this job.
    #[serde(default)]
    color: Option<String>,
}

/// Run the boxtag CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), BoxtagError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Annotate(args)) => run_annotate(args),
        Some(Commands::Batch(args)) => run_batch(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("boxtag {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Draw labelled detection boxes onto images.");
            println!();
            println!("Run 'boxtag --help' for usage information.");
            Ok(())
        }
    }
}

/// Initializes `env_logger`; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str()),
    )
    .try_init();
}

fn run_annotate(args: AnnotateArgs) -> Result<(), BoxtagError> {
    let detector = PrecomputedDetector::from_file(&args.regions)?;
    let count = render::render_file(
        &args.input,
        &args.output,
        &detector,
        &args.style.render_options(),
        &args.style.font_book(),
    )?;
    println!(
        "Annotated {} region(s) into {}",
        count,
        args.output.display()
    );
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), BoxtagError> {
    let manifest = read_manifest(&args.manifest)?;
    let base = args.manifest.parent().unwrap_or_else(|| Path::new(""));
    let opts = args.style.render_options();
    let fonts = args.style.font_book();
    let mut cache = ImageCache::new();

    for job in &manifest.jobs {
        let job_opts = match &job.color {
            Some(color) => {
                let mut job_opts = opts.clone();
                job_opts.annotate.color = color.parse::<Color>()?;
                job_opts
            }
            None => opts.clone(),
        };
        let source_path = base.join(&job.source);
        let source = cache.get_or_try_insert_with(&job.source, || render::load_image(&source_path))?;
        let detector = PrecomputedDetector::from_file(&base.join(&job.regions))?;

        let mut image = source.as_ref().clone();
        let regions = render::render_with(&mut image, &detector, &job_opts, &fonts)?;
        let output = base.join(&job.output);
        render::save_image(&image, &output)?;
        info!("{}: {} region(s) -> {}", job.source, regions.len(), output.display());
    }

    println!(
        "Annotated {} image(s) from {} source(s)",
        manifest.jobs.len(),
        cache.len()
    );
    Ok(())
}

fn read_manifest(path: &Path) -> Result<BatchManifest, BoxtagError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| BoxtagError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })
}

fn run_validate(args: ValidateArgs) -> Result<(), BoxtagError> {
    let image_size = match (&args.image, args.width, args.height) {
        (Some(path), _, _) => probe_image_size(path)?,
        (None, Some(width), Some(height)) => (width, height),
        _ => {
            return Err(BoxtagError::InvalidArguments(
                "pass --image or both --width and --height".into(),
            ))
        }
    };

    let regions = io::read_regions(&args.input)?;
    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_regions(&regions, image_size, &opts);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::json!({
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": &report.issues,
            });
            println!("{:#}", json);
        }
        "text" => print!("{}", report),
        other => {
            return Err(BoxtagError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(BoxtagError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

fn probe_image_size(path: &Path) -> Result<(u32, u32), BoxtagError> {
    let size = imagesize::size(path).map_err(|source| BoxtagError::ImageProbe {
        path: path.to_path_buf(),
        source,
    })?;
    let to_u32 = |value: usize| {
        u32::try_from(value).map_err(|_| {
            BoxtagError::InvalidArguments(format!(
                "image dimension {} of {} does not fit in u32",
                value,
                path.display()
            ))
        })
    };
    Ok((to_u32(size.width)?, to_u32(size.height)?))
}
