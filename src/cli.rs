// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Dividing a directory of images into training sub-images
//! - Capturing numbered photos
//! - Scanning a frame for a target

use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, TryRecvError};
use tilecam::Config;
use tilecam::backends::{FileFrameSource, FrameSource};
use tilecam::errors::StorageError;
use tilecam::pipelines::dataset::DatasetDivider;
use tilecam::pipelines::finder::{
    Detection, FinderSession, TargetFinder, TemplateClassifier, overlay,
};
use tilecam::pipelines::photo::{CaptureSession, Indicator, Trigger};
use tilecam::scan::WindowSpec;
use tilecam::storage::{OutputDirStatus, prepare_output_dir};
use tilecam::utils::query_yes_no;
use tracing::{debug, info};

const RULE: &str = "-----------------------------------------------------------------------";

/// Arguments of `tilecam divide`
#[derive(Args, Debug)]
pub struct DivideArgs {
    /// Directory where the raw, large images are stored
    #[arg(short, long)]
    pub in_dir: PathBuf,

    /// Directory where the sub-images are to be stored
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Prefix name of each sub-image
    #[arg(short, long)]
    pub name: String,

    /// Desired width of sub-image
    #[arg(short, long)]
    pub width: u32,

    /// Desired height of sub-image
    #[arg(short = 't', long)]
    pub height: u32,

    /// Hop distance (in pixels) from start of one sub-image window to the
    /// next, horizontally and vertically
    #[arg(short = 'l', long)]
    pub hop_length: u32,

    /// File suffix of the sub-images (default from config: .bmp)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Delete an existing output directory without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments of `tilecam capture`
#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Image file or directory of images standing in for the camera
    #[arg(short, long)]
    pub source: PathBuf,

    /// Directory photos are saved to
    #[arg(short, long)]
    pub output: PathBuf,

    /// File name prefix (default from config: IMG)
    #[arg(long)]
    pub prefix: Option<String>,

    /// File suffix (default from config: .bmp)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Milliseconds between pressing Enter and the shutter
    #[arg(long)]
    pub shutter_delay: Option<u64>,
}

/// Arguments of `tilecam find`
#[derive(Args, Debug)]
pub struct FindArgs {
    /// Frame image, or a directory of frames searched in turn in live mode
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reference image of the target
    #[arg(short = 'T', long)]
    pub template: PathBuf,

    /// Save the frame with target boxes drawn on it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Save a JSON report of the search
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Minimum target score (default from config: 0.7)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Window width (default from config: 32)
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Window height (default from config: 32)
    #[arg(short = 't', long)]
    pub height: Option<u32>,

    /// Hop distance (default from config: 10)
    #[arg(short = 'l', long)]
    pub hop_length: Option<u32>,

    /// Scan the whole frame instead of its centered window
    #[arg(long)]
    pub no_window: bool,

    /// Search a frame each time Enter is pressed, until Ctrl+C
    #[arg(long)]
    pub live: bool,

    /// Live mode: milliseconds between pressing Enter and the snapshot
    #[arg(long)]
    pub shutter_delay: Option<u64>,
}

/// Divide every image of a directory into numbered sub-images
pub fn divide_images(config: &Config, args: DivideArgs) -> Result<(), Box<dyn std::error::Error>> {
    print_banner();

    // Validate everything before touching the output directory
    let spec = WindowSpec::new(args.width, args.height, args.hop_length)?;
    let suffix = args
        .suffix
        .unwrap_or_else(|| config.divide.file_suffix.clone());
    let divider = DatasetDivider::new(spec, &args.name, &suffix)?;

    let status = if args.yes {
        prepare_output_dir(&args.out_dir, |dir| {
            print_overwrite_warning(dir);
            println!("Deleting and recreating output directory.");
            Ok(true)
        })
    } else {
        prepare_output_dir(&args.out_dir, confirm_overwrite)
    };

    match status {
        Ok(OutputDirStatus::Declined) => {
            println!("Please delete directory to continue. Exiting.");
            return Ok(());
        }
        Ok(status) => debug!(?status, "Output directory prepared"),
        Err(StorageError::NotCleared(path)) => {
            println!("ERROR: Output directory could not be deleted. Exiting.");
            return Err(StorageError::NotCleared(path).into());
        }
        Err(e) => return Err(e.into()),
    }

    let summary = divider.divide(&args.in_dir, &args.out_dir)?;
    info!(
        sources = summary.sources,
        tiles = summary.tiles,
        skipped = summary.skipped,
        "Dataset written"
    );

    println!("Done!");
    Ok(())
}

fn print_banner() {
    println!("{}", RULE);
    println!("Dataset Curation Tool");
    println!("v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", RULE);
}

fn print_overwrite_warning(dir: &Path) {
    println!("WARNING: Output directory already exists:");
    println!("{}", dir.display());
    println!("This tool will delete the output directory and everything in it.");
}

/// Interactive confirmation before deleting an existing output directory
fn confirm_overwrite(dir: &Path) -> io::Result<bool> {
    print_overwrite_warning(dir);
    let approved = query_yes_no("Continue?", None, io::stdin().lock(), io::stdout())?;
    if approved {
        println!("Deleting and recreating output directory.");
    }
    Ok(approved)
}

/// Enter on stdin acts as the shutter button
///
/// Each line is one press, held for a single tick. When stdin closes the
/// stop flag is raised once every press has been consumed.
struct StdinTrigger {
    presses: mpsc::Receiver<()>,
    stop: Arc<AtomicBool>,
}

impl StdinTrigger {
    fn spawn(stop: Arc<AtomicBool>) -> Self {
        let (sender, presses) = mpsc::channel();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if line.is_err() || sender.send(()).is_err() {
                    break;
                }
            }
        });
        Self { presses, stop }
    }
}

impl Trigger for StdinTrigger {
    fn is_pressed(&mut self) -> bool {
        match self.presses.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.stop.store(true, Ordering::SeqCst);
                false
            }
        }
    }
}

/// Countdown indicator drawn as dots on the terminal
struct TerminalIndicator;

impl Indicator for TerminalIndicator {
    fn set(&mut self, on: bool) {
        debug!(on, "Indicator");
        if on {
            print!(".");
            let _ = io::stdout().flush();
        }
    }
}

/// Take a photo each time Enter is pressed, until Ctrl+C or end of input
pub fn capture_photos(config: &Config, args: CaptureArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = config.capture.clone();
    if let Some(prefix) = args.prefix {
        settings.file_prefix = prefix;
    }
    if let Some(suffix) = args.suffix {
        settings.file_suffix = suffix;
    }
    if let Some(delay) = args.shutter_delay {
        settings.shutter_delay_ms = delay;
    }

    let source = FileFrameSource::open(&args.source)?;
    std::fs::create_dir_all(&args.output)?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::SeqCst);
    })?;

    let trigger = StdinTrigger::spawn(stop.clone());
    let mut session =
        CaptureSession::new(source, trigger, TerminalIndicator, &args.output, &settings)?;

    println!("Press Enter to take a photo, Ctrl+C to quit.");
    println!("Next photo: {}", session.next_path().display());

    let saved = session.run(&stop, settings.tick_interval(), |path| {
        println!();
        println!("Image saved to: {}", path.display());
    })?;

    println!("{} photo(s) saved", saved.len());
    Ok(())
}

/// Scan frames for the target and report the hits
///
/// One-shot by default: the first frame of the source is searched. With
/// `--live`, Enter arms a countdown and each release searches the next frame
/// until Ctrl+C or end of input.
pub fn find_targets(config: &Config, args: FindArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = config.finder.clone();
    if let Some(threshold) = args.threshold {
        settings.threshold = threshold;
    }
    if let Some(width) = args.width {
        settings.window_width = width;
    }
    if let Some(height) = args.height {
        settings.window_height = height;
    }
    if let Some(hop) = args.hop_length {
        settings.hop = hop;
    }
    if let Some(delay) = args.shutter_delay {
        settings.shutter_delay_ms = delay;
    }
    settings.validate()?;

    let mut source = FileFrameSource::open(&args.input)?;
    if !args.no_window {
        source = source.with_window(settings.frame_dimensions());
    }
    let template = image::open(&args.template)?.to_rgb8();
    let classifier = TemplateClassifier::new(template);

    if !args.live {
        let mut finder = TargetFinder::from_settings(classifier, &settings)?;
        let frame = source.snapshot()?;
        let report = finder.find(&frame.image)?;
        return present_detection(&Detection { frame, report }, &args);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = stop.clone();
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::SeqCst);
    })?;

    let trigger = StdinTrigger::spawn(stop.clone());
    let mut session =
        FinderSession::from_settings(source, trigger, TerminalIndicator, classifier, &settings)?;

    println!("Press Enter to search a frame, Ctrl+C to quit.");

    let mut failure = None;
    let searched = session.run(&stop, config.capture.tick_interval(), |detection| {
        if failure.is_none() {
            if let Err(e) = present_detection(detection, &args) {
                failure = Some(e.to_string());
                stop.store(true, Ordering::SeqCst);
            }
        }
    })?;
    if let Some(reason) = failure {
        return Err(reason.into());
    }

    println!("{} frame(s) searched", searched);
    Ok(())
}

/// Print a search result and write the requested output files
///
/// In live mode each search overwrites the files of the previous one.
fn present_detection(detection: &Detection, args: &FindArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = &detection.report;

    println!();
    for line in report.summary_lines() {
        println!("{}", line);
    }
    for target in &report.targets {
        println!(
            "  ({}, {}) {}",
            target.rect.left,
            target.rect.top,
            target.score_label()
        );
    }

    if let Some(output) = &args.output {
        overlay::save_annotated(&detection.frame.image, &report.targets, output)?;
        println!("Annotated frame saved to: {}", output.display());
    }

    if let Some(path) = &args.report {
        let record = report.to_record(chrono::Local::now().to_rfc3339());
        std::fs::write(path, serde_json::to_string_pretty(&record)?)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}
