use std::{io, path::PathBuf, sync::Arc};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use framedump::{
    DEFAULT_OUTPUT_ROOT, ExtractionConfig, FfmpegLogLevel, ProgressCallback, ProgressInfo,
    VIDEO_EXTENSIONS, extract_video, open_in_file_browser, output::has_video_extension,
    output_dir_for,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  framedump input.mp4\n  framedump input.mkv --skip-duplicates --no-open\n  framedump input.avi --out-root /tmp/stills --json\n  framedump --completions zsh > _framedump";

#[derive(Debug, Parser)]
#[command(
    name = "framedump",
    version,
    about = "Write every frame of a video to numbered JPEG files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video path.
    #[arg(required_unless_present = "completions")]
    input: Option<PathBuf>,

    /// Skip frames that are near-duplicates (SSIM > 0.95) of the frame before them.
    #[arg(long, short = 's')]
    skip_duplicates: bool,

    /// Directory the per-video output directory is created under.
    #[arg(long, default_value = DEFAULT_OUTPUT_ROOT)]
    out_root: PathBuf,

    /// Do not open the output directory in the file browser afterwards.
    #[arg(long)]
    no_open: bool,

    /// Hide the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,

    /// Show debug logging (RUST_LOG overrides).
    #[arg(long, short = 'v')]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, exclusive = true)]
    completions: Option<Shell>,
}

struct TerminalProgress {
    bar: ProgressBar,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        // The estimate can be short; grow the bar rather than overflow it.
        let length = info.total.max(info.current);
        if self.bar.length() != Some(length) {
            self.bar.set_length(length);
        }
        self.bar.set_position(info.current);
        self.bar.set_message(format!(
            "{} ({} skipped)",
            info.percentage_label(),
            info.frames_skipped
        ));
    }
}

fn progress_bar() -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let bar = ProgressBar::new(0);
    let style =
        ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
    bar.set_style(style.progress_chars("##-"));
    Ok(bar)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "framedump", &mut io::stdout());
        return Ok(());
    }

    init_logging(cli.verbose);
    if let Some(level) = cli.log_level {
        framedump::set_ffmpeg_log_level(level);
    }

    let input = cli.input.ok_or("missing input video path")?;
    if !has_video_extension(&input) {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "{} is not one of {}; trying anyway",
                input.display(),
                VIDEO_EXTENSIONS.join(", ")
            )
            .yellow()
        );
    }

    let output_dir = output_dir_for(&input, &cli.out_root);
    let mut config = ExtractionConfig::new().with_skip_near_duplicates(cli.skip_duplicates);

    let bar = if cli.no_progress {
        None
    } else {
        let bar = progress_bar()?;
        config = config.with_progress(Arc::new(TerminalProgress { bar: bar.clone() }));
        Some(bar)
    };

    let result = extract_video(&input, &cli.out_root, &config);

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    if !cli.no_open {
        open_in_file_browser(&output_dir);
    }

    let summary = result?;

    if cli.json {
        let payload = json!({
            "input": input.display().to_string(),
            "output_dir": summary.output_dir.display().to_string(),
            "frames_processed": summary.frames_processed,
            "frames_written": summary.frames_written,
            "frames_skipped": summary.frames_skipped,
            "frame_count_estimate": summary.frame_count_estimate,
            "elapsed_seconds": summary.elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let skipped = if summary.frames_skipped > 0 {
            format!(" ({} near-duplicates skipped)", summary.frames_skipped)
        } else {
            String::new()
        };
        println!(
            "{} {}",
            "success:".green().bold(),
            format!(
                "Extracted {} frames to {}{skipped}",
                summary.frames_written,
                summary.output_dir.display()
            )
            .green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
