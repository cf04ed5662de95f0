use std::{
    path::PathBuf,
    sync::{
        Arc,
        mpsc::{self, Receiver},
    },
    thread::{self, JoinHandle},
};

use eframe::egui;
use framedump::{
    ChannelProgress, DEFAULT_OUTPUT_ROOT, ExtractionConfig, ExtractionSummary, FramedumpError,
    ProgressInfo, VIDEO_EXTENSIONS, extract_video, open_in_file_browser, output_dir_for,
};
use log::{error, info};

/// An extraction running on its worker thread.
struct Job {
    worker: JoinHandle<Result<ExtractionSummary, FramedumpError>>,
    progress: Receiver<ProgressInfo>,
    latest: Option<ProgressInfo>,
    output_dir: PathBuf,
}

impl Job {
    fn drain_progress(&mut self) {
        if let Some(latest) = self.progress.try_iter().last() {
            self.latest = Some(latest);
        }
    }

    /// Join the worker and describe how the run ended.
    fn finish(self) -> String {
        let Job {
            worker,
            progress,
            mut latest,
            ..
        } = self;
        let outcome = worker.join();
        // The worker may have reported again after the last poll.
        if let Some(last) = progress.try_iter().last() {
            latest = Some(last);
        }

        match outcome {
            Ok(Ok(summary)) => {
                let mut status = format!(
                    "Extracted {} frames to {}",
                    summary.frames_written,
                    summary.output_dir.display()
                );
                if let Some(latest) = &latest {
                    status.push_str(&format!(" ({})", latest.percentage_label()));
                }
                status
            }
            Ok(Err(extraction_error)) => {
                error!("Extraction failed: {extraction_error}");
                format!("Error: {extraction_error}")
            }
            Err(_) => "Error: extraction thread panicked".to_string(),
        }
    }
}

struct FramedumpApp {
    // Settings
    video_path: String,
    skip_near_duplicates: bool,
    output_root: PathBuf,

    // State
    job: Option<Job>,
    status: String,
}

impl FramedumpApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            video_path: String::new(),
            skip_near_duplicates: false,
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            job: None,
            status: String::new(),
        }
    }

    fn start_extraction(&mut self) {
        let video_path = PathBuf::from(self.video_path.trim());
        if video_path.as_os_str().is_empty() {
            self.status = "Choose a video first".to_string();
            return;
        }

        let output_dir = output_dir_for(&video_path, &self.output_root);
        let (sender, receiver) = mpsc::channel();
        let config = ExtractionConfig::new()
            .with_skip_near_duplicates(self.skip_near_duplicates)
            .with_progress(Arc::new(ChannelProgress::new(sender)));
        let output_root = self.output_root.clone();

        info!(
            "Starting extraction of {} into {}",
            video_path.display(),
            output_dir.display()
        );

        let worker = thread::spawn(move || extract_video(&video_path, &output_root, &config));

        self.status = "Extracting...".to_string();
        self.job = Some(Job {
            worker,
            progress: receiver,
            latest: None,
            output_dir,
        });
    }

    fn poll_job(&mut self) {
        let Some(job) = self.job.as_mut() else {
            return;
        };

        job.drain_progress();
        if !job.worker.is_finished() {
            return;
        }

        let Some(job) = self.job.take() else {
            return;
        };
        let output_dir = job.output_dir.clone();
        self.status = job.finish();
        open_in_file_browser(&output_dir);
    }

    fn browse_video(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Video Files", &VIDEO_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file();
        if let Some(path) = picked {
            self.video_path = path.display().to_string();
        }
    }

    fn accept_dropped_file(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .find_map(|file| file.path.clone())
        });
        if let Some(path) = dropped {
            self.video_path = path.display().to_string();
        }
    }
}

impl eframe::App for FramedumpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_job();
        if self.job.is_none() {
            self.accept_dropped_file(ctx);
        } else {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Video Path:");
                ui.add_enabled(
                    self.job.is_none(),
                    egui::TextEdit::singleline(&mut self.video_path).desired_width(280.0),
                );
                let browse = ui.add_enabled(self.job.is_none(), egui::Button::new("Browse"));
                if browse.clicked() {
                    self.browse_video();
                }
            });
            ui.label(format!(
                "Browse for or drop a video ({}; other formats may work)",
                VIDEO_EXTENSIONS.map(|extension| format!("*.{extension}")).join(" ")
            ));

            ui.add_enabled(
                self.job.is_none(),
                egui::Checkbox::new(&mut self.skip_near_duplicates, "Skip near-duplicate frames"),
            );

            ui.vertical_centered(|ui| {
                let start = ui.add_enabled(
                    self.job.is_none(),
                    egui::Button::new("Start Extraction"),
                );
                if start.clicked() {
                    self.start_extraction();
                }
            });

            ui.separator();

            if let Some(job) = &self.job {
                let (fraction, label) = match &job.latest {
                    Some(latest) => (
                        latest.percentage.map_or(0.0, |p| (p / 100.0).clamp(0.0, 1.0)) as f32,
                        latest.percentage_label(),
                    ),
                    None => (0.0, "0.00%".to_string()),
                };
                ui.add(egui::ProgressBar::new(fraction).text(label));
                if let Some(latest) = &job.latest {
                    ui.label(format!(
                        "{} frames written, {} skipped",
                        latest.frames_written, latest.frames_skipped
                    ));
                }
                ui.label(format!("Output: {}", job.output_dir.display()));
            }

            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 240.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Video Frame Extractor",
        options,
        Box::new(|cc| Box::new(FramedumpApp::new(cc))),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn progress_at(current: u64, total: u64) -> ProgressInfo {
        ProgressInfo {
            current,
            total,
            percentage: Some(current as f64 / total as f64 * 100.0),
            frames_written: current,
            frames_skipped: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn finish_picks_up_progress_sent_after_the_last_poll() {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::spawn(move || {
            for current in 1..=4 {
                sender.send(progress_at(current, 4)).unwrap();
            }
            Ok(ExtractionSummary {
                output_dir: PathBuf::from("extracted_frames/clip"),
                frames_processed: 4,
                frames_written: 4,
                frames_skipped: 0,
                frame_count_estimate: 4,
                elapsed: Duration::ZERO,
            })
        });
        let job = Job {
            worker,
            progress: receiver,
            latest: Some(progress_at(1, 4)),
            output_dir: PathBuf::from("extracted_frames/clip"),
        };

        let status = job.finish();
        assert!(status.starts_with("Extracted 4 frames to "), "{status}");
        assert!(status.ends_with("(100.00%)"), "{status}");
    }

    #[test]
    fn finish_reports_extraction_errors() {
        let (_sender, receiver) = mpsc::channel();
        let worker = thread::spawn(|| {
            Err(FramedumpError::NoVideoStream(PathBuf::from("silent.mkv")))
        });
        let job = Job {
            worker,
            progress: receiver,
            latest: None,
            output_dir: PathBuf::from("extracted_frames/silent"),
        };

        let status = job.finish();
        assert!(status.starts_with("Error: No video stream found"), "{status}");
    }
}
