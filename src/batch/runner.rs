//! Batch runner
//!
//! Collects the images under a directory, then extracts and analyzes them
//! in parallel with rayon. Images that fail to decode become error entries;
//! they never stop the batch.

use super::report::{BatchEntry, BatchReport};
use crate::core::config::{BatchConfig, ImageConfig};
use crate::core::error::{ContrastError, Result};
use crate::core::observer::{AnalysisObserver, NoopObserver};
use crate::imaging::{is_supported_image, ColorExtractor};
use crate::suggest::{SuggestOptions, SuggestionOrchestrator};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use walkdir::WalkDir;

/// Progress information for a running batch
#[derive(Debug, Clone)]
pub struct BatchProgress {
    /// Images finished so far
    pub current: usize,
    /// Total images to analyze
    pub total: usize,
    /// Image that just finished
    pub current_file: Option<PathBuf>,
    /// Images that could not be analyzed
    pub errors: usize,
}

/// Analyzes every image under a directory
pub struct BatchRunner<'a> {
    config: BatchConfig,
    image: ImageConfig,
    options: SuggestOptions,
    observer: &'a dyn AnalysisObserver,
}

impl BatchRunner<'static> {
    pub fn new(config: BatchConfig, image: ImageConfig, options: SuggestOptions) -> Self {
        Self {
            config,
            image,
            options,
            observer: &NoopObserver,
        }
    }

    /// Report every analysis checkpoint of every image to `observer`.
    pub fn with_observer<'a>(self, observer: &'a dyn AnalysisObserver) -> BatchRunner<'a> {
        BatchRunner {
            config: self.config,
            image: self.image,
            options: self.options,
            observer,
        }
    }
}

impl<'a> BatchRunner<'a> {
    /// Supported image files under `root`, sorted by path.
    pub fn collect_images(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(ContrastError::IoError(format!(
                "Not a directory: {}",
                root.display()
            )));
        }

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(if self.config.recursive { usize::MAX } else { 1 });

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|path| path.is_file() && is_supported_image(path))
            .collect();
        files.sort();

        Ok(files)
    }

    /// Analyze every image under `root`.
    ///
    /// `progress_callback` is called once per finished image, from worker
    /// threads.
    pub fn run<F>(&self, root: &Path, progress_callback: F) -> Result<BatchReport>
    where
        F: Fn(BatchProgress) + Send + Sync,
    {
        self.options.validate()?;
        let start_time = std::time::Instant::now();

        info!("Scanning {} for images...", root.display());
        let files = self.collect_images(root)?;
        let total = files.len();

        if total == 0 {
            info!("No images found in {}", root.display());
            return Ok(BatchReport::new(root, self.options, Vec::new()));
        }

        info!("Found {} images to analyze", total);

        let extractor = ColorExtractor::new(self.image);
        let orchestrator = SuggestionOrchestrator::with_observer(self.options, self.observer);
        let processed = AtomicUsize::new(0);
        let errors = AtomicUsize::new(0);

        let entries: Vec<BatchEntry> = files
            .par_iter()
            .map(|path| {
                let entry = match extractor.extract_file(path).and_then(|colors| {
                    let result =
                        orchestrator.run(colors.background.color, colors.text.color)?;
                    Ok((colors, result))
                }) {
                    Ok((colors, result)) => {
                        debug!("{}: {}", path.display(), result.outcome);
                        BatchEntry::analyzed(colors, result)
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", path.display(), e);
                        errors.fetch_add(1, Ordering::Relaxed);
                        BatchEntry::failed(path, &e)
                    }
                };

                let current = processed.fetch_add(1, Ordering::Relaxed) + 1;
                progress_callback(BatchProgress {
                    current,
                    total,
                    current_file: Some(path.clone()),
                    errors: errors.load(Ordering::Relaxed),
                });

                entry
            })
            .collect();

        let report = BatchReport::new(root, self.options, entries);
        info!(
            "Analyzed {} of {} images in {:.2}s ({} compliant, {} failed)",
            report.summary.analyzed(),
            report.summary.total,
            start_time.elapsed().as_secs_f64(),
            report.summary.compliant(),
            report.summary.failed
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::space::Rgb;
    use crate::core::observer::testing::RecordingObserver;
    use crate::suggest::Outcome;
    use image::RgbImage;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn write_image(path: &Path, fg: &str, bg: &str) {
        let fg: Rgb = fg.parse().unwrap();
        let bg: Rgb = bg.parse().unwrap();
        RgbImage::from_fn(40, 20, |x, _| {
            let c = if x < 10 { fg } else { bg };
            image::Rgb([c.r, c.g, c.b])
        })
        .save(path)
        .unwrap();
    }

    fn runner(config: BatchConfig) -> BatchRunner<'static> {
        BatchRunner::new(config, ImageConfig::default(), SuggestOptions::default())
    }

    fn fixture() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_image(&root.join("compliant.png"), "#000000", "#ffffff");
        write_image(&root.join("light_text.png"), "#777777", "#ffffff");
        fs::write(root.join("notes.txt"), "not an image").unwrap();
        fs::write(root.join("broken.png"), b"definitely not a png").unwrap();

        let nested = root.join("nested");
        fs::create_dir(&nested).unwrap();
        write_image(&nested.join("deep.bmp"), "#cccccc", "#ffffff");
        temp_dir
    }

    #[test]
    fn test_collect_images_filters_and_sorts() {
        let temp_dir = fixture();
        let files = runner(BatchConfig::default())
            .collect_images(temp_dir.path())
            .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["broken.png", "compliant.png", "light_text.png", "deep.bmp"]);
    }

    #[test]
    fn test_collect_images_non_recursive() {
        let temp_dir = fixture();
        let config = BatchConfig {
            recursive: false,
            ..BatchConfig::default()
        };
        let files = runner(config).collect_images(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.parent() == Some(temp_dir.path())));
    }

    #[test]
    fn test_collect_images_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            runner(BatchConfig::default()).collect_images(&missing),
            Err(ContrastError::IoError(_))
        ));
    }

    #[test]
    fn test_run_analyzes_every_image() {
        let temp_dir = fixture();
        let seen = Mutex::new(Vec::new());

        let report = runner(BatchConfig::default())
            .run(temp_dir.path(), |p| seen.lock().unwrap().push(p.current))
            .unwrap();

        assert_eq!(report.summary.total, 4);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.no_suggestion_needed, 1);
        assert_eq!(report.summary.foreground_suggested, 1);
        assert_eq!(report.summary.background_suggested, 1);
        assert_eq!(report.summary.target_unreachable, 0);

        let by_name = |name: &str| {
            report
                .entries
                .iter()
                .find(|e| e.path.file_name().unwrap() == name)
                .unwrap()
        };
        assert!(by_name("broken.png").error.is_some());
        assert_eq!(by_name("compliant.png").outcome(), Some(Outcome::NoSuggestionNeeded));
        let light = by_name("light_text.png");
        assert_eq!(light.outcome(), Some(Outcome::ForegroundSuggested));
        assert_eq!(
            light.colors.as_ref().unwrap().background.color,
            Rgb::WHITE
        );

        assert_eq!(by_name("deep.bmp").outcome(), Some(Outcome::BackgroundSuggested));

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_run_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let report = runner(BatchConfig::default())
            .run(temp_dir.path(), |_| panic!("no progress expected"))
            .unwrap();
        assert_eq!(report.summary.total, 0);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn test_run_rejects_invalid_options() {
        let temp_dir = fixture();
        let runner = BatchRunner::new(
            BatchConfig::default(),
            ImageConfig::default(),
            SuggestOptions::default().with_desired_ratio(0.5),
        );
        assert_eq!(
            runner.run(temp_dir.path(), |_| {}).unwrap_err(),
            ContrastError::InvalidRatio(0.5)
        );
    }

    #[test]
    fn test_run_reports_to_observer() {
        let temp_dir = fixture();
        let observer = RecordingObserver::default();
        runner(BatchConfig::default())
            .with_observer(&observer)
            .run(temp_dir.path(), |_| {})
            .unwrap();
        assert_eq!(observer.outcomes.lock().unwrap().len(), 3);
    }
}
