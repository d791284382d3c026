//! Dominant color extraction
//!
//! Opens a local image, shrinks it, and splits its pixels into two clusters
//! with a deterministic 2-means pass. The clusters are returned largest first,
//! so index 0 is the background and index 1 the text, the same order the
//! suggestion pipeline expects.
//!
//! Seeding with the darkest and the lightest pixel (by relative luminance)
//! makes the result reproducible for a given image, and pixels with alpha
//! below [`MIN_ALPHA`] are ignored so transparent padding does not become a
//! "color".

use crate::color::space::{rgb_distance, Rgb};
use crate::core::config::ImageConfig;
use crate::core::error::{ContrastError, Result};
use image::{DynamicImage, ImageReader, Rgba};
use log::{debug, trace};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Pixels more transparent than this are skipped
pub const MIN_ALPHA: u8 = 128;

/// Image extensions the extractor accepts
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// One dominant color and the share of pixels it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DominantColor {
    pub color: Rgb,
    /// Fraction of opaque pixels in this cluster, in [0, 1]
    pub share: f64,
}

/// The two dominant colors of an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageColors {
    pub path: PathBuf,
    pub background: DominantColor,
    pub text: DominantColor,
    /// Recognized text, when a recognizer is attached
    pub recognized_text: Option<String>,
}

/// Recognizes the text drawn in an image.
///
/// OCR is outside this crate; plug an engine in through this trait.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<Option<String>>;
}

/// Recognizer that never finds text
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextRecognizer;

impl TextRecognizer for NoTextRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Whether a path has one of the [`IMAGE_EXTENSIONS`]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Extracts dominant colors from image files
pub struct ColorExtractor<'a> {
    config: ImageConfig,
    recognizer: &'a dyn TextRecognizer,
}

impl ColorExtractor<'static> {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            config,
            recognizer: &NoTextRecognizer,
        }
    }
}

impl<'a> ColorExtractor<'a> {
    pub fn with_recognizer(config: ImageConfig, recognizer: &'a dyn TextRecognizer) -> Self {
        Self { config, recognizer }
    }

    /// Open `path` and extract its background and text colors.
    pub fn extract_file(&self, path: &Path) -> Result<ImageColors> {
        if !path.exists() {
            return Err(ContrastError::IoError(format!(
                "Image not found: {}",
                path.display()
            )));
        }

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        debug!(
            "Decoded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        let [background, text] = self.dominant_colors(&image)?;
        let recognized_text = self.recognizer.recognize(&image)?;

        Ok(ImageColors {
            path: path.to_path_buf(),
            background,
            text,
            recognized_text,
        })
    }

    /// Two dominant colors of a decoded image, largest cluster first.
    pub fn dominant_colors(&self, image: &DynamicImage) -> Result<[DominantColor; 2]> {
        let max = self.config.max_dimension.max(1);
        let sampled = if image.width() > max || image.height() > max {
            image.thumbnail(max, max)
        } else {
            image.clone()
        };

        let pixels: Vec<Rgb> = sampled
            .to_rgba8()
            .pixels()
            .filter(|Rgba([_, _, _, a])| *a >= MIN_ALPHA)
            .map(|Rgba([r, g, b, _])| Rgb::new(*r, *g, *b))
            .collect();

        two_means(&pixels, self.config.kmeans_iterations)
    }
}

/// Split `pixels` into two clusters and return their mean colors, largest
/// cluster first.
pub fn two_means(pixels: &[Rgb], max_iterations: usize) -> Result<[DominantColor; 2]> {
    let mut centers = initial_centers(pixels)?;
    let mut counts = [0usize; 2];

    for iteration in 0..max_iterations.max(1) {
        let mut sums = [[0u64; 3]; 2];
        counts = [0; 2];

        for &p in pixels {
            let nearest = usize::from(rgb_distance(p, centers[1]) < rgb_distance(p, centers[0]));
            counts[nearest] += 1;
            for (sum, c) in sums[nearest].iter_mut().zip(p.channels()) {
                *sum += u64::from(c);
            }
        }

        let mut next = centers;
        for k in 0..2 {
            if counts[k] > 0 {
                let n = counts[k] as u64;
                let mean = |i: usize| ((sums[k][i] + n / 2) / n) as u8;
                next[k] = Rgb::new(mean(0), mean(1), mean(2));
            }
        }

        trace!("2-means iteration {}: {} / {}", iteration, next[0], next[1]);
        if next == centers {
            break;
        }
        centers = next;
    }

    let total = pixels.len() as f64;
    let mut clusters = [
        DominantColor {
            color: centers[0],
            share: counts[0] as f64 / total,
        },
        DominantColor {
            color: centers[1],
            share: counts[1] as f64 / total,
        },
    ];
    // Stable order: larger share first, darker first on ties
    if clusters[1].share > clusters[0].share {
        clusters.swap(0, 1);
    }
    Ok(clusters)
}

/// Seed the clusters with the luminance extremes. When every pixel has the
/// same luminance the second seed is the pixel farthest from the first.
fn initial_centers(pixels: &[Rgb]) -> Result<[Rgb; 2]> {
    let (darkest, lightest) = luminance_extremes(pixels).ok_or(ContrastError::NotEnoughColors(0))?;
    if darkest != lightest {
        return Ok([darkest, lightest]);
    }

    let farthest = farthest_from(pixels, darkest).ok_or(ContrastError::NotEnoughColors(1))?;
    trace!("Equal luminance extremes, seeding with {} / {}", darkest, farthest);
    Ok([darkest, farthest])
}

/// Pixel with the largest RGB distance from `origin`, ignoring exact matches
fn farthest_from(pixels: &[Rgb], origin: Rgb) -> Option<Rgb> {
    pixels
        .iter()
        .copied()
        .filter(|&p| p != origin)
        .map(|p| (rgb_distance(p, origin), p))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, p)| p)
}

fn luminance_extremes(pixels: &[Rgb]) -> Option<(Rgb, Rgb)> {
    let mut iter = pixels.iter().copied();
    let first = iter.next()?;
    let mut darkest = (first.luminance(), first);
    let mut lightest = darkest;
    for p in iter {
        let l = p.luminance();
        if l < darkest.0 {
            darkest = (l, p);
        }
        if l > lightest.0 {
            lightest = (l, p);
        }
    }
    Some((darkest.1, lightest.1))
}
