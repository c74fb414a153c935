//! Image datablocks and the path-keyed image cache.

use crate::error::{PrepError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to an image held by an [`ImageCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ImageId(pub(crate) usize);

impl ImageId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// How an image's file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// A single still image.
    #[default]
    File,
    /// The first frame of a numbered image sequence.
    Sequence,
}

/// An image datablock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    /// Datablock name, unique within the cache.
    pub name: String,
    /// Absolute source path.
    pub filepath: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    pub source: ImageSource,
}

impl Image {
    /// Create an image record without touching the filesystem.
    pub fn new(name: impl Into<String>, filepath: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            filepath: filepath.into(),
            width,
            height,
            source: ImageSource::File,
        }
    }

    /// Whether the image has pixel data to sample.
    pub fn has_data(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn is_sequence(&self) -> bool {
        self.source == ImageSource::Sequence
    }

    /// Number of square tiles stacked vertically, when the image is a
    /// vertical strip of more than one tile.
    pub fn tile_count(&self) -> Option<u32> {
        tile_count(self.width, self.height)
    }

    /// File basename used to match cache entries.
    pub fn basename(&self) -> Option<&str> {
        self.filepath.file_name().and_then(|n| n.to_str())
    }
}

/// Tile count of a `width x (n * width)` strip, for n > 1.
pub fn tile_count(width: u32, height: u32) -> Option<u32> {
    if width == 0 || height <= width || height % width != 0 {
        None
    } else {
        Some(height / width)
    }
}

/// Core-owned image table keyed by absolute path.
///
/// At most one datablock exists per (absolute path, basename) pair.
/// Images are never removed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImageCache {
    images: Vec<Image>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a still image, reusing and reloading a cached datablock for the
    /// same file.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<ImageId> {
        self.load_as(path.as_ref(), ImageSource::File)
    }

    /// Load the first frame of an image sequence.
    pub fn load_sequence(&mut self, first_frame: impl AsRef<Path>) -> Result<ImageId> {
        self.load_as(first_frame.as_ref(), ImageSource::Sequence)
    }

    fn load_as(&mut self, path: &Path, source: ImageSource) -> Result<ImageId> {
        let filepath = super::normalize_path(path)?;
        let (width, height) = image::image_dimensions(&filepath)?;

        if let Some(id) = self.find_by_path(&filepath) {
            debug!(path = %filepath.display(), "reloading cached image");
            let image = &mut self.images[id.0];
            image.width = width;
            image.height = height;
            image.source = source;
            return Ok(id);
        }

        let basename = filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PrepError::ImageNotFound(filepath.display().to_string()))?;
        let name = self.unique_name(&basename);
        debug!(path = %filepath.display(), name = %name, width, height, "loaded image");

        let mut image = Image::new(name, filepath, width, height);
        image.source = source;
        Ok(self.push(image))
    }

    /// Register an image created outside the filesystem loader.
    pub fn insert(&mut self, mut image: Image) -> ImageId {
        image.name = self.unique_name(&image.name);
        self.push(image)
    }

    fn push(&mut self, image: Image) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    /// Datablock names follow the host convention: `name`, `name.001`, ...
    fn unique_name(&self, base: &str) -> String {
        if !self.images.iter().any(|i| i.name == base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| !self.images.iter().any(|i| &i.name == candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Find the datablock for a path with a matching basename.
    pub fn find_by_path(&self, path: &Path) -> Option<ImageId> {
        let path = super::normalize_path(path).ok()?;
        let basename = path.file_name()?.to_str()?;
        self.images
            .iter()
            .position(|image| image.basename() == Some(basename) && image.filepath == path)
            .map(ImageId)
    }

    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.get(id.0)
    }

    /// Like [`get`](Self::get), but an unknown handle is an error.
    pub fn image(&self, id: ImageId) -> Result<&Image> {
        self.get(id).ok_or(PrepError::UnknownImage(id.0))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ImageId, &Image)> {
        self.images.iter().enumerate().map(|(i, image)| (ImageId(i), image))
    }
}

/// Fraction of opaque pixels allowed to carry colour before an image counts as coloured.
const SATURATED_PIXEL_RATIO: f32 = 0.2;
/// Smallest channel spread (0-255) that counts a pixel as coloured, just above 10% of full range.
const SATURATION_THRESHOLD: u8 = 26;
/// Images are downscaled to at most this size before sampling.
const GRAYSCALE_SAMPLE_SIZE: u32 = 64;

/// Check whether an image file is effectively grayscale.
///
/// Fully transparent pixels are ignored. An image with no opaque pixels is
/// treated as grayscale.
pub fn is_image_grayscale(path: impl AsRef<Path>) -> Result<bool> {
    let img = image::open(path.as_ref())?;
    let img = if img.width() > GRAYSCALE_SAMPLE_SIZE || img.height() > GRAYSCALE_SAMPLE_SIZE {
        img.thumbnail(GRAYSCALE_SAMPLE_SIZE, GRAYSCALE_SAMPLE_SIZE)
    } else {
        img
    };
    Ok(is_rgba_grayscale(img.to_rgba8().as_raw()))
}

fn is_rgba_grayscale(pixels: &[u8]) -> bool {
    let mut opaque = 0usize;
    let mut saturated = 0usize;
    for pixel in pixels.chunks_exact(4) {
        if pixel[3] == 0 {
            continue;
        }
        opaque += 1;
        let max = pixel[..3].iter().copied().max().unwrap_or(0);
        let min = pixel[..3].iter().copied().min().unwrap_or(0);
        if max - min >= SATURATION_THRESHOLD {
            saturated += 1;
        }
    }
    opaque == 0 || (saturated as f32 / opaque as f32) <= SATURATED_PIXEL_RATIO
}
