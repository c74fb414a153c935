//! Unfolding vertically tiled textures into image sequences.
//!
//! Animated block textures ship as a single `W x (N*W)` strip. The host can
//! only cycle image sequences, so each tile is written to its own file in a
//! folder named after the source and the first frame is bound as a cyclic
//! sequence.

use crate::error::{PrepError, Result};
use crate::graph::{Annotation, ImageUser, NodeId, ShaderGraph};
use crate::material::Material;
use crate::pass::PassKind;
use crate::resource_pack::{tile_count, ImageCache, ImageId};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Where generated sequence folders are placed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExportLocation {
    /// Next to the source image.
    #[default]
    Original,
    /// Under a fixed directory.
    Directory(PathBuf),
}

impl ExportLocation {
    /// Base directory a sequence folder for `source` lives in.
    pub fn base_for(&self, source: &Path) -> PathBuf {
        match self {
            ExportLocation::Original => source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            ExportLocation::Directory(dir) => dir.clone(),
        }
    }
}

impl FromStr for ExportLocation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Err("empty export location".to_string()),
            "original" => Ok(ExportLocation::Original),
            dir => Ok(ExportLocation::Directory(PathBuf::from(dir))),
        }
    }
}

impl fmt::Display for ExportLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportLocation::Original => f.write_str("original"),
            ExportLocation::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Frames of a sliced texture on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceFrames {
    pub folder: PathBuf,
    /// Frame files in playback order.
    pub frames: Vec<PathBuf>,
    /// False when existing frames were reused.
    pub regenerated: bool,
}

impl SequenceFrames {
    pub fn first(&self) -> Option<&Path> {
        self.frames.first().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// File name of frame `index` for a source with `stem` and `ext`.
pub fn frame_file_name(stem: &str, index: u32, ext: &str) -> String {
    format!("{}{:04}.{}", stem, index, ext)
}

/// Slice `source` into one file per tile.
///
/// Existing frames are reused unless `clear_cache` is set, in which case
/// they are removed and written again.
pub fn slice_tiled_image(
    source: &Path,
    location: &ExportLocation,
    clear_cache: bool,
) -> Result<SequenceFrames> {
    let (stem, ext) = stem_and_extension(source)?;
    let (width, height) = image::image_dimensions(source)?;
    let tiles = tile_count(width, height).ok_or_else(|| PrepError::TileRatioInvalid {
        path: source.to_path_buf(),
        width,
        height,
    })?;

    let folder = location.base_for(source).join(&stem);
    let frames: Vec<PathBuf> = (0..tiles)
        .map(|i| folder.join(frame_file_name(&stem, i, &ext)))
        .collect();

    if folder.is_dir() {
        if clear_cache {
            clear_frames(&folder, &stem)?;
        } else if frames.iter().all(|f| f.is_file()) {
            debug!(folder = %folder.display(), tiles, "reusing existing sequence");
            return Ok(SequenceFrames {
                folder,
                frames,
                regenerated: false,
            });
        }
    }

    fs::create_dir_all(&folder).map_err(|e| PrepError::UnwritablePath {
        path: folder.clone(),
        reason: e.to_string(),
    })?;

    let strip = image::open(source)?;
    for (i, frame) in frames.iter().enumerate() {
        strip
            .crop_imm(0, i as u32 * width, width, width)
            .save(frame)
            .map_err(|e| PrepError::UnwritablePath {
                path: frame.clone(),
                reason: e.to_string(),
            })?;
    }
    info!(source = %source.display(), tiles, folder = %folder.display(), "wrote image sequence");

    Ok(SequenceFrames {
        folder,
        frames,
        regenerated: true,
    })
}

fn stem_and_extension(source: &Path) -> Result<(String, String)> {
    let stem = source.file_stem().and_then(|s| s.to_str());
    let ext = source.extension().and_then(|s| s.to_str());
    match (stem, ext) {
        (Some(stem), Some(ext)) => Ok((stem.to_string(), ext.to_string())),
        _ => Err(PrepError::ImageNotFound(source.display().to_string())),
    }
}

/// Remove files in `folder` named `<stem><digits>.<ext>`.
fn clear_frames(folder: &Path, stem: &str) -> Result<()> {
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        let is_frame = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_prefix(stem))
            .map_or(false, |digits| {
                !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
            });
        if is_frame && path.is_file() {
            fs::remove_file(&path)?;
        }
    }
    debug!(folder = %folder.display(), "cleared cached frames");
    Ok(())
}

/// Bind a loaded sequence to an image node and make it cycle over `frames`.
pub fn bind_sequence(graph: &mut ShaderGraph, node: NodeId, image: ImageId, frames: u32) -> Result<()> {
    graph.set_image(node, Some(image))?;
    graph.set_image_user(node, Some(ImageUser::cycling(frames)))
}

/// Replace the still image on `material`'s `pass` node with a sequence
/// sliced from it. Returns the frame count.
pub fn animate_pass(
    material: &mut Material,
    pass: PassKind,
    images: &mut ImageCache,
    location: &ExportLocation,
    clear_cache: bool,
) -> Result<u32> {
    let graph = &mut material.node_tree;
    let node = graph
        .find_annotated(Annotation::Pass(pass))
        .ok_or_else(|| PrepError::DiffuseMissing(material.name.clone()))?;
    let source = graph
        .node(node)
        .and_then(|n| n.image)
        .and_then(|id| images.get(id))
        .map(|image| image.filepath.clone())
        .ok_or_else(|| PrepError::DiffuseMissing(material.name.clone()))?;

    let sequence = slice_tiled_image(&source, location, clear_cache)?;
    let first = sequence
        .first()
        .ok_or_else(|| PrepError::ImageNotFound(source.display().to_string()))?;
    let image = images.load_sequence(first)?;
    let count = sequence.len() as u32;
    bind_sequence(graph, node, image, count)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    /// A 4-wide strip where tile `i` is filled with gray level `i * 40`.
    fn write_strip(dir: &Path, name: &str, tiles: u32) -> PathBuf {
        let mut img = RgbaImage::new(4, 4 * tiles);
        for (_, y, pixel) in img.enumerate_pixels_mut() {
            let level = (y / 4 * 40) as u8;
            *pixel = Rgba([level, level, level, 255]);
        }
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_export_location_parse() {
        assert_eq!("original".parse::<ExportLocation>().unwrap(), ExportLocation::Original);
        assert_eq!(
            "/tmp/seq".parse::<ExportLocation>().unwrap(),
            ExportLocation::Directory(PathBuf::from("/tmp/seq"))
        );
        assert!("".parse::<ExportLocation>().is_err());
    }

    #[test]
    fn test_slices_into_sibling_folder() {
        let dir = TempDir::new().unwrap();
        let source = write_strip(dir.path(), "water_still.png", 3);

        let seq = slice_tiled_image(&source, &ExportLocation::Original, false).unwrap();
        assert!(seq.regenerated);
        assert_eq!(seq.folder, dir.path().join("water_still"));
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.frames[2], dir.path().join("water_still/water_still0002.png"));

        let frame = image::open(&seq.frames[1]).unwrap().to_rgba8();
        assert_eq!(frame.dimensions(), (4, 4));
        assert_eq!(frame.get_pixel(0, 0)[0], 40);
    }

    #[test]
    fn test_reuse_and_clear_cache() {
        let dir = TempDir::new().unwrap();
        let source = write_strip(dir.path(), "lava_still.png", 2);

        slice_tiled_image(&source, &ExportLocation::Original, false).unwrap();
        let again = slice_tiled_image(&source, &ExportLocation::Original, false).unwrap();
        assert!(!again.regenerated);

        let stray = again.folder.join("lava_still0007.png");
        fs::write(&stray, b"old").unwrap();
        let cleared = slice_tiled_image(&source, &ExportLocation::Original, true).unwrap();
        assert!(cleared.regenerated);
        assert!(!stray.exists());
        assert!(cleared.frames.iter().all(|f| f.is_file()));
    }

    #[test]
    fn test_custom_directory() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let source = write_strip(dir.path(), "fire_0.png", 2);
        let location = ExportLocation::Directory(out.path().to_path_buf());

        let seq = slice_tiled_image(&source, &location, false).unwrap();
        assert_eq!(seq.folder, out.path().join("fire_0"));
        assert!(!dir.path().join("fire_0").exists());
    }

    #[test]
    fn test_invalid_tile_ratio() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("odd.png");
        RgbaImage::new(4, 10).save(&path).unwrap();
        let err = slice_tiled_image(&path, &ExportLocation::Original, false).unwrap_err();
        assert!(matches!(err, PrepError::TileRatioInvalid { width: 4, height: 10, .. }));

        let square = dir.path().join("square.png");
        RgbaImage::new(4, 4).save(&square).unwrap();
        assert!(slice_tiled_image(&square, &ExportLocation::Original, false).is_err());
    }

    #[test]
    fn test_animate_pass_binds_sequence() {
        let dir = TempDir::new().unwrap();
        let source = write_strip(dir.path(), "prismarine.png", 4);
        let mut images = ImageCache::new();
        let still = images.load(&source).unwrap();

        let mut mat = Material::new("prismarine");
        mat.use_nodes = true;
        let node = mat.node_tree.add_node(NodeKind::TexImage, [0.0, 0.0]);
        mat.node_tree.annotate(node, Annotation::Pass(PassKind::Diffuse));
        mat.node_tree.set_image(node, Some(still)).unwrap();

        let frames = animate_pass(&mut mat, PassKind::Diffuse, &mut images, &ExportLocation::Original, false).unwrap();
        assert_eq!(frames, 4);

        let bound = mat.node_tree.node(node).unwrap();
        let image = images.get(bound.image.unwrap()).unwrap();
        assert!(image.is_sequence());
        assert_eq!(image.basename(), Some("prismarine0000.png"));
        let user = bound.image_user.unwrap();
        assert_eq!(user.frame_duration, 4);
        assert!(user.use_cyclic && user.use_auto_refresh);
    }
}
