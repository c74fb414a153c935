//! Resource pack locations and image loading.
//!
//! A resource pack is a directory tree whose texture root may sit at
//! different depths depending on how the pack was extracted. This module
//! finds that root and owns the image datablock cache.

pub mod texture;

pub use texture::{is_image_grayscale, tile_count, Image, ImageCache, ImageId, ImageSource};

use crate::error::{PrepError, Result};
use std::path::{Component, Path, PathBuf};

/// Subfolders probed, in order, for the effective texture root.
pub const TEXTURE_ROOT_CANDIDATES: [&str; 3] = [
    "textures",
    "minecraft/textures",
    "assets/minecraft/textures",
];

/// A resource pack directory with its effective texture root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePack {
    root: PathBuf,
    texture_root: PathBuf,
}

impl ResourcePack {
    /// Open a resource pack directory.
    ///
    /// The pack root itself is the texture root unless one of
    /// [`TEXTURE_ROOT_CANDIDATES`] exists beneath it.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = normalize_path(root.as_ref())?;
        if !root.is_dir() {
            return Err(PrepError::InvalidResourcePack(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let texture_root = effective_root(&root);
        tracing::debug!(
            root = %root.display(),
            textures = %texture_root.display(),
            "opened resource pack"
        );
        Ok(Self { root, texture_root })
    }

    /// The directory the pack was opened from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory texture lookups are made against.
    pub fn texture_root(&self) -> &Path {
        &self.texture_root
    }
}

/// Probe the candidate texture roots beneath `root`.
fn effective_root(root: &Path) -> PathBuf {
    TEXTURE_ROOT_CANDIDATES
        .iter()
        .map(|sub| root.join(sub))
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| root.to_path_buf())
}

/// Make `path` absolute and fold away `.` and `..` components.
///
/// Symlinks are left alone, so the result names the same file the caller
/// asked for.
pub(crate) fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Split a namespaced location into namespace and path.
/// "minecraft:block/stone" -> (Some("minecraft"), "block/stone")
/// "block/stone" -> (None, "block/stone")
pub(crate) fn split_namespace(location: &str) -> (Option<&str>, &str) {
    match location.split_once(':') {
        Some((namespace, path)) => (Some(namespace), path),
        None => (None, location),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_namespace() {
        assert_eq!(
            split_namespace("minecraft:block/stone"),
            (Some("minecraft"), "block/stone")
        );
        assert_eq!(split_namespace("mymod:block/custom"), (Some("mymod"), "block/custom"));
        assert_eq!(split_namespace("block/stone"), (None, "block/stone"));
    }

    #[test]
    fn test_effective_root_full_layout() {
        let dir = tempfile::tempdir().unwrap();
        let textures = dir.path().join("assets/minecraft/textures");
        std::fs::create_dir_all(&textures).unwrap();

        let pack = ResourcePack::open(dir.path()).unwrap();
        assert_eq!(pack.texture_root(), std::path::absolute(&textures).unwrap());
    }

    #[test]
    fn test_effective_root_prefers_shallow() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("textures")).unwrap();
        std::fs::create_dir_all(dir.path().join("assets/minecraft/textures")).unwrap();

        let pack = ResourcePack::open(dir.path()).unwrap();
        assert!(pack.texture_root().ends_with("textures"));
        assert!(!pack.texture_root().ends_with("minecraft/textures"));
    }

    #[test]
    fn test_effective_root_falls_back_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let pack = ResourcePack::open(dir.path()).unwrap();
        assert_eq!(pack.texture_root(), pack.root());
    }

    #[test]
    fn test_open_folds_parent_components() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pack/textures")).unwrap();

        let direct = ResourcePack::open(dir.path().join("pack")).unwrap();
        let dotted = ResourcePack::open(dir.path().join("pack/textures/../.")).unwrap();
        assert_eq!(direct, dotted);
        assert!(!dotted.texture_root().to_string_lossy().contains(".."));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c/./d.png")).unwrap(),
            PathBuf::from("/a/c/d.png")
        );
        assert_eq!(normalize_path(Path::new("/../x")).unwrap(), PathBuf::from("/x"));
    }

    #[test]
    fn test_open_missing_directory() {
        let result = ResourcePack::open("/nonexistent/pack");
        assert!(matches!(result, Err(PrepError::InvalidResourcePack(_))));
    }
}
