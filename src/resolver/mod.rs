//! Texture resolution against a resource pack.
//!
//! Finds the diffuse image for a canonical block name, and the auxiliary
//! PBR passes that sit next to it on disk.

pub mod passes;

pub use passes::{find_additional_passes, PassFiles};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::resource_pack::{split_namespace, ResourcePack};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subfolders of the texture root searched, in order.
pub const SEARCH_SUBPATHS: [&str; 8] = [
    "", "blocks", "block", "items", "item", "entity", "models", "model",
];

/// Diffuse image extensions, in order of preference.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Name suffixes Mineways uses for its generated atlas tiles.
const MINEWAYS_SUFFIXES: [&str; 3] = ["-Alpha", "-RGB", "-RGBA"];

/// Resolves canonical block names to image files within a resource pack.
pub struct TextureResolver<'a> {
    pack: &'a ResourcePack,
    catalog: &'a Catalog,
}

impl<'a> TextureResolver<'a> {
    pub fn new(pack: &'a ResourcePack, catalog: &'a Catalog) -> Self {
        Self { pack, catalog }
    }

    /// Absolute path to the diffuse image for `canon`, if the pack has one.
    ///
    /// A catalog remap (e.g. `chest` -> `entity/chest/normal`) is tried
    /// before the name itself.
    pub fn resolve(&self, canon: &str) -> Option<PathBuf> {
        let remapped = self.catalog.canonical_remap(canon);

        let found = remapped
            .and_then(|target| find_texture(self.pack.texture_root(), target))
            .or_else(|| find_texture(self.pack.texture_root(), canon))
            .or_else(|| self.find_mineways_asset(canon));

        match &found {
            Some(path) => debug!(canon, path = %path.display(), "resolved texture"),
            None => debug!(canon, pack = %self.pack.root().display(), "no texture in pack"),
        }
        found
    }

    fn find_mineways_asset(&self, canon: &str) -> Option<PathBuf> {
        let suffix = MINEWAYS_SUFFIXES.iter().find(|s| canon.ends_with(*s))?;
        let file_name = format!("mineways{}.png", suffix);
        [self.pack.texture_root(), self.pack.root()]
            .into_iter()
            .map(|root| root.join("mineways_assets").join(&file_name))
            .find(|candidate| candidate.is_file())
    }
}

/// Open the pack at `root` and resolve `canon` in it.
pub fn find_from_texturepack(
    root: impl AsRef<Path>,
    catalog: &Catalog,
    canon: &str,
) -> Result<Option<PathBuf>> {
    let pack = ResourcePack::open(root)?;
    Ok(TextureResolver::new(&pack, catalog).resolve(canon))
}

/// Search a texture root for `name`.
///
/// Names carrying a subpath are tried as given first, then by basename
/// across [`SEARCH_SUBPATHS`].
pub fn find_texture(texture_root: &Path, name: &str) -> Option<PathBuf> {
    let (_, path) = split_namespace(name);
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    if path.contains('/') {
        if let Some(found) = probe_extensions(&texture_root.join(path)) {
            return Some(found);
        }
    }

    let basename = path.rsplit('/').next().unwrap_or(path);
    SEARCH_SUBPATHS
        .iter()
        .map(|sub| texture_root.join(sub).join(basename))
        .find_map(|stem| probe_extensions(&stem))
}

/// Return the first of `stem.png`, `stem.jpg`, `stem.jpeg` that exists.
fn probe_extensions(stem: &Path) -> Option<PathBuf> {
    let file_name = stem.file_name()?.to_str()?;
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| stem.with_file_name(format!("{}.{}", file_name, ext)))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn pack_with(files: &[&str]) -> (tempfile::TempDir, ResourcePack) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            touch(&dir.path().join(file));
        }
        let pack = ResourcePack::open(dir.path()).unwrap();
        (dir, pack)
    }

    #[test]
    fn test_resolve_full_pack_layout() {
        let (_dir, pack) = pack_with(&["assets/minecraft/textures/block/grass_block_top.png"]);
        let catalog = Catalog::bundled();
        let resolver = TextureResolver::new(&pack, &catalog);

        let path = resolver.resolve("grass_block_top").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("block/grass_block_top.png"));
    }

    #[test]
    fn test_block_preferred_over_items() {
        let (_dir, pack) = pack_with(&["textures/items/stone.png", "textures/block/stone.png"]);
        let path = find_texture(pack.texture_root(), "stone").unwrap();
        assert!(path.ends_with("block/stone.png"));
    }

    #[test]
    fn test_png_preferred_over_jpg() {
        let (_dir, pack) = pack_with(&["block/stone.jpg", "block/stone.png"]);
        let path = find_texture(pack.texture_root(), "stone").unwrap();
        assert!(path.ends_with("block/stone.png"));
    }

    #[test]
    fn test_root_preferred_over_subfolders() {
        let (_dir, pack) = pack_with(&["stone.jpeg", "blocks/stone.png"]);
        let path = find_texture(pack.texture_root(), "stone").unwrap();
        assert!(path.ends_with("stone.jpeg"));
        assert!(!path.ends_with("blocks/stone.png"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let (_dir, pack) = pack_with(&["textures/block/dirt.png", "textures/item/dirt.png"]);
        let catalog = Catalog::bundled();
        let resolver = TextureResolver::new(&pack, &catalog);
        let first = resolver.resolve("dirt");
        for _ in 0..5 {
            assert_eq!(resolver.resolve("dirt"), first);
        }
    }

    #[test]
    fn test_subpath_then_basename() {
        let (_dir, pack) = pack_with(&[
            "textures/entity/chest/normal.png",
            "textures/block/lantern.png",
        ]);
        let root = pack.texture_root();
        assert!(find_texture(root, "entity/chest/normal")
            .unwrap()
            .ends_with("entity/chest/normal.png"));
        // Subpath misses, basename search finds it.
        assert!(find_texture(root, "minecraft:blocks/lantern")
            .unwrap()
            .ends_with("block/lantern.png"));
    }

    #[test]
    fn test_catalog_remap() {
        let (_dir, pack) = pack_with(&["assets/minecraft/textures/entity/chest/normal.png"]);
        let catalog = Catalog::bundled();
        let resolver = TextureResolver::new(&pack, &catalog);
        let path = resolver.resolve("chest").unwrap();
        assert!(path.ends_with("entity/chest/normal.png"));
    }

    #[test]
    fn test_mineways_fallback() {
        let (_dir, pack) = pack_with(&["mineways_assets/mineways-RGBA.png"]);
        let catalog = Catalog::bundled();
        let resolver = TextureResolver::new(&pack, &catalog);
        let path = resolver.resolve("terrain-RGBA").unwrap();
        assert!(path.ends_with("mineways_assets/mineways-RGBA.png"));
        assert_eq!(resolver.resolve("terrain-Other"), None);
    }

    #[test]
    fn test_missing_texture() {
        let (_dir, pack) = pack_with(&["block/stone.png"]);
        let catalog = Catalog::bundled();
        let resolver = TextureResolver::new(&pack, &catalog);
        assert_eq!(resolver.resolve("oak_leaves"), None);
        assert_eq!(find_texture(pack.texture_root(), ""), None);
    }
}
