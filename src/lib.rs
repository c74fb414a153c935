//! # MCprep Materials
//!
//! A Rust library for generating Blender-style shader graphs for Minecraft
//! world exports.
//!
//! ## Overview
//!
//! Materials exported by jmc2obj or Mineways carry block names, not shading.
//! This library maps those names onto canonical block ids, looks the blocks
//! up in a catalog of semantic classes (reflective, emissive, solid, ...),
//! finds the right textures in a resource pack, and builds a node graph per
//! material. Tiled animated textures can be unfolded into image sequences.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mcprep_materials::{prep_materials, Catalog, HostInfo, ImageCache, Material, PrepOptions};
//!
//! let catalog = Catalog::bundled();
//! let mut images = ImageCache::new();
//! let mut materials = vec![Material::new("grass_block_top"), Material::new("glass.001")];
//!
//! let options = PrepOptions::default().with_resource_pack("path/to/pack");
//! let outcome = prep_materials(&catalog, &mut images, &HostInfo::default(), &mut materials, &options)?;
//! println!("{}", outcome.status());
//! ```
//!
//! ## Single Materials
//!
//! For one material with known images, call [`prep_material`] directly:
//!
//! ```ignore
//! use mcprep_materials::{prep_material, PassMap, PrepContext};
//!
//! let diffuse = images.load("pack/textures/block/stone.png")?;
//! let ctx = PrepContext { catalog: &catalog, images: &images, host: &host };
//! let summary = prep_material(&mut material, &PassMap::with_diffuse(diffuse), &ctx, &options)?;
//! ```

pub mod error;
pub mod catalog;
pub mod naming;
pub mod pass;
pub mod resource_pack;
pub mod resolver;
pub mod graph;
pub mod material;
pub mod prep;
pub mod animate;
pub mod operator;

// Re-export main types for convenience
pub use error::{PrepError, Result};
pub use catalog::{Catalog, SemanticClass};
pub use naming::{canonicalize, detect_form, CanonicalName, ExporterForm};
pub use pass::{PassKind, PassMap};
pub use resource_pack::{Image, ImageCache, ImageId, ResourcePack};
pub use resolver::{find_additional_passes, find_from_texturepack, TextureResolver};
pub use graph::{Annotation, NodeId, NodeKind, ShaderGraph};
pub use material::{BlendMethod, HostInfo, Material, RenderEngine, ShadowMethod};
pub use prep::{extract_passes, prep_material, GeneratorKind, PackFormat, PrepContext, PrepOptions, PrepSummary};
pub use animate::{slice_tiled_image, ExportLocation};
pub use operator::{prep_materials, swap_texture_pack, OperatorOutcome, OperatorReport};

/// Open a resource pack directory.
pub fn open_resource_pack<P: AsRef<std::path::Path>>(path: P) -> Result<ResourcePack> {
    ResourcePack::open(path)
}
