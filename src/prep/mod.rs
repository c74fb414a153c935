//! Shader graph generation for block materials.
//!
//! [`prep_material`] rebuilds a material's node graph from a set of pass
//! images. The topology is picked from the block's semantic classes, the
//! options, and what the host offers:
//!
//! - `emit` blocks get the emission generator (camera-visible emission
//!   mixed with a light-falloff-scaled emission for lighting),
//! - otherwise the principled generator when the host has a principled BSDF,
//! - otherwise the classic diffuse + glossy mix.
//!
//! Sequence timing on annotated image nodes survives regeneration.

pub mod desaturate;
pub mod extract;

mod classic;
mod common;
mod emission;
mod principled;

pub use extract::{capture_animation, extract_passes, AnimationSettings, ExtractedPasses};

use crate::animate::ExportLocation;
use crate::catalog::{Catalog, SemanticClass};
use crate::error::{PrepError, Result};
use crate::graph::Annotation;
use crate::material::{BlendMethod, HostInfo, Material, ShadowMethod};
use crate::naming::canonicalize;
use crate::pass::{PassKind, PassMap};
use crate::resource_pack::{ImageCache, ImageId};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// PBR convention the generated graph honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackFormat {
    /// Diffuse only; auxiliary passes are discarded.
    #[default]
    Simple,
    /// Diffuse, specular and normal maps.
    Specular,
    /// Specular map with packed smoothness / metalness channels.
    Seus,
}

impl FromStr for PackFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(PackFormat::Simple),
            "specular" => Ok(PackFormat::Specular),
            "seus" => Ok(PackFormat::Seus),
            _ => Err(format!("unknown pack format '{}'", s)),
        }
    }
}

impl fmt::Display for PackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackFormat::Simple => f.write_str("simple"),
            PackFormat::Specular => f.write_str("specular"),
            PackFormat::Seus => f.write_str("seus"),
        }
    }
}

/// Material preparation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepOptions {
    /// Honour the catalog's `reflective` class.
    pub use_reflections: bool,
    /// Prefer the principled generator when the host has one.
    pub use_principled: bool,
    /// Force opaque materials regardless of block class.
    pub only_solid: bool,
    pub pack_format: PackFormat,
    /// Use the dedicated emission graph for `emit` blocks.
    pub use_emission_nodes: bool,
    /// Honour the catalog's `emit` class at all.
    pub use_emission: bool,
    /// Look for normal / specular / displacement images beside the diffuse.
    pub use_extra_maps: bool,
    /// Unfold tiled textures of animated blocks into image sequences.
    pub animate_textures: bool,
    /// Where image sequences are written.
    pub export_location: ExportLocation,
    /// Regenerate image sequences even if their folder exists.
    pub clear_cache: bool,
    /// Resource pack used to fill in missing diffuse images.
    pub resource_pack: Option<PathBuf>,
}

impl Default for PrepOptions {
    fn default() -> Self {
        Self {
            use_reflections: true,
            use_principled: true,
            only_solid: false,
            pack_format: PackFormat::Simple,
            use_emission_nodes: true,
            use_emission: true,
            use_extra_maps: false,
            animate_textures: false,
            export_location: ExportLocation::Original,
            clear_cache: false,
            resource_pack: None,
        }
    }
}

impl PrepOptions {
    pub fn with_pack_format(mut self, format: PackFormat) -> Self {
        self.pack_format = format;
        self
    }

    pub fn with_resource_pack(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_pack = Some(path.into());
        self
    }

    pub fn with_extra_maps(mut self, enabled: bool) -> Self {
        self.use_extra_maps = enabled;
        self
    }

    pub fn with_animation(mut self, enabled: bool) -> Self {
        self.animate_textures = enabled;
        self
    }

    pub fn with_only_solid(mut self, enabled: bool) -> Self {
        self.only_solid = enabled;
        self
    }

    pub fn with_principled(mut self, enabled: bool) -> Self {
        self.use_principled = enabled;
        self
    }

    pub fn with_export_location(mut self, location: ExportLocation) -> Self {
        self.export_location = location;
        self
    }
}

/// Which generator built a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Principled,
    Classic,
    Emission,
}

/// Per-block decisions derived from the catalog and options.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BlockTraits {
    pub canonical: String,
    pub reflective: bool,
    pub metallic: bool,
    pub glass: bool,
    pub water: bool,
    pub solid: bool,
    pub emit: bool,
    pub desaturated: bool,
    pub desaturated_color: Option<[f32; 4]>,
}

impl BlockTraits {
    pub fn classify(catalog: &Catalog, material_name: &str, options: &PrepOptions) -> Self {
        let canonical = canonicalize(catalog, material_name).name;
        let classes = catalog.classes(&canonical);
        let has = |class: SemanticClass| classes.contains(&class);
        let desaturated = has(SemanticClass::Desaturated);

        Self {
            reflective: options.use_reflections && has(SemanticClass::Reflective),
            metallic: has(SemanticClass::Metallic),
            glass: has(SemanticClass::Glass),
            water: has(SemanticClass::Water),
            solid: options.only_solid || has(SemanticClass::Solid),
            emit: options.use_emission && has(SemanticClass::Emit),
            desaturated,
            desaturated_color: if desaturated {
                catalog.desaturated_color(&canonical)
            } else {
                None
            },
            canonical,
        }
    }
}

/// Collaborators a prep run reads from.
#[derive(Debug, Clone, Copy)]
pub struct PrepContext<'a> {
    pub catalog: &'a Catalog,
    pub images: &'a ImageCache,
    pub host: &'a HostInfo,
}

/// What a successful prep produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrepSummary {
    pub canonical: String,
    pub generator: GeneratorKind,
    pub transparent: bool,
    /// Whether the desaturation overlay is active.
    pub saturated: bool,
}

/// Result of running one generator.
pub(crate) struct Generated {
    pub transparent: bool,
}

/// Rebuild `material`'s node graph from `passes`.
///
/// Fails without touching the material when the diffuse image is missing
/// or empty, or when the render engine is unsupported.
pub fn prep_material(
    material: &mut Material,
    passes: &PassMap<ImageId>,
    ctx: &PrepContext<'_>,
    options: &PrepOptions,
) -> Result<PrepSummary> {
    if !ctx.host.engine.is_supported() {
        return Err(PrepError::EngineUnsupported(ctx.host.engine.to_string()));
    }

    let diffuse = passes
        .diffuse
        .ok_or_else(|| PrepError::DiffuseMissing(material.name.clone()))?;
    if !ctx.images.image(diffuse)?.has_data() {
        return Err(PrepError::DiffuseMissing(material.name.clone()));
    }

    let passes = usable_passes(passes, ctx.images, options, &material.name);
    let traits = BlockTraits::classify(ctx.catalog, &material.name, options);
    let generator = select_generator(&traits, ctx.host, options);
    debug!(
        material = %material.name,
        canonical = %traits.canonical,
        ?generator,
        "generating material graph"
    );

    let animation = capture_animation(&material.node_tree, ctx.images);

    material.node_tree.clear();
    material.use_nodes = true;
    let graph = &mut material.node_tree;
    let generated = match generator {
        GeneratorKind::Principled => principled::build(graph, &passes, &traits, options)?,
        GeneratorKind::Classic => classic::build(graph, &passes, &traits)?,
        GeneratorKind::Emission => emission::build(graph, &passes, &traits)?,
    };

    apply_surface_settings(material, &traits, generated.transparent);
    reapply_animation(material, &animation, ctx.images)?;
    let saturated = desaturate::update_saturation(material, &traits, ctx.images)?;

    Ok(PrepSummary {
        canonical: traits.canonical,
        generator,
        transparent: generated.transparent,
        saturated,
    })
}

fn select_generator(traits: &BlockTraits, host: &HostInfo, options: &PrepOptions) -> GeneratorKind {
    if traits.emit && options.use_emission_nodes {
        GeneratorKind::Emission
    } else if options.use_principled && host.principled_available {
        GeneratorKind::Principled
    } else {
        GeneratorKind::Classic
    }
}

/// Drop passes the pack format excludes or that have no pixel data.
fn usable_passes(
    passes: &PassMap<ImageId>,
    images: &ImageCache,
    options: &PrepOptions,
    material: &str,
) -> PassMap<ImageId> {
    let mut usable = if options.pack_format == PackFormat::Simple {
        passes.clone().diffuse_only()
    } else {
        passes.clone()
    };
    for kind in [PassKind::Normal, PassKind::Specular, PassKind::Displace] {
        let slot = usable.slot_mut(kind);
        if let Some(id) = *slot {
            if !images.get(id).map_or(false, |image| image.has_data()) {
                info!(material, pass = %kind, "pass image unusable, leaving pass muted");
                *slot = None;
            }
        }
    }
    usable
}

fn apply_surface_settings(material: &mut Material, traits: &BlockTraits, transparent: bool) {
    if transparent {
        material.blend_method = BlendMethod::Hashed;
        material.shadow_method = ShadowMethod::Hashed;
    } else {
        material.blend_method = BlendMethod::Opaque;
        material.shadow_method = ShadowMethod::Opaque;
    }
    material.show_transparent_back = !traits.glass;
    material.use_backface_culling = traits.glass;
}

/// Restore sequence timing onto regenerated nodes still bound to a sequence.
fn reapply_animation(
    material: &mut Material,
    animation: &PassMap<AnimationSettings>,
    images: &ImageCache,
) -> Result<()> {
    let graph = &mut material.node_tree;
    for (kind, settings) in animation.iter() {
        let Some(id) = graph.find_annotated(Annotation::Pass(kind)) else {
            continue;
        };
        let is_sequence = graph
            .node(id)
            .and_then(|n| n.image)
            .and_then(|image| images.get(image))
            .map_or(false, |image| image.is_sequence());
        if is_sequence {
            graph.set_image_user(id, Some(settings.to_image_user()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ImageUser, NodeKind};
    use crate::material::RenderEngine;
    use crate::resource_pack::{Image, ImageSource};

    struct Fixture {
        catalog: Catalog,
        images: ImageCache,
        host: HostInfo,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Catalog::bundled(),
                images: ImageCache::new(),
                host: HostInfo::default(),
            }
        }

        fn image(&mut self, name: &str) -> ImageId {
            self.images
                .insert(Image::new(name, format!("/virtual/{}", name), 16, 16))
        }

        fn prep(&self, material: &mut Material, passes: &PassMap<ImageId>, options: &PrepOptions) -> Result<PrepSummary> {
            let ctx = PrepContext {
                catalog: &self.catalog,
                images: &self.images,
                host: &self.host,
            };
            prep_material(material, passes, &ctx, options)
        }
    }

    #[test]
    fn test_pack_format_parse() {
        assert_eq!("SEUS".parse::<PackFormat>().unwrap(), PackFormat::Seus);
        assert_eq!("specular".parse::<PackFormat>().unwrap(), PackFormat::Specular);
        assert!("pbr".parse::<PackFormat>().is_err());
        assert_eq!(PackFormat::Simple.to_string(), "simple");
    }

    #[test]
    fn test_default_options() {
        let options = PrepOptions::default();
        assert!(options.use_reflections && options.use_principled);
        assert!(!options.only_solid && !options.animate_textures);
        assert_eq!(options.pack_format, PackFormat::Simple);
    }

    #[test]
    fn test_missing_diffuse_leaves_material_untouched() {
        let fx = Fixture::new();
        let mut mat = Material::new("stone");
        let before = mat.clone();
        let err = fx.prep(&mut mat, &PassMap::new(), &PrepOptions::default()).unwrap_err();
        assert!(matches!(err, PrepError::DiffuseMissing(_)));
        assert_eq!(mat, before);
    }

    #[test]
    fn test_empty_diffuse_rejected() {
        let mut fx = Fixture::new();
        let empty = fx.images.insert(Image::new("stone.png", "/virtual/stone.png", 0, 0));
        let mut mat = Material::new("stone");
        let err = fx
            .prep(&mut mat, &PassMap::with_diffuse(empty), &PrepOptions::default())
            .unwrap_err();
        assert!(matches!(err, PrepError::DiffuseMissing(_)));
        assert!(!mat.use_nodes);
    }

    #[test]
    fn test_unsupported_engine() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("stone.png");
        fx.host = HostInfo::new(RenderEngine::from_id("BLENDER_WORKBENCH"));
        let mut mat = Material::new("stone");
        let err = fx
            .prep(&mut mat, &PassMap::with_diffuse(diffuse), &PrepOptions::default())
            .unwrap_err();
        assert!(matches!(err, PrepError::EngineUnsupported(_)));
    }

    #[test]
    fn test_solid_block_is_opaque() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("stone.png");
        let mut mat = Material::new("stone");
        let summary = fx
            .prep(&mut mat, &PassMap::with_diffuse(diffuse), &PrepOptions::default())
            .unwrap();

        assert_eq!(summary.generator, GeneratorKind::Principled);
        assert!(!summary.transparent);
        assert!(mat.use_nodes);
        assert_eq!(mat.blend_method, BlendMethod::Opaque);
        assert_eq!(mat.shadow_method, ShadowMethod::Opaque);
        assert_eq!(mat.node_tree.count_kind(NodeKind::BsdfTransparent), 0);
    }

    #[test]
    fn test_only_solid_overrides_class() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("oak_leaves.png");
        let mut mat = Material::new("oak_leaves");
        let options = PrepOptions::default().with_only_solid(true);
        let summary = fx.prep(&mut mat, &PassMap::with_diffuse(diffuse), &options).unwrap();
        assert!(!summary.transparent);
        assert_eq!(mat.blend_method, BlendMethod::Opaque);
    }

    #[test]
    fn test_glass_settings() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("glass.png");
        let mut mat = Material::new("glass");
        fx.prep(&mut mat, &PassMap::with_diffuse(diffuse), &PrepOptions::default())
            .unwrap();

        assert_eq!(mat.blend_method, BlendMethod::Hashed);
        assert_eq!(mat.shadow_method, ShadowMethod::Hashed);
        assert!(!mat.show_transparent_back);
        assert!(mat.use_backface_culling);
        assert_eq!(mat.node_tree.count_kind(NodeKind::BsdfTransparent), 1);
    }

    #[test]
    fn test_generator_selection() {
        let mut fx = Fixture::new();
        let glow = fx.image("glowstone.png");
        let stone = fx.image("stone.png");

        let mut mat = Material::new("glowstone");
        let summary = fx
            .prep(&mut mat, &PassMap::with_diffuse(glow), &PrepOptions::default())
            .unwrap();
        assert_eq!(summary.generator, GeneratorKind::Emission);

        let no_emission = PrepOptions {
            use_emission: false,
            ..PrepOptions::default()
        };
        let summary = fx.prep(&mut mat, &PassMap::with_diffuse(glow), &no_emission).unwrap();
        assert_eq!(summary.generator, GeneratorKind::Principled);
        let bsdf = mat.node_tree.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        assert!(mat.node_tree.input_node(bsdf, "Emission").is_none());

        fx.host = HostInfo::default().without_principled();
        let mut mat = Material::new("stone");
        let summary = fx
            .prep(&mut mat, &PassMap::with_diffuse(stone), &PrepOptions::default())
            .unwrap();
        assert_eq!(summary.generator, GeneratorKind::Classic);
        assert_eq!(mat.node_tree.count_kind(NodeKind::BsdfGlossy), 1);
    }

    #[test]
    fn test_emission_nodes_disabled_uses_principled_emission() {
        let mut fx = Fixture::new();
        let glow = fx.image("glowstone.png");
        let mut mat = Material::new("glowstone");
        let options = PrepOptions {
            use_emission_nodes: false,
            ..PrepOptions::default()
        };

        let summary = fx.prep(&mut mat, &PassMap::with_diffuse(glow), &options).unwrap();
        assert_eq!(summary.generator, GeneratorKind::Principled);

        let graph = &mat.node_tree;
        assert_eq!(graph.count_kind(NodeKind::LightPath), 0);
        assert_eq!(graph.count_kind(NodeKind::Emission), 0);
        let bsdf = graph.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        assert!(graph.input_node(bsdf, "Emission").is_some());
        assert_eq!(graph.node(bsdf).unwrap().float_input("Emission Strength"), Some(1.0));
    }

    #[test]
    fn test_simple_format_drops_extra_passes() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("stone.png");
        let normal = fx.image("stone_n.png");
        let mut passes = PassMap::with_diffuse(diffuse);
        passes.normal = Some(normal);

        let mut mat = Material::new("stone");
        fx.prep(&mut mat, &passes, &PrepOptions::default()).unwrap();
        let node = mat
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Normal))
            .unwrap();
        assert_eq!(mat.node_tree.node(node).unwrap().image, None);

        let options = PrepOptions::default().with_pack_format(PackFormat::Specular);
        fx.prep(&mut mat, &passes, &options).unwrap();
        let node = mat
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Normal))
            .unwrap();
        let node = mat.node_tree.node(node).unwrap();
        assert_eq!(node.image, Some(normal));
        assert!(!node.mute);
    }

    #[test]
    fn test_regeneration_is_stable() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("glass.png");
        let passes = PassMap::with_diffuse(diffuse);
        let mut mat = Material::new("glass");

        fx.prep(&mut mat, &passes, &PrepOptions::default()).unwrap();
        let first = mat.clone();
        fx.prep(&mut mat, &passes, &PrepOptions::default()).unwrap();
        assert_eq!(mat, first);
    }

    #[test]
    fn test_sequence_timing_survives_regeneration() {
        let mut fx = Fixture::new();
        let mut frame = Image::new("water_still0001.png", "/virtual/water_still/water_still0001.png", 16, 16);
        frame.source = ImageSource::Sequence;
        let seq = fx.images.insert(frame);
        let passes = PassMap::with_diffuse(seq);
        let mut mat = Material::new("water_still");
        fx.prep(&mut mat, &passes, &PrepOptions::default()).unwrap();

        let node = mat
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Diffuse))
            .unwrap();
        let user = ImageUser {
            frame_offset: 4,
            ..ImageUser::cycling(32)
        };
        mat.node_tree.set_image_user(node, Some(user)).unwrap();

        fx.prep(&mut mat, &passes, &PrepOptions::default()).unwrap();
        let node = mat
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Diffuse))
            .unwrap();
        assert_eq!(mat.node_tree.node(node).unwrap().image_user, Some(user));
    }

    #[test]
    fn test_water_is_transparent_and_reflective() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("water_still.png");
        let mut mat = Material::new("Stationary_Water");
        let summary = fx
            .prep(&mut mat, &PassMap::with_diffuse(diffuse), &PrepOptions::default())
            .unwrap();

        assert_eq!(summary.canonical, "water_still");
        assert!(summary.transparent);
        assert_eq!(mat.node_tree.count_kind(NodeKind::HueSaturation), 1);
        let boost = mat
            .node_tree
            .nodes_of_kind(NodeKind::Math)
            .next()
            .and_then(|id| mat.node_tree.node(id))
            .and_then(|n| n.float_input("Value_001"));
        assert_eq!(boost, Some(0.2));
    }

    #[test]
    fn test_reflections_disabled() {
        let mut fx = Fixture::new();
        let diffuse = fx.image("ice.png");
        let mut mat = Material::new("ice");
        let options = PrepOptions {
            use_reflections: false,
            ..PrepOptions::default()
        };
        fx.prep(&mut mat, &PassMap::with_diffuse(diffuse), &options).unwrap();
        let bsdf = mat.node_tree.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        let node = mat.node_tree.node(bsdf).unwrap();
        assert_eq!(node.float_input("Roughness"), Some(0.7));
        assert_eq!(node.float_input("Specular"), Some(0.0));
    }
}
