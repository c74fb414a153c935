//! Batch operations over many materials.
//!
//! Operators mirror the host's `FINISHED` / `CANCELLED` convention: a run
//! finishes when at least one material was modified and is cancelled when
//! none were or a precondition failed. Per-material problems are collected
//! in an [`OperatorReport`] instead of aborting the batch. Only catalog
//! failures escape as `Err`.

use crate::animate::animate_pass;
use crate::catalog::{Catalog, SemanticClass};
use crate::error::{PrepError, Result};
use crate::graph::Annotation;
use crate::material::{HostInfo, Material};
use crate::naming::canonicalize;
use crate::pass::{PassKind, PassMap};
use crate::prep::{extract_passes, prep_material, PrepContext, PrepOptions};
use crate::resolver::{find_additional_passes, TextureResolver};
use crate::resource_pack::{ImageCache, ImageId, ResourcePack};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// How serious a per-material problem is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn of(error: &PrepError) -> Self {
        match error {
            PrepError::ImageNotFound(_) => Severity::Info,
            PrepError::DiffuseMissing(_) | PrepError::TileRatioInvalid { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A problem with one material.
#[derive(Debug)]
pub struct MaterialFailure {
    pub material: String,
    pub severity: Severity,
    pub error: PrepError,
}

/// Tally of a batch run.
#[derive(Debug, Default)]
pub struct OperatorReport {
    /// Names of materials whose graph was regenerated, in processing order.
    pub modified: Vec<String>,
    pub failures: Vec<MaterialFailure>,
}

impl OperatorReport {
    fn record(&mut self, material: &str, error: PrepError) {
        let severity = Severity::of(&error);
        match severity {
            Severity::Info => info!(material, %error, "material skipped"),
            Severity::Warning => warn!(material, %error, "material issue"),
            Severity::Error => error!(material, %error, "material failed"),
        }
        self.failures.push(MaterialFailure {
            material: material.to_string(),
            severity,
            error,
        });
    }

    /// Failures recorded for `material`.
    pub fn failures_for<'a>(&'a self, material: &'a str) -> impl Iterator<Item = &'a MaterialFailure> {
        self.failures.iter().filter(move |f| f.material == material)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.failures.iter().filter(|f| f.severity == severity).count()
    }

    fn into_outcome(self) -> OperatorOutcome {
        if self.modified.is_empty() {
            let reason = match self.failures.first() {
                Some(first) => format!("No materials modified ({}: {})", first.material, first.error),
                None => "No materials modified".to_string(),
            };
            OperatorOutcome::Cancelled(reason)
        } else {
            OperatorOutcome::Finished(self)
        }
    }
}

/// Result of a batch operator.
#[derive(Debug)]
pub enum OperatorOutcome {
    Finished(OperatorReport),
    Cancelled(String),
}

impl OperatorOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, OperatorOutcome::Finished(_))
    }

    pub fn report(&self) -> Option<&OperatorReport> {
        match self {
            OperatorOutcome::Finished(report) => Some(report),
            OperatorOutcome::Cancelled(_) => None,
        }
    }

    /// The host-facing return code.
    pub fn status(&self) -> &'static str {
        match self {
            OperatorOutcome::Finished(_) => "FINISHED",
            OperatorOutcome::Cancelled(_) => "CANCELLED",
        }
    }
}

fn cancelled(reason: impl Into<String>) -> OperatorOutcome {
    let reason = reason.into();
    warn!(%reason, "operator cancelled");
    OperatorOutcome::Cancelled(reason)
}

/// Regenerate the graph of every material, in order.
///
/// Passes already bound in a material are reused. A material without a
/// diffuse image gets one from `options.resource_pack` when set.
pub fn prep_materials(
    catalog: &Catalog,
    images: &mut ImageCache,
    host: &HostInfo,
    materials: &mut [Material],
    options: &PrepOptions,
) -> Result<OperatorOutcome> {
    if !host.engine.is_supported() {
        return Ok(cancelled(format!("Unsupported render engine: {}", host.engine)));
    }
    catalog.load()?;
    let pack = match options.resource_pack.as_deref().map(ResourcePack::open).transpose() {
        Ok(pack) => pack,
        Err(e) => return Ok(cancelled(e.to_string())),
    };

    let session = Session {
        catalog,
        host,
        options,
    };
    let mut report = OperatorReport::default();
    for material in materials.iter_mut() {
        match session.prep_one(images, pack.as_ref(), material, &mut report) {
            Ok(()) => report.modified.push(material.name.clone()),
            Err(e) => report.record(&material.name, e),
        }
    }
    info!(
        modified = report.modified.len(),
        failed = report.failures.len(),
        "prep finished"
    );
    Ok(report.into_outcome())
}

/// Rebind every material to the textures of the pack at `pack_root` and
/// regenerate it.
///
/// Swapped materials are flagged `texture_swapped`, which lets the tint
/// overlay of grayscale blocks come on. Materials the pack has no image for
/// are left untouched.
pub fn swap_texture_pack(
    catalog: &Catalog,
    images: &mut ImageCache,
    host: &HostInfo,
    materials: &mut [Material],
    pack_root: &Path,
    options: &PrepOptions,
) -> Result<OperatorOutcome> {
    if !host.engine.is_supported() {
        return Ok(cancelled(format!("Unsupported render engine: {}", host.engine)));
    }
    catalog.load()?;
    let pack = match ResourcePack::open(pack_root) {
        Ok(pack) => pack,
        Err(e) => return Ok(cancelled(e.to_string())),
    };
    let resolver = TextureResolver::new(&pack, catalog);
    let session = Session {
        catalog,
        host,
        options,
    };

    let mut report = OperatorReport::default();
    for material in materials.iter_mut() {
        let canonical = canonicalize(catalog, &material.name).name;
        let Some(path) = resolver.resolve(&canonical) else {
            report.record(&material.name, PrepError::ImageNotFound(canonical));
            continue;
        };
        match session.swap_one(images, material, &path, &mut report) {
            Ok(()) => report.modified.push(material.name.clone()),
            Err(e) => report.record(&material.name, e),
        }
    }
    info!(
        pack = %pack.root().display(),
        modified = report.modified.len(),
        "texture swap finished"
    );
    Ok(report.into_outcome())
}

/// Shared state of one operator run.
struct Session<'a> {
    catalog: &'a Catalog,
    host: &'a HostInfo,
    options: &'a PrepOptions,
}

impl Session<'_> {
    fn prep_one(
        &self,
        images: &mut ImageCache,
        pack: Option<&ResourcePack>,
        material: &mut Material,
        report: &mut OperatorReport,
    ) -> Result<()> {
        let canonical = canonicalize(self.catalog, &material.name).name;
        let mut passes = extract_passes(material, images).images;

        if passes.diffuse.is_none() {
            if let Some(path) = pack.and_then(|p| TextureResolver::new(p, self.catalog).resolve(&canonical)) {
                passes.diffuse = Some(images.load(&path)?);
            }
        }
        let diffuse = passes
            .diffuse
            .ok_or_else(|| PrepError::DiffuseMissing(material.name.clone()))?;
        if self.options.use_extra_maps {
            load_sibling_passes(images, diffuse, &mut passes)?;
        }

        self.generate(images, material, &passes)?;
        self.animate(images, material, &canonical, report);
        Ok(())
    }

    fn swap_one(
        &self,
        images: &mut ImageCache,
        material: &mut Material,
        path: &Path,
        report: &mut OperatorReport,
    ) -> Result<()> {
        let canonical = canonicalize(self.catalog, &material.name).name;
        let diffuse = images.load(path)?;
        let mut passes = PassMap::with_diffuse(diffuse);
        if self.options.use_extra_maps {
            load_sibling_passes(images, diffuse, &mut passes)?;
        }

        let previously_swapped = material.texture_swapped;
        material.texture_swapped = true;
        if let Err(e) = self.generate(images, material, &passes) {
            material.texture_swapped = previously_swapped;
            return Err(e);
        }
        self.animate(images, material, &canonical, report);
        Ok(())
    }

    fn generate(&self, images: &ImageCache, material: &mut Material, passes: &PassMap<ImageId>) -> Result<()> {
        let ctx = PrepContext {
            catalog: self.catalog,
            images,
            host: self.host,
        };
        let summary = prep_material(material, passes, &ctx, self.options)?;
        debug!(
            material = %material.name,
            generator = ?summary.generator,
            transparent = summary.transparent,
            "material prepped"
        );
        Ok(())
    }

    /// Turn a tiled diffuse of an animated block into a sequence. Failures
    /// leave the still binding in place and are only reported.
    fn animate(&self, images: &mut ImageCache, material: &mut Material, canonical: &str, report: &mut OperatorReport) {
        if !self.options.animate_textures || !self.catalog.membership(canonical, SemanticClass::Animated) {
            return;
        }
        let graph = &material.node_tree;
        let Some(image) = graph
            .find_annotated(Annotation::Pass(PassKind::Diffuse))
            .and_then(|id| graph.node(id))
            .and_then(|node| node.image)
            .and_then(|id| images.get(id))
        else {
            return;
        };
        if image.is_sequence() || image.height <= image.width {
            return;
        }

        match animate_pass(
            material,
            PassKind::Diffuse,
            images,
            &self.options.export_location,
            self.options.clear_cache,
        ) {
            Ok(frames) => info!(material = %material.name, frames, "animated diffuse"),
            Err(e) => report.record(&material.name, e),
        }
    }
}

/// Load normal / specular / displacement images beside the diffuse into
/// empty pass slots.
fn load_sibling_passes(images: &mut ImageCache, diffuse: ImageId, passes: &mut PassMap<ImageId>) -> Result<()> {
    let diffuse_path = images.image(diffuse)?.filepath.clone();
    let found = find_additional_passes(&diffuse_path);
    for kind in [PassKind::Normal, PassKind::Specular, PassKind::Displace] {
        let (Some(path), None) = (found.get(kind), passes.get(kind)) else {
            continue;
        };
        match images.load(path) {
            Ok(id) => passes.set(kind, id),
            Err(e) => info!(path = %path.display(), pass = %kind, error = %e, "pass image unreadable"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::ExportLocation;
    use crate::graph::{NodeKind, Value};
    use crate::material::{BlendMethod, RenderEngine};
    use crate::naming::ExporterForm;
    use crate::prep::PackFormat;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const BLOCK_DIR: &str = "assets/minecraft/textures/block";

    fn png(path: &Path, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(width, height, Rgba(color)).save(path).unwrap();
        path.to_path_buf()
    }

    /// A pack holding 16x16 block textures with the given names.
    fn pack_with(blocks: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for block in blocks {
            png(
                &dir.path().join(BLOCK_DIR).join(format!("{}.png", block)),
                16,
                16,
                [120, 120, 120, 255],
            );
        }
        dir
    }

    fn run_prep(materials: &mut [Material], images: &mut ImageCache, options: &PrepOptions) -> OperatorOutcome {
        prep_materials(&Catalog::bundled(), images, &HostInfo::default(), materials, options).unwrap()
    }

    fn diffuse_image<'a>(mat: &Material, images: &'a ImageCache) -> &'a crate::resource_pack::Image {
        let graph = &mat.node_tree;
        let id = graph.find_annotated(Annotation::Pass(PassKind::Diffuse)).unwrap();
        images.get(graph.node(id).unwrap().image.unwrap()).unwrap()
    }

    #[test]
    fn test_s1_grass_with_duplicate_suffix() {
        let pack = pack_with(&["grass_block_top"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("grass_block_top.003")];
        let options = PrepOptions::default().with_resource_pack(pack.path());

        let outcome = run_prep(&mut materials, &mut images, &options);
        assert!(outcome.is_finished());

        let canon = canonicalize(&Catalog::bundled(), "grass_block_top.003");
        assert_eq!(canon.name, "grass_block_top");
        assert_eq!(canon.form, Some(ExporterForm::Jmc2obj));

        let mat = &materials[0];
        assert!(diffuse_image(mat, &images)
            .filepath
            .ends_with("block/grass_block_top.png"));
        let saturate = mat.node_tree.find_annotated(Annotation::Saturate).unwrap();
        assert!(mat.node_tree.node(saturate).unwrap().mute);
        assert_eq!(mat.blend_method, BlendMethod::Opaque);
    }

    #[test]
    fn test_s2_glass_is_reflective() {
        let pack = pack_with(&["glass"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("glass")];
        let options = PrepOptions::default().with_resource_pack(pack.path());
        run_prep(&mut materials, &mut images, &options);

        let graph = &materials[0].node_tree;
        let bsdf = graph.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        let bsdf = graph.node(bsdf).unwrap();
        assert_eq!(bsdf.float_input("Specular"), Some(0.5));
        assert_eq!(bsdf.float_input("Roughness"), Some(0.0));
        let add = graph.nodes_of_kind(NodeKind::Math).next().unwrap();
        assert_eq!(graph.node(add).unwrap().float_input("Value_001"), Some(0.2));
        assert_eq!(materials[0].blend_method, BlendMethod::Hashed);
    }

    #[test]
    fn test_s3_glowstone_emits() {
        let pack = pack_with(&["glowstone"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("glowstone")];
        let options = PrepOptions::default().with_resource_pack(pack.path());
        run_prep(&mut materials, &mut images, &options);

        let graph = &materials[0].node_tree;
        let output = graph.output_node().unwrap();
        let upstream = graph.upstream(output);
        let kinds: Vec<NodeKind> = upstream.iter().map(|id| graph.node(*id).unwrap().kind).collect();
        assert!(kinds.contains(&NodeKind::Emission));
        assert!(kinds.contains(&NodeKind::LightPath));
        assert!(kinds.contains(&NodeKind::LightFalloff));
        assert!(!kinds.contains(&NodeKind::BsdfPrincipled));
        assert_eq!(graph.count_kind(NodeKind::BsdfTransparent), 0);
    }

    #[test]
    fn test_s4_water_is_animated() {
        let pack = TempDir::new().unwrap();
        png(&pack.path().join(BLOCK_DIR).join("water_still.png"), 16, 512, [90, 90, 90, 200]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("water")];
        let options = PrepOptions::default()
            .with_resource_pack(pack.path())
            .with_animation(true);

        let outcome = run_prep(&mut materials, &mut images, &options);
        assert!(outcome.report().unwrap().failures.is_empty());

        let frames_dir = pack.path().join(BLOCK_DIR).join("water_still");
        assert_eq!(std::fs::read_dir(&frames_dir).unwrap().count(), 32);
        assert!(frames_dir.join("water_still0031.png").is_file());

        let mat = &materials[0];
        assert!(diffuse_image(mat, &images).is_sequence());
        let diffuse = mat.node_tree.find_annotated(Annotation::Pass(PassKind::Diffuse)).unwrap();
        let user = mat.node_tree.node(diffuse).unwrap().image_user.unwrap();
        assert_eq!(user.frame_duration, 32);
        assert!(user.use_cyclic);

        let bsdf = mat.node_tree.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        let hsv = mat.node_tree.input_node(bsdf, "Base Color").unwrap();
        assert_eq!(mat.node_tree.node(hsv).unwrap().kind, NodeKind::HueSaturation);
    }

    #[test]
    fn test_s4_reprep_keeps_sequence_timing() {
        let pack = TempDir::new().unwrap();
        png(&pack.path().join(BLOCK_DIR).join("lava_still.png"), 16, 64, [200, 80, 10, 255]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("lava_still")];
        let options = PrepOptions::default()
            .with_resource_pack(pack.path())
            .with_animation(true);
        run_prep(&mut materials, &mut images, &options);

        let diffuse = materials[0]
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Diffuse))
            .unwrap();
        let mut user = materials[0].node_tree.node(diffuse).unwrap().image_user.unwrap();
        user.frame_offset = 3;
        materials[0].node_tree.set_image_user(diffuse, Some(user)).unwrap();

        run_prep(&mut materials, &mut images, &options);
        let diffuse = materials[0]
            .node_tree
            .find_annotated(Annotation::Pass(PassKind::Diffuse))
            .unwrap();
        let after = materials[0].node_tree.node(diffuse).unwrap().image_user.unwrap();
        assert_eq!(after.frame_duration, 4);
        assert_eq!(after.frame_offset, 3);
        assert_eq!(after.frame_start, 1);
    }

    #[test]
    fn test_s5_specular_pack_with_extra_maps() {
        let pack = pack_with(&["redstone_block", "redstone_block_n", "redstone_block_s"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("redstone_block")];
        let options = PrepOptions::default()
            .with_resource_pack(pack.path())
            .with_extra_maps(true)
            .with_pack_format(PackFormat::Specular);
        run_prep(&mut materials, &mut images, &options);

        let mat = &materials[0];
        let graph = &mat.node_tree;
        let bound: Vec<_> = graph
            .nodes_of_kind(NodeKind::TexImage)
            .filter(|id| graph.node(*id).unwrap().image.is_some())
            .collect();
        assert_eq!(bound.len(), 3);

        let bsdf = graph.nodes_of_kind(NodeKind::BsdfPrincipled).next().unwrap();
        let normal_map = graph.input_node(bsdf, "Normal").unwrap();
        assert_eq!(graph.node(normal_map).unwrap().kind, NodeKind::NormalMap);
        assert!(!graph.node(normal_map).unwrap().mute);
        let invert = graph.input_node(bsdf, "Specular Tint").unwrap();
        assert_eq!(graph.node(invert).unwrap().kind, NodeKind::Invert);

        for kind in [PassKind::Normal, PassKind::Specular] {
            let id = graph.find_annotated(Annotation::Pass(kind)).unwrap();
            assert!(!graph.node(id).unwrap().mute);
        }
        for kind in PassKind::ALL {
            assert_eq!(graph.annotated(Annotation::Pass(kind)).count(), 1);
        }

        // Binding survives a read back.
        let extracted = extract_passes(mat, &images).images;
        assert!(images.get(extracted.normal.unwrap()).unwrap().filepath.ends_with("redstone_block_n.png"));
        assert!(images.get(extracted.specular.unwrap()).unwrap().filepath.ends_with("redstone_block_s.png"));
        assert_eq!(extracted.displace, None);
    }

    #[test]
    fn test_s6_missing_texture_is_skipped() {
        let pack = pack_with(&["stone"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("oak_leaves"), Material::new("stone")];
        let untouched = materials[0].clone();
        let options = PrepOptions::default().with_resource_pack(pack.path());

        let outcome = run_prep(&mut materials, &mut images, &options);
        let report = outcome.report().unwrap();
        assert_eq!(report.modified, vec!["stone".to_string()]);
        let failure = report.failures_for("oak_leaves").next().unwrap();
        assert_eq!(failure.severity, Severity::Warning);
        assert!(matches!(failure.error, PrepError::DiffuseMissing(_)));
        assert_eq!(materials[0], untouched);
    }

    #[test]
    fn test_nothing_modified_is_cancelled() {
        let pack = pack_with(&[]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("oak_leaves")];
        let options = PrepOptions::default().with_resource_pack(pack.path());

        let outcome = run_prep(&mut materials, &mut images, &options);
        assert_eq!(outcome.status(), "CANCELLED");
    }

    #[test]
    fn test_unsupported_engine_cancels() {
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("stone")];
        let host = HostInfo::new(RenderEngine::from_id("BLENDER_WORKBENCH"));
        let outcome = prep_materials(
            &Catalog::bundled(),
            &mut images,
            &host,
            &mut materials,
            &PrepOptions::default(),
        )
        .unwrap();
        assert!(matches!(outcome, OperatorOutcome::Cancelled(reason) if reason.contains("BLENDER_WORKBENCH")));
    }

    #[test]
    fn test_invalid_pack_cancels() {
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("stone")];
        let options = PrepOptions::default().with_resource_pack("/definitely/not/a/pack");
        assert!(!run_prep(&mut materials, &mut images, &options).is_finished());
    }

    #[test]
    fn test_broken_catalog_is_fatal() {
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("stone")];
        let catalog = Catalog::from_json("{ not json");
        let result = prep_materials(
            &catalog,
            &mut images,
            &HostInfo::default(),
            &mut materials,
            &PrepOptions::default(),
        );
        assert!(matches!(result, Err(PrepError::CatalogMissing(_))));
    }

    #[test]
    fn test_tile_ratio_warning_keeps_static_binding() {
        let pack = TempDir::new().unwrap();
        png(&pack.path().join(BLOCK_DIR).join("magma_block.png"), 16, 40, [200, 60, 0, 255]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("magma_block")];
        let options = PrepOptions::default()
            .with_resource_pack(pack.path())
            .with_animation(true);

        let outcome = run_prep(&mut materials, &mut images, &options);
        let report = outcome.report().unwrap();
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(!diffuse_image(&materials[0], &images).is_sequence());
    }

    #[test]
    fn test_unwritable_sequence_target_keeps_still() {
        let pack = TempDir::new().unwrap();
        png(&pack.path().join(BLOCK_DIR).join("water_still.png"), 16, 64, [90, 90, 90, 200]);
        let blocker = pack.path().join("not_a_directory");
        std::fs::write(&blocker, b"file").unwrap();

        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("water")];
        let options = PrepOptions::default()
            .with_resource_pack(pack.path())
            .with_animation(true)
            .with_export_location(ExportLocation::Directory(blocker));

        let outcome = run_prep(&mut materials, &mut images, &options);
        let report = outcome.report().unwrap();
        assert_eq!(report.modified, vec!["water".to_string()]);
        let failure = report.failures_for("water").next().unwrap();
        assert_eq!(failure.severity, Severity::Error);
        assert!(matches!(failure.error, PrepError::UnwritablePath { .. }));

        let diffuse = diffuse_image(&materials[0], &images);
        assert!(!diffuse.is_sequence());
        assert!(diffuse.filepath.ends_with("block/water_still.png"));
    }

    #[test]
    fn test_swap_enables_tint_for_grayscale_pack() {
        let original = TempDir::new().unwrap();
        png(&original.path().join(BLOCK_DIR).join("grass_block_top.png"), 16, 16, [70, 180, 50, 255]);
        let swapped = pack_with(&["grass_block_top"]);

        let catalog = Catalog::bundled();
        let host = HostInfo::default();
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("grass_block_top")];
        let options = PrepOptions::default().with_resource_pack(original.path());
        run_prep(&mut materials, &mut images, &options);

        let outcome = swap_texture_pack(
            &catalog,
            &mut images,
            &host,
            &mut materials,
            swapped.path(),
            &PrepOptions::default(),
        )
        .unwrap();
        assert!(outcome.is_finished());

        let mat = &materials[0];
        assert!(mat.texture_swapped);
        assert!(diffuse_image(mat, &images).filepath.starts_with(swapped.path()));
        let saturate = mat.node_tree.find_annotated(Annotation::Saturate).unwrap();
        let node = mat.node_tree.node(saturate).unwrap();
        assert!(!node.mute);
        assert_eq!(node.input("Color2"), Some(Value::Color([0.56, 0.74, 0.35, 1.0])));
    }

    #[test]
    fn test_swap_skips_blocks_missing_from_pack() {
        let swapped = pack_with(&["stone"]);
        let mut images = ImageCache::new();
        let mut materials = vec![Material::new("glass")];
        let outcome = swap_texture_pack(
            &Catalog::bundled(),
            &mut images,
            &HostInfo::default(),
            &mut materials,
            swapped.path(),
            &PrepOptions::default(),
        )
        .unwrap();

        assert!(!outcome.is_finished());
        assert!(!materials[0].texture_swapped);
        assert!(!materials[0].use_nodes);
    }
}
