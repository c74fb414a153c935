//! Tint overlay for blocks whose vanilla textures ship grayscale.
//!
//! Grass, leaves and similar blocks are tinted at runtime by the game. The
//! generators insert an overlay mix after the diffuse image, annotated
//! `SATURATE`, which stays muted unless the current diffuse is actually
//! grayscale and came from a swapped resource pack.

use super::BlockTraits;
use crate::catalog::{Catalog, SemanticClass};
use crate::error::Result;
use crate::graph::{Annotation, NodeId, NodeKind, ShaderGraph, Value};
use crate::material::Material;
use crate::naming::canonicalize;
use crate::pass::PassKind;
use crate::resource_pack::{is_image_grayscale, ImageCache};
use tracing::debug;

const NEUTRAL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Add the muted overlay mix. `Color1` is left for the diffuse link.
pub(super) fn add_saturate_mix(
    graph: &mut ShaderGraph,
    color: Option<[f32; 4]>,
    location: [f32; 2],
) -> Result<NodeId> {
    let mix = graph.add_node(NodeKind::MixRgb, location);
    graph.annotate(mix, Annotation::Saturate);
    graph.set_label(mix, "Add Color")?;
    graph.set_property(mix, "blend_type", Value::Enum("OVERLAY"))?;
    graph.set_input(mix, "Fac", Value::Float(1.0))?;
    graph.set_input(mix, "Color2", Value::Color(color.unwrap_or(NEUTRAL)))?;
    graph.set_mute(mix, true)?;
    Ok(mix)
}

/// Refresh the overlay of an already generated material.
///
/// Returns whether the overlay ended up active. Materials without an
/// overlay node are left alone.
pub fn set_saturation(material: &mut Material, catalog: &Catalog, images: &ImageCache) -> Result<bool> {
    let canonical = canonicalize(catalog, &material.name).name;
    let desaturated = catalog.membership(&canonical, SemanticClass::Desaturated);
    let traits = BlockTraits {
        desaturated,
        desaturated_color: if desaturated {
            catalog.desaturated_color(&canonical)
        } else {
            None
        },
        canonical,
        ..BlockTraits::default()
    };
    update_saturation(material, &traits, images)
}

pub(super) fn update_saturation(
    material: &mut Material,
    traits: &BlockTraits,
    images: &ImageCache,
) -> Result<bool> {
    let Some(mix) = material.node_tree.find_annotated(Annotation::Saturate) else {
        return Ok(false);
    };

    let active = match (traits.desaturated, traits.desaturated_color) {
        (true, Some(color)) => {
            material
                .node_tree
                .set_input(mix, "Color2", Value::Color(color))?;
            material.texture_swapped && diffuse_is_grayscale(material, images)
        }
        _ => false,
    };

    material.node_tree.set_mute(mix, !active)?;
    if active {
        debug!(material = %material.name, "tint overlay enabled");
    }
    Ok(active)
}

/// Whether the bound diffuse image is grayscale. Unreadable images count as
/// grayscale, the common case for vanilla-style packs.
fn diffuse_is_grayscale(material: &Material, images: &ImageCache) -> bool {
    let graph = &material.node_tree;
    let Some(image) = graph
        .find_annotated(Annotation::Pass(PassKind::Diffuse))
        .and_then(|id| graph.node(id))
        .and_then(|node| node.image)
        .and_then(|id| images.get(id))
    else {
        return true;
    };

    match is_image_grayscale(&image.filepath) {
        Ok(grayscale) => grayscale,
        Err(e) => {
            debug!(path = %image.filepath.display(), error = %e, "grayscale probe failed");
            true
        }
    }
}
