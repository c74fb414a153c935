//! Reading pass bindings back out of an existing material.

use crate::graph::{Annotation, ImageUser, NodeKind, ShaderGraph};
use crate::material::Material;
use crate::pass::{PassKind, PassMap};
use crate::resource_pack::{ImageCache, ImageId};
use serde::Serialize;

/// Sequence timing kept across graph regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimationSettings {
    pub frame_duration: u32,
    pub frame_start: i32,
    pub frame_offset: i32,
}

impl From<ImageUser> for AnimationSettings {
    fn from(user: ImageUser) -> Self {
        Self {
            frame_duration: user.frame_duration,
            frame_start: user.frame_start,
            frame_offset: user.frame_offset,
        }
    }
}

impl AnimationSettings {
    /// Playback settings for a regenerated node.
    pub fn to_image_user(self) -> ImageUser {
        ImageUser {
            frame_duration: self.frame_duration,
            frame_start: self.frame_start,
            frame_offset: self.frame_offset,
            use_cyclic: true,
            use_auto_refresh: true,
        }
    }
}

/// Pass images bound in a material, plus sequence timing per pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPasses {
    pub images: PassMap<ImageId>,
    pub animation: PassMap<AnimationSettings>,
}

/// Extract the images bound to each pass of a material.
///
/// Annotated image nodes are read first; an unannotated image node then
/// fills the diffuse slot if it is still empty. Materials without a node
/// graph have no bindings.
pub fn extract_passes(material: &Material, images: &ImageCache) -> ExtractedPasses {
    let mut extracted = ExtractedPasses::default();
    if !material.use_nodes {
        return extracted;
    }
    let graph = &material.node_tree;

    for kind in PassKind::ALL {
        let Some(node) = graph
            .find_annotated(Annotation::Pass(kind))
            .and_then(|id| graph.node(id))
        else {
            continue;
        };
        if let Some(image) = node.image {
            extracted.images.set(kind, image);
        }
    }
    extracted.animation = capture_animation(graph, images);

    if extracted.images.diffuse.is_none() {
        extracted.images.diffuse = graph
            .nodes_of_kind(NodeKind::TexImage)
            .filter(|id| graph.annotation(*id).is_none())
            .find_map(|id| graph.node(id).and_then(|n| n.image));
    }

    extracted
}

/// Sequence timing of every annotated node bound to an image sequence.
pub fn capture_animation(graph: &ShaderGraph, images: &ImageCache) -> PassMap<AnimationSettings> {
    let mut animation = PassMap::new();
    for kind in PassKind::ALL {
        let Some(node) = graph
            .find_annotated(Annotation::Pass(kind))
            .and_then(|id| graph.node(id))
        else {
            continue;
        };
        let is_sequence = node
            .image
            .and_then(|id| images.get(id))
            .map_or(false, |image| image.is_sequence());
        if let (true, Some(user)) = (is_sequence, node.image_user) {
            animation.set(kind, AnimationSettings::from(user));
        }
    }
    animation
}
