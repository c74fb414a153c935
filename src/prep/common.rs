//! Node building blocks shared by the generators.

use crate::error::Result;
use crate::graph::{Annotation, NodeId, NodeKind, ShaderGraph, Value};
use crate::pass::PassKind;
use crate::resource_pack::ImageId;

/// Alpha boost added to reflective transparent materials.
pub(super) const REFLECTIVE_ALPHA_BOOST: f32 = 0.2;

/// Column positions for a left-to-right layout.
pub(super) const COL_TEXTURE: f32 = -600.0;
pub(super) const COL_FILTER: f32 = -300.0;
pub(super) const COL_SHADER: f32 = 0.0;
pub(super) const COL_MIX: f32 = 300.0;
pub(super) const COL_OUTPUT: f32 = 600.0;

/// Add an annotated image node for `kind`, bound to `image`.
///
/// Diffuse and specular sample with nearest-neighbour filtering so pixel
/// art stays crisp. Everything but diffuse is non-colour data. The node is
/// muted when no image is given.
pub(super) fn pass_texture(
    graph: &mut ShaderGraph,
    kind: PassKind,
    image: Option<ImageId>,
    location: [f32; 2],
) -> Result<NodeId> {
    let node = graph.add_node(NodeKind::TexImage, location);
    graph.annotate(node, Annotation::Pass(kind));
    graph.set_label(node, &format!("{} pass", kind))?;
    graph.set_image(node, image)?;

    let interpolation = match kind {
        PassKind::Diffuse | PassKind::Specular => "Closest",
        PassKind::Normal | PassKind::Displace => "Linear",
    };
    graph.set_property(node, "interpolation", Value::Enum(interpolation))?;
    let color_space = match kind {
        PassKind::Diffuse => "sRGB",
        _ => "Non-Color",
    };
    graph.set_property(node, "colorspace", Value::Enum(color_space))?;
    graph.set_mute(node, image.is_none())?;
    Ok(node)
}

/// Normal map helper fed by `texture`, linked into every `targets` `Normal`
/// input when the pass is present, muted otherwise.
pub(super) fn normal_branch(
    graph: &mut ShaderGraph,
    texture: NodeId,
    present: bool,
    targets: &[NodeId],
) -> Result<NodeId> {
    let normal_map = graph.add_node(NodeKind::NormalMap, [COL_FILTER, -600.0]);
    graph.set_input(normal_map, "Strength", Value::Float(1.0))?;
    if present {
        graph.link(texture, "Color", normal_map, "Color")?;
        for target in targets {
            graph.link(normal_map, "Normal", *target, "Normal")?;
        }
    } else {
        graph.set_mute(normal_map, true)?;
    }
    Ok(normal_map)
}

/// Displacement helper fed by `texture` into the output's displacement.
pub(super) fn displacement_branch(
    graph: &mut ShaderGraph,
    texture: NodeId,
    present: bool,
    output: NodeId,
) -> Result<NodeId> {
    let displacement = graph.add_node(NodeKind::Displacement, [COL_MIX, -600.0]);
    graph.set_input(displacement, "Midlevel", Value::Float(0.5))?;
    graph.set_input(displacement, "Scale", Value::Float(0.1))?;
    if present {
        graph.link(texture, "Color", displacement, "Height")?;
        graph.link(displacement, "Displacement", output, "Displacement")?;
    } else {
        graph.set_mute(displacement, true)?;
    }
    Ok(displacement)
}

/// Mix `shader` with a transparent BSDF using the diffuse alpha.
///
/// The alpha passes through a clamped add so reflective blocks keep a
/// little opacity. Returns the outer mix node.
pub(super) fn transparency_mix(
    graph: &mut ShaderGraph,
    diffuse: NodeId,
    shader: NodeId,
    alpha_boost: f32,
) -> Result<NodeId> {
    let transparent = graph.add_node(NodeKind::BsdfTransparent, [COL_SHADER, 300.0]);
    let add = graph.add_node(NodeKind::Math, [COL_FILTER, 300.0]);
    graph.set_property(add, "operation", Value::Enum("ADD"))?;
    graph.set_property(add, "use_clamp", Value::Bool(true))?;
    graph.set_input(add, "Value_001", Value::Float(alpha_boost))?;
    graph.link(diffuse, "Alpha", add, "Value")?;

    let mix = graph.add_node(NodeKind::MixShader, [COL_MIX + 150.0, 0.0]);
    graph.link(add, "Value", mix, "Fac")?;
    graph.link(transparent, "BSDF", mix, "Shader")?;
    link_shader(graph, shader, mix, "Shader_001")?;
    Ok(mix)
}

/// Link the closure output of `shader` into `to.socket`.
pub(super) fn link_shader(
    graph: &mut ShaderGraph,
    shader: NodeId,
    to: NodeId,
    socket: &'static str,
) -> Result<()> {
    let from_socket = graph
        .node(shader)
        .and_then(|n| n.kind.output_sockets().first().copied())
        .unwrap_or("BSDF");
    graph.link(shader, from_socket, to, socket)
}

/// Hook `shader` to the output, through a transparency mix unless solid.
/// Returns whether the material is transparent.
pub(super) fn finish_surface(
    graph: &mut ShaderGraph,
    diffuse: NodeId,
    shader: NodeId,
    output: NodeId,
    solid: bool,
    alpha_boost: f32,
) -> Result<bool> {
    if solid {
        link_shader(graph, shader, output, "Surface")?;
        Ok(false)
    } else {
        let mix = transparency_mix(graph, diffuse, shader, alpha_boost)?;
        graph.link(mix, "Shader", output, "Surface")?;
        Ok(true)
    }
}
