//! Principled BSDF generator.

use super::common::{
    displacement_branch, finish_surface, normal_branch, pass_texture, COL_FILTER, COL_OUTPUT,
    COL_SHADER, COL_TEXTURE, REFLECTIVE_ALPHA_BOOST,
};
use super::desaturate::add_saturate_mix;
use super::{BlockTraits, Generated, PackFormat, PrepOptions};
use crate::error::Result;
use crate::graph::{NodeId, NodeKind, ShaderGraph, Value};
use crate::pass::{PassKind, PassMap};
use crate::resource_pack::ImageId;

pub(super) fn build(
    graph: &mut ShaderGraph,
    passes: &PassMap<ImageId>,
    traits: &BlockTraits,
    options: &PrepOptions,
) -> Result<Generated> {
    let output = graph.add_node(NodeKind::OutputMaterial, [COL_OUTPUT + 300.0, 0.0]);
    let principled = graph.add_node(NodeKind::BsdfPrincipled, [COL_SHADER, 0.0]);

    let diffuse = pass_texture(graph, PassKind::Diffuse, passes.diffuse, [COL_TEXTURE, 0.0])?;
    let saturate = add_saturate_mix(graph, traits.desaturated_color, [COL_FILTER, 0.0])?;
    graph.link(diffuse, "Color", saturate, "Color1")?;

    let base_color = if traits.water {
        let hsv = graph.add_node(NodeKind::HueSaturation, [COL_FILTER, 150.0]);
        graph.set_input(hsv, "Hue", Value::Float(0.5))?;
        graph.set_input(hsv, "Saturation", Value::Float(1.0))?;
        graph.set_input(hsv, "Value", Value::Float(1.0))?;
        graph.set_input(hsv, "Fac", Value::Float(1.0))?;
        graph.link(saturate, "Color", hsv, "Color")?;
        hsv
    } else {
        saturate
    };
    graph.link(base_color, "Color", principled, "Base Color")?;

    set_surface_values(graph, principled, traits)?;

    if traits.emit {
        graph.link(base_color, "Color", principled, "Emission")?;
        graph.set_input(principled, "Emission Strength", Value::Float(1.0))?;
    }

    let specular = pass_texture(graph, PassKind::Specular, passes.specular, [COL_TEXTURE, -300.0])?;
    specular_branch(graph, specular, passes.specular.is_some(), principled, options.pack_format)?;

    let normal = pass_texture(graph, PassKind::Normal, passes.normal, [COL_TEXTURE, -600.0])?;
    normal_branch(graph, normal, passes.normal.is_some(), &[principled])?;

    let displace = pass_texture(graph, PassKind::Displace, passes.displace, [COL_TEXTURE, -900.0])?;
    displacement_branch(graph, displace, passes.displace.is_some(), output)?;

    let alpha_boost = if traits.reflective { REFLECTIVE_ALPHA_BOOST } else { 0.0 };
    let transparent = finish_surface(graph, diffuse, principled, output, traits.solid, alpha_boost)?;
    Ok(Generated { transparent })
}

fn set_surface_values(graph: &mut ShaderGraph, principled: NodeId, traits: &BlockTraits) -> Result<()> {
    let (specular, mut roughness) = if traits.reflective { (0.5, 0.0) } else { (0.0, 0.7) };
    if traits.water {
        roughness = 0.0;
    }
    let metallic = if traits.metallic {
        roughness = f32::max(roughness, 0.2);
        1.0
    } else {
        0.0
    };

    graph.set_input(principled, "Specular", Value::Float(specular))?;
    graph.set_input(principled, "Roughness", Value::Float(roughness))?;
    graph.set_input(principled, "Metallic", Value::Float(metallic))?;
    graph.set_input(principled, "IOR", Value::Float(1.45))?;
    Ok(())
}

/// Wire the specular texture according to the pack's convention.
///
/// Plain specular packs drive specular tint through an invert. SEUS packs
/// store smoothness in red and metalness in green.
fn specular_branch(
    graph: &mut ShaderGraph,
    texture: NodeId,
    present: bool,
    principled: NodeId,
    format: PackFormat,
) -> Result<()> {
    let invert = graph.add_node(NodeKind::Invert, [COL_FILTER, -300.0]);
    graph.set_input(invert, "Fac", Value::Float(1.0))?;

    if format == PackFormat::Seus {
        let separate = graph.add_node(NodeKind::SeparateRgb, [COL_FILTER - 150.0, -300.0]);
        if present {
            graph.link(texture, "Color", separate, "Image")?;
            graph.link(separate, "R", invert, "Color")?;
            graph.link(invert, "Color", principled, "Roughness")?;
            graph.link(separate, "G", principled, "Metallic")?;
        } else {
            graph.set_mute(separate, true)?;
            graph.set_mute(invert, true)?;
        }
    } else if present {
        graph.link(texture, "Color", invert, "Color")?;
        graph.link(invert, "Color", principled, "Specular Tint")?;
    } else {
        graph.set_mute(invert, true)?;
    }
    Ok(())
}
