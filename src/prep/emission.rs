//! Emission generator for light-emitting blocks.
//!
//! Camera rays see the texture at unit strength; every other ray sees an
//! emission scaled by a quadratic light falloff so the block lights its
//! surroundings without blowing out.

use super::common::{
    finish_surface, pass_texture, COL_FILTER, COL_MIX, COL_OUTPUT, COL_SHADER, COL_TEXTURE,
};
use super::desaturate::add_saturate_mix;
use super::{BlockTraits, Generated};
use crate::error::Result;
use crate::graph::{NodeKind, ShaderGraph, Value};
use crate::pass::{PassKind, PassMap};
use crate::resource_pack::ImageId;

const FALLOFF_STRENGTH: f32 = 30.0;
const FALLOFF_SMOOTH: f32 = 0.03;

pub(super) fn build(
    graph: &mut ShaderGraph,
    passes: &PassMap<ImageId>,
    traits: &BlockTraits,
) -> Result<Generated> {
    let output = graph.add_node(NodeKind::OutputMaterial, [COL_OUTPUT + 300.0, 0.0]);
    let diffuse = pass_texture(graph, PassKind::Diffuse, passes.diffuse, [COL_TEXTURE, 0.0])?;
    let saturate = add_saturate_mix(graph, traits.desaturated_color, [COL_FILTER, 0.0])?;
    graph.link(diffuse, "Color", saturate, "Color1")?;

    let light_path = graph.add_node(NodeKind::LightPath, [COL_FILTER, 400.0]);
    let falloff = graph.add_node(NodeKind::LightFalloff, [COL_FILTER, -300.0]);
    graph.set_input(falloff, "Strength", Value::Float(FALLOFF_STRENGTH))?;
    graph.set_input(falloff, "Smooth", Value::Float(FALLOFF_SMOOTH))?;

    let shaded = graph.add_node(NodeKind::Emission, [COL_SHADER, -100.0]);
    graph.link(saturate, "Color", shaded, "Color")?;
    graph.link(falloff, "Quadratic", shaded, "Strength")?;

    let visible = graph.add_node(NodeKind::Emission, [COL_SHADER, 100.0]);
    graph.link(saturate, "Color", visible, "Color")?;
    graph.set_input(visible, "Strength", Value::Float(1.0))?;

    let mix = graph.add_node(NodeKind::MixShader, [COL_MIX, 0.0]);
    graph.link(light_path, "Is Camera Ray", mix, "Fac")?;
    graph.link(shaded, "Emission", mix, "Shader")?;
    graph.link(visible, "Emission", mix, "Shader_001")?;

    // Auxiliary passes stay bound for later edits but do not feed emission.
    for (row, kind) in [PassKind::Normal, PassKind::Specular, PassKind::Displace]
        .into_iter()
        .enumerate()
    {
        let location = [COL_TEXTURE, -300.0 * (row as f32 + 1.0)];
        let node = pass_texture(graph, kind, passes.get(kind).copied(), location)?;
        graph.set_mute(node, true)?;
    }

    let transparent = if traits.solid {
        finish_surface(graph, diffuse, mix, output, true, 0.0)?
    } else {
        let transparent = graph.add_node(NodeKind::BsdfTransparent, [COL_MIX, 300.0]);
        let outer = graph.add_node(NodeKind::MixShader, [COL_MIX + 150.0, 0.0]);
        graph.link(diffuse, "Alpha", outer, "Fac")?;
        graph.link(transparent, "BSDF", outer, "Shader")?;
        graph.link(mix, "Shader", outer, "Shader_001")?;
        graph.link(outer, "Shader", output, "Surface")?;
        true
    };
    Ok(Generated { transparent })
}
