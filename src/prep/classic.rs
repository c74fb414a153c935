//! Diffuse + glossy generator for hosts without a principled BSDF.

use super::common::{
    displacement_branch, finish_surface, normal_branch, pass_texture, COL_FILTER, COL_MIX,
    COL_OUTPUT, COL_SHADER, COL_TEXTURE, REFLECTIVE_ALPHA_BOOST,
};
use super::desaturate::add_saturate_mix;
use super::{BlockTraits, Generated};
use crate::error::Result;
use crate::graph::{NodeKind, ShaderGraph, Value};
use crate::pass::{PassKind, PassMap};
use crate::resource_pack::ImageId;

pub(super) fn build(
    graph: &mut ShaderGraph,
    passes: &PassMap<ImageId>,
    traits: &BlockTraits,
) -> Result<Generated> {
    let output = graph.add_node(NodeKind::OutputMaterial, [COL_OUTPUT + 300.0, 0.0]);
    let diffuse_bsdf = graph.add_node(NodeKind::BsdfDiffuse, [COL_SHADER, 100.0]);
    let glossy = graph.add_node(NodeKind::BsdfGlossy, [COL_SHADER, -100.0]);
    let reflect_mix = graph.add_node(NodeKind::MixShader, [COL_MIX, 0.0]);

    let diffuse = pass_texture(graph, PassKind::Diffuse, passes.diffuse, [COL_TEXTURE, 0.0])?;
    let saturate = add_saturate_mix(graph, traits.desaturated_color, [COL_FILTER, 0.0])?;
    graph.link(diffuse, "Color", saturate, "Color1")?;
    graph.link(saturate, "Color", diffuse_bsdf, "Color")?;
    graph.set_input(diffuse_bsdf, "Roughness", Value::Float(0.0))?;

    let specular = pass_texture(graph, PassKind::Specular, passes.specular, [COL_TEXTURE, -300.0])?;
    if passes.specular.is_some() {
        graph.link(specular, "Color", glossy, "Color")?;
    }
    let glossy_roughness = match (traits.reflective, traits.metallic) {
        (_, true) => 0.2,
        (true, false) => 0.0,
        (false, false) => 0.5,
    };
    graph.set_input(glossy, "Roughness", Value::Float(glossy_roughness))?;
    graph.set_mute(glossy, !(traits.reflective || traits.metallic))?;

    let reflect_fac = if traits.reflective { 0.3 } else { 0.0 };
    graph.set_input(reflect_mix, "Fac", Value::Float(reflect_fac))?;
    graph.link(diffuse_bsdf, "BSDF", reflect_mix, "Shader")?;
    graph.link(glossy, "BSDF", reflect_mix, "Shader_001")?;

    let normal = pass_texture(graph, PassKind::Normal, passes.normal, [COL_TEXTURE, -600.0])?;
    normal_branch(graph, normal, passes.normal.is_some(), &[diffuse_bsdf, glossy])?;

    let displace = pass_texture(graph, PassKind::Displace, passes.displace, [COL_TEXTURE, -900.0])?;
    displacement_branch(graph, displace, passes.displace.is_some(), output)?;

    let alpha_boost = if traits.reflective { REFLECTIVE_ALPHA_BOOST } else { 0.0 };
    let transparent = finish_surface(graph, diffuse, reflect_mix, output, traits.solid, alpha_boost)?;
    Ok(Generated { transparent })
}
