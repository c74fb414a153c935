//! Shader node type table.
//!
//! Socket names follow the host's socket identifiers so a generated graph
//! can be replayed onto a real node tree one-to-one.

use serde::Serialize;

/// Every node type the generators emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    TexImage,
    BsdfPrincipled,
    BsdfDiffuse,
    BsdfGlossy,
    BsdfTransparent,
    Emission,
    MixShader,
    MixRgb,
    Invert,
    HueSaturation,
    NormalMap,
    Displacement,
    SeparateRgb,
    Math,
    LightPath,
    LightFalloff,
    OutputMaterial,
}

impl NodeKind {
    /// Host type identifier.
    pub fn blender_id(self) -> &'static str {
        match self {
            NodeKind::TexImage => "ShaderNodeTexImage",
            NodeKind::BsdfPrincipled => "ShaderNodeBsdfPrincipled",
            NodeKind::BsdfDiffuse => "ShaderNodeBsdfDiffuse",
            NodeKind::BsdfGlossy => "ShaderNodeBsdfGlossy",
            NodeKind::BsdfTransparent => "ShaderNodeBsdfTransparent",
            NodeKind::Emission => "ShaderNodeEmission",
            NodeKind::MixShader => "ShaderNodeMixShader",
            NodeKind::MixRgb => "ShaderNodeMixRGB",
            NodeKind::Invert => "ShaderNodeInvert",
            NodeKind::HueSaturation => "ShaderNodeHueSaturation",
            NodeKind::NormalMap => "ShaderNodeNormalMap",
            NodeKind::Displacement => "ShaderNodeDisplacement",
            NodeKind::SeparateRgb => "ShaderNodeSeparateRGB",
            NodeKind::Math => "ShaderNodeMath",
            NodeKind::LightPath => "ShaderNodeLightPath",
            NodeKind::LightFalloff => "ShaderNodeLightFalloff",
            NodeKind::OutputMaterial => "ShaderNodeOutputMaterial",
        }
    }

    /// Default node name, before de-duplication.
    pub fn default_name(self) -> &'static str {
        match self {
            NodeKind::TexImage => "Image Texture",
            NodeKind::BsdfPrincipled => "Principled BSDF",
            NodeKind::BsdfDiffuse => "Diffuse BSDF",
            NodeKind::BsdfGlossy => "Glossy BSDF",
            NodeKind::BsdfTransparent => "Transparent BSDF",
            NodeKind::Emission => "Emission",
            NodeKind::MixShader => "Mix Shader",
            NodeKind::MixRgb => "Mix",
            NodeKind::Invert => "Invert",
            NodeKind::HueSaturation => "Hue Saturation Value",
            NodeKind::NormalMap => "Normal Map",
            NodeKind::Displacement => "Displacement",
            NodeKind::SeparateRgb => "Separate RGB",
            NodeKind::Math => "Math",
            NodeKind::LightPath => "Light Path",
            NodeKind::LightFalloff => "Light Falloff",
            NodeKind::OutputMaterial => "Material Output",
        }
    }

    pub fn input_sockets(self) -> &'static [&'static str] {
        match self {
            NodeKind::TexImage => &["Vector"],
            NodeKind::BsdfPrincipled => &[
                "Base Color",
                "Metallic",
                "Specular",
                "Specular Tint",
                "Roughness",
                "IOR",
                "Emission",
                "Emission Strength",
                "Alpha",
                "Normal",
            ],
            NodeKind::BsdfDiffuse => &["Color", "Roughness", "Normal"],
            NodeKind::BsdfGlossy => &["Color", "Roughness", "Normal"],
            NodeKind::BsdfTransparent => &["Color"],
            NodeKind::Emission => &["Color", "Strength"],
            NodeKind::MixShader => &["Fac", "Shader", "Shader_001"],
            NodeKind::MixRgb => &["Fac", "Color1", "Color2"],
            NodeKind::Invert => &["Fac", "Color"],
            NodeKind::HueSaturation => &["Hue", "Saturation", "Value", "Fac", "Color"],
            NodeKind::NormalMap => &["Strength", "Color"],
            NodeKind::Displacement => &["Height", "Midlevel", "Scale", "Normal"],
            NodeKind::SeparateRgb => &["Image"],
            NodeKind::Math => &["Value", "Value_001"],
            NodeKind::LightPath => &[],
            NodeKind::LightFalloff => &["Strength", "Smooth"],
            NodeKind::OutputMaterial => &["Surface", "Volume", "Displacement"],
        }
    }

    pub fn output_sockets(self) -> &'static [&'static str] {
        match self {
            NodeKind::TexImage => &["Color", "Alpha"],
            NodeKind::BsdfPrincipled
            | NodeKind::BsdfDiffuse
            | NodeKind::BsdfGlossy
            | NodeKind::BsdfTransparent => &["BSDF"],
            NodeKind::Emission => &["Emission"],
            NodeKind::MixShader => &["Shader"],
            NodeKind::MixRgb | NodeKind::Invert | NodeKind::HueSaturation => &["Color"],
            NodeKind::NormalMap => &["Normal"],
            NodeKind::Displacement => &["Displacement"],
            NodeKind::SeparateRgb => &["R", "G", "B"],
            NodeKind::Math => &["Value"],
            NodeKind::LightPath => &["Is Camera Ray", "Is Shadow Ray", "Is Diffuse Ray"],
            NodeKind::LightFalloff => &["Quadratic", "Linear", "Constant"],
            NodeKind::OutputMaterial => &[],
        }
    }

    pub fn has_input(self, socket: &str) -> bool {
        self.input_sockets().contains(&socket)
    }

    pub fn has_output(self, socket: &str) -> bool {
        self.output_sockets().contains(&socket)
    }

    /// Whether the node produces a closure (shader) output.
    pub fn is_shader(self) -> bool {
        matches!(
            self,
            NodeKind::BsdfPrincipled
                | NodeKind::BsdfDiffuse
                | NodeKind::BsdfGlossy
                | NodeKind::BsdfTransparent
                | NodeKind::Emission
                | NodeKind::MixShader
        )
    }
}
