//! Host-side material records and render engine identity.

use crate::graph::ShaderGraph;
use serde::Serialize;
use std::fmt;

/// How a material's alpha is resolved in the rasterizing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMethod {
    #[default]
    Opaque,
    Clip,
    /// Alpha dithering.
    Hashed,
    Blend,
}

/// How a material casts shadows in the rasterizing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShadowMethod {
    None,
    #[default]
    Opaque,
    Clip,
    Hashed,
}

/// A material being prepped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub use_nodes: bool,
    pub node_tree: ShaderGraph,
    pub blend_method: BlendMethod,
    pub shadow_method: ShadowMethod,
    pub show_transparent_back: bool,
    pub use_backface_culling: bool,
    /// Set once a resource pack swap has been applied.
    pub texture_swapped: bool,
}

impl Material {
    /// A fresh material without a node graph.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            use_nodes: false,
            node_tree: ShaderGraph::new(),
            blend_method: BlendMethod::default(),
            shadow_method: ShadowMethod::default(),
            show_transparent_back: true,
            use_backface_culling: false,
            texture_swapped: false,
        }
    }
}

/// The host's active render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEngine {
    Cycles,
    Eevee,
    Other(String),
}

impl RenderEngine {
    /// Parse a host engine identifier such as `CYCLES` or `BLENDER_EEVEE`.
    pub fn from_id(id: &str) -> Self {
        match id.to_ascii_uppercase().as_str() {
            "CYCLES" => RenderEngine::Cycles,
            "BLENDER_EEVEE" | "BLENDER_EEVEE_NEXT" | "EEVEE" => RenderEngine::Eevee,
            _ => RenderEngine::Other(id.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, RenderEngine::Other(_))
    }
}

impl fmt::Display for RenderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderEngine::Cycles => f.write_str("CYCLES"),
            RenderEngine::Eevee => f.write_str("BLENDER_EEVEE"),
            RenderEngine::Other(id) => f.write_str(id),
        }
    }
}

/// What the host offers to the generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub engine: RenderEngine,
    /// Whether a principled BSDF node type exists.
    pub principled_available: bool,
}

impl Default for HostInfo {
    fn default() -> Self {
        Self {
            engine: RenderEngine::Cycles,
            principled_available: true,
        }
    }
}

impl HostInfo {
    pub fn new(engine: RenderEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn without_principled(mut self) -> Self {
        self.principled_available = false;
        self
    }
}
