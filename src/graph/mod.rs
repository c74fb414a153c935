//! Shader node graphs.
//!
//! A [`ShaderGraph`] is a host-independent model of a material node tree:
//! typed nodes, links between named sockets, and a side-table of
//! annotations recording which node plays which semantic role.

pub mod nodes;

pub use nodes::NodeKind;

use crate::error::{PrepError, Result};
use crate::pass::PassKind;
use crate::resource_pack::ImageId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Handle to a node within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// A socket default value or node property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Float(f32),
    Color([f32; 4]),
    Bool(bool),
    Enum(&'static str),
}

/// Image sequence playback settings on an image texture node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageUser {
    pub frame_duration: u32,
    pub frame_start: i32,
    pub frame_offset: i32,
    pub use_cyclic: bool,
    pub use_auto_refresh: bool,
}

impl ImageUser {
    /// Cycling playback over `frames` frames starting at frame 1.
    pub fn cycling(frames: u32) -> Self {
        Self {
            frame_duration: frames,
            frame_start: 1,
            frame_offset: 0,
            use_cyclic: true,
            use_auto_refresh: true,
        }
    }
}

/// Semantic role markers attached to nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Annotation {
    /// Image node carrying a pass (`MCPREP_diffuse`, ...).
    Pass(PassKind),
    /// The desaturation overlay mix (`SATURATE`).
    Saturate,
}

impl Annotation {
    pub fn marker(self) -> &'static str {
        match self {
            Annotation::Pass(kind) => kind.marker(),
            Annotation::Saturate => "SATURATE",
        }
    }
}

/// A node in a shader graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub label: String,
    pub location: [f32; 2],
    pub mute: bool,
    /// Unlinked input socket values.
    pub inputs: BTreeMap<&'static str, Value>,
    /// Node settings such as interpolation or blend type.
    pub properties: BTreeMap<&'static str, Value>,
    /// Bound image, for image texture nodes.
    pub image: Option<ImageId>,
    /// Sequence playback, for image texture nodes bound to a sequence.
    pub image_user: Option<ImageUser>,
}

impl Node {
    pub fn input(&self, socket: &str) -> Option<Value> {
        self.inputs.get(socket).copied()
    }

    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.get(key).copied()
    }

    pub fn float_input(&self, socket: &str) -> Option<f32> {
        match self.input(socket)? {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

/// A directed link from an output socket to an input socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub from_node: NodeId,
    pub from_socket: &'static str,
    pub to_node: NodeId,
    pub to_socket: &'static str,
}

/// A material's node graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShaderGraph {
    nodes: Vec<Node>,
    links: Vec<Link>,
    annotations: BTreeMap<NodeId, Annotation>,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every node, link and annotation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.annotations.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node with a unique name at `location`.
    pub fn add_node(&mut self, kind: NodeKind, location: [f32; 2]) -> NodeId {
        let name = self.unique_name(kind.default_name());
        self.nodes.push(Node {
            kind,
            label: String::new(),
            name,
            location,
            mute: false,
            inputs: BTreeMap::new(),
            properties: BTreeMap::new(),
            image: None,
            image_user: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn unique_name(&self, base: &str) -> String {
        let taken = |name: &str| self.nodes.iter().any(|n| n.name == name);
        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}.{:03}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn existing_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or_else(|| PrepError::GraphLink(format!("no node {:?}", id)))
    }

    /// Set an unlinked input value.
    pub fn set_input(&mut self, id: NodeId, socket: &'static str, value: Value) -> Result<()> {
        let node = self.existing_mut(id)?;
        if !node.kind.has_input(socket) {
            return Err(PrepError::GraphLink(format!(
                "{} has no input '{}'",
                node.kind.blender_id(),
                socket
            )));
        }
        node.inputs.insert(socket, value);
        Ok(())
    }

    pub fn set_property(&mut self, id: NodeId, key: &'static str, value: Value) -> Result<()> {
        self.existing_mut(id)?.properties.insert(key, value);
        Ok(())
    }

    pub fn set_mute(&mut self, id: NodeId, mute: bool) -> Result<()> {
        self.existing_mut(id)?.mute = mute;
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: &str) -> Result<()> {
        self.existing_mut(id)?.label = label.to_string();
        Ok(())
    }

    pub fn set_image(&mut self, id: NodeId, image: Option<ImageId>) -> Result<()> {
        let node = self.existing_mut(id)?;
        if node.kind != NodeKind::TexImage {
            return Err(PrepError::GraphLink(format!(
                "{} cannot hold an image",
                node.kind.blender_id()
            )));
        }
        node.image = image;
        Ok(())
    }

    pub fn set_image_user(&mut self, id: NodeId, user: Option<ImageUser>) -> Result<()> {
        self.existing_mut(id)?.image_user = user;
        Ok(())
    }

    /// Link `from.from_socket` into `to.to_socket`, replacing any existing
    /// link into that input.
    pub fn link(
        &mut self,
        from: NodeId,
        from_socket: &'static str,
        to: NodeId,
        to_socket: &'static str,
    ) -> Result<()> {
        let from_kind = self
            .node(from)
            .map(|n| n.kind)
            .ok_or_else(|| PrepError::GraphLink(format!("no node {:?}", from)))?;
        let to_kind = self
            .node(to)
            .map(|n| n.kind)
            .ok_or_else(|| PrepError::GraphLink(format!("no node {:?}", to)))?;

        if !from_kind.has_output(from_socket) {
            return Err(PrepError::GraphLink(format!(
                "{} has no output '{}'",
                from_kind.blender_id(),
                from_socket
            )));
        }
        if !to_kind.has_input(to_socket) {
            return Err(PrepError::GraphLink(format!(
                "{} has no input '{}'",
                to_kind.blender_id(),
                to_socket
            )));
        }

        self.links
            .retain(|l| !(l.to_node == to && l.to_socket == to_socket));
        self.links.push(Link {
            from_node: from,
            from_socket,
            to_node: to,
            to_socket,
        });
        Ok(())
    }

    /// Mark a node with a semantic role. A node carries at most one role.
    pub fn annotate(&mut self, id: NodeId, annotation: Annotation) {
        self.annotations.insert(id, annotation);
    }

    pub fn annotation(&self, id: NodeId) -> Option<Annotation> {
        self.annotations.get(&id).copied()
    }

    /// Nodes carrying `annotation`, in creation order.
    pub fn annotated(&self, annotation: Annotation) -> impl Iterator<Item = NodeId> + '_ {
        self.annotations
            .iter()
            .filter(move |(_, a)| **a == annotation)
            .map(|(id, _)| *id)
    }

    /// First node carrying `annotation`.
    pub fn find_annotated(&self, annotation: Annotation) -> Option<NodeId> {
        self.annotated(annotation).next()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes()
            .filter(move |(_, n)| n.kind == kind)
            .map(|(id, _)| id)
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes_of_kind(kind).count()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// The link feeding `to.socket`, if any.
    pub fn input_link(&self, to: NodeId, socket: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.to_node == to && l.to_socket == socket)
    }

    /// The node feeding `to.socket`, if any.
    pub fn input_node(&self, to: NodeId, socket: &str) -> Option<NodeId> {
        self.input_link(to, socket).map(|l| l.from_node)
    }

    /// The material output node.
    pub fn output_node(&self) -> Option<NodeId> {
        self.nodes_of_kind(NodeKind::OutputMaterial).next()
    }

    /// Every node with a path of links into `id`.
    pub fn upstream(&self, id: NodeId) -> BTreeSet<NodeId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for link in self.links.iter().filter(|l| l.to_node == current) {
                if seen.insert(link.from_node) {
                    stack.push(link.from_node);
                }
            }
        }
        seen
    }

    /// Nodes feeding one input socket of `id`, including the direct source.
    pub fn upstream_of_input(&self, id: NodeId, socket: &str) -> BTreeSet<NodeId> {
        match self.input_node(id, socket) {
            Some(source) => {
                let mut nodes = self.upstream(source);
                nodes.insert(source);
                nodes
            }
            None => BTreeSet::new(),
        }
    }
}
