//! Semantic passes an image can play in a material.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four image roles in a generated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassKind {
    Diffuse,
    Normal,
    Specular,
    Displace,
}

impl PassKind {
    pub const ALL: [PassKind; 4] = [
        PassKind::Diffuse,
        PassKind::Normal,
        PassKind::Specular,
        PassKind::Displace,
    ];

    /// Marker key the host attaches to the image node carrying this pass.
    pub fn marker(self) -> &'static str {
        match self {
            PassKind::Diffuse => "MCPREP_diffuse",
            PassKind::Normal => "MCPREP_normal",
            PassKind::Specular => "MCPREP_specular",
            PassKind::Displace => "MCPREP_displace",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassKind::Diffuse => "diffuse",
            PassKind::Normal => "normal",
            PassKind::Specular => "specular",
            PassKind::Displace => "displace",
        };
        f.write_str(name)
    }
}

/// A value per pass, each optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassMap<T> {
    pub diffuse: Option<T>,
    pub normal: Option<T>,
    pub specular: Option<T>,
    pub displace: Option<T>,
}

impl<T> Default for PassMap<T> {
    fn default() -> Self {
        Self {
            diffuse: None,
            normal: None,
            specular: None,
            displace: None,
        }
    }
}

impl<T> PassMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding only a diffuse entry.
    pub fn with_diffuse(diffuse: T) -> Self {
        Self {
            diffuse: Some(diffuse),
            ..Self::default()
        }
    }

    pub fn get(&self, kind: PassKind) -> Option<&T> {
        match kind {
            PassKind::Diffuse => self.diffuse.as_ref(),
            PassKind::Normal => self.normal.as_ref(),
            PassKind::Specular => self.specular.as_ref(),
            PassKind::Displace => self.displace.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: PassKind) -> &mut Option<T> {
        match kind {
            PassKind::Diffuse => &mut self.diffuse,
            PassKind::Normal => &mut self.normal,
            PassKind::Specular => &mut self.specular,
            PassKind::Displace => &mut self.displace,
        }
    }

    pub fn set(&mut self, kind: PassKind, value: T) {
        *self.slot_mut(kind) = Some(value);
    }

    /// Present entries in pass order.
    pub fn iter(&self) -> impl Iterator<Item = (PassKind, &T)> {
        PassKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|v| (kind, v)))
    }

    /// Drop everything but the diffuse entry.
    pub fn diffuse_only(mut self) -> Self {
        self.normal = None;
        self.specular = None;
        self.displace = None;
        self
    }
}
