//! On-disk JSON layout of the block catalog.

use super::SemanticClass;
use crate::error::{PrepError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
pub(super) struct CatalogFile {
    pub blocks: BlocksSection,
}

/// The `blocks` section holding mappings and class lists.
#[derive(Debug, Default, Deserialize)]
pub(super) struct BlocksSection {
    #[serde(default)]
    pub canon_mapping_block: HashMap<String, String>,

    #[serde(default)]
    pub block_mapping_jmc: HashMap<String, String>,

    #[serde(default)]
    pub block_mapping_mineways: HashMap<String, String>,

    /// Either a map of name -> colour, or a bare list of names.
    #[serde(default)]
    pub desaturated: Option<DesaturatedEntries>,

    /// Class lists and anything else the file carries.
    #[serde(flatten)]
    pub lists: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum DesaturatedEntries {
    Map(HashMap<String, Option<Vec<f32>>>),
    List(Vec<String>),
}

/// A `prefix*suffix` entry in a class list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Wildcard {
    prefix: String,
    suffix: String,
}

impl Wildcard {
    /// Parse an entry with exactly one `*`. Returns None for plain names.
    pub fn parse(entry: &str) -> Option<Self> {
        let (prefix, suffix) = entry.split_once('*')?;
        if suffix.contains('*') {
            tracing::debug!(entry, "ignoring catalog entry with more than one wildcard");
            return None;
        }
        Some(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Match when the name carries the non-empty prefix or the non-empty suffix.
    pub fn matches(&self, name: &str) -> bool {
        (!self.prefix.is_empty() && name.starts_with(&self.prefix))
            || (!self.suffix.is_empty() && name.ends_with(&self.suffix))
    }
}

/// One semantic class: exact names plus wildcard entries.
#[derive(Debug, Clone, Default)]
pub(super) struct ClassList {
    exact: HashSet<String>,
    wildcards: Vec<Wildcard>,
}

impl ClassList {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut list = Self::default();
        for entry in entries {
            match Wildcard::parse(entry) {
                Some(wildcard) => list.wildcards.push(wildcard),
                None if entry.contains('*') => {}
                None => {
                    list.exact.insert(entry.to_string());
                }
            }
        }
        list
    }

    pub fn contains(&self, name: &str) -> bool {
        self.exact.contains(name) || self.wildcards.iter().any(|w| w.matches(name))
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len()
    }
}

/// Parsed, query-ready catalog contents.
#[derive(Debug, Clone, Default)]
pub(super) struct CatalogData {
    pub canon_mapping: HashMap<String, String>,
    pub aliases_jmc: HashMap<String, String>,
    pub aliases_mineways: HashMap<String, String>,
    pub classes: HashMap<SemanticClass, ClassList>,
    /// Exact desaturation colours; `None` when the block lists no colour.
    pub desaturated_colors: HashMap<String, Option<[f32; 4]>>,
    /// Wildcard desaturation colours, in file order.
    pub desaturated_wildcards: Vec<(Wildcard, Option<[f32; 4]>)>,
}

impl CatalogData {
    pub fn parse(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_section(file.blocks)
    }

    fn from_section(section: BlocksSection) -> Result<Self> {
        let mut data = CatalogData {
            canon_mapping: section.canon_mapping_block,
            aliases_jmc: section.block_mapping_jmc,
            aliases_mineways: section.block_mapping_mineways,
            ..Default::default()
        };

        for class in SemanticClass::ALL {
            if class == SemanticClass::Desaturated {
                continue;
            }
            let Some(value) = section.lists.get(class.key()) else {
                continue;
            };
            let entries: Vec<String> = serde_json::from_value(value.clone()).map_err(|e| {
                PrepError::CatalogMissing(format!("class list '{}' is malformed: {}", class.key(), e))
            })?;
            data.classes
                .insert(class, ClassList::from_entries(entries.iter().map(String::as_str)));
        }

        if let Some(desaturated) = section.desaturated {
            let entries: Vec<(String, Option<[f32; 4]>)> = match desaturated {
                DesaturatedEntries::Map(map) => map
                    .into_iter()
                    .map(|(name, color)| (name, color.as_deref().and_then(pad_color)))
                    .collect(),
                DesaturatedEntries::List(names) => names.into_iter().map(|n| (n, None)).collect(),
            };

            data.classes.insert(
                SemanticClass::Desaturated,
                ClassList::from_entries(entries.iter().map(|(name, _)| name.as_str())),
            );

            let mut wildcards = Vec::new();
            for (name, color) in entries {
                match Wildcard::parse(&name) {
                    Some(wildcard) => wildcards.push((name, wildcard, color)),
                    None => {
                        data.desaturated_colors.insert(name, color);
                    }
                }
            }
            // HashMap order is arbitrary; keep wildcard colour lookup deterministic.
            wildcards.sort_by(|a, b| a.0.cmp(&b.0));
            data.desaturated_wildcards = wildcards.into_iter().map(|(_, w, c)| (w, c)).collect();
        }

        Ok(data)
    }
}

/// Pad an RGB triplet with alpha 1.0. Anything but 3 or 4 channels is rejected.
fn pad_color(channels: &[f32]) -> Option<[f32; 4]> {
    match *channels {
        [r, g, b] => Some([r, g, b, 1.0]),
        [r, g, b, a] => Some([r, g, b, a]),
        _ => None,
    }
}
