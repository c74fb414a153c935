//! Block catalog: canonical names, exporter aliases and semantic classes.
//!
//! The catalog is a JSON document (bundled with the crate, or supplied by
//! path) that drives every per-block decision in material generation. It is
//! parsed lazily on first query and can be reloaded explicitly.
//!
//! A missing or unparsable catalog never raises from a query: membership
//! answers `false`, lookups answer `None`, and the failure is logged.

mod schema;

use crate::error::{PrepError, Result};
use schema::CatalogData;
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// The catalog shipped with the crate.
pub const BUNDLED_CATALOG: &str = include_str!("../../data/mcprep_data.json");

/// Semantic class tags that drive shader graph topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticClass {
    Reflective,
    Emit,
    Metallic,
    Glass,
    Water,
    Solid,
    Desaturated,
    Animated,
}

impl SemanticClass {
    pub const ALL: [SemanticClass; 8] = [
        SemanticClass::Reflective,
        SemanticClass::Emit,
        SemanticClass::Metallic,
        SemanticClass::Glass,
        SemanticClass::Water,
        SemanticClass::Solid,
        SemanticClass::Desaturated,
        SemanticClass::Animated,
    ];

    /// Key of this class inside the catalog's `blocks` section.
    pub fn key(self) -> &'static str {
        match self {
            SemanticClass::Reflective => "reflective",
            SemanticClass::Emit => "emit",
            SemanticClass::Metallic => "metallic",
            SemanticClass::Glass => "glass",
            SemanticClass::Water => "water",
            SemanticClass::Solid => "solid",
            SemanticClass::Desaturated => "desaturated",
            SemanticClass::Animated => "animated",
        }
    }
}

impl fmt::Display for SemanticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Where the catalog JSON comes from.
#[derive(Debug, Clone)]
enum CatalogSource {
    Bundled,
    File(PathBuf),
    Inline(String),
}

/// Entry counts, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub jmc_aliases: usize,
    pub mineways_aliases: usize,
    pub canon_remaps: usize,
    pub class_entries: Vec<(SemanticClass, usize)>,
}

/// The block catalog.
///
/// Construct once and pass by reference into every operation.
#[derive(Debug)]
pub struct Catalog {
    source: CatalogSource,
    data: OnceCell<std::result::Result<CatalogData, String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::bundled()
    }
}

impl Catalog {
    /// Catalog backed by the bundled JSON.
    pub fn bundled() -> Self {
        Self::with_source(CatalogSource::Bundled)
    }

    /// Catalog read from a JSON file on first use.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(CatalogSource::File(path.into()))
    }

    /// Catalog parsed from an in-memory JSON string.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self::with_source(CatalogSource::Inline(json.into()))
    }

    fn with_source(source: CatalogSource) -> Self {
        Self {
            source,
            data: OnceCell::new(),
        }
    }

    /// Load the catalog if not yet loaded. Idempotent.
    pub fn load(&self) -> Result<()> {
        match self.state() {
            Ok(_) => Ok(()),
            Err(reason) => Err(PrepError::CatalogMissing(reason.clone())),
        }
    }

    /// Drop any loaded data and parse the source again.
    pub fn reload(&mut self) -> Result<()> {
        self.data = OnceCell::new();
        self.load()
    }

    /// Whether a load was attempted and succeeded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.data.get(), Some(Ok(_)))
    }

    fn state(&self) -> &std::result::Result<CatalogData, String> {
        self.data.get_or_init(|| {
            let parsed = match &self.source {
                CatalogSource::Bundled => CatalogData::parse(BUNDLED_CATALOG),
                CatalogSource::Inline(json) => CatalogData::parse(json),
                CatalogSource::File(path) => std::fs::read_to_string(path)
                    .map_err(PrepError::from)
                    .and_then(|json| CatalogData::parse(&json)),
            };
            parsed.map_err(|e| {
                warn!(source = ?self.source, error = %e, "block catalog unavailable");
                e.to_string()
            })
        })
    }

    fn data(&self) -> Option<&CatalogData> {
        self.state().as_ref().ok()
    }

    /// Whether `canon` belongs to `class`, honouring `prefix*suffix` entries.
    pub fn membership(&self, canon: &str, class: SemanticClass) -> bool {
        let Some(data) = self.data() else {
            debug!(canon, %class, "no catalog loaded, membership is false");
            return false;
        };
        match data.classes.get(&class) {
            Some(list) => list.contains(canon),
            None => {
                debug!(canon, %class, "catalog has no list for class");
                false
            }
        }
    }

    /// Every class `canon` belongs to.
    pub fn classes(&self, canon: &str) -> BTreeSet<SemanticClass> {
        SemanticClass::ALL
            .into_iter()
            .filter(|class| self.membership(canon, *class))
            .collect()
    }

    /// The asset subpath a canonical name ships under, if remapped.
    pub fn canonical_remap(&self, canon: &str) -> Option<&str> {
        self.data()?.canon_mapping.get(canon).map(String::as_str)
    }

    /// RGBA desaturation colour for a block, padded with alpha 1.0.
    pub fn desaturated_color(&self, canon: &str) -> Option<[f32; 4]> {
        let data = self.data()?;
        if let Some(color) = data.desaturated_colors.get(canon) {
            return *color;
        }
        data.desaturated_wildcards
            .iter()
            .find(|(wildcard, _)| wildcard.matches(canon))
            .and_then(|(_, color)| *color)
    }

    /// Canonical name listed for a raw jmc2obj material name.
    pub fn alias_jmc(&self, raw: &str) -> Option<&str> {
        self.data()?.aliases_jmc.get(raw).map(String::as_str)
    }

    /// Canonical name listed for a raw Mineways material name.
    pub fn alias_mineways(&self, raw: &str) -> Option<&str> {
        self.data()?.aliases_mineways.get(raw).map(String::as_str)
    }

    /// Entry counts, or None when the catalog is unavailable.
    pub fn stats(&self) -> Option<CatalogStats> {
        let data = self.data()?;
        Some(CatalogStats {
            jmc_aliases: data.aliases_jmc.len(),
            mineways_aliases: data.aliases_mineways.len(),
            canon_remaps: data.canon_mapping.len(),
            class_entries: SemanticClass::ALL
                .into_iter()
                .map(|class| (class, data.classes.get(&class).map_or(0, |l| l.len())))
                .collect(),
        })
    }
}
