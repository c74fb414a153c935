//! Material name canonicalization across exporter dialects.
//!
//! World exporters name materials differently: jmc2obj uses lower-case
//! resource-pack style names, Mineways uses title-cased descriptive names.
//! Both are mapped onto one canonical block id through the catalog.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which exporter produced a material name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExporterForm {
    Jmc2obj,
    Mineways,
}

impl fmt::Display for ExporterForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExporterForm::Jmc2obj => f.write_str("jmc2obj"),
            ExporterForm::Mineways => f.write_str("mineways"),
        }
    }
}

/// A canonical block id plus the exporter form it was recognised under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalName {
    pub name: String,
    pub form: Option<ExporterForm>,
}

/// Strip host duplication suffixes such as `.001`.
///
/// Only trailing dots followed by exactly three digits are removed, so
/// `stone.001.002` becomes `stone`.
pub fn strip_duplicate_suffix(name: &str) -> &str {
    let mut name = name;
    loop {
        let bytes = name.as_bytes();
        if bytes.len() < 4 {
            return name;
        }
        let tail = &bytes[bytes.len() - 4..];
        if tail[0] == b'.' && tail[1..].iter().all(u8::is_ascii_digit) {
            name = &name[..name.len() - 4];
        } else {
            return name;
        }
    }
}

/// Map a raw material name to its canonical block id and exporter form.
///
/// The jmc2obj aliases are consulted first, then Mineways. When neither
/// lists the exact name, the lower-cased name is retried in the same order.
/// Unknown names come back stripped with no form.
pub fn canonicalize(catalog: &Catalog, raw: &str) -> CanonicalName {
    let general = strip_duplicate_suffix(raw);

    if let Some(found) = lookup(catalog, general) {
        return found;
    }

    let lower = general.to_lowercase();
    if lower != general {
        if let Some(found) = lookup(catalog, &lower) {
            return found;
        }
    }

    CanonicalName {
        name: general.to_string(),
        form: None,
    }
}

fn lookup(catalog: &Catalog, name: &str) -> Option<CanonicalName> {
    if let Some(canon) = catalog.alias_jmc(name) {
        return Some(CanonicalName {
            name: canon.to_string(),
            form: Some(ExporterForm::Jmc2obj),
        });
    }
    catalog.alias_mineways(name).map(|canon| CanonicalName {
        name: canon.to_string(),
        form: Some(ExporterForm::Mineways),
    })
}

/// Detect the exporter of a set of materials by majority vote.
///
/// Ties, including zero hits on both sides, give `None`.
pub fn detect_form<'a>(
    catalog: &Catalog,
    names: impl IntoIterator<Item = &'a str>,
) -> Option<ExporterForm> {
    let mut jmc = 0usize;
    let mut mineways = 0usize;

    for name in names {
        match canonicalize(catalog, name).form {
            Some(ExporterForm::Jmc2obj) => jmc += 1,
            Some(ExporterForm::Mineways) => mineways += 1,
            None => {}
        }
    }

    tracing::debug!(jmc, mineways, "exporter form tally");

    match jmc.cmp(&mineways) {
        std::cmp::Ordering::Greater => Some(ExporterForm::Jmc2obj),
        std::cmp::Ordering::Less => Some(ExporterForm::Mineways),
        std::cmp::Ordering::Equal => None,
    }
}
