//! Discovery of normal, specular and displacement maps next to a diffuse image.

use crate::pass::{PassKind, PassMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions accepted for auxiliary pass images.
pub const PASS_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "tiff"];

const NORMAL_SUFFIXES: [&str; 7] = [" n", "_n", "-n", "normal", "norm", "nrm", "normals"];
const SPECULAR_SUFFIXES: [&str; 5] = [" s", "_s", "-s", "specular", "spec"];
const DISPLACE_SUFFIXES: [&str; 9] = [" d", "_d", "-d", "displace", "disp", "bump", " b", "_b", "-b"];

/// Pass image files found on disk.
pub type PassFiles = PassMap<PathBuf>;

/// Find pass images sitting beside `diffuse`.
///
/// Siblings qualify when their stem starts with the diffuse stem (ignoring
/// case) and the remainder ends in a known pass suffix. Files are visited in
/// name order and the first match per pass wins. The diffuse entry is always
/// present.
pub fn find_additional_passes(diffuse: &Path) -> PassFiles {
    let mut passes = PassMap::with_diffuse(diffuse.to_path_buf());

    let (Some(dir), Some(stem)) = (diffuse.parent(), diffuse.file_stem()) else {
        return passes;
    };
    let diffuse_stem = stem.to_string_lossy().to_lowercase();

    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(read) => read.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list pass directory");
            return passes;
        }
    };
    entries.sort();

    for path in entries {
        if !path.is_file() || !has_pass_extension(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_lowercase()) else {
            continue;
        };
        let Some(trailing) = stem.strip_prefix(&diffuse_stem) else {
            continue;
        };
        let Some(kind) = classify_suffix(trailing) else {
            continue;
        };
        let slot = passes.slot_mut(kind);
        if slot.is_none() {
            debug!(pass = %kind, path = %path.display(), "found pass image");
            *slot = Some(path);
        }
    }

    passes
}

/// Classify the part of a sibling stem that follows the diffuse stem.
fn classify_suffix(trailing: &str) -> Option<PassKind> {
    if trailing.is_empty() {
        return None;
    }
    let ends_with_any = |suffixes: &[&str]| suffixes.iter().any(|s| trailing.ends_with(s));
    if ends_with_any(&NORMAL_SUFFIXES) {
        Some(PassKind::Normal)
    } else if ends_with_any(&SPECULAR_SUFFIXES) {
        Some(PassKind::Specular)
    } else if ends_with_any(&DISPLACE_SUFFIXES) {
        Some(PassKind::Displace)
    } else {
        None
    }
}

fn has_pass_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PASS_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
        .unwrap_or(false)
}
