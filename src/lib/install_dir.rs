use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;

// Read-only by OS policy (SIP), never a destination.
pub const SYSTEM_APPLICATIONS: &str = "/System/Applications";

lazy_static! {
    // Applications directories in every domain, user first, like
    // NSSearchPathForDirectoriesInDomains(NSApplicationDirectory, NSAllDomainsMask).
    static ref DOMAIN_DIRS: Vec<PathBuf> = {
        let mut dirs = vec![];
        if let Some(home) = home::home_dir() {
            dirs.push(home.join("Applications"));
        }
        dirs.push(PathBuf::from("/Applications"));
        dirs.push(PathBuf::from("/Network/Applications"));
        dirs.push(PathBuf::from(SYSTEM_APPLICATIONS));
        dirs
    };
}

pub fn applications_dirs() -> &'static [PathBuf] {
    &DOMAIN_DIRS
}

pub fn preferred_install_directory() -> Option<PathBuf> {
    preferred_among(applications_dirs(), Path::new(SYSTEM_APPLICATIONS))
}

// Picks the directory with the most entries, on the theory that it's the one the
// user actually keeps their apps in.
pub fn preferred_among(candidates: &[PathBuf], protected: &Path) -> Option<PathBuf> {
    candidates
        .iter()
        .filter_map(|dir| fs::canonicalize(dir).ok())
        .filter(|dir| dir.is_dir() && dir != protected)
        .map(|dir| (entry_count(&dir), dir))
        .inspect(|(count, dir)| debug!("Candidate '{}' has {count} entries", dir.display()))
        .sorted_by_key(|(count, _)| *count)
        .last()
        .map(|(_, dir)| dir)
}

// Unreadable counts as empty.
fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

pub fn is_installed(bundle: &Path) -> bool {
    is_installed_in(bundle, applications_dirs())
}

// Installed means living somewhere under an Applications directory, and not on a
// disk image or a Gatekeeper translocation mount.
pub fn is_installed_in(bundle: &Path, candidates: &[PathBuf]) -> bool {
    let bundle = fs::canonicalize(bundle).unwrap_or_else(|_| bundle.to_owned());

    let bundle_str = bundle.to_string_lossy();
    if bundle_str.contains("/AppTranslocation/") || bundle.starts_with("/Volumes") {
        return false;
    }

    candidates
        .iter()
        .filter_map(|dir| fs::canonicalize(dir).ok())
        .any(|dir| bundle.starts_with(dir))
}
