use crate::misc::standardize;
use crate::osa::{self, Language};

use std::path::{Path, PathBuf};

use log::{error, info, warn};
use url::Url;

const JXA_RUNNING_APPS: &str = r#"
    ObjC.import("AppKit");

    function run(argv) {
        let apps = $.NSWorkspace.sharedWorkspace.runningApplications.js;
        let urls = [];
        for (let app of apps) {
            let url = app.bundleURL;
            if (url && !url.isNil()) {
                urls.push(url.absoluteString.js);
            }
        }
        return JSON.stringify(urls);
    }
"#;

const JXA_TRASH: &str = r#"
    ObjC.import("Foundation");

    function run(argv) {
        if (argv.length !== 1) {
            throw new Error("Expected exactly 1 argument");
        }

        let url = $.NSURL.fileURLWithPath(argv[0]);
        let error = $();
        let ok = $.NSFileManager.defaultManager.trashItemAtURLResultingItemURLError(url, null, error);
        if (!ok) {
            throw new Error(ObjC.unwrap(error.localizedDescription));
        }
    }
"#;

// Bundle paths of every running app, from NSWorkspace.
pub fn running_application_paths() -> Result<Vec<PathBuf>, String> {
    let stdout = osa::run(Language::JavaScript, JXA_RUNNING_APPS, [] as [&str; 0])
        .map_err(|e| format!("Error listing running applications: {}", e.message))?;
    parse_bundle_urls(&stdout)
}

pub fn parse_bundle_urls(json: &str) -> Result<Vec<PathBuf>, String> {
    let urls: Vec<String> = serde_json::from_str(json.trim())
        .map_err(|e| format!("Error parsing running applications: {e}"))?;

    Ok(urls
        .iter()
        .filter_map(|url| {
            let parsed = Url::parse(url).ok()?;
            if parsed.scheme() != "file" {
                return None;
            }
            parsed.to_file_path().ok()
        })
        .map(|path| standardize(&path))
        .collect())
}

pub fn is_application_at_url_running(path: &Path) -> bool {
    match running_application_paths() {
        Ok(paths) => is_among(path, &paths),
        Err(msg) => {
            // Assume not; the worst case is trashing a running copy.
            error!("{msg}");
            false
        }
    }
}

pub fn is_among(path: &Path, running: &[PathBuf]) -> bool {
    let path = standardize(path);
    running.iter().any(|x| *x == path)
}

pub fn trash(path: &Path) -> Result<(), String> {
    info!("Moving '{}' to the Trash", path.display());
    osa::run(Language::JavaScript, JXA_TRASH, [path.as_os_str()])
        .map(|_| ())
        .map_err(|e| format!("Error moving '{}' to the Trash: {}", path.display(), e.message))
}

pub fn open(path: &Path) {
    if let Err(e) = opener::open(path) {
        warn!("Error opening '{}': {e}", path.display()); // Focusing is a nicety.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_urls_only() {
        let json = r#"["file:///Applications/Safari.app/", "file:///Users/me/My%20App.app/", "https://example.com/"]"#;
        let paths = parse_bundle_urls(json).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/Applications/Safari.app"),
                PathBuf::from("/Users/me/My App.app"),
            ]
        );
    }

    #[test]
    fn running_match_is_standardized() {
        let running = vec![PathBuf::from("/Applications/Thing.app")];
        assert!(is_among(Path::new("/Applications/./Thing.app/"), &running));
        assert!(!is_among(Path::new("/Applications/Other.app"), &running));
    }

    #[test]
    fn garbage_output_is_an_error() {
        assert!(parse_bundle_urls("not json").is_err());
    }
}
