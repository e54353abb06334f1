
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use shell_quote::{Quote, Sh};

#[macro_export]
macro_rules! bail {
    ($e:expr) => {{
        return Err($e);
    }}
}

#[macro_export]
macro_rules! bailf {
    ($($e:expr),+) => {{
        return Err(format!($($e),+));
    }}
}

// Get the path to the currently executing app bundle, i.e. the X.app directory.
// Errors if the binary doesn't live at X.app/Contents/MacOS/binary.
pub fn current_bundle() -> Result<PathBuf, String> {
    let exe = std::env::current_exe()
        .map_err(|e| format!("Failed to get current exe: {e}"))?;
    bundle_from_exe(&exe)
}

pub fn bundle_from_exe(exe: &Path) -> Result<PathBuf, String> {
    let mut path = exe.to_owned();

    // Binary itself
    if !path.pop() {
        bailf!("Couldn't pop binary filename from path '{}' !?", exe.display());
    }

    if path.file_name().map_or(true, |x| x != "MacOS") {
        bailf!("'{}' isn't in a MacOS/ directory, is this being run in an app bundle?", exe.display());
    }
    path.pop();

    if path.file_name().map_or(true, |x| x != "Contents") {
        bailf!("'{}' isn't in a Contents/ directory, is this being run in an app bundle?", exe.display());
    }
    path.pop();

    if !is_bundle_path(&path) {
        bailf!("'{}' isn't an app bundle", path.display());
    }

    Ok(path)
}

// Get the path to the currently executing app bundle's Resources directory.
pub fn get_app_resources() -> Result<PathBuf, String> {
    let mut path = current_bundle()?;
    path.push("Contents");
    path.push("Resources");
    Ok(path)
}

pub fn is_bundle_path(path: &Path) -> bool {
    path.extension().map_or(false, |x| x == "app") && path.file_stem().is_some()
}

// Name shown to the user; the bundle's file name without .app.
pub fn display_name(bundle: &Path) -> String {
    bundle.file_stem()
        .map(|x| x.to_string_lossy().into_owned())
        .unwrap_or_else(|| bundle.display().to_string())
}

// Lexical normalization, like NSURL's standardizedURL: drops `.`, resolves `..`
// against the preceding component and removes trailing separators. Doesn't touch
// the file system, so symlinks are left alone.
pub fn standardize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => (),
            Component::ParentDir => {
                // Can't go above the root; `/..` is `/`.
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// POSIX quoting; the scripts we build run under /bin/sh, which needn't be bash.
pub fn sh_quote<S: AsRef<OsStr>>(string: S) -> Result<String, String> {
    let quoted: Vec<u8> = Sh::quote(string.as_ref());
    String::from_utf8(quoted).map_err(|e| format!("Quoted path isn't valid UTF-8: {e}"))
}
