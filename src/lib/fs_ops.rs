use std::ffi::CString;
use std::fs::{self, File, FileTimes};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs as unix_fs;
use std::path::Path;

use log::debug;

// Same probe NSFileManager's isWritableFileAtPath uses.
pub fn is_writable(path: &Path) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

pub fn needs_authorization(install_dir: &Path, destination: &Path) -> bool {
    let dest_exists = destination.symlink_metadata().is_ok();
    (dest_exists && !is_writable(destination)) || !is_writable(install_dir)
}

// Recursive copy that keeps symlinks as symlinks (frameworks inside bundles are
// full of them) and keeps permissions and timestamps, like `cp -pR`. Fails if dst
// already exists.
pub fn copy_bundle(src: &Path, dst: &Path) -> Result<(), String> {
    if dst.symlink_metadata().is_ok() {
        return Err(format!("Can't copy to '{}', it already exists", dst.display()));
    }
    copy_item(src, dst)
}

fn copy_item(src: &Path, dst: &Path) -> Result<(), String> {
    let meta = src
        .symlink_metadata()
        .map_err(|e| format!("Error reading metadata of '{}': {e}", src.display()))?;
    let file_type = meta.file_type();

    if file_type.is_symlink() {
        let target = fs::read_link(src)
            .map_err(|e| format!("Error reading link '{}': {e}", src.display()))?;
        unix_fs::symlink(&target, dst)
            .map_err(|e| format!("Error creating link '{}': {e}", dst.display()))?;
    } else if file_type.is_dir() {
        fs::create_dir(dst)
            .map_err(|e| format!("Error creating directory '{}': {e}", dst.display()))?;
        let entries = fs::read_dir(src)
            .map_err(|e| format!("Error reading directory '{}': {e}", src.display()))?;
        for entry in entries {
            let entry = entry
                .map_err(|e| format!("Error reading directory '{}': {e}", src.display()))?;
            copy_item(&entry.path(), &dst.join(entry.file_name()))?;
        }
        // Set last, a read-only directory would otherwise refuse its own children,
        // and creating them would bump its mtime.
        fs::set_permissions(dst, meta.permissions())
            .map_err(|e| format!("Error setting permissions on '{}': {e}", dst.display()))?;
        copy_times(&meta, dst)?;
    } else {
        // fs::copy carries the permission bits over.
        fs::copy(src, dst).map_err(|e| {
            format!("Error copying '{}' to '{}': {e}", src.display(), dst.display())
        })?;
        copy_times(&meta, dst)?;
    }

    Ok(())
}

// futimens only needs ownership, so a read-only fd is enough even for 0o555 items.
fn copy_times(meta: &fs::Metadata, dst: &Path) -> Result<(), String> {
    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }

    File::open(dst)
        .and_then(|f| f.set_times(times))
        .map_err(|e| format!("Error setting times on '{}': {e}", dst.display()))
}

pub fn remove_bundle(path: &Path) -> Result<(), String> {
    debug!("Removing '{}'", path.display());
    let meta = path
        .symlink_metadata()
        .map_err(|e| format!("Error reading metadata of '{}': {e}", path.display()))?;
    let res = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    res.map_err(|e| format!("Error removing '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, SystemTime};
    use tempdir::TempDir;

    #[test]
    fn copy_keeps_links_and_modes() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let src = tmp.path().join("Thing.app");
        let mac_os = src.join("Contents").join("MacOS");
        fs::create_dir_all(&mac_os).unwrap();
        let bin = mac_os.join("thing");
        fs::write(&bin, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
        unix_fs::symlink("MacOS/thing", src.join("Contents").join("Current")).unwrap();

        let dst = tmp.path().join("Copy.app");
        copy_bundle(&src, &dst).unwrap();

        let copied_bin = dst.join("Contents").join("MacOS").join("thing");
        assert_eq!(fs::read_to_string(&copied_bin).unwrap(), "#!/bin/sh\n");
        assert_eq!(fs::metadata(&copied_bin).unwrap().permissions().mode() & 0o777, 0o755);

        let link = dst.join("Contents").join("Current");
        assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(link).unwrap(), Path::new("MacOS/thing"));
    }

    #[test]
    fn copy_keeps_timestamps() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let src = tmp.path().join("Thing.app");
        let contents = src.join("Contents");
        fs::create_dir_all(&contents).unwrap();
        let plist = contents.join("Info.plist");
        fs::write(&plist, "plist").unwrap();

        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        for path in [&plist, &contents, &src] {
            File::open(path)
                .unwrap()
                .set_times(FileTimes::new().set_modified(old).set_accessed(old))
                .unwrap();
        }

        let dst = tmp.path().join("Copy.app");
        copy_bundle(&src, &dst).unwrap();

        for path in [dst.clone(), dst.join("Contents"), dst.join("Contents").join("Info.plist")] {
            assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), old, "{}", path.display());
        }
    }

    #[test]
    fn copy_refuses_existing_destination() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let src = tmp.path().join("A.app");
        let dst = tmp.path().join("B.app");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        assert!(copy_bundle(&src, &dst).is_err());
    }

    #[test]
    fn remove_bundle_removes_tree() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let bundle = tmp.path().join("Thing.app");
        fs::create_dir_all(bundle.join("Contents")).unwrap();
        fs::write(bundle.join("Contents").join("Info.plist"), "").unwrap();

        remove_bundle(&bundle).unwrap();
        assert!(!bundle.exists());
        assert!(remove_bundle(&bundle).is_err());
    }

    #[test]
    fn writable_dir_needs_no_authorization() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let dst = tmp.path().join("Thing.app");
        assert!(is_writable(tmp.path()));
        assert!(!needs_authorization(tmp.path(), &dst));
    }

    #[test]
    fn read_only_destination_needs_authorization() {
        // access(2) always grants root write access.
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let tmp = TempDir::new("app-mover-fs").unwrap();
        let dst = tmp.path().join("Thing.app");
        fs::create_dir(&dst).unwrap();
        fs::set_permissions(&dst, fs::Permissions::from_mode(0o555)).unwrap();

        assert!(is_writable(tmp.path()));
        assert!(!is_writable(&dst));
        assert!(needs_authorization(tmp.path(), &dst));

        fs::set_permissions(&dst, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(!needs_authorization(tmp.path(), &dst));
    }

    #[test]
    fn missing_install_dir_needs_authorization() {
        let tmp = TempDir::new("app-mover-fs").unwrap();
        let missing = tmp.path().join("missing");
        assert!(needs_authorization(&missing, &missing.join("Thing.app")));
    }
}
