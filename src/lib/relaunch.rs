use crate::misc::sh_quote;

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use log::{debug, error, info, warn};

const QUARANTINE_ATTR: &str = "com.apple.quarantine";

// Polls until `pid` is gone, then opens the bundle. Backgrounded so the shell we
// spawn returns right away and the loop survives our exit.
const WAIT_FOR_EXIT_TEMPLATE: &str =
    "(while kill -0 {{pid}} >/dev/null 2>&1; do sleep 0.1; done; {{{open}}} {{{path}}}) &";

pub fn wait_for_exit_script(pid: u32, open_cmd: &str, path: &Path) -> Result<String, String> {
    let quoted_path = sh_quote(path)?;

    let reg = handlebars::Handlebars::new();
    reg.render_template(
        WAIT_FOR_EXIT_TEMPLATE,
        &serde_json::json!({
            "pid": pid,
            "open": open_cmd,
            "path": quoted_path,
        }),
    )
    .map_err(|e| format!("Error rendering relaunch script: {e}"))
}

pub fn strip_quarantine(path: &Path) -> Result<(), String> {
    debug!("Removing {QUARANTINE_ATTR} from '{}'", path.display());
    let output = Command::new("/usr/bin/xattr")
        .args(["-d", "-r", QUARANTINE_ATTR])
        .arg(path)
        .output()
        .map_err(|e| format!("Failed to run xattr: {e}"))?;

    if !output.status.success() {
        let msg = String::from_utf8_lossy(&output.stderr);
        crate::bailf!("xattr exited with an error: {}", msg.trim());
    }

    Ok(())
}

// Starts a detached shell, in its own process group so it doesn't share our fate,
// and returns without waiting for it.
pub fn spawn_detached(script: &str) -> Result<(), String> {
    debug!("Spawning detached: {script}");
    Command::new("/bin/sh")
        .arg("-c")
        .arg(script)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("Error spawning relaunch helper: {e}"))
}

// Opens `path` once this process has exited. `on_complete` runs on a helper thread
// as soon as the wait-and-open helper is started; it's expected to exit.
pub fn relaunch<F>(path: &Path, on_complete: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    relaunch_with(path, "/usr/bin/open", on_complete)
}

pub fn relaunch_with<F>(path: &Path, open_cmd: &str, on_complete: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let path = path.to_owned();
    let open_cmd = open_cmd.to_owned();
    let pid = std::process::id();

    std::thread::spawn(move || {
        // Best effort, the attribute usually isn't there at all.
        if let Err(msg) = strip_quarantine(&path) {
            warn!("{msg}");
        }

        let res = wait_for_exit_script(pid, &open_cmd, &path).and_then(|x| spawn_detached(&x));
        match res {
            Ok(()) => info!("Will relaunch '{}' after pid {pid} exits", path.display()),
            Err(msg) => error!("{msg}"),
        }

        on_complete();
    })
}
