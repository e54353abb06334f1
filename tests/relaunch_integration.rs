use app_mover::relaunch::{spawn_detached, wait_for_exit_script};

use std::process::Command;
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempdir::TempDir;

fn wait_for<F: Fn() -> bool>(timeout: Duration, cond: F) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(50));
    }
    cond()
}

#[test]
fn opens_only_after_process_exits() {
    let tmp = TempDir::new("app-mover-relaunch").unwrap();
    let marker = tmp.path().join("opened");

    // Stands in for the app that's about to quit.
    let mut old_app = Command::new("sleep").arg("30").spawn().unwrap();

    let script = wait_for_exit_script(old_app.id(), "touch", &marker).unwrap();
    spawn_detached(&script).unwrap();

    sleep(Duration::from_millis(500));
    assert!(!marker.exists(), "opened while the old process was still alive");

    old_app.kill().unwrap();
    old_app.wait().unwrap(); // Reap it, a zombie still answers kill -0.

    assert!(wait_for(Duration::from_secs(5), || marker.exists()));
}

#[test]
fn paths_with_spaces_survive_quoting() {
    let tmp = TempDir::new("app-mover-relaunch").unwrap();
    let marker = tmp.path().join("My App.app");

    let mut gone = Command::new("true").spawn().unwrap();
    gone.wait().unwrap();

    let script = wait_for_exit_script(gone.id(), "touch", &marker).unwrap();
    spawn_detached(&script).unwrap();

    assert!(wait_for(Duration::from_secs(5), || marker.exists()));
    assert!(!tmp.path().join("My").exists());
}
