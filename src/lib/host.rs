use crate::dialog::{self, Prompt};
use crate::privileged::AuthOutcome;
use crate::{fs_ops, install_dir, misc, privileged, relaunch, workspace};

use std::path::{Path, PathBuf};

use log::{error, info};

// Everything the relocation flow needs from the outside world.
pub trait Host {
    // None when not running from an app bundle.
    fn bundle_path(&self) -> Option<PathBuf>;
    fn is_installed(&self, bundle: &Path) -> bool;
    fn preferred_install_directory(&self) -> Option<PathBuf>;
    fn needs_authorization(&self, install_dir: &Path, destination: &Path) -> bool;

    fn activate(&self);
    fn confirm(&self, prompt: &Prompt) -> bool;

    fn authorized_install(&self, source: &Path, destination: &Path) -> AuthOutcome;

    fn exists(&self, path: &Path) -> bool;
    fn is_running(&self, bundle: &Path) -> bool;
    fn open(&self, bundle: &Path);
    fn trash(&self, path: &Path) -> Result<(), String>;
    fn copy(&self, source: &Path, destination: &Path) -> Result<(), String>;
    fn remove(&self, path: &Path) -> Result<(), String>;

    // Arranges for `bundle` to open after this process exits, then exits.
    fn relaunch(&self, bundle: &Path);
    fn terminate(&self);
}

#[derive(Default)]
pub struct MacHost {
    // Relocate this bundle instead of the running one.
    bundle: Option<PathBuf>,
    // Keep running after starting the relaunch helper.
    no_exit: bool,
}

impl MacHost {
    pub fn new() -> MacHost {
        MacHost::default()
    }

    pub fn for_bundle(bundle: PathBuf) -> MacHost {
        MacHost {
            bundle: Some(bundle),
            no_exit: true,
        }
    }
}

impl Host for MacHost {
    fn bundle_path(&self) -> Option<PathBuf> {
        if let Some(bundle) = &self.bundle {
            return Some(bundle.clone());
        }

        match misc::current_bundle() {
            Ok(x) => Some(x),
            Err(msg) => {
                info!("{msg}");
                None
            }
        }
    }

    fn is_installed(&self, bundle: &Path) -> bool {
        install_dir::is_installed(bundle)
    }

    fn preferred_install_directory(&self) -> Option<PathBuf> {
        install_dir::preferred_install_directory()
    }

    fn needs_authorization(&self, install_dir: &Path, destination: &Path) -> bool {
        fs_ops::needs_authorization(install_dir, destination)
    }

    fn activate(&self) {
        dialog::activate();
    }

    fn confirm(&self, prompt: &Prompt) -> bool {
        dialog::confirm(prompt)
    }

    fn authorized_install(&self, source: &Path, destination: &Path) -> AuthOutcome {
        privileged::authorized_install(source, destination)
    }

    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn is_running(&self, bundle: &Path) -> bool {
        workspace::is_application_at_url_running(bundle)
    }

    fn open(&self, bundle: &Path) {
        workspace::open(bundle);
    }

    fn trash(&self, path: &Path) -> Result<(), String> {
        workspace::trash(path)
    }

    fn copy(&self, source: &Path, destination: &Path) -> Result<(), String> {
        fs_ops::copy_bundle(source, destination)
    }

    fn remove(&self, path: &Path) -> Result<(), String> {
        fs_ops::remove_bundle(path)
    }

    fn relaunch(&self, bundle: &Path) {
        if self.no_exit {
            let handle = relaunch::relaunch(bundle, || info!("Relaunch helper started"));
            if handle.join().is_err() {
                error!("Relaunch thread panicked");
            }
        } else {
            let _ = relaunch::relaunch(bundle, dialog::exit_on_main_thread);
        }
    }

    fn terminate(&self) {
        error!("Relocation failed, terminating");
        dialog::terminate();
    }
}
