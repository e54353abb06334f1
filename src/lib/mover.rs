use crate::config::Config;
use crate::dialog::Prompt;
use crate::host::Host;
use crate::misc::display_name;
use crate::privileged::AuthOutcome;

use std::path::Path;

use log::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    // Not in a bundle, already installed, or nowhere to install to.
    NotNeeded,
    Declined,
    // Destination is a running app, which was brought forward instead.
    AlreadyRunning,
    Failed(String),
    // Authorized copy failed and the app was told to quit.
    Terminated,
    // Too many cancelled password prompts.
    GaveUp,
    Relocated,
}

impl MoveOutcome {
    pub fn relocated(&self) -> bool {
        *self == MoveOutcome::Relocated
    }
}

// Result of one pass through the flow.
enum Attempt {
    Done(MoveOutcome),
    Retry,
}

pub struct Mover<'a, H: Host> {
    host: &'a H,
    config: &'a Config,
}

impl<'a, H: Host> Mover<'a, H> {
    pub fn new(host: &'a H, config: &'a Config) -> Self {
        Mover { host, config }
    }

    // Each cancelled password prompt starts over from the top, so the user can
    // reconsider; declining the move prompt ends it.
    pub fn run(&self) -> MoveOutcome {
        for attempt in 1..=self.config.max_attempts.max(1) {
            debug!("Move attempt {attempt}");
            match self.attempt() {
                Attempt::Done(outcome) => {
                    info!("Move finished: {outcome:?}");
                    return outcome;
                }
                Attempt::Retry => info!("Authorization cancelled, asking again"),
            }
        }

        warn!("Giving up after {} cancelled authorizations", self.config.max_attempts);
        MoveOutcome::GaveUp
    }

    fn attempt(&self) -> Attempt {
        let host = self.host;

        let Some(bundle) = host.bundle_path() else {
            return Attempt::Done(MoveOutcome::NotNeeded);
        };
        if host.is_installed(&bundle) {
            debug!("'{}' is already installed", bundle.display());
            return Attempt::Done(MoveOutcome::NotNeeded);
        }
        let Some(install_dir) = host.preferred_install_directory() else {
            info!("No Applications directory to move to");
            return Attempt::Done(MoveOutcome::NotNeeded);
        };
        let Some(bundle_name) = bundle.file_name() else {
            return Attempt::Done(MoveOutcome::NotNeeded);
        };

        let destination = install_dir.join(bundle_name);
        let needs_auth = host.needs_authorization(&install_dir, &destination);

        host.activate();

        let prompt = Prompt {
            message: self.config.message.clone(),
            informative: self.config.informative_text(&display_name(&bundle), needs_auth),
            move_button: self.config.move_button.clone(),
            cancel_button: self.config.cancel_button.clone(),
        };
        if !host.confirm(&prompt) {
            info!("User declined moving '{}'", bundle.display());
            return Attempt::Done(MoveOutcome::Declined);
        }

        if needs_auth {
            match host.authorized_install(&bundle, &destination) {
                AuthOutcome::Cancelled => return Attempt::Retry,
                AuthOutcome::Failed(msg) => {
                    error!("Authorized install failed: {msg}");
                    host.terminate();
                    return Attempt::Done(MoveOutcome::Terminated);
                }
                AuthOutcome::Succeeded => (),
            }
        } else if let Err(outcome) = self.plain_install(&bundle, &destination) {
            return Attempt::Done(outcome);
        }

        // The copy is what matters; a leftover original is only clutter.
        if let Err(msg) = host.remove(&bundle) {
            warn!("Couldn't remove original '{}': {msg}", bundle.display());
        }

        info!("Moved '{}' to '{}', relaunching", bundle.display(), destination.display());
        host.relaunch(&destination);

        Attempt::Done(MoveOutcome::Relocated)
    }

    fn plain_install(&self, bundle: &Path, destination: &Path) -> Result<(), MoveOutcome> {
        let host = self.host;

        if host.exists(destination) {
            if host.is_running(destination) {
                info!("'{}' is running, bringing it forward", destination.display());
                host.open(destination);
                return Err(MoveOutcome::AlreadyRunning);
            }

            host.trash(destination).map_err(|msg| {
                error!("{msg}");
                MoveOutcome::Failed(msg)
            })?;
        }

        host.copy(bundle, destination).map_err(|msg| {
            error!("{msg}");
            MoveOutcome::Failed(msg)
        })
    }
}
