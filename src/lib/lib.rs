//! Offers to move a macOS app bundle into the Applications folder the first time
//! it's launched from somewhere else (a disk image, Downloads), then relaunches
//! the moved copy.
//!
//! Call [`move_if_necessary`] early at startup, before showing any windows:
//!
//! ```no_run
//! if app_mover::move_if_necessary() {
//!     // The moved copy is about to start, this process exits shortly.
//!     return;
//! }
//! ```

pub mod config;
pub mod dialog;
pub mod fs_ops;
pub mod host;
pub mod install_dir;
pub mod logging;
pub mod misc;
pub mod mover;
pub mod osa;
pub mod privileged;
pub mod relaunch;
pub mod workspace;

use crate::config::Config;
use crate::host::MacHost;
use crate::mover::Mover;

use log::error;

pub use crate::install_dir::preferred_install_directory;
pub use crate::mover::MoveOutcome;
pub use crate::privileged::{authorized_install, AuthOutcome};
pub use crate::relaunch::relaunch;
pub use crate::workspace::is_application_at_url_running;

/// Moves the running bundle to the Applications folder if it isn't there yet and
/// the user agrees. Returns true if the moved copy is being relaunched, in which
/// case this process exits on its own; false means carry on as usual.
pub fn move_if_necessary() -> bool {
    let config = match Config::load() {
        Ok(x) => x,
        Err(msg) => {
            error!("Error loading config, using defaults: {msg}");
            Config::default()
        }
    };
    move_if_necessary_with(&config)
}

pub fn move_if_necessary_with(config: &Config) -> bool {
    Mover::new(&MacHost::new(), config).run().relocated()
}
