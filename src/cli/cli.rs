
use app_mover::config::Config;
use app_mover::host::MacHost;
use app_mover::mover::Mover;
use app_mover::{install_dir, logging, relaunch, workspace};

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "Inspect and exercise the Applications folder mover")]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the Applications directory a bundle would be moved to.
    PreferredDir,

    /// Exit successfully if the bundle is already in an Applications directory.
    IsInstalled { bundle: PathBuf },

    /// Exit successfully if an app is running from the bundle.
    IsRunning { bundle: PathBuf },

    /// Remove the quarantine attribute from the bundle.
    StripQuarantine { bundle: PathBuf },

    /// Run the whole move flow for the bundle, prompting as the app would.
    Move {
        #[arg(long)]
        bundle: PathBuf,

        /// JSON file with dialog strings, as would be in the bundle's Resources.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn check(ok: bool) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        std::process::exit(1)
    }
}

fn main() -> Result<(), String> {
    logging::init_log();
    let args = Args::parse();

    match args.command {
        Cmd::PreferredDir => {
            let dir = install_dir::preferred_install_directory()
                .ok_or_else(|| "No usable Applications directory".to_owned())?;
            println!("{}", dir.display());
            Ok(())
        }
        Cmd::IsInstalled { bundle } => check(install_dir::is_installed(&bundle)),
        Cmd::IsRunning { bundle } => {
            let running = workspace::running_application_paths()?;
            check(workspace::is_among(&bundle, &running))
        }
        Cmd::StripQuarantine { bundle } => relaunch::strip_quarantine(&bundle),
        Cmd::Move { bundle, config } => {
            let config = match config {
                Some(path) => Config::load_file(&path)?,
                None => Config::default(),
            };

            let host = MacHost::for_bundle(bundle);
            let outcome = Mover::new(&host, &config).run();
            println!("{outcome:?}");
            check(outcome.relocated())
        }
    }
}

