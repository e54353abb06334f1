use crate::misc::{is_bundle_path, sh_quote};
use crate::osa;

use std::path::Path;

use log::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    // User dismissed the password prompt.
    Cancelled,
    Failed(String),
    Succeeded,
}

fn check_paths(source: &Path, destination: &Path) -> Result<(), String> {
    if !is_bundle_path(destination) {
        crate::bailf!("Destination '{}' isn't an app bundle", destination.display());
    }
    for path in [source, destination] {
        if !path.is_absolute() || path.file_name().is_none() {
            crate::bailf!("'{}' isn't an absolute path to a file", path.display());
        }
    }
    if !source.exists() {
        crate::bailf!("Source '{}' doesn't exist", source.display());
    }
    Ok(())
}

// Delete-then-copy as one command, so the user sees a single password prompt.
pub fn install_command(source: &Path, destination: &Path) -> Result<String, String> {
    let (src, dst) = (sh_quote(source)?, sh_quote(destination)?);
    Ok(format!("rm -rf {dst} && cp -pR {src} {dst}"))
}

pub fn install_script(source: &Path, destination: &Path) -> Result<String, String> {
    let cmd = install_command(source, destination)?;
    Ok(format!(
        "do shell script {} with administrator privileges",
        osa::applescript_quote(&cmd)
    ))
}

pub fn authorized_install(source: &Path, destination: &Path) -> AuthOutcome {
    if let Err(msg) = check_paths(source, destination) {
        error!("Refusing authorized install: {msg}");
        return AuthOutcome::Failed(msg);
    }

    let script = match install_script(source, destination) {
        Ok(x) => x,
        Err(msg) => return AuthOutcome::Failed(msg),
    };

    info!("Authorized install '{}' -> '{}'", source.display(), destination.display());
    match osa::run(osa::Language::AppleScript, &script, [] as [&str; 0]) {
        Ok(_) => AuthOutcome::Succeeded,
        Err(e) if e.is_user_canceled() => {
            info!("User canceled authorization");
            AuthOutcome::Cancelled
        }
        Err(e) => {
            error!("Authorized install failed: {}", e.message);
            AuthOutcome::Failed(e.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_quotes_paths() {
        let cmd = install_command(
            Path::new("/Volumes/My Thing/Thing.app"),
            Path::new("/Applications/Thing.app"),
        ).unwrap();
        assert!(cmd.starts_with("rm -rf "));
        assert!(cmd.contains(" && cp -pR "));
        // The space must not split the source into two words.
        assert!(!cmd.contains("/Volumes/My Thing/Thing.app /Applications"));
        assert!(cmd.contains("/Applications/Thing.app"));
    }

    #[test]
    fn script_requests_administrator_privileges() {
        let script = install_script(
            Path::new("/Volumes/Thing/Thing.app"),
            Path::new("/Applications/Thing.app"),
        ).unwrap();
        assert!(script.starts_with("do shell script \"rm -rf "));
        assert!(script.ends_with("\" with administrator privileges"));
    }

    #[test]
    fn rejects_non_bundle_destination() {
        let outcome = authorized_install(Path::new("/"), Path::new("/Applications/Thing"));
        assert!(matches!(outcome, AuthOutcome::Failed(_)));
    }

    #[test]
    fn rejects_relative_and_missing_paths() {
        let outcome = authorized_install(Path::new("Thing.app"), Path::new("/Applications/Thing.app"));
        assert!(matches!(outcome, AuthOutcome::Failed(_)));

        let outcome = authorized_install(
            Path::new("/definitely/not/here/Thing.app"),
            Path::new("/Applications/Thing.app"),
        );
        assert!(matches!(outcome, AuthOutcome::Failed(_)));
    }
}
