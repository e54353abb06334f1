use std::env::VarError;
use std::path::PathBuf;
use std::str::FromStr;

use log::error;

pub const LEVEL_KEY: &str = "APP_MOVER_LOG_LEVEL";
pub const PATH_KEY: &str = "APP_MOVER_LOG_PATH";

// Default filename if path given is a directory, default directory is $HOME, or no $HOME, /
const DEFAULT_FILE: &str = "app_mover_log.txt";

fn log_path(var: Result<String, VarError>) -> PathBuf {
    let mut path = match var {
        Ok(x) => PathBuf::from(x),
        Err(VarError::NotPresent) => PathBuf::new(),
        Err(VarError::NotUnicode(x)) => PathBuf::from(x),
    };

    // The path is always set to _something_ as close to valid as can be managed,
    // the level controls whether logging happens.
    if path == PathBuf::new() {
        path = home::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    }

    if path.is_dir() {
        path.push(DEFAULT_FILE);
    }

    path
}

fn log_level(var: Result<String, VarError>) -> Result<Option<log::Level>, String> {
    match var {
        Ok(x) => Some(log::Level::from_str(x.as_str()).map_err(|e| e.to_string())).transpose(),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(x)) => {
            Err(format!("Non-unicode {LEVEL_KEY} value: {}", x.to_string_lossy()))
        }
    }
}

// Logging is off unless APP_MOVER_LOG_LEVEL is set. Safe to call more than once;
// only the first call installs a logger.
pub fn init_log() {
    let path = log_path(std::env::var(PATH_KEY));

    let (level, bad_level) = match log_level(std::env::var(LEVEL_KEY)) {
        Ok(Some(lev)) => (lev, None),
        Ok(None) => return, // No logging requested
        Err(msg) => (log::Level::max(), Some(msg)),
    };

    if let Err(e) = simple_logging::log_to_file(&path, level.to_level_filter()) {
        eprintln!("Couldn't log to '{}': {e}", path.display());
        return;
    }

    if let Some(msg) = bad_level {
        error!("Invalid filter {msg}, set to max");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(log_level(Err(VarError::NotPresent)), Ok(None));
        assert_eq!(log_level(Ok("debug".to_owned())), Ok(Some(log::Level::Debug)));
        assert!(log_level(Ok("loud".to_owned())).is_err());
    }

    #[test]
    fn directory_path_gets_default_file() {
        let tmp = tempdir::TempDir::new("app-mover-log").unwrap();
        let path = log_path(Ok(tmp.path().to_string_lossy().into_owned()));
        assert_eq!(path, tmp.path().join(DEFAULT_FILE));

        let file = tmp.path().join("custom.log");
        assert_eq!(log_path(Ok(file.to_string_lossy().into_owned())), file);
    }
}
