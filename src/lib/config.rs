use std::path::Path;

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "app_mover.json";

// Optional overrides live in the bundle's Resources directory, so an app can
// localize the prompt without code changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub message: String,
    // `{name}` is replaced by the app's display name.
    pub informative: String,
    // Appended to `informative` when moving needs an administrator password.
    pub auth_note: String,
    pub move_button: String,
    pub cancel_button: String,

    // Upper bound on prompts when the user keeps cancelling the password dialog.
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            message: "Move to Applications folder".to_owned(),
            informative: "{name} needs to move to your Applications folder in order to work properly."
                .to_owned(),
            auth_note: " You need to authenticate with your administrator password to complete this step."
                .to_owned(),
            move_button: "Move to Applications Folder".to_owned(),
            cancel_button: "Do Not Move".to_owned(),
            max_attempts: 5,
        }
    }
}

fn ts<E: ToString>(e: E) -> String {
    e.to_string()
}

impl Config {
    // Defaults if not running from a bundle or the bundle carries no config.
    pub fn load() -> Result<Config, String> {
        match crate::misc::get_app_resources() {
            Ok(resources) => Config::load_from(&resources),
            Err(_) => Ok(Config::default()),
        }
    }

    pub fn load_from(resources: &Path) -> Result<Config, String> {
        let path = resources.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        Config::load_file(&path)
    }

    pub fn load_file(path: &Path) -> Result<Config, String> {
        let conf_str = std::fs::read_to_string(path).map_err(ts)?;
        let conf: Config = serde_json::from_str(&conf_str)
            .map_err(|e| format!("Error parsing '{}': {e}", path.display()))?;
        if conf.max_attempts == 0 {
            crate::bail!("Config's 'max_attempts' field must be at least 1".to_owned());
        }

        Ok(conf)
    }

    pub fn informative_text(&self, name: &str, needs_auth: bool) -> String {
        let mut text = self.informative.replace("{name}", name);
        if needs_auth {
            text.push_str(&self.auth_note);
        }
        text
    }
}
