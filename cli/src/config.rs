use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "dr-egeria.toml";

/// Connection settings for the view server, read from a TOML file. Every
/// field has a default so a missing file still yields a usable config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub platform_url: String,
    pub view_server: String,
    pub user: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            platform_url: "https://localhost:9443".to_string(),
            view_server: "view-server".to_string(),
            user: "erinoverview".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file is not an error when it is the
    /// default location; an explicitly named file must exist.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, String> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if !explicit && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Config::default());
            }
            Err(e) => return Err(format!("cannot read '{}': {}", path.display(), e)),
        };
        toml::from_str(&text).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
    }
}
