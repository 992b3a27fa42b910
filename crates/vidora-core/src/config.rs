//! Configuration module
//!
//! Connection defaults are read from layered ini files: a system-wide file
//! at `/etc/vidora.cfg` overridden per key by a user file at `~/.vidora`.
//! Files that do not exist are skipped. Configuration is always loaded
//! explicitly and passed by reference; there is no process-global instance.

use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{Error, Result};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/vidora.cfg";
pub const USER_CONFIG_FILE: &str = ".vidora";

/// Section holding connection credentials and endpoints.
pub const CONNECTION_SECTION: &str = "Connection";

const DEFAULT_READ_URL: &str = "https://api.vidora.tv/services/library";
const DEFAULT_WRITE_URL: &str = "https://api.vidora.tv/services/post";

/// Layered ini configuration. Later-loaded layers take precedence, so the
/// user file wins over the system file for any key both define.
#[derive(Debug, Default, Clone)]
pub struct Config {
    // Highest precedence first.
    layers: Vec<Ini>,
}

impl Config {
    /// Loads the two fixed locations: `~/.vidora` over `/etc/vidora.cfg`.
    pub fn load() -> Self {
        let mut paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_FILE));
        }
        paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
        Self::from_paths(&paths)
    }

    /// Loads an explicit list of paths, highest precedence first. Missing
    /// or unreadable files are skipped.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        let layers = paths
            .iter()
            .filter_map(|p| Ini::load_from_file(p.as_ref()).ok())
            .collect();
        Config { layers }
    }

    /// Parses a single in-memory layer. Used by tests and tooling.
    pub fn from_str(contents: &str) -> Result<Self> {
        let ini = Ini::load_from_str(contents)
            .map_err(|e| Error::Config(format!("unparsable configuration: {e}")))?;
        Ok(Config { layers: vec![ini] })
    }

    /// Looks a key up across layers, first definition wins.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.layers
            .iter()
            .find_map(|ini| ini.get_from(Some(section), key))
            // Values are occasionally single-quoted in the wild.
            .map(|v| v.trim_matches('\''))
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get(section, key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    /// Returns a value or raises `Error::Config` naming the missing key.
    pub fn require(&self, section: &str, key: &str) -> Result<String> {
        self.get(section, key)
            .map(str::to_string)
            .ok_or_else(|| Error::Config(format!("missing '{key}' in [{section}]")))
    }

    /// The typed view of the `[Connection]` section.
    pub fn connection(&self) -> ConnectionConfig {
        let get = |key: &str| self.get(CONNECTION_SECTION, key).map(str::to_string);
        ConnectionConfig {
            read_token: get("read_token"),
            write_token: get("write_token"),
            read_url: get("read_url").unwrap_or_else(|| DEFAULT_READ_URL.to_string()),
            write_url: get("write_url").unwrap_or_else(|| DEFAULT_WRITE_URL.to_string()),
            host: get("host"),
            user: get("user"),
            password: get("password"),
            publisher_id: get("publisher_id"),
            preparer: get("preparer"),
            report_success: self.get_bool(CONNECTION_SECTION, "report_success", false),
        }
    }
}

/// Resolved `[Connection]` values. Endpoint URLs fall back to the public
/// service defaults; everything else is optional until a transport that
/// needs it is constructed.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub read_token: Option<String>,
    pub write_token: Option<String>,
    pub read_url: String,
    pub write_url: String,
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub publisher_id: Option<String>,
    pub preparer: Option<String>,
    pub report_success: bool,
}
