//! Settings of the server and client binaries.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;

/// Environment variable holding the path of an optional JSON settings file.
pub const CONFIG_PATH_VAR: &str = "TCHU_CONFIG";
pub const HOST_VAR: &str = "TCHU_HOST";
pub const PORT_VAR: &str = "TCHU_PORT";

/// Where to meet, and who plays.
///
/// # JSON
/// Every field is optional:
/// ```json
/// {"host": "localhost", "port": 5108, "player_names": ["Ada", "Charles"], "player_count": 2, "seed": 7}
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Names in seating order. Remote players choose their own name.
    pub player_names: Vec<String>,
    pub player_count: usize,
    /// Makes the deals and the bots reproducible.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5108,
            player_names: vec!["Ada".to_string(), "Charles".to_string(), "Michel".to_string()],
            player_count: 2,
            seed: None,
        }
    }
}

impl Settings {
    /// Reads the file named by `TCHU_CONFIG` if any, then applies `TCHU_HOST` and `TCHU_PORT`.
    pub fn load() -> anyhow::Result<Self> {
        let json = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Some(
                fs::read_to_string(&path)
                    .with_context(|| format!("Could not read the settings file {}", path))?,
            ),
            Err(_) => None,
        };
        Self::from_sources(
            json.as_deref(),
            env::var(HOST_VAR).ok(),
            env::var(PORT_VAR).ok(),
        )
    }

    /// Settings from an optional JSON document, overridden by an optional host and port.
    pub fn from_sources(
        json: Option<&str>,
        host: Option<String>,
        port: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut settings = match json {
            Some(json) => serde_json::from_str(json).context("Invalid settings")?,
            None => Settings::default(),
        };
        if let Some(host) = host {
            settings.host = host;
        }
        if let Some(port) = port {
            settings.port = port
                .parse()
                .with_context(|| format!("{} is not a valid port", port))?;
        }
        Ok(settings)
    }

    /// The name of the player in `seat`, starting at 0.
    pub fn player_name(&self, seat: usize) -> String {
        self.player_names
            .get(seat)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", seat + 1))
    }
}
