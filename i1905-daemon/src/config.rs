//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    // AL MAC address in colon-separated notation.
    pub al_mac: String,
    // Interfaces attached to the AL.
    pub interfaces: Vec<String>,
    pub max_segment_size: u16,
    pub reassembly_timeout_ms: u32,
    pub strict_reassembly: bool,
    pub discovery_interval_secs: u64,
    // Log verbosity, 0 (errors only) to 3 (packet traces).
    pub verbosity: u8,
    pub registrar: Registrar,
    pub logging: Logging,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Registrar {
    pub enabled: bool,
    // One of "2.4GHz", "5GHz" or "60GHz".
    pub band: String,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub style: LoggingFmtStyle,
    pub colors: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/i1905d.toml";

    pub(crate) fn load(config_file: Option<&str>) -> Config {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => toml::from_str(&config_str)
                .expect("Failed to parse configuration file"),
            Err(err) => {
                eprintln!("Failed to load configuration file: {err}");
                eprintln!("Falling back to default configuration...");
                Config::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            al_mac: String::new(),
            interfaces: vec![],
            max_segment_size: 1500,
            reassembly_timeout_ms: 10000,
            strict_reassembly: false,
            discovery_interval_secs: 60,
            verbosity: 2,
            registrar: Registrar::default(),
            logging: Logging::default(),
        }
    }
}

// ===== impl Registrar =====

impl Default for Registrar {
    fn default() -> Registrar {
        Registrar {
            enabled: false,
            band: "2.4GHz".to_owned(),
        }
    }
}

// ===== impl Logging =====

impl Default for Logging {
    fn default() -> Logging {
        Logging {
            style: LoggingFmtStyle::Full,
            colors: true,
        }
    }
}
