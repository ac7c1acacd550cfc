//
// Copyright (c) The i1905 Contributors
//
// SPDX-License-Identifier: MIT
//

#![warn(rust_2018_idioms)]

mod config;

use std::time::Duration;

use clap::{App, Arg};
use config::{Config, LoggingFmtStyle};
use i1905::instance::{self, Instance, RegistrarConfig};
use i1905::packet::consts::FreqBand;
use i1905_utils::mac_addr::MacAddr;
use nix::unistd::Uid;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

fn init_tracing(config: &Config) {
    let log_level_filter = match config.verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(config.logging.colors);
    let layer = match config.logging.style {
        LoggingFmtStyle::Compact => layer.compact().boxed(),
        LoggingFmtStyle::Full => layer.boxed(),
        LoggingFmtStyle::Json => layer.json().boxed(),
    };
    tracing_subscriber::registry()
        .with(layer.with_filter(log_level_filter))
        .init();
}

// Builds the instance configuration, validating the daemon configuration.
fn instance_config(config: &Config) -> Result<instance::Config, String> {
    let al_mac = config
        .al_mac
        .parse::<MacAddr>()
        .map_err(|_| format!("invalid AL MAC address: {:?}", config.al_mac))?;
    if config.interfaces.is_empty() {
        return Err("no interfaces configured".to_owned());
    }

    let registrar = if config.registrar.enabled {
        let band = match config.registrar.band.as_str() {
            "2.4GHz" => FreqBand::Band2_4GHz,
            "5GHz" => FreqBand::Band5GHz,
            "60GHz" => FreqBand::Band60GHz,
            band => {
                return Err(format!("invalid frequency band: {band:?}"));
            }
        };
        Some(RegistrarConfig { band })
    } else {
        None
    };

    Ok(instance::Config {
        al_mac,
        interfaces: config.interfaces.clone(),
        max_segment_size: config.max_segment_size,
        reassembly_timeout: Duration::from_millis(
            config.reassembly_timeout_ms.into(),
        ),
        strict_reassembly: config.strict_reassembly,
        discovery_interval: Duration::from_secs(
            config.discovery_interval_secs,
        ),
        registrar,
    })
}

fn main() {
    // Parse command-line parameters.
    let matches = App::new("i1905d")
        .version(env!("CARGO_PKG_VERSION"))
        .author("The i1905 Contributors")
        .about("IEEE 1905.1/1a abstraction layer daemon")
        .arg(
            Arg::with_name("config_file")
                .short("f")
                .long("config-file")
                .value_name("path")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .long("verbosity")
                .value_name("level")
                .help("Log verbosity (0-3), overriding the configuration"),
        )
        .get_matches();

    // Read configuration file.
    let mut config = Config::load(matches.value_of("config_file"));
    if let Some(verbosity) = matches.value_of("verbosity") {
        config.verbosity = verbosity
            .parse()
            .expect("Invalid verbosity level");
    }

    init_tracing(&config);

    // Raw packet sockets require CAP_NET_RAW.
    if !Uid::effective().is_root() {
        error!("i1905d must run with root privileges");
        std::process::exit(1);
    }

    let instance_config = match instance_config(&config) {
        Ok(instance_config) => instance_config,
        Err(error) => {
            error!(%error, "invalid configuration");
            std::process::exit(1);
        }
    };

    info!("starting up");
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");
    rt.block_on(async {
        let instance = Instance::new(instance_config);
        tokio::select! {
            result = instance.run() => {
                if let Err(error) = result {
                    error!(%error, "instance terminated");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received interrupt signal, shutting down");
            }
        }
    });
    info!("exiting");
}
