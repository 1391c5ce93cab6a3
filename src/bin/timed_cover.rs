// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timed Cover - standalone host for a single window covering.
//!
//! Reads a JSON configuration, opens the covering and accepts commands on
//! standard input:
//!
//! - `get`: print the three characteristics
//! - `set <0-100>`: write the target position
//! - `state`: print the full state snapshot as JSON
//! - `quit`: exit

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use timed_cover::state::CoverState;
use timed_cover::{Characteristic, CoverConfig, Subscribable, WindowCovering};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Path to the JSON configuration.
    #[arg(short, long, default_value = "cover.json")]
    config: PathBuf,

    /// Suppress all network I/O regardless of the configuration.
    #[arg(long)]
    debug_mode: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn setup_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();
    setup_tracing(opts.verbose);

    let mut config = CoverConfig::from_file(&opts.config)?;
    if opts.debug_mode {
        config.debug_mode = true;
    }

    let covering = WindowCovering::http(config).build()?;

    // Host-side mirror, kept up to date from pushed changes only.
    let mirror = Arc::new(Mutex::new(covering.snapshot()));
    let m = Arc::clone(&mirror);
    covering.on_state_changed(move |change| {
        for (characteristic, value) in change.characteristic_updates() {
            tracing::info!(%characteristic, value, "Characteristic updated");
        }
        m.lock().apply(change);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("get"), None) => {
                for characteristic in Characteristic::ALL {
                    println!("{characteristic}: {}", covering.get(characteristic));
                }
            }
            (Some("set"), Some(value)) => match value.parse::<u8>() {
                Ok(value) => match covering.set(Characteristic::TargetPosition, value) {
                    Ok(outcome) => println!("{outcome:?}"),
                    Err(e) => eprintln!("{e}"),
                },
                Err(e) => eprintln!("invalid position '{value}': {e}"),
            },
            (Some("state"), None) => {
                let state: CoverState = mirror.lock().clone();
                println!("{}", serde_json::to_string_pretty(&state)?);
            }
            (Some("quit" | "exit"), None) => break,
            (None, _) => {}
            _ => eprintln!("commands: get | set <0-100> | state | quit"),
        }
    }

    Ok(())
}
