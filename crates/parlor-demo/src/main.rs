//! # Parlor Shell
//!
//! Terminal front end for a single in-memory chat room.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default settings
//! parlor
//!
//! # Run with custom config
//! parlor --config /path/to/parlor.toml
//!
//! # More verbose logging
//! PARLOR_LOG=parlor_core=debug parlor
//! ```

mod config;
mod metrics;
mod render;
mod shell;

use anyhow::{bail, Context, Result};
use parlor_core::RoomFacade;
use render::Renderer;
use shell::{Command, Reply, Shell};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing on stderr so stdout carries only the room.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("PARLOR_LOG")
                .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| "parlor=info,parlor_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config_path = config_path_from_args(std::env::args().skip(1))?;
    let config = config::Config::load(config_path.as_deref())?;

    if config.metrics.enabled {
        metrics::init_metrics();
        metrics::start_metrics_server(config.metrics.port)?;
    }

    // The room is owned here and handed to the shell.
    let mut room = RoomFacade::with_config(config.room_config()?);
    let renderer = Renderer::from(&config.render);
    let listener_renderer = renderer.clone();
    room.subscribe(move |snapshot| println!("{}", listener_renderer.render(snapshot)));

    let mut shell = Shell::new(room, move |room| renderer.render(&room.snapshot()));
    info!("Room ready; type `help` for commands");

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        match Command::parse(&line) {
            Ok(Some(command)) => match shell.execute(command) {
                Reply::Done => {}
                Reply::Print(text) => println!("{text}"),
                Reply::Quit => break,
            },
            Ok(None) => {}
            Err(e) => {
                metrics::record_error("parse");
                warn!("{e}");
            }
        }
    }

    info!(messages = shell.room().messages().len(), "Room closed");
    Ok(())
}

fn config_path_from_args(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>> {
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config requires a path")?;
                path = Some(PathBuf::from(value));
            }
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|s| (*s).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn test_config_arg() {
        assert_eq!(config_path_from_args(args(&[])).unwrap(), None);
        assert_eq!(
            config_path_from_args(args(&["--config", "room.toml"])).unwrap(),
            Some(PathBuf::from("room.toml"))
        );
        assert!(config_path_from_args(args(&["--config"])).is_err());
        assert!(config_path_from_args(args(&["--verbose"])).is_err());
    }
}
