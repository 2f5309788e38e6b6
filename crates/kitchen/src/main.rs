use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;

mod actions;
mod app;
mod commands;
mod config;
mod logger;
mod reducers;
mod state;

use app::Flow;
use config::Config;

fn main() -> anyhow::Result<()> {
    // An explicit config path must load; otherwise fall back to the usual search
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_from(&path)?,
        None => Config::load(),
    };

    logger::init(config.log_file.as_deref())?;
    log::info!("Starting kitchen");
    log::debug!("Config: {:?}", config);

    let store = app::build_store(&config)?;
    let _subscriptions = app::install_listeners(&store, &config);

    let result = run(&store);

    log::info!("Exiting kitchen");
    result
}

fn run(store: &app::KitchenStore) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        match app::handle_line(store, &line, &mut stdout) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                log::debug!("Command `{}` failed: {:?}", line.trim(), e);
                eprintln!("error: {:#}", e);
            }
        }
        stdout.flush().context("Failed to flush stdout")?;
    }

    Ok(())
}
