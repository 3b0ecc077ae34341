mod action;
mod app;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod machine;
mod pages;
mod record;
mod state;
mod store;
mod tui;

use clap::Parser;
use color_eyre::Result;

use crate::app::App;
use crate::cli::{Cli, Cmd};
use crate::config::Config;
use crate::store::{FileStore, StateStore};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    errors::init()?;

    match args.cmd {
        Cmd::Run {
            tick_rate,
            frame_rate,
        } => {
            logging::init()?;
            config::ensure_data_and_config_dirs_exist()?;
            let mut config = Config::new()?;
            if let Some(tick_rate) = tick_rate {
                config.config.tick_rate = tick_rate;
            }
            if let Some(frame_rate) = frame_rate {
                config.config.frame_rate = frame_rate;
            }
            let store = FileStore::new(config.config.data_dir.join(store::STORE_FILE));
            let mut app = App::new(config, Box::new(store))?;
            app.run().await?;
        }
        Cmd::Inspect => inspect()?,
        Cmd::Reset => reset()?,
    }

    Ok(())
}

fn open_store() -> Result<FileStore> {
    let config = Config::new()?;
    Ok(FileStore::new(
        config.config.data_dir.join(store::STORE_FILE),
    ))
}

/// Dump the persisted state for scripts and monitoring.
fn inspect() -> Result<()> {
    let store = open_store()?;
    let out = serde_json::json!({
        "record": store::load_record(&store),
        "screen": store.get(store::CURRENT_SCREEN_KEY),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn reset() -> Result<()> {
    let mut store = open_store()?;
    store.remove(store::FORM_DATA_KEY)?;
    store.remove(store::CURRENT_SCREEN_KEY)?;
    Ok(())
}
