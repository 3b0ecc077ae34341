use std::fs;
use std::{env, path::PathBuf};

use color_eyre::Result;
use lazy_static::lazy_static;
use paths::PathContext;
use serde::Deserialize;
use tracing::error;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
    /// Ticks per second driving animations and the resume timer.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Frames per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::default(),
            config_dir: PathBuf::default(),
            tick_rate: default_tick_rate(),
            frame_rate: default_frame_rate(),
        }
    }
}

fn default_tick_rate() -> f64 {
    4.0
}

fn default_frame_rate() -> f64 {
    60.0
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    static ref PATHS: PathContext = PathContext::new(env!("CARGO_PKG_NAME"));
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("config_dir", config_dir.to_string_lossy().as_ref())?
            .set_default("tick_rate", default_tick_rate())?
            .set_default("frame_rate", default_frame_rate())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            error!("No configuration file found. Application may not behave as expected");
        }

        let cfg: Self = builder.build()?.try_deserialize()?;

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PATHS.data_dir()
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PATHS.config_dir()
    }
}

pub fn get_logs_dir() -> PathBuf {
    // Logs follow a data-dir override.
    if let Some(s) = DATA_FOLDER.clone() {
        s.join("logs")
    } else {
        PATHS.logs_dir()
    }
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    for dir in [get_data_dir(), get_config_dir(), get_logs_dir()] {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_files() {
        let config = AppConfig::default();
        assert_eq!(config.tick_rate, 4.0);
        assert_eq!(config.frame_rate, 60.0);
    }
}
