// src/cli.rs
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wizard", version, about = "Enroll terminal wizard")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run the interactive wizard
    Run {
        /// Tick rate, i.e. number of ticks per second
        #[arg(short, long, value_name = "FLOAT")]
        tick_rate: Option<f64>,

        /// Frame rate, i.e. number of frames per second
        #[arg(short, long, value_name = "FLOAT")]
        frame_rate: Option<f64>,
    },
    /// Print persisted wizard state as JSON (scripts/monitoring)
    Inspect,
    /// Clear the persisted record and screen
    Reset,
}
