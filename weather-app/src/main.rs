//! Binary crate for the `weather-app` terminal application.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - The frame-based render loop and its key bindings

use clap::Parser;

mod app;
mod cli;
mod input;
mod logging;
mod render;
mod runtime;
mod terminal_guard;
mod theme;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
