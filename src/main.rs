mod app;
mod cleaner;
mod cli;
mod constants;
mod model;
mod output;
mod scanner;

use anyhow::Result;
use clap::Parser;

use crate::app::App;
use crate::cli::Cli;

fn main() -> Result<()> {
    let config = Cli::parse().into_config();
    App::new(config).run()?;
    Ok(())
}
