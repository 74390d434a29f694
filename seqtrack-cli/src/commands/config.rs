//! Config command implementation - emit an example configuration

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

pub fn execute(output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            Config::default().save_to_file(&path)?;
            log::info!("Wrote example configuration to {}", path.display());
        }
        None => println!("{}", Config::example_toml()?),
    }
    Ok(())
}
