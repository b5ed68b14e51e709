use anyhow::Result;
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_PATH, DEFAULT_CONFIG_TEMPLATE};
use crate::io;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(DEFAULT_CONFIG_PATH);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    println!("Created {DEFAULT_CONFIG_PATH} configuration file");

    Ok(())
}
