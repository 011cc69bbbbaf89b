//! Config subcommand implementations.

use std::path::Path;
use tracing::info;

/// Prints the data length of the stored config.
pub fn get_size(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(path)?;
    println!("{}", store.get_config_size()?);
    Ok(())
}

/// Prints the stored config.
pub fn load(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(path)?;
    println!("{}", store.load_config()?);
    Ok(())
}

/// Stores a new config.
pub fn save(path: &Path, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = super::open_store(path)?;
    store.save_config(text)?;
    info!(len = text.len(), "config saved");
    Ok(())
}
