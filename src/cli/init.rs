//! `critiq init` - write an example critiq.toml

use crate::config::QualityConfig;
use anyhow::{bail, Result};
use std::path::Path;

pub fn run() -> Result<()> {
    let path = Path::new("critiq.toml");
    if path.exists() {
        bail!("critiq.toml already exists; remove it first to regenerate");
    }
    std::fs::write(path, QualityConfig::example_toml())?;
    println!("wrote critiq.toml");
    Ok(())
}
