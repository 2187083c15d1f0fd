use anyhow::{Context, Result};
use cardscan_core::ScanConfig;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{cardscan_home, ensure_cardscan_home};

pub fn config_path() -> Result<PathBuf> {
    Ok(cardscan_home()?.join("config.toml"))
}

/// Load config from `path`, or from `~/.cardscan/config.toml`. A missing
/// default file means defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(ScanConfig::default());
            }
            p
        }
    };
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    ScanConfig::from_toml(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &ScanConfig, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    ensure_cardscan_home()?;
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&ScanConfig::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
