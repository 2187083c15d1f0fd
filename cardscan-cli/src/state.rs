//! Where cardscan keeps its files: `$CARDSCAN_HOME`, else `~/.cardscan`.

use anyhow::{Context, Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

/// Pick the data directory from the two environment values. An explicit
/// `CARDSCAN_HOME` is used as-is; blank values count as unset.
fn resolve_home(cardscan_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    let non_empty = |v: Option<OsString>| v.filter(|s| !s.is_empty());
    if let Some(dir) = non_empty(cardscan_home) {
        return Ok(PathBuf::from(dir));
    }
    match non_empty(home) {
        Some(home) => Ok(PathBuf::from(home).join(".cardscan")),
        None => bail!("neither CARDSCAN_HOME nor HOME is set"),
    }
}

pub fn cardscan_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os("CARDSCAN_HOME"), std::env::var_os("HOME"))
}

pub fn ensure_cardscan_home() -> Result<PathBuf> {
    let dir = cardscan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
