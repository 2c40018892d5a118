//! Where the contacts database lives when `--db-path` is not given.

use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "connectsphere";
const DB_FILENAME: &str = "connectsphere.sqlite3";

/// `$XDG_DATA_HOME/connectsphere`, else `~/.local/share/connectsphere`.
pub fn data_dir() -> Result<PathBuf> {
    let base = match env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        Some(path) if path.as_os_str().is_empty() => {
            return Err(StoreError::InvalidDataPath(path))
        }
        Some(path) => path,
        None => dirs::home_dir()
            .ok_or(StoreError::MissingHomeDir)?
            .join(".local")
            .join("share"),
    };
    Ok(base.join(APP_DIR))
}

/// Explicit path wins; otherwise the default file in [`data_dir`]. Missing
/// parent directories are created either way.
pub fn resolve_db_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) if path.as_os_str().is_empty() => Err(StoreError::InvalidDataPath(path)),
        Some(path) => {
            if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            Ok(path)
        }
        None => {
            let dir = data_dir()?;
            fs::create_dir_all(&dir)?;
            private_dir(&dir)?;
            Ok(dir.join(DB_FILENAME))
        }
    }
}

#[cfg(unix)]
fn private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn private_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
