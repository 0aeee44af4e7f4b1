//! Where reelkit keeps its durable state on disk.

use std::path::PathBuf;

use directories::ProjectDirs;

/// Overrides the platform data directory; handy for scripted runs and
/// for keeping throwaway sessions out of the real store.
pub const DATA_DIR_ENV: &str = "REELKIT_DATA_DIR";

const PROJECT_DB_FILENAME: &str = "projects.sqlite3";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not resolve a data directory for this platform")]
    NoDataDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The directory durable application state lives in. `REELKIT_DATA_DIR`
/// wins when set; otherwise the platform-local data dir.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("dev", "reelkit", "reelkit")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .ok_or(Error::NoDataDir)
}

/// Default path of the project database, with its directory created.
pub fn project_db_path() -> Result<PathBuf> {
    let dir = data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(PROJECT_DB_FILENAME))
}
