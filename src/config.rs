//! Command-line options and the paths derived from them.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::store::DEFAULT_LIBRARY_FILE;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".book-catalog";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "book-catalog.log";

/// Cover picture looked up next to the library file's working directory.
pub const LOCAL_COVER_PATH: &str = "library_cover.jpg";
/// Fallback cover when no local picture exists.
pub const COVER_IMAGE_URL: &str =
    "https://images.pexels.com/photos/159711/books-bookstore-book-reading-159711.jpeg";

#[derive(Debug, Parser)]
#[command(name = "book-catalog", version, about = "Manage a personal book collection")]
pub struct Cli {
    /// JSON file holding the library
    #[arg(long, default_value = DEFAULT_LIBRARY_FILE)]
    pub file: PathBuf,

    /// Where to write logs (default: ~/.book-catalog/book-catalog.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub library_path: PathBuf,
    pub log_path: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let log_path = match cli.log_file {
            Some(path) => path,
            None => default_log_path()?,
        };
        Ok(Self {
            library_path: cli.file,
            log_path,
        })
    }
}

/// Resolve the log file inside the user's home.
fn default_log_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}

/// Where the home screen's cover picture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverImage {
    Local(PathBuf),
    Remote(&'static str),
}

impl CoverImage {
    /// Prefer the local picture when present.
    pub fn resolve(local: &Path) -> Self {
        if local.exists() {
            CoverImage::Local(local.to_path_buf())
        } else {
            CoverImage::Remote(COVER_IMAGE_URL)
        }
    }

    /// Something `open::that` understands.
    pub fn target(&self) -> String {
        match self {
            CoverImage::Local(path) => path.display().to_string(),
            CoverImage::Remote(url) => (*url).to_string(),
        }
    }
}
