//! Level grid loading
//!
//! One JSON file per level; the `"grid"` key holds the two-dimensional cell
//! array. Files are consumed in lexicographic filename order, which fixes
//! the level sequence. Files without a `"grid"` key are skipped; unreadable
//! or malformed files are fatal at startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// A level layout: rows of cell codes
pub type Grid = Vec<Vec<u8>>;

/// Grid cell codes
pub const CELL_EMPTY: u8 = 0;
pub const CELL_WALL: u8 = 1;
pub const CELL_BOTTLE: u8 = 2;
pub const CELL_PLAYER_START: u8 = 8;
pub const CELL_EXIT: u8 = 9;

/// Errors surfaced while loading the level directory
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not find level directory '{0}'")]
    MissingDir(PathBuf),
    #[error("'{0}' is not a directory")]
    NotADir(PathBuf),
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct LevelFile {
    grid: Option<Grid>,
}

/// Read every level file in `level_dir`, in lexicographic filename order
pub fn read_levels(level_dir: &Path) -> Result<Vec<Grid>, LevelError> {
    if !level_dir.exists() {
        return Err(LevelError::MissingDir(level_dir.to_path_buf()));
    }
    if !level_dir.is_dir() {
        return Err(LevelError::NotADir(level_dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(level_dir)
        .map_err(|source| LevelError::Io {
            path: level_dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path.clone(),
            source,
        })?;
        let file: LevelFile = serde_json::from_str(&text).map_err(|source| LevelError::Parse {
            path: path.clone(),
            source,
        })?;

        match file.grid {
            Some(grid) => levels.push(grid),
            None => log::warn!("{} has no \"grid\" key, skipping", path.display()),
        }
    }

    log::info!("loaded {} level(s) from {}", levels.len(), level_dir.display());
    Ok(levels)
}
