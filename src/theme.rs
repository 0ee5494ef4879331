//! Sprite theme discovery and validation
//!
//! A theme is a directory mapping the six entity names to image files by
//! file stem. The simulation never opens the images; a theme is only the
//! name-to-path table the renderer resolves drawables through.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::sim::EntityKind;

/// Errors surfaced while discovering themes
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("could not find theme directory '{0}'")]
    MissingDir(PathBuf),
    #[error("'{0}' is not a directory")]
    NotADir(PathBuf),
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A named set of sprite assets, one per entity kind
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    assets: BTreeMap<&'static str, PathBuf>,
    missing: Vec<&'static str>,
}

impl Theme {
    /// Build a theme from a directory, matching files by stem
    pub fn from_dir(theme_path: &Path) -> Result<Self, ThemeError> {
        if !theme_path.is_dir() {
            return Err(ThemeError::NotADir(theme_path.to_path_buf()));
        }

        let name = theme_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut assets = BTreeMap::new();
        let entries = fs::read_dir(theme_path).map_err(|source| ThemeError::Io {
            path: theme_path.to_path_buf(),
            source,
        })?;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if let Some(kind) = EntityKind::ALL.iter().find(|k| k.as_str() == stem) {
                assets.insert(kind.as_str(), path);
            }
        }

        let missing: Vec<&'static str> = EntityKind::ALL
            .iter()
            .map(|k| k.as_str())
            .filter(|name| !assets.contains_key(name))
            .collect();

        Ok(Self { name, assets, missing })
    }

    /// A theme is usable only when every entity kind has an asset
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Asset names this theme fails to provide
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }

    /// Path of the asset for an entity kind
    pub fn asset(&self, kind: EntityKind) -> Option<&Path> {
        self.assets.get(kind.as_str()).map(|p| p.as_path())
    }
}

/// Discover every valid theme under `theme_dir`; invalid themes are
/// skipped with a warning
pub fn load_themes(theme_dir: &Path) -> Result<Vec<Theme>, ThemeError> {
    if !theme_dir.exists() {
        return Err(ThemeError::MissingDir(theme_dir.to_path_buf()));
    }
    if !theme_dir.is_dir() {
        return Err(ThemeError::NotADir(theme_dir.to_path_buf()));
    }

    let mut dirs: Vec<PathBuf> = fs::read_dir(theme_dir)
        .map_err(|source| ThemeError::Io {
            path: theme_dir.to_path_buf(),
            source,
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    let mut themes = Vec::new();
    for dir in dirs {
        let theme = Theme::from_dir(&dir)?;
        if !theme.is_valid() {
            log::warn!(
                "theme '{}' is missing assets {:?}, skipping",
                theme.name,
                theme.missing()
            );
            continue;
        }
        themes.push(theme);
    }

    log::info!("found {} usable theme(s)", themes.len());
    Ok(themes)
}
