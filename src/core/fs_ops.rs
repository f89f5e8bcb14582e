// src/core/fs_ops.rs
//! File access for the database location, draft files and exports

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::app_log;

const UTF8_BOM: char = '\u{feff}';

pub struct FsOps;

impl FsOps {
    /// Create the directory that will hold `file` (a database or an export)
    pub async fn ensure_parent_dir(file: &Path) -> Result<()> {
        let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            app_log!(info, "Created directory: {}", parent.display());
        }
        Ok(())
    }

    /// Read a draft or import file. Spreadsheet tools often prefix CSV and
    /// JSON exports with a byte order mark; it is dropped here.
    pub async fn read_draft_file(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read draft file: {}", path.display()))?;

        Ok(match content.strip_prefix(UTF8_BOM) {
            Some(rest) => rest.to_string(),
            None => content,
        })
    }

    /// Write an export next to its destination, then rename it into place so
    /// an interrupted export never leaves a truncated file behind.
    pub async fn write_export(path: &Path, content: &str) -> Result<()> {
        Self::ensure_parent_dir(path).await?;

        let staging = staging_path(path);
        fs::write(&staging, content)
            .await
            .with_context(|| format!("Failed to write export: {}", staging.display()))?;
        fs::rename(&staging, path)
            .await
            .with_context(|| format!("Failed to move export into place: {}", path.display()))?;

        app_log!(info, "Exported saved fields to {}", path.display());
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
