// file: src/input/scanner.rs
// description: collects candidate documents from files and directories
// reference: https://docs.rs/walkdir

use crate::config::InputConfig;
use crate::error::{PipelineError, Result};
use crate::models::BatchItem;
use crate::utils::Validator;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ScannedFile {
    pub fn into_item(self) -> BatchItem {
        BatchItem::from_path(self.path, self.size)
    }
}

pub struct FileScanner {
    config: InputConfig,
}

impl FileScanner {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    /// Explicit files must pass validation. Directories are walked and
    /// anything that would fail validation is skipped with a log line.
    /// Order follows the arguments, then sorted paths within a directory.
    pub fn scan(&self, inputs: &[PathBuf]) -> Result<Vec<ScannedFile>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_dir() {
                files.extend(self.scan_directory(input)?);
            } else {
                files.push(self.check_file(input)?);
            }
        }

        info!("Collected {} documents", files.len());
        Ok(files)
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root)?;
        info!("Scanning directory: {}", root.display());

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if Validator::validate_extension(path, &self.config.allowed_extensions).is_err() {
                debug!("Skipping file with unsupported type: {}", path.display());
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                warn!("Cannot read metadata, skipping: {}", path.display());
                continue;
            };

            if let Err(e) =
                Validator::validate_file_size(path, metadata.len(), self.config.max_file_size_mb)
            {
                warn!("{}", e);
                continue;
            }

            files.push(ScannedFile {
                path: path.to_path_buf(),
                size: metadata.len(),
            });
        }

        debug!("Found {} documents under {}", files.len(), root.display());
        Ok(files)
    }

    fn check_file(&self, path: &Path) -> Result<ScannedFile> {
        Validator::validate_file_path(path)?;
        Validator::validate_extension(path, &self.config.allowed_extensions)?;

        let size = std::fs::metadata(path)
            .map_err(|source| PipelineError::FileOperation {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        Validator::validate_file_size(path, size, self.config.max_file_size_mb)?;

        Ok(ScannedFile {
            path: path.to_path_buf(),
            size,
        })
    }
}
