// file: src/utils/validation.rs
// description: input validation for documents and screening requirements
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| {
            PipelineError::Validation(format!("Cannot access {}: {}", path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }

    /// `allowed` entries carry their leading dot, e.g. `.pdf`.
    pub fn validate_extension(path: &Path, allowed: &[String]) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();

        if allowed.iter().any(|a| a.eq_ignore_ascii_case(&extension)) {
            return Ok(());
        }

        Err(PipelineError::Validation(format!(
            "File type not allowed: {}. Allowed types: {}",
            path.display(),
            allowed.join(", ")
        )))
    }

    pub fn validate_file_size(path: &Path, size_bytes: u64, max_mb: usize) -> Result<()> {
        let max_bytes = (max_mb as u64) * 1024 * 1024;
        if size_bytes > max_bytes {
            return Err(PipelineError::Validation(format!(
                "File too large: {} ({:.1} MB, max {} MB)",
                path.display(),
                size_bytes as f64 / 1_048_576.0,
                max_mb
            )));
        }
        Ok(())
    }

    pub fn validate_requirements(requirements: &str) -> Result<()> {
        if requirements.trim().is_empty() {
            return Err(PipelineError::Validation(
                "Job requirements are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Cuts on a character boundary.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((index, _)) => format!("{}...", &text[..index]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn allowed() -> Vec<String> {
        vec![".pdf".to_string(), ".docx".to_string()]
    }

    #[test]
    fn test_validate_extension() {
        assert!(Validator::validate_extension(&PathBuf::from("cv.pdf"), &allowed()).is_ok());
        assert!(Validator::validate_extension(&PathBuf::from("CV.DOCX"), &allowed()).is_ok());
        assert!(Validator::validate_extension(&PathBuf::from("cv.doc"), &allowed()).is_err());
        assert!(Validator::validate_extension(&PathBuf::from("README"), &allowed()).is_err());
    }

    #[test]
    fn test_validate_file_size() {
        let path = PathBuf::from("cv.pdf");
        assert!(Validator::validate_file_size(&path, 10 * 1024 * 1024, 10).is_ok());
        assert!(Validator::validate_file_size(&path, 10 * 1024 * 1024 + 1, 10).is_err());
    }

    #[test]
    fn test_validate_requirements() {
        assert!(Validator::validate_requirements("5 years of Rust").is_ok());
        assert!(Validator::validate_requirements("   \n").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "content").unwrap();

        assert!(Validator::validate_file_path(file.path()).is_ok());
        assert!(Validator::validate_file_path(Path::new("/nonexistent/cv.pdf")).is_err());
        assert!(Validator::validate_directory(file.path()).is_err());
    }

    #[test]
    fn test_truncate_text_respects_char_boundaries() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(Validator::truncate_text("Zoë Müller", 3), "Zoë...");
    }
}
