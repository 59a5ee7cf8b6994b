//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function over the parsed config; no filesystem access

use crate::config::schema::AppConfig;

/// A semantic problem in an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("docs.file_name must not be empty")]
    EmptyFileName,

    #[error("docs.file_name must be a bare file name, got {0:?}")]
    FileNameHasSeparator(String),

    #[error("docs.title must not be empty")]
    EmptyTitle,

    #[error("docs.app_dir must not be empty")]
    EmptyAppDir,

    #[error("docs.output must name a file")]
    EmptyOutput,
}

/// Check semantic constraints serde cannot express.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let docs = &config.docs;

    if docs.file_name.trim().is_empty() {
        errors.push(ValidationError::EmptyFileName);
    } else if docs.file_name.contains(['/', '\\']) {
        errors.push(ValidationError::FileNameHasSeparator(docs.file_name.clone()));
    }

    if docs.title.trim().is_empty() {
        errors.push(ValidationError::EmptyTitle);
    }

    if docs.app_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyAppDir);
    }

    if docs.output.file_name().is_none() {
        errors.push(ValidationError::EmptyOutput);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.docs.file_name = "docs/README.md".into();
        config.docs.title = "  ".into();
        config.docs.output = PathBuf::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::FileNameHasSeparator("docs/README.md".into()),
                ValidationError::EmptyTitle,
                ValidationError::EmptyOutput,
            ]
        );
    }
}
