// src/config/validation.rs

use crate::errors::ConfigError;

/// Validates the normalized extension lists that regex/glob compilation cannot catch.
pub(super) fn validate_extensions(
    include: Option<&[String]>,
    exclude: Option<&[String]>,
) -> Result<(), ConfigError> {
    for (option, list) in [("extensions", include), ("exclude_extensions", exclude)] {
        if list.map_or(false, |exts| exts.iter().any(String::is_empty)) {
            return Err(ConfigError::InvalidValue {
                option: option.to_string(),
                reason: "extension must not be empty".to_string(),
            });
        }
    }

    if let (Some(include), Some(exclude)) = (include, exclude) {
        if let Some(ext) = include.iter().find(|e| exclude.contains(e)) {
            return Err(ConfigError::Conflict {
                option1: format!("extensions ({})", ext),
                option2: format!("exclude_extensions ({})", ext),
            });
        }
    }

    Ok(())
}
