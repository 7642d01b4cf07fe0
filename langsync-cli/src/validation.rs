use std::path::Path;
use unic_langid::LanguageIdentifier;

/// Validate directory exists
pub fn validate_directory(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.metadata().map(|m| m.is_file()).unwrap_or(false) {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    let normalized = lang.trim().replace('_', "-");
    match normalized.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate a module directory holds a default strings file
pub fn validate_module_path(module_dir: &Path) -> Result<(), String> {
    validate_directory(module_dir)?;
    let default_file = crate::discovery::module_default_file(module_dir);
    validate_file_path(&default_file).map_err(|e| {
        format!(
            "Module {} has no default strings file: {}",
            module_dir.display(),
            e
        )
    })
}
