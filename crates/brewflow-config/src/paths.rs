//! Platform-specific paths for equipment presets.
//!
//! # Directory Structure
//!
//! - **User presets**: `~/.config/brewflow/equipment/` (Linux), `~/Library/Application Support/brewflow/equipment/` (macOS), `%APPDATA%\brewflow\equipment\` (Windows)
//! - **System presets**: `/usr/share/brewflow/equipment/` (Linux), `/Library/Application Support/brewflow/equipment/` (macOS)
//!
//! # Example
//!
//! ```rust,no_run
//! use brewflow_config::paths;
//!
//! println!("User presets: {:?}", paths::user_equipment_dir());
//!
//! // Searches user then system directories
//! if let Some(path) = paths::find_preset("garage") {
//!     println!("Found preset at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::{ConfigError, EquipmentPreset, get_factory_preset};

/// Application name used for directory paths.
const APP_NAME: &str = "brewflow";

/// Subdirectory name for equipment presets.
const EQUIPMENT_SUBDIR: &str = "equipment";

/// Returns the user-specific equipment preset directory.
///
/// Falls back to `./brewflow/equipment` if the config directory cannot be
/// determined.
pub fn user_equipment_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(EQUIPMENT_SUBDIR)
}

/// Returns the system-wide equipment preset directory.
///
/// This directory is typically read-only and maintained by a package manager.
pub fn system_equipment_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        PathBuf::from("/usr/share")
            .join(APP_NAME)
            .join(EQUIPMENT_SUBDIR)
    }
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library/Application Support")
            .join(APP_NAME)
            .join(EQUIPMENT_SUBDIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_NAME)
            .join(EQUIPMENT_SUBDIR)
    }
}

/// Find a preset file by path or name.
///
/// Searches in the following order:
/// 1. `name` as a path to an existing file
/// 2. User equipment directory
/// 3. System equipment directory
///
/// A bare name gets a `.toml` extension appended.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    [user_equipment_dir(), system_equipment_dir()]
        .into_iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Resolve a preset by name: preset files first, then factory presets.
///
/// A preset loaded from disk is validated before it is returned.
///
/// # Errors
///
/// [`ConfigError::PresetNotFound`] if neither a file nor a factory preset
/// matches; read, parse and validation errors of a found file.
pub fn load_preset(name: &str) -> Result<EquipmentPreset, ConfigError> {
    if let Some(path) = find_preset(name) {
        let preset = EquipmentPreset::load(&path)?;
        preset.validate()?;
        return Ok(preset);
    }
    get_factory_preset(name).ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Ensure the user equipment directory exists, creating parents as needed.
pub fn ensure_user_equipment_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_equipment_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List preset files in the user equipment directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_equipment_dir())
}

/// List preset files in the system equipment directory.
pub fn list_system_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&system_equipment_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// ```rust
/// use brewflow_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/garage.toml"));
/// assert_eq!(name, Some("garage".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn directories_are_namespaced() {
        let user = user_equipment_dir();
        assert!(user.ends_with("brewflow/equipment"), "{user:?}");
        let system = system_equipment_dir();
        assert!(system.to_string_lossy().contains("brewflow"));
    }

    #[test]
    fn find_preset_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let preset_path = temp_dir.path().join("garage.toml");
        fs::write(&preset_path, "name = \"Garage\"").unwrap();

        let found = find_preset(preset_path.to_str().unwrap());
        assert_eq!(found, Some(preset_path));
    }

    #[test]
    fn find_preset_missing() {
        assert!(find_preset("nonexistent_equipment_12345").is_none());
    }

    #[test]
    fn list_filters_toml_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp_dir.path().join("dir.toml")).unwrap();

        let presets = list_presets_in_dir(temp_dir.path());
        let names: Vec<_> = presets
            .iter()
            .filter_map(|p| preset_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn list_nonexistent_dir_is_empty() {
        assert!(list_presets_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }

    #[test]
    fn load_preset_falls_back_to_factory() {
        let preset = load_preset("brewhouse_50l").unwrap();
        assert_eq!(preset.name, "Brewhouse 50L");
    }

    #[test]
    fn load_preset_unknown_is_not_found() {
        let err = load_preset("nonexistent_equipment_12345").unwrap_err();
        assert!(matches!(err, ConfigError::PresetNotFound(ref n) if n == "nonexistent_equipment_12345"));
    }

    #[test]
    fn load_preset_validates_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leaky.toml");
        fs::write(&path, "name = \"Leaky\"\n[equipment]\nboil_loss = -3.0\n").unwrap();

        let err = load_preset(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
