//! Equipment preset file format and operations.

use brewflow_core::{BrewConstants, Equipment};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_preset};

/// A named brewhouse: vessel equipment plus the empirical constants used
/// with it.
///
/// Presets are stored as TOML files. Missing fields in either table fall back
/// to [`Equipment::default`] and [`BrewConstants::default`], so a preset only
/// needs to list what differs from the pilot plant.
///
/// # TOML Format
///
/// ```toml
/// name = "Garage"
/// description = "25 liter three-vessel setup"
///
/// [equipment]
/// mash_max_volume = 30.0
/// boil_max_volume = 35.0
/// boil_evaporation_rate = 3.5
///
/// [constants]
/// grain_absorption = 0.96
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EquipmentPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Vessel capacities, losses and efficiency.
    #[serde(default)]
    pub equipment: Equipment,

    /// Empirical brewing constants.
    #[serde(default)]
    pub constants: BrewConstants,
}

impl EquipmentPreset {
    /// Create a preset with default equipment and constants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            equipment: Equipment::default(),
            constants: BrewConstants::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the equipment.
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    /// Replace the constants.
    pub fn with_constants(mut self, constants: BrewConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Load a preset from a TOML file.
    ///
    /// The preset is parsed but not validated; see [`EquipmentPreset::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field of the equipment and constants against its range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_preset(self)
    }
}

impl Default for EquipmentPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
