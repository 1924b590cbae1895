//! Equipment presets and configuration for brewflow.
//!
//! A preset pairs an [`Equipment`](brewflow_core::Equipment) description with
//! the [`BrewConstants`](brewflow_core::BrewConstants) used alongside it, so a
//! brewhouse can be described once in TOML and reused across recipes.
//!
//! # Features
//!
//! - **Preset System**: Load and save equipment presets from TOML files
//! - **Validation**: Range checks for every equipment field and constant
//! - **Paths**: Platform-specific preset directories (`std` feature)
//! - **Factory Presets**: Built-in `pilot_8l` and `brewhouse_50l`
//!
//! # Example
//!
//! ```rust,no_run
//! use brewflow_config::{EquipmentPreset, get_factory_preset, user_equipment_dir};
//! use brewflow_core::Brewery;
//!
//! let preset = get_factory_preset("brewhouse_50l").unwrap();
//!
//! let mut brewery = Brewery::with_constants(preset.constants.clone());
//! let _recipe = brewery.create_graph(preset.equipment.clone());
//!
//! // Save a tweaked copy to the user presets directory
//! let mut garage = preset.clone();
//! garage.name = "Garage".to_string();
//! garage.equipment.boil_evaporation_rate = 6.0;
//! garage.save(user_equipment_dir().join("garage.toml")).unwrap();
//!
//! let reloaded = EquipmentPreset::load(user_equipment_dir().join("garage.toml")).unwrap();
//! assert_eq!(reloaded, garage);
//! ```

mod error;
mod preset;

/// Platform-specific paths for equipment presets.
#[cfg(feature = "std")]
pub mod paths;

/// Equipment and constants validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
#[cfg(feature = "std")]
pub use paths::{
    ensure_user_equipment_dir, find_preset, list_system_presets, list_user_presets, load_preset,
    preset_name_from_path, system_equipment_dir, user_equipment_dir,
};
pub use preset::EquipmentPreset;
pub use validation::{
    ValidationError, ValidationResult, validate_constants, validate_equipment, validate_preset,
};
