//! Factory equipment presets bundled with brewflow.
//!
//! These presets are always available without external files and serve as
//! starting points for describing a real brewhouse.

use crate::EquipmentPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["pilot_8l", "brewhouse_50l"];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("pilot_8l", PILOT_8L_PRESET),
    ("brewhouse_50l", BREWHOUSE_50L_PRESET),
];

/// Stovetop pilot plant, 8 liters into the fermenter.
const PILOT_8L_PRESET: &str = r#"
name = "Pilot 8L"
description = "Stovetop pilot plant, about 8 liters into the fermenter"

[equipment]
mash_max_volume = 12.0
mash_efficiency_weight = 0.72
mash_false_bottom_volume = 2.0
mash_loss = 1.0
sparge_max_volume = 8.0
boil_max_volume = 15.0
boil_evaporation_rate = 2.3
boil_loss = 0.5
whirlpool_loss = 0.0
fermentation_max_volume = 12.0
fermentation_loss = 0.5
bottling_loss = 0.0
"#;

/// Electric brewhouse, 50 liters into the fermenter.
const BREWHOUSE_50L_PRESET: &str = r#"
name = "Brewhouse 50L"
description = "Electric three-vessel brewhouse, about 50 liters into the fermenter"

[equipment]
mash_max_volume = 50.0
mash_efficiency_weight = 0.751
mash_false_bottom_volume = 5.0
mash_loss = 0.0
sparge_max_volume = 50.0
boil_max_volume = 70.0
boil_evaporation_rate = 8.3
boil_loss = 2.0
whirlpool_loss = 0.0
fermentation_max_volume = 60.0
fermentation_loss = 1.5
bottling_loss = 0.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use brewflow_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<EquipmentPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| EquipmentPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use brewflow_config::get_factory_preset;
///
/// let pilot = get_factory_preset("pilot_8l").unwrap();
/// assert_eq!(get_factory_preset("Pilot 8L"), Some(pilot));
/// ```
pub fn get_factory_preset(name: &str) -> Option<EquipmentPreset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return EquipmentPreset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}

/// Get the identifiers of all factory presets.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check whether a name refers to a factory preset (case-insensitive).
///
/// ```rust
/// use brewflow_config::is_factory_preset;
///
/// assert!(is_factory_preset("brewhouse_50l"));
/// assert!(is_factory_preset("Brewhouse 50L"));
/// assert!(!is_factory_preset("garage"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewflow_core::Equipment;

    #[test]
    fn all_factory_presets_parse() {
        for (id, toml) in FACTORY_PRESETS_TOML {
            let result = EquipmentPreset::from_toml(toml);
            assert!(result.is_ok(), "factory preset '{id}' failed: {:?}", result.err());
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESET_NAMES.len());
    }

    #[test]
    fn all_factory_presets_validate() {
        for preset in factory_presets() {
            assert!(preset.validate().is_ok(), "{} is invalid", preset.name);
        }
    }

    #[test]
    fn names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES);
    }

    #[test]
    fn pilot_matches_default_equipment() {
        let pilot = get_factory_preset("pilot_8l").unwrap();
        assert_eq!(pilot.equipment, Equipment::default());
    }

    #[test]
    fn brewhouse_values() {
        let e = get_factory_preset("BREWHOUSE_50L").unwrap().equipment;
        assert_eq!(e.mash_max_volume, 50.0);
        assert_eq!(e.mash_efficiency_weight, 0.751);
        assert_eq!(e.boil_max_volume, 70.0);
        assert_eq!(e.boil_evaporation_rate, 8.3);
        assert_eq!(e.fermentation_loss, 1.5);
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(get_factory_preset("nonexistent").is_none());
        assert!(!is_factory_preset("nonexistent"));
    }
}
