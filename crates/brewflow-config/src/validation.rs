//! Equipment and constants validation.
//!
//! Each field is checked against a closed range. All violations of one
//! record are collected, so a hand-edited preset reports every bad value at
//! once instead of one per load attempt.
//!
//! # Example
//!
//! ```rust
//! use brewflow_config::{validate_equipment, ValidationError};
//! use brewflow_core::Equipment;
//!
//! validate_equipment(&Equipment::default()).expect("default equipment is valid");
//!
//! let leaky = Equipment { boil_loss: -1.0, ..Equipment::default() };
//! assert!(matches!(
//!     validate_equipment(&leaky),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```

use brewflow_core::{BrewConstants, Equipment};
use thiserror::Error;

use crate::EquipmentPreset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Field value out of range (NaN is always out of range).
    #[error("field '{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the field, as it appears in TOML.
        field: String,
        /// The offending value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const VOLUME: (f64, f64) = (0.0, f64::INFINITY);
const LOSS: (f64, f64) = (0.0, 1000.0);
const FRACTION: (f64, f64) = (0.0, 1.0);

/// Collects range violations for one record.
#[derive(Default)]
struct Checker {
    prefix: &'static str,
    errors: Vec<ValidationError>,
}

impl Checker {
    fn with_prefix(prefix: &'static str) -> Self {
        Self {
            prefix,
            errors: Vec::new(),
        }
    }

    fn check(&mut self, field: &str, value: f64, (min, max): (f64, f64)) {
        if !(min..=max).contains(&value) {
            self.errors.push(ValidationError::OutOfRange {
                field: format!("{}{}", self.prefix, field),
                value,
                min,
                max,
            });
        }
    }

    fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

fn check_equipment(c: &mut Checker, e: &Equipment) {
    c.check("mash_max_volume", e.mash_max_volume, VOLUME);
    c.check("mash_efficiency_weight", e.mash_efficiency_weight, FRACTION);
    c.check("mash_false_bottom_volume", e.mash_false_bottom_volume, LOSS);
    c.check("mash_loss", e.mash_loss, LOSS);
    c.check("sparge_max_volume", e.sparge_max_volume, VOLUME);
    c.check("boil_max_volume", e.boil_max_volume, VOLUME);
    c.check("boil_evaporation_rate", e.boil_evaporation_rate, LOSS);
    c.check("boil_loss", e.boil_loss, LOSS);
    c.check("whirlpool_loss", e.whirlpool_loss, LOSS);
    c.check("fermentation_max_volume", e.fermentation_max_volume, VOLUME);
    c.check("fermentation_loss", e.fermentation_loss, LOSS);
    c.check("bottling_loss", e.bottling_loss, LOSS);
}

fn check_constants(c: &mut Checker, k: &BrewConstants) {
    c.check("grain_absorption", k.grain_absorption, (0.0, 10.0));
    c.check("grain_volume", k.grain_volume, (0.0, 10.0));
    c.check("color_adjustment", k.color_adjustment, (0.0, 100.0));
    c.check("sucrose_co2_yield", k.sucrose_co2_yield, FRACTION);
    c.check("dextrose_factor", k.dextrose_factor, FRACTION);
    c.check("dry_extract_factor", k.dry_extract_factor, FRACTION);
    c.check("extract_fermentability", k.extract_fermentability, FRACTION);
    c.check("liquid_extract_solids", k.liquid_extract_solids, FRACTION);
    c.check("pellet_bonus", k.pellet_bonus, FRACTION);
    c.check("late_hop_bonus", k.late_hop_bonus, FRACTION);
}

/// Validate vessel capacities, losses and efficiency.
///
/// Capacities may be infinite (see [`Equipment::lossless`]); losses and rates
/// must be finite and non-negative; the efficiency weight is a fraction.
pub fn validate_equipment(equipment: &Equipment) -> ValidationResult<()> {
    let mut c = Checker::default();
    check_equipment(&mut c, equipment);
    c.finish()
}

/// Validate empirical brewing constants.
pub fn validate_constants(constants: &BrewConstants) -> ValidationResult<()> {
    let mut c = Checker::default();
    check_constants(&mut c, constants);
    c.finish()
}

/// Validate both halves of a preset.
///
/// Field names are qualified with their TOML table (`equipment.boil_loss`).
pub fn validate_preset(preset: &EquipmentPreset) -> ValidationResult<()> {
    let mut c = Checker::with_prefix("equipment.");
    check_equipment(&mut c, &preset.equipment);
    let mut errors = c.errors;

    let mut c = Checker::with_prefix("constants.");
    check_constants(&mut c, &preset.constants);
    errors.append(&mut c.errors);

    Checker {
        prefix: "",
        errors,
    }
    .finish()
}
