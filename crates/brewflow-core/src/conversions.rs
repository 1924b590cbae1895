//! Unit and scale conversions for brewing calculations.
//!
//! Every function here is pure and allocation-free. The transformation
//! functions in [`crate::transform`] are built on top of them, so their
//! coefficients are fixed: changing one changes every computed recipe.
//!
//! # Gravity Scales
//!
//! | Function | From | To | Valid range |
//! |----------|------|----|-------------|
//! | [`sg_to_plato`] | specific gravity | °Plato | 1.000 – 1.120 SG |
//! | [`plato_to_sg`] | °Plato | specific gravity | 0 – 30 °P |
//! | [`concentration_to_plato`] | kg extract per 100 L | °Plato | ≥ 0 |
//! | [`brix_to_sg`] / [`sg_to_brix`] | refractometer °Brix | specific gravity | wcf > 0 |
//!
//! # Temperature, Volume and Mass
//!
//! - [`celsius_to_fahrenheit`] / [`fahrenheit_to_celsius`] / [`celsius_to_kelvin`]
//! - [`liters_to_gallons`] / [`gallons_to_liters`]
//! - [`kilograms_to_pounds`] / [`pounds_to_kilograms`]
//! - [`grams_to_ounces`] / [`ounces_to_grams`]
//!
//! # Alcohol, Color and Carbonation
//!
//! - [`abv_from_gravity`], [`abv_to_abw`], [`abw_to_abv`], [`apparent_attenuation`]
//! - [`ebc_to_srm`] / [`srm_to_ebc`]
//! - [`co2_saturation`]

use libm::{exp, sqrt};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Liters per US gallon.
pub const LITERS_PER_GALLON: f64 = 3.785411784;

/// Kilograms per avoirdupois pound.
pub const KILOGRAMS_PER_POUND: f64 = 0.45359237;

/// Grams per avoirdupois ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.349523125;

/// Density of ethanol in kg/L, used for ABV ↔ ABW conversions.
pub const ALCOHOL_DENSITY: f64 = 0.794;

/// Empirical ratio between gravity drop and alcohol by volume (1.05 / 0.79).
pub const ABV_RATIO: f64 = 1.05 / 0.79;

/// EBC units per SRM unit.
pub const EBC_PER_SRM: f64 = 1.97;

// Coefficients of the Plato ↔ SG relationship.
const PLATO_A: f64 = 258.6;
const PLATO_B: f64 = 227.1 / 258.2;

/// Convert degrees Celsius to degrees Fahrenheit.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::celsius_to_fahrenheit;
///
/// assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
/// assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
/// ```
#[inline]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Convert degrees Fahrenheit to degrees Celsius.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::fahrenheit_to_celsius;
///
/// assert_eq!(fahrenheit_to_celsius(32.0), 0.0);
/// ```
#[inline]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Convert degrees Celsius to Kelvin.
#[inline]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Convert liters to US gallons.
#[inline]
pub fn liters_to_gallons(liters: f64) -> f64 {
    liters / LITERS_PER_GALLON
}

/// Convert US gallons to liters.
#[inline]
pub fn gallons_to_liters(gallons: f64) -> f64 {
    gallons * LITERS_PER_GALLON
}

/// Convert kilograms to pounds.
#[inline]
pub fn kilograms_to_pounds(kilograms: f64) -> f64 {
    kilograms / KILOGRAMS_PER_POUND
}

/// Convert pounds to kilograms.
#[inline]
pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    pounds * KILOGRAMS_PER_POUND
}

/// Convert grams to ounces.
#[inline]
pub fn grams_to_ounces(grams: f64) -> f64 {
    grams / GRAMS_PER_OUNCE
}

/// Convert ounces to grams.
#[inline]
pub fn ounces_to_grams(ounces: f64) -> f64 {
    ounces * GRAMS_PER_OUNCE
}

/// Convert specific gravity to degrees Plato.
///
/// Cubic fit of the ASBC reference table, accurate for 1.000 – 1.120 SG.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::sg_to_plato;
///
/// assert!((sg_to_plato(1.050) - 12.39).abs() < 0.01);
/// ```
#[inline]
pub fn sg_to_plato(sg: f64) -> f64 {
    -616.868 + 1111.14 * sg - 630.272 * sg * sg + 135.997 * sg * sg * sg
}

/// Convert degrees Plato to specific gravity.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::plato_to_sg;
///
/// assert_eq!(plato_to_sg(0.0), 1.0);
/// assert!((plato_to_sg(15.0) - 1.061).abs() < 0.001);
/// ```
#[inline]
pub fn plato_to_sg(plato: f64) -> f64 {
    1.0 + plato / (PLATO_A - plato / 258.2 * 227.1)
}

/// Degrees Plato of a solution holding `concentration` kg of extract per 100 L.
///
/// Solves `P · plato_to_sg(P) = concentration` for `P` (positive root of the
/// resulting quadratic). Used by mash extraction and sugar additions.
/// Returns 0 for a zero concentration.
///
/// # Arguments
/// * `concentration` - Extract in kg multiplied by 100 and divided by the
///   liquid volume in liters (must be ≥ 0)
#[inline]
pub fn concentration_to_plato(concentration: f64) -> f64 {
    let linear = PLATO_A + PLATO_B * concentration;
    (-linear + sqrt(linear * linear + 4.0 * PLATO_A * (1.0 - PLATO_B) * concentration))
        / (2.0 - 2.0 * PLATO_B)
}

/// Convert a refractometer reading in °Brix to specific gravity.
///
/// # Arguments
/// * `brix` - Refractometer reading
/// * `wort_correction` - Wort correction factor of the instrument (> 0, typically 1.04)
#[inline]
pub fn brix_to_sg(brix: f64, wort_correction: f64) -> f64 {
    plato_to_sg(brix / wort_correction)
}

/// Convert specific gravity to the °Brix a refractometer would show.
///
/// Inverse of [`brix_to_sg`] for the same `wort_correction` factor.
#[inline]
pub fn sg_to_brix(sg: f64, wort_correction: f64) -> f64 {
    sg_to_plato(sg) * wort_correction
}

/// Convert EBC color units to SRM.
#[inline]
pub fn ebc_to_srm(ebc: f64) -> f64 {
    ebc / EBC_PER_SRM
}

/// Convert SRM color units to EBC.
#[inline]
pub fn srm_to_ebc(srm: f64) -> f64 {
    srm * EBC_PER_SRM
}

/// Alcohol by volume (%) from original and final gravity.
///
/// May be negative when `fg > og`; callers clamp as needed.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::abv_from_gravity;
///
/// let abv = abv_from_gravity(1.050, 1.010);
/// assert!((abv - 5.26).abs() < 0.01);
/// ```
#[inline]
pub fn abv_from_gravity(og: f64, fg: f64) -> f64 {
    ABV_RATIO * ((og - fg) / fg) * 100.0
}

/// Convert alcohol by volume (%) to alcohol by weight (%) at gravity `sg`.
#[inline]
pub fn abv_to_abw(abv: f64, sg: f64) -> f64 {
    abv * ALCOHOL_DENSITY / sg
}

/// Convert alcohol by weight (%) to alcohol by volume (%) at gravity `sg`.
#[inline]
pub fn abw_to_abv(abw: f64, sg: f64) -> f64 {
    abw * sg / ALCOHOL_DENSITY
}

/// Apparent attenuation (%) from original and final extract in °Plato.
///
/// Returns 0 when the original extract is zero.
#[inline]
pub fn apparent_attenuation(original_plato: f64, final_plato: f64) -> f64 {
    if original_plato == 0.0 {
        return 0.0;
    }
    100.0 - final_plato / original_plato * 100.0
}

/// CO2 held in solution (g/L) after fermentation at `celsius`, at 1 atm.
///
/// Solubility is exponential in the inverse absolute temperature.
///
/// # Example
/// ```rust
/// use brewflow_core::conversions::co2_saturation;
///
/// assert!((co2_saturation(20.0) - 1.66).abs() < 0.01);
/// assert!(co2_saturation(10.0) > co2_saturation(20.0));
/// ```
#[inline]
pub fn co2_saturation(celsius: f64) -> f64 {
    1.013 * exp(-10.73797 + 2617.25 / celsius_to_kelvin(celsius)) * 10.0
}
