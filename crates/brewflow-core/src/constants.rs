//! Physical brewing constants.
//!
//! [`BrewConstants`] is an immutable configuration object passed into every
//! transformation function. There is no process-wide mutable state: two
//! breweries may brew with different constants side by side.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Empirical constants used by the transformation functions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrewConstants {
    /// Water absorbed by 1 kg of grain, in liters.
    pub grain_absorption: f64,
    /// Volume occupied by 1 kg of grain in the mash tun, in liters.
    pub grain_volume: f64,
    /// Color added during wort production, in EBC.
    pub color_adjustment: f64,
    /// CO2 produced by fermenting sucrose, as a fraction of its weight.
    pub sucrose_co2_yield: f64,
    /// Extract of dextrose relative to sucrose.
    pub dextrose_factor: f64,
    /// Extract of dry malt extract relative to sucrose.
    pub dry_extract_factor: f64,
    /// Fermentable fraction of malt extract.
    pub extract_fermentability: f64,
    /// Solids content of liquid malt extract.
    pub liquid_extract_solids: f64,
    /// Utilization bonus for pellet hops.
    pub pellet_bonus: f64,
    /// Utilization bonus for additions after the hot break or in the whirlpool.
    pub late_hop_bonus: f64,
}

impl Default for BrewConstants {
    fn default() -> Self {
        Self {
            grain_absorption: 1.04,
            grain_volume: 0.67,
            color_adjustment: 3.0,
            sucrose_co2_yield: 0.51,
            dextrose_factor: 0.91,
            dry_extract_factor: 0.68,
            extract_fermentability: 0.82,
            liquid_extract_solids: 0.80,
            pellet_bonus: 0.1,
            late_hop_bonus: 0.1,
        }
    }
}
