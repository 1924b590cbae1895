//! Brew equipment description.
//!
//! An [`Equipment`] record holds the constants of one physical brewing plant:
//! vessel capacities, losses, mash efficiency and evaporation rate. It is
//! shared (via `Arc`) by every activity of a recipe graph and never mutated
//! during a brew.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical-plant constants referenced by the transformation functions.
///
/// Volumes are in liters, rates in liters per hour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Equipment {
    /// Capacity of the mash tun.
    pub mash_max_volume: f64,
    /// Fraction of grain weight recovered as extract (0–1).
    pub mash_efficiency_weight: f64,
    /// Dead volume below the false bottom of the mash tun.
    pub mash_false_bottom_volume: f64,
    /// Wort lost when lautering.
    pub mash_loss: f64,
    /// Capacity of the sparge water tank.
    pub sparge_max_volume: f64,
    /// Capacity of the kettle.
    pub boil_max_volume: f64,
    /// Water evaporated per hour of boiling.
    pub boil_evaporation_rate: f64,
    /// Wort lost at the end of the boil (trub, hops).
    pub boil_loss: f64,
    /// Wort lost in the whirlpool.
    pub whirlpool_loss: f64,
    /// Capacity of the fermenter.
    pub fermentation_max_volume: f64,
    /// Beer lost in the fermenter (yeast cake).
    pub fermentation_loss: f64,
    /// Beer lost when bottling.
    pub bottling_loss: f64,
}

impl Default for Equipment {
    /// Small 8 liter pilot plant.
    fn default() -> Self {
        Self {
            mash_max_volume: 12.0,
            mash_efficiency_weight: 0.72,
            mash_false_bottom_volume: 2.0,
            mash_loss: 1.0,
            sparge_max_volume: 8.0,
            boil_max_volume: 15.0,
            boil_evaporation_rate: 2.3,
            boil_loss: 0.5,
            whirlpool_loss: 0.0,
            fermentation_max_volume: 12.0,
            fermentation_loss: 0.5,
            bottling_loss: 0.0,
        }
    }
}

impl Equipment {
    /// Equipment without any losses, limits or evaporation.
    ///
    /// Useful for isolating a single formula in tests and calculators.
    pub fn lossless() -> Self {
        Self {
            mash_max_volume: f64::INFINITY,
            mash_efficiency_weight: 1.0,
            mash_false_bottom_volume: 0.0,
            mash_loss: 0.0,
            sparge_max_volume: f64::INFINITY,
            boil_max_volume: f64::INFINITY,
            boil_evaporation_rate: 0.0,
            boil_loss: 0.0,
            whirlpool_loss: 0.0,
            fermentation_max_volume: f64::INFINITY,
            fermentation_loss: 0.0,
            bottling_loss: 0.0,
        }
    }
}
