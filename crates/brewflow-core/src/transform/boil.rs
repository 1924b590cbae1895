//! Boiling: evaporation, hop bitterness and kettle additions.
//!
//! Bitterness follows Tinseth's utilization model:
//!
//! ```text
//! IBU = alpha/100 · weight·1000 / volume          (mg/L alpha acids)
//!     · 1.65 · 0.000125^(gravity − 1)             (bigness factor)
//!     · (1 − e^(−0.04 · minutes)) / 4.15          (boil time factor)
//!     · (1 + pellet bonus + late addition bonus)
//! ```

use libm::{exp, pow};

use crate::activity::{BoilParams, HopAddition, HopForm, HopUsage};
use crate::constants::BrewConstants;
use crate::equipment::Equipment;
use crate::error::DomainError;
use crate::flow::Flow;

use super::additions::{add_sugars, add_water};

/// IBUs contributed by one hop addition.
///
/// `minutes` is the total contact time, `volume` the wort volume in liters
/// and `gravity` the average gravity during the boil.
pub fn tinseth_ibu(
    hop: &HopAddition,
    minutes: f64,
    volume: f64,
    gravity: f64,
    constants: &BrewConstants,
) -> f64 {
    let alpha_acids = hop.alpha / 100.0 * hop.weight * 1000.0 / volume;
    let bigness = 1.65 * pow(0.000125, gravity - 1.0);
    let time_factor = (1.0 - exp(-0.04 * minutes)) / 4.15;

    let mut increment = 1.0;
    if hop.form == HopForm::Pellet {
        increment += constants.pellet_bonus;
    }
    if matches!(hop.usage, HopUsage::AfterHotBreak | HopUsage::Whirlpool) {
        increment += constants.late_hop_bonus;
    }

    alpha_acids * bigness * time_factor * increment
}

/// Computes the wort leaving the kettle.
///
/// Order of operations: evaporation and bitterness, kettle and whirlpool
/// losses, water dilution, sugar additions, speise removal.
pub fn boil(
    input: &Flow,
    params: &BoilParams,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Result<Flow, DomainError> {
    for (name, value) in [
        ("boil time", params.time),
        ("whirlpool time", params.whirlpool),
        ("speise", params.speise),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(DomainError::InvalidParameter { name, value });
        }
    }
    for hop in &params.hops {
        for (name, value) in [
            ("hop weight", hop.weight),
            ("hop alpha", hop.alpha),
            ("hop time", hop.time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidParameter { name, value });
            }
        }
    }
    if input.volume <= 0.0 {
        return Err(DomainError::ZeroVolume("boil"));
    }
    if input.original_gravity < 1.0 {
        return Err(DomainError::GravityBelowWater(input.original_gravity));
    }

    let post_boil = input.volume - equipment.boil_evaporation_rate * params.time / 60.0;
    if post_boil <= 0.0 {
        return Err(DomainError::ZeroVolume("boil"));
    }
    let gravity = 1.0 + (input.original_gravity - 1.0) * input.volume / post_boil;
    let average = (input.original_gravity + gravity) / 2.0;

    let bitterness: f64 = params
        .hops
        .iter()
        .map(|hop| {
            tinseth_ibu(
                hop,
                hop.time + params.whirlpool,
                post_boil,
                average,
                constants,
            )
        })
        .sum();

    let mut volume = post_boil - equipment.boil_loss;
    if params.whirlpool > 0.0 {
        volume -= equipment.whirlpool_loss;
    }

    let mut output = Flow {
        volume,
        original_gravity: gravity,
        final_gravity: gravity,
        bitterness: input.bitterness + bitterness,
        ..input.clone()
    };
    if output.volume < 0.0 {
        return Err(DomainError::NegativeVolume(output.volume));
    }

    add_water(&mut output, params.water)?;
    add_sugars(&mut output, &params.sugars, constants)?;
    output.volume -= params.speise;

    output.validate()?;
    Ok(output)
}
