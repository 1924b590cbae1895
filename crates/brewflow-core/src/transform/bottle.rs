//! Priming and bottling.

use crate::activity::BottleParams;
use crate::constants::BrewConstants;
use crate::conversions::{ALCOHOL_DENSITY, sg_to_plato};
use crate::equipment::Equipment;
use crate::error::DomainError;
use crate::flow::Flow;

/// Share of speise extract that ends up as CO2.
const SPEISE_CO2_SHARE: f64 = 0.5;

/// Computes the carbonated beer after priming and bottling.
///
/// Each priming sugar (g/L) contributes `qty · yield` grams of CO2 and
/// `qty · (1 − yield)` grams of alcohol per liter. Speise contributes CO2 in
/// proportion to the extract the yeast will ferment out of it and to its
/// share of the bottled volume.
pub fn bottle(
    input: &Flow,
    params: &BottleParams,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Result<Flow, DomainError> {
    let mut co2 = 0.0;
    let mut abw = 0.0;
    for (sugar, quantity) in params.priming.iter() {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(DomainError::InvalidParameter {
                name: "priming sugar",
                value: quantity,
            });
        }
        let yield_ = sugar.co2_yield(constants);
        co2 += quantity * yield_;
        abw += quantity * (1.0 - yield_);
    }

    let speise = params.speise;
    if !speise.is_finite() || speise < 0.0 {
        return Err(DomainError::InvalidParameter {
            name: "speise",
            value: speise,
        });
    }
    if speise > 0.0 {
        let og = input.original_gravity;
        let fg = input.final_gravity;
        if og <= 1.0 {
            return Err(DomainError::GravityBelowWater(og));
        }
        let total = input.volume + speise;
        if total <= 0.0 {
            return Err(DomainError::ZeroVolume("speise priming"));
        }
        co2 += SPEISE_CO2_SHARE
            * constants.extract_fermentability
            * speise
            * og
            * sg_to_plato(og)
            * 10.0
            * (og - fg)
            / (og - 1.0)
            / total;
    }

    let output = Flow {
        volume: input.volume - equipment.bottling_loss + speise,
        abv: input.abv + abw / ALCOHOL_DENSITY / 10.0,
        carbonation: input.carbonation + co2,
        ..input.clone()
    };
    output.validate()?;
    Ok(output)
}
