//! Fermentation.

use crate::activity::FermentParams;
use crate::constants::BrewConstants;
use crate::conversions::{abv_from_gravity, celsius_to_kelvin, co2_saturation, plato_to_sg, sg_to_plato};
use crate::equipment::Equipment;
use crate::error::DomainError;
use crate::flow::Flow;

use super::additions::{add_sugars, add_water};

/// Computes the flat beer leaving the fermenter.
///
/// The yeast's apparent attenuation removes a linear share of the extract on
/// the Plato scale. Residual CO2 is the saturation level at the warmest
/// fermentation temperature.
pub fn ferment(
    input: &Flow,
    params: &FermentParams,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Result<Flow, DomainError> {
    let attenuation = params.yeast.attenuation;
    if !(0.0..=100.0).contains(&attenuation) {
        return Err(DomainError::InvalidParameter {
            name: "attenuation",
            value: attenuation,
        });
    }
    let temperature = params.carbonation_temperature();
    if !temperature.is_finite() || celsius_to_kelvin(temperature) <= 0.0 {
        return Err(DomainError::InvalidParameter {
            name: "temperature",
            value: temperature,
        });
    }
    let og = input.original_gravity;
    if og < 1.0 {
        return Err(DomainError::GravityBelowWater(og));
    }

    let final_plato = sg_to_plato(og) * (1.0 - attenuation / 100.0);
    let fg = plato_to_sg(final_plato);
    let abv = abv_from_gravity(og, fg).max(0.0);

    let mut output = Flow {
        volume: input.volume - equipment.fermentation_loss,
        final_gravity: fg,
        abv: input.abv + abv,
        carbonation: co2_saturation(temperature),
        ..input.clone()
    };
    if output.volume < 0.0 {
        return Err(DomainError::NegativeVolume(output.volume));
    }

    add_water(&mut output, params.water)?;
    add_sugars(&mut output, &params.sugars, constants)?;

    output.validate()?;
    Ok(output)
}
