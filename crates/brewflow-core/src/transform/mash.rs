//! Mashing and lautering.

use crate::activity::MashParams;
use crate::constants::BrewConstants;
use crate::conversions::{concentration_to_plato, plato_to_sg};
use crate::equipment::Equipment;
use crate::error::DomainError;
use crate::flow::Flow;

/// Computes the wort collected from a mash.
///
/// The input flow's volume is the mash water. Extract is derived from the
/// grain weight and the equipment's weight-basis efficiency, dissolved in
/// the liquid left after grain absorption; lauter loss is removed afterwards.
///
/// With no grain the mash contributes neither color nor extract and the
/// wort stays at 1.000.
pub fn mash(
    input: &Flow,
    params: &MashParams,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Result<Flow, DomainError> {
    for grain in &params.grains {
        if !grain.weight.is_finite() || grain.weight < 0.0 {
            return Err(DomainError::InvalidParameter {
                name: "grain weight",
                value: grain.weight,
            });
        }
        if !grain.color.is_finite() || grain.color < 0.0 {
            return Err(DomainError::InvalidParameter {
                name: "grain color",
                value: grain.color,
            });
        }
    }
    if !params.sparge_water.is_finite() || params.sparge_water < 0.0 {
        return Err(DomainError::InvalidParameter {
            name: "sparge water",
            value: params.sparge_water,
        });
    }

    let weight = params.total_grain_weight();
    let volume = input.volume + params.sparge_water - weight * constants.grain_absorption;

    let (color, gravity) = if weight > 0.0 {
        if volume <= 0.0 {
            return Err(DomainError::ZeroVolume("mash"));
        }
        let blended = params
            .grains
            .iter()
            .map(|g| g.weight * g.color)
            .sum::<f64>()
            / weight;
        let concentration = equipment.mash_efficiency_weight * 100.0 * weight / volume;
        (
            blended + constants.color_adjustment,
            plato_to_sg(concentration_to_plato(concentration)),
        )
    } else {
        (0.0, 1.0)
    };

    let output = Flow {
        volume: volume - equipment.mash_loss,
        original_gravity: gravity,
        final_gravity: gravity,
        color: input.color + color,
        ..input.clone()
    };
    output.validate()?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_grain_keeps_water() {
        let input = Flow::water(10.0);
        let out = mash(
            &input,
            &MashParams::new().with_sparge_water(2.0),
            &Equipment::default(),
            &BrewConstants::default(),
        )
        .unwrap();
        assert_eq!(out.original_gravity, 1.0);
        assert_eq!(out.final_gravity, 1.0);
        assert_eq!(out.color, 0.0);
        assert_eq!(out.volume, 11.0);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn grain_adds_extract_and_color() {
        let input = Flow::water(12.0);
        let params = MashParams::new()
            .with_grain("Pale", 3.0, 6.0)
            .with_grain("Munich", 1.0, 20.0)
            .with_sparge_water(4.0);
        let equipment = Equipment::default();
        let constants = BrewConstants::default();
        let out = mash(&input, &params, &equipment, &constants).unwrap();

        let expected_volume = 12.0 + 4.0 - 4.0 * 1.04 - equipment.mash_loss;
        assert!((out.volume - expected_volume).abs() < 1e-12);
        // (3·6 + 1·20) / 4 + 3
        assert!((out.color - 12.5).abs() < 1e-12);
        assert!((out.original_gravity - 1.0931).abs() < 5e-4);
        assert_eq!(out.original_gravity, out.final_gravity);
    }

    #[test]
    fn absorbed_mash_water_is_an_error() {
        let input = Flow::water(1.0);
        let params = MashParams::new().with_grain("Pale", 5.0, 6.0);
        let err = mash(
            &input,
            &params,
            &Equipment::default(),
            &BrewConstants::default(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::ZeroVolume("mash"));
    }

    #[test]
    fn negative_grain_weight_is_rejected() {
        let params = MashParams::new().with_grain("Pale", -1.0, 6.0);
        assert!(matches!(
            mash(
                &Flow::water(10.0),
                &params,
                &Equipment::default(),
                &BrewConstants::default()
            ),
            Err(DomainError::InvalidParameter { name: "grain weight", .. })
        ));
    }
}
