//! Water and sugar additions shared by the boil and fermentation steps.

use crate::activity::{Sugar, SugarAdditions};
use crate::constants::BrewConstants;
use crate::conversions::{concentration_to_plato, plato_to_sg, sg_to_plato};
use crate::error::DomainError;
use crate::flow::Flow;

/// Dilutes a flow with `water` liters.
///
/// Gravities move toward 1.000, every other intensive property scales by
/// `volume / (volume + water)`.
pub fn add_water(flow: &mut Flow, water: f64) -> Result<(), DomainError> {
    if water == 0.0 {
        return Ok(());
    }
    if !water.is_finite() || water < 0.0 {
        return Err(DomainError::InvalidParameter {
            name: "water",
            value: water,
        });
    }
    let total = flow.volume + water;
    if total <= 0.0 {
        return Err(DomainError::ZeroVolume("water addition"));
    }
    let factor = flow.volume / total;

    flow.original_gravity = 1.0 + (flow.original_gravity - 1.0) * factor;
    flow.final_gravity = 1.0 + (flow.final_gravity - 1.0) * factor;
    flow.abv *= factor;
    flow.color *= factor;
    flow.bitterness *= factor;
    flow.carbonation *= factor;
    flow.volume = total;
    Ok(())
}

/// Dissolves `quantity` kg of `sugar` in a flow.
///
/// The extract already present (`volume · og · °P / 100` kg) and the sugar's
/// extract are summed and converted back to a gravity. An unfermented flow
/// keeps `fg == og`; a fermented flow keeps its final gravity.
pub fn add_sugar(
    flow: &mut Flow,
    sugar: Sugar,
    quantity: f64,
    constants: &BrewConstants,
) -> Result<(), DomainError> {
    if quantity == 0.0 {
        return Ok(());
    }
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(DomainError::InvalidParameter {
            name: "sugar quantity",
            value: quantity,
        });
    }
    if flow.volume <= 0.0 {
        return Err(DomainError::ZeroVolume("sugar addition"));
    }
    if flow.original_gravity < 1.0 {
        return Err(DomainError::GravityBelowWater(flow.original_gravity));
    }

    let unfermented = flow.is_unfermented();
    let og = flow.original_gravity;
    let present = flow.volume * og * sg_to_plato(og) / 100.0;
    let total = present + quantity * sugar.extract_factor(constants);
    let gravity = plato_to_sg(concentration_to_plato(total * 100.0 / flow.volume));

    flow.original_gravity = gravity;
    if unfermented {
        flow.final_gravity = gravity;
    }
    Ok(())
}

/// Applies every sugar of `sugars` in [`Sugar::ALL`] order.
pub fn add_sugars(
    flow: &mut Flow,
    sugars: &SugarAdditions,
    constants: &BrewConstants,
) -> Result<(), DomainError> {
    for (sugar, quantity) in sugars.iter() {
        add_sugar(flow, sugar, quantity, constants)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilution_moves_gravity_toward_water() {
        let mut flow = Flow::water(20.0)
            .with_gravity(1.050)
            .with_color(20.0)
            .with_bitterness(40.0);
        add_water(&mut flow, 5.0).unwrap();
        assert_eq!(flow.volume, 25.0);
        assert!((flow.original_gravity - 1.040).abs() < 1e-12);
        assert!((flow.final_gravity - 1.040).abs() < 1e-12);
        assert!((flow.color - 16.0).abs() < 1e-12);
        assert!((flow.bitterness - 32.0).abs() < 1e-12);
    }

    #[test]
    fn zero_water_is_a_no_op() {
        let mut flow = Flow::water(0.0);
        add_water(&mut flow, 0.0).unwrap();
        assert_eq!(flow, Flow::water(0.0));
    }

    #[test]
    fn negative_water_is_rejected() {
        let mut flow = Flow::water(10.0);
        assert!(matches!(
            add_water(&mut flow, -1.0),
            Err(DomainError::InvalidParameter { name: "water", .. })
        ));
    }

    #[test]
    fn sucrose_raises_gravity() {
        let constants = BrewConstants::default();
        let mut flow = Flow::water(20.0).with_gravity(1.050);
        add_sugar(&mut flow, Sugar::Sucrose, 1.0, &constants).unwrap();
        assert!((flow.original_gravity - 1.0691).abs() < 5e-4);
        assert_eq!(flow.final_gravity, flow.original_gravity);
        assert_eq!(flow.volume, 20.0);
    }

    #[test]
    fn dextrose_yields_less_than_sucrose() {
        let constants = BrewConstants::default();
        let mut sucrose = Flow::water(20.0).with_gravity(1.050);
        let mut dextrose = sucrose.clone();
        add_sugar(&mut sucrose, Sugar::Sucrose, 1.0, &constants).unwrap();
        add_sugar(&mut dextrose, Sugar::Dextrose, 1.0, &constants).unwrap();
        assert!(dextrose.original_gravity < sucrose.original_gravity);
        assert!(dextrose.original_gravity > 1.050);
    }

    #[test]
    fn fermented_flow_keeps_final_gravity() {
        let constants = BrewConstants::default();
        let mut flow = Flow::water(20.0).with_gravity(1.050);
        flow.final_gravity = 1.012;
        add_sugar(&mut flow, Sugar::Sucrose, 0.5, &constants).unwrap();
        assert!(flow.original_gravity > 1.050);
        assert_eq!(flow.final_gravity, 1.012);
    }

    #[test]
    fn sugar_into_empty_vessel_fails() {
        let constants = BrewConstants::default();
        let mut flow = Flow::water(0.0);
        assert_eq!(
            add_sugar(&mut flow, Sugar::Sucrose, 1.0, &constants),
            Err(DomainError::ZeroVolume("sugar addition"))
        );
    }
}
