//! Flow transfers between recipes: split, merge and drain.

use crate::error::DomainError;
use crate::flow::Flow;

fn check_transfer(available: &Flow, volume: f64) -> Result<(), DomainError> {
    if !volume.is_finite() || volume < 0.0 || volume > available.volume {
        return Err(DomainError::TransferExceedsVolume {
            requested: volume,
            available: available.volume,
        });
    }
    Ok(())
}

/// The flow left in the source recipe after `volume` liters were split off.
pub fn split_source(input: &Flow, volume: f64) -> Result<Flow, DomainError> {
    check_transfer(input, volume)?;
    Ok(input.clone().with_volume(input.volume - volume))
}

/// The start flow of the target recipe: `volume` liters of `source`.
///
/// `source` is the source recipe's state right before the split, so every
/// intensive property is copied unchanged.
pub fn split_target(source: &Flow, volume: f64) -> Result<Flow, DomainError> {
    check_transfer(source, volume)?;
    Ok(source.clone().with_volume(volume))
}

/// Combines two flows. Volume adds up, every other property is the
/// volume-weighted average of both.
pub fn merge(a: &Flow, b: &Flow) -> Result<Flow, DomainError> {
    let total = a.volume + b.volume;
    if total <= 0.0 {
        return Err(DomainError::ZeroVolume("merge"));
    }
    let mix = |x: f64, y: f64| (x * a.volume + y * b.volume) / total;

    let output = Flow {
        volume: total,
        original_gravity: mix(a.original_gravity, b.original_gravity),
        final_gravity: mix(a.final_gravity, b.final_gravity),
        abv: mix(a.abv, b.abv),
        color: mix(a.color, b.color),
        bitterness: mix(a.bitterness, b.bitterness),
        carbonation: mix(a.carbonation, b.carbonation),
        status: a.status,
    };
    output.validate()?;
    Ok(output)
}

/// Output of a recipe whose flow was handed over to another recipe.
pub fn drain() -> Flow {
    Flow::water(0.0)
}
