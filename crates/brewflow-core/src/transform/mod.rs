//! Transformation functions, one per activity kind.
//!
//! Every function maps an input [`Flow`] plus the activity's parameters,
//! the graph's [`Equipment`] and the [`BrewConstants`] to an output flow.
//! They are pure: no hidden state, no I/O, identical inputs give identical
//! outputs. Physically impossible situations are reported as
//! [`DomainError`]s instead of propagating `NaN` or negative volumes.
//!
//! | Activity | Function | Changes |
//! |----------|----------|---------|
//! | Mash | [`mash()`] | volume, gravity, color |
//! | Boil | [`boil()`] | volume, gravity, bitterness (+ additions) |
//! | Ferment | [`ferment()`] | volume, final gravity, abv, carbonation (+ additions) |
//! | Bottle | [`bottle()`] | volume, abv, carbonation |
//! | Split | [`split_source()`], [`split_target()`] | volume |
//! | Merge | [`merge()`], [`drain()`] | everything (volume-weighted) |

mod additions;
mod blend;
mod boil;
mod bottle;
mod ferment;
mod mash;

use core::fmt;

pub use additions::{add_sugar, add_sugars, add_water};
pub use blend::{drain, merge, split_source, split_target};
pub use boil::{boil, tinseth_ibu};
pub use bottle::bottle;
pub use ferment::ferment;
pub use mash::mash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, MergeLink, SplitLink};
use crate::constants::BrewConstants;
use crate::equipment::Equipment;
use crate::error::DomainError;
use crate::flow::Flow;

/// Flow supplied by a linked graph to a split or merge activity.
#[derive(Clone, Copy, Debug)]
pub enum LinkedInput<'a> {
    /// Pre-split state of the source graph and the transferred volume.
    Split {
        /// Source state right before the split.
        source: &'a Flow,
        /// Liters moved into this graph.
        volume: f64,
    },
    /// State of the other graph to merge in.
    Merge(&'a Flow),
}

/// Runs the transformation of `activity`.
///
/// `linked` must carry the remote flow for incoming split and merge
/// activities; it is ignored by every other activity.
pub fn apply(
    activity: &Activity,
    input: &Flow,
    linked: Option<LinkedInput<'_>>,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Result<Flow, DomainError> {
    match activity {
        Activity::Mash(params) => mash(input, params, equipment, constants),
        Activity::Boil(params) => boil(input, params, equipment, constants),
        Activity::Ferment(params) => ferment(input, params, equipment, constants),
        Activity::Bottle(params) => bottle(input, params, equipment, constants),
        Activity::Split(SplitLink::Outgoing { volume, .. }) => split_source(input, *volume),
        Activity::Split(SplitLink::Incoming { .. }) => match linked {
            Some(LinkedInput::Split { source, volume }) => split_target(source, volume),
            _ => Err(DomainError::UnlinkedInput(activity.kind())),
        },
        Activity::Merge(MergeLink::Outgoing { .. }) => Ok(drain()),
        Activity::Merge(MergeLink::Incoming { .. }) => match linked {
            Some(LinkedInput::Merge(other)) => merge(input, other),
            _ => Err(DomainError::UnlinkedInput(activity.kind())),
        },
    }
}

/// A vessel whose capacity is checked while brewing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Vessel {
    /// Mash tun (water plus grain displacement).
    MashTun,
    /// Sparge water tank.
    SpargeTank,
    /// Boil kettle.
    Kettle,
    /// Fermenter.
    Fermenter,
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MashTun => "mash tun",
            Self::SpargeTank => "sparge tank",
            Self::Kettle => "kettle",
            Self::Fermenter => "fermenter",
        })
    }
}

/// Vessel loads of an activity as `(vessel, volume, capacity)` triples.
pub fn vessel_loads(
    activity: &Activity,
    input: &Flow,
    equipment: &Equipment,
    constants: &BrewConstants,
) -> Vec<(Vessel, f64, f64)> {
    match activity {
        Activity::Mash(params) => vec![
            (
                Vessel::MashTun,
                input.volume + params.total_grain_weight() * constants.grain_volume,
                equipment.mash_max_volume,
            ),
            (
                Vessel::SpargeTank,
                params.sparge_water,
                equipment.sparge_max_volume,
            ),
        ],
        Activity::Boil(params) => vec![(
            Vessel::Kettle,
            input.volume + params.water,
            equipment.boil_max_volume,
        )],
        Activity::Ferment(params) => vec![(
            Vessel::Fermenter,
            input.volume + params.water,
            equipment.fermentation_max_volume,
        )],
        Activity::Bottle(_) | Activity::Split(_) | Activity::Merge(_) => Vec::new(),
    }
}
