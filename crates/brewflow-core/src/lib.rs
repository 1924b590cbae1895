//! Brewflow Core - brewing process graphs
//!
//! This crate models a brewing process as a chain of transformation steps
//! applied to a liquid-state record ([`Flow`]) and propagates that record
//! through one or more linked recipes.
//!
//! # Core Abstractions
//!
//! ## Recipes
//!
//! - [`ProcessGraph`] - Alternating sequence of state and activity nodes
//! - [`Brewery`] - Arena owning recipes, addressed by [`GraphId`]
//! - [`Position`] - Insertion point for new activities
//!
//! ## Activities
//!
//! - [`Activity`] - Mash, boil, ferment, bottle, split or merge with typed parameters
//! - [`MashParams`], [`BoilParams`], [`FermentParams`], [`BottleParams`]
//! - [`SplitLink`], [`MergeLink`] - Cross-recipe links (created by the brewery)
//!
//! ## Brewing
//!
//! - [`Brewery::brew`] - Dependency-aware traversal of all linked recipes
//! - [`BrewReport`] - Final flow or error per recipe, plus [`CapacityWarning`]s
//! - [`transform`] - The pure transformation function of each activity
//!
//! ## Configuration
//!
//! - [`Equipment`] - Vessel capacities, losses, efficiency (shared per recipe)
//! - [`BrewConstants`] - Empirical constants passed to every transformation
//!
//! ## Utilities
//!
//! - Unit and gravity conversions: [`sg_to_plato`], [`plato_to_sg`],
//!   [`abv_from_gravity`], [`co2_saturation`], etc.
//!
//! # Features
//!
//! - `tracing` (default): `debug!` for edits and executed activities,
//!   `warn!` for capacity overruns and failed recipes
//! - `serde`: `Serialize`/`Deserialize` for all records
//!
//! # Example
//!
//! ```rust
//! use brewflow_core::{
//!     BoilParams, Brewery, Equipment, FermentParams, Flow, HopAddition, MashParams, Position,
//! };
//!
//! let mut brewery = Brewery::new();
//! let ale = brewery.create_graph(Equipment::default());
//! brewery.graph_mut(ale)?.set_initial_flow(Flow::water(10.0));
//!
//! brewery.insert_activity(
//!     ale,
//!     MashParams::new().with_grain("Maris Otter", 2.0, 6.0).with_sparge_water(4.0),
//!     Position::End,
//! )?;
//! brewery.insert_activity(
//!     ale,
//!     BoilParams::new(60.0).with_hop(HopAddition::pellet("Fuggle", 15.0, 4.5, 60.0)),
//!     Position::End,
//! )?;
//! brewery.insert_activity(ale, FermentParams::new(19.0, 75.0), Position::End)?;
//!
//! let report = brewery.brew(ale)?;
//! let beer = report.flow(ale).unwrap();
//! assert!(beer.abv > 0.0);
//! # Ok::<(), brewflow_core::BrewError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Pure transformations**: no hidden state, identical inputs give identical outputs
//! - **No NaN leaks**: invalid physics are [`DomainError`]s, not silent garbage
//! - **IDs, not pointers**: cross-recipe links are resolved through the arena
//! - **Exclusive edits**: two-recipe edits take `&mut Brewery`

pub mod activity;
pub mod constants;
pub mod conversions;
pub mod equipment;
pub mod error;
pub mod flow;
pub mod graph;
pub mod transform;

// Re-export main types at crate root
pub use activity::{
    Activity, ActivityKind, BoilParams, BottleParams, FermentParams, GrainAddition, HopAddition,
    HopForm, HopUsage, MashParams, MergeLink, ProcessParams, SplitLink, Sugar, SugarAdditions,
    Yeast, YeastForm,
};
pub use constants::BrewConstants;
pub use conversions::{
    abv_from_gravity, abv_to_abw, abw_to_abv, apparent_attenuation, brix_to_sg,
    celsius_to_fahrenheit, celsius_to_kelvin, co2_saturation, concentration_to_plato, ebc_to_srm,
    fahrenheit_to_celsius, gallons_to_liters, grams_to_ounces, kilograms_to_pounds,
    liters_to_gallons, ounces_to_grams, plato_to_sg, pounds_to_kilograms, sg_to_brix, sg_to_plato,
    srm_to_ebc,
};
pub use equipment::Equipment;
pub use error::{BrewError, BrewResult, DomainError};
pub use flow::{Flow, FlowStatus};
pub use graph::{
    ActivityNode, BrewOptions, BrewReport, Brewery, CapacityWarning, DEFAULT_MAX_PASSES, GraphId,
    INITIAL_LABEL, Node, NodeId, NodeRef, Position, ProcessGraph, StateNode,
};
pub use transform::Vessel;
