//! Recipe graphs and the traversal engine.
//!
//! A recipe is a [`ProcessGraph`]: an alternating sequence of state and
//! activity nodes. Recipes live in a [`Brewery`] arena and may be linked:
//! a split moves part of one recipe's flow into another, a merge combines
//! the flows of two recipes.
//!
//! # Editing
//!
//! ```rust
//! use brewflow_core::{BoilParams, Brewery, Equipment, Flow, MashParams, Position};
//!
//! let mut brewery = Brewery::new();
//! let pale = brewery.create_graph(Equipment::default());
//! brewery.graph_mut(pale)?.set_initial_flow(Flow::water(10.0));
//! brewery.insert_activity(pale, MashParams::new().with_grain("Pale", 2.0, 6.0), Position::End)?;
//! brewery.insert_activity(pale, BoilParams::new(60.0), Position::End)?;
//!
//! let report = brewery.brew(pale)?;
//! assert!(report.is_success());
//! # Ok::<(), brewflow_core::BrewError>(())
//! ```
//!
//! # Links
//!
//! Cross-recipe links are [`NodeRef`]s (graph ID plus node ID) resolved
//! through the brewery when brewing. The brewery keeps them paired: deleting
//! one side of a link deletes the other, and removing a recipe deletes every
//! link to it. A half link that still reaches the engine (for example from a
//! hand-edited arena) is reported as
//! [`BrewError::UnresolvedDependency`](crate::BrewError::UnresolvedDependency).

mod brewery;
pub mod engine;
pub mod node;
mod process;

pub use brewery::Brewery;
pub use engine::{BrewOptions, BrewReport, CapacityWarning, DEFAULT_MAX_PASSES};
pub use node::{ActivityNode, GraphId, Node, NodeId, NodeRef, StateNode};
pub use process::{INITIAL_LABEL, Position, ProcessGraph};
