//! Error types for recipe editing, transformation functions and brewing.

use thiserror::Error;

use crate::activity::ActivityKind;
use crate::graph::GraphId;

/// A transformation function met a physically invalid state.
///
/// Domain errors mean the recipe is misconfigured (e.g. boiling off more
/// water than the kettle holds). They never indicate a bug in the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// A computation would divide by a zero (or negative) volume.
    #[error("{0} requires a positive volume")]
    ZeroVolume(&'static str),

    /// The resulting volume is negative.
    #[error("resulting volume {0:.3} L is negative")]
    NegativeVolume(f64),

    /// A split requests more liquid than is available.
    #[error("cannot transfer {requested:.3} L, only {available:.3} L available")]
    TransferExceedsVolume {
        /// Requested transfer volume in liters.
        requested: f64,
        /// Volume of the flow being split in liters.
        available: f64,
    },

    /// A gravity below pure water where the formula is undefined.
    #[error("gravity {0:.4} is below the water baseline of 1.000")]
    GravityBelowWater(f64),

    /// A parameter lies outside its physical domain.
    #[error("parameter '{name}' has invalid value {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A computed quantity is NaN or infinite.
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    /// A split or merge activity ran without the flow of its linked graph.
    #[error("{0} has no linked input")]
    UnlinkedInput(ActivityKind),
}

/// Errors from editing or brewing recipe graphs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BrewError {
    /// The addressed graph does not exist.
    #[error("{0} not found")]
    UnknownGraph(GraphId),

    /// A signed position below `-1`.
    #[error("invalid position {0}: only -1 may address the end")]
    NegativePosition(isize),

    /// An edit referenced a node outside the graph or of the wrong kind.
    #[error("invalid position {position} in graph of length {len}: {reason}")]
    InvalidPosition {
        /// Requested position.
        position: isize,
        /// Number of nodes in the graph.
        len: usize,
        /// Why the position was rejected.
        reason: &'static str,
    },

    /// A split or merge lacks a usable target.
    #[error("missing target: {0}")]
    MissingTarget(String),

    /// An edit supplied a parameter outside its domain.
    #[error("parameter '{name}' has invalid value {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A transformation function failed while brewing a graph.
    #[error("{kind} at position {position} of {graph} failed: {source}")]
    Domain {
        /// Graph that failed.
        graph: GraphId,
        /// Position of the failing activity.
        position: usize,
        /// Kind of the failing activity.
        kind: ActivityKind,
        /// Underlying domain error.
        #[source]
        source: DomainError,
    },

    /// A graph could not finish because a graph it depends on failed.
    #[error("{graph} depends on {upstream}, which failed")]
    UpstreamFailed {
        /// Graph that could not finish.
        graph: GraphId,
        /// Failed graph it was waiting for.
        upstream: GraphId,
    },

    /// Brewing stopped with graphs still pending (cyclic or dangling links).
    #[error("unresolved dependencies in {}", list_graphs(.graphs))]
    UnresolvedDependency {
        /// Graphs that could not make progress.
        graphs: Vec<GraphId>,
    },

    /// The caller-imposed pass limit was reached.
    #[error("pass limit {limit} reached with pending {}", list_graphs(.graphs))]
    PassLimitExceeded {
        /// Configured maximum number of passes.
        limit: usize,
        /// Graphs still pending.
        graphs: Vec<GraphId>,
    },
}

fn list_graphs(graphs: &[GraphId]) -> String {
    graphs
        .iter()
        .map(|g| g.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for graph operations.
pub type BrewResult<T> = Result<T, BrewError>;
