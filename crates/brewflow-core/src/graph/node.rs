//! Node types of a recipe graph.
//!
//! A recipe alternates [`StateNode`]s (the liquid at one point) and
//! [`ActivityNode`]s (what is done to it). Each node has a [`NodeId`] that
//! stays stable across edits, while its position in the node list shifts.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activity::Activity;
use crate::flow::Flow;

/// Identifier of a recipe graph inside a [`Brewery`](crate::Brewery).
///
/// Graph IDs are assigned sequentially and never reused by a brewery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphId(pub(crate) u32);

impl GraphId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

/// Identifier of a node inside one recipe graph.
///
/// Node IDs are assigned sequentially and never reused within a graph.
/// They remain stable when other nodes are inserted or deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Address of a node in another graph, resolved through the brewery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeRef {
    /// Graph holding the node.
    pub graph: GraphId,
    /// Node within that graph.
    pub node: NodeId,
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.graph, self.node)
    }
}

/// The liquid at one point of the process.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateNode {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) flow: Flow,
}

impl StateNode {
    pub(crate) fn new(id: NodeId, label: &str, flow: Flow) -> Self {
        Self {
            id,
            label: label.to_string(),
            flow,
        }
    }

    /// Stable node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Human-readable label, e.g. `"Post-boil wort"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Flow at this point (meaningful once [`Flow::is_ready`]).
    pub fn flow(&self) -> &Flow {
        &self.flow
    }
}

/// An activity placed in a recipe.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActivityNode {
    pub(crate) id: NodeId,
    pub(crate) activity: Activity,
}

impl ActivityNode {
    /// Stable node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The activity and its parameters.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }
}

/// Either kind of node. Even positions hold states, odd positions activities.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A state node.
    State(StateNode),
    /// An activity node.
    Activity(ActivityNode),
}

impl Node {
    /// Stable node identifier.
    pub fn id(&self) -> NodeId {
        match self {
            Self::State(s) => s.id,
            Self::Activity(a) => a.id,
        }
    }

    /// Returns the state if this is a state node.
    pub fn as_state(&self) -> Option<&StateNode> {
        match self {
            Self::State(s) => Some(s),
            Self::Activity(_) => None,
        }
    }

    /// Returns the activity node if this is one.
    pub fn as_activity(&self) -> Option<&ActivityNode> {
        match self {
            Self::Activity(a) => Some(a),
            Self::State(_) => None,
        }
    }

    pub(crate) fn as_state_mut(&mut self) -> Option<&mut StateNode> {
        match self {
            Self::State(s) => Some(s),
            Self::Activity(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display() {
        assert_eq!(GraphId(3).to_string(), "graph#3");
        assert_eq!(NodeId(7).to_string(), "node#7");
        let r = NodeRef {
            graph: GraphId(1),
            node: NodeId(2),
        };
        assert_eq!(r.to_string(), "graph#1/node#2");
    }

    #[test]
    fn node_accessors() {
        let state = Node::State(StateNode::new(NodeId(0), "Mash water", Flow::water(10.0)));
        assert_eq!(state.id(), NodeId(0));
        assert_eq!(state.as_state().map(StateNode::label), Some("Mash water"));
        assert!(state.as_activity().is_none());
    }
}
