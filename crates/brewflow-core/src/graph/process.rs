//! A single recipe: the alternating state/activity sequence.
//!
//! [`ProcessGraph`] holds `[state₀, activity₁, state₁, …]`. The activity at
//! index `i` consumes the state at `i − 1` and produces the state at `i + 1`,
//! so the list always has odd length and starts and ends with a state.
//! Insertions and deletions keep that shape by adding or removing an
//! activity together with its output state.

use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, MergeLink, ProcessParams, SplitLink};
use crate::equipment::Equipment;
use crate::error::{BrewError, BrewResult};
use crate::flow::Flow;

use super::node::{ActivityNode, GraphId, Node, NodeId, NodeRef, StateNode};

/// Label of the initial state of every recipe.
pub const INITIAL_LABEL: &str = "Mash water";

/// Where to insert an activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// After the last state.
    End,
    /// At an activity slot (odd index below the graph length). The activity
    /// lands at this index and its output feeds the activity previously there.
    At(usize),
}

impl TryFrom<isize> for Position {
    type Error = BrewError;

    /// `-1` addresses the end; other negative values are rejected.
    fn try_from(value: isize) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::End),
            v if v >= 0 => Ok(Self::At(v.unsigned_abs())),
            v => Err(BrewError::NegativePosition(v)),
        }
    }
}

fn signed(position: usize) -> isize {
    isize::try_from(position).unwrap_or(isize::MAX)
}

/// One recipe.
///
/// Deserialization checks the node list shape and rejects inputs that could
/// not have been built through the editing API.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawProcessGraph"))]
pub struct ProcessGraph {
    nodes: Vec<Node>,
    equipment: Arc<Equipment>,
    next_node: u32,
}

impl ProcessGraph {
    pub(crate) fn new(equipment: Arc<Equipment>) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            equipment,
            next_node: 0,
        };
        let id = graph.alloc_id();
        graph.nodes.push(Node::State(StateNode::new(
            id,
            INITIAL_LABEL,
            Flow::water(0.0).ready(),
        )));
        graph
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Number of nodes (always odd).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a recipe holds at least its initial state.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of activities.
    pub fn activity_count(&self) -> usize {
        self.nodes.len() / 2
    }

    /// All nodes in process order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// State nodes in process order.
    pub fn states(&self) -> impl Iterator<Item = &StateNode> {
        self.nodes.iter().filter_map(Node::as_state)
    }

    /// Activity nodes in process order.
    pub fn activities(&self) -> impl Iterator<Item = &ActivityNode> {
        self.nodes.iter().filter_map(Node::as_activity)
    }

    /// State node at `position`, if that index holds a state.
    pub fn state(&self, position: usize) -> Option<&StateNode> {
        self.nodes.get(position).and_then(Node::as_state)
    }

    /// Activity node at `position`, if that index holds an activity.
    pub fn activity(&self, position: usize) -> Option<&ActivityNode> {
        self.nodes.get(position).and_then(Node::as_activity)
    }

    /// Current index of a node.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    /// Equipment shared by every activity of this recipe.
    pub fn equipment(&self) -> &Arc<Equipment> {
        &self.equipment
    }

    /// Replaces the equipment. Computed states are not recomputed.
    pub fn set_equipment(&mut self, equipment: impl Into<Arc<Equipment>>) {
        self.equipment = equipment.into();
    }

    /// The user-supplied input (mash water).
    pub fn initial_flow(&self) -> &Flow {
        self.state_flow(0)
    }

    /// Sets the user-supplied input. It is always [`Ready`](crate::FlowStatus::Ready).
    pub fn set_initial_flow(&mut self, flow: Flow) {
        if let Some(state) = self.nodes.first_mut().and_then(Node::as_state_mut) {
            state.flow = flow.ready();
        }
    }

    /// Flow of the last state.
    pub fn final_flow(&self) -> &Flow {
        self.state_flow(self.nodes.len() - 1)
    }

    fn state_flow(&self, position: usize) -> &Flow {
        match &self.nodes[position] {
            Node::State(s) => &s.flow,
            Node::Activity(_) => unreachable!("even positions hold states"),
        }
    }

    /// Mutable access to the parameters of the process activity at
    /// `position`.
    ///
    /// The activity must be of the kind `T` belongs to, so the activity kind
    /// never changes in place and links are out of reach. Use
    /// [`set_split_volume`](Self::set_split_volume) for the transfer volume.
    ///
    /// ```rust
    /// use brewflow_core::{BoilParams, Brewery, Equipment, MashParams, Position};
    ///
    /// let mut brewery = Brewery::new();
    /// let g = brewery.create_graph(Equipment::default());
    /// brewery.insert_activity(g, BoilParams::new(60.0), Position::End)?;
    ///
    /// let recipe = brewery.graph_mut(g)?;
    /// recipe.params_mut::<BoilParams>(1)?.time = 90.0;
    /// assert!(recipe.params_mut::<MashParams>(1).is_err());
    /// # Ok::<(), brewflow_core::BrewError>(())
    /// ```
    pub fn params_mut<T: ProcessParams>(&mut self, position: usize) -> BrewResult<&mut T> {
        let len = self.nodes.len();
        let activity = match self.nodes.get_mut(position) {
            Some(Node::Activity(node)) => &mut node.activity,
            _ => {
                return Err(BrewError::InvalidPosition {
                    position: signed(position),
                    len,
                    reason: "not an activity",
                });
            }
        };
        T::from_activity_mut(activity).ok_or(BrewError::InvalidPosition {
            position: signed(position),
            len,
            reason: "activity is of another kind",
        })
    }

    /// Changes the volume moved by an outgoing split.
    pub fn set_split_volume(&mut self, position: usize, volume: f64) -> BrewResult<()> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(BrewError::InvalidParameter {
                name: "split volume",
                value: volume,
            });
        }
        let len = self.nodes.len();
        match self.nodes.get_mut(position) {
            Some(Node::Activity(ActivityNode {
                activity: Activity::Split(SplitLink::Outgoing { volume: v, .. }),
                ..
            })) => {
                *v = volume;
                Ok(())
            }
            _ => Err(BrewError::InvalidPosition {
                position: signed(position),
                len,
                reason: "not an outgoing split",
            }),
        }
    }

    /// Removes every activity, keeping the initial state and equipment.
    ///
    /// Fails while the recipe holds a split or merge, since its partner lives
    /// in another recipe. [`Brewery::reset`](crate::Brewery::reset) removes
    /// both sides first.
    pub fn reset(&mut self) -> BrewResult<()> {
        if let Some(position) = self.find_activity(Activity::is_link) {
            return Err(BrewError::InvalidPosition {
                position: signed(position),
                len: self.nodes.len(),
                reason: "linked activities are removed through the brewery",
            });
        }
        self.nodes.truncate(1);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_reset: cleared to initial state");
        Ok(())
    }

    /// Marks the most recently computed state as pending again.
    ///
    /// Returns the position of that state, or `None` when nothing past the
    /// initial state has been computed.
    pub fn undo(&mut self) -> Option<usize> {
        let position = (2..self.nodes.len())
            .step_by(2)
            .rev()
            .find(|&p| self.state_flow(p).is_ready())?;
        if let Some(state) = self.nodes[position].as_state_mut() {
            state.flow = Flow::default();
        }
        Some(position)
    }

    /// First activity index open for insertion. An incoming split provides
    /// the start flow, so nothing may run before it.
    pub(crate) fn min_slot(&self) -> usize {
        match self.activity(1).map(ActivityNode::activity) {
            Some(Activity::Split(SplitLink::Incoming { .. })) => 3,
            _ => 1,
        }
    }

    /// Returns `true` if an activity may be inserted at `index`.
    pub(crate) fn insertable(&self, index: usize) -> bool {
        index % 2 == 1 && index <= self.nodes.len() && index >= self.min_slot()
    }

    /// Resolves a [`Position`] to an activity index.
    pub(crate) fn slot(&self, position: Position) -> BrewResult<usize> {
        let len = self.nodes.len();
        let index = match position {
            Position::End => len,
            Position::At(i) if i < len => i,
            Position::At(i) => {
                return Err(BrewError::InvalidPosition {
                    position: signed(i),
                    len,
                    reason: "activities go to odd positions inside the graph",
                });
            }
        };
        if self.insertable(index) {
            Ok(index)
        } else if index % 2 == 0 {
            Err(BrewError::InvalidPosition {
                position: signed(index),
                len,
                reason: "activities go to odd positions inside the graph",
            })
        } else {
            Err(BrewError::InvalidPosition {
                position: signed(index),
                len,
                reason: "nothing may run before an incoming split",
            })
        }
    }

    /// Checks that `position` is a state a new activity may follow.
    pub(crate) fn after_state(&self, position: usize) -> BrewResult<()> {
        self.check_state(position)?;
        if self.insertable(position + 1) {
            Ok(())
        } else {
            Err(BrewError::InvalidPosition {
                position: signed(position),
                len: self.nodes.len(),
                reason: "nothing may run before an incoming split",
            })
        }
    }

    /// Checks that `position` addresses a state.
    pub(crate) fn check_state(&self, position: usize) -> BrewResult<()> {
        if position % 2 == 0 && position < self.nodes.len() {
            Ok(())
        } else {
            Err(BrewError::InvalidPosition {
                position: signed(position),
                len: self.nodes.len(),
                reason: "not a state",
            })
        }
    }

    /// Inserts `activity` and its output state at activity slot `index`.
    ///
    /// `index` must come from [`slot`](Self::slot) or be one past a state.
    pub(crate) fn insert_at(&mut self, index: usize, activity: Activity) -> NodeId {
        let label = activity.output_label();
        let activity_id = self.alloc_id();
        let state_id = self.alloc_id();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "graph_insert: {} {activity_id} at {index}",
            activity.kind()
        );
        let state = Node::State(StateNode::new(state_id, label, Flow::default()));
        let activity = Node::Activity(ActivityNode {
            id: activity_id,
            activity,
        });
        self.nodes.splice(index..index, [activity, state]);
        activity_id
    }

    /// Removes the activity at `position` and its output state.
    pub(crate) fn remove_at(&mut self, position: usize) -> BrewResult<Activity> {
        let len = self.nodes.len();
        if position % 2 == 0 || position >= len {
            return Err(BrewError::InvalidPosition {
                position: signed(position),
                len,
                reason: "not an activity",
            });
        }
        let mut removed = self.nodes.drain(position..position + 2);
        match removed.next() {
            Some(Node::Activity(node)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    "graph_delete: {} {} at {position}",
                    node.activity.kind(),
                    node.id
                );
                Ok(node.activity)
            }
            _ => unreachable!("odd positions hold activities"),
        }
    }

    /// Position of the first activity matching `pred`.
    pub(crate) fn find_activity(&self, pred: impl Fn(&Activity) -> bool) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.as_activity().is_some_and(|a| pred(&a.activity)))
    }

    /// Position of the first activity linked to graph `id`.
    pub(crate) fn links_to(&self, id: GraphId) -> Option<usize> {
        self.find_activity(|a| a.linked_graph() == Some(id))
    }

    /// Every outgoing merge as `(activity, target, state it drains)`.
    pub(crate) fn merge_sources(&self) -> Vec<(NodeId, GraphId, NodeId)> {
        self.nodes
            .windows(2)
            .filter_map(|pair| match pair {
                [
                    Node::State(state),
                    Node::Activity(ActivityNode {
                        id,
                        activity: Activity::Merge(MergeLink::Outgoing { target }),
                    }),
                ] => Some((*id, *target, state.id)),
                _ => None,
            })
            .collect()
    }

    /// Points the incoming merge fed by `from` at `to` instead.
    pub(crate) fn retarget_merge(&mut self, from: NodeRef, to: NodeRef) -> bool {
        for node in &mut self.nodes {
            if let Node::Activity(ActivityNode {
                activity: Activity::Merge(MergeLink::Incoming { source }),
                ..
            }) = node
                && *source == from
            {
                *source = to;
                return true;
            }
        }
        false
    }

    /// Sets every computed state back to pending; the initial state is ready.
    pub(crate) fn mark_pending(&mut self) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if let Node::State(state) = node {
                if i == 0 {
                    state.flow.status = crate::flow::FlowStatus::Ready;
                } else {
                    state.flow = Flow::default();
                }
            }
        }
    }

    pub(crate) fn is_ready_at(&self, position: usize) -> bool {
        self.state(position).is_some_and(|s| s.flow.is_ready())
    }

    pub(crate) fn store(&mut self, position: usize, flow: Flow) {
        if let Some(state) = self.nodes.get_mut(position).and_then(Node::as_state_mut) {
            state.flow = flow.ready();
        }
    }
}

/// Unchecked shape of a serialized [`ProcessGraph`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawProcessGraph {
    nodes: Vec<Node>,
    equipment: Arc<Equipment>,
    next_node: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProcessGraph> for ProcessGraph {
    type Error = &'static str;

    fn try_from(raw: RawProcessGraph) -> Result<Self, Self::Error> {
        if raw.nodes.len() % 2 == 0 {
            return Err("a recipe holds an odd number of nodes, starting with a state");
        }
        let mut seen = std::collections::BTreeSet::new();
        for (i, node) in raw.nodes.iter().enumerate() {
            match (i % 2, node) {
                (0, Node::State(_)) => {}
                (1, Node::Activity(a)) => {
                    if i != 1
                        && matches!(a.activity, Activity::Split(SplitLink::Incoming { .. }))
                    {
                        return Err("an incoming split must be the first activity");
                    }
                }
                _ => return Err("states and activities must alternate"),
            }
            let id = node.id().index();
            if id >= raw.next_node {
                return Err("node id beyond the allocation counter");
            }
            if !seen.insert(id) {
                return Err("duplicate node id");
            }
        }
        Ok(Self {
            nodes: raw.nodes,
            equipment: raw.equipment,
            next_node: raw.next_node,
        })
    }
}
