//! The recipe arena.
//!
//! A [`Brewery`] owns every [`ProcessGraph`] and addresses them by
//! [`GraphId`]. Cross-graph links are plain IDs resolved through the arena,
//! so no recipe ever holds a pointer into another. All edits that touch two
//! recipes (split, merge) take `&mut Brewery`, which gives exclusive access
//! to both sides at once.
//!
//! Links only exist in pairs. Deleting either side of a link deletes the
//! other, removing a recipe deletes every link to it, and structural edits
//! keep each incoming merge pointed at the state its outgoing merge drains.

use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, MergeLink, SplitLink};
use crate::constants::BrewConstants;
use crate::equipment::Equipment;
use crate::error::{BrewError, BrewResult};

use super::node::{GraphId, NodeRef, StateNode};
use super::process::{Position, ProcessGraph};

/// Arena of recipe graphs plus the constants they are brewed with.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Brewery {
    graphs: BTreeMap<GraphId, ProcessGraph>,
    next_graph: u32,
    constants: BrewConstants,
}

impl Brewery {
    /// Creates an empty brewery with default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty brewery with the given constants.
    pub fn with_constants(constants: BrewConstants) -> Self {
        Self {
            constants,
            ..Self::default()
        }
    }

    /// Constants used by every transformation.
    pub fn constants(&self) -> &BrewConstants {
        &self.constants
    }

    /// Replaces the constants.
    pub fn set_constants(&mut self, constants: BrewConstants) {
        self.constants = constants;
    }

    /// Creates a recipe holding only its initial state (no water yet).
    pub fn create_graph(&mut self, equipment: impl Into<Arc<Equipment>>) -> GraphId {
        let id = GraphId(self.next_graph);
        self.next_graph += 1;
        self.graphs.insert(id, ProcessGraph::new(equipment.into()));
        #[cfg(feature = "tracing")]
        tracing::debug!("brewery_create: {id}");
        id
    }

    /// Removes a recipe together with every link other recipes hold to it.
    ///
    /// Liquid split off to the removed recipe stays in its source, and a
    /// recipe that merged into it keeps its own flow. The returned graph
    /// still carries its side of those links.
    pub fn remove_graph(&mut self, id: GraphId) -> BrewResult<ProcessGraph> {
        let graph = self.graphs.remove(&id).ok_or(BrewError::UnknownGraph(id))?;
        let others: Vec<GraphId> = self.graphs.keys().copied().collect();
        for other in others {
            loop {
                let Some(position) = self.graphs.get(&other).and_then(|g| g.links_to(id)) else {
                    break;
                };
                self.edit(other, |g| g.remove_at(position))?;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("brewery_remove: {id}");
        Ok(graph)
    }

    /// Looks up a recipe.
    pub fn graph(&self, id: GraphId) -> BrewResult<&ProcessGraph> {
        self.graphs.get(&id).ok_or(BrewError::UnknownGraph(id))
    }

    /// Looks up a recipe for editing its equipment, input or parameters.
    pub fn graph_mut(&mut self, id: GraphId) -> BrewResult<&mut ProcessGraph> {
        self.graphs.get_mut(&id).ok_or(BrewError::UnknownGraph(id))
    }

    /// IDs of all recipes in creation order.
    pub fn graph_ids(&self) -> impl Iterator<Item = GraphId> + '_ {
        self.graphs.keys().copied()
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Returns `true` if the brewery holds no recipe.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub(crate) fn graphs(&self) -> &BTreeMap<GraphId, ProcessGraph> {
        &self.graphs
    }

    pub(crate) fn graphs_mut(&mut self) -> &mut BTreeMap<GraphId, ProcessGraph> {
        &mut self.graphs
    }

    /// Inserts a process activity and returns its index.
    ///
    /// Split and merge activities are created with [`split`](Self::split)
    /// and [`merge`](Self::merge) instead.
    pub fn insert_activity(
        &mut self,
        graph: GraphId,
        activity: impl Into<Activity>,
        position: Position,
    ) -> BrewResult<usize> {
        let activity = activity.into();
        if activity.is_link() {
            return Err(BrewError::MissingTarget(format!(
                "{} activities are created by linking two recipes",
                activity.kind()
            )));
        }
        self.edit(graph, |g| {
            let index = g.slot(position)?;
            g.insert_at(index, activity);
            Ok(index)
        })
    }

    /// Deletes the activity at `position` together with its output state.
    ///
    /// Deleting a split or merge also deletes its other side, so no recipe is
    /// left with half a link.
    pub fn delete_activity(&mut self, graph: GraphId, position: usize) -> BrewResult<Activity> {
        let partner = self.partner(graph, position)?;
        let removed = self.edit(graph, |g| g.remove_at(position))?;
        if let Some((other, at)) = partner {
            self.edit(other, |g| g.remove_at(at))?;
            #[cfg(feature = "tracing")]
            tracing::debug!("brewery_unlink: {graph} at {position} and {other} at {at}");
        }
        Ok(removed)
    }

    /// Removes every activity of a recipe, keeping its initial flow and
    /// equipment. Links are deleted on both sides first.
    pub fn reset(&mut self, graph: GraphId) -> BrewResult<()> {
        loop {
            let Some(position) = self.graph(graph)?.find_activity(Activity::is_link) else {
                break;
            };
            self.delete_activity(graph, position)?;
        }
        self.graph_mut(graph)?.reset()
    }

    /// Locates the other side of the link at `position` of `graph`.
    fn partner(&self, graph: GraphId, position: usize) -> BrewResult<Option<(GraphId, usize)>> {
        let g = self.graph(graph)?;
        let Some(node) = g.activity(position) else {
            return Ok(None);
        };
        let found = match node.activity() {
            Activity::Split(SplitLink::Outgoing { target, .. }) => {
                let me = NodeRef {
                    graph,
                    node: node.id(),
                };
                self.graphs.get(target).and_then(|t| {
                    t.find_activity(|a| {
                        matches!(a, Activity::Split(SplitLink::Incoming { source }) if *source == me)
                    })
                    .map(|at| (*target, at))
                })
            }
            Activity::Merge(MergeLink::Outgoing { target }) => {
                let drained = g.state(position - 1).map(StateNode::id);
                self.graphs.get(target).zip(drained).and_then(|(t, node)| {
                    let me = NodeRef { graph, node };
                    t.find_activity(|a| {
                        matches!(a, Activity::Merge(MergeLink::Incoming { source }) if *source == me)
                    })
                    .map(|at| (*target, at))
                })
            }
            Activity::Split(SplitLink::Incoming { source }) => {
                self.graphs.get(&source.graph).and_then(|s| {
                    let at = s.position_of(source.node)?;
                    matches!(
                        s.activity(at).map(|a| a.activity()),
                        Some(Activity::Split(SplitLink::Outgoing { target, .. })) if *target == graph
                    )
                    .then_some((source.graph, at))
                })
            }
            Activity::Merge(MergeLink::Incoming { source }) => {
                self.graphs.get(&source.graph).and_then(|s| {
                    let at = s.position_of(source.node)? + 1;
                    matches!(
                        s.activity(at).map(|a| a.activity()),
                        Some(Activity::Merge(MergeLink::Outgoing { target })) if *target == graph
                    )
                    .then_some((source.graph, at))
                })
            }
            _ => None,
        };
        Ok(found)
    }

    /// Applies a structural edit to one recipe, then points every incoming
    /// merge fed by it at the state its outgoing merge now drains.
    fn edit<T>(
        &mut self,
        graph: GraphId,
        f: impl FnOnce(&mut ProcessGraph) -> BrewResult<T>,
    ) -> BrewResult<T> {
        let g = self.graph_mut(graph)?;
        let before = g.merge_sources();
        let out = f(g)?;
        let after = g.merge_sources();
        for (activity, target, old) in before {
            let Some(&(_, _, new)) = after.iter().find(|(a, ..)| *a == activity) else {
                continue;
            };
            if new != old
                && let Some(tgt) = self.graphs.get_mut(&target)
            {
                tgt.retarget_merge(NodeRef { graph, node: old }, NodeRef { graph, node: new });
            }
        }
        Ok(out)
    }

    /// Moves `volume` liters of the state at `position` of `source` into
    /// `target`.
    ///
    /// The source gets an outgoing split right after that state; the target
    /// gets its start flow from an incoming split right after its initial
    /// state and adopts the source's equipment.
    pub fn split(
        &mut self,
        source: GraphId,
        position: usize,
        target: GraphId,
        volume: f64,
    ) -> BrewResult<()> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(BrewError::InvalidParameter {
                name: "split volume",
                value: volume,
            });
        }
        if source == target {
            return Err(BrewError::MissingTarget(format!(
                "{source} cannot split into itself"
            )));
        }
        let equipment = {
            let src = self.graph(source)?;
            src.after_state(position)?;
            Arc::clone(src.equipment())
        };
        let tgt = self
            .graphs
            .get(&target)
            .ok_or_else(|| BrewError::MissingTarget(format!("{target} does not exist")))?;
        if tgt
            .find_activity(|a| matches!(a, Activity::Split(SplitLink::Incoming { .. })))
            .is_some()
        {
            return Err(BrewError::MissingTarget(format!(
                "{target} already starts from a split"
            )));
        }

        let node = self.edit(source, |g| {
            Ok(g.insert_at(position + 1, Activity::Split(SplitLink::Outgoing { target, volume })))
        })?;
        self.edit(target, |g| {
            g.insert_at(
                1,
                Activity::Split(SplitLink::Incoming {
                    source: NodeRef {
                        graph: source,
                        node,
                    },
                }),
            );
            g.set_equipment(equipment);
            Ok(())
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!("brewery_split: {volume} L from {source} at {position} into {target}");
        Ok(())
    }

    /// Merges the state at `source_position` of `source` into the state at
    /// `target_position` of `target`.
    ///
    /// The source flow is drained by an outgoing merge; the target combines
    /// its flow with it through an incoming merge.
    pub fn merge(
        &mut self,
        source: GraphId,
        source_position: usize,
        target: GraphId,
        target_position: usize,
    ) -> BrewResult<()> {
        if source == target {
            return Err(BrewError::MissingTarget(format!(
                "{source} cannot merge into itself"
            )));
        }
        let state = {
            let src = self.graph(source)?;
            src.after_state(source_position)?;
            src.nodes()[source_position].id()
        };
        self.graphs
            .get(&target)
            .ok_or_else(|| BrewError::MissingTarget(format!("{target} does not exist")))?
            .after_state(target_position)?;

        self.edit(source, |g| {
            Ok(g.insert_at(source_position + 1, Activity::Merge(MergeLink::Outgoing { target })))
        })?;
        self.edit(target, |g| {
            Ok(g.insert_at(
                target_position + 1,
                Activity::Merge(MergeLink::Incoming {
                    source: NodeRef {
                        graph: source,
                        node: state,
                    },
                }),
            ))
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "brewery_merge: {source} at {source_position} into {target} at {target_position}"
        );
        Ok(())
    }

    /// Marks the most recently computed state of a recipe as pending again.
    pub fn undo(&mut self, graph: GraphId) -> BrewResult<Option<usize>> {
        Ok(self.graph_mut(graph)?.undo())
    }
}
