//! Dependency-aware traversal of linked recipes.
//!
//! Brewing a recipe brews every recipe linked to it (directly or through
//! other links) as one unit:
//!
//! 1. **Closure**: collect all graphs reachable through split and merge
//!    links, in either direction.
//! 2. **Reset**: the initial state of each graph is ready, all other states
//!    pending.
//! 3. **Passes**: scan every unfinished graph left to right and run each
//!    activity whose input (and linked input, for incoming splits and
//!    merges) is ready. A domain error fails that graph only.
//! 4. **Fixpoint**: stop when every graph finished or a pass made no
//!    progress. Graphs stuck behind a failed graph get
//!    [`BrewError::UpstreamFailed`]; any other stuck graph means a cyclic or
//!    dangling link and the whole brew returns
//!    [`BrewError::UnresolvedDependency`].

use std::collections::{BTreeMap, BTreeSet, VecDeque};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, MergeLink, SplitLink};
use crate::error::{BrewError, BrewResult};
use crate::flow::Flow;
use crate::transform::{self, LinkedInput, Vessel};

use super::brewery::Brewery;
use super::node::{GraphId, NodeRef};
use super::process::ProcessGraph;

/// Default cap on traversal passes.
pub const DEFAULT_MAX_PASSES: usize = 1000;

/// Options for [`Brewery::brew_with`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrewOptions {
    /// Maximum number of passes before giving up with
    /// [`BrewError::PassLimitExceeded`].
    pub max_passes: usize,
}

impl Default for BrewOptions {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// A vessel filled beyond its capacity during a brew.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CapacityWarning {
    /// Recipe of the activity.
    pub graph: GraphId,
    /// Position of the activity.
    pub position: usize,
    /// Overfilled vessel.
    pub vessel: Vessel,
    /// Required volume in liters.
    pub volume: f64,
    /// Vessel capacity in liters.
    pub capacity: f64,
}

/// Result of brewing a set of linked recipes.
#[derive(Clone, Debug, PartialEq)]
pub struct BrewReport {
    /// Final flow, or the reason it could not be computed, per recipe.
    pub outcomes: BTreeMap<GraphId, Result<Flow, BrewError>>,
    /// Number of traversal passes.
    pub passes: usize,
    /// Capacity overruns, in execution order.
    pub warnings: Vec<CapacityWarning>,
}

impl BrewReport {
    /// Final flow of a recipe, if it brewed successfully.
    pub fn flow(&self, graph: GraphId) -> Option<&Flow> {
        self.outcomes.get(&graph).and_then(|r| r.as_ref().ok())
    }

    /// Failure of a recipe, if any.
    pub fn error(&self, graph: GraphId) -> Option<&BrewError> {
        self.outcomes.get(&graph).and_then(|r| r.as_ref().err())
    }

    /// Returns `true` if every recipe brewed successfully.
    pub fn is_success(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }
}

/// What keeps an activity from running.
enum Blocked {
    /// Waiting for a state of another graph.
    On(GraphId),
    /// The linked node no longer exists.
    Dangling,
}

/// Linked input of the activity at `position` of `id`, or why it is
/// unavailable.
///
/// Both sides of a link are checked against each other, so a half link left
/// in the arena blocks as [`Blocked::Dangling`] instead of running unpaired.
fn linked_input<'a>(
    graphs: &'a BTreeMap<GraphId, ProcessGraph>,
    id: GraphId,
    position: usize,
) -> Result<Option<LinkedInput<'a>>, Blocked> {
    let graph = graphs.get(&id).ok_or(Blocked::Dangling)?;
    let node = graph.activity(position).ok_or(Blocked::Dangling)?;
    match node.activity() {
        Activity::Split(SplitLink::Outgoing { target, .. }) => {
            let me = NodeRef {
                graph: id,
                node: node.id(),
            };
            paired(graphs, *target, |a| {
                matches!(a, Activity::Split(SplitLink::Incoming { source }) if *source == me)
            })?;
            Ok(None)
        }
        Activity::Merge(MergeLink::Outgoing { target }) => {
            let drained = graph.state(position - 1).ok_or(Blocked::Dangling)?;
            let me = NodeRef {
                graph: id,
                node: drained.id(),
            };
            paired(graphs, *target, |a| {
                matches!(a, Activity::Merge(MergeLink::Incoming { source }) if *source == me)
            })?;
            Ok(None)
        }
        Activity::Split(SplitLink::Incoming { source }) => {
            let (other, at) = resolve(graphs, source)?;
            let volume = match other.activity(at).map(|a| a.activity()) {
                Some(Activity::Split(SplitLink::Outgoing { target, volume })) if *target == id => {
                    *volume
                }
                _ => return Err(Blocked::Dangling),
            };
            match other.state(at - 1) {
                Some(state) if state.flow().is_ready() => Ok(Some(LinkedInput::Split {
                    source: state.flow(),
                    volume,
                })),
                _ => Err(Blocked::On(source.graph)),
            }
        }
        Activity::Merge(MergeLink::Incoming { source }) => {
            let (other, at) = resolve(graphs, source)?;
            if !matches!(
                other.activity(at + 1).map(|a| a.activity()),
                Some(Activity::Merge(MergeLink::Outgoing { target })) if *target == id
            ) {
                return Err(Blocked::Dangling);
            }
            match other.state(at) {
                Some(state) if state.flow().is_ready() => {
                    Ok(Some(LinkedInput::Merge(state.flow())))
                }
                Some(_) => Err(Blocked::On(source.graph)),
                None => Err(Blocked::Dangling),
            }
        }
        _ => Ok(None),
    }
}

/// Checks that `target` exists and holds the other side of a link.
fn paired(
    graphs: &BTreeMap<GraphId, ProcessGraph>,
    target: GraphId,
    other_side: impl Fn(&Activity) -> bool,
) -> Result<(), Blocked> {
    match graphs.get(&target) {
        Some(graph) if graph.find_activity(other_side).is_some() => Ok(()),
        _ => Err(Blocked::Dangling),
    }
}

fn resolve<'a>(
    graphs: &'a BTreeMap<GraphId, ProcessGraph>,
    node: &NodeRef,
) -> Result<(&'a ProcessGraph, usize), Blocked> {
    let graph = graphs.get(&node.graph).ok_or(Blocked::Dangling)?;
    let position = graph.position_of(node.node).ok_or(Blocked::Dangling)?;
    Ok((graph, position))
}

/// All graphs connected to `start` through links in either direction.
fn closure(graphs: &BTreeMap<GraphId, ProcessGraph>, start: GraphId) -> BTreeSet<GraphId> {
    let mut adjacent: BTreeMap<GraphId, BTreeSet<GraphId>> = BTreeMap::new();
    for (&id, graph) in graphs {
        for other in graph.activities().filter_map(|a| a.activity().linked_graph()) {
            if graphs.contains_key(&other) {
                adjacent.entry(id).or_default().insert(other);
                adjacent.entry(other).or_default().insert(id);
            }
        }
    }

    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        for &next in adjacent.get(&id).into_iter().flatten() {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// Outcome of scanning one graph during a pass.
enum Scan {
    /// Reached the final state.
    Finished,
    /// Stopped at an activity that cannot run yet.
    Waiting(Blocked),
    /// A transformation failed.
    Failed(BrewError),
}

impl Brewery {
    /// Brews `graph` and every recipe linked to it with default options.
    pub fn brew(&mut self, graph: GraphId) -> BrewResult<BrewReport> {
        self.brew_with(graph, &BrewOptions::default())
    }

    /// Brews `graph` and every recipe linked to it.
    ///
    /// Domain errors are reported per recipe in [`BrewReport::outcomes`].
    /// The call itself fails only for an unknown graph, unresolvable links
    /// or an exceeded pass limit.
    pub fn brew_with(&mut self, graph: GraphId, options: &BrewOptions) -> BrewResult<BrewReport> {
        if !self.graphs().contains_key(&graph) {
            return Err(BrewError::UnknownGraph(graph));
        }
        let members = closure(self.graphs(), graph);
        #[cfg(feature = "tracing")]
        tracing::debug!("brew: {} graph(s) reachable from {graph}", members.len());

        for id in &members {
            if let Some(g) = self.graphs_mut().get_mut(id) {
                g.mark_pending();
            }
        }

        let mut report = BrewReport {
            outcomes: BTreeMap::new(),
            passes: 0,
            warnings: Vec::new(),
        };
        let mut pending = members;
        let mut waiting: BTreeMap<GraphId, Blocked> = BTreeMap::new();

        while !pending.is_empty() {
            if report.passes >= options.max_passes {
                return Err(BrewError::PassLimitExceeded {
                    limit: options.max_passes,
                    graphs: pending.into_iter().collect(),
                });
            }
            report.passes += 1;
            let mut progress = false;
            waiting.clear();

            for id in pending.clone() {
                let (scan, ran) = self.scan(id, &mut report.warnings);
                progress |= ran;
                match scan {
                    Scan::Finished => {
                        let flow = self.graph(id)?.final_flow().clone();
                        report.outcomes.insert(id, Ok(flow));
                        pending.remove(&id);
                        progress = true;
                    }
                    Scan::Failed(err) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("brew: {err}");
                        report.outcomes.insert(id, Err(err));
                        pending.remove(&id);
                        progress = true;
                    }
                    Scan::Waiting(blocked) => {
                        waiting.insert(id, blocked);
                    }
                }
            }

            if !progress {
                break;
            }
        }

        if !pending.is_empty() {
            self.settle_stuck(&pending, &waiting, &mut report)?;
        }
        Ok(report)
    }

    /// Runs every runnable activity of one graph, left to right.
    ///
    /// Returns how the scan ended and whether any activity ran.
    fn scan(&mut self, id: GraphId, warnings: &mut Vec<CapacityWarning>) -> (Scan, bool) {
        let mut ran = false;
        let mut position = 1;
        loop {
            let step = {
                let graphs = self.graphs();
                let Some(graph) = graphs.get(&id) else {
                    return (Scan::Waiting(Blocked::Dangling), ran);
                };
                if position >= graph.len() {
                    return (Scan::Finished, ran);
                }
                if graph.is_ready_at(position + 1) {
                    position += 2;
                    continue;
                }
                let Some(node) = graph.activity(position) else {
                    return (Scan::Waiting(Blocked::Dangling), ran);
                };
                let activity = node.activity();
                let input = graph.nodes()[position - 1]
                    .as_state()
                    .map(|s| s.flow())
                    .filter(|f| f.is_ready());
                let Some(input) = input else {
                    return (Scan::Waiting(Blocked::Dangling), ran);
                };
                let linked = match linked_input(graphs, id, position) {
                    Ok(linked) => linked,
                    Err(blocked) => return (Scan::Waiting(blocked), ran),
                };

                let equipment = graph.equipment();
                for (vessel, volume, capacity) in
                    transform::vessel_loads(activity, input, equipment, self.constants())
                {
                    if volume > capacity {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            "brew: {vessel} of {id} holds {volume:.2} L, capacity {capacity:.2} L"
                        );
                        warnings.push(CapacityWarning {
                            graph: id,
                            position,
                            vessel,
                            volume,
                            capacity,
                        });
                    }
                }

                #[cfg(feature = "tracing")]
                tracing::debug!("brew: {} at {position} of {id}", activity.kind());
                transform::apply(activity, input, linked, equipment, self.constants())
                    .map_err(|source| BrewError::Domain {
                        graph: id,
                        position,
                        kind: activity.kind(),
                        source,
                    })
            };

            match step {
                Ok(flow) => {
                    if let Some(graph) = self.graphs_mut().get_mut(&id) {
                        graph.store(position + 1, flow);
                    }
                    ran = true;
                    position += 2;
                }
                Err(err) => return (Scan::Failed(err), ran),
            }
        }
    }

    /// Classifies graphs left pending when the traversal stalled.
    fn settle_stuck(
        &self,
        pending: &BTreeSet<GraphId>,
        waiting: &BTreeMap<GraphId, Blocked>,
        report: &mut BrewReport,
    ) -> BrewResult<()> {
        let failed: BTreeSet<GraphId> = report
            .outcomes
            .iter()
            .filter(|(_, r)| r.is_err())
            .map(|(&id, _)| id)
            .collect();

        let mut unresolved = Vec::new();
        let mut upstream_failures = Vec::new();
        for &id in pending {
            let mut seen = BTreeSet::from([id]);
            let mut current = id;
            let root = loop {
                match waiting.get(&current) {
                    Some(Blocked::On(next)) if failed.contains(next) => break Some(*next),
                    Some(Blocked::On(next)) if seen.insert(*next) => current = *next,
                    _ => break None,
                }
            };
            match root {
                Some(upstream) => upstream_failures.push((id, upstream)),
                None => unresolved.push(id),
            }
        }

        if !unresolved.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!("brew: {} graph(s) with unresolved links", unresolved.len());
            return Err(BrewError::UnresolvedDependency { graphs: unresolved });
        }
        for (graph, upstream) in upstream_failures {
            #[cfg(feature = "tracing")]
            tracing::warn!("brew: {graph} blocked by failed {upstream}");
            report
                .outcomes
                .insert(graph, Err(BrewError::UpstreamFailed { graph, upstream }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{BoilParams, FermentParams, MashParams};
    use crate::equipment::Equipment;
    use crate::graph::Position;

    fn recipe(b: &mut Brewery) -> GraphId {
        let g = b.create_graph(Equipment::default());
        b.graph_mut(g).unwrap().set_initial_flow(Flow::water(10.0));
        b.insert_activity(g, MashParams::new().with_grain("Pale", 2.0, 6.0), Position::End)
            .unwrap();
        b.insert_activity(g, BoilParams::new(60.0), Position::End)
            .unwrap();
        g
    }

    #[test]
    fn single_graph_brews_in_one_pass() {
        let mut b = Brewery::new();
        let g = recipe(&mut b);
        let report = b.brew(g).unwrap();
        assert_eq!(report.passes, 1);
        assert!(report.is_success());
        let flow = report.flow(g).unwrap();
        assert!(flow.is_ready());
        assert!(flow.original_gravity > 1.0);
        assert_eq!(b.graph(g).unwrap().final_flow(), flow);
    }

    #[test]
    fn empty_graph_finishes_immediately() {
        let mut b = Brewery::new();
        let g = b.create_graph(Equipment::default());
        let report = b.brew(g).unwrap();
        assert_eq!(report.flow(g), Some(&Flow::water(0.0).ready()));
    }

    #[test]
    fn unknown_graph_is_rejected() {
        let mut b = Brewery::new();
        assert_eq!(
            b.brew(GraphId(4)).unwrap_err(),
            BrewError::UnknownGraph(GraphId(4))
        );
    }

    #[test]
    fn closure_follows_links_both_ways() {
        let mut b = Brewery::new();
        let a = recipe(&mut b);
        let c = b.create_graph(Equipment::default());
        let lone = b.create_graph(Equipment::default());
        b.split(a, 2, c, 3.0).unwrap();

        let from_target = closure(b.graphs(), c);
        assert_eq!(from_target, BTreeSet::from([a, c]));
        assert!(!from_target.contains(&lone));
    }

    #[test]
    fn domain_error_fails_only_its_graph() {
        let mut b = Brewery::new();
        let good = recipe(&mut b);
        let bad = b.create_graph(Equipment::default());
        b.graph_mut(bad).unwrap().set_initial_flow(Flow::water(1.0));
        b.insert_activity(bad, BoilParams::new(60.0), Position::End)
            .unwrap();
        b.insert_activity(bad, FermentParams::new(18.0, 75.0), Position::End)
            .unwrap();
        b.merge(bad, 4, good, 4).unwrap();

        let report = b.brew(good).unwrap();
        assert!(matches!(
            report.error(bad),
            Some(BrewError::Domain { position: 1, .. })
        ));
        assert_eq!(
            report.error(good),
            Some(&BrewError::UpstreamFailed {
                graph: good,
                upstream: bad
            })
        );
    }

    #[test]
    fn pass_limit_is_enforced() {
        let mut b = Brewery::new();
        let a = recipe(&mut b);
        let c = b.create_graph(Equipment::default());
        b.split(a, 2, c, 3.0).unwrap();
        let err = b
            .brew_with(a, &BrewOptions { max_passes: 0 })
            .unwrap_err();
        assert!(matches!(err, BrewError::PassLimitExceeded { limit: 0, .. }));
    }

    #[test]
    fn overfilled_kettle_is_reported() {
        let mut b = Brewery::new();
        let g = b.create_graph(Equipment::default());
        b.graph_mut(g).unwrap().set_initial_flow(Flow::water(16.0).with_gravity(1.040));
        b.insert_activity(g, BoilParams::new(60.0), Position::End)
            .unwrap();
        let report = b.brew(g).unwrap();
        assert!(report.is_success());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].vessel, Vessel::Kettle);
        assert_eq!(report.warnings[0].position, 1);
    }

    #[test]
    fn split_into_a_vanished_target_is_unresolved() {
        let mut b = Brewery::new();
        let a = recipe(&mut b);
        let c = b.create_graph(Equipment::default());
        b.split(a, 2, c, 3.0).unwrap();
        // bypass the cascade of remove_graph
        b.graphs_mut().remove(&c);

        assert_eq!(
            b.brew(a).unwrap_err(),
            BrewError::UnresolvedDependency { graphs: vec![a] }
        );
    }

    #[test]
    fn unpaired_merge_halves_are_unresolved() {
        let mut b = Brewery::new();
        let a = recipe(&mut b);
        let c = recipe(&mut b);
        b.merge(a, 4, c, 4).unwrap();
        let incoming = 5;
        b.graphs_mut()
            .get_mut(&c)
            .unwrap()
            .remove_at(incoming)
            .unwrap();

        // the outgoing side no longer drains into anything
        let err = b.brew(a).unwrap_err();
        assert_eq!(err, BrewError::UnresolvedDependency { graphs: vec![a] });
    }

    #[test]
    fn incoming_merge_needs_a_matching_outgoing() {
        let mut b = Brewery::new();
        let a = recipe(&mut b);
        let c = recipe(&mut b);
        b.merge(a, 4, c, 4).unwrap();
        let outgoing = 5;
        b.graphs_mut()
            .get_mut(&a)
            .unwrap()
            .remove_at(outgoing)
            .unwrap();

        let err = b.brew(c).unwrap_err();
        assert_eq!(err, BrewError::UnresolvedDependency { graphs: vec![c] });
    }
}
