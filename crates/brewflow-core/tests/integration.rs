//! Integration tests for brewflow-core.
//!
//! Exercises whole recipes through the public API: editing, brewing single
//! and linked recipes, failure propagation across links and the reference
//! brewing calculations.

use brewflow_core::{
    Activity, BoilParams, BottleParams, BrewError, Brewery, DomainError, Equipment, FermentParams,
    Flow, GraphId, HopAddition, MashParams, MergeLink, Node, Position, Sugar, transform,
};

/// A pale ale on the default pilot plant: mash, boil, ferment.
fn pale_ale(brewery: &mut Brewery) -> GraphId {
    let g = brewery.create_graph(Equipment::default());
    brewery
        .graph_mut(g)
        .unwrap()
        .set_initial_flow(Flow::water(9.0));
    brewery
        .insert_activity(
            g,
            MashParams::new()
                .with_grain("Pale ale malt", 2.0, 6.0)
                .with_grain("Crystal 150", 0.1, 150.0)
                .with_sparge_water(5.0),
            Position::End,
        )
        .unwrap();
    brewery
        .insert_activity(
            g,
            BoilParams::new(60.0)
                .with_hop(HopAddition::pellet("East Kent Goldings", 15.0, 5.5, 60.0))
                .with_hop(HopAddition::pellet("Fuggle", 10.0, 4.5, 10.0)),
            Position::End,
        )
        .unwrap();
    brewery
        .insert_activity(g, FermentParams::new(19.0, 75.0), Position::End)
        .unwrap();
    g
}

fn assert_alternates(nodes: &[Node]) {
    assert_eq!(nodes.len() % 2, 1, "odd length");
    for (i, node) in nodes.iter().enumerate() {
        assert_eq!(
            matches!(node, Node::State(_)),
            i % 2 == 0,
            "node {i} has the wrong kind"
        );
    }
}

// ============================================================================
// Reference calculations
// ============================================================================

#[test]
fn tinseth_reference_addition() {
    // 5 % AA, 50 g pellets, 60 min in 60 L at an average gravity of 1.035
    let hop = HopAddition::pellet("Cascade", 50.0, 5.0, 60.0);
    let ibu = transform::tinseth_ibu(&hop, 60.0, 60.0, 1.035, &Default::default());
    assert!((ibu - 12.1).abs() < 0.05, "ibu = {ibu}");
}

#[test]
fn dilution_reference() {
    let mut wort = Flow::water(20.0).with_gravity(1.050);
    transform::add_water(&mut wort, 5.0).unwrap();
    assert_eq!(wort.volume, 25.0);
    assert!((wort.original_gravity - 1.040).abs() < 1e-9);
}

#[test]
fn zero_grain_mash_brews_plain_water() {
    let mut brewery = Brewery::new();
    let g = brewery.create_graph(Equipment::default());
    brewery
        .graph_mut(g)
        .unwrap()
        .set_initial_flow(Flow::water(10.0));
    brewery
        .insert_activity(g, MashParams::new(), Position::End)
        .unwrap();
    let report = brewery.brew(g).unwrap();
    let flow = report.flow(g).unwrap();
    assert_eq!(flow.original_gravity, 1.0);
    assert_eq!(flow.color, 0.0);
    assert!(flow.validate().is_ok());
}

// ============================================================================
// Single recipe
// ============================================================================

#[test]
fn full_recipe_brews_to_bottled_beer() {
    let mut brewery = Brewery::new();
    let g = pale_ale(&mut brewery);
    brewery
        .insert_activity(
            g,
            BottleParams::new().with_priming(Sugar::Sucrose, 6.0),
            Position::End,
        )
        .unwrap();

    let report = brewery.brew(g).unwrap();
    assert!(report.is_success());
    let beer = report.flow(g).unwrap();
    assert!(beer.original_gravity > 1.040 && beer.original_gravity < 1.080);
    assert!(beer.final_gravity < beer.original_gravity);
    assert!(beer.abv > 3.0 && beer.abv < 8.0);
    assert!(beer.bitterness > 10.0);
    assert!(beer.carbonation > 3.0);

    let graph = brewery.graph(g).unwrap();
    assert!(graph.states().all(|s| s.flow().is_ready()));
    let labels: Vec<_> = graph.states().map(|s| s.label().to_string()).collect();
    assert_eq!(
        labels,
        [
            "Mash water",
            "Post-mash wort",
            "Post-boil wort",
            "Flat beer",
            "Carbonated beer"
        ]
    );
}

#[test]
fn brewing_twice_is_idempotent() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    brewery.split(a, 4, b, 2.0).unwrap();

    let first = brewery.brew(a).unwrap();
    let states_first = brewery.graph(b).unwrap().clone();
    let second = brewery.brew(a).unwrap();
    assert_eq!(first, second);
    assert_eq!(&states_first, brewery.graph(b).unwrap());
}

#[test]
fn inserting_in_the_middle_rewires_the_chain() {
    let mut brewery = Brewery::new();
    let g = brewery.create_graph(Equipment::default());
    brewery
        .graph_mut(g)
        .unwrap()
        .set_initial_flow(Flow::water(9.0));
    brewery
        .insert_activity(g, MashParams::new().with_grain("Pale", 2.0, 6.0), Position::End)
        .unwrap();
    brewery
        .insert_activity(g, FermentParams::new(19.0, 75.0), Position::End)
        .unwrap();
    let at = brewery
        .insert_activity(g, BoilParams::new(30.0), Position::try_from(3_isize).unwrap())
        .unwrap();
    assert_eq!(at, 3);

    let graph = brewery.graph(g).unwrap();
    let kinds: Vec<_> = graph.activities().map(|a| a.activity().kind()).collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds[1].to_string(), "Boil");
    assert!(brewery.brew(g).unwrap().is_success());
}

#[test]
fn editing_errors_leave_the_graph_alone() {
    let mut brewery = Brewery::new();
    let g = pale_ale(&mut brewery);
    let before = brewery.graph(g).unwrap().clone();

    assert!(matches!(
        brewery.insert_activity(g, MashParams::new(), Position::At(2)),
        Err(BrewError::InvalidPosition { .. })
    ));
    assert!(matches!(
        brewery.insert_activity(g, MashParams::new(), Position::At(9)),
        Err(BrewError::InvalidPosition { .. })
    ));
    assert!(matches!(
        brewery.delete_activity(g, 4),
        Err(BrewError::InvalidPosition { .. })
    ));
    assert!(matches!(
        brewery.merge(g, 1, g, 0),
        Err(BrewError::MissingTarget(_))
    ));
    assert_eq!(
        Position::try_from(-3_isize),
        Err(BrewError::NegativePosition(-3))
    );
    assert_eq!(&before, brewery.graph(g).unwrap());
}

#[test]
fn undo_steps_back_through_computed_states() {
    let mut brewery = Brewery::new();
    let g = pale_ale(&mut brewery);
    brewery.brew(g).unwrap();

    assert_eq!(brewery.undo(g).unwrap(), Some(6));
    assert!(!brewery.graph(g).unwrap().final_flow().is_ready());
    assert_eq!(brewery.undo(g).unwrap(), Some(4));
    assert_eq!(brewery.undo(g).unwrap(), Some(2));
    assert_eq!(brewery.undo(g).unwrap(), None);
}

#[test]
fn editing_parameters_changes_the_result() {
    let mut brewery = Brewery::new();
    let g = pale_ale(&mut brewery);
    let before = brewery.brew(g).unwrap().flow(g).cloned().unwrap();

    brewery
        .graph_mut(g)
        .unwrap()
        .params_mut::<FermentParams>(5)
        .unwrap()
        .yeast
        .attenuation = 85.0;
    let after = brewery.brew(g).unwrap().flow(g).cloned().unwrap();
    assert!(after.final_gravity < before.final_gravity);
    assert!(after.abv > before.abv);
}

// ============================================================================
// Linked recipes
// ============================================================================

#[test]
fn split_moves_volume_between_recipes() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = brewery.create_graph(Equipment::lossless());
    brewery
        .insert_activity(b, FermentParams::new(12.0, 80.0), Position::End)
        .unwrap();
    brewery.split(a, 4, b, 3.0).unwrap();

    // brewing either side brews both
    let report = brewery.brew(b).unwrap();
    assert!(report.is_success());
    assert!(report.outcomes.contains_key(&a));

    let src = brewery.graph(a).unwrap();
    let pre_split = src.state(4).unwrap().flow();
    let kept = src.state(6).unwrap().flow();
    let tgt = brewery.graph(b).unwrap();
    let moved = tgt.state(2).unwrap().flow();
    assert!((kept.volume + moved.volume - pre_split.volume).abs() < 1e-9);
    assert_eq!(moved.original_gravity, pre_split.original_gravity);
    assert_eq!(moved.bitterness, pre_split.bitterness);
    // target adopted the source's plant
    assert_eq!(**tgt.equipment(), Equipment::default());
}

#[test]
fn oversized_split_fails_both_sides() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = brewery.create_graph(Equipment::default());
    brewery.split(a, 4, b, 500.0).unwrap();

    let report = brewery.brew(a).unwrap();
    assert!(matches!(
        report.error(a),
        Some(BrewError::Domain {
            position: 5,
            source: DomainError::TransferExceedsVolume { .. },
            ..
        })
    ));
    assert!(matches!(
        report.error(b),
        Some(BrewError::Domain {
            position: 1,
            source: DomainError::TransferExceedsVolume { .. },
            ..
        })
    ));
}

#[test]
fn failure_before_the_split_blocks_the_target() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = brewery.create_graph(Equipment::default());
    brewery.split(a, 4, b, 2.0).unwrap();
    // boil the kettle dry
    brewery
        .graph_mut(a)
        .unwrap()
        .params_mut::<BoilParams>(3)
        .unwrap()
        .time = 600.0;

    let report = brewery.brew(b).unwrap();
    assert!(matches!(
        report.error(a),
        Some(BrewError::Domain { position: 3, .. })
    ));
    assert_eq!(
        report.error(b),
        Some(&BrewError::UpstreamFailed {
            graph: b,
            upstream: a
        })
    );
}

#[test]
fn merge_blends_by_volume() {
    let mut brewery = Brewery::new();
    let light = pale_ale(&mut brewery);
    let dark = pale_ale(&mut brewery);
    brewery
        .graph_mut(dark)
        .unwrap()
        .params_mut::<MashParams>(1)
        .unwrap()
        .grains[1]
        .color = 900.0;
    brewery.merge(dark, 6, light, 6).unwrap();

    let report = brewery.brew(light).unwrap();
    let dark_beer = brewery.graph(dark).unwrap().state(6).unwrap().flow().clone();
    let light_graph = brewery.graph(light).unwrap();
    let light_beer = light_graph.state(6).unwrap().flow();
    let merged = report.flow(light).unwrap();

    assert!((merged.volume - (dark_beer.volume + light_beer.volume)).abs() < 1e-9);
    assert!(merged.color > light_beer.color && merged.color < dark_beer.color);
    assert_eq!(report.flow(dark).unwrap().volume, 0.0);
}

#[test]
fn deleting_a_merged_state_keeps_the_merge_paired() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    brewery.merge(a, 6, b, 6).unwrap();
    // remove the fermentation that produced the merged state
    brewery.delete_activity(a, 5).unwrap();

    let report = brewery.brew(b).unwrap();
    assert!(report.is_success());
    let post_boil = brewery.graph(a).unwrap().state(4).unwrap().flow().volume;
    let own = brewery.graph(b).unwrap().state(6).unwrap().flow().volume;
    assert!((report.flow(b).unwrap().volume - (own + post_boil)).abs() < 1e-9);
    assert_eq!(report.flow(a).unwrap().volume, 0.0);
}

#[test]
fn deleting_the_outgoing_merge_keeps_both_flows() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    let alone = brewery.brew(a).unwrap().flow(a).unwrap().volume;
    brewery.merge(a, 6, b, 6).unwrap();
    brewery.delete_activity(a, 7).unwrap();

    assert_eq!(brewery.graph(b).unwrap().len(), 7);
    let report = brewery.brew(a).unwrap();
    assert_eq!(report.outcomes.len(), 1);
    assert!((report.flow(a).unwrap().volume - alone).abs() < 1e-9);
    assert!(brewery.brew(b).unwrap().is_success());
}

#[test]
fn deleting_the_incoming_split_returns_the_volume() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let alone = brewery.brew(a).unwrap().flow(a).unwrap().volume;
    let b = brewery.create_graph(Equipment::default());
    brewery.split(a, 4, b, 3.0).unwrap();
    brewery.delete_activity(b, 1).unwrap();

    assert_eq!(brewery.graph(a).unwrap().len(), 7);
    let report = brewery.brew(a).unwrap();
    assert!((report.flow(a).unwrap().volume - alone).abs() < 1e-9);
}

#[test]
fn removing_a_recipe_unlinks_its_partners() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    let alone = brewery.brew(b).unwrap().flow(b).unwrap().volume;
    brewery.merge(a, 6, b, 6).unwrap();
    brewery.remove_graph(a).unwrap();

    let report = brewery.brew(b).unwrap();
    assert_eq!(report.outcomes.len(), 1);
    assert!((report.flow(b).unwrap().volume - alone).abs() < 1e-9);
}

#[test]
fn split_target_starts_with_the_split() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = brewery.create_graph(Equipment::default());
    brewery.split(a, 4, b, 3.0).unwrap();

    assert!(matches!(
        brewery.insert_activity(b, FermentParams::new(12.0, 80.0), Position::At(1)),
        Err(BrewError::InvalidPosition { position: 1, .. })
    ));
    brewery
        .insert_activity(b, FermentParams::new(12.0, 80.0), Position::End)
        .unwrap();
    let report = brewery.brew(b).unwrap();
    assert!(report.is_success());
    assert!(report.flow(b).unwrap().abv > 0.0);
}

#[test]
fn brewery_reset_clears_both_sides() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    brewery.split(a, 2, b, 1.0).unwrap();
    brewery.merge(b, 4, a, 8).unwrap();

    brewery.reset(a).unwrap();
    assert_eq!(brewery.graph(a).unwrap().len(), 1);
    let remaining = brewery.graph(b).unwrap();
    assert_eq!(remaining.len(), 7);
    assert!(remaining.activities().all(|n| !n.activity().is_link()));
    assert!(brewery.brew(b).unwrap().is_success());
}

#[test]
fn cyclic_merges_are_unresolved() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    // a waits for b's post-mash wort, b waits for a's merged flow
    brewery.merge(b, 2, a, 0).unwrap();
    brewery.merge(a, 2, b, 0).unwrap();
    assert!(matches!(
        brewery.graph(b).unwrap().activity(1).map(|n| n.activity()),
        Some(Activity::Merge(MergeLink::Incoming { .. }))
    ));

    let err = brewery.brew(a).unwrap_err();
    assert_eq!(
        err,
        BrewError::UnresolvedDependency {
            graphs: vec![a, b]
        }
    );
}

#[test]
fn alternation_survives_edits() {
    let mut brewery = Brewery::new();
    let a = pale_ale(&mut brewery);
    let b = pale_ale(&mut brewery);
    brewery.split(a, 2, b, 1.0).unwrap();
    brewery.merge(b, 4, a, 8).unwrap();
    brewery.delete_activity(a, 3).unwrap();
    brewery
        .insert_activity(a, BoilParams::new(10.0), Position::At(1))
        .unwrap();

    assert_alternates(brewery.graph(a).unwrap().nodes());
    assert_alternates(brewery.graph(b).unwrap().nodes());
}
