use eframe::egui::{Vec2, vec2};

use cosponsor_graph::graph::{Graph, Link, Node, NodeKind};
use cosponsor_graph::physics::{
    Force, ForceSet, ForceSimulation, LinkForce, Outcome, RadialForce, RadialTarget, RebindPolicy,
    SimulationConfig,
};

fn node(id: &str, kind: NodeKind) -> Node {
    Node {
        id: id.to_owned(),
        kind,
        label: id.to_owned(),
        weight: 1,
    }
}

fn pair() -> Graph {
    Graph {
        nodes: vec![node("a", NodeKind::Democrat), node("b", NodeKind::Republican)],
        links: vec![Link::new("a", "b")],
    }
}

fn star(ids: &[&str]) -> Graph {
    let mut nodes = ids
        .iter()
        .map(|id| node(id, NodeKind::Democrat))
        .collect::<Vec<_>>();
    nodes.push(node("focal", NodeKind::Republican));
    Graph {
        nodes,
        links: ids.iter().map(|id| Link::new("focal", *id)).collect(),
    }
}

fn settle(engine: &mut ForceSimulation, max_steps: usize) -> usize {
    for step in 1..=max_steps {
        engine.step().unwrap();
        if engine.is_settled() {
            return step;
        }
    }
    max_steps + 1
}

fn positions(engine: &ForceSimulation) -> Vec<(String, Vec2)> {
    engine
        .nodes()
        .iter()
        .map(|sim_node| (sim_node.id().to_owned(), sim_node.position()))
        .collect()
}

#[test]
fn linked_pair_settles_near_rest_length() {
    let mut engine = ForceSimulation::default();
    engine.bind(&pair()).unwrap();

    let steps = settle(&mut engine, 300);
    assert!(steps <= 300, "did not settle within 300 steps");

    let snapshot = engine.snapshot();
    let a = snapshot.node("a").unwrap().position;
    let b = snapshot.node("b").unwrap().position;
    let distance = (a - b).length();
    assert!((distance - 30.0).abs() < 2.5, "distance {distance}");
    // The center force keeps the pair around the origin.
    assert!(((a + b) * 0.5).length() < 1.0);
}

#[test]
fn persisting_nodes_keep_their_state_across_binds() {
    let mut engine = ForceSimulation::default();
    engine.bind(&star(&["x", "y", "z"])).unwrap();
    for _ in 0..25 {
        engine.step().unwrap();
    }
    engine.pin("y", 12.0, -8.0);
    let before = engine
        .nodes()
        .iter()
        .map(|sim_node| (sim_node.id().to_owned(), (sim_node.position(), sim_node.velocity(), sim_node.pin())))
        .collect::<Vec<_>>();

    let snapshot = engine.bind(&star(&["x", "y", "w"])).unwrap();

    for (id, (position, velocity, pin)) in before {
        match engine.node(&id) {
            Some(sim_node) => {
                assert_eq!(sim_node.position(), position, "{id} moved on rebind");
                assert_eq!(sim_node.velocity(), velocity, "{id} lost velocity on rebind");
                assert_eq!(sim_node.pin(), pin, "{id} lost its pin on rebind");
            }
            None => assert_eq!(id, "z"),
        }
    }

    let entered = engine.node("w").unwrap();
    assert_eq!(entered.velocity(), Vec2::ZERO);
    assert!(entered.pin().is_none());
    assert!(snapshot.node("z").is_none());
    assert_eq!(snapshot.links.len(), 3);
    assert!(!engine.is_settled());
}

#[test]
fn identical_rebind_moves_nothing_before_the_next_step() {
    for policy in [RebindPolicy::Always, RebindPolicy::SkipUnchanged] {
        let config = SimulationConfig {
            rebind_policy: policy,
            ..SimulationConfig::default()
        };
        let mut engine = ForceSimulation::new(config, ForceSet::default());
        engine.bind(&star(&["x", "y"])).unwrap();
        settle(&mut engine, 400);
        let settled_alpha = engine.alpha();
        let before = positions(&engine);

        engine.bind(&star(&["x", "y"])).unwrap();
        assert_eq!(positions(&engine), before, "{policy:?}");

        match policy {
            RebindPolicy::Always => assert_eq!(engine.alpha(), engine.config().bind_alpha),
            RebindPolicy::SkipUnchanged => {
                assert_eq!(engine.alpha(), settled_alpha);
                assert!(engine.is_settled());
            }
        }
    }
}

#[test]
fn unpin_reheats_a_settled_layout() {
    let mut engine = ForceSimulation::default();
    engine.bind(&pair()).unwrap();
    settle(&mut engine, 300);
    assert!(engine.is_settled());

    assert_eq!(engine.pin("a", 80.0, 0.0), Outcome::Applied);
    engine.step().unwrap();
    assert_eq!(engine.node("a").unwrap().position(), vec2(80.0, 0.0));

    assert_eq!(engine.unpin("a"), Outcome::Applied);
    assert!(!engine.is_settled());
    assert_eq!(engine.alpha(), engine.config().reheat_alpha);
    assert!(engine.node("a").unwrap().pin().is_none());
}

#[test]
fn calls_for_unknown_ids_are_ignored() {
    let mut engine = ForceSimulation::default();
    assert_eq!(engine.pin("ghost", 1.0, 1.0), Outcome::Ignored);
    assert_eq!(engine.unpin("ghost"), Outcome::Ignored);

    engine.bind(&pair()).unwrap();
    engine.bind(&Graph {
        nodes: vec![node("a", NodeKind::Democrat)],
        links: Vec::new(),
    })
    .unwrap();
    assert_eq!(engine.pin("b", 1.0, 1.0), Outcome::Ignored);
    assert_eq!(engine.pin("a", f32::NAN, 1.0), Outcome::Ignored);
}

#[test]
fn bills_settle_on_their_ring() {
    let forces = ForceSet::empty().with(
        "radial",
        Force::Radial(RadialForce {
            x: 0.0,
            y: 0.0,
            targets: vec![RadialTarget {
                kind: NodeKind::Bill,
                radius: 100.0,
                strength: 0.8,
            }],
        }),
    );
    let mut engine = ForceSimulation::new(SimulationConfig::default(), forces);
    engine
        .bind(&Graph {
            nodes: vec![node("member", NodeKind::Democrat), node("bill-1", NodeKind::Bill)],
            links: Vec::new(),
        })
        .unwrap();
    let member_start = engine.node("member").unwrap().position();

    settle(&mut engine, 300);

    let bill_radius = engine.node("bill-1").unwrap().position().length();
    assert!((bill_radius - 100.0).abs() < 1.0, "bill radius {bill_radius}");
    assert_eq!(engine.node("member").unwrap().position(), member_start);
}

#[test]
fn snapshot_hit_testing_prefers_the_nearest_node() {
    let mut engine = ForceSimulation::default();
    engine.bind(&pair()).unwrap();
    engine.pin("a", 0.0, 0.0);
    engine.pin("b", 6.0, 0.0);
    let snapshot = engine.step().unwrap();

    assert_eq!(snapshot.node_at(vec2(1.0, 0.0), 10.0).map(|node| node.id.as_str()), Some("a"));
    assert_eq!(snapshot.node_at(vec2(5.0, 1.0), 10.0).map(|node| node.id.as_str()), Some("b"));
    assert!(snapshot.node_at(vec2(50.0, 50.0), 10.0).is_none());
    assert!(snapshot.nodes.iter().all(|node| node.pinned));
}

fn speed_after_one_step(force_strength: Option<f32>, link_strength: Option<f32>) -> f32 {
    // A rest length far beyond the seeding spread keeps the spring well away
    // from rest, so speed is proportional to stiffness.
    let forces = ForceSet::empty().with(
        "link",
        Force::Link(LinkForce {
            distance: 1000.0,
            strength: force_strength,
            iterations: 1,
        }),
    );
    let mut link = Link::new("a", "b");
    if let Some(strength) = link_strength {
        link = link.with_strength(strength);
    }
    let mut engine = ForceSimulation::new(SimulationConfig::default(), forces);
    engine
        .bind(&Graph {
            nodes: vec![node("a", NodeKind::Democrat), node("b", NodeKind::Republican)],
            links: vec![link],
        })
        .unwrap();
    engine.step().unwrap();
    engine.node("b").unwrap().velocity().length()
}

#[test]
fn link_stiffness_prefers_link_then_force_then_degree() {
    let by_degree = speed_after_one_step(None, None);
    let by_force = speed_after_one_step(Some(0.25), None);
    let by_link = speed_after_one_step(Some(0.25), Some(0.5));

    assert!(by_degree > 1.0, "spring barely moved: {by_degree}");
    // Both endpoints have degree 1, so the default stiffness is 1.
    assert!((by_force / by_degree - 0.25).abs() < 1e-4, "{by_force} vs {by_degree}");
    assert!((by_link / by_degree - 0.5).abs() < 1e-4, "{by_link} vs {by_degree}");
}

#[test]
fn each_step_is_one_unit_tick() {
    // Springs only: the center force shifts positions outside integration.
    let forces = ForceSet::empty().with(
        "link",
        Force::Link(LinkForce {
            distance: 30.0,
            strength: None,
            iterations: 1,
        }),
    );
    let mut engine = ForceSimulation::new(SimulationConfig::default(), forces);
    engine.bind(&star(&["x", "y", "z"])).unwrap();
    engine.step().unwrap();

    for _ in 0..5 {
        let before = positions(&engine);
        engine.step().unwrap();
        for (id, position) in before {
            let sim_node = engine.node(&id).unwrap();
            let moved = sim_node.position() - position;
            assert!((moved - sim_node.velocity()).length() < 1e-4, "{id} moved {moved:?}");
        }
    }
}
