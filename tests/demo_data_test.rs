use std::path::Path;

use cosponsor_graph::config::load_layout_config;
use cosponsor_graph::congress::{Roster, load_dataset};
use cosponsor_graph::interaction::DragMode;
use cosponsor_graph::physics::{ForceSimulation, RebindPolicy};

fn demo(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

#[test]
fn demo_files_load_and_lay_out() {
    let roster = Roster::new(load_dataset(&demo("sample_members.json")).unwrap());
    let layout = load_layout_config(&demo("layout.json")).unwrap();

    assert_eq!(layout.simulation.rebind_policy, RebindPolicy::SkipUnchanged);
    assert_eq!(layout.interaction.mode, DragMode::Sticky);
    assert_eq!(roster.most_connected().map(|member| member.id), Some(1));

    let graph = roster.focal_graph("1", 10.0, true).unwrap();
    let mut engine = ForceSimulation::new(layout.simulation.clone(), layout.forces_for(true));
    engine.bind(&graph).unwrap();
    for _ in 0..300 {
        engine.step().unwrap();
    }

    assert!(engine.is_settled());
    assert!(engine.snapshot().nodes.iter().all(|node| node.position.is_finite()));
}

#[test]
fn missing_files_report_their_path() {
    let error = load_dataset(&demo("does_not_exist.json")).unwrap_err();
    assert!(format!("{error:#}").contains("does_not_exist.json"));
}

#[test]
fn inverted_zoom_limits_fail_to_load() {
    let path = std::env::temp_dir().join(format!("cosponsor-graph-layout-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"interaction": {"min_zoom": 5.0, "max_zoom": 2.0}}"#).unwrap();

    let result = load_layout_config(&path);
    let _ = std::fs::remove_file(&path);

    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("invalid layout config"), "{message}");
    assert!(message.contains("min_zoom"), "{message}");
}
