//! Class-hierarchy loading and subsumption, through the public API.

use entitylink::{Config, ResolutionCoordinator};
use std::io::Write;
use tempfile::TempDir;

const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

fn write_hierarchy(dir: &TempDir, name: &str, statements: &[(&str, &str)]) -> String {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for (sub, sup) in statements {
        writeln!(file, "<{sub}> <{SUB_CLASS_OF}> <{sup}> .").unwrap();
    }
    path.display().to_string()
}

#[tokio::test]
async fn hierarchy_from_config_answers_transitive_queries() {
    let dir = TempDir::new().unwrap();
    let file = write_hierarchy(
        &dir,
        "ontology.nt",
        &[
            ("http://example.org/SportsTeam", "http://example.org/Organisation"),
            ("http://example.org/Organisation", "http://example.org/Agent"),
        ],
    );

    let mut config = Config::default();
    config.hierarchy.files = vec![file, "UTF-8".into(), "http://example.org/".into()];
    let coordinator = ResolutionCoordinator::from_config(&config).unwrap();

    assert!(coordinator.is_sub_class_of("http://example.org/SportsTeam", "http://example.org/Agent"));
    assert!(coordinator.is_sub_class_of("http://example.org/Agent", "http://example.org/Agent"));
    assert!(!coordinator.is_sub_class_of("http://example.org/Agent", "http://example.org/SportsTeam"));
}

#[tokio::test]
async fn broken_triple_does_not_block_the_rest() {
    let dir = TempDir::new().unwrap();
    let good = write_hierarchy(
        &dir,
        "good.nt",
        &[("http://example.org/A", "http://example.org/B")],
    );

    let mut config = Config::default();
    config.hierarchy.files = vec![
        dir.path().join("does-not-exist.nt").display().to_string(),
        "UTF-8".into(),
        "http://example.org/".into(),
        good,
        "UTF-8".into(),
        "http://example.org/".into(),
    ];
    let coordinator = ResolutionCoordinator::from_config(&config).unwrap();

    assert!(coordinator.is_sub_class_of("http://example.org/A", "http://example.org/B"));
}

#[tokio::test]
async fn empty_hierarchy_is_a_valid_state() {
    let coordinator = ResolutionCoordinator::from_config(&Config::default()).unwrap();
    assert!(!coordinator.is_sub_class_of("http://example.org/A", "http://example.org/B"));
    assert!(coordinator.is_sub_class_of("http://example.org/A", "http://example.org/A"));
}
