//! KB classification against the whitelist, through the public API.

use entitylink::{Config, KbClassifier, Meaning, ResolutionCoordinator};

fn classifier() -> KbClassifier {
    KbClassifier::new(["dbpedia.org/resource/"])
}

#[test]
fn empty_meaning_is_unknown() {
    assert!(!classifier().is_known_kb(&Meaning::default()));
}

#[test]
fn whitelist_scenarios() {
    let classifier = classifier();

    assert!(classifier.is_known_uri("http://dbpedia.org/resource/China"));
    assert!(classifier.is_known_uri("http://en.dbpedia.org/resource/China"));
    assert!(classifier.is_known_uri("http://dbpedia.org/resource/People's_Republic_of_China"));
    assert!(!classifier.is_known_uri("http://notExisting.wikipedia.org/wiki/China"));
    assert!(!classifier.is_known_uri("http://aksw.org/fake/de.dbpedia.org/resource/China"));
}

#[tokio::test]
async fn resolution_feeds_classification() {
    let mut config = Config::default();
    config.kb.namespaces = vec!["dbpedia.org/resource/".to_string()];
    let coordinator = ResolutionCoordinator::from_config(&config).unwrap();

    // A Wikipedia page URI is not itself in the whitelist, but its bridged
    // DBpedia equivalent is.
    let meaning = coordinator
        .resolve_meaning("http://en.wikipedia.org/wiki/China")
        .await;
    assert!(meaning.contains("http://dbpedia.org/resource/China"));
    assert!(coordinator.is_known_kb(&meaning));
}
