//! Resource and statement listings

use crate::test_utils::*;
use chrono::{Duration, Utc};
use rmapdb::{DateRange, Iri, Resource, SearchParams, StatusFilter, Term, Triple};

fn typed_disco(id: &str) -> rmapdb::Disco {
    let mut d = research_disco(id);
    d.related_statements.push(Triple::new(
        iri("https://doi.org/10.1000/article"),
        iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
        iri("http://purl.org/spar/fabio/JournalArticle"),
    ));
    d
}

fn article() -> Iri {
    iri("https://doi.org/10.1000/article")
}

#[test]
fn statement_listings_find_holders_and_asserters() {
    let rmap = service_with(&["alice", "bob"]);
    rmap.create_disco(&research_disco("rmap:d1"), &as_agent("alice")).unwrap();
    rmap.create_disco(&research_disco("rmap:d2"), &as_agent("bob")).unwrap();

    let subject = Resource::Iri(article());
    let predicate = iri("http://purl.org/spar/cito/citesAsDataSource");
    let object = Term::Iri(iri("https://doi.org/10.1000/dataset"));
    let params = SearchParams::default();

    let discos = rmap
        .statement_related_discos(&subject, &predicate, &object, &params)
        .unwrap();
    assert_eq!(discos.results, vec![iri("rmap:d1"), iri("rmap:d2")]);

    let agents = rmap
        .statement_asserting_agents(&subject, &predicate, &object, &params)
        .unwrap();
    assert_eq!(agents.results, vec![iri("rmap:alice"), iri("rmap:bob")]);

    let mut only_bob = SearchParams::default();
    only_bob.add_system_agent(iri("rmap:bob"));
    let discos = rmap
        .statement_related_discos(&subject, &predicate, &object, &only_bob)
        .unwrap();
    assert_eq!(discos.results, vec![iri("rmap:d2")]);

    let missing = Term::Iri(iri("https://doi.org/10.1000/other"));
    assert!(rmap
        .statement_related_agents(&subject, &predicate, &missing, &params)
        .unwrap()
        .is_empty());
}

#[test]
fn agents_whose_graph_mentions_a_resource() {
    let rmap = service_with(&["alice", "bob"]);
    let agents = rmap
        .resource_related_agents(&iri("https://orcid.org"), &SearchParams::default())
        .unwrap();
    assert_eq!(
        agents.results,
        vec![iri(ADMIN), iri("rmap:alice"), iri("rmap:bob")]
    );
}

#[test]
fn related_triples_honour_exclusions() {
    let rmap = service_with(&["alice"]);
    rmap.create_disco(&typed_disco("rmap:d1"), &as_agent("alice")).unwrap();

    let all = rmap
        .resource_related_triples(&article(), None, &SearchParams::default())
        .unwrap();
    // aggregation, citation and type
    assert_eq!(all.len(), 3);

    let mut no_types = SearchParams::default();
    no_types.set_exclusions(false, false, true).unwrap();
    let filtered = rmap
        .resource_related_triples(&article(), Some(&iri("rmap:d1")), &no_types)
        .unwrap();
    assert_eq!(filtered.len(), 2);

    let mut bad = SearchParams::default();
    assert!(bad.set_exclusions(true, true, false).is_err());
}

#[test]
fn rdf_types_by_context() {
    let rmap = service_with(&["alice", "bob"]);
    rmap.create_disco(&typed_disco("rmap:d1"), &as_agent("alice")).unwrap();
    rmap.create_disco(&typed_disco("rmap:d2"), &as_agent("bob")).unwrap();
    rmap.tombstone_disco(&iri("rmap:d2"), &as_agent("bob")).unwrap();

    let fabio = iri("http://purl.org/spar/fabio/JournalArticle");
    let in_d1 = rmap.resource_rdf_types(&article(), &iri("rmap:d1")).unwrap();
    assert_eq!(in_d1.into_iter().collect::<Vec<_>>(), vec![fabio.clone()]);

    let active = rmap
        .resource_rdf_types_all_contexts(&article(), &SearchParams::default())
        .unwrap();
    assert_eq!(active.keys().cloned().collect::<Vec<_>>(), vec![iri("rmap:d1")]);

    let mut tombstoned = SearchParams::default();
    tombstoned.set_status(StatusFilter::Tombstoned);
    let removed = rmap
        .resource_rdf_types_all_contexts(&article(), &tombstoned)
        .unwrap();
    assert!(removed[&iri("rmap:d2")].contains(&fabio));
}

#[test]
fn related_events_follow_date_range() {
    let rmap = service_with(&["alice"]);
    rmap.create_disco(&research_disco("rmap:d1"), &as_agent("alice")).unwrap();
    rmap.update_disco(&iri("rmap:d1"), &research_disco("rmap:d2"), &as_agent("alice"))
        .unwrap();

    let mut all = SearchParams::default();
    all.set_status(StatusFilter::All);
    let events = rmap.resource_related_events(&article(), &all).unwrap();
    assert_eq!(events.len(), 2);

    let mut future = all.clone();
    future.set_date_range(DateRange::new(Some(Utc::now() + Duration::hours(1)), None));
    assert!(rmap.resource_related_events(&article(), &future).unwrap().is_empty());
}
