//! DiSCO lifecycle and lineage scenarios

use crate::test_utils::*;
use rmapdb::{
    BlankNode, Disco, ErrorKind, EventType, Literal, RequestEventDetails, Resource, Status, Triple,
};

#[test]
fn create_read_view() {
    let rmap = service_with(&["alice"]);
    let d = research_disco("rmap:d1");
    let event = rmap.create_disco(&d, &as_agent("alice")).unwrap();

    assert_eq!(event.lineage_progenitor, Some(d.id.clone()));
    assert_eq!(rmap.read_disco(&d.id).unwrap(), d);
    assert_eq!(rmap.disco_creating_event(&d.id).unwrap(), event.id);
    assert_eq!(rmap.disco_asserting_agent(&d.id).unwrap(), iri("rmap:alice"));

    let view = rmap.read_disco_view(&d.id).unwrap();
    assert_eq!(view.status, Status::Active);
    assert_eq!(view.latest, d.id);
    assert_eq!((view.previous, view.next), (None, None));
}

#[test]
fn disjoint_related_statements_rejected() {
    let rmap = service_with(&["alice"]);
    let mut d = research_disco("rmap:d1");
    d.related_statements.push(Triple::new(
        iri("https://example.org/island"),
        iri("http://purl.org/dc/terms/title"),
        Literal::string("unconnected"),
    ));
    let err = rmap.create_disco(&d, &as_agent("alice")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
    assert!(err.to_string().contains("disjoint"));
    assert!(!rmap.is_disco_id(&d.id).unwrap());
}

#[test]
fn blank_nodes_become_stable_iris() {
    let rmap = service_with(&["alice"]);
    let author = BlankNode::new("b0");
    let d = Disco::new(iri("rmap:d1"), vec![iri("https://doi.org/10.1000/article")]).with_related(vec![
        Triple::new(
            iri("https://doi.org/10.1000/article"),
            iri("http://purl.org/dc/terms/creator"),
            author.clone(),
        ),
        Triple::new(author.clone(), iri("http://xmlns.com/foaf/0.1/name"), Literal::string("Ann")),
        Triple::new(author, iri("http://xmlns.com/foaf/0.1/mbox"), iri("mailto:ann@example.org")),
    ]);
    rmap.create_disco(&d, &as_agent("alice")).unwrap();

    let stored = rmap.read_disco(&d.id).unwrap();
    let minted = stored.related_statements[0].object.as_iri().cloned().unwrap();
    assert_eq!(stored.related_statements[1].subject, Resource::Iri(minted.clone()));
    assert_eq!(stored.related_statements[2].subject, Resource::Iri(minted));
}

#[test]
fn inactivate_then_update_fails() {
    let rmap = service_with(&["alice"]);
    let d1 = iri("rmap:d1");
    rmap.create_disco(&research_disco("rmap:d1"), &as_agent("alice")).unwrap();
    let event = rmap.inactivate_disco(&d1, &as_agent("alice")).unwrap();
    assert_eq!(event.event_type(), EventType::Inactivation);
    assert_eq!(event.lineage_progenitor, Some(d1.clone()));
    assert_eq!(rmap.disco_status(&d1).unwrap(), Status::Inactive);

    let err = rmap
        .update_disco(&d1, &research_disco("rmap:d2"), &as_agent("alice"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InactiveVersion);
}

#[test]
fn lineage_navigation_and_derivatives() {
    let rmap = service_with(&["alice", "bob"]);
    rmap.create_disco(&research_disco("rmap:v1"), &as_agent("alice")).unwrap();
    rmap.update_disco(&iri("rmap:v1"), &research_disco("rmap:v2"), &as_agent("alice")).unwrap();
    rmap.update_disco(&iri("rmap:v2"), &research_disco("rmap:v3"), &as_agent("alice")).unwrap();
    rmap.update_disco(&iri("rmap:v2"), &research_disco("rmap:x1"), &as_agent("bob"))
        .unwrap_err();
    rmap.update_disco(&iri("rmap:v3"), &research_disco("rmap:x1"), &as_agent("bob")).unwrap();

    let versions = rmap.all_versions(&iri("rmap:v2")).unwrap();
    assert_eq!(versions, vec![iri("rmap:v1"), iri("rmap:v2"), iri("rmap:v3")]);
    assert_eq!(rmap.lineage_members(&iri("rmap:v1")).unwrap(), versions);
    assert_eq!(rmap.latest_version(&iri("rmap:v1")).unwrap(), iri("rmap:v3"));
    assert_eq!(rmap.previous_version(&iri("rmap:v2")).unwrap(), Some(iri("rmap:v1")));
    assert_eq!(rmap.next_version(&iri("rmap:v2")).unwrap(), Some(iri("rmap:v3")));
    assert_eq!(rmap.next_version(&iri("rmap:v3")).unwrap(), None);

    assert_eq!(rmap.all_versions(&iri("rmap:x1")).unwrap(), vec![iri("rmap:x1")]);
    let derived = rmap.derivatives(&iri("rmap:v1")).unwrap();
    assert_eq!(derived.into_iter().collect::<Vec<_>>(), vec![iri("rmap:x1")]);
    assert_eq!(rmap.disco_status(&iri("rmap:v3")).unwrap(), Status::Active);
}

#[test]
fn admin_may_delete_any_disco() {
    let rmap = service_with(&["alice"]);
    let d1 = iri("rmap:d1");
    rmap.create_disco(&research_disco("rmap:d1"), &as_agent("alice")).unwrap();
    let admin = RequestEventDetails::new(iri(ADMIN));
    assert!(!rmap.is_same_creator(&d1, &admin).unwrap());
    assert!(rmap.has_admin_rights(&admin));

    rmap.delete_disco(&d1, &admin).unwrap();
    assert_eq!(rmap.disco_status(&d1).unwrap(), Status::Deleted);
    assert!(rmap.is_disco_id(&d1).unwrap());
    let err = rmap.delete_disco(&d1, &admin).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Deleted);
}

#[test]
fn unknown_disco_is_not_found() {
    let rmap = service_with(&["alice"]);
    let missing = iri("rmap:missing");
    assert_eq!(rmap.disco_status(&missing).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(rmap.read_disco(&missing).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        rmap.update_disco(&missing, &research_disco("rmap:d2"), &as_agent("alice"))
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}
