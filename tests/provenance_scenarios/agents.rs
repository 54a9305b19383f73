//! Agent registration and updates

use crate::test_utils::*;
use rmapdb::{ErrorKind, EventDetail, EventType, RequestEventDetails, Status, TargetType};

#[test]
fn self_registration_creates_active_agent() {
    let rmap = service_with(&[]);
    let a = agent("dora");
    let event = rmap
        .create_agent(&a, &RequestEventDetails::new(a.id.clone()))
        .unwrap();

    assert_eq!(event.target_type, TargetType::Agent);
    assert_eq!(event.detail, EventDetail::Creation { created: vec![a.id.clone()] });
    assert_eq!(rmap.agent_status(&a.id).unwrap(), Status::Active);
    assert_eq!(rmap.read_agent(&a.id).unwrap(), a);
    assert_eq!(rmap.event_related_agents(&event.id).unwrap(), vec![a.id.clone()]);
    assert!(rmap.event_related_discos(&event.id).unwrap().is_empty());
}

#[test]
fn admin_registers_another_agent() {
    let rmap = service_with(&[]);
    let a = agent("erin");
    let event = rmap
        .create_agent(&a, &RequestEventDetails::new(iri(ADMIN)))
        .unwrap();
    assert_eq!(event.associated_agent, iri(ADMIN));
    assert!(rmap.is_agent_id(&a.id).unwrap());
}

#[test]
fn unknown_requester_cannot_register_others() {
    let rmap = service_with(&[]);
    let err = rmap
        .create_agent(&agent("frank"), &as_agent("ghost"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AgentNotFound);
    assert!(!rmap.is_agent_id(&iri("rmap:frank")).unwrap());
}

#[test]
fn update_describes_every_changed_field() {
    let rmap = service_with(&["gina"]);
    let mut changed = agent("gina");
    changed.name = "Gina".to_string();
    changed.auth_id = iri("https://orcid.org/gina-2");

    let event = rmap.update_agent(&changed, &as_agent("gina")).unwrap();
    assert_eq!(event.event_type(), EventType::UpdateWithReplace);
    assert_eq!(
        event.description.as_deref(),
        Some(
            "Updates: foaf:name=\"gina (test agent)\" -> \"Gina\"; \
             rmap:userAuthId=https://orcid.org/gina -> https://orcid.org/gina-2; "
        )
    );
    assert_eq!(rmap.read_agent(&changed.id).unwrap(), changed);
    assert_eq!(rmap.read_event(&event.id).unwrap(), event);
}

#[test]
fn unchanged_update_is_rejected() {
    let rmap = service_with(&["hal"]);
    let err = rmap.update_agent(&agent("hal"), &as_agent("hal")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
}

#[test]
fn update_of_unknown_agent_is_not_found() {
    let rmap = service_with(&["ivy"]);
    let err = rmap.update_agent(&agent("nobody"), &as_agent("ivy")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
