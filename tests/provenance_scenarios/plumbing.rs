//! Configuration, event sinks and id services wired through the service

use crate::test_utils::*;
use rmapdb::{
    IdService, JsonLinesEventSink, MemoryTripleStore, OrderBy, RequestEventDetails, RmapConfig,
    RmapService, StatusFilter, UuidIdService,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

#[test]
fn config_file_drives_service_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
admin_agent_id = "rmap:admin"
default_query_limit = 2
max_query_limit = 10
default_status_filter = "All"
default_order_by = "Unordered"
publish_timeout_secs = 5
id_prefix = "ark:/99999/"
"#
    )
    .unwrap();

    let config = RmapConfig::load(file.path()).unwrap();
    let rmap = RmapService::in_memory(config).unwrap();
    let params = rmap.search_params();
    assert_eq!(params.limit(), 2);
    assert_eq!(params.status(), StatusFilter::All);
    assert_eq!(params.order_by(), OrderBy::Unordered);
    assert!(rmap.has_admin_rights(&RequestEventDetails::new(iri(ADMIN))));

    let a = agent("alice");
    let event = rmap
        .create_agent(&a, &RequestEventDetails::new(a.id.clone()))
        .unwrap();
    assert!(event.id.as_str().starts_with("ark:/99999/"));
}

#[test]
fn inconsistent_limits_rejected() {
    let config = RmapConfig::default().query_limits(50, 10);
    assert!(RmapService::in_memory(config).is_err());
}

#[test]
fn json_lines_sink_receives_every_event() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let sink = JsonLinesEventSink::new(file.reopen().unwrap());
    let rmap = RmapService::new(
        Arc::new(MemoryTripleStore::new()),
        Arc::new(UuidIdService),
        Arc::new(sink),
        RmapConfig::default().publish_timeout(Duration::from_secs(1)),
    )
    .unwrap();

    let a = agent("alice");
    rmap.create_agent(&a, &RequestEventDetails::new(a.id.clone())).unwrap();
    let created = rmap
        .create_disco(&research_disco("rmap:d1"), &as_agent("alice"))
        .unwrap();
    assert!(UuidIdService.is_valid_id(&created.id));

    let text = std::fs::read_to_string(file.path()).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["key"], created.id.as_str());
    assert_eq!(lines[1]["event"]["detail"]["type"], "creation");
}
