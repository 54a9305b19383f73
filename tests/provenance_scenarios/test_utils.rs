//! Shared fixtures for the scenario suite

use rmapdb::{
    Agent, Disco, Iri, Literal, RequestEventDetails, RmapConfig, RmapService, Triple,
};

pub const ADMIN: &str = "rmap:admin";

pub fn iri(s: &str) -> Iri {
    Iri::new(s).unwrap()
}

/// Route engine logs to the test harness; repeated calls are harmless
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("rmap=debug")
        .try_init();
}

pub fn agent(name: &str) -> Agent {
    Agent::new(
        iri(&format!("rmap:{}", name)),
        format!("{} (test agent)", name),
        iri("https://orcid.org"),
        iri(&format!("https://orcid.org/{}", name)),
    )
}

pub fn as_agent(name: &str) -> RequestEventDetails {
    RequestEventDetails::new(iri(&format!("rmap:{}", name)))
}

/// Service with an administrator and the named agents registered
pub fn service_with(agents: &[&str]) -> RmapService {
    init_tracing();
    let rmap = RmapService::in_memory(RmapConfig::default().admin_agent(iri(ADMIN))).unwrap();
    let admin = Agent::new(
        iri(ADMIN),
        "Administrator",
        iri("https://orcid.org"),
        iri("https://orcid.org/admin"),
    );
    rmap.create_agent(&admin, &RequestEventDetails::new(iri(ADMIN))).unwrap();
    for name in agents {
        let a = agent(name);
        rmap.create_agent(&a, &RequestEventDetails::new(a.id.clone())).unwrap();
    }
    rmap
}

/// Article, dataset and software linked by two related statements
pub fn research_disco(id: &str) -> Disco {
    Disco::new(
        iri(id),
        vec![
            iri("https://doi.org/10.1000/article"),
            iri("https://doi.org/10.1000/dataset"),
        ],
    )
    .with_creator(iri("https://orcid.org/0000-0001"))
    .with_description(Literal::string("An article, its data and the code that made it"))
    .with_related(vec![
        Triple::new(
            iri("https://doi.org/10.1000/article"),
            iri("http://purl.org/spar/cito/citesAsDataSource"),
            iri("https://doi.org/10.1000/dataset"),
        ),
        Triple::new(
            iri("https://doi.org/10.1000/dataset"),
            iri("http://www.w3.org/ns/prov#wasGeneratedBy"),
            iri("https://github.com/example/pipeline"),
        ),
    ])
}
