use rmap_core::{vocab, Agent, Iri, Literal, RmapError, RmapResult, Statement, Term};

use super::{identifiers, stmt};

/// Build an Agent from its statements
///
/// Exactly one statement each for type, `foaf:name`, `rmap:identityProvider`
/// and `rmap:userAuthId`, all about the agent. Anything else is rejected.
pub fn as_agent<F>(stmts: &[Statement], mut mint: F) -> RmapResult<Agent>
where
    F: FnMut() -> RmapResult<Iri>,
{
    let ids = identifiers(stmts, &vocab::rmap::AGENT, &mut mint)?
        .ok_or_else(|| RmapError::defective("missing rdf:type rmap:Agent statement"))?;

    let mut seen_type = false;
    let mut name: Option<String> = None;
    let mut id_provider: Option<Iri> = None;
    let mut auth_id: Option<Iri> = None;

    for s in stmts {
        if s.subject != ids.asserted {
            return Err(RmapError::defective(format!(
                "unexpected statement in Agent: {}",
                s
            )));
        }
        let p = &s.predicate;
        if *p == *vocab::rdf::TYPE {
            if s.object != Term::Iri(vocab::rmap::AGENT.clone()) {
                return Err(RmapError::defective(format!("unexpected Agent type {}", s.object)));
            }
            set_once(&mut seen_type, p)?;
        } else if *p == *vocab::foaf::NAME {
            put_once(&mut name, s.object.lexical().to_string(), p)?;
        } else if *p == *vocab::rmap::IDENTITY_PROVIDER {
            put_once(&mut id_provider, iri_object(s)?, p)?;
        } else if *p == *vocab::rmap::USER_AUTH_ID {
            put_once(&mut auth_id, iri_object(s)?, p)?;
        } else {
            return Err(RmapError::defective(format!(
                "unexpected statement in Agent: {}",
                s
            )));
        }
    }

    Ok(Agent {
        id: ids.official,
        name: name.ok_or_else(|| RmapError::defective("missing foaf:name"))?,
        id_provider: id_provider
            .ok_or_else(|| RmapError::defective("missing rmap:identityProvider"))?,
        auth_id: auth_id.ok_or_else(|| RmapError::defective("missing rmap:userAuthId"))?,
    })
}

/// Statements persisting `agent`, all in its named graph
pub fn agent_to_statements(agent: &Agent) -> Vec<Statement> {
    let id = &agent.id;
    vec![
        stmt(id, &vocab::rdf::TYPE, &*vocab::rmap::AGENT, id),
        stmt(id, &vocab::foaf::NAME, Literal::string(agent.name.clone()), id),
        stmt(id, &vocab::rmap::IDENTITY_PROVIDER, &agent.id_provider, id),
        stmt(id, &vocab::rmap::USER_AUTH_ID, &agent.auth_id, id),
    ]
}

fn iri_object(s: &Statement) -> RmapResult<Iri> {
    s.object.as_iri().cloned().ok_or_else(|| {
        RmapError::defective(format!("object of <{}> must be an IRI", s.predicate))
    })
}

fn set_once(flag: &mut bool, predicate: &Iri) -> RmapResult<()> {
    if *flag {
        return Err(RmapError::defective(format!("duplicate <{}>", predicate)));
    }
    *flag = true;
    Ok(())
}

fn put_once<T>(slot: &mut Option<T>, value: T, predicate: &Iri) -> RmapResult<()> {
    if slot.is_some() {
        return Err(RmapError::defective(format!("duplicate <{}>", predicate)));
    }
    *slot = Some(value);
    Ok(())
}
