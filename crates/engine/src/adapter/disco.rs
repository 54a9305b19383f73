use rmap_core::{vocab, Disco, Iri, Resource, RmapError, RmapResult, Statement, Term, Triple};

use super::connectivity::{is_connected, references_aggregate};
use super::{identifiers, stmt};

/// Build a DiSCO from its statements
///
/// The `rdf:type rmap:DiSCO` statement names the asserted subject; its
/// context is the official id, minted with `mint` when absent. References to
/// the asserted subject are rewritten to the official id, and an asserted
/// IRI that differs from the official id is kept as the provider id.
///
/// Statements about the DiSCO fill the creator, description, provider id,
/// `prov:wasGeneratedBy` and aggregation slots; everything else becomes a
/// related statement. Related statements must reference and be connected to
/// the aggregated resources.
pub fn as_disco<F>(stmts: &[Statement], mut mint: F) -> RmapResult<Disco>
where
    F: FnMut() -> RmapResult<Iri>,
{
    let ids = identifiers(stmts, &vocab::rmap::DISCO, &mut mint)?
        .ok_or_else(|| RmapError::defective("missing rdf:type rmap:DiSCO statement"))?;
    let official = Resource::Iri(ids.official.clone());
    let asserted_term = Term::from(ids.asserted.clone());

    let mut disco = Disco::new(ids.official.clone(), Vec::new());
    if let Resource::Iri(asserted) = &ids.asserted {
        if *asserted != ids.official {
            disco.provider_id = Some(Term::Iri(asserted.clone()));
        }
    }

    for s in stmts {
        let subject_is_disco = s.subject == ids.asserted;
        let subject = if subject_is_disco {
            official.clone()
        } else {
            s.subject.clone()
        };
        let object = if s.object == asserted_term {
            Term::from(official.clone())
        } else {
            s.object.clone()
        };
        let p = &s.predicate;

        if *p == *vocab::rdf::TYPE {
            if !subject_is_disco {
                disco.related_statements.push(Triple::new(subject, p.clone(), object));
            }
        } else if subject_is_disco && *p == *vocab::dcterms::CREATOR {
            let creator = object.as_iri().ok_or_else(|| {
                RmapError::defective(format!("DiSCO creator must be an IRI, got {}", object))
            })?;
            disco.creator = Some(creator.clone());
        } else if subject_is_disco && *p == *vocab::prov::WAS_GENERATED_BY {
            let by = object.as_iri().ok_or_else(|| {
                RmapError::defective(format!("prov:wasGeneratedBy must be an IRI, got {}", object))
            })?;
            disco.prov_generated_by = Some(by.clone());
        } else if subject_is_disco && *p == *vocab::rmap::PROVIDER_ID {
            disco.provider_id = Some(object);
        } else if subject_is_disco && *p == *vocab::ore::AGGREGATES {
            let resource = object.as_iri().ok_or_else(|| {
                RmapError::defective(format!("aggregated resource must be an IRI, got {}", object))
            })?;
            if !disco.aggregated_resources.contains(resource) {
                disco.aggregated_resources.push(resource.clone());
            }
        } else if subject_is_disco
            && (*p == *vocab::dc::DESCRIPTION || *p == *vocab::dcterms::DESCRIPTION)
        {
            disco.description = Some(object);
        } else {
            disco.related_statements.push(Triple::new(subject, p.clone(), object));
        }
    }

    validate_disco(&disco)?;
    Ok(disco)
}

/// Structural checks every stored DiSCO satisfies
///
/// At least one aggregated resource, and related statements that reference
/// the aggregated resources and are connected to them.
pub fn validate_disco(disco: &Disco) -> RmapResult<()> {
    if disco.aggregated_resources.is_empty() {
        return Err(RmapError::defective("no aggregated resource statements found"));
    }
    if !references_aggregate(&disco.aggregated_resources, &disco.related_statements) {
        return Err(RmapError::defective(
            "related statements do not reference aggregated resources",
        ));
    }
    if !is_connected(&disco.aggregated_resources, &disco.related_statements) {
        return Err(RmapError::defective(
            "disjoint graph: related statements do not form a connected graph",
        ));
    }
    Ok(())
}

/// Statements persisting `disco`, all in its named graph
pub fn disco_to_statements(disco: &Disco) -> Vec<Statement> {
    let id = &disco.id;
    let mut out = vec![stmt(id, &vocab::rdf::TYPE, &*vocab::rmap::DISCO, id)];
    if let Some(creator) = &disco.creator {
        out.push(stmt(id, &vocab::dcterms::CREATOR, creator, id));
    }
    if let Some(description) = &disco.description {
        out.push(stmt(id, &vocab::dcterms::DESCRIPTION, description.clone(), id));
    }
    if let Some(provider_id) = &disco.provider_id {
        out.push(stmt(id, &vocab::rmap::PROVIDER_ID, provider_id.clone(), id));
    }
    if let Some(by) = &disco.prov_generated_by {
        out.push(stmt(id, &vocab::prov::WAS_GENERATED_BY, by, id));
    }
    for resource in &disco.aggregated_resources {
        out.push(stmt(id, &vocab::ore::AGGREGATES, resource, id));
    }
    for triple in &disco.related_statements {
        out.push(triple.clone().in_context(id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmap_core::{BlankNode, ErrorKind, Literal};

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn no_mint() -> RmapResult<Iri> {
        Err(RmapError::internal("unexpected mint"))
    }

    fn submitted(subject: Resource, extra: Vec<(Resource, Iri, Term)>) -> Vec<Statement> {
        let mut stmts = vec![
            Statement::new(subject.clone(), vocab::rdf::TYPE.clone(), &*vocab::rmap::DISCO, None),
            Statement::new(subject.clone(), vocab::ore::AGGREGATES.clone(), iri("http://ex.org/a"), None),
            Statement::new(subject, vocab::ore::AGGREGATES.clone(), iri("http://ex.org/b"), None),
        ];
        stmts.extend(extra.into_iter().map(|(s, p, o)| Statement::new(s, p, o, None)));
        stmts
    }

    #[test]
    fn mints_id_for_blank_subject() {
        let b = Resource::Blank(BlankNode::new("d"));
        let stmts = submitted(b, vec![]);
        let disco = as_disco(&stmts, || Ok(iri("rmap:new"))).unwrap();
        assert_eq!(disco.id, iri("rmap:new"));
        assert_eq!(disco.aggregated_resources, vec![iri("http://ex.org/a"), iri("http://ex.org/b")]);
        assert!(disco.provider_id.is_none());
    }

    #[test]
    fn asserted_iri_becomes_provider_id() {
        let asserted = Resource::Iri(iri("http://mine.org/disco1"));
        let stmts = submitted(
            asserted.clone(),
            vec![(
                Resource::Iri(iri("http://ex.org/a")),
                iri("http://ex.org/partOf"),
                Term::from(asserted),
            )],
        );
        let disco = as_disco(&stmts, || Ok(iri("rmap:d1"))).unwrap();
        assert_eq!(disco.provider_id, Some(Term::Iri(iri("http://mine.org/disco1"))));
        // object reference rewritten to the official id
        assert_eq!(disco.related_statements[0].object, Term::Iri(iri("rmap:d1")));
    }

    #[test]
    fn classifies_known_slots() {
        let d = Resource::Blank(BlankNode::new("d"));
        let stmts = submitted(
            d.clone(),
            vec![
                (d.clone(), vocab::dcterms::CREATOR.clone(), Term::Iri(iri("http://orcid.org/1"))),
                (d.clone(), vocab::dc::DESCRIPTION.clone(), Term::from(Literal::string("about"))),
                (d, vocab::prov::WAS_GENERATED_BY.clone(), Term::Iri(iri("http://tool"))),
                (
                    Resource::Iri(iri("http://ex.org/a")),
                    vocab::rdf::TYPE.clone(),
                    Term::Iri(iri("http://ex.org/Article")),
                ),
            ],
        );
        let disco = as_disco(&stmts, || Ok(iri("rmap:d"))).unwrap();
        assert_eq!(disco.creator, Some(iri("http://orcid.org/1")));
        assert_eq!(disco.description, Some(Term::from(Literal::string("about"))));
        assert_eq!(disco.prov_generated_by, Some(iri("http://tool")));
        assert_eq!(disco.related_statements.len(), 1);
    }

    #[test]
    fn missing_type_is_defective() {
        let stmts = vec![Statement::new(
            iri("rmap:d"),
            vocab::ore::AGGREGATES.clone(),
            iri("http://ex.org/a"),
            Some(iri("rmap:d")),
        )];
        let err = as_disco(&stmts, no_mint).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
    }

    #[test]
    fn no_aggregates_is_defective() {
        let d = iri("rmap:d");
        let stmts = vec![stmt(&d, &vocab::rdf::TYPE, &*vocab::rmap::DISCO, &d)];
        let err = as_disco(&stmts, no_mint).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DefectiveArgument);
        assert!(err.to_string().contains("no aggregated resource"));
    }

    #[test]
    fn creator_literal_is_defective() {
        let d = Resource::Blank(BlankNode::new("d"));
        let stmts = submitted(
            d.clone(),
            vec![(d, vocab::dcterms::CREATOR.clone(), Term::from(Literal::string("me")))],
        );
        assert!(as_disco(&stmts, || Ok(iri("rmap:d"))).is_err());
    }

    #[test]
    fn disjoint_related_statements_rejected() {
        let d = Resource::Blank(BlankNode::new("d"));
        let stmts = submitted(
            d,
            vec![
                (
                    Resource::Iri(iri("http://ex.org/a")),
                    iri("http://ex.org/cites"),
                    Term::Iri(iri("http://ex.org/c")),
                ),
                (
                    Resource::Iri(iri("http://ex.org/x")),
                    iri("http://ex.org/cites"),
                    Term::Iri(iri("http://ex.org/y")),
                ),
            ],
        );
        let err = as_disco(&stmts, || Ok(iri("rmap:d"))).unwrap_err();
        assert!(err.to_string().contains("disjoint graph"));
    }

    #[test]
    fn related_must_reference_aggregate() {
        let d = Resource::Blank(BlankNode::new("d"));
        let stmts = submitted(
            d,
            vec![(
                Resource::Iri(iri("http://ex.org/x")),
                iri("http://ex.org/cites"),
                Term::Iri(iri("http://ex.org/a")),
            )],
        );
        let err = as_disco(&stmts, || Ok(iri("rmap:d"))).unwrap_err();
        assert!(err.to_string().contains("do not reference aggregated"));
    }

    #[test]
    fn statements_share_disco_context() {
        let disco = Disco::new(iri("rmap:d"), vec![iri("http://ex.org/a")])
            .with_creator(iri("http://orcid.org/1"));
        let stmts = disco_to_statements(&disco);
        assert_eq!(stmts.len(), 3);
        assert!(stmts.iter().all(|s| s.context == Some(iri("rmap:d"))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_disco() -> impl Strategy<Value = Disco> {
            (
                proptest::collection::btree_set(0u8..20, 1..5),
                proptest::collection::vec((0u8..5, 0u8..40), 0..6),
                proptest::option::of("[a-z ]{1,12}"),
                any::<bool>(),
            )
                .prop_map(|(aggs, rels, description, with_creator)| {
                    let aggs: Vec<Iri> = aggs
                        .into_iter()
                        .map(|i| iri(&format!("http://ex.org/r{}", i)))
                        .collect();
                    // every related statement hangs off an aggregated resource
                    let related = rels
                        .into_iter()
                        .map(|(s, o)| {
                            let subject = aggs[s as usize % aggs.len()].clone();
                            Triple::new(subject, iri("http://ex.org/rel"), Literal::string(format!("v{}", o)))
                        })
                        .collect::<std::collections::BTreeSet<_>>()
                        .into_iter()
                        .collect();
                    let mut disco = Disco::new(iri("rmap:prop"), aggs).with_related(related);
                    if let Some(d) = description {
                        disco = disco.with_description(Literal::string(d));
                    }
                    if with_creator {
                        disco = disco.with_creator(iri("http://orcid.org/0000"));
                    }
                    disco
                })
        }

        proptest! {
            #[test]
            fn parse_inverts_serialization(disco in arb_disco()) {
                let parsed = as_disco(&disco_to_statements(&disco), no_mint).unwrap();
                prop_assert_eq!(parsed, disco);
            }
        }
    }
}
