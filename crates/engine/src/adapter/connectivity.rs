//! Reachability checks over a DiSCO's related statements.
//!
//! Resources are nodes and statements are edges; literal objects are dead
//! ends. The adjacency map is built once per check and walked breadth-first
//! from the aggregated resources, so each statement is visited at most once.

use std::collections::{HashMap, HashSet, VecDeque};

use rmap_core::{Iri, Resource, Triple};

/// Resource to indices of the statements touching it
#[derive(Debug, Default)]
pub struct StatementAdjacency {
    touching: HashMap<Resource, Vec<usize>>,
}

impl StatementAdjacency {
    /// Index every statement under its subject and resource-valued object
    pub fn build(statements: &[Triple]) -> Self {
        let mut touching: HashMap<Resource, Vec<usize>> = HashMap::new();
        for (idx, stmt) in statements.iter().enumerate() {
            touching.entry(stmt.subject.clone()).or_default().push(idx);
            if let Some(object) = stmt.object.as_resource() {
                if object != stmt.subject {
                    touching.entry(object).or_default().push(idx);
                }
            }
        }
        Self { touching }
    }

    /// Statements incident to `node`
    pub fn incident(&self, node: &Resource) -> &[usize] {
        self.touching.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices of statements reachable from `seeds`
    pub fn reachable(&self, statements: &[Triple], seeds: &[Iri]) -> HashSet<usize> {
        let mut visited: HashSet<usize> = HashSet::new();
        let mut seen: HashSet<Resource> = HashSet::new();
        let mut queue: VecDeque<Resource> = VecDeque::new();

        for seed in seeds {
            let node = Resource::Iri(seed.clone());
            if seen.insert(node.clone()) {
                queue.push_back(node);
            }
        }

        while let Some(node) = queue.pop_front() {
            for &idx in self.incident(&node) {
                if !visited.insert(idx) {
                    continue;
                }
                let stmt = &statements[idx];
                let mut ends = vec![stmt.subject.clone()];
                if let Some(object) = stmt.object.as_resource() {
                    ends.push(object);
                }
                for end in ends {
                    if seen.insert(end.clone()) {
                        queue.push_back(end);
                    }
                }
            }
        }
        visited
    }
}

/// True when no related statement is disjoint from the aggregated resources
pub fn is_connected(aggregated: &[Iri], related: &[Triple]) -> bool {
    if related.is_empty() {
        return true;
    }
    let adjacency = StatementAdjacency::build(related);
    adjacency.reachable(related, aggregated).len() == related.len()
}

/// True when some related statement has an aggregated resource as subject
pub fn references_aggregate(aggregated: &[Iri], related: &[Triple]) -> bool {
    if related.is_empty() {
        return true;
    }
    related.iter().any(|stmt| {
        stmt.subject
            .as_iri()
            .map_or(false, |s| aggregated.contains(s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmap_core::{BlankNode, Literal, Term};

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn t(s: &str, o: &str) -> Triple {
        Triple::new(iri(s), iri("ex:rel"), iri(o))
    }

    #[test]
    fn empty_related_is_connected() {
        assert!(is_connected(&[iri("ex:a")], &[]));
        assert!(references_aggregate(&[iri("ex:a")], &[]));
    }

    #[test]
    fn chain_through_objects_and_subjects() {
        let agg = [iri("ex:a")];
        // a -> b, c -> b, c -> d : reachable via b in object position
        let related = vec![t("ex:a", "ex:b"), t("ex:c", "ex:b"), t("ex:c", "ex:d")];
        assert!(is_connected(&agg, &related));
    }

    #[test]
    fn disjoint_statement_detected() {
        let agg = [iri("ex:a")];
        let related = vec![t("ex:a", "ex:b"), t("ex:x", "ex:y")];
        assert!(!is_connected(&agg, &related));
    }

    #[test]
    fn literals_are_dead_ends() {
        let agg = [iri("ex:a")];
        let related = vec![
            Triple::new(iri("ex:a"), iri("ex:title"), Literal::string("same")),
            Triple::new(iri("ex:z"), iri("ex:title"), Literal::string("same")),
        ];
        assert!(!is_connected(&agg, &related));
    }

    #[test]
    fn blank_nodes_link() {
        let agg = [iri("ex:a")];
        let b = BlankNode::new("n1");
        let related = vec![
            Triple::new(iri("ex:a"), iri("ex:author"), Term::Blank(b.clone())),
            Triple::new(b, iri("ex:name"), Literal::string("Jo")),
        ];
        assert!(is_connected(&agg, &related));
    }

    #[test]
    fn references_aggregate_requires_subject_match() {
        let agg = [iri("ex:a")];
        assert!(!references_aggregate(&agg, &[t("ex:b", "ex:a")]));
        assert!(references_aggregate(&agg, &[t("ex:b", "ex:a"), t("ex:a", "ex:c")]));
    }
}
