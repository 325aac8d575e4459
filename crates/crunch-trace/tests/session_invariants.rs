use std::collections::{BTreeSet, HashMap};

use crunch_trace::{assign_sessions, validate_order, Revision};
use proptest::prelude::*;

/// Builds an order where revision `i` depends on the listed earlier indices.
fn build(deps: &[Vec<usize>]) -> Vec<Revision> {
    deps.iter()
        .enumerate()
        .map(|(idx, parents)| {
            let mut revision = Revision::new("dev@example.com", format!("c{idx}"), format!("b{idx}"));
            revision.deps = parents.iter().map(|parent| format!("c{parent}")).collect();
            revision
        })
        .collect()
}

fn dag() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..24).prop_flat_map(|len| {
        let per_node: Vec<BoxedStrategy<Vec<usize>>> = (0..len)
            .map(|idx| {
                if idx == 0 {
                    Just(Vec::new()).boxed()
                } else {
                    prop::collection::btree_set(0..idx, 1..=idx.min(2))
                        .prop_map(|set| set.into_iter().collect())
                        .boxed()
                }
            })
            .collect();
        per_node
    })
}

proptest! {
    #[test]
    fn every_revision_gets_an_id_within_range(deps in dag()) {
        let mut order = build(&deps);
        validate_order(&order).unwrap();
        let last = assign_sessions(&mut order);
        for revision in &order {
            let fid = revision.fid.expect("assigned");
            prop_assert!(fid >= 1 && fid <= last);
        }
    }

    #[test]
    fn fork_dependents_end_in_distinct_sessions(deps in dag()) {
        let mut order = build(&deps);
        assign_sessions(&mut order);
        let mut dependents: HashMap<usize, BTreeSet<usize>> = HashMap::new();
        for (idx, parents) in deps.iter().enumerate() {
            for &parent in parents {
                dependents.entry(parent).or_default().insert(idx);
            }
        }
        for children in dependents.values().filter(|children| children.len() > 1) {
            let fids: BTreeSet<u32> = children.iter().map(|&child| order[child].fid.unwrap()).collect();
            prop_assert_eq!(fids.len(), children.len());
        }
    }

    #[test]
    fn assignment_is_deterministic(deps in dag()) {
        let mut first = build(&deps);
        let mut second = build(&deps);
        prop_assert_eq!(assign_sessions(&mut first), assign_sessions(&mut second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn chains_stay_in_one_session(len in 1usize..64) {
        let deps: Vec<Vec<usize>> = (0..len).map(|idx| if idx == 0 { vec![] } else { vec![idx - 1] }).collect();
        let mut order = build(&deps);
        prop_assert_eq!(assign_sessions(&mut order), 1);
        prop_assert!(order.iter().all(|revision| revision.fid == Some(1)));
    }
}
