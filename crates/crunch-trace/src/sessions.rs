use std::collections::HashMap;

use crate::revision::Revision;

/// Assigns a session (fork) id to every revision in a single forward pass.
///
/// A revision without an id opens a new session. Its dependents are then
/// labelled: a sole dependent that is still unlabelled continues the session,
/// a sole dependent that already has an id gets a fresh one, and when several
/// revisions depend on the same one each of them gets a fresh id, replacing
/// whatever it had.
///
/// Returns the highest id allocated.
pub fn assign_sessions(order: &mut [Revision]) -> u32 {
    let index: HashMap<String, usize> = order
        .iter()
        .enumerate()
        .map(|(idx, revision)| (revision.commit.clone(), idx))
        .collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); order.len()];
    for (idx, revision) in order.iter().enumerate() {
        for dep in &revision.deps {
            if let Some(&target) = index.get(dep) {
                if !dependents[target].contains(&idx) {
                    dependents[target].push(idx);
                }
            }
        }
    }

    let mut next = 0u32;
    for idx in 0..order.len() {
        let own = match order[idx].fid {
            Some(fid) => fid,
            None => {
                next += 1;
                order[idx].fid = Some(next);
                next
            }
        };
        match dependents[idx].as_slice() {
            [] => {}
            [only] => {
                let dependent = &mut order[*only];
                if dependent.fid.is_none() {
                    dependent.fid = Some(own);
                } else {
                    next += 1;
                    dependent.fid = Some(next);
                }
            }
            many => {
                for &other in many {
                    next += 1;
                    order[other].fid = Some(next);
                }
            }
        }
    }
    next
}
