use std::collections::HashMap;

use crunch_core::{CrunchError, ErrorInfo};
use log::debug;

use crate::prompt::Chooser;
use crate::revision::Revision;

/// Access to the tracked file's content hash in each parent of a commit.
pub trait ParentBlobs {
    /// Blob ids of the tracked file in every parent of `commit`, in parent order.
    fn parent_blobs(&self, commit: &str) -> Result<Vec<String>, CrunchError>;
}

/// Abbreviated commit id used in prompts.
pub fn short_id(commit: &str) -> &str {
    commit.get(..10).unwrap_or(commit)
}

/// Fills `deps` for every revision by matching each parent's blob against the
/// revisions seen so far.
///
/// Content can recur (reverts, re-applied patches), so each hash maps to every
/// commit that produced it. A revision is registered under its own hash before
/// its parents are looked up. When a hash maps to several commits the
/// `chooser` decides; a single match is taken as is.
pub fn resolve_dependencies<P, C>(
    order: &mut [Revision],
    parents: &P,
    chooser: &mut C,
) -> Result<(), CrunchError>
where
    P: ParentBlobs + ?Sized,
    C: Chooser + ?Sized,
{
    let mut tips: HashMap<String, Vec<String>> = HashMap::new();
    for (idx, revision) in order.iter_mut().enumerate() {
        tips.entry(revision.blob.clone())
            .or_default()
            .push(revision.commit.clone());
        revision.deps.clear();
        if idx == 0 {
            continue;
        }
        let prompt = format!("{} depends on?", short_id(&revision.commit));
        for blob in parents.parent_blobs(&revision.commit)? {
            let candidates = tips.get(&blob).map(Vec::as_slice).unwrap_or_default();
            let dep = match candidates {
                [] => {
                    return Err(CrunchError::Git(
                        ErrorInfo::new(
                            "unresolved-dependency",
                            "parent content does not match any earlier revision",
                        )
                        .with_context("commit", revision.commit.clone())
                        .with_context("parent_blob", blob),
                    ))
                }
                [only] => only.clone(),
                many => chooser.choose(&prompt, many)?,
            };
            debug!("{} <- {}", short_id(&revision.commit), short_id(&dep));
            revision.deps.push(dep);
        }
    }
    Ok(())
}
