use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crunch_core::{from_json_slice, CrunchError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// One historical revision of a tracked file, as persisted in an order file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Author email of the commit.
    pub author: String,
    /// Commit id.
    pub commit: String,
    /// Blob id of the tracked file at this commit.
    pub blob: String,
    /// Commit ids of the earlier revisions this one was derived from.
    #[serde(default)]
    pub deps: Vec<String>,
    /// Session (fork) id, unset until sessions are assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<u32>,
}

impl Revision {
    /// Creates a revision without dependency or session metadata.
    pub fn new(
        author: impl Into<String>,
        commit: impl Into<String>,
        blob: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            commit: commit.into(),
            blob: blob.into(),
            deps: Vec::new(),
            fid: None,
        }
    }
}

/// Checks the order invariants: commit ids are unique and every dependency
/// names a revision appearing earlier in the order.
pub fn validate_order(order: &[Revision]) -> Result<(), CrunchError> {
    let mut seen = HashSet::with_capacity(order.len());
    for (idx, revision) in order.iter().enumerate() {
        for dep in &revision.deps {
            if !seen.contains(dep.as_str()) {
                return Err(CrunchError::Input(
                    ErrorInfo::new("dependency-order", "dependency does not precede revision")
                        .with_context("commit", revision.commit.clone())
                        .with_context("dep", dep.clone())
                        .with_context("index", idx.to_string()),
                ));
            }
        }
        if !seen.insert(revision.commit.as_str()) {
            return Err(CrunchError::Input(
                ErrorInfo::new("duplicate-commit", "commit appears twice in order")
                    .with_context("commit", revision.commit.clone()),
            ));
        }
    }
    Ok(())
}

/// Reads an order file written by [`crate::BlobStore::store_order`].
pub fn load_order(path: &Path) -> Result<Vec<Revision>, CrunchError> {
    let bytes = fs::read(path).map_err(|err| CrunchError::io("order-read", path, err))?;
    from_json_slice(&bytes)
}
