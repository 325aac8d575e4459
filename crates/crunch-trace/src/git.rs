use std::path::{Path, PathBuf};

use crunch_core::{CrunchError, ErrorInfo};
use git2::{Commit, ErrorCode, ObjectType, Oid, Repository, Sort};
use log::debug;

use crate::resolve::ParentBlobs;
use crate::revision::Revision;

fn git_error(code: &str, err: git2::Error) -> CrunchError {
    CrunchError::Git(ErrorInfo::new(code, err.message().to_string()))
}

/// History of a single file inside a git repository.
pub struct GitHistory {
    repo: Repository,
    tracked: PathBuf,
}

impl std::fmt::Debug for GitHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHistory")
            .field("repo", &self.repo.path())
            .field("tracked", &self.tracked)
            .finish()
    }
}

impl GitHistory {
    /// Opens the repository at `repo_path` and tracks `tracked` (relative to the repository root).
    pub fn open(repo_path: &Path, tracked: impl Into<PathBuf>) -> Result<Self, CrunchError> {
        let repo = Repository::open(repo_path).map_err(|err| {
            CrunchError::Git(
                ErrorInfo::new("repo-open", err.message().to_string())
                    .with_context("path", repo_path.display().to_string()),
            )
        })?;
        Ok(Self::from_repository(repo, tracked))
    }

    /// Wraps an already opened repository.
    pub fn from_repository(repo: Repository, tracked: impl Into<PathBuf>) -> Self {
        Self {
            repo,
            tracked: tracked.into(),
        }
    }

    /// Path of the tracked file within the repository.
    pub fn tracked(&self) -> &Path {
        &self.tracked
    }

    /// Lists every commit reachable from HEAD that changed the tracked file,
    /// parents before children.
    ///
    /// A commit is kept when the file exists in its tree and it is a root
    /// commit or its blob differs from the file in every parent.
    pub fn revisions(&self) -> Result<Vec<Revision>, CrunchError> {
        let mut walk = self.repo.revwalk().map_err(|err| git_error("revwalk", err))?;
        walk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .map_err(|err| git_error("revwalk", err))?;
        walk.push_head().map_err(|err| git_error("revwalk-head", err))?;

        let mut revisions = Vec::new();
        for oid in walk {
            let oid = oid.map_err(|err| git_error("revwalk", err))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|err| git_error("commit-lookup", err))?;
            let Some(blob) = self.blob_at(&commit)? else {
                continue;
            };
            let mut same_as_parent = false;
            for parent in commit.parents() {
                if self.blob_at(&parent)? == Some(blob) {
                    same_as_parent = true;
                    break;
                }
            }
            if same_as_parent {
                continue;
            }
            let author = commit.author().email().unwrap_or_default().to_string();
            debug!("{} touches {}", oid, self.tracked.display());
            revisions.push(Revision::new(author, oid.to_string(), blob.to_string()));
        }
        Ok(revisions)
    }

    /// Raw content of a blob.
    pub fn blob_content(&self, blob: &str) -> Result<Vec<u8>, CrunchError> {
        let oid = Oid::from_str(blob).map_err(|err| git_error("blob-id", err))?;
        let blob = self
            .repo
            .find_blob(oid)
            .map_err(|err| git_error("blob-lookup", err))?;
        Ok(blob.content().to_vec())
    }

    fn blob_at(&self, commit: &Commit<'_>) -> Result<Option<Oid>, CrunchError> {
        let tree = commit.tree().map_err(|err| git_error("tree-lookup", err))?;
        match tree.get_path(&self.tracked) {
            Ok(entry) if entry.kind() == Some(ObjectType::Blob) => Ok(Some(entry.id())),
            Ok(_) => Ok(None),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
            Err(err) => Err(git_error("tree-lookup", err)),
        }
    }
}

impl ParentBlobs for GitHistory {
    fn parent_blobs(&self, commit: &str) -> Result<Vec<String>, CrunchError> {
        let oid = Oid::from_str(commit).map_err(|err| git_error("commit-id", err))?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|err| git_error("commit-lookup", err))?;
        let mut blobs = Vec::with_capacity(commit.parent_count());
        for parent in commit.parents() {
            match self.blob_at(&parent)? {
                Some(blob) => blobs.push(blob.to_string()),
                None => {
                    return Err(CrunchError::Git(
                        ErrorInfo::new("unresolved-dependency", "parent does not contain the file")
                            .with_context("commit", oid.to_string())
                            .with_context("parent", parent.id().to_string())
                            .with_context("path", self.tracked.display().to_string()),
                    ))
                }
            }
        }
        Ok(blobs)
    }
}
