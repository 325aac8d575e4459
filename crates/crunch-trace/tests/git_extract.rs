use std::fs;
use std::io::Cursor;
use std::path::Path;

use crunch_trace::{extract_order, load_order, BlobStore, ExtractOutcome, GitHistory, Prompt};
use git2::{Oid, Repository, Signature, Time};

const TRACKED: &str = "docs/notes.txt";

struct Fixture {
    repo: Repository,
    clock: i64,
}

impl Fixture {
    fn new(path: &Path) -> Self {
        Self {
            repo: Repository::init(path).expect("init repo"),
            clock: 1_600_000_000,
        }
    }

    /// Commits a tree holding `files` on top of `parents`, optionally moving HEAD.
    fn commit(
        &mut self,
        files: &[(&str, &str)],
        parents: &[Oid],
        author: &str,
        head: bool,
    ) -> Oid {
        self.clock += 60;
        let mut docs = self.repo.treebuilder(None).unwrap();
        let mut root = self.repo.treebuilder(None).unwrap();
        for (name, content) in files {
            let blob = self.repo.blob(content.as_bytes()).unwrap();
            match name.strip_prefix("docs/") {
                Some(inner) => docs.insert(inner, blob, 0o100644).unwrap(),
                None => root.insert(*name, blob, 0o100644).unwrap(),
            };
        }
        let docs_tree = docs.write().unwrap();
        root.insert("docs", docs_tree, 0o040000).unwrap();
        let tree = self.repo.find_tree(root.write().unwrap()).unwrap();
        let sig = Signature::new("Dev", author, &Time::new(self.clock, 0)).unwrap();
        let parents: Vec<_> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        self.repo
            .commit(
                if head { Some("HEAD") } else { None },
                &sig,
                &sig,
                "change",
                &tree,
                &parent_refs,
            )
            .unwrap()
    }
}

/// c1 -> c2 -> u (touches another file only) -> m
///  \--> c3 ----------------------------------/
fn branching_history(path: &Path) -> (Fixture, [Oid; 5]) {
    let mut fx = Fixture::new(path);
    let c1 = fx.commit(&[(TRACKED, "one\n")], &[], "ada@example.com", true);
    let c2 = fx.commit(&[(TRACKED, "one\ntwo\n")], &[c1], "ada@example.com", true);
    let u = fx.commit(
        &[(TRACKED, "one\ntwo\n"), ("README", "hi\n")],
        &[c2],
        "ada@example.com",
        true,
    );
    let c3 = fx.commit(&[(TRACKED, "zero\none\n")], &[c1], "bob@example.com", false);
    let m = fx.commit(
        &[(TRACKED, "zero\none\ntwo\n"), ("README", "hi\n")],
        &[u, c3],
        "ada@example.com",
        true,
    );
    (fx, [c1, c2, u, c3, m])
}

#[test]
fn extracts_order_with_deps_and_sessions() {
    let repo_dir = tempfile::tempdir().unwrap();
    let blob_dir = tempfile::tempdir().unwrap();
    let (_fx, [c1, c2, u, c3, m]) = branching_history(repo_dir.path());

    let history = GitHistory::open(repo_dir.path(), TRACKED).unwrap();
    let store = BlobStore::new(blob_dir.path());
    let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
    let outcome = extract_order(&history, &store, &mut prompt).unwrap();

    let path = blob_dir.path().join("docs-notes-txt.ord");
    assert_eq!(
        outcome,
        ExtractOutcome::Written {
            path: path.clone(),
            revisions: 4,
            sessions: 4,
        }
    );

    let order = load_order(&path).unwrap();
    let commits: Vec<&str> = order.iter().map(|rev| rev.commit.as_str()).collect();
    assert_eq!(commits.len(), 4);
    assert_eq!(commits[0], c1.to_string());
    assert_eq!(commits[3], m.to_string());
    assert!(!commits.contains(&u.to_string().as_str()));

    let merge = &order[3];
    assert_eq!(merge.deps, vec![c2.to_string(), c3.to_string()]);
    assert_eq!(merge.fid, Some(4));
    assert_eq!(order[0].fid, Some(1));
    let mut branch_fids: Vec<u32> = order[1..3].iter().map(|rev| rev.fid.unwrap()).collect();
    branch_fids.sort_unstable();
    assert_eq!(branch_fids, vec![2, 3]);
    let bob = order.iter().find(|rev| rev.commit == c3.to_string()).unwrap();
    assert_eq!(bob.author, "bob@example.com");
    assert_eq!(bob.deps, vec![c1.to_string()]);

    for rev in &order {
        assert!(blob_dir.path().join(&rev.blob).exists());
    }
    assert_eq!(store.load(&order[3].blob).unwrap(), b"zero\none\ntwo\n");
    // nothing was asked: every parent blob had a single candidate
    assert!(prompt.into_output().is_empty());
}

#[test]
fn existing_order_is_kept_unless_confirmed() {
    let repo_dir = tempfile::tempdir().unwrap();
    let blob_dir = tempfile::tempdir().unwrap();
    branching_history(repo_dir.path());
    let order_path = blob_dir.path().join("docs-notes-txt.ord");
    fs::write(&order_path, "[]").unwrap();

    let history = GitHistory::open(repo_dir.path(), TRACKED).unwrap();
    let store = BlobStore::new(blob_dir.path());
    let mut prompt = Prompt::new(Cursor::new("no\n"), Vec::new());
    let outcome = extract_order(&history, &store, &mut prompt).unwrap();

    assert_eq!(outcome, ExtractOutcome::Aborted { path: order_path.clone() });
    assert_eq!(fs::read_to_string(&order_path).unwrap(), "[]");
    assert_eq!(fs::read_dir(blob_dir.path()).unwrap().count(), 1);
    let asked = String::from_utf8(prompt.into_output()).unwrap();
    assert!(asked.contains("continue? (yes / [no])"));

    let mut prompt = Prompt::new(Cursor::new("yes\n"), Vec::new());
    let outcome = extract_order(&history, &store, &mut prompt).unwrap();
    assert!(matches!(outcome, ExtractOutcome::Written { revisions: 4, .. }));
    assert_eq!(load_order(&order_path).unwrap().len(), 4);
}

#[test]
fn reverted_content_asks_the_operator() {
    let repo_dir = tempfile::tempdir().unwrap();
    let blob_dir = tempfile::tempdir().unwrap();
    let mut fx = Fixture::new(repo_dir.path());
    let a = fx.commit(&[(TRACKED, "v1\n")], &[], "ada@example.com", true);
    let b = fx.commit(&[(TRACKED, "v2\n")], &[a], "ada@example.com", true);
    let c = fx.commit(&[(TRACKED, "v1\n")], &[b], "ada@example.com", true);
    let d = fx.commit(&[(TRACKED, "v3\n")], &[c], "ada@example.com", true);

    let history = GitHistory::open(repo_dir.path(), TRACKED).unwrap();
    let store = BlobStore::new(blob_dir.path());
    let mut prompt = Prompt::new(Cursor::new("1\n"), Vec::new());
    extract_order(&history, &store, &mut prompt).unwrap();

    let order = load_order(&store.order_path(TRACKED)).unwrap();
    assert_eq!(order.len(), 4);
    // d's parent content "v1" was produced by both a and c; the operator picked [1].
    assert_eq!(order[3].commit, d.to_string());
    assert_eq!(order[3].deps, vec![a.to_string()]);
    let shown = String::from_utf8(prompt.into_output()).unwrap();
    assert!(shown.contains(&format!(" [1] {a}")));
    assert!(shown.contains(&format!(" [2] {c}")));
    assert!(shown.contains(&format!("{} depends on?", &d.to_string()[..10])));
}
