use std::collections::HashMap;
use std::io::Cursor;

use crunch_core::CrunchError;
use crunch_trace::{resolve_dependencies, Chooser, ParentBlobs, Prompt, Revision};

struct Parents(HashMap<String, Vec<String>>);

impl ParentBlobs for Parents {
    fn parent_blobs(&self, commit: &str) -> Result<Vec<String>, CrunchError> {
        Ok(self.0.get(commit).cloned().unwrap_or_default())
    }
}

struct Counting<'a> {
    inner: &'a mut dyn Chooser,
    offered: Vec<usize>,
}

impl Chooser for Counting<'_> {
    fn choose(&mut self, prompt: &str, candidates: &[String]) -> Result<String, CrunchError> {
        self.offered.push(candidates.len());
        self.inner.choose(prompt, candidates)
    }
}

/// r1 and r2 carry identical content; r3's parent has that content too.
fn shared_content_order() -> (Vec<Revision>, Parents) {
    let order = vec![
        Revision::new("a@example.com", "r1aaaaaaaaaa", "same"),
        Revision::new("b@example.com", "r2bbbbbbbbbb", "same"),
        Revision::new("c@example.com", "r3cccccccccc", "other"),
    ];
    let parents = Parents(
        [
            ("r2bbbbbbbbbb".to_string(), vec!["same".to_string()]),
            ("r3cccccccccc".to_string(), vec!["same".to_string()]),
        ]
        .into_iter()
        .collect(),
    );
    (order, parents)
}

#[test]
fn operator_selection_is_applied_verbatim() {
    for (answer, expected) in [("1\n", "r1aaaaaaaaaa"), ("2\n", "r2bbbbbbbbbb")] {
        let (mut order, parents) = shared_content_order();
        let mut prompt = Prompt::new(Cursor::new(format!("1\n{answer}")), Vec::new());
        let mut chooser = Counting { inner: &mut prompt, offered: Vec::new() };
        resolve_dependencies(&mut order, &parents, &mut chooser).unwrap();

        // r2 itself is registered before its parent lookup, so it sees r1 and r2.
        assert_eq!(chooser.offered, vec![2, 2]);
        assert_eq!(order[1].deps, vec!["r1aaaaaaaaaa"]);
        assert_eq!(order[2].deps, vec![expected]);
        assert!(order[0].deps.is_empty());

        let shown = String::from_utf8(prompt.into_output()).unwrap();
        assert!(shown.contains(" [1] r1aaaaaaaaaa\n [2] r2bbbbbbbbbb\n"));
        assert!(shown.contains("r3cccccccc depends on? "));
    }
}

#[test]
fn unmatched_parent_content_fails() {
    let (mut order, mut parents) = shared_content_order();
    parents.0.insert("r2bbbbbbbbbb".to_string(), vec!["unknown".to_string()]);
    let mut prompt = Prompt::new(Cursor::new(""), Vec::new());
    let err = resolve_dependencies(&mut order, &parents, &mut prompt).unwrap_err();
    assert!(matches!(err, CrunchError::Git(_)));
    assert_eq!(err.info().code, "unresolved-dependency");
}
