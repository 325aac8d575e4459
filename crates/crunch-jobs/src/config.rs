//! YAML configuration for job generation.
//!
//! Every section falls back to the constants used for the published
//! experiment runs, so an empty file (or no file) reproduces them.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crunch_core::{from_yaml_slice, stable_hash_string, CrunchError};
use serde::{Deserialize, Serialize};

use crate::template::SlurmTemplate;

/// Datasets an algorithm cannot run on, keyed by algorithm.
pub type Exclusions = BTreeMap<String, BTreeSet<String>>;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn exclusions(entries: &[(&str, &[&str])]) -> Exclusions {
    entries
        .iter()
        .map(|(alg, datasets)| (alg.to_string(), datasets.iter().map(|d| d.to_string()).collect()))
        .collect()
}

/// Top-level job generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobsConfig {
    /// `#SBATCH` header fields and runtime prefix.
    pub template: SlurmTemplate,
    /// Algorithms considered by every suite.
    pub algorithms: Algorithms,
    /// Directory layout on the cluster.
    pub dirs: WorkDirs,
    /// Micro LTR/RTL linear traces.
    pub micro: MicroSuite,
    /// Wikipedia linear traces.
    pub linear: LinearSuite,
    /// Causal trace generation and replay.
    pub causal: CausalSuite,
    /// Git trace generation and replay.
    pub git: GitSuite,
    /// User operation benchmarks.
    pub user_ops: UserOpsSuite,
    /// Wikipedia revision download script.
    pub wiki: WikiSuite,
}

impl JobsConfig {
    /// Loads a YAML configuration; missing sections take their defaults.
    pub fn load(path: &Path) -> Result<Self, CrunchError> {
        let bytes = fs::read(path).map_err(|err| CrunchError::io("config-read", path, err))?;
        from_yaml_slice(&bytes)
    }

    /// Stable hash of the effective configuration.
    pub fn fingerprint(&self) -> Result<String, CrunchError> {
        stable_hash_string(self)
    }

    /// Repeat count for `alg` in the git replay suites.
    pub fn git_repeats(&self, alg: &str) -> u32 {
        self.git.repeat_overrides.get(alg).copied().unwrap_or(self.git.repeats)
    }
}

/// Ordered list of CRDT implementations under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Algorithms(pub Vec<String>);

impl Default for Algorithms {
    fn default() -> Self {
        Self(strings(&[
            "Automerge",
            "Automerge+WASM",
            "Logoot",
            "Woot",
            "RGA",
            "Treedoc",
            "LSEQ",
            "DLS",
            "Yjs",
        ]))
    }
}

/// Where inputs and outputs live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkDirs {
    /// Directory job files are written to, relative to the submission directory.
    pub jobs: String,
    /// Benchmark result directory.
    pub results: String,
    /// Local document cache produced by earlier runs.
    pub tmp: String,
    /// Large shared scratch area holding traces and blobs.
    pub scratch: String,
}

impl Default for WorkDirs {
    fn default() -> Self {
        Self {
            jobs: "jobs".to_string(),
            results: "res2".to_string(),
            tmp: ".tmp".to_string(),
            scratch: "/rds/hpc-work".to_string(),
        }
    }
}

impl WorkDirs {
    /// Scratch subdirectory `name`.
    pub fn scratch_dir(&self, name: &str) -> String {
        format!("{}/{}", self.scratch.trim_end_matches('/'), name)
    }
}

/// Micro benchmark traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroSuite {
    /// Trace names.
    pub datasets: Vec<String>,
    /// Timing repetitions.
    pub repeats: u32,
    /// Memory measurement repetitions.
    pub mem_repeats: u32,
    /// Trace length in thousands of operations.
    pub length: u32,
    /// Wall clock limit.
    pub time: String,
}

impl Default for MicroSuite {
    fn default() -> Self {
        Self {
            datasets: strings(&["microLTR", "microRTL"]),
            repeats: 11,
            mem_repeats: 5,
            length: 10,
            time: "10:00:00".to_string(),
        }
    }
}

/// Wikipedia linear traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSuite {
    /// Trace names (slugified article titles).
    pub datasets: Vec<String>,
    /// Timing repetitions.
    pub repeats: u32,
    /// Wall clock limit.
    pub time: String,
}

impl Default for LinearSuite {
    fn default() -> Self {
        Self {
            datasets: strings(&[
                "George_W._Bush",
                "Wikipedia",
                "List_of_WWE_personnel",
                "United_States",
                "Jesus",
                "List_of_dramatic_television_series_with_LGBT_characters",
                "Spring_Championship_of_Online_Poker",
                "2017_in_home_video",
                "List_of_Nintendo_Switch_games_A-F",
                "2021_Kerala_Legislative_Assembly_election",
            ]),
            repeats: 11,
            time: "10:00:00".to_string(),
        }
    }
}

/// A causal trace and the sessions replayed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalDataset {
    /// Trace file name under `.causal-traces`.
    pub name: String,
    /// Session ids replayed individually.
    pub sessions: Vec<u32>,
}

/// Causal traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CausalSuite {
    /// Traces and their replayed sessions.
    pub datasets: Vec<CausalDataset>,
    /// Timing repetitions of a session replay.
    pub repeats: u32,
    /// Repetitions of the memory replay.
    pub mem_repeats: u32,
    /// Generation wall clock limit.
    pub gen_time: String,
    /// Generation limit for Automerge variants.
    pub automerge_gen_time: String,
    /// Encode/decode job limit.
    pub encdec_time: String,
    /// Per-session replay limit.
    pub replay_time: String,
    /// Combinations skipped by `causal-run`.
    pub exclusions: Exclusions,
    /// Combinations skipped by `causal-gen`.
    pub gen_exclusions: Exclusions,
}

impl Default for CausalSuite {
    fn default() -> Self {
        let dataset = |name: &str, sessions: &[u32]| CausalDataset {
            name: name.to_string(),
            sessions: sessions.to_vec(),
        };
        Self {
            datasets: vec![
                dataset("g1.json", &[1, 2, 3, 4, 5, 6, 9, 11, 12]),
                dataset("g2.json", &[1, 2, 3, 4, 6, 7, 9, 10, 12, 13, 17, 19, 20, 22, 23, 25]),
                dataset("g3.json", &[1, 3, 5, 6, 8, 10]),
                dataset(
                    "doc1.json",
                    &[1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 15, 16, 17, 18, 19, 20, 21, 22],
                ),
                dataset("doc2.json", &[1, 2, 3, 4, 6, 10, 11, 12, 17, 19, 21, 23, 24]),
            ],
            repeats: 11,
            mem_repeats: 5,
            gen_time: "10:00:00".to_string(),
            automerge_gen_time: "8:00:00".to_string(),
            encdec_time: "01:00:00".to_string(),
            replay_time: "05:00:00".to_string(),
            exclusions: exclusions(&[
                ("LSEQ", &["doc1.json", "doc2.json", "g1.json", "g3.json"]),
                ("Woot", &["g2.json", "g3.json", "doc1.json"]),
            ]),
            gen_exclusions: Exclusions::new(),
        }
    }
}

/// A git order file and its sampled sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitDataset {
    /// Order file name in the blob directory.
    pub name: String,
    /// Session ids replayed by the `git-run` replay job.
    pub sessions: Vec<u32>,
}

/// Git traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSuite {
    /// Order files with their sampled sessions.
    pub datasets: Vec<GitDataset>,
    /// Default repetitions.
    pub repeats: u32,
    /// Per-algorithm repetition counts.
    pub repeat_overrides: BTreeMap<String, u32>,
    /// Trace generation limit.
    pub gen_time: String,
    /// Merge benchmark limit.
    pub merge_time: String,
    /// Restore benchmark limit.
    pub restore_time: String,
    /// Session replay limit.
    pub replay_time: String,
    /// Encode/decode limit.
    pub encdec_time: String,
    /// Combinations skipped by `git-run`.
    pub exclusions: Exclusions,
    /// Combinations skipped by `git-gen`.
    pub gen_exclusions: Exclusions,
}

impl Default for GitSuite {
    fn default() -> Self {
        let dataset = |name: &str, sessions: [u32; 10]| GitDataset {
            name: name.to_string(),
            sessions: sessions.to_vec(),
        };
        Self {
            datasets: vec![
                dataset("Documentation-diff-options-txt.ord", [46, 53, 55, 57, 98, 161, 162, 180, 186, 201]),
                dataset("Documentation-git-branch-txt.ord", [10, 16, 28, 45, 49, 62, 64, 72, 106, 109]),
                dataset("Documentation-git-checkout-txt.ord", [2, 7, 17, 19, 28, 33, 35, 65, 104, 115]),
                dataset("Documentation-git-clone-txt.ord", [24, 29, 30, 39, 54, 75, 91, 95, 104, 114]),
                dataset("Documentation-git-commit-txt.ord", [20, 31, 32, 49, 57, 65, 69, 85, 110, 121]),
                dataset("Documentation-git-format-patch-txt.ord", [19, 41, 42, 51, 58, 65, 66, 68, 69, 79]),
                dataset("Documentation-git-p4-txt.ord", [3, 10, 20, 22, 23, 36, 40, 41, 47, 50]),
                dataset("Documentation-git-push-txt.ord", [2, 5, 6, 27, 31, 35, 41, 92, 100, 138]),
                dataset("Documentation-git-read-tree-txt.ord", [4, 11, 15, 31, 34, 39, 40, 46, 56, 60]),
                dataset("Documentation-git-rev-parse-txt.ord", [3, 6, 9, 39, 44, 51, 53, 54, 56, 65]),
                dataset("Documentation-git-send-email-txt.ord", [2, 3, 18, 20, 27, 59, 85, 97, 121, 125]),
                dataset("Documentation-git-submodule-txt.ord", [21, 43, 59, 69, 70, 81, 89, 102, 115, 117]),
            ],
            repeats: 11,
            repeat_overrides: [("Automerge".to_string(), 6), ("Logoot".to_string(), 6)]
                .into_iter()
                .collect(),
            gen_time: "10:00:00".to_string(),
            merge_time: "06:00:00".to_string(),
            restore_time: "10:00:00".to_string(),
            replay_time: "10:00:00".to_string(),
            encdec_time: "01:00:00".to_string(),
            exclusions: exclusions(&[
                ("Automerge", &["Documentation-diff-options-txt.ord"]),
                (
                    "Woot",
                    &["Documentation-git-rev-parse-txt.ord", "Documentation-git-send-email-txt.ord"],
                ),
            ]),
            gen_exclusions: exclusions(&[("Automerge", &["Documentation-diff-options-txt.ord"])]),
        }
    }
}

/// A base document for user operation benchmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOpsDoc {
    /// Short label used in job and result names.
    pub name: String,
    /// Document path; `{alg}` is replaced by the algorithm name.
    pub path: String,
}

/// One kind of user operation benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOpsBench {
    /// Benchmark type understood by the driver.
    pub name: String,
    /// Block benchmarks only run at the block size.
    #[serde(default)]
    pub block: bool,
    /// Constants appended to the benchmark argument.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// User operation benchmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserOpsSuite {
    /// Base documents.
    pub docs: Vec<UserOpsDoc>,
    /// Benchmark kinds, in argument order.
    pub benches: Vec<UserOpsBench>,
    /// Operation counts for non-block benchmarks.
    pub sizes: Vec<u32>,
    /// Operation count for block benchmarks.
    pub block_size: u32,
    /// Values of the named constants (`p_ins`, `M`).
    pub constants: BTreeMap<String, f64>,
    /// Timing repetitions.
    pub repeats: u32,
    /// Value of the driver's `-M` flag.
    pub max_ops: u32,
    /// Wall clock limit.
    pub time: String,
    /// Unsupported combinations, keyed by document label.
    pub exclusions: Exclusions,
}

impl Default for UserOpsSuite {
    fn default() -> Self {
        let doc = |name: &str| UserOpsDoc {
            name: name.to_string(),
            path: format!(".tmp/{{alg}}-{name}.json-causal-doc"),
        };
        let bench = |name: &str, block: bool, vars: &[&str]| UserOpsBench {
            name: name.to_string(),
            block,
            vars: strings(vars),
        };
        Self {
            docs: vec![doc("g1"), doc("g2"), doc("g3"), doc("doc1"), doc("doc2")],
            benches: vec![
                bench("random_grep", false, &["M"]),
                bench("prepend", false, &[]),
                bench("append", false, &[]),
                bench("random_ins", false, &[]),
                bench("random_del", false, &[]),
                bench("random_edits", false, &["p_ins"]),
                bench("n_ins_block", true, &[]),
                bench("n_del_block", true, &[]),
            ],
            sizes: vec![100, 500, 1000, 5000],
            block_size: 5000,
            constants: [("p_ins".to_string(), 0.8), ("M".to_string(), 5.0)]
                .into_iter()
                .collect(),
            repeats: 11,
            max_ops: 10,
            time: "08:00:00".to_string(),
            exclusions: exclusions(&[("LSEQ", &["doc1", "doc2", "g1", "g3"])]),
        }
    }
}

/// Wikipedia download script settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikiSuite {
    /// Article titles, as shown on Wikipedia.
    pub titles: Vec<String>,
    /// Command fetching one article's revisions.
    pub fetch_command: String,
    /// Command converting fetched revisions into a trace.
    pub convert_command: String,
    /// Revision cache directory.
    pub cache_dir: String,
    /// Trace output directory.
    pub traces_dir: String,
    /// Revisions converted per article.
    pub revisions: u32,
}

impl Default for WikiSuite {
    fn default() -> Self {
        Self {
            titles: strings(&[
                "George W. Bush",
                "Wikipedia",
                "List of WWE personnel",
                "United States",
                "Jesus",
                "List of dramatic television series with LGBT characters",
                "Spring Championship of Online Poker",
                "2017 in home video",
                "List of Nintendo Switch games (A\u{2013}F)",
                "2021 Kerala Legislative Assembly election",
            ]),
            fetch_command: "crunch wiki-fetch".to_string(),
            convert_command: "./scripts/revs2trace".to_string(),
            cache_dir: ".wiki-revs".to_string(),
            traces_dir: ".wiki-traces".to_string(),
            revisions: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: JobsConfig = from_yaml_slice(b"{}").unwrap();
        assert_eq!(config, JobsConfig::default());
        assert_eq!(config.algorithms.0.len(), 9);
        assert_eq!(config.git.datasets.len(), 12);
        assert_eq!(config.git_repeats("Automerge"), 6);
        assert_eq!(config.git_repeats("Logoot"), 6);
        assert_eq!(config.git_repeats("RGA"), 11);
        assert!(config.causal.gen_exclusions.is_empty());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = b"algorithms: [Logoot]\ntemplate:\n  account: OTHER\ncausal:\n  repeats: 3\n";
        let config: JobsConfig = from_yaml_slice(yaml).unwrap();
        assert_eq!(config.algorithms.0, vec!["Logoot"]);
        assert_eq!(config.template.account, "OTHER");
        assert_eq!(config.template.partition, "cclake");
        assert_eq!(config.causal.repeats, 3);
        assert_eq!(config.causal.datasets.len(), 5);
        assert!(config.causal.exclusions["LSEQ"].contains("g1.json"));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let base = JobsConfig::default();
        let mut changed = base.clone();
        changed.git.repeats = 3;
        assert_eq!(base.fingerprint().unwrap(), JobsConfig::default().fingerprint().unwrap());
        assert_ne!(base.fingerprint().unwrap(), changed.fingerprint().unwrap());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = JobsConfig::load(Path::new("/nonexistent/jobs.yaml")).unwrap_err();
        assert_eq!(err.info().code, "config-read");
    }

    #[test]
    fn scratch_dirs_join_cleanly() {
        let dirs = WorkDirs {
            scratch: "/scratch/".to_string(),
            ..WorkDirs::default()
        };
        assert_eq!(dirs.scratch_dir("ct"), "/scratch/ct");
    }
}
