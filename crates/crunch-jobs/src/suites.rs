//! Benchmark suites expanded into batch jobs.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crunch_core::{slugify_filename, CrunchError, ErrorInfo};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Exclusions, JobsConfig};
use crate::template::{JobSpec, Step};

const ALG: &str = "alg";
const DATA: &str = "data";

/// A suite of related benchmark jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Suite {
    /// Micro LTR/RTL linear traces.
    Micro,
    /// Wikipedia linear traces.
    Linear,
    /// Causal trace generation.
    CausalGen,
    /// Causal trace encode/decode and session replay.
    CausalRun,
    /// Git trace generation and merge extraction.
    GitGen,
    /// Git merge, restore, replay and encode/decode.
    GitRun,
    /// Local and remote user operation benchmarks.
    UserOps,
    /// Wikipedia download and conversion script.
    WikiFetch,
}

impl Suite {
    /// Every suite, in generation order.
    pub const ALL: [Suite; 8] = [
        Suite::Micro,
        Suite::Linear,
        Suite::CausalGen,
        Suite::CausalRun,
        Suite::GitGen,
        Suite::GitRun,
        Suite::UserOps,
        Suite::WikiFetch,
    ];

    /// Command line name.
    pub fn name(self) -> &'static str {
        match self {
            Suite::Micro => "micro",
            Suite::Linear => "linear",
            Suite::CausalGen => "causal-gen",
            Suite::CausalRun => "causal-run",
            Suite::GitGen => "git-gen",
            Suite::GitRun => "git-run",
            Suite::UserOps => "user-ops",
            Suite::WikiFetch => "wiki-fetch",
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = CrunchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Suite::ALL
            .into_iter()
            .find(|suite| suite.name() == value)
            .ok_or_else(|| {
                let known: Vec<&str> = Suite::ALL.iter().map(|suite| suite.name()).collect();
                CrunchError::Input(
                    ErrorInfo::new("unknown-suite", format!("no suite named '{value}'"))
                        .with_hint(format!("expected one of: {}", known.join(", "))),
                )
            })
    }
}

/// Output of a suite: a batch job, or a plain line of the submission script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// SLURM job file submitted with `sbatch`.
    Job(JobSpec),
    /// Command run directly by the submission script.
    Command(String),
}

/// Narrows the configured algorithms and datasets; empty lists keep everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Algorithms to keep.
    pub algorithms: Vec<String>,
    /// Dataset names to keep.
    pub datasets: Vec<String>,
}

impl Selection {
    fn algorithms(&self, config: &JobsConfig) -> Vec<String> {
        config
            .algorithms
            .0
            .iter()
            .filter(|alg| self.algorithms.is_empty() || self.algorithms.contains(alg))
            .cloned()
            .collect()
    }

    fn datasets<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| self.datasets.is_empty() || self.datasets.contains(name))
            .cloned()
            .collect()
    }
}

/// Named list of values in a job grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAxis {
    /// Key under which the value appears in each combination.
    pub name: String,
    /// Values in iteration order.
    pub values: Vec<String>,
}

impl GridAxis {
    /// Axis `name` over `values`.
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Cartesian product of `axes`; the first axis varies slowest.
pub fn expand_grid(axes: &[GridAxis]) -> Vec<BTreeMap<String, String>> {
    let mut outputs = Vec::new();
    expand(axes, 0, BTreeMap::new(), &mut outputs);
    outputs
}

fn expand(
    axes: &[GridAxis],
    idx: usize,
    current: BTreeMap<String, String>,
    outputs: &mut Vec<BTreeMap<String, String>>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    let axis = &axes[idx];
    for value in &axis.values {
        let mut next = current.clone();
        next.insert(axis.name.clone(), value.clone());
        expand(axes, idx + 1, next, outputs);
    }
}

/// `(dataset, algorithm)` pairs, dataset-major, with exclusions removed.
fn pairs(datasets: Vec<String>, algorithms: Vec<String>, exclusions: &Exclusions) -> Vec<(String, String)> {
    expand_grid(&[GridAxis::new(DATA, datasets), GridAxis::new(ALG, algorithms)])
        .into_iter()
        .filter_map(|mut combo| {
            let data = combo.remove(DATA)?;
            let alg = combo.remove(ALG)?;
            if exclusions.get(&alg).is_some_and(|skip| skip.contains(&data)) {
                warn!("skipping {alg} on {data}: excluded");
                return None;
            }
            Some((data, alg))
        })
        .collect()
}

/// Expands `suite` into the entries of its submission script.
pub fn plan(suite: Suite, config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let entries = match suite {
        Suite::Micro => micro(config, selection),
        Suite::Linear => linear(config, selection),
        Suite::CausalGen => causal_gen(config, selection),
        Suite::CausalRun => causal_run(config, selection),
        Suite::GitGen => git_gen(config, selection),
        Suite::GitRun => git_run(config, selection),
        Suite::UserOps => user_ops(config, selection),
        Suite::WikiFetch => wiki_fetch(config, selection),
    };
    info!("{suite}: {} entries", entries.len());
    entries
}

fn job(config: &JobsConfig, name: String, steps: Vec<Step>, time: &str) -> Entry {
    Entry::Job(JobSpec::new(
        format!("{}/{}", config.dirs.jobs, name),
        steps,
        time,
    ))
}

fn micro(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.micro;
    let res = &config.dirs.results;
    let tmp = &config.dirs.tmp;
    let len = suite.length;
    let n = suite.repeats;
    pairs(
        selection.datasets(&suite.datasets),
        selection.algorithms(config),
        &Exclusions::new(),
    )
    .into_iter()
    .map(|(data, alg)| {
        let steps = vec![
            Step::bench(format!(
                "bench/linear.js -l {len} -c {alg} -d {data} -n {n} -m {} > {res}/{alg}-{data}-{len}",
                suite.mem_repeats
            )),
            Step::bench(format!(
                "bench/automerge-perf-sizes.js {tmp}/{alg}-linear-{data}-{len}k-doc {alg} {n} > {res}/{alg}-{data}-{len}k-encdec"
            )),
        ];
        job(config, format!("linear-{alg}-{data}"), steps, &suite.time)
    })
    .collect()
}

fn linear(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.linear;
    let res = &config.dirs.results;
    let tmp = &config.dirs.tmp;
    let n = suite.repeats;
    pairs(
        selection.datasets(&suite.datasets),
        selection.algorithms(config),
        &Exclusions::new(),
    )
    .into_iter()
    .map(|(data, alg)| {
        let steps = vec![
            Step::bench(format!("bench/linear-time.js -c {alg} -d {data} -n {n} > {res}/{alg}-{data}")),
            Step::bench(format!(
                "bench/automerge-perf-sizes.js {tmp}/{alg}-linear-time-{data}-doc {alg} {n} > {res}/{alg}-{data}-encdec"
            )),
        ];
        job(config, format!("linear-{alg}-{data}"), steps, &suite.time)
    })
    .collect()
}

fn causal_gen(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.causal;
    let ct = config.dirs.scratch_dir("ct");
    let names = suite.datasets.iter().map(|dataset| &dataset.name);
    pairs(
        selection.datasets(names),
        selection.algorithms(config),
        &suite.gen_exclusions,
    )
    .into_iter()
    .map(|(data, alg)| {
        let time = if alg.starts_with("Automerge") {
            &suite.automerge_gen_time
        } else {
            &suite.gen_time
        };
        let steps = vec![
            Step::literal(format!("export CRUNCH_WD='{ct}/{alg}-{data}'")),
            Step::literal(format!("mkdir -p '{ct}/{alg}-{data}'")),
            Step::bench(format!("bench/causal-traces.js -c '{alg}' -d '.causal-traces/{data}'")),
        ];
        job(config, format!("ct-{alg}-{data}-gen"), steps, time)
    })
    .collect()
}

fn causal_run(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.causal;
    let ct = config.dirs.scratch_dir("ct");
    let res = &config.dirs.results;
    let tmp = &config.dirs.tmp;
    let sessions: BTreeMap<&String, &Vec<u32>> = suite
        .datasets
        .iter()
        .map(|dataset| (&dataset.name, &dataset.sessions))
        .collect();
    let names = suite.datasets.iter().map(|dataset| &dataset.name);
    let mut entries = Vec::new();
    for (data, alg) in pairs(
        selection.datasets(names),
        selection.algorithms(config),
        &suite.exclusions,
    ) {
        entries.push(job(
            config,
            format!("ct-{alg}-{data}-run"),
            vec![Step::bench(format!(
                "bench/automerge-perf-sizes.js \"{tmp}/{alg}-{data}-causal-doc\" {alg} > {res}/{alg}-{data}-encdec"
            ))],
            &suite.encdec_time,
        ));
        let trace_dir = format!("{ct}/{alg}-{data}");
        for id in sessions.get(&data).copied().into_iter().flatten() {
            let replay = format!("bench/replay-causal-traces.js -c '{alg}' -f '{trace_dir}/{alg}-{data}-{id}' -i {id}");
            let steps = vec![
                Step::bench(format!("{replay} -n {} > {res}/{alg}-{data}-{id}", suite.repeats)),
                Step::bench(format!(
                    "{replay} -n {} --run_gc > {res}/{alg}-{data}-{id}-mem",
                    suite.mem_repeats
                )),
            ];
            entries.push(job(
                config,
                format!("ct-{alg}-{data}-{id}-run"),
                steps,
                &suite.replay_time,
            ));
        }
    }
    entries
}

/// Environment shared by every git job of one `(alg, data)` pair.
fn git_env(workdir: &str) -> Vec<Step> {
    vec![
        Step::literal(format!("export CRUNCH_WD='{workdir}/logs'")),
        Step::literal("export CRUNCH_IS_GIT=1"),
    ]
}

/// Automerge and Yjs keep their own log format; the others share the oplog.
fn keeps_native_log(alg: &str) -> bool {
    alg == "Automerge" || alg == "Yjs"
}

fn git_gen(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.git;
    let git = config.dirs.scratch_dir("git");
    let blobs = config.dirs.scratch_dir("git-blobs");
    let names = suite.datasets.iter().map(|dataset| &dataset.name);
    pairs(
        selection.datasets(names),
        selection.algorithms(config),
        &suite.gen_exclusions,
    )
    .into_iter()
    .map(|(data, alg)| {
        let workdir = format!("{git}/{alg}-{data}");
        let generator = match alg.as_str() {
            "Yjs" => "bench/git-yjs.js".to_string(),
            "Automerge" => "bench/git-automerge.js -c Automerge".to_string(),
            other => format!("bench/git.js -c {other}"),
        };
        let log_path = if keeps_native_log(&alg) {
            format!("{workdir}/docs/{alg}-{data}-1")
        } else {
            format!("{workdir}/docs/{alg}-{data}-git-oplog")
        };
        let mut steps = git_env(&workdir);
        steps.extend([
            Step::literal(format!("mkdir -p '{workdir}/logs'")),
            Step::literal(format!("mkdir -p '{workdir}/docs'")),
            Step::literal(format!("mkdir -p '{workdir}/merges'")),
            Step::bench(format!("{generator} -f '{data}' -b '{blobs}' -w '{workdir}/docs'")),
            Step::bench(format!(
                "bench/git-merge.js -s '{workdir}/docs/{alg}-{data}-git-snapshots' -o '{blobs}/{data}' -c '{alg}' -f '{log_path}' -O '{workdir}/merges/' > {workdir}/merges.json"
            )),
        ]);
        job(config, format!("git-{alg}-{data}-gen"), steps, &suite.gen_time)
    })
    .collect()
}

fn git_run(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.git;
    let git = config.dirs.scratch_dir("git");
    let blobs = config.dirs.scratch_dir("git-blobs");
    let res = &config.dirs.results;
    let sessions: BTreeMap<&String, &Vec<u32>> = suite
        .datasets
        .iter()
        .map(|dataset| (&dataset.name, &dataset.sessions))
        .collect();
    let names = suite.datasets.iter().map(|dataset| &dataset.name);
    let mut entries = Vec::new();
    for (data, alg) in pairs(
        selection.datasets(names),
        selection.algorithms(config),
        &suite.exclusions,
    ) {
        let workdir = format!("{git}/{alg}-{data}");
        let n = config.git_repeats(&alg);
        let with_env = |extra: Vec<Step>| {
            let mut steps = git_env(&workdir);
            steps.extend(extra);
            steps
        };

        let merge = with_env(vec![Step::bench(format!(
            "bench/git-merge-run.js -c {alg} -i {workdir}/merges.json -p {workdir}/docs/{alg}-{data} -O {workdir}/merges -n {n} > {res}/{alg}-{data}-merges"
        ))]);
        let logfile = if keeps_native_log(&alg) { "1" } else { "git-oplog" };
        let restore = with_env(vec![Step::bench(format!(
            "bench/git-restore.js -c {alg} -s {workdir}/docs/{alg}-{data}-git-snapshots -f {workdir}/docs/{alg}-{data}-{logfile} -n {n} -o {blobs}/{data} > {res}/{alg}-{data}-restore"
        ))]);
        let replayer = match alg.as_str() {
            "Yjs" => "bench/replay-yjs.js".to_string(),
            "Automerge" => "bench/replay-automerge.js".to_string(),
            other => format!("bench/replay-git.js -c {other}"),
        };
        let replay = with_env(
            sessions
                .get(&data)
                .copied()
                .into_iter()
                .flatten()
                .map(|id| {
                    Step::bench(format!(
                        "{replayer} -f {workdir}/logs/{alg}-{data}-{id} -i {id} -n {n} > {res}/{alg}-{data}-replay-{id}"
                    ))
                })
                .collect(),
        );
        let encdec = with_env(vec![Step::bench(format!(
            "bench/git-doc-state-mem.js {workdir}/docs/ {alg} {n} > {res}/{alg}-{data}-encdec"
        ))]);

        entries.push(job(config, format!("git-{alg}-{data}-merge"), merge, &suite.merge_time));
        entries.push(job(config, format!("git-{alg}-{data}-restore"), restore, &suite.restore_time));
        entries.push(job(config, format!("git-{alg}-{data}-replay"), replay, &suite.replay_time));
        entries.push(job(config, format!("git-{alg}-{data}-encdec"), encdec, &suite.encdec_time));
    }
    entries
}

/// Benchmark arguments (`kind:N=..,var=..`), deduplicated in order.
fn user_ops_specs(config: &JobsConfig) -> Vec<String> {
    let suite = &config.user_ops;
    let mut specs: Vec<String> = Vec::new();
    for bench in &suite.benches {
        let sizes = if bench.block {
            vec![suite.block_size]
        } else {
            suite.sizes.clone()
        };
        for size in sizes {
            let mut options = vec![format!("N={size}")];
            for var in &bench.vars {
                if let Some(value) = suite.constants.get(var) {
                    options.push(format!("{var}={value}"));
                }
            }
            let spec = format!("{}:{}", bench.name, options.join(","));
            if !specs.contains(&spec) {
                specs.push(spec);
            }
        }
    }
    specs
}

fn user_ops(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.user_ops;
    let res = &config.dirs.results;
    let uo = config.dirs.scratch_dir("uo");
    let specs = user_ops_specs(config).join(" ");
    let paths: BTreeMap<&String, &String> = suite.docs.iter().map(|doc| (&doc.name, &doc.path)).collect();
    let names = suite.docs.iter().map(|doc| &doc.name);
    let mut entries = Vec::new();
    for (doc, alg) in pairs(
        selection.datasets(names),
        selection.algorithms(config),
        &suite.exclusions,
    ) {
        let Some(template) = paths.get(&doc) else {
            continue;
        };
        let doc_path = template.replace("{alg}", &alg);
        let remote_dir = format!("{uo}/{alg}-uo-r1-{doc}");
        let (n, max_ops) = (suite.repeats, suite.max_ops);

        let local = vec![Step::bench(format!(
            "bench/user-ops/local.js -M {max_ops} -n {n} -c {alg} -p '{doc_path}' {specs} > {res}/{alg}-uo-{doc}"
        ))];
        let remote = vec![
            Step::literal(format!("mkdir -p '{remote_dir}'")),
            Step::literal(format!("export CRUNCH_WD='{remote_dir}'")),
            Step::bench(format!(
                "bench/user-ops/remote.js --gen_logs -M {max_ops} -c {alg} -p '{doc_path}' {specs} > {remote_dir}/traces"
            )),
            Step::bench(format!(
                "bench/user-ops/remote.js -n {n} -c {alg} -p '{doc_path}' -f '{remote_dir}/traces' > {res}/{alg}-uo-r1-{doc}"
            )),
        ];
        entries.push(job(config, format!("uo-loc-{alg}-{doc}"), local, &suite.time));
        entries.push(job(config, format!("uo-r1-{alg}-{doc}"), remote, &suite.time));
    }
    entries
}

fn wiki_fetch(config: &JobsConfig, selection: &Selection) -> Vec<Entry> {
    let suite = &config.wiki;
    let titles: Vec<&String> = suite
        .titles
        .iter()
        .filter(|title| {
            selection.datasets.is_empty()
                || selection.datasets.contains(title)
                || selection.datasets.contains(&slugify_filename(title))
        })
        .collect();
    let fetches = titles.iter().map(|title| {
        Entry::Command(format!(
            "{} \"{title}\" --cache '{}'",
            suite.fetch_command, suite.cache_dir
        ))
    });
    let conversions = titles.iter().map(|title| {
        let slug = slugify_filename(title);
        Entry::Command(format!(
            "{} '{}/{slug}_ids' '{}' '{}/{slug}'",
            suite.convert_command, suite.cache_dir, suite.revisions, suite.traces_dir
        ))
    });
    fetches.chain(conversions).collect()
}
