//! SLURM batch script rendering.

use serde::{Deserialize, Serialize};

/// CPUs requested when a job does not ask for more.
pub const DEFAULT_CPUS: u32 = 4;
/// Wall clock limit used when a job does not set one.
pub const DEFAULT_TIME: &str = "4:00:00";

/// Cluster-wide `#SBATCH` settings shared by every generated job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlurmTemplate {
    /// Accounting project charged for the jobs.
    pub account: String,
    /// Value of `-J`.
    pub job_name: String,
    /// Partition to queue on.
    pub partition: String,
    /// Node count.
    pub nodes: u32,
    /// Task count.
    pub ntasks: u32,
    /// Command prefixed to every benchmark step.
    pub runtime: String,
}

impl Default for SlurmTemplate {
    fn default() -> Self {
        Self {
            account: "BERESFORD-SL3-CPU".to_string(),
            job_name: "eeojun".to_string(),
            partition: "cclake".to_string(),
            nodes: 1,
            ntasks: 1,
            runtime: "~/.nvm/versions/node/v15.0.1/bin/node --expose-gc".to_string(),
        }
    }
}

/// One command line of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "command", rename_all = "lowercase")]
pub enum Step {
    /// Benchmark script run through the configured runtime.
    Bench(String),
    /// Shell command emitted verbatim.
    Literal(String),
}

impl Step {
    /// Benchmark step.
    pub fn bench(command: impl Into<String>) -> Self {
        Step::Bench(command.into())
    }

    /// Verbatim shell step.
    pub fn literal(command: impl Into<String>) -> Self {
        Step::Literal(command.into())
    }
}

/// A batch job: where it is written and what it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Job file path, relative to the submission directory.
    pub path: String,
    /// Commands chained with `&&`.
    pub steps: Vec<Step>,
    /// `--cpus-per-task`.
    pub cpus: u32,
    /// `--time`.
    pub time: String,
}

impl JobSpec {
    /// Job with the default CPU count.
    pub fn new(path: impl Into<String>, steps: Vec<Step>, time: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            steps,
            cpus: DEFAULT_CPUS,
            time: time.into(),
        }
    }
}

impl SlurmTemplate {
    /// Renders the batch script for `job`.
    pub fn render(&self, job: &JobSpec) -> String {
        let body = job
            .steps
            .iter()
            .map(|step| match step {
                Step::Bench(command) => format!("{} {}", self.runtime, command),
                Step::Literal(command) => command.clone(),
            })
            .collect::<Vec<_>>()
            .join(" && \\\n");
        format!(
            "#!/bin/bash\n\
             #SBATCH --account {account}\n\
             #SBATCH -J {name}\n\
             #SBATCH --partition {partition}\n\
             #SBATCH --nodes {nodes}\n\
             #SBATCH --ntasks={ntasks}\n\
             #SBATCH --cpus-per-task={cpus}\n\
             #SBATCH --time={time}\n\
             {body}\n",
            account = self.account,
            name = self.job_name,
            partition = self.partition,
            nodes = self.nodes,
            ntasks = self.ntasks,
            cpus = job.cpus,
            time = job.time,
        )
    }
}
