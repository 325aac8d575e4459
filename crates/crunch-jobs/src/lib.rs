#![doc = "Batch job generation for the crunch benchmark suites."]

pub mod config;
pub mod suites;
pub mod template;
pub mod writer;

pub use config::{
    Algorithms, CausalDataset, CausalSuite, Exclusions, GitDataset, GitSuite, JobsConfig, LinearSuite,
    MicroSuite, UserOpsBench, UserOpsDoc, UserOpsSuite, WikiSuite, WorkDirs,
};
pub use suites::{expand_grid, plan, Entry, GridAxis, Selection, Suite};
pub use template::{JobSpec, SlurmTemplate, Step, DEFAULT_CPUS, DEFAULT_TIME};
pub use writer::{JobManifest, JobWriter, ManifestEntry};
