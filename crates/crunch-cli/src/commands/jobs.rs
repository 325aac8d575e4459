use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use crunch_jobs::{plan, JobWriter, JobsConfig, Selection, Suite};
use log::info;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Suites to generate, in order.
    #[arg(required = true, value_name = "SUITE")]
    pub suites: Vec<Suite>,
    /// YAML configuration; built-in defaults when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Only generate jobs for these algorithms.
    #[arg(long)]
    pub alg: Vec<String>,
    /// Only generate jobs for these datasets.
    #[arg(long)]
    pub dataset: Vec<String>,
    /// Write the submission script here instead of stdout.
    #[arg(long)]
    pub submit_script: Option<PathBuf>,
    /// Directory job paths are relative to.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Also write a JSON manifest of the generated jobs.
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

pub fn run(args: &JobsArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => JobsConfig::load(path)?,
        None => JobsConfig::default(),
    };
    let selection = Selection {
        algorithms: args.alg.clone(),
        datasets: args.dataset.clone(),
    };
    let submit: Box<dyn Write> = match &args.submit_script {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = JobWriter::new(config.template.clone(), &args.root, submit);
    for suite in &args.suites {
        for entry in plan(*suite, &config, &selection) {
            writer.emit(&entry)?;
        }
    }
    if let Some(path) = &args.manifest {
        writer.write_manifest(path, &config.fingerprint()?)?;
        info!("{} jobs recorded in {}", writer.manifest().len(), path.display());
    }
    writer.finish()?;
    Ok(())
}
