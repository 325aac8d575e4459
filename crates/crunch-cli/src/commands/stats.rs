use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use crunch_stats::{aggregate, render_tables, StatsConfig, TableFormat};

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// YAML configuration listing algorithms, datasets and tag.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Result directory, overriding the configuration.
    #[arg(long)]
    pub results: Option<PathBuf>,
    /// Table format: plain, latex or csv.
    #[arg(long, default_value_t = TableFormat::Plain)]
    pub format: TableFormat,
}

pub fn run(args: &StatsArgs) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => StatsConfig::load(path)?,
        None => StatsConfig::default(),
    };
    if let Some(results) = &args.results {
        config.results = results.clone();
    }
    let tables = aggregate(&config)?;
    print!("{}", render_tables(&tables, args.format)?);
    Ok(())
}
