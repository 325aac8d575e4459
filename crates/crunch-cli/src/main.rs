use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    gen_ids::{self, GenIdsArgs},
    git_extract::{self, GitExtractArgs},
    jobs::{self, JobsArgs},
    sample_sessions::{self, SampleSessionsArgs},
    stats::{self, StatsArgs},
    wiki_fetch::{self, WikiFetchArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "crunch", about = "CRDT benchmark trace and job tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the revision order of one file from a git repository.
    GitExtract(GitExtractArgs),
    /// Download the revision history of a Wikipedia article.
    WikiFetch(WikiFetchArgs),
    /// Write SLURM job files and print the submission script.
    Jobs(JobsArgs),
    /// Summarise benchmark timings into per-dataset tables.
    Stats(StatsArgs),
    /// Pick random sessions from extracted order files.
    SampleSessions(SampleSessionsArgs),
    /// Print seeded random replica ids.
    GenIds(GenIdsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::GitExtract(args) => git_extract::run(&args),
        Command::WikiFetch(args) => wiki_fetch::run(&args),
        Command::Jobs(args) => jobs::run(&args),
        Command::Stats(args) => stats::run(&args),
        Command::SampleSessions(args) => sample_sessions::run(&args),
        Command::GenIds(args) => gen_ids::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crunch_jobs::Suite;
    use crunch_stats::TableFormat;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn jobs_accepts_repeated_filters() {
        let cli = Cli::try_parse_from([
            "crunch", "jobs", "git-run", "causal-run", "--alg", "RGA", "--alg", "Yjs", "--dataset", "g1.json",
        ])
        .unwrap();
        let Command::Jobs(args) = cli.command else {
            panic!("expected jobs");
        };
        assert_eq!(args.suites, vec![Suite::GitRun, Suite::CausalRun]);
        assert_eq!(args.alg, vec!["RGA", "Yjs"]);
        assert_eq!(args.dataset, vec!["g1.json"]);
    }

    #[test]
    fn unknown_suite_is_rejected() {
        assert!(Cli::try_parse_from(["crunch", "jobs", "nope"]).is_err());
    }

    #[test]
    fn stats_format_defaults_to_plain() {
        let cli = Cli::try_parse_from(["crunch", "stats"]).unwrap();
        let Command::Stats(args) = cli.command else {
            panic!("expected stats");
        };
        assert_eq!(args.format, TableFormat::Plain);
        assert!(args.config.is_none());
    }
}
