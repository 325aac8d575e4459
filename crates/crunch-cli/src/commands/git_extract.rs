use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use crunch_trace::{extract_order, BlobStore, ExtractOutcome, GitHistory, Prompt};

#[derive(Args, Debug)]
pub struct GitExtractArgs {
    /// File to follow, relative to the repository root.
    pub path: PathBuf,
    /// Repository to read history from.
    #[arg(long, default_value = ".")]
    pub repo: PathBuf,
    /// Directory receiving compressed blobs and the order file.
    #[arg(long, default_value = "git-blobs")]
    pub blobs: PathBuf,
}

pub fn run(args: &GitExtractArgs) -> Result<(), Box<dyn Error>> {
    let history = GitHistory::open(&args.repo, &args.path)?;
    let store = BlobStore::new(&args.blobs);
    let mut prompt = Prompt::stdio();
    match extract_order(&history, &store, &mut prompt)? {
        ExtractOutcome::Written {
            path,
            revisions,
            sessions,
        } => println!("{} ({revisions} revisions, {sessions} sessions)", path.display()),
        ExtractOutcome::Aborted { path } => println!("kept {}", path.display()),
    }
    Ok(())
}
