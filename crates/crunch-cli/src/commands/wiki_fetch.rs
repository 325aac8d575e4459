use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use crunch_trace::{fetch_revisions, FetchOptions, UreqSource, WikiCache, WIKIPEDIA_API};

#[derive(Args, Debug)]
pub struct WikiFetchArgs {
    /// Article title as shown on Wikipedia.
    pub title: String,
    /// Revision cache directory.
    #[arg(long, default_value = ".wiki-revs")]
    pub cache: PathBuf,
    /// Stop once this many revisions are cached.
    #[arg(long, default_value_t = 500)]
    pub target: usize,
    /// Pause between API requests, in milliseconds.
    #[arg(long = "delay-ms", default_value_t = 1000)]
    pub delay_ms: u64,
    /// MediaWiki API endpoint.
    #[arg(long, default_value = WIKIPEDIA_API)]
    pub endpoint: String,
}

pub fn run(args: &WikiFetchArgs) -> Result<(), Box<dyn Error>> {
    let mut source = UreqSource::new(args.endpoint.clone());
    let cache = WikiCache::new(&args.cache);
    let options = FetchOptions {
        target: args.target,
        delay: Duration::from_millis(args.delay_ms),
    };
    let summary = fetch_revisions(&mut source, &cache, &args.title, &options)?;
    println!(
        "{}: {} revisions ({} new, {} requests)",
        cache.ids_path(&args.title).display(),
        summary.total,
        summary.added,
        summary.requests
    );
    Ok(())
}
