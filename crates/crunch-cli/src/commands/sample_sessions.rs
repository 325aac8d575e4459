use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use crunch_trace::{collect_order_files, distinct_sessions, load_order, sample_sessions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

#[derive(Args, Debug)]
pub struct SampleSessionsArgs {
    /// Order files, or directories searched for `.ord` files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Sessions drawn per file.
    #[arg(long, default_value_t = 10)]
    pub count: usize,
    /// Seed shared by all draws.
    #[arg(long, default_value_t = 0xdead_beef)]
    pub seed: u64,
}

pub fn run(args: &SampleSessionsArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    for path in collect_order_files(&args.paths) {
        let order = load_order(&path)?;
        let population = distinct_sessions(&order);
        let picked = sample_sessions(population, args.count, &mut rng);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{}", json!([name, picked]));
    }
    Ok(())
}
