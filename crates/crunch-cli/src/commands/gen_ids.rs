use std::error::Error;

use clap::Args;
use crunch_trace::random_ids;

#[derive(Args, Debug)]
pub struct GenIdsArgs {
    /// Number of ids.
    #[arg(long, default_value_t = 500)]
    pub count: usize,
    /// Generator seed.
    #[arg(long, default_value_t = 0x68_656c_6c6f)]
    pub seed: u64,
}

pub fn run(args: &GenIdsArgs) -> Result<(), Box<dyn Error>> {
    let ids = random_ids(args.count, args.seed);
    println!("{}", serde_json::to_string(&ids)?);
    Ok(())
}
