use std::collections::BTreeSet;
use std::path::PathBuf;

use log::warn;
use rand::rngs::StdRng;
use rand::{seq::index, Rng, SeedableRng};
use walkdir::WalkDir;

use crate::revision::Revision;

/// Number of distinct `(author, session)` pairs, i.e. simulated users.
pub fn distinct_sessions(order: &[Revision]) -> usize {
    order
        .iter()
        .map(|revision| (revision.author.as_str(), revision.fid))
        .collect::<BTreeSet<_>>()
        .len()
}

/// Draws up to `count` distinct session numbers from `1..=population`, sorted.
///
/// Short histories yield every session, with a warning.
pub fn sample_sessions(population: usize, count: usize, rng: &mut StdRng) -> Vec<usize> {
    if count > population {
        warn!("only {population} sessions available, {count} requested; taking all of them");
    }
    let mut picked: Vec<usize> = index::sample(rng, population, count.min(population))
        .into_iter()
        .map(|idx| idx + 1)
        .collect();
    picked.sort_unstable();
    picked
}

/// `count` uniformly random u32 values from a seeded generator.
pub fn random_ids(count: usize, seed: u64) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen::<u32>()).collect()
}

/// Expands directories into the `.ord` files they contain; files are kept as given.
pub fn collect_order_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .map(|entry| entry.into_path())
                .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("ord"))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}
