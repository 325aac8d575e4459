use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crunch_core::{from_json_slice, CrunchError};
use serde::Deserialize;

/// Which replica a timing series was measured on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Operations generated by the measured replica.
    Local,
    /// Operations received from other replicas.
    Remote,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Local => "local",
            Side::Remote => "remote",
        })
    }
}

#[derive(Debug, Deserialize)]
struct TimingFile {
    times: Vec<f64>,
}

/// `<results>/<alg>-<dataset>-<tag>-<side>`
pub fn result_path(results: &Path, alg: &str, dataset: &str, tag: &str, side: Side) -> PathBuf {
    results.join(format!("{alg}-{dataset}-{tag}-{side}"))
}

/// Reads the `times` array of a benchmark result file.
pub fn load_times(path: &Path) -> Result<Vec<f64>, CrunchError> {
    let bytes = fs::read(path).map_err(|err| CrunchError::io("results-read", path, err))?;
    let file: TimingFile = from_json_slice(&bytes).map_err(|err| err.at_path(path))?;
    Ok(file.times)
}
