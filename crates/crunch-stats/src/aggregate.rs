use std::fs;
use std::path::{Path, PathBuf};

use crunch_core::{from_yaml_slice, CrunchError};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::summary::Summary;
use crate::table::{Row, Table};
use crate::timing::{load_times, result_path, Side};

/// Which result files to summarise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Row order of every table.
    pub algorithms: Vec<String>,
    /// One table per dataset.
    pub datasets: Vec<String>,
    /// Run tag embedded in result file names (trace length).
    pub tag: String,
    /// Directory holding the result files.
    pub results: PathBuf,
}

impl Default for StatsConfig {
    fn default() -> Self {
        let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            algorithms: strings(&[
                "Automerge+WASM",
                "Automerge",
                "Yjs",
                "RGA",
                "Logoot",
                "LSEQ",
                "Treedoc",
                "Woot",
                "DLS",
            ]),
            datasets: strings(&[
                "ap",
                "george-bush.json",
                "jesus.json",
                "wikipedia.json",
                "united-states.json",
            ]),
            tag: "25k".to_string(),
            results: PathBuf::from("res"),
        }
    }
}

impl StatsConfig {
    /// Loads a YAML configuration; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, CrunchError> {
        let bytes = fs::read(path).map_err(|err| CrunchError::io("config-read", path, err))?;
        from_yaml_slice(&bytes)
    }
}

fn summarise(config: &StatsConfig, alg: &str, dataset: &str, side: Side) -> Result<Summary, CrunchError> {
    let path = result_path(&config.results, alg, dataset, &config.tag, side);
    debug!("reading {}", path.display());
    let times = load_times(&path)?;
    Summary::from_times(&times).map_err(|err| err.at_path(&path))
}

/// Builds one table per configured dataset. Any missing or short result aborts.
pub fn aggregate(config: &StatsConfig) -> Result<Vec<Table>, CrunchError> {
    let mut tables = Vec::with_capacity(config.datasets.len());
    for dataset in &config.datasets {
        let mut rows = Vec::with_capacity(config.algorithms.len());
        for alg in &config.algorithms {
            rows.push(Row {
                name: alg.clone(),
                local: summarise(config, alg, dataset, Side::Local)?,
                remote: summarise(config, alg, dataset, Side::Remote)?,
            });
        }
        info!("{}: {} algorithms summarised", dataset, rows.len());
        tables.push(Table {
            dataset: dataset.clone(),
            rows,
        });
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_published_tables() {
        let config: StatsConfig = from_yaml_slice(b"tag: 10k\n").unwrap();
        assert_eq!(config.tag, "10k");
        assert_eq!(config.algorithms.len(), 9);
        assert_eq!(config.algorithms[0], "Automerge+WASM");
        assert_eq!(config.datasets[0], "ap");
        assert_eq!(config.results, PathBuf::from("res"));
    }
}
