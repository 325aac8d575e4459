//! Job file output and the submission script.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crunch_core::{content_digest, to_pretty_json_bytes, CrunchError, ErrorInfo};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::suites::Entry;
use crate::template::{JobSpec, SlurmTemplate};

/// Record of one job file written by a [`JobWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Job path as referenced by the submission script.
    pub path: String,
    /// SHA-256 of the rendered script.
    pub sha256: String,
    /// Requested wall clock limit.
    pub time: String,
}

/// Persisted summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobManifest {
    /// Stable hash of the configuration the jobs were generated from.
    pub config_hash: String,
    /// Jobs in submission order.
    pub jobs: Vec<ManifestEntry>,
}

/// Writes job files under `root` and appends `sbatch` lines to `submit`.
///
/// The `#!/bin/sh` line is written before the first entry only, so a writer
/// that produced nothing leaves `submit` empty.
#[derive(Debug)]
pub struct JobWriter<W> {
    template: SlurmTemplate,
    root: PathBuf,
    submit: W,
    started: bool,
    manifest: Vec<ManifestEntry>,
}

impl<W: Write> JobWriter<W> {
    /// Writer rendering with `template`; job paths are resolved against `root`.
    pub fn new(template: SlurmTemplate, root: impl Into<PathBuf>, submit: W) -> Self {
        Self {
            template,
            root: root.into(),
            submit,
            started: false,
            manifest: Vec::new(),
        }
    }

    /// Renders `job` to disk, replacing any previous file, and queues it.
    pub fn write_job(&mut self, job: &JobSpec) -> Result<PathBuf, CrunchError> {
        let path = self.root.join(&job.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| CrunchError::io("job-dir", parent, err))?;
        }
        let text = self.template.render(job);
        fs::write(&path, &text).map_err(|err| CrunchError::io("job-write", &path, err))?;
        debug!("wrote {}", path.display());
        self.line(&format!("sbatch {}", job.path))?;
        self.manifest.push(ManifestEntry {
            path: job.path.clone(),
            sha256: content_digest(text.as_bytes()),
            time: job.time.clone(),
        });
        Ok(path)
    }

    /// Appends a plain command to the submission script.
    pub fn command(&mut self, command: &str) -> Result<(), CrunchError> {
        self.line(command)
    }

    /// Dispatches a planned entry.
    pub fn emit(&mut self, entry: &Entry) -> Result<(), CrunchError> {
        match entry {
            Entry::Job(job) => self.write_job(job).map(|_| ()),
            Entry::Command(command) => self.command(command),
        }
    }

    /// Jobs written so far.
    pub fn manifest(&self) -> &[ManifestEntry] {
        &self.manifest
    }

    /// Persists the manifest as pretty JSON, tagged with `config_hash`.
    pub fn write_manifest(&self, path: &Path, config_hash: &str) -> Result<(), CrunchError> {
        let manifest = JobManifest {
            config_hash: config_hash.to_string(),
            jobs: self.manifest.clone(),
        };
        let bytes = to_pretty_json_bytes(&manifest)?;
        fs::write(path, bytes).map_err(|err| CrunchError::io("manifest-write", path, err))
    }

    /// Flushes and returns the submission sink.
    pub fn finish(mut self) -> Result<W, CrunchError> {
        self.submit.flush().map_err(submit_error)?;
        Ok(self.submit)
    }

    fn line(&mut self, text: &str) -> Result<(), CrunchError> {
        if !self.started {
            writeln!(self.submit, "#!/bin/sh").map_err(submit_error)?;
            self.started = true;
        }
        writeln!(self.submit, "{text}").map_err(submit_error)
    }
}

fn submit_error(err: std::io::Error) -> CrunchError {
    CrunchError::Io(ErrorInfo::new("submit-write", err.to_string()))
}
