//! Error type shared by the crunch crates.
//!
//! Every failure is a [`CrunchError`] family wrapping an [`ErrorInfo`]. The
//! code is what callers and tests match on; the message is free text.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and key/value context of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier such as `insufficient-samples`.
    pub code: String,
    /// Free text.
    pub message: String,
    /// Commit ids, result paths, suite names.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What the operator can try next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key=value`; a repeated key keeps the latest value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets the hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// `message (code: c) | context: [k=v, ...] | hint: h`
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " | context: [{}]", pairs.join(", "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, " | hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Failure families of the crunch tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum CrunchError {
    /// Missing result files, unwritable job or blob directories.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Malformed JSON/YAML: order files, configs, API responses.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Repository lookups and unresolvable parent blobs.
    #[error("git error: {0}")]
    Git(ErrorInfo),
    /// Wikipedia API requests.
    #[error("http error: {0}")]
    Http(ErrorInfo),
    /// Bad command line arguments or operator answers.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Summaries over too few timing samples.
    #[error("stats error: {0}")]
    Stats(ErrorInfo),
}

impl CrunchError {
    /// Payload of any family.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            Self::Io(info)
            | Self::Serde(info)
            | Self::Git(info)
            | Self::Http(info)
            | Self::Input(info)
            | Self::Stats(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            Self::Io(info)
            | Self::Serde(info)
            | Self::Git(info)
            | Self::Http(info)
            | Self::Input(info)
            | Self::Stats(info) => info,
        }
    }

    /// Filesystem failure on `path`.
    pub fn io(code: &str, path: &Path, err: impl ToString) -> Self {
        Self::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
    }

    /// Same family and code, with `path` added to the context.
    pub fn at_path(mut self, path: &Path) -> Self {
        self.info_mut()
            .context
            .insert("path".to_string(), path.display().to_string());
        self
    }
}
