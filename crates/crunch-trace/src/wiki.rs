use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crunch_core::{from_json_slice, slugify_filename, CrunchError, ErrorInfo};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

/// MediaWiki endpoint of the English Wikipedia.
pub const WIKIPEDIA_API: &str = "https://en.wikipedia.org/w/api.php";

const PAGE_LIMIT: &str = "20";

fn http_error(code: &str, err: impl ToString) -> CrunchError {
    CrunchError::Http(ErrorInfo::new(code, err.to_string()))
}

/// One page of revision query results.
pub trait RevisionSource {
    /// Fetches the next batch of revisions for `title`, oldest first.
    ///
    /// `cont` is the continuation token of the previous batch; on the first
    /// request `start` (a revision id) may be used to skip older revisions.
    fn fetch_page(
        &mut self,
        title: &str,
        start: Option<u64>,
        cont: Option<&str>,
    ) -> Result<Value, CrunchError>;
}

/// Blocking MediaWiki client.
#[derive(Clone)]
pub struct UreqSource {
    agent: ureq::Agent,
    endpoint: String,
}

impl UreqSource {
    /// Client against the given API endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint: endpoint.into(),
        }
    }
}

impl Default for UreqSource {
    fn default() -> Self {
        Self::new(WIKIPEDIA_API)
    }
}

impl RevisionSource for UreqSource {
    fn fetch_page(
        &mut self,
        title: &str,
        start: Option<u64>,
        cont: Option<&str>,
    ) -> Result<Value, CrunchError> {
        let mut request = self
            .agent
            .get(&self.endpoint)
            .query("action", "query")
            .query("prop", "revisions")
            .query("titles", title)
            .query("rvprop", "ids|timestamp|content")
            .query("rvslots", "main")
            .query("rvdir", "newer")
            .query("rvlimit", PAGE_LIMIT)
            .query("format", "json")
            .query("formatversion", "2");
        if let Some(cont) = cont {
            request = request.query("rvcontinue", cont);
        } else if let Some(start) = start {
            request = request.query("rvstartid", start.to_string());
        }
        let mut response = request
            .call()
            .map_err(|err| http_error("http-request", err))?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|err| http_error("http-body", err))
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: QueryBody,
    #[serde(rename = "continue")]
    cont: Option<Continuation>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<PageRevisions>,
}

#[derive(Debug, Deserialize)]
struct PageRevisions {
    title: String,
    #[serde(default)]
    revisions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Continuation {
    rvcontinue: String,
}

/// On-disk cache of fetched revisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiCache {
    root: PathBuf,
}

impl WikiCache {
    /// Cache rooted at `root` (conventionally `.wiki-revs`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File listing the revision ids fetched for `title`.
    pub fn ids_path(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}_ids", slugify_filename(title)))
    }

    /// File holding one compressed revision.
    pub fn revision_path(&self, revid: u64) -> PathBuf {
        self.root.join(format!("{revid}.zlib"))
    }

    /// Known revision ids for `title`, empty when nothing was fetched yet.
    pub fn load_ids(&self, title: &str) -> Result<Vec<u64>, CrunchError> {
        let path = self.ids_path(title);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&path).map_err(|err| CrunchError::io("ids-read", &path, err))?;
        from_json_slice(&bytes)
    }

    fn store_ids(&self, title: &str, ids: &[u64]) -> Result<(), CrunchError> {
        let path = self.ids_path(title);
        let bytes = serde_json::to_vec(ids)
            .map_err(|err| CrunchError::Serde(ErrorInfo::new("json_serialize", err.to_string())))?;
        write_file(&path, &bytes, "ids-write")
    }

    fn store_revision(&self, revid: u64, revision: &Value) -> Result<(), CrunchError> {
        let path = self.revision_path(revid);
        let json = serde_json::to_vec(revision)
            .map_err(|err| CrunchError::Serde(ErrorInfo::new("json_serialize", err.to_string())))?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        let bytes = encoder
            .write_all(&json)
            .and_then(|_| encoder.finish())
            .map_err(|err| CrunchError::io("revision-compress", &path, err))?;
        write_file(&path, &bytes, "revision-write")
    }

    fn ensure_root(&self) -> Result<(), CrunchError> {
        fs::create_dir_all(&self.root).map_err(|err| CrunchError::io("cache-dir", &self.root, err))
    }
}

fn write_file(path: &Path, bytes: &[u8], code: &str) -> Result<(), CrunchError> {
    fs::write(path, bytes).map_err(|err| CrunchError::io(code, path, err))
}

/// Fetch limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Stop once this many revision ids are known.
    pub target: usize,
    /// Pause between consecutive requests.
    pub delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            target: 500,
            delay: Duration::from_secs(1),
        }
    }
}

/// Outcome of [`fetch_revisions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// Revision ids known after the run.
    pub total: usize,
    /// Revisions newly stored by this run.
    pub added: usize,
    /// Requests issued.
    pub requests: usize,
}

/// Pages through the revision history of `title`, caching every revision.
///
/// Ids already present in the cache are not fetched again; a resumed run
/// starts from the newest known revision.
pub fn fetch_revisions<S>(
    source: &mut S,
    cache: &WikiCache,
    title: &str,
    options: &FetchOptions,
) -> Result<FetchSummary, CrunchError>
where
    S: RevisionSource + ?Sized,
{
    cache.ensure_root()?;
    let mut ids = cache.load_ids(title)?;
    let mut known: HashSet<u64> = ids.iter().copied().collect();
    let start = ids.last().copied();
    if let Some(start) = start {
        info!("resuming {} from revision {} ({} known)", title, start, ids.len());
    }

    let mut cont: Option<String> = None;
    let mut added = 0;
    let mut requests = 0;
    loop {
        let raw = source.fetch_page(title, start, cont.as_deref())?;
        requests += 1;
        let response: QueryResponse = serde_json::from_value(raw)
            .map_err(|err| CrunchError::Serde(ErrorInfo::new("wiki-response", err.to_string())))?;

        for page in response.query.pages {
            debug!("page {}", page.title);
            if page.title != title {
                continue;
            }
            for revision in page.revisions {
                let revid = revision.get("revid").and_then(Value::as_u64).ok_or_else(|| {
                    CrunchError::Serde(
                        ErrorInfo::new("wiki-response", "revision without revid")
                            .with_context("title", title),
                    )
                })?;
                if known.insert(revid) {
                    cache.store_revision(revid, &revision)?;
                    ids.push(revid);
                    added += 1;
                }
            }
            cache.store_ids(title, &ids)?;
        }

        let Some(next) = response.cont else {
            break;
        };
        info!("{}: {} revisions, continuing at {}", title, ids.len(), next.rvcontinue);
        cont = Some(next.rvcontinue);
        if ids.len() >= options.target {
            break;
        }
        thread::sleep(options.delay);
    }

    Ok(FetchSummary {
        total: ids.len(),
        added,
        requests,
    })
}
