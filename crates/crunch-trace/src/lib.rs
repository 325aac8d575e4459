//! Revision trace extraction for the crunch CRDT benchmarks.
//!
//! Git histories are flattened into order files (see [`Revision`]) whose
//! dependency and session metadata drive the external replay tools, while
//! Wikipedia histories are cached revision by revision.

mod blob;
mod extract;
mod git;
mod prompt;
mod resolve;
mod revision;
mod sample;
mod sessions;
mod wiki;

pub use blob::BlobStore;
pub use extract::{extract_order, ExtractOutcome};
pub use git::GitHistory;
pub use prompt::{Chooser, Confirm, Prompt};
pub use resolve::{resolve_dependencies, short_id, ParentBlobs};
pub use revision::{load_order, validate_order, Revision};
pub use sample::{collect_order_files, distinct_sessions, random_ids, sample_sessions};
pub use sessions::assign_sessions;
pub use wiki::{
    fetch_revisions, FetchOptions, FetchSummary, RevisionSource, UreqSource, WikiCache,
    WIKIPEDIA_API,
};
