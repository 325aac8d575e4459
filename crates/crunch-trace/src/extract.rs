use std::path::PathBuf;

use crunch_core::CrunchError;
use log::info;

use crate::blob::BlobStore;
use crate::git::GitHistory;
use crate::prompt::{Chooser, Confirm};
use crate::resolve::resolve_dependencies;
use crate::revision::validate_order;
use crate::sessions::assign_sessions;

/// Result of an extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The order file was written.
    Written {
        /// Location of the order file.
        path: PathBuf,
        /// Number of revisions recorded.
        revisions: usize,
        /// Number of distinct sessions allocated.
        sessions: u32,
    },
    /// An order file already existed and the operator declined to replace it.
    Aborted {
        /// Location of the existing order file.
        path: PathBuf,
    },
}

/// Extracts the tracked file's history into `store`.
///
/// Every revision's blob is stored compressed, dependencies are resolved
/// (asking `operator` when content hashes are ambiguous) and sessions are
/// assigned before the order file is written. An existing order file is only
/// replaced after `operator` confirms; otherwise nothing is written.
pub fn extract_order<O>(
    history: &GitHistory,
    store: &BlobStore,
    operator: &mut O,
) -> Result<ExtractOutcome, CrunchError>
where
    O: Chooser + Confirm + ?Sized,
{
    let tracked = history.tracked().to_string_lossy().into_owned();
    let order_path = store.order_path(&tracked);
    if order_path.exists() {
        let question = format!(
            "file exists '{}', continue? (yes / [no])",
            order_path.display()
        );
        if !operator.confirm(&question)? {
            info!("keeping existing {}", order_path.display());
            return Ok(ExtractOutcome::Aborted { path: order_path });
        }
    }

    let mut order = history.revisions()?;
    info!("{} revisions of {}", order.len(), tracked);
    for revision in &order {
        let content = history.blob_content(&revision.blob)?;
        store.store(&revision.blob, &content)?;
    }

    resolve_dependencies(&mut order, history, operator)?;
    let sessions = assign_sessions(&mut order);
    validate_order(&order)?;
    let path = store.store_order(&tracked, &order)?;
    info!("wrote {} ({} sessions)", path.display(), sessions);
    Ok(ExtractOutcome::Written {
        path,
        revisions: order.len(),
        sessions,
    })
}
