use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crunch_core::{order_file_name, CrunchError, ErrorInfo};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;

use crate::revision::Revision;

/// Directory of compressed blobs addressed by content hash, plus the order
/// files describing how those blobs chain together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Creates a handle rooted at `root`. Nothing is created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the blob with the given content hash.
    pub fn blob_path(&self, hash: &str) -> PathBuf {
        self.root.join(hash)
    }

    /// Location of the order file for a tracked path.
    pub fn order_path(&self, tracked: &str) -> PathBuf {
        self.root.join(order_file_name(tracked))
    }

    /// Compresses `content` and writes it under its hash, replacing any previous copy.
    pub fn store(&self, hash: &str, content: &[u8]) -> Result<PathBuf, CrunchError> {
        self.ensure_root()?;
        let path = self.blob_path(hash);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(content)
            .and_then(|_| encoder.finish())
            .and_then(|bytes| fs::write(&path, bytes))
            .map_err(|err| CrunchError::io("blob-write", &path, err))?;
        debug!("stored blob {} ({} bytes)", hash, content.len());
        Ok(path)
    }

    /// Reads and inflates a stored blob.
    pub fn load(&self, hash: &str) -> Result<Vec<u8>, CrunchError> {
        let path = self.blob_path(hash);
        let compressed = fs::read(&path).map_err(|err| CrunchError::io("blob-read", &path, err))?;
        let mut content = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut content)
            .map_err(|err| CrunchError::io("blob-inflate", &path, err))?;
        Ok(content)
    }

    /// Writes the order file for `tracked` as a JSON array.
    pub fn store_order(&self, tracked: &str, order: &[Revision]) -> Result<PathBuf, CrunchError> {
        self.ensure_root()?;
        let path = self.order_path(tracked);
        let bytes = serde_json::to_vec(order)
            .map_err(|err| CrunchError::Serde(ErrorInfo::new("json_serialize", err.to_string())))?;
        fs::write(&path, bytes).map_err(|err| CrunchError::io("order-write", &path, err))?;
        Ok(path)
    }

    fn ensure_root(&self) -> Result<(), CrunchError> {
        fs::create_dir_all(&self.root).map_err(|err| CrunchError::io("blob-dir", &self.root, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::load_order;

    #[test]
    fn blobs_round_trip_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("blobs"));
        let content = b"line one\nline two\n".repeat(50);
        let path = store.store("abc123", &content).unwrap();
        assert_eq!(path, dir.path().join("blobs").join("abc123"));

        let on_disk = fs::read(&path).unwrap();
        assert_ne!(on_disk, content);
        assert!(on_disk.len() < content.len());
        assert_eq!(store.load("abc123").unwrap(), content);
    }

    #[test]
    fn order_file_uses_slug_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let mut revision = Revision::new("a@example.com", "c1", "b1");
        revision.fid = Some(1);
        let path = store
            .store_order("Documentation/git-push.txt", &[revision.clone()])
            .unwrap();
        assert_eq!(path, dir.path().join("Documentation-git-push-txt.ord"));
        assert_eq!(load_order(&path).unwrap(), vec![revision]);
    }

    #[test]
    fn missing_blob_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlobStore::new(dir.path()).load("nope").unwrap_err();
        assert_eq!(err.info().code, "blob-read");
    }
}
