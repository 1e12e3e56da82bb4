//! Per-URL pipeline: fetch → validate → hash → dedup check → save → record.

use std::path::PathBuf;

use crate::checksum;
use crate::config::ImgFetchConfig;
use crate::error::FetchError;
use crate::http::{CurlSource, Download, ImageSource};
use crate::ledger::{FileLedger, HashStore};
use crate::storage::{self, ImageStore};
use crate::url_model::derive_filename;
use crate::validate::SkipReason;

/// An image written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub filename: String,
    pub path: PathBuf,
    pub digest: String,
    pub bytes: usize,
}

/// How a URL ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved(SavedImage),
    /// Rejected by content type, declared size or filename; nothing written.
    Skipped(SkipReason),
    /// Content already in the ledger; nothing written.
    Duplicate { digest: String },
}

/// Runs the pipeline for one URL at a time against a source, a ledger and an
/// output directory.
pub struct Fetcher<S, L> {
    source: S,
    ledger: L,
    images: ImageStore,
    /// Paths inside the output directory that images must never replace.
    reserved: Vec<PathBuf>,
}

impl Fetcher<CurlSource, FileLedger> {
    /// The production wiring: libcurl, the ledger file and the output
    /// directory from `cfg`. Creates the output directory if missing.
    pub fn from_config(cfg: &ImgFetchConfig) -> anyhow::Result<Self> {
        storage::ensure_output_dir(&cfg.output_dir)?;
        Ok(Self::new(
            CurlSource::new(cfg.fetch_settings()),
            FileLedger::new(cfg.ledger_path()),
            ImageStore::new(&cfg.output_dir),
        )
        .reserve(cfg.ledger_path()))
    }
}

impl<S: ImageSource, L: HashStore> Fetcher<S, L> {
    pub fn new(source: S, ledger: L, images: ImageStore) -> Self {
        Self {
            source,
            ledger,
            images,
            reserved: Vec::new(),
        }
    }

    /// Never save an image at `path`; URLs that would are skipped.
    pub fn reserve(mut self, path: impl Into<PathBuf>) -> Self {
        self.reserved.push(path.into());
        self
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Processes one URL.
    ///
    /// The image is saved before its digest is recorded, so a failed save
    /// leaves no ledger entry and the URL can be retried later. Two distinct
    /// URLs with the same sanitized name overwrite each other. A URL whose
    /// name lands on a reserved path is skipped before anything is fetched.
    pub fn process(&mut self, url: &str) -> Result<Outcome, FetchError> {
        let filename = derive_filename(url);
        if self.reserved.contains(&self.images.path_for(&filename)) {
            tracing::warn!(url, %filename, "filename is reserved, not fetching");
            return Ok(Outcome::Skipped(SkipReason::ReservedName(filename)));
        }

        let bytes = match self.source.get(url)? {
            Download::Skipped(reason) => return Ok(Outcome::Skipped(reason)),
            Download::Body { bytes, .. } => bytes,
        };

        let digest = checksum::sha256_hex(&bytes);
        tracing::debug!(url, len = bytes.len(), %digest, "downloaded");

        if self.ledger.contains(&digest)? {
            return Ok(Outcome::Duplicate { digest });
        }

        let path = self
            .images
            .save(&filename, &bytes)
            .map_err(|source| FetchError::Write {
                path: self.images.path_for(&filename),
                source,
            })?;
        self.ledger.insert(&digest)?;
        tracing::info!(url, path = %path.display(), "saved image");

        Ok(Outcome::Saved(SavedImage {
            filename,
            path,
            digest,
            bytes: bytes.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseHead;
    use crate::ledger::MemoryLedger;
    use std::collections::HashMap;
    use std::fs;

    /// Canned responses by URL; unknown URLs fail with 404.
    #[derive(Default)]
    struct StubSource {
        responses: HashMap<String, Download>,
    }

    impl StubSource {
        fn body(mut self, url: &str, bytes: &[u8]) -> Self {
            self.responses.insert(
                url.to_string(),
                Download::Body {
                    head: ResponseHead {
                        status: Some(200),
                        content_type: Some("image/jpeg".into()),
                        content_length: Some(bytes.len() as u64),
                    },
                    bytes: bytes.to_vec(),
                },
            );
            self
        }

        fn skipped(mut self, url: &str, reason: SkipReason) -> Self {
            self.responses
                .insert(url.to_string(), Download::Skipped(reason));
            self
        }
    }

    impl ImageSource for StubSource {
        fn get(&self, url: &str) -> Result<Download, FetchError> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                })
        }
    }

    fn fetcher(source: StubSource, dir: &std::path::Path) -> Fetcher<StubSource, MemoryLedger> {
        Fetcher::new(source, MemoryLedger::new(), ImageStore::new(dir))
    }

    #[test]
    fn saves_new_image_and_records_digest() {
        let dir = tempfile::tempdir().unwrap();
        let source = StubSource::default().body("https://a.example/cat.jpg", b"meow");
        let mut f = fetcher(source, dir.path());

        let outcome = f.process("https://a.example/cat.jpg").unwrap();
        let saved = match outcome {
            Outcome::Saved(s) => s,
            other => panic!("expected Saved, got {other:?}"),
        };
        assert_eq!(saved.filename, "cat.jpg");
        assert_eq!(saved.path, dir.path().join("cat.jpg"));
        assert_eq!(saved.bytes, 4);
        assert_eq!(saved.digest, checksum::sha256_hex(b"meow"));
        assert_eq!(fs::read(&saved.path).unwrap(), b"meow");
        assert!(f.ledger().contains(&saved.digest).unwrap());
    }

    #[test]
    fn identical_bytes_from_other_url_is_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let source = StubSource::default()
            .body("https://a.example/one.jpg", b"same")
            .body("https://b.example/two.jpg", b"same");
        let mut f = fetcher(source, dir.path());

        assert!(matches!(
            f.process("https://a.example/one.jpg").unwrap(),
            Outcome::Saved(_)
        ));
        let second = f.process("https://b.example/two.jpg").unwrap();
        assert_eq!(
            second,
            Outcome::Duplicate {
                digest: checksum::sha256_hex(b"same")
            }
        );
        assert!(!dir.path().join("two.jpg").exists());
        assert_eq!(f.ledger().len(), 1);
    }

    #[test]
    fn skip_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = StubSource::default().skipped(
            "https://a.example/page",
            SkipReason::ContentType("text/html".into()),
        );
        let mut f = fetcher(source, dir.path());
        let outcome = f.process("https://a.example/page").unwrap();
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::ContentType("text/html".into()))
        );
        assert!(f.ledger().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn transport_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = fetcher(StubSource::default(), dir.path());
        let err = f.process("https://a.example/missing.png").unwrap_err();
        assert!(err.is_network());
    }

    #[test]
    fn failed_save_records_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = StubSource::default().body("https://a.example/x.gif", b"gif");
        let mut f = Fetcher::new(
            source,
            MemoryLedger::new(),
            ImageStore::new(dir.path().join("does-not-exist")),
        );
        let err = f.process("https://a.example/x.gif").unwrap_err();
        assert!(matches!(err, FetchError::Write { .. }));
        assert!(!err.is_network());
        assert!(f.ledger().is_empty());
    }

    #[test]
    fn empty_path_uses_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = StubSource::default().body("https://a.example/", b"root");
        let mut f = fetcher(source, dir.path());
        match f.process("https://a.example/").unwrap() {
            Outcome::Saved(s) => assert_eq!(s.filename, "downloaded_image.jpg"),
            other => panic!("expected Saved, got {other:?}"),
        }
    }

    #[test]
    fn reserved_path_is_never_fetched_or_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("hashes.txt");
        fs::write(&ledger_path, "kept\n").unwrap();
        let source = StubSource::default().body("https://a.example/hashes.txt", b"png");
        let mut f = fetcher(source, dir.path()).reserve(&ledger_path);

        let outcome = f.process("https://a.example/hashes.txt?v=2").unwrap();
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::ReservedName("hashes.txt".into()))
        );
        assert_eq!(fs::read_to_string(&ledger_path).unwrap(), "kept\n");
        assert!(f.ledger().is_empty());
    }
}
