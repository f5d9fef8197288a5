use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::confirm::OverwritePolicy;
use crate::error::{CompileError, ResolveError};

/// Filesystem cache holding one raw image per unique card name. The file
/// name is the card name itself, no extension, exactly as downloaded.
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn open(dir: &Path) -> Result<Self, CompileError> {
        fs::create_dir_all(dir)?;
        Ok(ImageStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path_for(&self, card: &str) -> PathBuf {
        self.dir.join(card)
    }

    pub fn contains(&self, card: &str) -> bool {
        self.path_for(card).is_file()
    }

    /// Plain GET of an image URL. An empty body is an error so that no
    /// empty cache file ever gets written.
    pub fn fetch_bytes(&self, client: &Client, url: &str) -> Result<Vec<u8>, ResolveError> {
        let response = client
            .get(url)
            .send()
            .map_err(|source| ResolveError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response
            .bytes()
            .map_err(|source| ResolveError::Transport {
                url: url.to_string(),
                source,
            })?;
        if bytes.is_empty() {
            return Err(ResolveError::EmptyBody {
                url: url.to_string(),
            });
        }
        Ok(bytes.to_vec())
    }

    pub fn write(
        &self,
        card: &str,
        bytes: &[u8],
        policy: &OverwritePolicy,
    ) -> Result<PathBuf, CompileError> {
        let path = self.path_for(card);
        policy.check(&path)?;
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_cards_are_found_again() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        assert!(!store.contains("Forest"));
        store
            .write("Forest", b"image bytes", &OverwritePolicy::Allow)
            .unwrap();
        assert!(store.contains("Forest"));
        assert_eq!(fs::read(store.path_for("Forest")).unwrap(), b"image bytes");
    }

    #[test]
    fn denied_overwrite_leaves_the_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        store
            .write("Forest", b"original", &OverwritePolicy::Allow)
            .unwrap();
        let err = store
            .write("Forest", b"replacement", &OverwritePolicy::Deny)
            .unwrap_err();
        assert!(matches!(err, CompileError::DestinationExists { .. }));
        assert_eq!(fs::read(store.path_for("Forest")).unwrap(), b"original");
    }

    #[test]
    fn allowed_overwrite_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open(dir.path()).unwrap();
        store
            .write("Forest", b"original", &OverwritePolicy::Allow)
            .unwrap();
        store
            .write("Forest", b"replacement", &OverwritePolicy::Allow)
            .unwrap();
        assert_eq!(
            fs::read(store.path_for("Forest")).unwrap(),
            b"replacement"
        );
    }

    #[test]
    fn open_creates_the_cache_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("cache").join("cards");
        ImageStore::open(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
