use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::filename::validate_flat_filename;
use super::traits::{FileStore, StoredFile};

/// Filesystem-backed file store.
///
/// Files live directly under `base_path` by name. Writes go through
/// `{base_path}/.tmp/{uuid}` and are renamed into place, so readers never see
/// a partially written file and a same-named upload replaces the old one.
pub struct FilesystemFileStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemFileStore {
    /// Create the store, creating `base_path` if it does not exist yet.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a client-supplied name to its path inside the store.
    fn file_path(&self, name: &str) -> Result<(String, PathBuf), StorageError> {
        let name = validate_flat_filename(name)?;
        Ok((name.to_string(), self.base_path.join(name)))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    async fn save(&self, name: &str, data: &[u8]) -> Result<u64, StorageError> {
        let (name, target) = self.file_path(name)?;

        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(file = %name, size, "Stored file");
        Ok(size)
    }

    async fn open(&self, name: &str) -> Result<StoredFile, StorageError> {
        let (name, path) = self.file_path(name)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name));
            }
            Err(e) => return Err(e.into()),
        };

        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(StorageError::NotFound(name));
        }

        Ok(StoredFile {
            name,
            size: meta.len(),
            reader: Box::new(BufReader::new(file)),
        })
    }
}
