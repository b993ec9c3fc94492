use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// An opened file ready to be streamed back to a client.
pub struct StoredFile {
    /// The validated name the file is stored under.
    pub name: String,
    pub size: u64,
    pub reader: BoxReader,
}

/// Name-addressed file storage.
///
/// Names are flat (see [`super::validate_flat_filename`]); saving under an
/// existing name replaces the previous content.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `data` under `name`, returning the number of bytes written.
    async fn save(&self, name: &str, data: &[u8]) -> Result<u64, StorageError>;

    /// Open a stored file for streaming.
    async fn open(&self, name: &str) -> Result<StoredFile, StorageError>;

    /// Retrieve all bytes of a stored file.
    async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let mut file = self.open(name).await?;
        let mut buf = Vec::with_capacity(file.size as usize);
        file.reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}
