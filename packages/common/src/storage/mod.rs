mod error;
mod filename;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filename::{FilenameError, validate_flat_filename};
pub use traits::{BoxReader, FileStore, StoredFile};
