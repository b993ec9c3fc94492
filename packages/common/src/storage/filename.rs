use thiserror::Error;

/// Reasons a client-supplied filename is refused by the file store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Filename cannot be empty")]
    Empty,
    #[error("Invalid filename: path separators are not allowed")]
    ContainsPathSeparator,
    #[error("Invalid filename: '..' is not allowed")]
    PathTraversal,
    #[error("Invalid filename: null bytes are not allowed")]
    NullByte,
    #[error("Invalid filename: hidden files (starting with '.') are not allowed")]
    Hidden,
    #[error("Invalid filename: control characters are not allowed")]
    ControlCharacter,
}

/// Validates a flat filename (no directory components) and returns it trimmed.
///
/// Anything accepted here is safe to join onto the store directory: it can
/// neither climb out of it nor collide with the store's hidden scratch area.
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(FilenameError::NullByte);
    }

    // CR/LF would otherwise leak into Content-Disposition on download.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(FilenameError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}
