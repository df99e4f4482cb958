use crate::editing::{EditOptions, EditSession};
use crate::error::EditError;
use relative_path::RelativePath;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: EditError,
    },
}

/// Read a document and return its markup
pub fn read_file(relative_path: &RelativePath, documents_root: &Path) -> Result<String, IoError> {
    let absolute_path = relative_path.to_path(documents_root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    fs::read_to_string(&absolute_path).map_err(IoError::Io)
}

/// Write markup to a document
pub fn write_file(
    relative_path: &RelativePath,
    documents_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(documents_root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Open a document in a new edit session
pub fn open_session(
    relative_path: &RelativePath,
    documents_root: &Path,
    options: EditOptions,
) -> Result<EditSession, IoError> {
    let markup = read_file(relative_path, documents_root)?;
    EditSession::from_markup(&markup, options).map_err(|source| IoError::Document {
        path: relative_path.to_path(documents_root),
        source,
    })
}

/// Save a session's document, without selection markers
pub fn save_session(
    session: &EditSession,
    relative_path: &RelativePath,
    documents_root: &Path,
) -> Result<(), IoError> {
    write_file(relative_path, documents_root, &session.content())
}
