//! Uniform text access over the two mod package substrates.
//!
//! A mod is either a plain directory tree or a zip archive. Both are addressed
//! with container-relative, forward-slash entry paths (`vehicles/pickup/info_x.json`)
//! so the scanner, indexer, auditor and writer share a single code path.
//!
//! - [`FolderContainer`]: entries map onto files below a root directory
//! - [`ArchiveContainer`]: entries are looked up by exact name inside a zip; the
//!   archive is opened per call and closed before returning

pub mod archive;
pub mod folder;

pub use archive::ArchiveContainer;
pub use folder::FolderContainer;

use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

/// Errors raised by container operations
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Entry {entry} not found in {container}")]
    NotFound {
        container: Utf8PathBuf,
        entry: String,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Archive error in {path}: {source}")]
    Archive {
        path: Utf8PathBuf,
        source: zip::result::ZipError,
    },

    #[error("Invalid entry path: {0}")]
    InvalidPath(String),

    #[error("Invalid entry pattern {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

impl ContainerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound { .. })
    }
}

/// Entries matched by a listing, and how many paths could not be visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<String>,
    /// Unreadable directories, broken links, link cycles, damaged zip records
    pub skipped: usize,
}

/// Read/list/write access to the entries of one mod package.
///
/// All text is UTF-8 without a byte-order mark in both directions.
pub trait Container {
    /// Entries whose file name matches `pattern` (case-insensitive glob).
    ///
    /// With `recursive` unset only top-level entries are listed. Paths that
    /// cannot be visited are counted in [`Listing::skipped`].
    fn list(&self, pattern: &str, recursive: bool) -> Result<Listing, ContainerError>;

    /// [`Container::list`] without the skip count.
    fn list_entries(&self, pattern: &str, recursive: bool) -> Result<Vec<String>, ContainerError> {
        self.list(pattern, recursive).map(|listing| listing.entries)
    }

    /// Read an entry as text. Fails with [`ContainerError::NotFound`] when absent.
    fn read_text(&self, entry: &str) -> Result<String, ContainerError>;

    /// Read several entries in one pass over the package.
    ///
    /// Results follow the order of `entries`. The outer error means the
    /// package itself could not be opened.
    fn read_texts(
        &self,
        entries: &[String],
    ) -> Result<Vec<Result<String, ContainerError>>, ContainerError> {
        Ok(entries.iter().map(|entry| self.read_text(entry)).collect())
    }

    /// Create or replace an entry, leaving every other entry untouched.
    fn write_text(&self, entry: &str, text: &str) -> Result<(), ContainerError>;

    /// Filesystem location of the package (directory or archive file).
    fn location(&self) -> &Utf8Path;
}

/// Open the container backing a package.
pub fn open(source_path: &Utf8Path, is_archive: bool) -> Box<dyn Container> {
    if is_archive {
        Box::new(ArchiveContainer::new(source_path))
    } else {
        Box::new(FolderContainer::new(source_path))
    }
}

/// Normalize an entry path to forward slashes without a leading separator.
///
/// Parent-directory segments are rejected so an entry can never escape its package.
pub fn normalize_entry(entry: &str) -> Result<String, ContainerError> {
    let unified = entry.replace('\\', "/");
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    if segments.is_empty() || segments.contains(&"..") {
        return Err(ContainerError::InvalidPath(entry.to_string()));
    }

    Ok(segments.join("/"))
}

/// Last segment of a forward-slash entry path.
pub fn entry_file_name(entry: &str) -> &str {
    entry.rsplit('/').next().unwrap_or(entry)
}

pub(crate) fn file_name_matcher(pattern: &str) -> Result<GlobMatcher, ContainerError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ContainerError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
