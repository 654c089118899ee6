use super::{file_name_matcher, normalize_entry, Container, ContainerError, Listing};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::ErrorKind;
use walkdir::WalkDir;

/// A mod package stored as a plain directory tree.
#[derive(Debug, Clone)]
pub struct FolderContainer {
    root: Utf8PathBuf,
}

impl FolderContainer {
    pub fn new<P: AsRef<Utf8Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Filesystem path of an entry below the root.
    pub fn resolve(&self, entry: &str) -> Result<Utf8PathBuf, ContainerError> {
        let normalized = normalize_entry(entry)?;
        Ok(normalized
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment)))
    }

    fn relative_entry(&self, path: &Utf8Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let segments: Vec<&str> = relative.components().map(|c| c.as_str()).collect();
        (!segments.is_empty()).then(|| segments.join("/"))
    }
}

impl Container for FolderContainer {
    fn list(&self, pattern: &str, recursive: bool) -> Result<Listing, ContainerError> {
        let matcher = file_name_matcher(pattern)?;
        if !self.root.is_dir() {
            return Err(ContainerError::NotFound {
                container: self.root.clone(),
                entry: String::new(),
            });
        }

        // Linked folders and files count as part of the package; cycles surface as errors
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .follow_links(true)
            .sort_by_file_name();

        let mut listing = Listing::default();
        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    tracing::debug!("Skipping unreadable path under {}: {}", self.root, e);
                    listing.skipped += 1;
                    continue;
                }
            };

            if !item.file_type().is_file() {
                continue;
            }

            let Some(path) = Utf8Path::from_path(item.path()) else {
                tracing::debug!("Skipping non UTF-8 path: {}", item.path().display());
                listing.skipped += 1;
                continue;
            };

            let Some(file_name) = path.file_name() else {
                continue;
            };

            if !matcher.is_match(file_name) {
                continue;
            }

            if let Some(entry) = self.relative_entry(path) {
                listing.entries.push(entry);
            }
        }

        Ok(listing)
    }

    fn read_text(&self, entry: &str) -> Result<String, ContainerError> {
        let path = self.resolve(entry)?;
        let bytes = fs::read(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ContainerError::NotFound {
                    container: self.root.clone(),
                    entry: entry.to_string(),
                }
            } else {
                ContainerError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        Ok(decode_text(&bytes))
    }

    fn write_text(&self, entry: &str, text: &str) -> Result<(), ContainerError> {
        let path = self.resolve(entry)?;
        fs::write(&path, text.as_bytes()).map_err(|source| ContainerError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {} bytes to {}", text.len(), path);
        Ok(())
    }

    fn location(&self) -> &Utf8Path {
        &self.root
    }
}

/// Decode UTF-8 text, dropping a byte-order mark and replacing invalid sequences.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
