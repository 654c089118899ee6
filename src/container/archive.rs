use super::folder::decode_text;
use super::{
    entry_file_name, file_name_matcher, normalize_entry, Container, ContainerError, Listing,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A mod package stored as a zip archive.
///
/// Every call opens the archive, does its work and drops the handle, so an
/// archive is never held open across catalog operations.
#[derive(Debug, Clone)]
pub struct ArchiveContainer {
    path: Utf8PathBuf,
}

impl ArchiveContainer {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<ZipArchive<File>, ContainerError> {
        let file = File::open(&self.path).map_err(|source| ContainerError::Io {
            path: self.path.clone(),
            source,
        })?;
        ZipArchive::new(file).map_err(|e| self.archive_error(e))
    }

    fn archive_error(&self, source: ZipError) -> ContainerError {
        match source {
            ZipError::Io(source) => ContainerError::Io {
                path: self.path.clone(),
                source,
            },
            source => ContainerError::Archive {
                path: self.path.clone(),
                source,
            },
        }
    }

    fn read_from(
        &self,
        archive: &mut ZipArchive<File>,
        entry: &str,
    ) -> Result<String, ContainerError> {
        let name = normalize_entry(entry)?;
        let mut file = match archive.by_name(&name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => {
                return Err(ContainerError::NotFound {
                    container: self.path.clone(),
                    entry: name,
                });
            }
            Err(e) => return Err(self.archive_error(e)),
        };

        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes).map_err(|e| self.io_error(e))?;
        Ok(decode_text(&bytes))
    }

    fn io_error(&self, source: std::io::Error) -> ContainerError {
        ContainerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Container for ArchiveContainer {
    fn list(&self, pattern: &str, recursive: bool) -> Result<Listing, ContainerError> {
        let matcher = file_name_matcher(pattern)?;
        let mut archive = self.open()?;

        let mut listing = Listing::default();
        for index in 0..archive.len() {
            let file = match archive.by_index_raw(index) {
                Ok(file) => file,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry #{} in {}: {}", index, self.path, e);
                    listing.skipped += 1;
                    continue;
                }
            };

            if file.is_dir() {
                continue;
            }

            let name = file.name();
            if !recursive && name.contains('/') {
                continue;
            }

            if matcher.is_match(entry_file_name(name)) {
                listing.entries.push(name.to_string());
            }
        }

        Ok(listing)
    }

    fn read_text(&self, entry: &str) -> Result<String, ContainerError> {
        let mut archive = self.open()?;
        self.read_from(&mut archive, entry)
    }

    /// One open of the archive for the whole batch.
    fn read_texts(
        &self,
        entries: &[String],
    ) -> Result<Vec<Result<String, ContainerError>>, ContainerError> {
        let mut archive = self.open()?;
        Ok(entries
            .iter()
            .map(|entry| self.read_from(&mut archive, entry))
            .collect())
    }

    /// Replace (or add) one entry.
    ///
    /// The archive is rebuilt into a temporary file next to it: every other
    /// entry is copied raw, in its original order and with its original
    /// compressed bytes, the target entry is appended last, and the temporary
    /// file then replaces the archive. A failure at any step leaves the
    /// original archive as it was.
    fn write_text(&self, entry: &str, text: &str) -> Result<(), ContainerError> {
        let name = normalize_entry(entry)?;

        // A linked archive is rewritten at its target so the link survives
        let target = fs::canonicalize(&self.path).map_err(|e| self.io_error(e))?;
        let directory = target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let staged = {
            let mut archive = self.open()?;
            let temp = NamedTempFile::new_in(&directory).map_err(|e| self.io_error(e))?;
            let mut writer = ZipWriter::new(temp);

            for index in 0..archive.len() {
                let file = archive.by_index_raw(index).map_err(|e| self.archive_error(e))?;
                if file.name() == name {
                    continue;
                }
                writer.raw_copy_file(file).map_err(|e| self.archive_error(e))?;
            }

            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| self.archive_error(e))?;
            writer.write_all(text.as_bytes()).map_err(|e| self.io_error(e))?;
            let staged = writer.finish().map_err(|e| self.archive_error(e))?;

            // The temp file is created owner-only; keep the archive's own mode
            let permissions = fs::metadata(&target)
                .map_err(|e| self.io_error(e))?
                .permissions();
            staged
                .as_file()
                .set_permissions(permissions)
                .map_err(|e| self.io_error(e))?;
            staged
        };

        staged
            .persist(&target)
            .map_err(|e| self.io_error(e.error))?;

        tracing::debug!("Rewrote entry {} in {}", name, self.path);
        Ok(())
    }

    fn location(&self) -> &Utf8Path {
        &self.path
    }
}
