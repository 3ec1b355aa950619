//! Export archive reading
//!
//! Notion delivers exports as a ZIP archive fetched from a pre-signed URL.
//! [`ExportArchive`] holds the downloaded bytes in memory and exposes the
//! entries by name; entry contents stay compressed until explicitly read.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// A downloaded export archive held in memory
pub struct ExportArchive {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
    /// Entry names in central-directory order. The zip crate's own
    /// `file_names()` iterates a map and loses archive order.
    names: Vec<String>,
}

impl ExportArchive {
    /// Parse downloaded bytes as a ZIP archive
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            Error::CorruptArchive {
                reason: e.to_string(),
            }
        })?;

        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index_raw(i).map_err(|e| Error::CorruptArchive {
                reason: format!("failed to read ZIP entry: {}", e),
            })?;
            names.push(entry.name().to_string());
        }

        debug!(entry_count = names.len(), "opened export archive");
        Ok(Self { archive, names })
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entry names in archive order
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// First entry name (in archive order) satisfying the predicate
    pub fn find_first<P>(&self, predicate: P) -> Option<&str>
    where
        P: Fn(&str) -> bool,
    {
        self.names
            .iter()
            .map(String::as_str)
            .find(|name| predicate(name))
    }

    /// Read the raw bytes of the first entry satisfying the predicate
    ///
    /// Returns [`Error::FileNotFound`] if no entry name matches.
    pub fn read_first_match<P>(&mut self, predicate: P) -> Result<Vec<u8>>
    where
        P: Fn(&str) -> bool,
    {
        let index = self
            .names
            .iter()
            .position(|name| predicate(name))
            .ok_or(Error::FileNotFound)?;
        self.read_index(index)
    }

    /// Read the raw bytes of the named entry
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_first_match(|candidate| candidate == name)
    }

    fn read_index(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut entry = self.archive.by_index(index).map_err(|e| {
            Error::CorruptArchive {
                reason: format!("failed to read ZIP entry: {}", e),
            }
        })?;

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents).map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to decompress ZIP entry: {}",
                e
            )))
        })?;
        Ok(contents)
    }

    /// Write every entry to disk under the destination, preserving archive paths
    ///
    /// Returns the paths of the extracted files. Entries whose names escape
    /// the destination are skipped. Extraction is best-effort: files written
    /// before a later failure stay on disk.
    pub fn extract_to(&mut self, dest: &Path) -> Result<Vec<PathBuf>> {
        debug!(?dest, entry_count = self.names.len(), "extracting export archive");

        std::fs::create_dir_all(dest).map_err(|e| {
            Error::Io(std::io::Error::other(format!(
                "failed to create destination: {}",
                e
            )))
        })?;

        let mut extracted_files = Vec::new();

        for i in 0..self.archive.len() {
            let mut entry = self.archive.by_index(i).map_err(|e| {
                Error::CorruptArchive {
                    reason: format!("failed to read ZIP entry: {}", e),
                }
            })?;

            let entry_path = match entry.enclosed_name() {
                Some(path) => dest.join(path),
                None => {
                    warn!(name = entry.name(), "skipping entry with unsafe path");
                    continue;
                }
            };

            if entry.is_dir() {
                std::fs::create_dir_all(&entry_path).map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "failed to create directory: {}",
                        e
                    )))
                })?;
                continue;
            }

            if let Some(parent) = entry_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Io(std::io::Error::other(format!(
                        "failed to create parent directories: {}",
                        e
                    )))
                })?;
            }

            let mut outfile = std::fs::File::create(&entry_path).map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to create output file: {}",
                    e
                )))
            })?;

            std::io::copy(&mut entry, &mut outfile).map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to extract file: {}",
                    e
                )))
            })?;

            extracted_files.push(entry_path);
        }

        info!(
            ?dest,
            extracted_count = extracted_files.len(),
            "archive extraction successful"
        );

        Ok(extracted_files)
    }
}

impl std::fmt::Debug for ExportArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArchive")
            .field("entries", &self.names.len())
            .finish()
    }
}
