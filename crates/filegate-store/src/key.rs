//! Object addressing

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from [`ObjectKey`] construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidKey {
    /// A segment was empty
    #[error("empty {0} segment")]
    EmptySegment(&'static str),

    /// A segment contained a path separator
    #[error("{0} segment contains a path separator")]
    EmbeddedSeparator(&'static str),

    /// A segment was `.` or `..`, which URL parsers normalize away
    #[error("{0} segment is a relative path component")]
    RelativeSegment(&'static str),
}

/// The `{folder}/{file}` pair identifying a stored object.
///
/// Both segments are non-empty and contain no path separators, so a key
/// always maps to exactly one backend object path and can never traverse
/// outside the two-segment namespace. Constructed per-request from the URL
/// path; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey {
    folder: String,
    file: String,
}

impl ObjectKey {
    /// Validate and construct a key from its two segments.
    ///
    /// Segments are expected to be URL-decoded already; a decoded `%2F`
    /// shows up here as an embedded separator and is rejected.
    pub fn new(folder: impl Into<String>, file: impl Into<String>) -> Result<Self, InvalidKey> {
        let folder = folder.into();
        let file = file.into();

        Self::check_segment(&folder, "folder")?;
        Self::check_segment(&file, "file")?;

        Ok(Self { folder, file })
    }

    fn check_segment(segment: &str, name: &'static str) -> Result<(), InvalidKey> {
        if segment.is_empty() {
            return Err(InvalidKey::EmptySegment(name));
        }
        if segment.contains('/') || segment.contains('\\') {
            return Err(InvalidKey::EmbeddedSeparator(name));
        }
        if segment == "." || segment == ".." {
            return Err(InvalidKey::RelativeSegment(name));
        }
        Ok(())
    }

    /// The folder segment
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The file segment
    pub fn file(&self) -> &str {
        &self.file
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.folder, self.file)
    }
}
