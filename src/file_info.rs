use std::cmp::Ordering;
use std::fs;
use std::fs::Metadata;
use std::path::Path as StdPath;
use std::path::PathBuf;
use std::time::SystemTime;

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::errors::Op;
use crate::hash::Sha256Builder;
use crate::hash::Sha256String;
use crate::path;
use crate::utils::format_local_time;
use crate::utils::format_system_time;

/// Represents the metadata of a file or directory: size, modification time
/// and type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct FileStat {
    /// The size of the file in bytes. For directories, this may be zero or
    /// implementation-defined.
    pub size: u64,
    /// The last modification time of the file or directory.
    pub modified: SystemTime,
    /// Whether this entry is a directory.
    pub is_directory: bool,
    /// Optional digest of the file contents.
    pub sha256: Option<String>,
}

impl FileStat {
    /// Reads the metadata of `path`, without a digest.
    pub fn from_path<P: AsRef<StdPath>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .map_err(|e| Error::from_io(path.display().to_string(), Op::Read, e))?;
        Ok(FileStat::from_metadata(&metadata, None))
    }

    /// Reads the metadata of `path` and, for files, a SHA-256 of the content.
    pub fn with_digest<P: AsRef<StdPath>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut stat = Self::from_path(path)?;
        if !stat.is_directory {
            stat.sha256 = Some(path.sha256_build()?.sha256_string());
        }
        Ok(stat)
    }

    /// Create a `FileStat` from a `Metadata` value and an optional sha256.
    ///
    /// A platform that cannot report modification times yields the unix
    /// epoch.
    pub(crate) fn from_metadata(metadata: &Metadata, sha256: Option<String>) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        FileStat {
            size: metadata.len(),
            modified,
            is_directory: metadata.is_dir(),
            sha256,
        }
    }
}

/// Layout of the text returned by [`FileInfo::date`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum DateFormat {
    /// Local date and time, `MM/DD/YYYY HH:MM:SS`.
    #[default]
    Full,
    /// Local date only, `MM/DD/YYYY`.
    Date,
    /// Local time only, `HH:MM:SS`.
    Time,
    /// UTC in RFC 3339 - Z format, `2018-01-26T18:30:09.453Z`.
    Rfc3339,
}

/// Snapshot of a file's metadata taken at construction.
///
/// Later changes to the file are not reflected. Snapshots compare by
/// modification time: `==`, `<` and `>` are chronological, and a snapshot
/// that could not be taken is not comparable to anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// The spec the snapshot was requested for.
    pub spec: String,
    /// Metadata if the file exists and was readable.
    pub stats: Option<FileStat>,
}

impl FileInfo {
    /// Takes a snapshot of `spec`.
    pub fn new(spec: &str) -> Self {
        Self::at(spec, &PathBuf::from(spec), false)
    }

    /// Takes a snapshot of `spec` including a digest of its content.
    pub fn with_digest(spec: &str) -> Self {
        Self::at(spec, &PathBuf::from(spec), true)
    }

    /// Builds a snapshot from already known metadata.
    pub fn from_stat(spec: &str, stat: FileStat) -> Self {
        Self {
            spec: spec.to_string(),
            stats: Some(stat),
        }
    }

    pub(crate) fn at(spec: &str, path: &StdPath, digest: bool) -> Self {
        let stats = if digest {
            FileStat::with_digest(path)
        } else {
            FileStat::from_path(path)
        };
        let stats = stats
            .inspect_err(|e| debug!("no metadata for {spec}: {e}"))
            .ok();
        Self {
            spec: spec.to_string(),
            stats,
        }
    }

    /// Whether metadata could be retrieved.
    pub fn good(&self) -> bool {
        self.stats.is_some()
    }

    /// File name with extension.
    pub fn name(&self) -> String {
        path::get_name(&self.spec, true)
    }

    /// Size in bytes at snapshot time; 0 if the snapshot is not good.
    pub fn size(&self) -> u64 {
        self.stats.as_ref().map(|s| s.size).unwrap_or(0)
    }

    /// Modification time at snapshot time.
    pub fn modified(&self) -> Option<SystemTime> {
        self.stats.as_ref().map(|s| s.modified)
    }

    /// Whether `spec` named a directory.
    pub fn is_directory(&self) -> bool {
        self.stats.as_ref().is_some_and(|s| s.is_directory)
    }

    /// Content digest, if one was requested.
    pub fn sha256(&self) -> Option<&str> {
        self.stats.as_ref().and_then(|s| s.sha256.as_deref())
    }

    /// Formats the modification time. Empty if the snapshot is not good.
    pub fn date(&self, format: DateFormat) -> String {
        let Some(modified) = self.modified() else {
            return String::new();
        };
        match format {
            DateFormat::Full => format_local_time(modified, "%m/%d/%Y %H:%M:%S"),
            DateFormat::Date => format_local_time(modified, "%m/%d/%Y"),
            DateFormat::Time => format_local_time(modified, "%H:%M:%S"),
            DateFormat::Rfc3339 => format_system_time(modified),
        }
    }

    /// Same as `self < other`.
    pub fn earlier(&self, other: &FileInfo) -> bool {
        self < other
    }

    /// Same as `self > other`.
    pub fn later(&self, other: &FileInfo) -> bool {
        self > other
    }

    /// Whether this file is smaller than `other`.
    pub fn smaller(&self, other: &FileInfo) -> bool {
        self.size() < other.size()
    }

    /// Whether this file is larger than `other`.
    pub fn larger(&self, other: &FileInfo) -> bool {
        self.size() > other.size()
    }
}

impl PartialEq for FileInfo {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for FileInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.modified()?.cmp(&other.modified()?))
    }
}
