use std::fs;
use std::fs::DirEntry;
use std::path::Path as StdPath;

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::FileStat;
use crate::errors::Op;
use crate::pattern::Pattern;

/// Represents a file or directory entry, including its name and associated
/// metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct DirectoryEntry {
    /// Name of the file or directory.
    pub name: String,
    /// Metadata of the file or directory.
    pub stats: FileStat,
}

impl TryFrom<&DirEntry> for DirectoryEntry {
    type Error = Error;
    fn try_from(entry: &DirEntry) -> Result<Self, crate::Error> {
        let stats = FileStat::from_path(entry.path())?;
        Ok(Self {
            name: entry.file_name().to_string_lossy().into_owned(),
            stats,
        })
    }
}

/// Represents the contents of a directory, including the listed path and its
/// items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct DirectoryListing {
    /// The listed directory.
    pub path: String,
    /// The list of files and directories in `path`, in the order the OS
    /// reported them.
    pub items: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    /// Names of the regular files in the listing.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|e| !e.stats.is_directory)
            .map(|e| e.name.as_str())
    }

    /// Names of the subdirectories in the listing.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(|e| e.stats.is_directory)
            .map(|e| e.name.as_str())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Directory,
}

/// Directory utilities. All functions operate directly on the given path;
/// relative paths are resolved by the OS against the process working
/// directory. Use [`crate::FileSystem`] to resolve against an explicit one.
pub struct Directory;

impl Directory {
    /// Whether `path` names an existing directory.
    pub fn exists<P: AsRef<StdPath>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Creates a single directory. The parent must already exist.
    ///
    /// An existing directory is reported as `Error::FileExists`.
    pub fn try_create<P: AsRef<StdPath>>(path: P) -> Result<(), Error> {
        let path = path.as_ref();
        fs::create_dir(path).map_err(|e| Error::from_io(path.display().to_string(), Op::Create, e))
    }

    /// Boolean form of [`Directory::try_create`]. Callers that only care
    /// whether the directory is there afterwards should check
    /// `create(p) || exists(p)`.
    pub fn create<P: AsRef<StdPath>>(path: P) -> bool {
        log_failure("create", Self::try_create(path))
    }

    /// Creates a directory and any missing parents. Succeeds when the
    /// directory already exists.
    pub fn try_create_all<P: AsRef<StdPath>>(path: P) -> Result<(), Error> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .map_err(|e| Error::from_io(path.display().to_string(), Op::Create, e))
    }

    /// Boolean form of [`Directory::try_create_all`].
    pub fn create_all<P: AsRef<StdPath>>(path: P) -> bool {
        log_failure("create_all", Self::try_create_all(path))
    }

    /// Removes an empty directory.
    pub fn try_remove<P: AsRef<StdPath>>(path: P) -> Result<(), Error> {
        let path = path.as_ref();
        fs::remove_dir(path).map_err(|e| Error::from_io(path.display().to_string(), Op::Delete, e))
    }

    /// Boolean form of [`Directory::try_remove`]. False for a missing or
    /// non-empty directory.
    pub fn remove<P: AsRef<StdPath>>(path: P) -> bool {
        log_failure("remove", Self::try_remove(path))
    }

    /// Lists the entries directly inside `path` with their metadata.
    /// Entries whose metadata cannot be read, such as dangling symlinks, are
    /// skipped the same way [`Directory::get_files`] skips them.
    pub fn list<P: AsRef<StdPath>>(path: P) -> Result<DirectoryListing, Error> {
        let path = path.as_ref();
        let mut items = Vec::new();
        for entry in read_dir(path)? {
            match DirectoryEntry::try_from(&entry) {
                Ok(item) => items.push(item),
                Err(e) => debug!("list skipped {}: {e}", entry.path().display()),
            }
        }
        Ok(DirectoryListing {
            path: path.display().to_string(),
            items,
        })
    }

    /// Names of regular files directly inside `path` matching `pattern`. A
    /// malformed pattern is reported as [`Error::Parse`].
    pub fn try_get_files<P: AsRef<StdPath>>(path: P, pattern: &str) -> Result<Vec<String>, Error> {
        names(path.as_ref(), Kind::File, &Pattern::new(pattern)?)
    }

    /// Names of regular files directly inside `path`, in OS order.
    pub fn get_files<P: AsRef<StdPath>>(path: P) -> Vec<String> {
        Self::get_files_matching(path, "*")
    }

    /// Names of regular files directly inside `path` matching a glob pattern
    /// such as `"*.cpp"`. Empty for a malformed pattern.
    pub fn get_files_matching<P: AsRef<StdPath>>(path: P, pattern: &str) -> Vec<String> {
        Self::try_get_files(path, pattern)
            .inspect_err(|e| debug!("get_files failed: {e}"))
            .unwrap_or_default()
    }

    /// Names of subdirectories directly inside `path`.
    pub fn try_get_directories<P: AsRef<StdPath>>(path: P) -> Result<Vec<String>, Error> {
        names(path.as_ref(), Kind::Directory, &Pattern::any())
    }

    /// Names of subdirectories directly inside `path`, in OS order. `.` and
    /// `..` are never included.
    pub fn get_directories<P: AsRef<StdPath>>(path: P) -> Vec<String> {
        Self::try_get_directories(path)
            .inspect_err(|e| debug!("get_directories failed: {e}"))
            .unwrap_or_default()
    }
}

fn log_failure(op: &str, result: Result<(), Error>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!("{op} failed: {e}");
            false
        }
    }
}

fn read_dir(path: &StdPath) -> Result<Vec<DirEntry>, Error> {
    let what = path.display().to_string();
    fs::read_dir(path)
        .map_err(|e| Error::from_io(&what, Op::Read, e))?
        .map(|entry| entry.map_err(|e| Error::from_io(&what, Op::Read, e)))
        .collect()
}

fn names(path: &StdPath, kind: Kind, pattern: &Pattern) -> Result<Vec<String>, Error> {
    let mut ret = Vec::new();
    for entry in read_dir(path)? {
        // Follow symlinks so a link to a directory counts as a directory.
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("skipped {}: {e}", entry.path().display());
                continue;
            }
        };
        let found = if metadata.is_dir() {
            Kind::Directory
        } else if metadata.is_file() {
            Kind::File
        } else {
            continue;
        };
        if found != kind {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if pattern.matches(&name) {
            ret.push(name);
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::File;
    use crate::TestRoot;
    use crate::path::file_spec;

    #[test]
    fn test_create_remove_exists() {
        let root = TestRoot::new(None).unwrap();
        let path = root.spec("temp/TestDir");

        assert!(Directory::create(&path) || Directory::exists(&path));
        assert!(Directory::exists(&path));
        assert!(Directory::remove(&path) || !Directory::exists(&path));
        assert!(!Directory::exists(&path));
    }

    #[test]
    fn test_create_existing_reports_false() {
        let root = TestRoot::new(None).unwrap();
        let path = root.spec("temp");
        assert!(!Directory::create(&path));
        assert!(matches!(
            Directory::try_create(&path),
            Err(Error::FileExists(_))
        ));
        assert!(Directory::create(&path) || Directory::exists(&path));
    }

    #[test]
    fn test_create_is_single_level() {
        let root = TestRoot::new(None).unwrap();
        let nested = root.spec("temp/a/b/c");
        assert!(!Directory::create(&nested));
        assert!(matches!(
            Directory::try_create(&nested),
            Err(Error::NotFound(_))
        ));
        assert!(Directory::create_all(&nested));
        assert!(Directory::exists(&nested));
        assert!(Directory::create_all(&nested));
    }

    #[test]
    fn test_file_is_not_directory() {
        let root = TestRoot::new(None).unwrap();
        assert!(!Directory::exists(root.spec("test.txt")));
        assert!(!Directory::exists(root.spec("foobar")));
    }

    #[test]
    fn test_remove_non_empty_fails() {
        let root = TestRoot::new(None).unwrap();
        let dir = root.spec("temp/full");
        assert!(Directory::create(&dir));
        assert!(File::copy(root.spec("test.txt"), file_spec(&dir, "test.txt"), true));

        assert!(!Directory::remove(&dir));
        assert!(matches!(
            Directory::try_remove(&dir),
            Err(Error::DirectoryNotEmpty(_))
        ));
        assert!(Directory::exists(&dir));
        assert!(!Directory::remove(root.spec("temp/missing")));
    }

    #[test]
    fn test_get_files_and_directories() {
        let root = TestRoot::new(None).unwrap();
        let temp = root.spec("temp");
        let dst_path = file_spec(&temp, "testDir1");

        assert!(Directory::create(&dst_path));
        let dst_file1 = file_spec(&dst_path, "FileSystem.h");
        let dst_file2 = file_spec(&dst_path, "FileSystem.cpp");
        assert!(File::copy(root.spec("FileSystem.h"), &dst_file1, true));
        assert!(File::copy(root.spec("FileSystem.cpp"), &dst_file2, true));
        assert!(File::exists(&dst_file1) && File::exists(&dst_file2));

        let files = Directory::get_files(&dst_path);
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f == "FileSystem.h"));
        assert!(files.iter().any(|f| f == "FileSystem.cpp"));

        assert_eq!(
            Directory::get_files_matching(&dst_path, "*.cpp"),
            vec!["FileSystem.cpp".to_string()]
        );

        assert!(Directory::create(file_spec(&temp, "testDir2")));
        assert!(Directory::create(file_spec(&temp, "testDir3")));
        let mut dirs = Directory::get_directories(&temp);
        dirs.sort();
        assert_eq!(dirs, vec!["testDir1", "testDir2", "testDir3"]);
        assert!(Directory::get_files(&temp).is_empty());

        assert!(!Directory::remove(file_spec(&temp, "testDir1")));
        assert!(Directory::remove(file_spec(&temp, "testDir2")));
        assert!(Directory::remove(file_spec(&temp, "testDir3")));
    }

    #[test]
    fn test_listing_missing_directory() {
        let root = TestRoot::new(None).unwrap();
        let missing = root.spec("foobar");
        assert!(Directory::get_files(&missing).is_empty());
        assert!(Directory::get_directories(&missing).is_empty());
        assert!(matches!(
            Directory::try_get_files(&missing, "*"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(Directory::list(&missing), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_with_stats() {
        let root = TestRoot::new(None).unwrap();
        let listing = Directory::list(root.spec("")).unwrap();

        let mut files: Vec<&str> = listing.files().collect();
        files.sort();
        assert_eq!(files, vec!["FileSystem.cpp", "FileSystem.h", "test.txt"]);
        assert_eq!(listing.directories().collect::<Vec<_>>(), vec!["temp"]);

        let test_txt = listing.items.iter().find(|e| e.name == "test.txt").unwrap();
        assert_eq!(
            test_txt.stats.size,
            std::fs::metadata(root.spec("test.txt")).unwrap().len()
        );
        println!("{}", serde_json::to_string_pretty(&listing).unwrap());
    }

    #[test]
    fn test_malformed_pattern() {
        let root = TestRoot::new(None).unwrap();
        assert!(matches!(
            Directory::try_get_files(root.spec(""), "[abc"),
            Err(Error::Parse { .. })
        ));
        assert!(Directory::get_files_matching(root.spec(""), "[abc").is_empty());
        assert_eq!(
            Directory::get_files_matching(root.spec(""), "FileSystem.[ch]"),
            vec!["FileSystem.h".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let root = TestRoot::new(None).unwrap();
        std::os::unix::fs::symlink(root.spec("gone.txt"), root.spec("dangling")).unwrap();

        let mut files = Directory::get_files(root.spec(""));
        files.sort();
        assert_eq!(files, vec!["FileSystem.cpp", "FileSystem.h", "test.txt"]);

        let listing = Directory::list(root.spec("")).unwrap();
        assert_eq!(listing.items.len(), 4);
        assert!(listing.items.iter().all(|e| e.name != "dangling"));
    }
}
