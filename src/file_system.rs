use std::env;
use std::fs;
use std::path::Path as StdPath;
use std::path::PathBuf;

use log::debug;

use crate::Directory;
use crate::DirectoryListing;
use crate::Error;
use crate::File;
use crate::FileInfo;
use crate::errors::Op;
use crate::path;

/// A view of the file system with its own current directory.
///
/// Relative specs passed to any method are resolved against the context's
/// current directory rather than the process working directory, which is
/// never read after construction and never written. Separate contexts are
/// independent of each other.
///
/// The current directory is kept in logical form, like a shell's `cd -L`:
/// symlinks are not expanded, so `full_file_spec(p)` is exactly what
/// `current_directory()` reports after `set_current_directory(p)`. File
/// operations join the spec onto it unchanged and leave `..` to the OS, so
/// they reach the same entry the OS would.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystem {
    // Absolute and free of `.`/`..`; symlinks are not expanded.
    cwd: PathBuf,
}

impl FileSystem {
    /// Creates a context starting in the process working directory.
    pub fn new() -> Result<Self, Error> {
        let cwd = env::current_dir().map_err(|e| Error::from_io("current directory", Op::Read, e))?;
        Self::with_current_dir(cwd)
    }

    /// Creates a context starting in `dir`, which must be an existing
    /// directory. A relative `dir` is taken from the process working
    /// directory.
    pub fn with_current_dir<P: AsRef<StdPath>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref();
        let cwd = if dir.is_absolute() {
            path::normalize(dir, ".")
        } else {
            let process_cwd =
                env::current_dir().map_err(|e| Error::from_io("current directory", Op::Read, e))?;
            path::normalize(&process_cwd, &dir.to_string_lossy())
        };
        Self::at_directory(cwd)
    }

    fn at_directory(cwd: PathBuf) -> Result<Self, Error> {
        let metadata = fs::metadata(&cwd)
            .map_err(|e| Error::from_io(cwd.display().to_string(), Op::Read, e))?;
        if !metadata.is_dir() {
            return Err(Error::InvalidPath {
                what: format!("not a directory: {}", cwd.display()),
            });
        }
        Ok(Self { cwd })
    }

    /// The current directory as an absolute path string.
    pub fn current_directory(&self) -> String {
        self.cwd.to_string_lossy().into_owned()
    }

    /// Changes the current directory to `full_file_spec(spec)`. Returns
    /// false, leaving the current directory unchanged, if that is not an
    /// existing directory.
    pub fn set_current_directory(&mut self, spec: &str) -> bool {
        match Self::at_directory(path::normalize(&self.cwd, spec)) {
            Ok(next) => {
                debug!("current directory {} -> {}", self.cwd.display(), next.cwd.display());
                *self = next;
                true
            }
            Err(e) => {
                debug!("set_current_directory failed: {e}");
                false
            }
        }
    }

    /// Absolute, normalized form of `spec`. `full_file_spec(".")` equals
    /// [`FileSystem::current_directory`].
    pub fn full_file_spec(&self, spec: &str) -> String {
        path::get_full_file_spec(&self.cwd, spec)
    }

    /// Path the OS is handed for `spec`: the current directory joined with
    /// `spec` as written, so `..` after a symlink follows the link target.
    pub fn resolve(&self, spec: &str) -> PathBuf {
        self.cwd.join(spec)
    }

    /// An unopened handle on `spec`. [`File::name`] reports `spec` as given.
    pub fn file(&self, spec: &str) -> File {
        File::with_path(spec, self.resolve(spec))
    }

    /// Metadata snapshot of `spec`.
    pub fn file_info(&self, spec: &str) -> FileInfo {
        FileInfo::at(spec, &self.resolve(spec), false)
    }

    /// See [`File::exists`].
    pub fn file_exists(&self, spec: &str) -> bool {
        File::exists(self.resolve(spec))
    }

    /// See [`File::copy`].
    pub fn copy_file(&self, src: &str, dst: &str, fail_if_exists: bool) -> bool {
        File::copy(self.resolve(src), self.resolve(dst), fail_if_exists)
    }

    /// See [`File::remove`].
    pub fn remove_file(&self, spec: &str) -> bool {
        File::remove(self.resolve(spec))
    }

    /// See [`Directory::exists`].
    pub fn dir_exists(&self, spec: &str) -> bool {
        Directory::exists(self.resolve(spec))
    }

    /// See [`Directory::create`].
    pub fn create_dir(&self, spec: &str) -> bool {
        Directory::create(self.resolve(spec))
    }

    /// See [`Directory::create_all`].
    pub fn create_dir_all(&self, spec: &str) -> bool {
        Directory::create_all(self.resolve(spec))
    }

    /// See [`Directory::remove`].
    pub fn remove_dir(&self, spec: &str) -> bool {
        Directory::remove(self.resolve(spec))
    }

    /// See [`Directory::get_files`].
    pub fn files(&self, spec: &str) -> Vec<String> {
        Directory::get_files(self.resolve(spec))
    }

    /// See [`Directory::get_files_matching`].
    pub fn files_matching(&self, spec: &str, pattern: &str) -> Vec<String> {
        Directory::get_files_matching(self.resolve(spec), pattern)
    }

    /// See [`Directory::get_directories`].
    pub fn directories(&self, spec: &str) -> Vec<String> {
        Directory::get_directories(self.resolve(spec))
    }

    /// See [`Directory::list`].
    pub fn list(&self, spec: &str) -> Result<DirectoryListing, Error> {
        Directory::list(self.resolve(spec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Block;
    use crate::Format;
    use crate::Mode;
    use crate::TestRoot;

    #[test]
    fn test_full_file_spec_of_dot() {
        let root = TestRoot::new(None).unwrap();
        let fs = root.fs();
        assert_eq!(fs.current_directory(), fs.full_file_spec("."));
    }

    #[test]
    fn test_get_and_set_current_directory() {
        let root = TestRoot::new(None).unwrap();
        let mut fs = root.fs();
        let curr_path = fs.current_directory();
        assert_eq!(curr_path, fs.full_file_spec("."));

        let tst_path = fs.full_file_spec("./temp");
        assert!(fs.set_current_directory("./temp"));
        assert_eq!(fs.current_directory(), tst_path);
        assert_eq!(fs.full_file_spec("."), tst_path);

        assert!(fs.set_current_directory(&curr_path));
        assert_eq!(fs.current_directory(), curr_path);

        assert!(fs.set_current_directory("temp"));
        assert!(fs.set_current_directory(".."));
        assert_eq!(fs.current_directory(), curr_path);
    }

    #[test]
    fn test_set_current_directory_rejects_bad_targets() {
        let root = TestRoot::new(None).unwrap();
        let mut fs = root.fs();
        let before = fs.current_directory();
        assert!(!fs.set_current_directory("foobar"));
        assert!(!fs.set_current_directory("test.txt"));
        assert_eq!(fs.current_directory(), before);
    }

    #[test]
    fn test_contexts_are_independent() {
        let root = TestRoot::new(None).unwrap();
        let process_cwd = std::env::current_dir().unwrap();
        let a = root.fs();
        let mut b = root.fs();
        assert!(b.set_current_directory("temp"));
        assert_ne!(a.current_directory(), b.current_directory());
        assert!(a.file_exists("test.txt"));
        assert!(!b.file_exists("test.txt"));
        assert_eq!(std::env::current_dir().unwrap(), process_cwd);
    }

    #[test]
    fn test_copy_scenario() {
        let root = TestRoot::new(None).unwrap();
        let fs = root.fs();
        assert!(fs.file_exists("test.txt"));
        assert!(fs.copy_file("test.txt", "dsttest.txt", true));
        assert!(fs.file_exists("test.txt") && fs.file_exists("dsttest.txt"));
        assert!(fs.remove_file("dsttest.txt"));
        assert!(!fs.file_exists("dsttest.txt"));
        assert!(fs.file_exists("test.txt"));
        assert!(!fs.remove_file("dsttest.txt"));
    }

    #[test]
    fn test_relative_file_io() {
        let root = TestRoot::new(None).unwrap();
        let mut fs = root.fs();
        assert!(fs.set_current_directory("temp"));

        let mut out = fs.file("../blocks.bin");
        assert_eq!(out.name(), "../blocks.bin");
        assert!(out.open(Mode::Out, Format::Binary));
        assert!(out.put_block(&Block::from("abcd")));
        out.close();

        let info = fs.file_info("../blocks.bin");
        assert!(info.good());
        assert_eq!(info.size(), 4);
        assert_eq!(info.name(), "blocks.bin");
        assert!(root.root.path().join("blocks.bin").exists());
    }

    #[test]
    fn test_relative_directories() {
        let root = TestRoot::new(None).unwrap();
        let mut fs = root.fs();
        assert!(fs.create_dir("./temp/TestDir") || fs.dir_exists("./temp/TestDir"));
        assert!(fs.set_current_directory("temp"));
        assert!(fs.dir_exists("TestDir"));
        assert_eq!(fs.directories("."), vec!["TestDir"]);
        assert!(fs.copy_file("../FileSystem.h", "TestDir/FileSystem.h", true));
        assert_eq!(fs.files("TestDir"), vec!["FileSystem.h"]);
        assert_eq!(fs.files_matching("TestDir", "*.cpp"), Vec::<String>::new());
        assert_eq!(fs.list("TestDir").unwrap().items.len(), 1);
        assert!(!fs.remove_dir("TestDir"));
        assert!(fs.remove_file("TestDir/FileSystem.h"));
        assert!(fs.remove_dir("TestDir"));
        assert!(!fs.dir_exists("TestDir"));

        assert!(fs.create_dir_all("x/y/z"));
        assert!(fs.dir_exists("x/y/z"));
    }

    #[test]
    fn test_new_uses_process_directory() {
        let fs = FileSystem::new().unwrap();
        let expected = std::env::current_dir().unwrap();
        assert_eq!(fs.current_directory(), expected.to_string_lossy());
    }

    #[test]
    fn test_with_current_dir_requires_directory() {
        let root = TestRoot::new(None).unwrap();
        assert!(matches!(
            FileSystem::with_current_dir(root.root.path().join("test.txt")),
            Err(Error::InvalidPath { .. })
        ));
        assert!(matches!(
            FileSystem::with_current_dir(root.root.path().join("foobar")),
            Err(Error::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory() {
        let root = TestRoot::new(None).unwrap();
        root.create_file("real/marker.txt", "marker\n").unwrap();
        std::fs::create_dir(root.root.path().join("real/sub")).unwrap();
        std::os::unix::fs::symlink(
            root.root.path().join("real/sub"),
            root.root.path().join("link"),
        )
        .unwrap();

        let mut fs = root.fs();
        let os_sees = root.root.path().join("link/../marker.txt").exists();
        assert!(os_sees);
        assert_eq!(fs.file_exists("link/../marker.txt"), os_sees);
        assert!(!fs.file_exists("marker.txt"));

        let expected = fs.full_file_spec("link");
        assert!(fs.set_current_directory("link"));
        assert_eq!(fs.current_directory(), expected);
        assert_eq!(fs.full_file_spec("."), expected);
        assert!(fs.file_exists("../marker.txt"));
    }
}
