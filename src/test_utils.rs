use std::fs;
use std::fs::create_dir_all;
use std::path::Path as StdPath;
use std::path::PathBuf;

use tempdir::TempDir;

use crate::Error;
use crate::FileSystem;

// File paths and contents to create in the temporary test root
pub(crate) static TEMP_FILES: &[(&str, &str, bool)] = &[
    ("test.txt", "a line of test text\n", false),
    ("FileSystem.h", "#pragma once\nnamespace FileSystem {}\n", false),
    (
        "FileSystem.cpp",
        "#include \"FileSystem.h\"\nusing namespace FileSystem;\n",
        false,
    ),
    ("temp", "", true),
];

/// Utility structure for managing a temporary test directory and its files.
#[derive(Debug)]
pub struct TestRoot {
    /// Root of the temporary test directory.
    pub root: TempDir,

    save_path: Option<PathBuf>,
}

impl TestRoot {
    /// Creates a new `TestRoot` seeded with the fixture files.
    ///
    /// With `save_path` the tree is copied to `/tmp/<save_path>` on drop so a
    /// failing test can be inspected.
    pub fn new(save_path: Option<&str>) -> Result<Self, Error> {
        let root = TempDir::new("fsys").map_err(|e| Error::Create {
            what: "temporary directory".into(),
            how: e.to_string(),
        })?;
        let ret = Self {
            root,
            save_path: save_path.map(|p| StdPath::new("/tmp/").join(p)),
        };
        for (relative_path, contents, is_dir) in TEMP_FILES {
            if *is_dir {
                create_dir_all(ret.root.path().join(relative_path)).map_err(|e| {
                    Error::Create {
                        what: format!("directory {relative_path}"),
                        how: e.to_string(),
                    }
                })?;
            } else {
                ret.create_file(relative_path, contents)?;
            }
        }
        Ok(ret)
    }

    /// Writes `content` to `relative_path`, creating parent directories.
    pub fn create_file(&self, relative_path: &str, content: &str) -> Result<(), Error> {
        let full_path = self.root.path().join(relative_path);
        let create_err = |e: std::io::Error| Error::Create {
            what: full_path.display().to_string(),
            how: e.to_string(),
        };
        if let Some(parent) = full_path.parent() {
            create_dir_all(parent).map_err(create_err)?;
        }
        fs::write(&full_path, content).map_err(create_err)
    }

    /// Absolute spec of `relative_path` inside the root.
    pub fn spec(&self, relative_path: &str) -> String {
        self.root.path().join(relative_path).display().to_string()
    }

    /// A context whose current directory is the root.
    pub fn fs(&self) -> FileSystem {
        FileSystem::with_current_dir(self.root.path()).expect("test root is a directory")
    }

    fn copy_dir_all(src: impl AsRef<StdPath>, dst: impl AsRef<StdPath>) -> std::io::Result<()> {
        create_dir_all(&dst)?;
        for entry in fs::read_dir(src)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                Self::copy_dir_all(entry.path(), dst.as_ref().join(entry.file_name()))?;
            } else {
                fs::copy(entry.path(), dst.as_ref().join(entry.file_name()))?;
            }
        }
        Ok(())
    }
}

impl Drop for TestRoot {
    fn drop(&mut self) {
        if let Some(save_path) = &self.save_path {
            let _ = Self::copy_dir_all(self.root.path(), save_path);
            println!("TestRoot preserved at {}", save_path.to_string_lossy());
        }
    }
}
