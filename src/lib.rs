//! A small, synchronous wrapper around native file, directory and path
//! operations.
//!
//! The crate has four pieces: string decomposition of path specs
//! ([`path`]), a scoped file handle for line and block I/O ([`File`]),
//! metadata snapshots ([`FileInfo`]) and directory utilities
//! ([`Directory`]). Failures are reported as `false` or empty results; the
//! `try_*` variants return the classified [`Error`] instead.
//!
//! A [`FileSystem`] carries its own current directory so relative specs can
//! be resolved without changing the process working directory.
//!
//! ```rust
//! # use fsys::{Block, Directory, File, FileInfo, Format, Mode, path};
//! let dir = std::env::temp_dir().join(format!("fsys-doc-{}", std::process::id()));
//! let dir = dir.to_string_lossy().into_owned();
//! assert!(Directory::create(&dir) || Directory::exists(&dir));
//!
//! let spec = path::file_spec(&dir, "data.bin");
//! let mut out = File::new(&spec);
//! assert!(out.open(Mode::Out, Format::Binary));
//! out.put_block(&Block::from("abcd"));
//! out.close();
//!
//! let info = FileInfo::new(&spec);
//! assert_eq!(info.name(), "data.bin");
//! assert_eq!(info.size(), 4);
//!
//! assert_eq!(Directory::get_files(&dir), vec!["data.bin"]);
//! assert!(File::remove(&spec));
//! assert!(Directory::remove(&dir));
//! ```

mod dir;
mod errors;
mod file;
mod file_info;
mod file_system;
pub mod hash;
pub mod path;
mod pattern;
pub mod utils;

pub use dir::Directory;
pub use dir::DirectoryEntry;
pub use dir::DirectoryListing;
pub use errors::Error;
pub use file::Block;
pub use file::File;
pub use file::Format;
pub use file::Mode;
pub use file_info::DateFormat;
pub use file_info::FileInfo;
pub use file_info::FileStat;
pub use file_system::FileSystem;
pub use pattern::Pattern;

#[cfg(feature = "test_utils")]
pub(crate) mod test_utils;
#[cfg(feature = "test_utils")]
pub use test_utils::TestRoot;
