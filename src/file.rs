use std::fs;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path as StdPath;
use std::path::PathBuf;

use log::debug;
use log::trace;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::errors::Op;

// Largest up-front allocation for a block read.
const BLOCK_PREALLOC: usize = 64 * 1024;

/// An owned, contiguous run of bytes used for binary I/O.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub struct Block(Vec<u8>);

impl Block {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes in the block.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the block holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the block and returns its bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Block {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Block {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Block {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for Block {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Direction a `File` is opened in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Mode {
    /// Read from the start of an existing file.
    In,
    /// Create or truncate, then write.
    Out,
    /// Create if missing, then write after the existing content.
    Append,
}

/// How records are framed when reading lines.
///
/// On write both formats pass bytes through unchanged. On read, `Text`
/// additionally drops a `\r` that precedes the line terminator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Format {
    /// Line oriented text.
    #[default]
    Text,
    /// Raw bytes.
    Binary,
}

enum Stream {
    Closed,
    Reader(BufReader<fs::File>),
    Writer(BufWriter<fs::File>),
}

/// A single file handle, opened explicitly and closed explicitly or on drop.
///
/// Operations never panic and never return `Err`: failures show up as
/// `false` or empty results, the cause is kept in [`File::error`], and
/// [`File::is_good`] turns false.
pub struct File {
    spec: String,
    path: PathBuf,
    stream: Stream,
    format: Format,
    eof: bool,
    error: Option<Error>,
}

impl File {
    /// Creates a handle for `spec` without touching the disk.
    pub fn new(spec: &str) -> Self {
        Self::with_path(spec, PathBuf::from(spec))
    }

    /// Creates a handle named `spec` that operates on `path`.
    pub(crate) fn with_path(spec: &str, path: PathBuf) -> Self {
        Self {
            spec: spec.to_string(),
            path,
            stream: Stream::Closed,
            format: Format::default(),
            eof: false,
            error: None,
        }
    }

    /// The spec this file was created with.
    pub fn name(&self) -> &str {
        &self.spec
    }

    /// The path the OS handle is opened on.
    pub fn path(&self) -> &StdPath {
        &self.path
    }

    /// The last failure recorded on this handle.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    fn fail(&mut self, err: Error) {
        debug!("{}: {err}", self.spec);
        self.error = Some(err);
    }

    fn io_fail(&mut self, op: Op, err: io::Error) {
        let err = Error::from_io(&self.spec, op, err);
        self.fail(err);
    }

    /// Opens the OS handle, closing any previous one first.
    pub fn open(&mut self, mode: Mode, format: Format) -> bool {
        self.close();
        self.eof = false;
        self.error = None;
        self.format = format;
        let opened = match mode {
            Mode::In => fs::File::open(&self.path).map(|f| Stream::Reader(BufReader::new(f))),
            Mode::Out => fs::File::create(&self.path).map(|f| Stream::Writer(BufWriter::new(f))),
            Mode::Append => fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map(|f| Stream::Writer(BufWriter::new(f))),
        };
        match opened {
            Ok(stream) => {
                debug!("opened {} ({mode:?}, {format:?})", self.spec);
                self.stream = stream;
                true
            }
            Err(e) => {
                let op = if mode == Mode::In { Op::Read } else { Op::Create };
                self.io_fail(op, e);
                false
            }
        }
    }

    /// Opens the OS handle in text format.
    pub fn open_text(&mut self, mode: Mode) -> bool {
        self.open(mode, Format::Text)
    }

    /// Whether the handle is open, error free and not at end of stream.
    pub fn is_good(&self) -> bool {
        !matches!(self.stream, Stream::Closed) && self.error.is_none() && !self.eof
    }

    fn write_bytes(&mut self, bytes: &[&[u8]]) -> bool {
        let Stream::Writer(writer) = &mut self.stream else {
            let err = Error::NotOpen(self.spec.clone());
            self.fail(err);
            return false;
        };
        let written = bytes.iter().try_for_each(|b| writer.write_all(b));
        match written {
            Ok(()) => true,
            Err(e) => {
                self.io_fail(Op::Write, e);
                false
            }
        }
    }

    /// Writes `line` followed by a newline.
    pub fn put_line(&mut self, line: &str) -> bool {
        trace!("{} <- {line:?}", self.spec);
        self.write_bytes(&[line.as_bytes(), &b"\n"[..]])
    }

    /// Reads one line without its terminator.
    ///
    /// At end of stream the result is empty and `is_good` becomes false.
    pub fn get_line(&mut self) -> String {
        let Stream::Reader(reader) = &mut self.stream else {
            let err = Error::NotOpen(self.spec.clone());
            self.fail(err);
            return String::new();
        };
        if self.eof {
            return String::new();
        }
        let mut buf = Vec::new();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.eof = true;
                String::new()
            }
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                    if self.format == Format::Text && buf.last() == Some(&b'\r') {
                        buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&buf).into_owned();
                trace!("{} -> {line:?}", self.spec);
                line
            }
            Err(e) => {
                self.io_fail(Op::Read, e);
                String::new()
            }
        }
    }

    /// Writes the bytes of `block` unchanged.
    pub fn put_block(&mut self, block: &Block) -> bool {
        self.write_bytes(&[block.as_bytes()])
    }

    /// Reads up to `size` bytes.
    ///
    /// A block shorter than `size` means the end of stream was reached.
    pub fn get_block(&mut self, size: usize) -> Block {
        let Stream::Reader(reader) = &mut self.stream else {
            let err = Error::NotOpen(self.spec.clone());
            self.fail(err);
            return Block::new();
        };
        // `size` is a caller-supplied upper bound; the buffer grows with what
        // is actually read.
        let mut buf = Vec::with_capacity(size.min(BLOCK_PREALLOC));
        match reader.by_ref().take(size as u64).read_to_end(&mut buf) {
            Ok(read) => {
                if read < size {
                    self.eof = true;
                }
                Block::from(buf)
            }
            Err(e) => {
                self.io_fail(Op::Read, e);
                Block::from(buf)
            }
        }
    }

    /// Pushes buffered writes to the OS. A read handle has nothing to flush.
    pub fn flush(&mut self) -> bool {
        match &mut self.stream {
            Stream::Closed => false,
            Stream::Reader(_) => true,
            Stream::Writer(writer) => match writer.flush() {
                Ok(()) => true,
                Err(e) => {
                    self.io_fail(Op::Write, e);
                    false
                }
            },
        }
    }

    /// Flushes and releases the OS handle. Calling it again does nothing.
    pub fn close(&mut self) {
        if matches!(self.stream, Stream::Closed) {
            return;
        }
        self.flush();
        self.stream = Stream::Closed;
        debug!("closed {}", self.spec);
    }

    /// Whether anything exists at `spec`. A symlink counts even when its
    /// target is missing.
    pub fn exists<P: AsRef<StdPath>>(spec: P) -> bool {
        fs::symlink_metadata(spec).is_ok()
    }

    /// Copies `src` to `dst` byte for byte and returns the number of bytes
    /// copied.
    ///
    /// With `fail_if_exists` an existing `dst` is left untouched and
    /// `Error::FileExists` is returned. `src` must be a regular file; nothing
    /// is created at `dst` otherwise.
    pub fn try_copy<S: AsRef<StdPath>, D: AsRef<StdPath>>(
        src: S,
        dst: D,
        fail_if_exists: bool,
    ) -> Result<u64, Error> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        let what = format!("{} to {}", src.display(), dst.display());
        let mut reader =
            fs::File::open(src).map_err(|e| Error::from_io(src.display().to_string(), Op::Read, e))?;
        let metadata = reader
            .metadata()
            .map_err(|e| Error::from_io(src.display().to_string(), Op::Read, e))?;
        if !metadata.is_file() {
            return Err(Error::Copy {
                what,
                how: "source is not a regular file".into(),
            });
        }
        if !fail_if_exists {
            return fs::copy(src, dst).map_err(|e| Error::from_io(&what, Op::Copy, e));
        }
        let mut writer = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dst)
            .map_err(|e| Error::from_io(dst.display().to_string(), Op::Create, e))?;
        match io::copy(&mut reader, &mut writer) {
            Ok(copied) => Ok(copied),
            Err(e) => {
                // The destination was created above; don't leave a partial copy.
                drop(writer);
                let _ = fs::remove_file(dst);
                Err(Error::from_io(&what, Op::Copy, e))
            }
        }
    }

    /// Boolean form of [`File::try_copy`].
    pub fn copy<S: AsRef<StdPath>, D: AsRef<StdPath>>(src: S, dst: D, fail_if_exists: bool) -> bool {
        match Self::try_copy(src, dst, fail_if_exists) {
            Ok(_) => true,
            Err(e) => {
                debug!("copy failed: {e}");
                false
            }
        }
    }

    /// Deletes the file at `spec`.
    pub fn try_remove<P: AsRef<StdPath>>(spec: P) -> Result<(), Error> {
        let spec = spec.as_ref();
        fs::remove_file(spec).map_err(|e| Error::from_io(spec.display().to_string(), Op::Delete, e))
    }

    /// Boolean form of [`File::try_remove`].
    pub fn remove<P: AsRef<StdPath>>(spec: P) -> bool {
        match Self::try_remove(spec) {
            Ok(()) => true,
            Err(e) => {
                debug!("remove failed: {e}");
                false
            }
        }
    }
}

impl Drop for File {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("spec", &self.spec)
            .field("path", &self.path)
            .field("open", &!matches!(self.stream, Stream::Closed))
            .field("format", &self.format)
            .field("eof", &self.eof)
            .field("error", &self.error)
            .finish()
    }
}
