//! SHA-256 digests of file and buffer contents.
use std::fs;
use std::io::Read;
use std::path::Path;

use sha2::Digest;
use sha2::Sha256;

use crate::errors::Error;
use crate::errors::Op;

/// Feeds some content into a fresh SHA-256 context.
pub trait Sha256Builder {
    /// Returns a context that has consumed all of `self`.
    fn sha256_build(&self) -> Result<Sha256, Error>;
}

/// Finishes a SHA-256 context into lowercase hex.
pub trait Sha256String {
    /// Consumes the context and returns its hex digest.
    fn sha256_string(self) -> String;
}

impl Sha256String for Sha256 {
    fn sha256_string(self) -> String {
        format!("{:x}", self.finalize())
    }
}

impl Sha256Builder for &Path {
    fn sha256_build(&self) -> Result<Sha256, Error> {
        let what = self.to_string_lossy().to_string();
        let mut file = fs::File::open(self).map_err(|e| Error::from_io(&what, Op::Read, e))?;
        let mut context = Sha256::new();
        let mut buffer = vec![0; 4096]; // Read in chunks

        loop {
            let bytes_read = file
                .read(&mut buffer)
                .map_err(|e| Error::from_io(&what, Op::Read, e))?;

            if bytes_read == 0 {
                break; // End of file
            }
            context.update(&buffer[..bytes_read]);
        }
        Ok(context)
    }
}

impl Sha256Builder for &[u8] {
    fn sha256_build(&self) -> Result<Sha256, Error> {
        let mut context = Sha256::new();
        context.update(self);
        Ok(context)
    }
}
