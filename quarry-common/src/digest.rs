use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;

use crate::HASH_BLOCK_SIZE;

/// The full hex-encoded 256-bit content hash of a database file.
///
/// Computed once, at startup, by streaming the file through a [`blake3::Hasher`]
/// in [`HASH_BLOCK_SIZE`] blocks. Stable across restarts given identical bytes.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Digest(blake3::Hash);

impl Digest {
    /// Streams `path` through the hasher in fixed-size blocks and returns its digest.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(HASH_BLOCK_SIZE, file);
        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; HASH_BLOCK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Digest(hasher.finalize()))
    }

    /// The full hex digest, e.g. `a1b2c3d4...` (64 hex characters).
    pub fn hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    /// The seven-hex-character prefix used as the canonical URL slug suffix.
    pub fn short(&self) -> String {
        self.hex()[..7].to_string()
    }
}

impl Deref for Digest {
    type Target = blake3::Hash;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn digest_is_stable_across_reads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"select 1").unwrap();
        let a = Digest::of_file(file.path()).unwrap();
        let b = Digest::of_file(file.path()).unwrap();
        assert_eq!(a.hex(), b.hex());
        assert_eq!(a.short().len(), 7);
    }

    #[test]
    fn digest_changes_with_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"one").unwrap();
        let a = Digest::of_file(file.path()).unwrap();
        let mut file2 = tempfile::NamedTempFile::new().unwrap();
        file2.write_all(b"two").unwrap();
        let b = Digest::of_file(file2.path()).unwrap();
        assert_ne!(a.hex(), b.hex());
    }
}
