//! Candidate string extraction.
//!
//! The image is split into runs separated by a delimiter byte. A run is a
//! candidate string when it is long enough and made entirely of printable
//! ASCII. Both the in-memory scanner ([`CStrings`]) and the chunked reader
//! scanner ([`StreamingStrings`]) report identical runs at identical
//! absolute offsets.

mod scan;
mod stream;

pub use scan::CStrings;
pub use stream::StreamingStrings;

use crate::config::ScanConfig;
use bytes::Bytes;
use serde::Serialize;
use std::io::Read;

/// A printable, delimiter-terminated run found in the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateString {
    /// File offset of the first byte of the run.
    pub offset: u64,
    /// The run itself, without its delimiter.
    pub bytes: Bytes,
}

impl CandidateString {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The string as text. Candidates are printable ASCII, so this is lossless.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl Serialize for CandidateString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("CandidateString", 2)?;
        st.serialize_field("offset", &self.offset)?;
        st.serialize_field("text", &self.text())?;
        st.end()
    }
}

/// Printable ASCII: digits, letters, punctuation, space and `\t\n\r\x0b\x0c`.
#[inline]
pub fn is_printable(b: u8) -> bool {
    b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Splits an image into candidate strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringExtractor {
    pub delimiter: u8,
    pub min_length: usize,
}

impl Default for StringExtractor {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl StringExtractor {
    pub fn new(delimiter: u8, min_length: usize) -> Self {
        Self {
            delimiter,
            min_length,
        }
    }

    pub fn from_config(cfg: &ScanConfig) -> Self {
        Self::new(cfg.delimiter, cfg.min_length)
    }

    /// Whether a complete run qualifies as a candidate string.
    pub fn accepts(&self, run: &[u8]) -> bool {
        run.len() >= self.min_length && run.iter().all(|&b| is_printable(b))
    }

    /// Lazily scan an in-memory image. Each call starts over at offset 0.
    pub fn iter<'a>(&self, data: &'a [u8]) -> CStrings<'a> {
        CStrings::new(data, *self)
    }

    /// Lazily scan a reader in chunks of `chunk_size` bytes.
    pub fn stream<R: Read>(&self, reader: R, chunk_size: usize) -> StreamingStrings<R> {
        StreamingStrings::new(reader, *self, chunk_size)
    }
}
