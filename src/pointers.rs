//! Pointer-sized word decoding.
//!
//! The image is read as non-overlapping words of the configured width and
//! byte order, starting at offset 0. A trailing partial word is dropped.

use crate::config::{Endianness, PointerSize};
use std::io::{self, BufReader, Read};

/// A decoded pointer-sized word and the file offset it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerWord {
    pub offset: u64,
    pub value: u64,
}

/// Decode one word. `bytes` must be exactly 4 or 8 bytes long.
#[inline]
pub fn decode_word(bytes: &[u8], endianness: Endianness) -> u64 {
    match (bytes.len(), endianness) {
        (4, Endianness::Little) => {
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64
        }
        (4, Endianness::Big) => u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64,
        (_, endianness) => {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[..8]);
            match endianness {
                Endianness::Little => u64::from_le_bytes(word),
                Endianness::Big => u64::from_be_bytes(word),
            }
        }
    }
}

/// Iterator over the pointer words of a byte slice.
#[derive(Debug, Clone)]
pub struct PointerChunker<'a> {
    chunks: std::slice::ChunksExact<'a, u8>,
    endianness: Endianness,
    stride: u64,
    offset: u64,
}

impl<'a> PointerChunker<'a> {
    pub fn new(data: &'a [u8], pointer_size: PointerSize, endianness: Endianness) -> Self {
        Self::with_base_offset(data, 0, pointer_size, endianness)
    }

    /// Chunk a sub-slice of a larger image that starts at `base_offset`.
    pub fn with_base_offset(
        data: &'a [u8],
        base_offset: u64,
        pointer_size: PointerSize,
        endianness: Endianness,
    ) -> Self {
        Self {
            chunks: data.chunks_exact(pointer_size.bytes()),
            endianness,
            stride: pointer_size.bytes() as u64,
            offset: base_offset,
        }
    }
}

impl Iterator for PointerChunker<'_> {
    type Item = PointerWord;

    fn next(&mut self) -> Option<PointerWord> {
        let chunk = self.chunks.next()?;
        let word = PointerWord {
            offset: self.offset,
            value: decode_word(chunk, self.endianness),
        };
        self.offset += self.stride;
        Some(word)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for PointerChunker<'_> {}

/// Iterator over the pointer words of a reader.
pub struct ReaderPointerChunker<R> {
    reader: BufReader<R>,
    endianness: Endianness,
    stride: usize,
    offset: u64,
    done: bool,
}

impl<R: Read> ReaderPointerChunker<R> {
    pub fn new(
        reader: R,
        pointer_size: PointerSize,
        endianness: Endianness,
        chunk_size: usize,
    ) -> Self {
        Self {
            reader: BufReader::with_capacity(chunk_size.max(pointer_size.bytes()), reader),
            endianness,
            stride: pointer_size.bytes(),
            offset: 0,
            done: false,
        }
    }
}

impl<R: Read> Iterator for ReaderPointerChunker<R> {
    type Item = io::Result<PointerWord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut word = [0u8; 8];
        let word = &mut word[..self.stride];
        match self.reader.read_exact(word) {
            Ok(()) => {
                let out = PointerWord {
                    offset: self.offset,
                    value: decode_word(word, self.endianness),
                };
                self.offset += self.stride as u64;
                Some(Ok(out))
            }
            // A short final read is the dropped partial word.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
