//! Chunked candidate string scanner for readers.
//!
//! The run in progress is carried across chunk boundaries together with its
//! absolute start offset. Once a run contains a non-printable byte its bytes
//! are dropped and only the delimiter is searched for.

use super::{is_printable, CandidateString, StringExtractor};
use bytes::Bytes;
use std::io::{self, Read};
use tracing::trace;

/// Iterator over the candidate strings of a reader, in offset order.
pub struct StreamingStrings<R> {
    reader: R,
    extractor: StringExtractor,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    /// Absolute offset of `buf[pos]`.
    offset: u64,
    run: Vec<u8>,
    run_start: u64,
    run_printable: bool,
    done: bool,
}

impl<R: Read> StreamingStrings<R> {
    pub(super) fn new(reader: R, extractor: StringExtractor, chunk_size: usize) -> Self {
        Self {
            reader,
            extractor,
            buf: vec![0; chunk_size.max(1)],
            pos: 0,
            filled: 0,
            offset: 0,
            run: Vec::new(),
            run_start: 0,
            run_printable: true,
            done: false,
        }
    }

    fn extend_run(&mut self, start: usize, end: usize) {
        if self.run_printable {
            let part = &self.buf[start..end];
            if part.iter().all(|&b| is_printable(b)) {
                self.run.extend_from_slice(part);
            } else {
                self.run_printable = false;
                self.run.clear();
            }
        }
    }

    /// Close the current run and start the next one at `next_start`.
    fn close_run(&mut self, next_start: u64) -> Option<CandidateString> {
        let candidate = if self.run_printable && self.run.len() >= self.extractor.min_length {
            Some(CandidateString {
                offset: self.run_start,
                bytes: Bytes::from(std::mem::take(&mut self.run)),
            })
        } else {
            None
        };
        self.run.clear();
        self.run_printable = true;
        self.run_start = next_start;
        candidate
    }

    fn fill(&mut self) -> io::Result<usize> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => {
                    self.pos = 0;
                    self.filled = n;
                    trace!(offset = self.offset, len = n, "Read string chunk");
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for StreamingStrings<R> {
    type Item = io::Result<CandidateString>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.pos == self.filled {
                match self.fill() {
                    Ok(0) => {
                        self.done = true;
                        // The final run has no delimiter but is still a run.
                        return self.close_run(self.offset).map(Ok);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }

            let start = self.pos;
            let window = &self.buf[start..self.filled];
            match memchr::memchr(self.extractor.delimiter, window) {
                Some(i) => {
                    self.extend_run(start, start + i);
                    self.pos = start + i + 1;
                    self.offset += i as u64 + 1;
                    if let Some(candidate) = self.close_run(self.offset) {
                        return Some(Ok(candidate));
                    }
                }
                None => {
                    let end = self.filled;
                    self.extend_run(start, end);
                    self.offset += (end - start) as u64;
                    self.pos = end;
                }
            }
        }
        None
    }
}
