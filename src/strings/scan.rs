//! In-memory candidate string scanner.

use super::{CandidateString, StringExtractor};
use bytes::Bytes;

/// Iterator over the candidate strings of a byte slice, in offset order.
#[derive(Debug, Clone)]
pub struct CStrings<'a> {
    data: &'a [u8],
    extractor: StringExtractor,
    pos: usize,
    done: bool,
}

impl<'a> CStrings<'a> {
    pub(super) fn new(data: &'a [u8], extractor: StringExtractor) -> Self {
        Self {
            data,
            extractor,
            pos: 0,
            done: false,
        }
    }
}

impl Iterator for CStrings<'_> {
    type Item = CandidateString;

    fn next(&mut self) -> Option<CandidateString> {
        while !self.done {
            let start = self.pos;
            let rest = &self.data[start..];
            // The final run has no delimiter but is still a run.
            let run = match memchr::memchr(self.extractor.delimiter, rest) {
                Some(i) => {
                    self.pos = start + i + 1;
                    &rest[..i]
                }
                None => {
                    self.done = true;
                    rest
                }
            };
            if self.extractor.accepts(run) {
                return Some(CandidateString {
                    offset: start as u64,
                    bytes: Bytes::copy_from_slice(run),
                });
            }
        }
        None
    }
}
