//! Load base address estimation for raw firmware and memory images.
//!
//! The image is scanned for printable, delimiter-terminated strings and for
//! pointer-sized words. Every word whose low bits match the low bits of a
//! string offset votes for `word - offset` as the load base; the most voted
//! base is the guess.
//!
//! ```no_run
//! use baseguess::{scan_file, ScanConfig};
//!
//! let outcome = scan_file("firmware.bin", &ScanConfig::default())?;
//! println!("{:#x}", outcome.best()?.base);
//! # Ok::<(), baseguess::BaseGuessError>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod io;
pub mod logging;
pub mod pointers;
pub mod scan;
pub mod select;
pub mod strings;
pub mod vote;

pub use config::{Endianness, PointerSize, ScanConfig, VoteWeighting};
pub use error::{BaseGuessError, Result};
pub use index::MaskedStringIndex;
pub use pointers::{PointerChunker, PointerWord};
pub use scan::{guess_base, scan_bytes, scan_file, scan_reader, ScanOutcome, ScanReport};
pub use select::{BaseCandidate, ResultSelector};
pub use strings::{CandidateString, StringExtractor};
pub use vote::{BaseVoter, VoteTable};
