//! Scan configuration.
//!
//! [`ScanConfig`] is the single source of defaults for the library and the
//! command-line tool. It can be loaded from JSON, where omitted fields take
//! their default values.

use crate::error::{BaseGuessError, Result};
use crate::io::IOLimits;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Default number of low bits used to match pointers against string offsets.
pub const DEFAULT_MASK_BITS: u32 = 16;
/// Default minimum length of a candidate string.
pub const DEFAULT_MIN_LENGTH: usize = 10;
/// Default chunk size for streamed reads (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 20;

/// Width of a pointer in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PointerSize {
    #[default]
    Four,
    Eight,
}

impl PointerSize {
    pub fn bytes(self) -> usize {
        match self {
            PointerSize::Four => 4,
            PointerSize::Eight => 8,
        }
    }

    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }
}

impl TryFrom<u32> for PointerSize {
    type Error = BaseGuessError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            4 => Ok(PointerSize::Four),
            8 => Ok(PointerSize::Eight),
            other => Err(BaseGuessError::invalid(format!(
                "pointer size must be 4 or 8 bytes, got {other}"
            ))),
        }
    }
}

impl From<PointerSize> for u32 {
    fn from(value: PointerSize) -> Self {
        value.bytes() as u32
    }
}

/// Byte order used to decode pointer words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Little-endian byte order
    #[default]
    Little,
    /// Big-endian byte order
    Big,
}

impl FromStr for Endianness {
    type Err = BaseGuessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endianness::Little),
            "big" | "be" => Ok(Endianness::Big),
            other => Err(BaseGuessError::invalid(format!(
                "endianness must be 'little' or 'big', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little"),
            Endianness::Big => write!(f, "big"),
        }
    }
}

/// How much a single (pointer, string) match contributes to its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoteWeighting {
    /// Every matching pair adds one vote.
    #[default]
    Unit,
    /// Every matching pair adds the size of the bucket it matched.
    BucketSize,
}

impl FromStr for VoteWeighting {
    type Err = BaseGuessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "unit" => Ok(VoteWeighting::Unit),
            "bucket-size" | "bucket" => Ok(VoteWeighting::BucketSize),
            other => Err(BaseGuessError::invalid(format!(
                "vote weighting must be 'unit' or 'bucket-size', got '{other}'"
            ))),
        }
    }
}

/// Configuration for a base address scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Byte order of pointer words.
    pub endianness: Endianness,
    /// Width of pointer words.
    pub pointer_size: PointerSize,
    /// Number of low bits compared between pointers and string offsets.
    pub mask_bits: u32,
    /// Minimum length of a candidate string, in bytes.
    pub min_length: usize,
    /// Byte terminating candidate strings.
    pub delimiter: u8,
    /// Weight of a single match.
    pub weighting: VoteWeighting,
    /// Vote over the pointer stream with rayon when the image is in memory.
    pub parallel: bool,
    /// Read size for the streaming scan.
    pub chunk_size: usize,
    /// Largest image that will be mapped.
    pub max_file_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endianness: Endianness::Little,
            pointer_size: PointerSize::Four,
            mask_bits: DEFAULT_MASK_BITS,
            min_length: DEFAULT_MIN_LENGTH,
            delimiter: 0x00,
            weighting: VoteWeighting::Unit,
            parallel: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_file_size: IOLimits::default().max_file_size,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ScanConfig = serde_json::from_str(&text)?;
        Ok(cfg)
    }

    /// Reject values the scan cannot work with.
    ///
    /// A mask wider than the pointer is accepted with a warning; such masks
    /// can only match pointers whose high bits happen to be zero.
    pub fn validate(&self) -> Result<()> {
        if self.mask_bits > 64 {
            return Err(BaseGuessError::invalid(format!(
                "mask width must be at most 64 bits, got {}",
                self.mask_bits
            )));
        }
        if self.min_length == 0 {
            return Err(BaseGuessError::invalid(
                "minimum string length must be at least 1",
            ));
        }
        if self.chunk_size < self.pointer_size.bytes() {
            return Err(BaseGuessError::invalid(format!(
                "chunk size {} is smaller than the pointer size",
                self.chunk_size
            )));
        }
        if self.mask_bits > self.pointer_size.bits() {
            warn!(
                mask_bits = self.mask_bits,
                pointer_bits = self.pointer_size.bits(),
                "Mask is wider than the pointer"
            );
        }
        Ok(())
    }

    /// The bit mask selecting the low `mask_bits` bits.
    pub fn mask(&self) -> u64 {
        make_mask(self.mask_bits)
    }

    pub fn io_limits(&self) -> IOLimits {
        IOLimits {
            max_file_size: self.max_file_size,
        }
    }
}

/// Build a mask of the low `bits` bits; 64 or more selects every bit.
pub fn make_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
