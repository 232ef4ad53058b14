//! The scan pipeline: extract strings, index them, vote, rank.
//!
//! Three entry points share the same passes. [`scan_bytes`] works on a
//! slice, [`scan_file`] maps a file read-only and scans the mapping, and
//! [`scan_reader`] streams a seekable reader twice with bounded buffers.

use crate::config::ScanConfig;
use crate::error::{BaseGuessError, Result};
use crate::index::MaskedStringIndex;
use crate::io::MappedImage;
use crate::pointers::ReaderPointerChunker;
use crate::select::{BaseCandidate, ResultSelector};
use crate::strings::StringExtractor;
use crate::vote::{vote_slice, vote_slice_parallel, BaseVoter, VoteStats, VoteTable};
use serde::Serialize;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info_span};

/// Counters describing one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Bytes in the image.
    pub image_len: u64,
    /// Candidate strings indexed.
    pub strings: u64,
    /// Populated index buckets.
    pub buckets: u64,
    #[serde(flatten)]
    pub votes: VoteStats,
}

/// The vote table of a finished scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub table: VoteTable,
    pub stats: ScanStats,
}

impl ScanOutcome {
    pub fn selector(&self) -> ResultSelector<'_> {
        ResultSelector::new(&self.table)
    }

    /// The most voted base address.
    pub fn best(&self) -> Result<BaseCandidate> {
        if self.stats.strings == 0 {
            return Err(BaseGuessError::EmptyResult {
                reason: "no candidate strings found in the image".to_string(),
            });
        }
        self.selector().best()
    }

    pub fn top_k(&self, k: usize) -> Vec<BaseCandidate> {
        self.selector().top_k(k)
    }

    /// Summarize the scan with the `k` best candidates.
    pub fn report(&self, cfg: &ScanConfig, k: usize) -> Result<ScanReport> {
        Ok(ScanReport {
            best: self.best()?,
            candidates: self.top_k(k),
            total_votes: self.table.total(),
            distinct_bases: self.table.len() as u64,
            stats: self.stats,
            config: cfg.clone(),
        })
    }
}

/// Serializable summary of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub best: BaseCandidate,
    pub candidates: Vec<BaseCandidate>,
    pub total_votes: u64,
    pub distinct_bases: u64,
    pub stats: ScanStats,
    pub config: ScanConfig,
}

fn index_stats(index: &MaskedStringIndex, image_len: u64, votes: VoteStats) -> ScanStats {
    ScanStats {
        image_len,
        strings: index.len() as u64,
        buckets: index.bucket_count() as u64,
        votes,
    }
}

/// Scan an in-memory image.
pub fn scan_bytes(data: &[u8], cfg: &ScanConfig) -> Result<ScanOutcome> {
    cfg.validate()?;
    let span = info_span!("scan_bytes", len = data.len(), mask_bits = cfg.mask_bits);
    let _guard = span.enter();

    let extractor = StringExtractor::from_config(cfg);
    let index = MaskedStringIndex::build(extractor.iter(data), cfg.mask_bits);

    let (table, votes) = if cfg.parallel {
        vote_slice_parallel(
            data,
            &index,
            cfg.pointer_size,
            cfg.endianness,
            cfg.weighting,
        )
    } else {
        vote_slice(
            data,
            &index,
            cfg.pointer_size,
            cfg.endianness,
            cfg.weighting,
        )
    };

    Ok(ScanOutcome {
        table,
        stats: index_stats(&index, data.len() as u64, votes),
    })
}

/// Map a file read-only and scan it.
pub fn scan_file<P: AsRef<Path>>(path: P, cfg: &ScanConfig) -> Result<ScanOutcome> {
    cfg.validate()?;
    let image = MappedImage::open(path, &cfg.io_limits())?;
    debug!(path = %image.path().display(), len = image.len(), "Scanning mapped image");
    scan_bytes(image.as_bytes(), cfg)
}

/// Scan a reader without holding the image in memory.
///
/// The reader is rewound to offset 0 before each pass so string offsets and
/// pointer offsets index the same bytes.
pub fn scan_reader<R: Read + Seek>(mut reader: R, cfg: &ScanConfig) -> Result<ScanOutcome> {
    cfg.validate()?;
    let span = info_span!("scan_reader", chunk_size = cfg.chunk_size, mask_bits = cfg.mask_bits);
    let _guard = span.enter();

    reader.seek(SeekFrom::Start(0))?;
    let extractor = StringExtractor::from_config(cfg);
    let mut index = MaskedStringIndex::new(cfg.mask_bits);
    for candidate in extractor.stream(&mut reader, cfg.chunk_size) {
        index.insert(candidate?);
    }
    debug!(
        strings = index.len(),
        buckets = index.bucket_count(),
        "Built masked string index from stream"
    );

    let image_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    let mut voter = BaseVoter::new(&index, cfg.weighting);
    for word in ReaderPointerChunker::new(
        &mut reader,
        cfg.pointer_size,
        cfg.endianness,
        cfg.chunk_size,
    ) {
        voter.observe(word?);
    }
    let (table, votes) = voter.finish();

    Ok(ScanOutcome {
        table,
        stats: index_stats(&index, image_len, votes),
    })
}

/// Guess the load base of an in-memory image.
pub fn guess_base(data: &[u8], cfg: &ScanConfig) -> Result<u64> {
    Ok(scan_bytes(data, cfg)?.best()?.base)
}
