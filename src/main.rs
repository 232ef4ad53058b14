//! baseguess - load base address estimation CLI
//!
//! Guesses where a raw firmware or memory dump was loaded by matching
//! pointers against the offsets of the strings they reference.

use anyhow::{Context, Result};
use baseguess::logging::{init_tracing, init_tracing_json};
use baseguess::{scan_file, scan_reader, Endianness, PointerSize, ScanConfig, VoteWeighting};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "baseguess")]
#[command(
    author,
    version,
    about = "Guess the load base address of a raw binary image"
)]
#[command(long_about = "
baseguess scans a flat binary image for printable strings and for
pointer-sized words. Words whose low bits match the low bits of a string
offset vote for a load base; the most voted base is printed.

EXAMPLES:
    baseguess firmware.bin                       # Best base as hex
    baseguess -v firmware.bin                    # Top candidates with votes
    baseguess --pointer-size 8 --endian big dump # 64-bit big-endian image
    baseguess --json firmware.bin                # Full report as JSON
")]
struct Cli {
    /// Raw image to analyze
    #[arg(required = true)]
    file: PathBuf,

    /// Byte order of pointers: little or big [default: little]
    #[arg(long)]
    endian: Option<String>,

    /// Pointer width in bytes: 4 or 8 [default: 4]
    #[arg(long)]
    pointer_size: Option<u32>,

    /// Number of low bits used to match pointers to strings [default: 16]
    #[arg(long)]
    mask: Option<u32>,

    /// Minimum candidate string length [default: 10]
    #[arg(short = 'm', long)]
    min_length: Option<usize>,

    /// String delimiter byte, decimal or 0x-prefixed hex [default: 0x00]
    #[arg(long, value_parser = parse_byte)]
    delimiter: Option<u8>,

    /// Vote weight per match: unit or bucket-size [default: unit]
    #[arg(long)]
    weighting: Option<String>,

    /// Load settings from a JSON file; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stream the file instead of memory-mapping it
    #[arg(long)]
    stream: bool,

    /// Number of candidates shown with --verbose or --json
    #[arg(long, default_value = "10")]
    top: usize,

    /// Output the full report as JSON
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON on stderr
    #[arg(long)]
    log_json: bool,

    /// Print the top candidates with their vote counts
    #[arg(short, long)]
    verbose: bool,
}

fn parse_byte(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte '{s}': {e}"))
}

impl Cli {
    fn scan_config(&self) -> Result<ScanConfig> {
        let mut cfg = match &self.config {
            Some(path) => ScanConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ScanConfig::default(),
        };
        if let Some(endian) = &self.endian {
            cfg.endianness = endian.parse::<Endianness>()?;
        }
        if let Some(size) = self.pointer_size {
            cfg.pointer_size = PointerSize::try_from(size)?;
        }
        if let Some(mask) = self.mask {
            cfg.mask_bits = mask;
        }
        if let Some(min_length) = self.min_length {
            cfg.min_length = min_length;
        }
        if let Some(delimiter) = self.delimiter {
            cfg.delimiter = delimiter;
        }
        if let Some(weighting) = &self.weighting {
            cfg.weighting = weighting.parse::<VoteWeighting>()?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        init_tracing_json("warn");
    } else {
        init_tracing("warn");
    }

    let cfg = cli.scan_config()?;
    let outcome = if cli.stream {
        let file = File::open(&cli.file)
            .with_context(|| format!("failed to open {}", cli.file.display()))?;
        scan_reader(file, &cfg)
    } else {
        scan_file(&cli.file, &cfg)
    }
    .with_context(|| format!("failed to scan {}", cli.file.display()))?;

    let report = outcome
        .report(&cfg, cli.top)
        .with_context(|| format!("no base address found for {}", cli.file.display()))?;
    info!(
        base = report.best.base,
        votes = report.best.votes,
        total_votes = report.total_votes,
        "Best candidate"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if cli.verbose {
        let field_size = 2 * cfg.pointer_size.bytes();
        let votes_width = report.total_votes.to_string().len();
        for c in &report.candidates {
            println!(
                "0x{:0field_size$x} {:>votes_width$}",
                c.base, c.votes
            );
        }
    } else {
        println!("{:#x}", report.best.base);
    }

    Ok(())
}
