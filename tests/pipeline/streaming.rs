use crate::common::firmware_image;
use baseguess::{scan_bytes, scan_file, scan_reader, Endianness, PointerSize, ScanConfig};
use std::io::{Cursor, Write};

#[test]
fn streamed_scan_matches_in_memory_scan() {
    let base = 0x0001_0000u64;
    let data = firmware_image(base, PointerSize::Four, Endianness::Little);
    for chunk_size in [4, 13, 256, 1 << 20] {
        let cfg = ScanConfig {
            chunk_size,
            ..Default::default()
        };
        let mem = scan_bytes(&data, &cfg).unwrap();
        let streamed = scan_reader(Cursor::new(&data), &cfg).unwrap();
        assert_eq!(mem.table, streamed.table, "chunk size {chunk_size}");
        assert_eq!(mem.stats, streamed.stats);
        assert_eq!(streamed.best().unwrap().base, base);
    }
}

#[test]
fn streamed_file_matches_mapped_file() {
    let base = 0xffff_0000_0010_0000u64;
    let data = firmware_image(base, PointerSize::Eight, Endianness::Big);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    let cfg = ScanConfig {
        pointer_size: PointerSize::Eight,
        endianness: Endianness::Big,
        chunk_size: 64,
        ..Default::default()
    };
    let mapped = scan_file(file.path(), &cfg).unwrap();
    let streamed = scan_reader(std::fs::File::open(file.path()).unwrap(), &cfg).unwrap();
    assert_eq!(mapped.table, streamed.table);
    assert_eq!(streamed.best().unwrap().base, base);
}

#[test]
fn reader_is_rewound_before_scanning() {
    let base = 0x0800_0000u64;
    let data = firmware_image(base, PointerSize::Four, Endianness::Little);
    let mut cursor = Cursor::new(&data);
    cursor.set_position(100);
    let outcome = scan_reader(&mut cursor, &ScanConfig::default()).unwrap();
    assert_eq!(outcome.best().unwrap().base, base);
}
