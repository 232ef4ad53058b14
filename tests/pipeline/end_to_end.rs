use crate::common::{firmware_image, ImageBuilder};
use baseguess::{
    guess_base, scan_bytes, scan_file, BaseGuessError, Endianness, PointerSize, ScanConfig,
    VoteWeighting,
};
use std::io::Write;

fn cfg(pointer_size: PointerSize, endianness: Endianness, mask_bits: u32) -> ScanConfig {
    ScanConfig {
        pointer_size,
        endianness,
        mask_bits,
        ..Default::default()
    }
}

#[test]
fn hello_world_image() {
    let mut data = b"\x00HELLOWORLD\x00".to_vec();
    data.extend_from_slice(&(0x1000u32 + 1).to_le_bytes());
    let cfg = cfg(PointerSize::Four, Endianness::Little, 12);
    assert_eq!(guess_base(&data, &cfg).unwrap(), 0x1000);
}

#[test]
fn firmware_images_in_every_layout() {
    let cases = [
        (PointerSize::Four, Endianness::Little, 0x0800_0000u64),
        (PointerSize::Four, Endianness::Big, 0x1000_0000),
        (PointerSize::Eight, Endianness::Little, 0xffff_ffff_8000_0000),
        (PointerSize::Eight, Endianness::Big, 0x0000_0040_0000_0000),
    ];
    for (size, endianness, base) in cases {
        let data = firmware_image(base, size, endianness);
        for mask in [12, 16] {
            let outcome = scan_bytes(&data, &cfg(size, endianness, mask)).unwrap();
            let best = outcome.best().unwrap();
            assert_eq!(best.base, base, "{size:?} {endianness:?} mask {mask}");
            assert!(best.votes >= 11);
        }
    }
}

#[test]
fn wrong_endianness_does_not_find_the_base() {
    let base = 0x0800_0000u64;
    let data = firmware_image(base, PointerSize::Four, Endianness::Little);
    let outcome = scan_bytes(&data, &cfg(PointerSize::Four, Endianness::Big, 16)).unwrap();
    assert_eq!(outcome.table.get(base), 0);
}

#[test]
fn bucket_size_weighting_keeps_the_winner() {
    let base = 0x2000_0000u64;
    let data = firmware_image(base, PointerSize::Four, Endianness::Little);
    let cfg = ScanConfig {
        weighting: VoteWeighting::BucketSize,
        ..cfg(PointerSize::Four, Endianness::Little, 16)
    };
    assert_eq!(guess_base(&data, &cfg).unwrap(), base);
}

#[test]
fn non_printable_image_is_empty_result() {
    let data: Vec<u8> = (0..8192u32).map(|i| 0x80 | (i % 0x7f) as u8).collect();
    let err = guess_base(&data, &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, BaseGuessError::EmptyResult { .. }));
}

#[test]
fn strings_without_pointers_is_empty_result() {
    let mut img = ImageBuilder::new(PointerSize::Four, Endianness::Little);
    img.string("a lonely string nobody references");
    let err = guess_base(&img.build(), &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, BaseGuessError::EmptyResult { .. }));
}

#[test]
fn pointers_below_string_offsets_never_vote() {
    let mut img = ImageBuilder::new(PointerSize::Four, Endianness::Little);
    img.bytes(&[0u8; 0x100]);
    let off = img.string("string placed past 0x100");
    assert_eq!(off, 0x100);
    img.pointer(0x000);
    img.pointer(0x0100);
    let outcome = scan_bytes(&img.build(), &cfg(PointerSize::Four, Endianness::Little, 8))
        .unwrap();
    for (base, _) in outcome.table.iter() {
        assert!(base <= 0x100);
    }
    assert_eq!(outcome.table.get(0), 1);
    assert!(outcome.stats.votes.negative_bases >= 1);
}

#[test]
fn scan_file_maps_the_image() {
    let base = 0x0040_0000u64;
    let data = firmware_image(base, PointerSize::Four, Endianness::Little);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&data).unwrap();
    let outcome = scan_file(file.path(), &ScanConfig::default()).unwrap();
    assert_eq!(outcome.best().unwrap().base, base);
    assert_eq!(outcome.stats.image_len, data.len() as u64);
}

#[test]
fn scan_file_missing_is_io_error() {
    let err = scan_file("/nonexistent/firmware.bin", &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, BaseGuessError::Io(_)));
}

#[test]
fn scan_file_respects_size_limit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0u8; 64]).unwrap();
    let cfg = ScanConfig {
        max_file_size: 32,
        ..Default::default()
    };
    let err = scan_file(file.path(), &cfg).unwrap_err();
    assert!(err.to_string().contains("exceeds the maximum allowed size"));
}
