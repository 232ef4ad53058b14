use crate::common::{firmware_image, ImageBuilder};
use baseguess::{
    scan_bytes, Endianness, MaskedStringIndex, PointerSize, ScanConfig, StringExtractor,
};

fn le32_cfg(mask_bits: u32) -> ScanConfig {
    ScanConfig {
        mask_bits,
        parallel: false,
        ..Default::default()
    }
}

#[test]
fn referenced_string_base_is_always_voted() {
    for base in [0u64, 0x10, 0x1000, 0x0800_0000, 0xc000_0000] {
        let mut img = ImageBuilder::new(PointerSize::Four, Endianness::Little);
        img.bytes(b"\x13\x37");
        let off = img.string("referenced message");
        img.pointer(base + off);
        let outcome = scan_bytes(&img.build(), &le32_cfg(12)).unwrap();
        assert!(outcome.table.get(base) > 0, "base {base:#x}");
    }
}

#[test]
fn adding_a_pair_adds_exactly_one_vote() {
    let base = 0x3000_0000u64;
    let mut img = ImageBuilder::new(PointerSize::Four, Endianness::Little);
    let a = img.string("first referenced string");
    let b = img.string("second referenced string");
    img.pointer(base + a);
    let before = scan_bytes(&img.build(), &le32_cfg(16)).unwrap();

    img.pointer(base + b);
    let after = scan_bytes(&img.build(), &le32_cfg(16)).unwrap();

    assert_eq!(after.table.get(base), before.table.get(base) + 1);
    for (candidate, votes) in before.table.iter() {
        assert!(after.table.get(candidate) >= votes);
    }
}

#[test]
fn extractor_never_yields_short_or_non_printable_runs() {
    let mut data = Vec::new();
    for i in 0..2000u32 {
        data.push(((i * 7919) % 256) as u8);
    }
    let ex = StringExtractor::new(0, 6);
    for s in ex.iter(&data) {
        assert!(s.len() >= 6);
        assert!(s.bytes.iter().all(|&b| baseguess::strings::is_printable(b)));
        assert!(data[s.offset as usize..].starts_with(&s.bytes));
    }
}

#[test]
fn extractor_is_restartable() {
    let data = firmware_image(0x1000, PointerSize::Four, Endianness::Little);
    let ex = StringExtractor::default();
    let first: Vec<_> = ex.iter(&data).collect();
    let second: Vec<_> = ex.iter(&data).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 8);
    assert!(first.windows(2).all(|w| w[0].offset < w[1].offset));
}

#[test]
fn index_retains_every_colliding_string() {
    let data = firmware_image(0x1000, PointerSize::Four, Endianness::Little);
    let strings: Vec<_> = StringExtractor::default().iter(&data).collect();
    let index = MaskedStringIndex::build(strings.clone(), 0);
    assert_eq!(index.bucket_count(), 1);
    assert_eq!(index.bucket_for(0).unwrap(), &strings[..]);
}

#[test]
fn ties_resolve_to_the_lowest_base() {
    let mut img = ImageBuilder::new(PointerSize::Four, Endianness::Little);
    let off = img.string("one string, two bases");
    img.pointer(0x9000 + off);
    img.pointer(0x5000 + off);
    let outcome = scan_bytes(&img.build(), &le32_cfg(12)).unwrap();
    assert_eq!(outcome.table.get(0x9000), 1);
    assert_eq!(outcome.table.get(0x5000), 1);
    assert_eq!(outcome.best().unwrap().base, 0x5000);
}
