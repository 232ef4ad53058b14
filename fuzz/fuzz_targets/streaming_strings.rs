#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let ex = baseguess::StringExtractor::new(0, 4);
    let in_memory: Vec<_> = ex.iter(data).collect();
    let streamed: Vec<_> = ex
        .stream(std::io::Cursor::new(data), 7)
        .collect::<std::io::Result<_>>()
        .unwrap();
    assert_eq!(in_memory, streamed);
});
