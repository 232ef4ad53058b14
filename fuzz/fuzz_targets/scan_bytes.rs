#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = baseguess::ScanConfig {
        mask_bits: 8,
        min_length: 4,
        parallel: false,
        ..Default::default()
    };
    if let Ok(outcome) = baseguess::scan_bytes(data, &cfg) {
        let _ = outcome.best();
        let _ = outcome.top_k(10);
    }
});
