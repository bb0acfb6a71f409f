#![no_main]

use std::sync::LazyLock;

use kinix_forensic::{ForensicEngine, ForensicEngineBuilder};
use libfuzzer_sys::fuzz_target;

static ENGINE: LazyLock<ForensicEngine> = LazyLock::new(|| {
    ForensicEngineBuilder::new()
        .build()
        .expect("default engine builds")
});

fuzz_target!(|data: &[u8]| {
    // 분류/점수 산정은 어떤 텍스트에도 패닉 없이 결과를 내야 함
    let text = String::from_utf8_lossy(data);
    let result = ENGINE.scan_text("fuzz", &text);
    let weighted: u32 = result
        .findings
        .iter()
        .fold(0u32, |acc, f| acc.saturating_add(f.weight));
    assert_eq!(result.score, weighted);
});
