#![no_main]

use std::sync::LazyLock;

use arbitrary::Arbitrary;
use kinix_forensic::{ForensicEngine, ForensicEngineBuilder};
use libfuzzer_sys::fuzz_target;

static ENGINE: LazyLock<ForensicEngine> = LazyLock::new(|| {
    ForensicEngineBuilder::new()
        .build()
        .expect("default engine builds")
});

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    extension: FuzzExtension,
    bytes: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
enum FuzzExtension {
    Pdf,
    Png,
    Doc,
    Txt,
    Raw(String),
}

impl FuzzExtension {
    fn as_ext(&self) -> &str {
        match self {
            Self::Pdf => ".pdf",
            Self::Png => ".PNG",
            Self::Doc => ".doc",
            Self::Txt => "txt",
            Self::Raw(s) => s,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let result = ENGINE.scan_bytes("fuzz", &input.bytes, input.extension.as_ext());

    let profile = result.byte_profile.expect("byte scans carry a profile");
    assert!((0.0..=8.0).contains(&profile.entropy));
    assert_eq!(profile.size_bytes, input.bytes.len() as u64);
});
