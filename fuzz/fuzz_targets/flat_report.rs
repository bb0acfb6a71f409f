#![no_main]

use std::collections::BTreeMap;

use kinix_forensic::ScanResult;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|entries: Vec<(String, String)>| {
    // 임의의 key/value 맵 복원은 에러를 낼 수 있지만 패닉해서는 안 됨
    let map: BTreeMap<String, String> = entries.into_iter().collect();
    if let Ok(result) = ScanResult::from_flat(&map) {
        let again = ScanResult::from_flat(&result.to_flat()).expect("round trip");
        assert_eq!(again.format, result.format);
        assert_eq!(again.tier, result.tier);
        assert_eq!(again.score, result.score);
    }
});
