#![no_main]

use kinix_forensic::signature::{RuleLoader, SignatureEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // YAML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        if let Ok(rules) = RuleLoader::parse_yaml(yaml_str, "fuzz-input.yml") {
            // 파싱에 성공한 규칙은 엔진 구성과 평가도 통과해야 함
            if let Ok(engine) = SignatureEngine::new(rules) {
                let _ = engine.evaluate(yaml_str);
            }
        }
    }
});
