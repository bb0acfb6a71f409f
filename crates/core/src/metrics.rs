//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않으면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `kinix_`
//! - 모듈명: `forensic_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(kinix_core::metrics::FORENSIC_SCANS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 콘텐츠 형식 레이블 키 (network_scan, port_audit, version_audit, resource_monitor, generic)
pub const LABEL_FORMAT: &str = "format";

/// 위험 등급 레이블 키 (safe, low, medium, critical)
pub const LABEL_TIER: &str = "tier";

// ─── Forensic Engine 메트릭 ────────────────────────────────────────

/// Forensic: 완료된 스캔 수 (counter, label: format)
pub const FORENSIC_SCANS_TOTAL: &str = "kinix_forensic_scans_total";

/// Forensic: 매칭된 시그니처 규칙 수 (counter)
pub const FORENSIC_SIGNATURE_MATCHES_TOTAL: &str = "kinix_forensic_signature_matches_total";

/// Forensic: 생성된 관찰 항목 수 (counter)
pub const FORENSIC_FINDINGS_TOTAL: &str = "kinix_forensic_findings_total";

/// Forensic: 등급별 판정 수 (counter, label: tier)
pub const FORENSIC_TIER_TOTAL: &str = "kinix_forensic_tier_total";

/// Forensic: 단일 스캔 소요 시간 (histogram, 초)
pub const FORENSIC_SCAN_DURATION_SECONDS: &str = "kinix_forensic_scan_duration_seconds";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 스캔 소요 시간 히스토그램 버킷 (초)
///
/// 10us ~ 5s 범위 (메모리 상의 버퍼만 처리)
pub const SCAN_DURATION_BUCKETS: [f64; 9] =
    [0.00001, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.1, 1.0, 5.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        FORENSIC_SCANS_TOTAL,
        "Total number of completed content scans per detected format"
    );
    describe_counter!(
        FORENSIC_SIGNATURE_MATCHES_TOTAL,
        "Total number of signature rule matches"
    );
    describe_counter!(
        FORENSIC_FINDINGS_TOTAL,
        "Total number of findings attached to scan results"
    );
    describe_counter!(FORENSIC_TIER_TOTAL, "Scan results per risk tier");
    describe_histogram!(
        FORENSIC_SCAN_DURATION_SECONDS,
        "Time to classify and score a single buffer in seconds"
    );
}
