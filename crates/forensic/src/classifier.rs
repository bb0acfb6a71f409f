//! 형식 분류기 -- 텍스트의 구조적 지문으로 생성 도구를 판별합니다.
//!
//! 등록된 지문을 순서대로 검사하여 처음 일치한 형식을 반환합니다.
//! 어느 지문에도 맞지 않으면 항상 [`ContentFormat::Generic`]입니다.
//! 표식 비교는 대소문자를 구분하지 않습니다.

use crate::types::ContentFormat;

/// 버전 감사 리포트 헤더
const VERSION_REPORT_MARKERS: &[&str] = &["REPORTE DE VERSIONES", "VERSION REPORT"];

/// 자원 모니터 리포트 헤더
const RESOURCE_REPORT_MARKERS: &[&str] = &["REPORTE SYSCARE", "SYSCARE REPORT"];

/// 네트워크 탐색 CSV 헤더 (공백 제거, 대문자)
const NETWORK_CSV_HEADER: &str = "IP,MAC,VENDOR";

/// 구조적 지문
///
/// 입력은 대문자로 변환된 전체 텍스트입니다.
pub trait Fingerprint: Send + Sync {
    /// 일치 시 반환할 형식
    fn format(&self) -> ContentFormat;

    /// 대문자 텍스트가 이 지문과 일치하는지 확인합니다.
    fn matches(&self, upper: &str) -> bool;
}

/// `TARGET:` 표식과 파이프 테이블 구분자를 모두 가진 포트 감사 결과
pub struct PortAuditFingerprint;

impl Fingerprint for PortAuditFingerprint {
    fn format(&self) -> ContentFormat {
        ContentFormat::PortAudit
    }

    fn matches(&self, upper: &str) -> bool {
        upper.contains("TARGET:") && upper.contains('|')
    }
}

/// 헤더 문구 중 하나를 포함하는 리포트
pub struct MarkerFingerprint {
    format: ContentFormat,
    markers: &'static [&'static str],
}

impl MarkerFingerprint {
    /// 형식과 대문자 헤더 문구 목록으로 지문을 만듭니다.
    pub fn new(format: ContentFormat, markers: &'static [&'static str]) -> Self {
        Self { format, markers }
    }
}

impl Fingerprint for MarkerFingerprint {
    fn format(&self) -> ContentFormat {
        self.format
    }

    fn matches(&self, upper: &str) -> bool {
        self.markers.iter().any(|m| upper.contains(m))
    }
}

/// `IP,MAC,VENDOR` 헤더 줄이 있는 CSV
pub struct CsvHeaderFingerprint;

impl Fingerprint for CsvHeaderFingerprint {
    fn format(&self) -> ContentFormat {
        ContentFormat::NetworkScan
    }

    fn matches(&self, upper: &str) -> bool {
        upper.lines().any(is_network_csv_header)
    }
}

/// 줄이 네트워크 탐색 CSV 헤더인지 확인합니다 (BOM, 공백 무시).
pub(crate) fn is_network_csv_header(line: &str) -> bool {
    let compact: String = line
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    compact.eq_ignore_ascii_case(NETWORK_CSV_HEADER)
}

/// 형식 분류기
///
/// # 사용 예시
/// ```
/// use kinix_forensic::classifier::FormatClassifier;
/// use kinix_forensic::ContentFormat;
///
/// let classifier = FormatClassifier::with_defaults();
/// assert_eq!(classifier.classify("IP,MAC,VENDOR\n"), ContentFormat::NetworkScan);
/// assert_eq!(classifier.classify(""), ContentFormat::Generic);
/// ```
pub struct FormatClassifier {
    /// 등록된 지문 (순서대로 검사)
    fingerprints: Vec<Box<dyn Fingerprint>>,
}

impl FormatClassifier {
    /// 지문이 없는 분류기를 생성합니다 (모든 입력이 Generic).
    pub fn new() -> Self {
        Self {
            fingerprints: Vec::new(),
        }
    }

    /// 기본 지문 세트로 분류기를 생성합니다.
    ///
    /// 순서: PortAudit -> VersionAudit -> NetworkScan -> ResourceMonitor
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Box::new(PortAuditFingerprint))
            .register(Box::new(MarkerFingerprint::new(
                ContentFormat::VersionAudit,
                VERSION_REPORT_MARKERS,
            )))
            .register(Box::new(CsvHeaderFingerprint))
            .register(Box::new(MarkerFingerprint::new(
                ContentFormat::ResourceMonitor,
                RESOURCE_REPORT_MARKERS,
            )))
    }

    /// 지문을 등록합니다. 등록 순서대로 검사됩니다.
    pub fn register(mut self, fingerprint: Box<dyn Fingerprint>) -> Self {
        self.fingerprints.push(fingerprint);
        self
    }

    /// 텍스트의 형식을 판별합니다. 모든 입력에 대해 정확히 하나의 형식을 반환합니다.
    pub fn classify(&self, text: &str) -> ContentFormat {
        let upper = text.to_uppercase();
        self.fingerprints
            .iter()
            .find(|fp| fp.matches(&upper))
            .map(|fp| fp.format())
            .unwrap_or(ContentFormat::Generic)
    }

    /// 등록된 지문의 형식 목록을 검사 순서로 반환합니다.
    pub fn registered_formats(&self) -> Vec<ContentFormat> {
        self.fingerprints.iter().map(|fp| fp.format()).collect()
    }
}

impl Default for FormatClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}
