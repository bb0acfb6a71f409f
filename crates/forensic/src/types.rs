//! 엔진 데이터 타입
//!
//! 분류 결과인 [`ContentFormat`]과 바이트 수준 분석 결과인 [`ByteProfile`]을 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 콘텐츠 형식 -- 어떤 도구가 만든 텍스트인지 나타냅니다.
///
/// 분류 후에는 바뀌지 않으며, [`RiskScorer`](crate::scorer::RiskScorer)가
/// 적용할 추출기를 결정합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    /// `IP,MAC,VENDOR` CSV 네트워크 탐색 결과
    NetworkScan,
    /// `TARGET:` 헤더와 파이프 테이블로 된 포트 감사 결과
    PortAudit,
    /// 패키지 버전 감사 리포트
    VersionAudit,
    /// 시스템 자원 모니터 리포트
    ResourceMonitor,
    /// 인식되지 않은 텍스트 (안전한 기본값)
    #[default]
    Generic,
}

impl ContentFormat {
    /// 모든 형식 (분류 우선순위와 무관한 선언 순서)
    pub const ALL: [ContentFormat; 5] = [
        Self::NetworkScan,
        Self::PortAudit,
        Self::VersionAudit,
        Self::ResourceMonitor,
        Self::Generic,
    ];

    /// snake_case 식별자를 반환합니다 (직렬화 키, 메트릭 레이블과 동일).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkScan => "network_scan",
            Self::PortAudit => "port_audit",
            Self::VersionAudit => "version_audit",
            Self::ResourceMonitor => "resource_monitor",
            Self::Generic => "generic",
        }
    }

    /// snake_case 식별자에서 형식을 파싱합니다.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkScan => write!(f, "Network Scan"),
            Self::PortAudit => write!(f, "Port Audit"),
            Self::VersionAudit => write!(f, "Version Audit"),
            Self::ResourceMonitor => write!(f, "Resource Monitor"),
            Self::Generic => write!(f, "Generic"),
        }
    }
}

/// 바이트 수준 프로파일
///
/// 파일 하나당 한 번 계산되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByteProfile {
    /// Shannon 엔트로피 (bits/byte, 0.0 ~ 8.0)
    pub entropy: f64,
    /// 주장된 확장자의 매직 바이트와 일치하는지 (테이블에 없으면 true)
    pub magic_ok: bool,
    /// 버퍼 크기 (바이트)
    pub size_bytes: u64,
}
