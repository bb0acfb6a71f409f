//! 위험도 산정 -- 형식별 필드 추출 및 등급 판정
//!
//! [`RiskScorer`]는 [`ContentFormat`]에 따라 전용 추출기로 분기합니다.
//! 모든 추출기는 전 함수(total)입니다. 일치하는 내용이 없으면 빈 항목,
//! 점수 0, `Safe` 등급을 반환하며 어떤 입력에도 실패하지 않습니다.
//!
//! - [`port_audit`]: 포트 번호, 위험 표시 행
//! - [`version_audit`]: 오래된 패키지
//! - [`network_scan`]: 호스트/벤더 열거 (정보성)
//! - [`resource_monitor`]: CPU/RAM/디스크 사용률
//! - [`generic`]: 시그니처 매칭, IP/이메일/키워드 집계

pub mod generic;
pub mod network_scan;
pub mod port_audit;
pub mod resource_monitor;
pub mod version_audit;

use kinix_core::types::{Finding, RiskTier};

use crate::signature::SignatureEngine;
use crate::types::ContentFormat;

/// 점수 산정 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// 관찰 항목 (추출 순서)
    pub findings: Vec<Finding>,
    /// 항목 가중치의 합
    pub score: u32,
    /// 위험 등급
    pub tier: RiskTier,
}

impl ScoreOutcome {
    /// 항목 목록과 등급으로 결과를 만듭니다. 점수는 가중치 합입니다.
    pub fn new(findings: Vec<Finding>, tier: RiskTier) -> Self {
        let score = findings
            .iter()
            .fold(0u32, |acc, f| acc.saturating_add(f.weight));
        Self {
            findings,
            score,
            tier,
        }
    }
}

/// 위험도 산정기
pub struct RiskScorer {
    signatures: SignatureEngine,
    keyword_census: bool,
}

impl RiskScorer {
    /// 시그니처 엔진으로 산정기를 생성합니다.
    pub fn new(signatures: SignatureEngine) -> Self {
        Self {
            signatures,
            keyword_census: true,
        }
    }

    /// 내장 규칙으로 산정기를 생성합니다.
    pub fn with_defaults() -> Self {
        Self::new(SignatureEngine::with_defaults())
    }

    /// Generic 텍스트의 심각도 키워드 집계 여부를 설정합니다.
    pub fn with_keyword_census(mut self, enabled: bool) -> Self {
        self.keyword_census = enabled;
        self
    }

    /// 형식에 맞는 추출기로 텍스트를 점수화합니다.
    pub fn score(&self, format: ContentFormat, text: &str) -> ScoreOutcome {
        match format {
            ContentFormat::PortAudit => port_audit::score(text),
            ContentFormat::VersionAudit => version_audit::score(text),
            ContentFormat::NetworkScan => network_scan::score(text),
            ContentFormat::ResourceMonitor => resource_monitor::score(text),
            ContentFormat::Generic => generic::score(&self.signatures, text, self.keyword_census),
        }
    }

    /// 사용 중인 시그니처 엔진
    pub fn signatures(&self) -> &SignatureEngine {
        &self.signatures
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
