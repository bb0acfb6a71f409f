//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 엔진, CLI, 리포트 내보내기가 공유하는 데이터 구조를 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generic 형식에서 `Critical`로 판정하는 최소 점수
pub const CRITICAL_SCORE_THRESHOLD: u32 = 40;

/// 위험 등급
///
/// 점수에서 결정적으로 유도되는 순서형 등급입니다.
/// `Ord` 구현으로 등급 비교가 가능합니다 (`Safe < Low < Medium < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// 위험 지표 없음
    #[default]
    Safe,
    /// 낮은 위험
    Low,
    /// 주의 필요
    Medium,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl RiskTier {
    /// 점수에서 등급을 유도합니다.
    ///
    /// `score >= 40 → Critical`, `score > 0 → Medium`, `score = 0 → Safe`
    pub fn from_score(score: u32) -> Self {
        if score >= CRITICAL_SCORE_THRESHOLD {
            Self::Critical
        } else if score > 0 {
            Self::Medium
        } else {
            Self::Safe
        }
    }

    /// 문자열에서 등급을 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "safe" | "clean" => Some(Self::Safe),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }

    /// 소문자 식별자를 반환합니다 (직렬화 키와 동일).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 단일 관찰 결과
///
/// 매칭된 규칙, 키워드 출현 횟수, 위험 표식 등 하나의 관찰을 나타냅니다.
/// 가중치 0은 정보성 항목이며 점수에 기여하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 항목 이름 (예: "SQL Injection", "Port 3389")
    pub label: String,
    /// 사람이 읽을 수 있는 상세 설명
    pub detail: String,
    /// 점수 가중치
    pub weight: u32,
}

impl Finding {
    /// 가중치가 있는 항목을 생성합니다.
    pub fn new(label: impl Into<String>, detail: impl Into<String>, weight: u32) -> Self {
        Self {
            label: label.into(),
            detail: detail.into(),
            weight,
        }
    }

    /// 점수에 기여하지 않는 정보성 항목을 생성합니다.
    pub fn info(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(label, detail, 0)
    }

    /// 정보성 항목인지 확인합니다.
    pub fn is_informational(&self) -> bool {
        self.weight == 0
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.weight > 0 {
            write!(f, "{}: {} (+{})", self.label, self.detail, self.weight)
        } else {
            write!(f, "{}: {}", self.label, self.detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering() {
        assert!(RiskTier::Safe < RiskTier::Low);
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::Critical);
    }

    #[test]
    fn tier_from_score_thresholds() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Safe);
        assert_eq!(RiskTier::from_score(1), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(20), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(39), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(40), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(400), RiskTier::Critical);
    }

    #[test]
    fn tier_from_str_loose() {
        assert_eq!(RiskTier::from_str_loose("CRITICAL"), Some(RiskTier::Critical));
        assert_eq!(RiskTier::from_str_loose(" medium "), Some(RiskTier::Medium));
        assert_eq!(RiskTier::from_str_loose("safe"), Some(RiskTier::Safe));
        assert_eq!(RiskTier::from_str_loose("high"), None);
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&RiskTier::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: RiskTier = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, RiskTier::Medium);
    }

    #[test]
    fn tier_as_str_matches_serde() {
        for tier in [
            RiskTier::Safe,
            RiskTier::Low,
            RiskTier::Medium,
            RiskTier::Critical,
        ] {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json.trim_matches('"'), tier.as_str());
        }
    }

    #[test]
    fn finding_display() {
        let f = Finding::new("SQL Injection", "matched signature", 20);
        assert_eq!(f.to_string(), "SQL Injection: matched signature (+20)");

        let info = Finding::info("IP Addresses", "2 unique IPv4 addresses");
        assert!(info.is_informational());
        assert_eq!(info.to_string(), "IP Addresses: 2 unique IPv4 addresses");
    }
}
